//! Shared fixtures for integration tests against a mock backend

#![allow(dead_code, clippy::unwrap_used)]

use chrono::{NaiveDate, NaiveDateTime};
use roombook_client::ApiClient;
use roombook_core::{Role, User};
use serde_json::{Value, json};
use std::sync::Once;
use wiremock::MockServer;

/// Path prefix the mock backend serves under
pub const API_PREFIX: &str = "/api";

static LOGGING: Once = Once::new();

/// Install a test subscriber once per binary
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = roombook_core::init_logging("debug", false);
    });
}

/// Start a mock backend and a client pointed at it
pub async fn start_backend() -> (MockServer, ApiClient) {
    init_test_logging();
    let server = MockServer::start().await;
    let client = ApiClient::new(format!("{}{API_PREFIX}/", server.uri()));
    (server, client)
}

/// Full endpoint path on the mock backend
pub fn api_path(endpoint: &str) -> String {
    format!("{API_PREFIX}{endpoint}")
}

/// Fixed instant used by dashboard tests
pub fn test_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Student principal
pub fn alice() -> User {
    User {
        id: 1,
        name: "Alice".to_string(),
        nrp: "123".to_string(),
        role: Role::Student,
        department: "DTIK (Departemen Teknik Informatika dan Komputer)".to_string(),
        major: "S1 Terapan Teknik Informatika".to_string(),
    }
}

/// Admin principal
pub fn admin() -> User {
    User {
        id: 99,
        name: "Admin Sarpras".to_string(),
        nrp: "admin".to_string(),
        role: Role::Admin,
        department: String::new(),
        major: String::new(),
    }
}

/// `GET /users` payload
pub fn users_json() -> Value {
    json!([
        { "id": 1, "name": "Alice", "nrp": "123", "role": "Student",
          "department": "DTIK (Departemen Teknik Informatika dan Komputer)",
          "major": "S1 Terapan Teknik Informatika" },
        { "id": 2, "name": "Bob", "nrp": "456", "role": "Student",
          "department": "DTE (Departemen Teknik Elektro)", "major": "S1 Terapan Teknik Elektronika" },
        { "id": 99, "name": "Admin Sarpras", "nrp": "admin", "role": "Admin" }
    ])
}

/// `GET /rooms` payload
pub fn rooms_json() -> Value {
    json!([
        { "id": 1, "name": "Lab Jaringan", "capacity": 30 },
        { "id": 2, "name": "Aula Pascasarjana", "capacity": 200, "description": "Lantai 3" }
    ])
}

/// A `GET /bookings` entry
pub fn booking_json(id: i64, borrower: &str, date: &str, time: &str, status: &str) -> Value {
    json!({
        "id": id,
        "roomName": "Lab Jaringan",
        "borrowerName": borrower,
        "date": date,
        "time": time,
        "status": status,
        "purpose": "Praktikum"
    })
}

/// The five-record snapshot: Alice has one active, one completed and one
/// rejected booking; Bob has an upcoming and a finished approved booking.
pub fn bookings_json() -> Value {
    json!([
        booking_json(1, "Alice", "2024-06-01", "08:00 - 10:00", "Pending"),
        booking_json(2, "Alice", "2024-05-01T00:00:00", "08:00 - 10:00", "Approved"),
        booking_json(3, "Alice", "2024-06-02", "13:00 - 15:00", "Rejected"),
        booking_json(4, "Bob", "2024-06-03", "08:00 - 10:00", "Approved"),
        booking_json(5, "Bob", "2024-05-20", "08:00 - 10:00", "Approved")
    ])
}
