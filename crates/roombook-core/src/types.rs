//! Core data types for the room booking client

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// Booking identifier assigned by the backend
pub type BookingId = i64;

/// Room identifier assigned by the backend
pub type RoomId = i64;

/// User identifier assigned by the backend
pub type UserId = i64;

/// Backend status of a booking request.
///
/// Transitions are driven by the backend only: `Pending -> Approved` or
/// `Pending -> Rejected`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    /// Waiting for an administrator
    Pending,
    /// Accepted by an administrator
    Approved,
    /// Declined by an administrator
    Rejected,
}

impl BookingStatus {
    /// Wire representation used by the backend
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Whether the backend will never change this status again
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Where a booking sits from the user's point of view. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Still upcoming or awaiting review
    Active,
    /// Approved and already over
    Completed,
}

/// Label shown next to a booking in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayLabel {
    /// Awaiting review
    Pending,
    /// Approved and not yet over
    Approved,
    /// Approved and already over
    Completed,
    /// Declined
    Rejected,
}

impl std::fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Completed => "Selesai",
            Self::Rejected => "Rejected",
        })
    }
}

/// Backends send `null` as freely as they omit a key; both read as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A booking snapshot as returned by `GET /bookings`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Backend identifier
    pub id: BookingId,

    /// Display name of the booked room
    #[serde(default, deserialize_with = "null_as_empty")]
    pub room_name: String,

    /// Display name of the requesting user
    #[serde(default, deserialize_with = "null_as_empty")]
    pub borrower_name: String,

    /// Booking date, `YYYY-MM-DD` optionally followed by a `T...` suffix
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,

    /// Human-readable range such as `"08:00 - 10:00"`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub time: String,

    /// Explicit start time (`HH:MM`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// Explicit end time (`HH:MM`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Backend status
    pub status: BookingStatus,

    /// Reason for the booking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// A bookable room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    /// Backend identifier
    pub id: RoomId,

    /// Display name
    pub name: String,

    /// Seat capacity
    pub capacity: u32,

    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Role of a user. The backend only distinguishes `"Admin"`; every other
/// value is a student.
///
/// The mapping is lossy: a backend role such as `"Mahasiswa"` is written back
/// as `"Student"` when the session is saved. Only the admin check reads it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Facility administrator
    Admin,
    /// Everyone else
    #[default]
    Student,
}

impl Role {
    /// Whether this role may review bookings
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Admin => "Admin",
            Self::Student => "Student",
        })
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == "Admin" {
            Self::Admin
        } else {
            Self::Student
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => "Admin".to_string(),
            Role::Student => "Student".to_string(),
        }
    }
}

/// A registered user; also the session principal once logged in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Backend identifier
    pub id: UserId,

    /// Full name
    pub name: String,

    /// Student register number
    pub nrp: String,

    /// Account role
    #[serde(default)]
    pub role: Role,

    /// Department name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub department: String,

    /// Study programme
    #[serde(default, deserialize_with = "null_as_empty")]
    pub major: String,
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Student register number or admin username
    #[validate(length(min = 1, message = "NRP wajib diisi"))]
    pub nrp: String,

    /// Plaintext password, sent over the wire as-is
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_department_major", skip_on_field_errors = true))]
pub struct RegisterRequest {
    /// Full name
    #[validate(length(min = 1, max = 255, message = "Nama wajib diisi"))]
    pub name: String,

    /// Student register number
    #[validate(length(min = 1, max = 50, message = "NRP wajib diisi"))]
    pub nrp: String,

    /// Department, must exist in the catalogue
    #[validate(length(min = 1, message = "Departemen wajib dipilih"))]
    pub department: String,

    /// Major, must belong to `department`
    #[validate(length(min = 1, message = "Jurusan wajib dipilih"))]
    pub major: String,

    /// Year the student enrolled
    #[validate(range(min = 1950, max = 2100, message = "Tahun masuk tidak valid"))]
    pub year_entry: i32,

    /// Plaintext password
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}

fn validate_department_major(request: &RegisterRequest) -> Result<(), ValidationError> {
    if crate::departments::is_valid_major(&request.department, &request.major) {
        Ok(())
    } else {
        let mut err = ValidationError::new("department_major");
        err.message = Some("Jurusan tidak terdaftar pada departemen ini".into());
        Err(err)
    }
}

/// Default start time offered by the booking forms
pub const DEFAULT_START_TIME: &str = "08:00";

/// Default end time offered by the booking forms
pub const DEFAULT_END_TIME: &str = "10:00";

/// Default purpose used when an administrator books on behalf of a student
pub const ADMIN_DEFAULT_PURPOSE: &str = "Kegiatan Akademik / Admin";

/// Body of `POST /bookings`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_booking_window", skip_on_field_errors = true))]
pub struct CreateBookingRequest {
    /// User the booking is for
    pub user_id: UserId,

    /// Room to book
    pub room_id: RoomId,

    /// `YYYY-MM-DD`
    #[validate(length(min = 1, message = "Tanggal wajib diisi"))]
    pub booking_date: String,

    /// `HH:MM`
    #[validate(length(min = 1, message = "Jam mulai wajib diisi"))]
    pub start_time: String,

    /// `HH:MM`
    #[validate(length(min = 1, message = "Jam selesai wajib diisi"))]
    pub end_time: String,

    /// Reason for the booking
    #[serde(default)]
    pub purpose: String,
}

fn validate_booking_window(request: &CreateBookingRequest) -> Result<(), ValidationError> {
    let invalid = |code: &'static str, message: &'static str| {
        let mut err = ValidationError::new(code);
        err.message = Some(message.into());
        err
    };

    if crate::utils::parse_date(&request.booking_date).is_none() {
        return Err(invalid("booking_date", "Tanggal harus berformat YYYY-MM-DD"));
    }

    let start = crate::utils::parse_time(&request.start_time)
        .ok_or_else(|| invalid("start_time", "Jam mulai harus berformat HH:MM"))?;
    let end = crate::utils::parse_time(&request.end_time)
        .ok_or_else(|| invalid("end_time", "Jam selesai harus berformat HH:MM"))?;

    if start < end {
        Ok(())
    } else {
        Err(invalid("time_range", "Jam selesai harus setelah jam mulai"))
    }
}
