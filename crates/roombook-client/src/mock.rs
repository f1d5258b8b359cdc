//! In-memory booking backend for tests and offline demos

use async_trait::async_trait;
use roombook_core::types::{
    Booking, BookingId, BookingStatus, CreateBookingRequest, LoginRequest, RegisterRequest, Role,
    Room, User,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api_client::BookingApi;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Default)]
struct MockState {
    rooms: Vec<Room>,
    users: Vec<User>,
    passwords: HashMap<String, String>,
    bookings: Vec<Booking>,
    next_booking_id: BookingId,
    failing: Vec<&'static str>,
    calls: Vec<String>,
}

/// Mock backend that behaves like the real one for the happy paths: new
/// bookings start `Pending`, status updates and deletes apply immediately.
#[derive(Debug, Clone, Default)]
pub struct MockBookingApi {
    state: Arc<Mutex<MockState>>,
}

impl MockBookingApi {
    /// Create an empty mock backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Two rooms, a student `Alice` (NRP `123`, password `alice-pw`), a
    /// student `Bob` (NRP `456`) and an admin (NRP `admin`, password
    /// `admin-pw`); no bookings.
    #[must_use]
    pub fn with_sample_data() -> Self {
        let mock = Self::new()
            .with_room(Room {
                id: 1,
                name: "Lab Jaringan".to_string(),
                capacity: 30,
                description: None,
            })
            .with_room(Room {
                id: 2,
                name: "Aula Pascasarjana".to_string(),
                capacity: 200,
                description: Some("Lantai 3".to_string()),
            });

        mock.with_user(student(1, "Alice", "123"), "alice-pw")
            .with_user(student(2, "Bob", "456"), "bob-pw")
            .with_user(
                User {
                    role: Role::Admin,
                    ..student(99, "Admin Sarpras", "admin")
                },
                "admin-pw",
            )
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a room
    #[must_use]
    pub fn with_room(self, room: Room) -> Self {
        self.lock().rooms.push(room);
        self
    }

    /// Add a user with a login password
    #[must_use]
    pub fn with_user(self, user: User, password: &str) -> Self {
        {
            let mut state = self.lock();
            state.passwords.insert(user.nrp.clone(), password.to_string());
            state.users.push(user);
        }
        self
    }

    /// Seed an existing booking
    #[must_use]
    pub fn with_booking(self, booking: Booking) -> Self {
        {
            let mut state = self.lock();
            state.next_booking_id = state.next_booking_id.max(booking.id);
            state.bookings.push(booking);
        }
        self
    }

    /// Make an endpoint (`"rooms"`, `"users"`, `"bookings"`, `"create"`,
    /// `"status"`, `"delete"`) answer with a server error
    #[must_use]
    pub fn failing(self, endpoint: &'static str) -> Self {
        self.lock().failing.push(endpoint);
        self
    }

    /// Current bookings
    #[must_use]
    pub fn bookings_snapshot(&self) -> Vec<Booking> {
        self.lock().bookings.clone()
    }

    /// Endpoints called so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn enter(&self, endpoint: &'static str) -> ClientResult<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(endpoint.to_string());
        if state.failing.contains(&endpoint) {
            return Err(ClientError::rejected(500, ""));
        }
        Ok(state)
    }
}

fn student(id: i64, name: &str, nrp: &str) -> User {
    User {
        id,
        name: name.to_string(),
        nrp: nrp.to_string(),
        role: Role::Student,
        department: "DTIK (Departemen Teknik Informatika dan Komputer)".to_string(),
        major: "S1 Terapan Teknik Informatika".to_string(),
    }
}

#[async_trait]
impl BookingApi for MockBookingApi {
    async fn login(&self, request: &LoginRequest) -> ClientResult<User> {
        let state = self.enter("login")?;
        let valid = state
            .passwords
            .get(&request.nrp)
            .is_some_and(|pw| *pw == request.password);

        state
            .users
            .iter()
            .find(|u| valid && u.nrp == request.nrp)
            .cloned()
            .ok_or_else(|| ClientError::rejected(401, "Invalid credentials"))
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<()> {
        let mut state = self.enter("register")?;
        if state.users.iter().any(|u| u.nrp == request.nrp) {
            return Err(ClientError::rejected(400, "NRP sudah terdaftar"));
        }

        let id = state.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        state.passwords.insert(request.nrp.clone(), request.password.clone());
        state.users.push(User {
            id,
            name: request.name.clone(),
            nrp: request.nrp.clone(),
            role: Role::Student,
            department: request.department.clone(),
            major: request.major.clone(),
        });
        Ok(())
    }

    async fn rooms(&self) -> ClientResult<Vec<Room>> {
        Ok(self.enter("rooms")?.rooms.clone())
    }

    async fn users(&self) -> ClientResult<Vec<User>> {
        Ok(self.enter("users")?.users.clone())
    }

    async fn bookings(&self) -> ClientResult<Vec<Booking>> {
        Ok(self.enter("bookings")?.bookings.clone())
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<()> {
        let mut state = self.enter("create")?;

        let borrower = state
            .users
            .iter()
            .find(|u| u.id == request.user_id)
            .map(|u| u.name.clone())
            .ok_or_else(|| ClientError::rejected(400, "User tidak ditemukan"))?;
        let room = state
            .rooms
            .iter()
            .find(|r| r.id == request.room_id)
            .map(|r| r.name.clone())
            .ok_or_else(|| ClientError::rejected(400, "Ruangan tidak ditemukan"))?;

        state.next_booking_id += 1;
        let id = state.next_booking_id;
        state.bookings.push(Booking {
            id,
            room_name: room,
            borrower_name: borrower,
            date: request.booking_date.clone(),
            time: format!("{} - {}", request.start_time, request.end_time),
            start_time: Some(request.start_time.clone()),
            end_time: Some(request.end_time.clone()),
            status: BookingStatus::Pending,
            purpose: Some(request.purpose.clone()),
        });
        Ok(())
    }

    async fn update_status(&self, id: BookingId, status: BookingStatus) -> ClientResult<()> {
        let mut state = self.enter("status")?;
        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ClientError::rejected(404, "Booking tidak ditemukan"))?;
        booking.status = status;
        Ok(())
    }

    async fn delete_booking(&self, id: BookingId) -> ClientResult<()> {
        let mut state = self.enter("delete")?;
        let before = state.bookings.len();
        state.bookings.retain(|b| b.id != id);
        if state.bookings.len() == before {
            return Err(ClientError::rejected(404, "Booking tidak ditemukan"));
        }
        Ok(())
    }
}
