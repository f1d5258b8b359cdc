//! Dashboards and booking mutations for the logged-in user.
//!
//! A [`BookingPortal`] is built from the session principal once per command.
//! Every listing is an explicit refetch of `GET /bookings`; nothing is cached
//! between calls.

use chrono::NaiveDateTime;
use roombook_core::autofill::{AutoFill, names_match};
use roombook_core::classifier::{self, Bucket, Classification, Stats};
use roombook_core::search::{self, SearchScope};
use roombook_core::types::{
    ADMIN_DEFAULT_PURPOSE, BookingId, CreateBookingRequest, DEFAULT_END_TIME, DEFAULT_START_TIME,
    RoomId, UserId,
};
use roombook_core::{Booking, BookingStatus, Room, User};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::api_client::BookingApi;
use crate::error::{ClientError, ClientResult};

/// Fields of the booking form, before the borrower is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    /// Room to book
    pub room_id: RoomId,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    /// Reason for the booking
    pub purpose: String,
}

impl BookingDraft {
    /// Draft with the form's default times and an empty purpose
    pub fn new(room_id: RoomId, date: impl Into<String>) -> Self {
        Self {
            room_id,
            date: date.into(),
            start_time: DEFAULT_START_TIME.to_string(),
            end_time: DEFAULT_END_TIME.to_string(),
            purpose: String::new(),
        }
    }

    /// Draft as pre-filled on the admin form
    pub fn for_admin(room_id: RoomId, date: impl Into<String>) -> Self {
        Self {
            purpose: ADMIN_DEFAULT_PURPOSE.to_string(),
            ..Self::new(room_id, date)
        }
    }

    /// Set the time window
    #[must_use]
    pub fn with_times(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = start.into();
        self.end_time = end.into();
        self
    }

    /// Set the purpose
    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    /// Request body for `user_id`
    #[must_use]
    pub fn into_request(self, user_id: UserId) -> CreateBookingRequest {
        CreateBookingRequest {
            user_id,
            room_id: self.room_id,
            booking_date: self.date.trim().to_string(),
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            purpose: self.purpose.trim().to_string(),
        }
    }
}

/// Snapshot behind the student dashboard
#[derive(Debug, Clone)]
pub struct StudentDashboard {
    user_name: String,
    bookings: Vec<Booking>,
    now: NaiveDateTime,
}

impl StudentDashboard {
    /// Instant the dashboard was classified at
    #[must_use]
    pub const fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Campus-wide schedule, every borrower
    #[must_use]
    pub fn public_schedule(&self) -> Vec<&Booking> {
        classifier::public_schedule(&self.bookings, self.now)
    }

    /// Public schedule narrowed by a search query
    #[must_use]
    pub fn search_schedule(&self, query: &str) -> Vec<&Booking> {
        search::filter(&self.public_schedule(), query, SearchScope::Student)
    }

    /// The principal's own bookings, bucketed
    #[must_use]
    pub fn mine(&self) -> Classification<'_> {
        classifier::classify_for(&self.bookings, &self.user_name, self.now)
    }

    /// One tab of the principal's bookings narrowed by a search query
    #[must_use]
    pub fn search_tab(&self, bucket: Bucket, query: &str) -> Vec<&Booking> {
        search::filter(self.mine().tab(bucket), query, SearchScope::Student)
    }
}

/// Snapshot behind the admin dashboard
#[derive(Debug, Clone)]
pub struct AdminDashboard {
    bookings: Vec<Booking>,
    now: NaiveDateTime,
}

impl AdminDashboard {
    /// Instant the dashboard was classified at
    #[must_use]
    pub const fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Every booking, bucketed
    #[must_use]
    pub fn classification(&self) -> Classification<'_> {
        classifier::classify(&self.bookings, self.now)
    }

    /// Header counters
    #[must_use]
    pub fn stats(&self) -> Stats {
        classifier::stats(&self.bookings, self.now)
    }

    /// One tab narrowed by a search query, borrower names included
    #[must_use]
    pub fn search_tab(&self, bucket: Bucket, query: &str) -> Vec<&Booking> {
        search::filter(self.classification().tab(bucket), query, SearchScope::Admin)
    }
}

/// Lookup data for the admin booking form
#[derive(Debug, Clone, Default)]
pub struct AdminFormData {
    /// Bookable rooms
    pub rooms: Vec<Room>,
    /// Candidate borrowers for auto-fill
    pub users: Vec<User>,
}

/// Held while a mutation is running
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> ClientResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Operations available to the session principal
#[derive(Debug)]
pub struct BookingPortal<A> {
    api: A,
    user: User,
    in_flight: AtomicBool,
}

impl<A: BookingApi> BookingPortal<A> {
    /// Portal acting as `user`
    pub const fn new(api: A, user: User) -> Self {
        Self {
            api,
            user,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Session principal
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Underlying backend
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    fn require_admin(&self) -> ClientResult<()> {
        if self.user.role.is_admin() {
            Ok(())
        } else {
            Err(ClientError::Forbidden)
        }
    }

    fn begin(&self) -> ClientResult<InFlight<'_>> {
        InFlight::acquire(&self.in_flight)
    }

    /// Fetch bookings and build the student dashboard
    ///
    /// # Errors
    ///
    /// Returns an error if the booking list cannot be fetched.
    #[instrument(skip(self), fields(user = %self.user.name))]
    pub async fn student_dashboard(&self, now: NaiveDateTime) -> ClientResult<StudentDashboard> {
        let bookings = self.api.bookings().await?;
        Ok(StudentDashboard {
            user_name: self.user.name.clone(),
            bookings,
            now,
        })
    }

    /// Fetch bookings and build the admin dashboard
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, or an error if the fetch fails.
    #[instrument(skip(self), fields(user = %self.user.name))]
    pub async fn admin_dashboard(&self, now: NaiveDateTime) -> ClientResult<AdminDashboard> {
        self.require_admin()?;
        let bookings = self.api.bookings().await?;
        Ok(AdminDashboard { bookings, now })
    }

    /// Rooms for the student booking form
    ///
    /// # Errors
    ///
    /// Returns an error if the room list cannot be fetched.
    pub async fn booking_form(&self) -> ClientResult<Vec<Room>> {
        self.api.rooms().await
    }

    /// Rooms and users for the admin booking form, fetched together. If either
    /// request fails neither result is used.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, or the first fetch error.
    pub async fn admin_booking_form(&self) -> ClientResult<AdminFormData> {
        self.require_admin()?;
        let (rooms, users) = tokio::try_join!(self.api.rooms(), self.api.users())?;
        Ok(AdminFormData { rooms, users })
    }

    /// Book a room for the principal. New bookings start `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `Busy` while another mutation runs, a validation error for a
    /// malformed draft, or the backend's rejection.
    #[instrument(skip_all, fields(user = %self.user.name, room_id = draft.room_id))]
    pub async fn submit_booking(&self, draft: BookingDraft) -> ClientResult<()> {
        let _guard = self.begin()?;
        let request = draft.into_request(self.user.id);
        request.validate()?;

        self.api.create_booking(&request).await?;
        info!(date = %request.booking_date, "booking submitted");
        Ok(())
    }

    /// Withdraw one of the principal's own pending bookings
    ///
    /// # Errors
    ///
    /// Returns a local error when the booking is missing, not owned by the
    /// principal, or no longer pending; otherwise the backend's rejection.
    #[instrument(skip(self), fields(user = %self.user.name))]
    pub async fn cancel_booking(&self, id: BookingId) -> ClientResult<()> {
        let _guard = self.begin()?;
        let bookings = self.api.bookings().await?;
        let booking = bookings
            .iter()
            .find(|b| b.id == id)
            .ok_or(ClientError::BookingNotFound { id })?;

        if !classifier::is_owned_by(booking, &self.user.name) {
            return Err(ClientError::Precondition(
                "Hanya peminjam yang dapat membatalkan booking ini.".to_string(),
            ));
        }
        if booking.status != BookingStatus::Pending {
            return Err(ClientError::NotPending {
                id,
                status: booking.status,
            });
        }

        self.api.delete_booking(id).await?;
        info!(id, "booking cancelled");
        Ok(())
    }

    /// Approve or reject a pending booking
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, a local error when `status` is not
    /// a decision or the booking is not pending, or the backend's rejection.
    #[instrument(skip(self), fields(user = %self.user.name))]
    pub async fn review(&self, id: BookingId, status: BookingStatus) -> ClientResult<()> {
        self.require_admin()?;
        if !status.is_terminal() {
            return Err(ClientError::Precondition(format!(
                "Status {status} bukan keputusan yang valid."
            )));
        }

        let _guard = self.begin()?;
        let bookings = self.api.bookings().await?;
        let booking = bookings
            .iter()
            .find(|b| b.id == id)
            .ok_or(ClientError::BookingNotFound { id })?;
        if booking.status != BookingStatus::Pending {
            return Err(ClientError::NotPending {
                id,
                status: booking.status,
            });
        }

        self.api.update_status(id, status).await?;
        info!(id, %status, "booking reviewed");
        Ok(())
    }

    /// Book on behalf of the auto-filled user and approve it straight away.
    ///
    /// The create call does not return the new booking, so the list is
    /// refetched and the newest pending booking of the target is approved.
    /// Returns its id, or `None` when no such booking shows up; the created
    /// booking then stays pending.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, a local error when no target is
    /// resolved or the draft is invalid, or the first backend failure.
    #[instrument(skip_all, fields(user = %self.user.name, room_id = draft.room_id))]
    pub async fn book_on_behalf(
        &self,
        autofill: &AutoFill,
        draft: BookingDraft,
    ) -> ClientResult<Option<BookingId>> {
        self.require_admin()?;
        let target = autofill
            .target()
            .ok_or_else(|| ClientError::Precondition("User tidak ditemukan!".to_string()))?;

        let _guard = self.begin()?;
        let request = draft.into_request(target.id);
        request.validate()?;
        self.api.create_booking(&request).await?;

        let bookings = self.api.bookings().await?;
        let newest = bookings
            .iter()
            .filter(|b| {
                b.status == BookingStatus::Pending && names_match(&b.borrower_name, &target.name)
            })
            .max_by_key(|b| b.id)
            .map(|b| b.id);

        let Some(id) = newest else {
            warn!(target = %target.name, "created booking not found, left pending");
            return Ok(None);
        };

        self.api.update_status(id, BookingStatus::Approved).await?;
        info!(id, target = %target.name, "booking created and approved");
        Ok(Some(id))
    }
}
