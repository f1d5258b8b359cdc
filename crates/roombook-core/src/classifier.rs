//! Booking classification shared by the student and admin dashboards.
//!
//! Every function here is pure: the current wall-clock time is passed in as
//! `now` and bookings are only read. Malformed dates or times never abort a
//! classification; such a booking is treated as not yet expired and lands in
//! whichever bucket its status dictates.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::types::{Booking, BookingStatus, DisplayLabel, Lifecycle};
use crate::utils::{date_part, format_date, parse_local_datetime, resolve_end_time};

/// Whether a booking ending at `date` + end time lies strictly before `now`.
///
/// The end time is `end_time` when given, otherwise the second half of a
/// `"HH:MM - HH:MM"` `time_range`. Returns `false` when the date is empty, no
/// end time can be resolved, or anything fails to parse.
#[must_use]
pub fn is_expired(date: &str, end_time: Option<&str>, time_range: &str, now: NaiveDateTime) -> bool {
    if date.trim().is_empty() {
        return false;
    }

    let Some(end) = resolve_end_time(end_time, time_range) else {
        return false;
    };

    match parse_local_datetime(date, end) {
        Some(booking_end) => now > booking_end,
        None => {
            debug!(date, end_time = end, "unparseable booking end, treating as not expired");
            false
        }
    }
}

/// [`is_expired`] applied to a booking's own fields
#[must_use]
pub fn booking_is_expired(booking: &Booking, now: NaiveDateTime) -> bool {
    is_expired(&booking.date, booking.end_time.as_deref(), &booking.time, now)
}

/// Dashboard tab a booking belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Pending, or approved and not yet over
    Active,
    /// Approved and over
    History,
    /// Declined
    Rejected,
}

impl Bucket {
    /// Presentation lifecycle; rejected bookings have none
    #[must_use]
    pub const fn lifecycle(self) -> Option<Lifecycle> {
        match self {
            Self::Active => Some(Lifecycle::Active),
            Self::History => Some(Lifecycle::Completed),
            Self::Rejected => None,
        }
    }
}

/// Place a single booking in its bucket
#[must_use]
pub fn bucket(booking: &Booking, now: NaiveDateTime) -> Bucket {
    match booking.status {
        BookingStatus::Pending => Bucket::Active,
        BookingStatus::Approved if booking_is_expired(booking, now) => Bucket::History,
        BookingStatus::Approved => Bucket::Active,
        BookingStatus::Rejected => Bucket::Rejected,
    }
}

/// Label to render for a booking. `Completed` ("Selesai") is produced exactly
/// for the bookings that [`bucket`] puts in [`Bucket::History`].
#[must_use]
pub fn display_label(booking: &Booking, now: NaiveDateTime) -> DisplayLabel {
    match (bucket(booking, now).lifecycle(), booking.status) {
        (Some(Lifecycle::Completed), _) => DisplayLabel::Completed,
        (None, _) => DisplayLabel::Rejected,
        (Some(Lifecycle::Active), BookingStatus::Approved) => DisplayLabel::Approved,
        (Some(Lifecycle::Active), _) => DisplayLabel::Pending,
    }
}

/// Ownership test between a booking and the logged-in user's name.
///
/// Names are compared case-insensitively, the same policy the auto-fill
/// lookup uses.
#[must_use]
pub fn is_owned_by(booking: &Booking, user_name: &str) -> bool {
    crate::autofill::names_match(&booking.borrower_name, user_name)
}

/// Bookings split into the three dashboard tabs, borrowed from the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Pending, or approved and not over
    pub active: Vec<&'a Booking>,
    /// Approved and over
    pub history: Vec<&'a Booking>,
    /// Declined
    pub rejected: Vec<&'a Booking>,
}

impl<'a> Classification<'a> {
    /// Bucket every booking yielded by `bookings`, preserving input order
    pub fn from_iter_at<I>(bookings: I, now: NaiveDateTime) -> Self
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        let mut out = Self::default();
        for booking in bookings {
            match bucket(booking, now) {
                Bucket::Active => out.active.push(booking),
                Bucket::History => out.history.push(booking),
                Bucket::Rejected => out.rejected.push(booking),
            }
        }
        out
    }

    /// Bookings of one tab
    #[must_use]
    pub fn tab(&self, bucket: Bucket) -> &[&'a Booking] {
        match bucket {
            Bucket::Active => &self.active,
            Bucket::History => &self.history,
            Bucket::Rejected => &self.rejected,
        }
    }

    /// Number of classified bookings
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len() + self.history.len() + self.rejected.len()
    }

    /// Whether no booking was classified
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify the whole booking set (admin view)
#[must_use]
pub fn classify(bookings: &[Booking], now: NaiveDateTime) -> Classification<'_> {
    Classification::from_iter_at(bookings, now)
}

/// Classify only the bookings owned by `user_name` (student view)
#[must_use]
pub fn classify_for<'a>(
    bookings: &'a [Booking],
    user_name: &str,
    now: NaiveDateTime,
) -> Classification<'a> {
    Classification::from_iter_at(
        bookings.iter().filter(|b| is_owned_by(b, user_name)),
        now,
    )
}

/// Campus-wide schedule: pending or approved bookings that are not over, from
/// every borrower
#[must_use]
pub fn public_schedule(bookings: &[Booking], now: NaiveDateTime) -> Vec<&Booking> {
    bookings
        .iter()
        .filter(|b| {
            matches!(b.status, BookingStatus::Approved | BookingStatus::Pending)
                && !booking_is_expired(b, now)
        })
        .collect()
}

/// Counters shown on the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Bookings awaiting review
    pub total_pending: usize,
    /// Approved bookings dated today
    pub today_approved: usize,
    /// Declined bookings
    pub total_rejected: usize,
}

/// Aggregate counters over the whole, unscoped booking set.
///
/// "Today" is the calendar date of `now`; a booking counts when its date
/// (without any `T...` suffix) equals it exactly.
#[must_use]
pub fn stats(bookings: &[Booking], now: NaiveDateTime) -> Stats {
    let today = format_date(now.date());

    bookings.iter().fold(Stats::default(), |mut acc, b| {
        match b.status {
            BookingStatus::Pending => acc.total_pending += 1,
            BookingStatus::Approved if date_part(&b.date) == today => acc.today_approved += 1,
            BookingStatus::Approved => {}
            BookingStatus::Rejected => acc.total_rejected += 1,
        }
        acc
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        parse_local_datetime(date, time).unwrap()
    }

    fn booking(id: i64, owner: &str, date: &str, time: &str, status: BookingStatus) -> Booking {
        Booking {
            id,
            room_name: format!("Ruang {id}"),
            borrower_name: owner.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            start_time: None,
            end_time: None,
            status,
            purpose: None,
        }
    }

    #[rstest]
    #[case("09:59", false)]
    #[case("10:00", false)]
    #[case("10:01", true)]
    fn test_expiry_boundary(#[case] now: &str, #[case] expired: bool) {
        let now = at("2024-05-10", now);
        assert_eq!(is_expired("2024-05-10", Some("10:00"), "", now), expired);
    }

    #[test]
    fn test_expiry_exactly_at_end_with_seconds_is_expired() {
        let now = at("2024-05-10", "10:00") + chrono::Duration::seconds(1);
        assert!(is_expired("2024-05-10", Some("10:00"), "", now));
    }

    #[test]
    fn test_empty_date_never_expires() {
        let now = at("2099-01-01", "00:00");
        assert!(!is_expired("", Some("10:00"), "08:00 - 10:00", now));
        assert!(!is_expired("   ", Some("10:00"), "08:00 - 10:00", now));
    }

    #[test]
    fn test_unresolvable_end_never_expires() {
        let now = at("2099-01-01", "00:00");
        assert!(!is_expired("2024-05-10", None, "", now));
        assert!(!is_expired("2024-05-10", None, "08:00-10:00", now));
        assert!(!is_expired("2024-05-10", Some(""), "pagi", now));
    }

    #[test]
    fn test_end_recovered_from_time_range() {
        let now = at("2024-05-10", "10:30");
        assert!(is_expired("2024-05-10", None, "08:00 - 10:00", now));
        assert!(!is_expired("2024-05-10", None, "08:00 - 11:00", now));
    }

    #[test]
    fn test_date_with_time_suffix_is_stripped() {
        let now = at("2024-05-10", "10:30");
        assert!(is_expired("2024-05-10T00:00:00", Some("10:00"), "", now));
    }

    #[rstest]
    #[case("2024-xx-10", "10:00")]
    #[case("2024-05-10", "ten")]
    #[case("2024-02-31", "10:00")]
    #[case("2024-05-10", "25:00")]
    fn test_malformed_values_are_not_expired(#[case] date: &str, #[case] end: &str) {
        let now = at("2099-01-01", "00:00");
        assert!(!is_expired(date, Some(end), "", now));
    }

    #[test]
    fn test_five_record_classification() {
        let now = at("2024-05-10", "12:00");
        let bookings = vec![
            booking(1, "Alice", "2024-05-11", "08:00 - 10:00", BookingStatus::Pending),
            booking(2, "Alice", "2024-05-09", "08:00 - 10:00", BookingStatus::Pending),
            booking(3, "Alice", "2024-05-09", "08:00 - 10:00", BookingStatus::Approved),
            booking(4, "Alice", "2024-05-10", "13:00 - 15:00", BookingStatus::Approved),
            booking(5, "Alice", "2024-05-12", "08:00 - 10:00", BookingStatus::Rejected),
        ];

        let classes = classify_for(&bookings, "Alice", now);

        assert_eq!(classes.active.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(classes.history.iter().map(|b| b.id).collect::<Vec<_>>(), vec![3]);
        assert_eq!(classes.rejected.iter().map(|b| b.id).collect::<Vec<_>>(), vec![5]);
        assert_eq!(classes.len(), 5);
    }

    #[test]
    fn test_expired_pending_stays_active() {
        let now = at("2024-05-10", "12:00");
        let b = booking(1, "Alice", "2024-01-01", "08:00 - 10:00", BookingStatus::Pending);
        assert_eq!(bucket(&b, now), Bucket::Active);
        assert_eq!(display_label(&b, now), DisplayLabel::Pending);
    }

    #[test]
    fn test_user_scope_filters_by_owner() {
        let now = at("2024-05-10", "12:00");
        let bookings = vec![
            booking(1, "Alice", "2024-05-11", "08:00 - 10:00", BookingStatus::Pending),
            booking(2, "Bob", "2024-05-11", "08:00 - 10:00", BookingStatus::Pending),
            booking(3, "ALICE", "2024-05-11", "08:00 - 10:00", BookingStatus::Rejected),
        ];

        let mine = classify_for(&bookings, "alice", now);

        assert_eq!(mine.active.len(), 1);
        assert_eq!(mine.rejected.len(), 1);
        assert!(mine.tab(Bucket::Active).iter().all(|b| b.borrower_name != "Bob"));
    }

    #[test]
    fn test_public_schedule_is_unscoped_and_live() {
        let now = at("2024-05-10", "12:00");
        let bookings = vec![
            booking(1, "Alice", "2024-05-11", "08:00 - 10:00", BookingStatus::Pending),
            booking(2, "Bob", "2024-05-11", "08:00 - 10:00", BookingStatus::Approved),
            booking(3, "Carol", "2024-05-09", "08:00 - 10:00", BookingStatus::Approved),
            booking(4, "Dan", "2024-05-09", "08:00 - 10:00", BookingStatus::Pending),
            booking(5, "Eve", "2024-05-11", "08:00 - 10:00", BookingStatus::Rejected),
        ];

        let ids: Vec<_> = public_schedule(&bookings, now).iter().map(|b| b.id).collect();

        // An expired pending booking drops out of the public schedule even
        // though it stays in its owner's active tab.
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_stats_are_unscoped() {
        let now = at("2024-05-10", "12:00");
        let bookings = vec![
            booking(1, "Alice", "2024-05-11", "08:00 - 10:00", BookingStatus::Pending),
            booking(2, "Bob", "2024-05-11", "08:00 - 10:00", BookingStatus::Pending),
            booking(3, "Carol", "2024-05-10", "08:00 - 10:00", BookingStatus::Approved),
            booking(4, "Dan", "2024-05-10T00:00:00", "13:00 - 15:00", BookingStatus::Approved),
            booking(5, "Eve", "2024-05-09", "08:00 - 10:00", BookingStatus::Approved),
            booking(6, "Eve", "2024-05-10", "08:00 - 10:00", BookingStatus::Rejected),
        ];

        assert_eq!(
            stats(&bookings, now),
            Stats {
                total_pending: 2,
                today_approved: 2,
                total_rejected: 1,
            }
        );
        assert_eq!(classify_for(&bookings, "Alice", now).active.len(), 1);
    }

    #[test]
    fn test_records_with_null_fields_keep_their_bucket() {
        let now = at("2099-01-01", "00:00");
        let bookings: Vec<Booking> = serde_json::from_str(
            r#"[
                {"id": 1, "borrowerName": "Alice", "date": null,
                 "time": "08:00 - 10:00", "status": "Approved"},
                {"id": 2, "borrowerName": "Alice", "date": "2024-05-10",
                 "time": null, "status": "Approved"},
                {"id": 3, "borrowerName": "Alice", "date": null,
                 "time": null, "status": "Rejected"}
            ]"#,
        )
        .unwrap();

        assert!(bookings.iter().all(|b| !booking_is_expired(b, now)));

        let classes = classify(&bookings, now);
        assert_eq!(classes.active.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(classes.history.is_empty());
        assert_eq!(classes.rejected.len(), 1);
        assert_eq!(public_schedule(&bookings, now).len(), 2);
    }

    #[test]
    fn test_bucket_lifecycle() {
        assert_eq!(Bucket::Active.lifecycle(), Some(Lifecycle::Active));
        assert_eq!(Bucket::History.lifecycle(), Some(Lifecycle::Completed));
        assert_eq!(Bucket::Rejected.lifecycle(), None);
    }

    fn arb_status() -> impl Strategy<Value = BookingStatus> {
        prop_oneof![
            Just(BookingStatus::Pending),
            Just(BookingStatus::Approved),
            Just(BookingStatus::Rejected),
        ]
    }

    fn arb_booking() -> impl Strategy<Value = Booking> {
        (
            1i64..1000,
            prop_oneof![Just("Alice"), Just("Bob")],
            prop_oneof![
                (2023i32..2026, 1u32..13, 1u32..29)
                    .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
                Just(String::new()),
                "\\PC{0,12}",
            ],
            prop_oneof![
                (0u32..24, 0u32..60).prop_map(|(h, m)| format!("07:00 - {h:02}:{m:02}")),
                "\\PC{0,12}",
            ],
            arb_status(),
        )
            .prop_map(|(id, owner, date, time, status)| booking_with(id, owner, date, time, status))
    }

    fn booking_with(id: i64, owner: &str, date: String, time: String, status: BookingStatus) -> Booking {
        Booking {
            date,
            time,
            ..booking(id, owner, "", "", status)
        }
    }

    fn arb_now() -> impl Strategy<Value = NaiveDateTime> {
        (2023i32..2026, 1u32..13, 1u32..29, 0u32..24, 0u32..60).prop_map(|(y, m, d, h, min)| {
            NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_rejected_never_public(bookings in proptest::collection::vec(arb_booking(), 0..40), now in arb_now()) {
            for b in public_schedule(&bookings, now) {
                prop_assert_ne!(b.status, BookingStatus::Rejected);
            }
        }

        #[test]
        fn prop_history_and_active_disjoint(bookings in proptest::collection::vec(arb_booking(), 0..40), now in arb_now()) {
            let classes = classify(&bookings, now);
            prop_assert_eq!(classes.len(), bookings.len());
            for b in &classes.history {
                prop_assert!(!classes.active.iter().any(|a| std::ptr::eq(*a, *b)));
                prop_assert_eq!(b.status, BookingStatus::Approved);
                prop_assert!(booking_is_expired(b, now));
            }
        }

        #[test]
        fn prop_completed_label_matches_history(bookings in proptest::collection::vec(arb_booking(), 0..40), now in arb_now()) {
            let classes = classify(&bookings, now);
            for b in &bookings {
                let in_history = classes.history.iter().any(|h| std::ptr::eq(*h, b));
                prop_assert_eq!(display_label(b, now) == DisplayLabel::Completed, in_history);
            }
        }

        #[test]
        fn prop_total_pending_ignores_owner(bookings in proptest::collection::vec(arb_booking(), 0..40), now in arb_now()) {
            let expected = bookings.iter().filter(|b| b.status == BookingStatus::Pending).count();
            prop_assert_eq!(stats(&bookings, now).total_pending, expected);
        }
    }
}
