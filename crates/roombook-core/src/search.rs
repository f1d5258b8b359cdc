//! Free-text search over booking listings.
//!
//! The query is literal text: it is lower-cased and tested as a substring
//! against the room name, the borrower name (admin listings only) and a set of
//! human-readable renderings of the booking date.

use crate::types::Booking;
use crate::utils::date_part;

/// Which fields a listing exposes to search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Student listings: room and date only
    #[default]
    Student,
    /// Admin listings: borrower name as well
    Admin,
}

/// Alternate renderings of a `YYYY-MM-DD` date a user might type.
///
/// Yields the ISO date, `DD/MM/YYYY`, `DD-MM-YYYY`, `MM/YYYY`, and the bare
/// year, month and day. A date that does not split into three parts only
/// yields itself.
#[must_use]
pub fn date_forms(date: &str) -> Vec<String> {
    let iso = date_part(date);
    let mut parts = iso.split('-');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day)) => vec![
            iso.to_string(),
            format!("{day}/{month}/{year}"),
            format!("{day}-{month}-{year}"),
            format!("{month}/{year}"),
            year.to_string(),
            month.to_string(),
            day.to_string(),
        ],
        _ => vec![iso.to_string()],
    }
}

/// Whether `booking` matches `query` within `scope`
#[must_use]
pub fn matches(booking: &Booking, query: &str, scope: SearchScope) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    if booking.room_name.to_lowercase().contains(&needle) {
        return true;
    }

    if scope == SearchScope::Admin && booking.borrower_name.to_lowercase().contains(&needle) {
        return true;
    }

    date_forms(&booking.date)
        .iter()
        .any(|form| form.to_lowercase().contains(&needle))
}

/// Keep the bookings of a listing that match `query`
#[must_use]
pub fn filter<'a>(bookings: &[&'a Booking], query: &str, scope: SearchScope) -> Vec<&'a Booking> {
    bookings
        .iter()
        .copied()
        .filter(|b| matches(b, query, scope))
        .collect()
}
