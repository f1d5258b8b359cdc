//! Plain-text rendering of listings for the terminal

use chrono::NaiveDateTime;
use roombook_core::classifier::{Stats, display_label};
use roombook_core::utils::date_part;
use roombook_core::{Booking, Room, User};

/// Shown instead of an empty table
pub const EMPTY_LISTING: &str = "Tidak ada data.";

/// Booking table. `with_borrower` adds the borrower column (admin listings).
#[must_use]
pub fn bookings(rows: &[&Booking], now: NaiveDateTime, with_borrower: bool) -> String {
    if rows.is_empty() {
        return format!("{EMPTY_LISTING}\n");
    }

    let header = if with_borrower {
        format!(
            "{:>5}  {:<24} {:<20} {:<10} {:<13} {:<9} Keperluan",
            "ID", "Ruangan", "Peminjam", "Tanggal", "Waktu", "Status"
        )
    } else {
        format!(
            "{:>5}  {:<24} {:<10} {:<13} {:<9} Keperluan",
            "ID", "Ruangan", "Tanggal", "Waktu", "Status"
        )
    };

    let lines = rows.iter().map(|booking| {
        let label = display_label(booking, now);
        let purpose = booking.purpose.as_deref().unwrap_or("-");
        let date = date_part(&booking.date);
        if with_borrower {
            format!(
                "{:>5}  {:<24} {:<20} {:<10} {:<13} {:<9} {purpose}",
                booking.id, booking.room_name, booking.borrower_name, date, booking.time, label
            )
        } else {
            format!(
                "{:>5}  {:<24} {:<10} {:<13} {:<9} {purpose}",
                booking.id, booking.room_name, date, booking.time, label
            )
        }
    });

    table(header, lines)
}

/// Room table
#[must_use]
pub fn rooms(rows: &[Room]) -> String {
    if rows.is_empty() {
        return format!("{EMPTY_LISTING}\n");
    }

    let header = format!("{:>5}  {:<24} {:>9}  Keterangan", "ID", "Ruangan", "Kapasitas");
    let lines = rows.iter().map(|room| {
        format!(
            "{:>5}  {:<24} {:>9}  {}",
            room.id,
            room.name,
            room.capacity,
            room.description.as_deref().unwrap_or("-")
        )
    });

    table(header, lines)
}

fn table(header: String, lines: impl Iterator<Item = String>) -> String {
    std::iter::once(header)
        .chain(lines)
        .map(|line| line + "\n")
        .collect()
}

/// Admin dashboard counters
#[must_use]
pub fn stats(stats: &Stats) -> String {
    format!(
        "Menunggu persetujuan: {}\nDisetujui hari ini:   {}\nDitolak:              {}\n",
        stats.total_pending, stats.today_approved, stats.total_rejected
    )
}

/// Profile of the logged-in user
#[must_use]
pub fn user(user: &User) -> String {
    format!(
        "{} ({})\nNRP:     {}\nJurusan: {}\nProdi:   {}\n",
        user.name, user.role, user.nrp, user.department, user.major
    )
}
