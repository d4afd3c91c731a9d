//! Date bucketing for calendar and timeline views.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};

use crate::models::{Reservation, Room, ROOMS};

/// Reservations grouped by date, each day ordered by start time.
pub fn group_by_date(reservations: &[Reservation]) -> BTreeMap<String, Vec<&Reservation>> {
    let mut days: BTreeMap<String, Vec<&Reservation>> = BTreeMap::new();
    for reservation in reservations {
        days.entry(reservation.date.clone())
            .or_default()
            .push(reservation);
    }
    for day in days.values_mut() {
        sort_by_start(day);
    }
    days
}

/// One row of the room timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomRow<'a> {
    pub room_number: String,
    /// `None` for reservations that name a room outside the fixed list.
    pub room: Option<&'static Room>,
    pub reservations: Vec<&'a Reservation>,
}

/// The timeline for `date`: a row for every known room, in list order, then a
/// row per unknown room number that has bookings that day.
pub fn room_timeline<'a>(reservations: &'a [Reservation], date: &str) -> Vec<RoomRow<'a>> {
    let mut rows: Vec<RoomRow<'a>> = ROOMS
        .iter()
        .map(|room| RoomRow {
            room_number: room.id.to_string(),
            room: Some(room),
            reservations: Vec::new(),
        })
        .collect();
    let mut unknown: BTreeMap<&str, Vec<&'a Reservation>> = BTreeMap::new();

    for reservation in reservations.iter().filter(|r| r.date == date) {
        match rows
            .iter_mut()
            .find(|row| row.room_number == reservation.room_number)
        {
            Some(row) => row.reservations.push(reservation),
            None => unknown
                .entry(reservation.room_number.as_str())
                .or_default()
                .push(reservation),
        }
    }

    rows.extend(unknown.into_iter().map(|(room_number, reservations)| RoomRow {
        room_number: room_number.to_string(),
        room: None,
        reservations,
    }));

    for row in &mut rows {
        sort_by_start(&mut row.reservations);
    }
    rows
}

fn sort_by_start(reservations: &mut [&Reservation]) {
    reservations.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Display form of a date, `YYYY/MM/DD`. Unparseable input is returned as is.
pub fn format_date(date: &str) -> String {
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return day.format("%Y/%m/%d").to_string();
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(date) {
        return at.format("%Y/%m/%d").to_string();
    }
    date.to_string()
}
