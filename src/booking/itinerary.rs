//! Date sequencer for booking itineraries
//!
//! Keeps `day` and `date` of an ordered itinerary consistent: entry `i` is day
//! `i + 1` and falls exactly `i` days after the anchor date. The anchor is the
//! journey date when one is set, otherwise the date of the first entry.
//!
//! All functions are pure; the booking form owns the list and swaps in the
//! returned value.

use crate::booking::model::{ItineraryEntry, TourDay};
use crate::core::dates::{DATE_FORMAT, add_days, first_of_month, utc_today};
use crate::core::error::{FieldValidationError, PreconditionError};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItineraryError {
    #[error("no itinerary entry at index {index} (itinerary has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<ItineraryError> for PreconditionError {
    fn from(err: ItineraryError) -> Self {
        match err {
            ItineraryError::IndexOutOfRange { index, len } => PreconditionError::IndexOutOfRange {
                list: "itinerary".to_string(),
                index,
                len,
            },
        }
    }
}

impl From<ItineraryError> for crate::core::error::DeskError {
    fn from(err: ItineraryError) -> Self {
        PreconditionError::from(err).into()
    }
}

/// Build an itinerary from a tour's stored days
///
/// Returns an empty itinerary when no start date is known; callers are
/// expected to block seeding before that point.
pub fn seed(start: Option<NaiveDate>, prototypes: &[TourDay]) -> Vec<ItineraryEntry> {
    let Some(start) = start else {
        return Vec::new();
    };

    prototypes
        .iter()
        .enumerate()
        .map(|(i, proto)| ItineraryEntry {
            day: position_to_day(i),
            date: add_days(start, i as u64),
            description: proto.description.clone(),
            location_id: proto.location_id,
        })
        .collect()
}

/// The entry that would follow the current last entry
///
/// On an empty itinerary the new entry is day 1 on the reference date, or on
/// the first day of `today`'s month when there is no reference date.
pub fn append(
    entries: &[ItineraryEntry],
    reference: Option<NaiveDate>,
    today: NaiveDate,
) -> ItineraryEntry {
    let (day, date) = match entries.last() {
        Some(last) => (last.day.saturating_add(1), add_days(last.date, 1)),
        None => (1, reference.unwrap_or_else(|| first_of_month(today))),
    };

    ItineraryEntry {
        day,
        date,
        description: String::new(),
        location_id: None,
    }
}

/// [`append`] against the current UTC date
pub fn append_now(entries: &[ItineraryEntry], reference: Option<NaiveDate>) -> ItineraryEntry {
    append(entries, reference, utc_today())
}

/// Remove one entry and renumber/re-date everything after it
///
/// Dates are walked forward from `reference` when present, otherwise from the
/// original date of the first remaining entry.
pub fn remove_and_resequence(
    entries: &[ItineraryEntry],
    index: usize,
    reference: Option<NaiveDate>,
) -> Result<Vec<ItineraryEntry>, ItineraryError> {
    if index >= entries.len() {
        return Err(ItineraryError::IndexOutOfRange {
            index,
            len: entries.len(),
        });
    }

    let remaining: Vec<ItineraryEntry> = entries
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, entry)| entry.clone())
        .collect();

    let anchor = reference.or_else(|| remaining.first().map(|e| e.date));
    Ok(match anchor {
        Some(anchor) => resequence(remaining, anchor),
        None => remaining,
    })
}

/// Reassign every day number and date from `anchor`
pub fn resequence(mut entries: Vec<ItineraryEntry>, anchor: NaiveDate) -> Vec<ItineraryEntry> {
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.day = position_to_day(i);
        entry.date = add_days(anchor, i as u64);
    }
    entries
}

/// Report every entry that breaks the day/date sequence
///
/// `anchor` defaults to the first entry's date. Errors are keyed by wire path
/// (`bookingDetails[2].date`).
pub fn check_sequence(
    entries: &[ItineraryEntry],
    anchor: Option<NaiveDate>,
) -> Vec<FieldValidationError> {
    let Some(anchor) = anchor.or_else(|| entries.first().map(|e| e.date)) else {
        return Vec::new();
    };

    let mut errors = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let expected_day = position_to_day(i);
        if entry.day != expected_day {
            errors.push(FieldValidationError::new(
                format!("bookingDetails[{}].day", i),
                format!("Expected day {}, found {}", expected_day, entry.day),
            ));
        }

        let expected_date = add_days(anchor, i as u64);
        if entry.date != expected_date {
            errors.push(FieldValidationError::new(
                format!("bookingDetails[{}].date", i),
                format!(
                    "Expected {}, found {}",
                    expected_date.format(DATE_FORMAT),
                    entry.date.format(DATE_FORMAT)
                ),
            ));
        }
    }
    errors
}

fn position_to_day(index: usize) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1))
}
