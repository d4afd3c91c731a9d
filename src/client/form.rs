//! Reservation form state and client-side validation.
//!
//! Unlike the server, which stops at the first missing field, form validation
//! collects every problem at once. It also checks that the meeting ends after
//! it starts, which the server does not.

use std::collections::BTreeMap;

use crate::models::{Reservation, ReservationInput};

/// A validated form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Date,
    StartTime,
    EndTime,
    RoomNumber,
    Attendees,
    Description,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Date => "date",
            FormField::StartTime => "startTime",
            FormField::EndTime => "endTime",
            FormField::RoomNumber => "roomNumber",
            FormField::Attendees => "attendees",
            FormField::Description => "description",
        }
    }
}

/// Field → message for every failing rule.
pub type FormErrors = BTreeMap<FormField, String>;

/// Which rule set to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationProfile {
    /// Title, date, times and room.
    Basic,
    /// Basic plus non-empty attendees and description.
    #[default]
    Strict,
}

/// Editable reservation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationForm {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub room_number: String,
    attendees: Vec<String>,
    errors: FormErrors,
    profile: ValidationProfile,
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            description: String::new(),
            room_number: String::new(),
            attendees: Vec::new(),
            errors: FormErrors::new(),
            profile: ValidationProfile::default(),
        }
    }
}

impl ReservationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the form for editing an existing reservation.
    pub fn from_reservation(reservation: &Reservation) -> Self {
        Self {
            title: reservation.title.clone(),
            date: reservation.date.clone(),
            start_time: reservation.start_time.clone(),
            end_time: reservation.end_time.clone(),
            description: reservation.description.clone().unwrap_or_default(),
            room_number: reservation.room_number.clone(),
            attendees: reservation
                .attendees
                .as_ref()
                .map(|a| a.names())
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn with_profile(mut self, profile: ValidationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Pre-select a date, e.g. from a calendar click.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Pre-select a start time; the end moves to the following full hour.
    pub fn with_start_time(mut self, time: impl Into<String>) -> Self {
        self.start_time = time.into();
        let start_hour = self
            .start_time
            .split(':')
            .next()
            .and_then(|h| h.trim().parse::<u32>().ok());
        if let Some(hour) = start_hour {
            self.end_time = format!("{:02}:00", (hour + 1) % 24);
        }
        self
    }

    pub fn attendee_list(&self) -> &[String] {
        &self.attendees
    }

    /// Attendees as the comma-joined string shown in the form.
    pub fn attendees(&self) -> String {
        self.attendees.join(", ")
    }

    /// Add a name. Blank names and duplicates are ignored.
    pub fn add_attendee(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.attendees.iter().any(|a| a == name) {
            return false;
        }
        self.attendees.push(name.to_string());
        true
    }

    pub fn remove_attendee(&mut self, index: usize) -> Option<String> {
        (index < self.attendees.len()).then(|| self.attendees.remove(index))
    }

    /// Candidates not yet chosen whose name contains `query`, ignoring case.
    pub fn attendee_suggestions<'a>(&self, candidates: &[&'a str], query: &str) -> Vec<&'a str> {
        let query = query.to_lowercase();
        candidates
            .iter()
            .copied()
            .filter(|c| !self.attendees.iter().any(|a| a == c))
            .filter(|c| c.to_lowercase().contains(&query))
            .collect()
    }

    /// Run every rule for the form's profile.
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if self.title.trim().is_empty() {
            errors.insert(FormField::Title, "Meeting title is required".to_string());
        }
        if self.date.is_empty() {
            errors.insert(FormField::Date, "Date is required".to_string());
        }
        if self.start_time.is_empty() {
            errors.insert(FormField::StartTime, "Start time is required".to_string());
        }
        if self.end_time.is_empty() {
            errors.insert(FormField::EndTime, "End time is required".to_string());
        }
        // HH:MM strings compare correctly as text.
        if self.start_time >= self.end_time {
            errors.insert(
                FormField::EndTime,
                "End time must be after start time".to_string(),
            );
        }
        if self.room_number.is_empty() {
            errors.insert(FormField::RoomNumber, "Room number is required".to_string());
        }

        if self.profile == ValidationProfile::Strict {
            if self.attendees().trim().is_empty() {
                errors.insert(
                    FormField::Attendees,
                    "At least one attendee is required".to_string(),
                );
            }
            if self.description.trim().is_empty() {
                errors.insert(FormField::Description, "Description is required".to_string());
            }
        }

        errors
    }

    /// Whether the required fields are filled in. Does not check time order.
    pub fn is_complete(&self) -> bool {
        [
            &self.title,
            &self.date,
            &self.start_time,
            &self.end_time,
            &self.room_number,
        ]
        .iter()
        .all(|value| !value.is_empty())
    }

    /// Errors from the last [`submit`](Self::submit).
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Validate and, if nothing fails, return the payload to send.
    pub fn submit(&mut self) -> Option<ReservationInput> {
        self.errors = self.validate();
        if self.errors.is_empty() {
            Some(self.to_input())
        } else {
            None
        }
    }

    /// API payload: attendees as a list, `roomId` mirroring `roomNumber`.
    pub fn to_input(&self) -> ReservationInput {
        ReservationInput {
            title: self.title.clone(),
            date: self.date.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            room_number: self.room_number.clone(),
            room_id: Some(self.room_number.clone()),
            attendees: self.attendees.clone(),
            description: Some(self.description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attendees;
    use serde_json::Map;

    fn filled() -> ReservationForm {
        let mut form = ReservationForm::new().with_date("2024-01-10");
        form.title = "Standup".to_string();
        form.start_time = "09:00".to_string();
        form.end_time = "09:15".to_string();
        form.room_number = "101".to_string();
        form.description = "Daily sync".to_string();
        form.add_attendee("Alice");
        form
    }

    #[test]
    fn test_filled_form_is_valid() {
        let mut form = filled();
        assert!(form.validate().is_empty());
        assert!(form.is_complete());

        let input = form.submit().unwrap();
        assert_eq!(input.room_id.as_deref(), Some("101"));
        assert_eq!(input.attendees, vec!["Alice"]);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut form = ReservationForm::new();
        form.date = String::new();
        form.room_number = String::new();

        let errors = form.validate();

        assert!(errors.contains_key(&FormField::Title));
        assert!(errors.contains_key(&FormField::Date));
        assert!(errors.contains_key(&FormField::RoomNumber));
        assert!(errors.contains_key(&FormField::Attendees));
        assert!(errors.contains_key(&FormField::Description));
        assert!(!errors.contains_key(&FormField::StartTime));
    }

    #[test]
    fn test_whitespace_title_is_missing() {
        let mut form = filled();
        form.title = "   ".to_string();
        assert_eq!(
            form.validate().get(&FormField::Title).map(String::as_str),
            Some("Meeting title is required")
        );
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let mut form = filled();
        form.start_time = "10:00".to_string();
        form.end_time = "09:00".to_string();

        let errors = form.validate();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&FormField::EndTime], "End time must be after start time");
        // Ordering is not part of the completeness check.
        assert!(form.is_complete());
        assert!(form.submit().is_none());
        assert_eq!(form.errors().len(), 1);
    }

    #[test]
    fn test_equal_times_are_rejected() {
        let mut form = filled();
        form.end_time = form.start_time.clone();
        assert!(form.validate().contains_key(&FormField::EndTime));
    }

    #[test]
    fn test_basic_profile_skips_attendees_and_description() {
        let mut form = filled().with_profile(ValidationProfile::Basic);
        form.description.clear();
        form.remove_attendee(0);

        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_with_start_time_moves_end_to_next_hour() {
        let form = ReservationForm::new().with_start_time("14:30");
        assert_eq!(form.start_time, "14:30");
        assert_eq!(form.end_time, "15:00");

        let form = ReservationForm::new().with_start_time("23:00");
        assert_eq!(form.end_time, "00:00");
    }

    #[test]
    fn test_attendee_editing() {
        let mut form = ReservationForm::new();
        assert!(form.add_attendee(" Alice "));
        assert!(!form.add_attendee("Alice"));
        assert!(!form.add_attendee("  "));
        assert!(form.add_attendee("Bob"));
        assert_eq!(form.attendees(), "Alice, Bob");

        assert_eq!(form.remove_attendee(0).as_deref(), Some("Alice"));
        assert_eq!(form.remove_attendee(5), None);
        assert_eq!(form.attendee_list(), ["Bob".to_string()]);

        let directory = ["Alice Smith", "Bob", "Carol Alison"];
        assert_eq!(
            form.attendee_suggestions(&directory, "ali"),
            vec!["Alice Smith", "Carol Alison"]
        );
        assert_eq!(form.attendee_suggestions(&directory, "bo"), Vec::<&str>::new());
    }

    #[test]
    fn test_from_reservation_accepts_joined_attendees() {
        let reservation = Reservation {
            id: "1".to_string(),
            title: "Planning".to_string(),
            date: "2024-02-01".to_string(),
            start_time: "13:00".to_string(),
            end_time: "14:00".to_string(),
            room_number: "301".to_string(),
            room_id: None,
            attendees: Some(Attendees::Joined("Alice, Bob".to_string())),
            description: None,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
            extra: Map::new(),
        };

        let form = ReservationForm::from_reservation(&reservation);

        assert_eq!(form.attendee_list(), ["Alice".to_string(), "Bob".to_string()]);
        assert_eq!(form.date, "2024-02-01");
        assert_eq!(form.description, "");
    }
}
