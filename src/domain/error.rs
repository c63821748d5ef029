//! Domain error taxonomy
//!
//! Every business-rule violation is raised where it is detected and
//! propagated unmodified to the HTTP boundary, which owns the single
//! translation into status codes (see `interfaces::http::common::error`).

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Calendar '{name}' already exists for user {user_id}")]
    DuplicateCalendar { user_id: String, name: String },

    #[error("Time slot overlaps with an existing slot in calendar {calendar_id}")]
    TimeConflict { calendar_id: Uuid },

    #[error("Time slot {slot_id} is not available for booking")]
    SlotNotAvailable { slot_id: Uuid },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_helper_formats_entity_and_id() {
        let id = Uuid::new_v4();
        let err = DomainError::not_found("Calendar", id);
        let msg = err.to_string();
        assert!(msg.contains("Calendar"));
        assert!(msg.contains(&id.to_string()));
    }

    #[test]
    fn duplicate_calendar_message_names_user_and_name() {
        let err = DomainError::DuplicateCalendar {
            user_id: "u1".into(),
            name: "Work".into(),
        };
        assert_eq!(err.to_string(), "Calendar 'Work' already exists for user u1");
    }
}
