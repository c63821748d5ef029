//! Meeting DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::domain::Meeting;

/// Meeting API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeetingDto {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub participants: Vec<String>,
    pub time_slot_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Meeting> for MeetingDto {
    fn from(m: Meeting) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            participants: m.participants,
            time_slot_id: m.time_slot_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Schedule meeting request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScheduleMeetingRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    pub time_slot_id: Uuid,
}

/// Update meeting request; the slot binding cannot change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMeetingRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Add participant request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddParticipantRequest {
    #[validate(length(min = 1, max = 64, message = "participant_id must be 1-64 characters"))]
    pub participant_id: String,
}

/// Meeting search filters; at most one is applied, checked in order
/// participant+range, range, participant, title
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchMeetingsParams {
    pub participant_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive title substring
    pub title: Option<String>,
}

/// Meeting count response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeetingCountDto {
    pub participant_id: String,
    pub count: u64,
}
