//! Calendar DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::domain::Calendar;

/// Calendar API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalendarDto {
    pub id: Uuid,
    pub name: String,
    pub user_id: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Calendar> for CalendarDto {
    fn from(c: Calendar) -> Self {
        Self {
            id: c.id,
            name: c.name,
            user_id: c.user_id,
            timezone: c.timezone,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Create calendar request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCalendarRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 64, message = "user_id must be 1-64 characters"))]
    pub user_id: String,
    /// IANA timezone name. Default: UTC
    #[serde(default = "default_timezone")]
    #[validate(length(min = 1, max = 64))]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Update calendar request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCalendarRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub timezone: String,
}

/// List calendars query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCalendarsParams {
    /// Owner filter (required)
    pub user_id: String,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Optional owner check for single-calendar reads
#[derive(Debug, Deserialize, IntoParams)]
pub struct GetCalendarParams {
    pub user_id: Option<String>,
}

/// Calendar count response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalendarCountDto {
    pub user_id: String,
    pub count: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}
