//! Time slot DTOs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{DailySlotCount, SlotStatus, TimeSlot};

/// Time slot API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeSlotDto {
    pub id: Uuid,
    pub calendar_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// `AVAILABLE` or `BUSY`
    pub status: String,
    pub duration_minutes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TimeSlot> for TimeSlotDto {
    fn from(s: TimeSlot) -> Self {
        let duration_minutes = s.duration_minutes();
        Self {
            id: s.id,
            calendar_id: s.calendar_id,
            start_time: s.start_time,
            end_time: s.end_time,
            status: s.status.as_str().to_string(),
            duration_minutes,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Create time slot request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTimeSlotRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// `AVAILABLE` (default) or `BUSY`
    pub status: Option<String>,
}

/// Update time slot request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTimeSlotRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
}

/// List slots query parameters; the optional date range narrows the page
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSlotsParams {
    /// Inclusive range start (ISO date)
    pub start_date: Option<NaiveDate>,
    /// Inclusive range end (ISO date)
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Date range query parameters (both required)
#[derive(Debug, Deserialize, IntoParams)]
pub struct DateRangeParams {
    /// Inclusive range start (ISO date)
    pub start_date: NaiveDate,
    /// Inclusive range end (ISO date)
    pub end_date: NaiveDate,
}

/// Status change query parameter
#[derive(Debug, Deserialize, IntoParams)]
pub struct SlotStatusParams {
    /// `AVAILABLE` or `BUSY`
    pub status: String,
}

/// Busy slot search across calendar owners
#[derive(Debug, Deserialize, IntoParams)]
pub struct BusySlotsParams {
    /// Comma-separated calendar owner user IDs
    pub user_ids: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Per-day slot count
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailySlotCountDto {
    /// ISO date
    pub date: NaiveDate,
    pub count: u64,
}

impl From<DailySlotCount> for DailySlotCountDto {
    fn from(c: DailySlotCount) -> Self {
        Self {
            date: c.date,
            count: c.count,
        }
    }
}

/// Parse a slot status string, rejecting anything but the two states
pub fn parse_status(s: &str) -> Option<SlotStatus> {
    match s.to_ascii_uppercase().as_str() {
        "AVAILABLE" => Some(SlotStatus::Available),
        "BUSY" => Some(SlotStatus::Busy),
        _ => None,
    }
}

/// Expand an ISO date to the UTC start of that day
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Expand an ISO date to the last microsecond of that day
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    let end_of_day =
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(end_of_day).and_utc()
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(parse_status("available"), Some(SlotStatus::Available));
        assert_eq!(parse_status("BUSY"), Some(SlotStatus::Busy));
        assert_eq!(parse_status("pending"), None);
    }

    #[test]
    fn day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let start = day_start(date);
        let end = day_end(date);
        assert_eq!(start.to_rfc3339(), "2025-06-15T00:00:00+00:00");
        assert!(end > start);
        assert_eq!(end.date_naive(), date);
    }
}
