//! TimeSlot domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// Minimum slot duration in minutes
pub const MIN_SLOT_MINUTES: i64 = 15;
/// Maximum slot duration in minutes (8 hours)
pub const MAX_SLOT_MINUTES: i64 = 480;

/// Booking status of a time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// Open for booking
    Available,
    /// Claimed by a meeting
    Busy,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Busy => "BUSY",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "BUSY" => Self::Busy,
            _ => Self::Available,
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bookable interval inside one calendar.
///
/// Intervals are half-open `[start_time, end_time)`: a slot ending exactly
/// when another starts does not overlap it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlot {
    /// Unique slot ID
    pub id: Uuid,
    /// Owning calendar ID
    pub calendar_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(calendar_id: Uuid, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            calendar_id,
            start_time,
            end_time,
            status: SlotStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    /// Half-open interval intersection with another slot.
    /// Touching endpoints do not count as overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }

    /// Whether this slot lies fully within `[start, end]` (inclusive
    /// containment, used by the range queries).
    pub fn within_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time >= start && self.end_time <= end
    }

    /// Interval validation shared by create and update:
    /// start before end, start not in the past, duration within bounds.
    pub fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<()> {
        if start >= end {
            return Err(DomainError::InvalidArgument(
                "Start time must be before end time".into(),
            ));
        }
        if start < Utc::now() {
            return Err(DomainError::InvalidArgument(
                "Cannot create time slot in the past".into(),
            ));
        }
        let minutes = (end - start).num_minutes();
        if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&minutes) {
            return Err(DomainError::InvalidArgument(
                "Time slot duration must be between 15 minutes and 8 hours".into(),
            ));
        }
        Ok(())
    }
}

/// Per-day slot count for a calendar, produced by the daily stats query
#[derive(Debug, Clone, PartialEq)]
pub struct DailySlotCount {
    pub date: chrono::NaiveDate,
    pub count: u64,
}

// ── Tests ──────────────────────────────────────────────────────
