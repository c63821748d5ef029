//! Calendar domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user-owned calendar. `(user_id, name)` pairs are unique; a calendar
/// owns zero or more time slots and deleting it cascades to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    /// Unique calendar ID
    pub id: Uuid,
    /// Display name, unique per user
    pub name: String,
    /// Owning user ID
    pub user_id: String,
    /// Timezone identifier (stored, not interpreted)
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Calendar {
    pub fn new(name: impl Into<String>, user_id: impl Into<String>, timezone: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            user_id: user_id.into(),
            timezone: timezone.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update: name and timezone only, per the API contract.
    pub fn apply_update(&mut self, name: impl Into<String>, timezone: impl Into<String>) {
        self.name = name.into();
        self.timezone = timezone.into();
        self.updated_at = Utc::now();
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_calendar_gets_fresh_id_and_timestamps() {
        let a = Calendar::new("Work", "u1", "Europe/Berlin");
        let b = Calendar::new("Work", "u1", "Europe/Berlin");
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn apply_update_overwrites_name_and_timezone() {
        let mut c = Calendar::new("Work", "u1", "UTC");
        c.apply_update("Personal", "Asia/Tashkent");
        assert_eq!(c.name, "Personal");
        assert_eq!(c.timezone, "Asia/Tashkent");
        assert!(c.updated_at >= c.created_at);
    }
}
