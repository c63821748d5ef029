//! Meeting domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A meeting bound to exactly one time slot.
///
/// The slot binding is immutable after creation; participants carry set
/// semantics (no duplicates, order preserved by insertion).
#[derive(Debug, Clone, PartialEq)]
pub struct Meeting {
    /// Unique meeting ID
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Participant identifiers, duplicate-free
    pub participants: Vec<String>,
    /// The claimed time slot
    pub time_slot_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meeting {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        participants: Vec<String>,
        time_slot_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        let mut meeting = Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description,
            participants: Vec::new(),
            time_slot_id,
            created_at: now,
            updated_at: now,
        };
        for p in participants {
            meeting.add_participant(p);
        }
        meeting
    }

    /// Add a participant; a no-op when already present
    pub fn add_participant(&mut self, participant_id: impl Into<String>) {
        let participant_id = participant_id.into();
        if !self.participants.contains(&participant_id) {
            self.participants.push(participant_id);
        }
    }

    /// Remove a participant; a no-op when absent
    pub fn remove_participant(&mut self, participant_id: &str) {
        self.participants.retain(|p| p != participant_id);
    }

    pub fn has_participant(&self, participant_id: &str) -> bool {
        self.participants.iter().any(|p| p == participant_id)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meeting() -> Meeting {
        Meeting::new(
            "Standup",
            Some("Daily sync".into()),
            vec!["alice".into(), "bob".into()],
            Uuid::new_v4(),
        )
    }

    #[test]
    fn new_meeting_keeps_participants() {
        let m = sample_meeting();
        assert_eq!(m.participants, vec!["alice", "bob"]);
        assert!(m.has_participant("alice"));
        assert!(!m.has_participant("carol"));
    }

    #[test]
    fn constructor_deduplicates_participants() {
        let m = Meeting::new(
            "Standup",
            None,
            vec!["alice".into(), "alice".into(), "bob".into()],
            Uuid::new_v4(),
        );
        assert_eq!(m.participants, vec!["alice", "bob"]);
    }

    #[test]
    fn add_participant_is_idempotent() {
        let mut m = sample_meeting();
        m.add_participant("alice");
        m.add_participant("carol");
        assert_eq!(m.participants, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn remove_participant_is_idempotent() {
        let mut m = sample_meeting();
        m.remove_participant("bob");
        m.remove_participant("bob");
        assert_eq!(m.participants, vec!["alice"]);
    }
}
