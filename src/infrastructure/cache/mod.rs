//! Explicit read-through cache for the service layer
//!
//! Replaces annotation-driven caching with a component the services call
//! directly, so invalidation ordering relative to the persisted write is
//! visible and testable. Entries are keyed by entity id; availability
//! query results are keyed by `(calendar_id, start, end)`.
//!
//! Invalidation contract: every mutating service path invalidates the
//! affected entries before it returns, so no caller observes a stale
//! AVAILABLE status after a successful schedule.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{Calendar, Meeting, TimeSlot};

type AvailabilityKey = (Uuid, DateTime<Utc>, DateTime<Utc>);

/// Shared cache for all three services
#[derive(Default)]
pub struct ServiceCache {
    calendars: DashMap<Uuid, Calendar>,
    slots: DashMap<Uuid, TimeSlot>,
    meetings: DashMap<Uuid, Meeting>,
    available_slots: DashMap<AvailabilityKey, Vec<TimeSlot>>,
}

impl ServiceCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Calendars ──────────────────────────────────────────────

    pub fn get_calendar(&self, id: Uuid) -> Option<Calendar> {
        self.calendars.get(&id).map(|e| e.clone())
    }

    pub fn put_calendar(&self, calendar: Calendar) {
        self.calendars.insert(calendar.id, calendar);
    }

    /// Drop the calendar entry together with everything cached under it:
    /// its slot entries and its availability results. The meeting cache is
    /// cleared wholesale because meetings do not carry a calendar id.
    pub fn invalidate_calendar_tree(&self, id: Uuid) {
        self.calendars.remove(&id);
        self.slots.retain(|_, slot| slot.calendar_id != id);
        self.available_slots.retain(|(cal, _, _), _| *cal != id);
        self.meetings.clear();
    }

    pub fn invalidate_calendar(&self, id: Uuid) {
        self.calendars.remove(&id);
    }

    // ── Time slots ─────────────────────────────────────────────

    pub fn get_slot(&self, id: Uuid) -> Option<TimeSlot> {
        self.slots.get(&id).map(|e| e.clone())
    }

    pub fn put_slot(&self, slot: TimeSlot) {
        self.slots.insert(slot.id, slot);
    }

    /// Invalidate one slot entry plus all availability results of its
    /// calendar (any of them may contain the slot).
    pub fn invalidate_slot(&self, id: Uuid, calendar_id: Uuid) {
        self.slots.remove(&id);
        self.available_slots.retain(|(cal, _, _), _| *cal != calendar_id);
    }

    // ── Meetings ───────────────────────────────────────────────

    pub fn get_meeting(&self, id: Uuid) -> Option<Meeting> {
        self.meetings.get(&id).map(|e| e.clone())
    }

    pub fn put_meeting(&self, meeting: Meeting) {
        self.meetings.insert(meeting.id, meeting);
    }

    pub fn invalidate_meeting(&self, id: Uuid) {
        self.meetings.remove(&id);
    }

    // ── Availability queries ───────────────────────────────────

    pub fn get_available(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<Vec<TimeSlot>> {
        self.available_slots
            .get(&(calendar_id, start, end))
            .map(|e| e.clone())
    }

    pub fn put_available(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        slots: Vec<TimeSlot>,
    ) {
        self.available_slots.insert((calendar_id, start, end), slots);
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn slot_for(calendar_id: Uuid) -> TimeSlot {
        let start = Utc::now() + Duration::hours(24);
        TimeSlot::new(calendar_id, start, start + Duration::hours(1))
    }

    #[test]
    fn slot_roundtrip_and_invalidation() {
        let cache = ServiceCache::new();
        let slot = slot_for(Uuid::new_v4());
        cache.put_slot(slot.clone());
        assert_eq!(cache.get_slot(slot.id), Some(slot.clone()));

        cache.invalidate_slot(slot.id, slot.calendar_id);
        assert!(cache.get_slot(slot.id).is_none());
    }

    #[test]
    fn slot_invalidation_drops_availability_of_same_calendar_only() {
        let cache = ServiceCache::new();
        let cal_a = Uuid::new_v4();
        let cal_b = Uuid::new_v4();
        let start = Utc::now();
        let end = start + Duration::hours(8);

        cache.put_available(cal_a, start, end, vec![slot_for(cal_a)]);
        cache.put_available(cal_b, start, end, vec![slot_for(cal_b)]);

        cache.invalidate_slot(Uuid::new_v4(), cal_a);

        assert!(cache.get_available(cal_a, start, end).is_none());
        assert!(cache.get_available(cal_b, start, end).is_some());
    }

    #[test]
    fn calendar_tree_invalidation_clears_owned_entries() {
        let cache = ServiceCache::new();
        let cal = Uuid::new_v4();
        let other = Uuid::new_v4();
        let owned = slot_for(cal);
        let foreign = slot_for(other);

        cache.put_calendar(Calendar::new("Work", "u1", "UTC"));
        cache.put_slot(owned.clone());
        cache.put_slot(foreign.clone());

        cache.invalidate_calendar_tree(cal);

        assert!(cache.get_slot(owned.id).is_none());
        assert_eq!(cache.get_slot(foreign.id), Some(foreign));
    }
}
