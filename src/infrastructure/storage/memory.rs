//! In-memory repository implementations for development and testing
//!
//! One struct backs all three repository traits so cross-aggregate
//! operations (cascade delete, slot joins for meeting queries) can reach
//! every map. The claim operation performs its check-and-set under the
//! per-key map lock, matching the atomicity of the SQL conditional update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::calendar::{Calendar, CalendarRepository};
use crate::domain::meeting::{Meeting, MeetingRepository};
use crate::domain::time_slot::{
    DailySlotCount, SlotStatus, TimeSlot, TimeSlotRepository,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

#[derive(Default)]
pub struct InMemoryRepositories {
    calendars: DashMap<Uuid, Calendar>,
    slots: DashMap<Uuid, TimeSlot>,
    meetings: DashMap<Uuid, Meeting>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_start(&self, meeting: &Meeting) -> Option<DateTime<Utc>> {
        self.slots.get(&meeting.time_slot_id).map(|s| s.start_time)
    }

    fn sort_by_slot_start(&self, meetings: &mut [Meeting]) {
        meetings.sort_by_key(|m| self.slot_start(m));
    }
}

impl RepositoryProvider for InMemoryRepositories {
    fn calendars(&self) -> &dyn CalendarRepository {
        self
    }

    fn time_slots(&self) -> &dyn TimeSlotRepository {
        self
    }

    fn meetings(&self) -> &dyn MeetingRepository {
        self
    }
}

fn page_slice<T>(mut items: Vec<T>, page: u64, limit: u64) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let limit = limit.max(1);
    let offset = page.saturating_sub(1).saturating_mul(limit);
    let items = if offset >= total {
        Vec::new()
    } else {
        items
            .drain(offset as usize..)
            .take(limit as usize)
            .collect()
    };
    (items, total)
}

// ── CalendarRepository impl ─────────────────────────────────────

#[async_trait]
impl CalendarRepository for InMemoryRepositories {
    async fn save(&self, calendar: Calendar) -> DomainResult<()> {
        self.calendars.insert(calendar.id, calendar);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Calendar>> {
        Ok(self.calendars.get(&id).map(|e| e.clone()))
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: &str) -> DomainResult<Option<Calendar>> {
        Ok(self
            .calendars
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .map(|e| e.clone()))
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Calendar>> {
        let mut items: Vec<Calendar> = self
            .calendars
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.clone())
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn find_by_user_paged(
        &self,
        user_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Calendar>, u64)> {
        let items = self.find_by_user(user_id).await?;
        Ok(page_slice(items, page, limit))
    }

    async fn update(&self, calendar: Calendar) -> DomainResult<()> {
        if !self.calendars.contains_key(&calendar.id) {
            return Err(DomainError::not_found("Calendar", calendar.id));
        }
        self.calendars.insert(calendar.id, calendar);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.calendars
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Calendar", id))?;

        // Cascade: owned slots, then meetings bound to those slots
        let slot_ids: Vec<Uuid> = self
            .slots
            .iter()
            .filter(|e| e.calendar_id == id)
            .map(|e| e.id)
            .collect();
        for slot_id in &slot_ids {
            self.slots.remove(slot_id);
        }
        self.meetings
            .retain(|_, m| !slot_ids.contains(&m.time_slot_id));
        Ok(())
    }

    async fn exists_by_user_and_name(&self, user_id: &str, name: &str) -> DomainResult<bool> {
        Ok(self
            .calendars
            .iter()
            .any(|e| e.user_id == user_id && e.name == name))
    }

    async fn count_by_user(&self, user_id: &str) -> DomainResult<u64> {
        Ok(self.calendars.iter().filter(|e| e.user_id == user_id).count() as u64)
    }
}

// ── TimeSlotRepository impl ─────────────────────────────────────

#[async_trait]
impl TimeSlotRepository for InMemoryRepositories {
    async fn save(&self, slot: TimeSlot) -> DomainResult<()> {
        self.slots.insert(slot.id, slot);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<TimeSlot>> {
        Ok(self.slots.get(&id).map(|e| e.clone()))
    }

    async fn update(&self, slot: TimeSlot) -> DomainResult<()> {
        if !self.slots.contains_key(&slot.id) {
            return Err(DomainError::not_found("TimeSlot", slot.id));
        }
        self.slots.insert(slot.id, slot);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.slots
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("TimeSlot", id))?;
        Ok(())
    }

    async fn find_by_calendar_paged(
        &self,
        calendar_id: Uuid,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<TimeSlot>, u64)> {
        let mut items: Vec<TimeSlot> = self
            .slots
            .iter()
            .filter(|e| e.calendar_id == calendar_id)
            .map(|e| e.clone())
            .collect();
        items.sort_by_key(|s| s.start_time);
        Ok(page_slice(items, page, limit))
    }

    async fn find_by_calendar_in_range_paged(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<TimeSlot>, u64)> {
        let mut items: Vec<TimeSlot> = self
            .slots
            .iter()
            .filter(|e| e.calendar_id == calendar_id && e.within_range(start, end))
            .map(|e| e.clone())
            .collect();
        items.sort_by_key(|s| s.start_time);
        Ok(page_slice(items, page, limit))
    }

    async fn find_available_in_range(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeSlot>> {
        let mut items: Vec<TimeSlot> = self
            .slots
            .iter()
            .filter(|e| {
                e.calendar_id == calendar_id && e.is_available() && e.within_range(start, end)
            })
            .map(|e| e.clone())
            .collect();
        items.sort_by_key(|s| s.start_time);
        Ok(items)
    }

    async fn exists_overlapping(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> DomainResult<bool> {
        let candidate = TimeSlot::new(calendar_id, start, end);
        Ok(self.slots.iter().any(|e| {
            e.calendar_id == calendar_id && Some(e.id) != exclude_id && e.overlaps(&candidate)
        }))
    }

    async fn find_busy_by_users(
        &self,
        user_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeSlot>> {
        let owned: Vec<Uuid> = self
            .calendars
            .iter()
            .filter(|c| user_ids.contains(&c.user_id))
            .map(|c| c.id)
            .collect();
        let mut items: Vec<TimeSlot> = self
            .slots
            .iter()
            .filter(|e| {
                owned.contains(&e.calendar_id)
                    && e.status == SlotStatus::Busy
                    && e.within_range(start, end)
            })
            .map(|e| e.clone())
            .collect();
        items.sort_by_key(|s| s.start_time);
        Ok(items)
    }

    async fn claim(&self, id: Uuid) -> DomainResult<bool> {
        // Check-and-set under the per-key lock
        match self.slots.get_mut(&id) {
            Some(mut slot) if slot.status == SlotStatus::Available => {
                slot.status = SlotStatus::Busy;
                slot.updated_at = Utc::now();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DomainError::not_found("TimeSlot", id)),
        }
    }

    async fn set_status(&self, id: Uuid, status: SlotStatus) -> DomainResult<()> {
        match self.slots.get_mut(&id) {
            Some(mut slot) => {
                slot.status = status;
                slot.updated_at = Utc::now();
                Ok(())
            }
            None => Err(DomainError::not_found("TimeSlot", id)),
        }
    }

    async fn count_by_day(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<DailySlotCount>> {
        let mut by_day = std::collections::BTreeMap::new();
        for e in self.slots.iter() {
            if e.calendar_id == calendar_id && e.within_range(start, end) {
                *by_day.entry(e.start_time.date_naive()).or_insert(0u64) += 1;
            }
        }
        Ok(by_day
            .into_iter()
            .map(|(date, count)| DailySlotCount { date, count })
            .collect())
    }
}

// ── MeetingRepository impl ──────────────────────────────────────

#[async_trait]
impl MeetingRepository for InMemoryRepositories {
    async fn save(&self, meeting: Meeting) -> DomainResult<()> {
        self.meetings.insert(meeting.id, meeting);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Meeting>> {
        Ok(self.meetings.get(&id).map(|e| e.clone()))
    }

    async fn update(&self, meeting: Meeting) -> DomainResult<()> {
        if !self.meetings.contains_key(&meeting.id) {
            return Err(DomainError::not_found("Meeting", meeting.id));
        }
        self.meetings.insert(meeting.id, meeting);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.meetings
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Meeting", id))?;
        Ok(())
    }

    async fn find_by_slot(&self, time_slot_id: Uuid) -> DomainResult<Option<Meeting>> {
        Ok(self
            .meetings
            .iter()
            .find(|m| m.time_slot_id == time_slot_id)
            .map(|m| m.clone()))
    }

    async fn find_by_participant_paged(
        &self,
        participant_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Meeting>, u64)> {
        let mut items: Vec<Meeting> = self
            .meetings
            .iter()
            .filter(|m| m.has_participant(participant_id))
            .map(|m| m.clone())
            .collect();
        items.sort_by_key(|m| m.created_at);
        Ok(page_slice(items, page, limit))
    }

    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        let mut items: Vec<Meeting> = self
            .meetings
            .iter()
            .filter(|m| {
                self.slots
                    .get(&m.time_slot_id)
                    .map(|s| s.within_range(start, end))
                    .unwrap_or(false)
            })
            .map(|m| m.clone())
            .collect();
        self.sort_by_slot_start(&mut items);
        Ok(items)
    }

    async fn find_by_participant_in_range(
        &self,
        participant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        let mut items = self.find_in_range(start, end).await?;
        items.retain(|m| m.has_participant(participant_id));
        Ok(items)
    }

    async fn find_by_calendar_owner_paged(
        &self,
        user_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Meeting>, u64)> {
        let owned: Vec<Uuid> = self
            .calendars
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.id)
            .collect();
        let mut items: Vec<Meeting> = self
            .meetings
            .iter()
            .filter(|m| {
                self.slots
                    .get(&m.time_slot_id)
                    .map(|s| owned.contains(&s.calendar_id))
                    .unwrap_or(false)
            })
            .map(|m| m.clone())
            .collect();
        self.sort_by_slot_start(&mut items);
        Ok(page_slice(items, page, limit))
    }

    async fn count_by_participant(&self, participant_id: &str) -> DomainResult<u64> {
        Ok(self
            .meetings
            .iter()
            .filter(|m| m.has_participant(participant_id))
            .count() as u64)
    }

    async fn find_by_title(&self, title: &str) -> DomainResult<Vec<Meeting>> {
        // Case-insensitive, matching SQL LIKE semantics
        let needle = title.to_lowercase();
        let mut items: Vec<Meeting> = self
            .meetings
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .map(|m| m.clone())
            .collect();
        self.sort_by_slot_start(&mut items);
        Ok(items)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn future_slot(calendar_id: Uuid, hour_offset: i64) -> TimeSlot {
        let start = Utc::now() + Duration::hours(24 + hour_offset);
        TimeSlot::new(calendar_id, start, start + Duration::hours(1))
    }

    #[tokio::test]
    async fn claim_flips_available_to_busy_once() {
        let repos = InMemoryRepositories::new();
        let slot = future_slot(Uuid::new_v4(), 0);
        let id = slot.id;
        TimeSlotRepository::save(&repos, slot).await.unwrap();

        assert!(repos.claim(id).await.unwrap());
        assert!(!repos.claim(id).await.unwrap());

        let stored = TimeSlotRepository::find_by_id(&repos, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, SlotStatus::Busy);
    }

    #[tokio::test]
    async fn claim_missing_slot_is_not_found() {
        let repos = InMemoryRepositories::new();
        let err = repos.claim(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn calendar_delete_cascades_to_slots_and_meetings() {
        let repos = InMemoryRepositories::new();
        let cal = Calendar::new("Work", "u1", "UTC");
        let cal_id = cal.id;
        CalendarRepository::save(&repos, cal).await.unwrap();

        let slot_a = future_slot(cal_id, 0);
        let slot_b = future_slot(cal_id, 2);
        let meeting = Meeting::new("Sync", None, vec!["alice".into()], slot_a.id);
        let (slot_a_id, slot_b_id, meeting_id) = (slot_a.id, slot_b.id, meeting.id);

        TimeSlotRepository::save(&repos, slot_a).await.unwrap();
        TimeSlotRepository::save(&repos, slot_b).await.unwrap();
        MeetingRepository::save(&repos, meeting).await.unwrap();

        CalendarRepository::delete(&repos, cal_id).await.unwrap();

        assert!(TimeSlotRepository::find_by_id(&repos, slot_a_id)
            .await
            .unwrap()
            .is_none());
        assert!(TimeSlotRepository::find_by_id(&repos, slot_b_id)
            .await
            .unwrap()
            .is_none());
        assert!(MeetingRepository::find_by_id(&repos, meeting_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn page_slice_respects_bounds() {
        let repos = InMemoryRepositories::new();
        let cal_id = Uuid::new_v4();
        for i in 0..5 {
            TimeSlotRepository::save(&repos, future_slot(cal_id, i * 2))
                .await
                .unwrap();
        }

        let (page1, total) = repos.find_by_calendar_paged(cal_id, 1, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page1.len(), 2);

        let (page3, _) = repos.find_by_calendar_paged(cal_id, 3, 2).await.unwrap();
        assert_eq!(page3.len(), 1);

        let (page4, _) = repos.find_by_calendar_paged(cal_id, 4, 2).await.unwrap();
        assert!(page4.is_empty());
    }

    #[tokio::test]
    async fn busy_by_users_joins_through_calendar_owner() {
        let repos = InMemoryRepositories::new();
        let cal = Calendar::new("Work", "u1", "UTC");
        let other = Calendar::new("Work", "u2", "UTC");
        let (cal_id, other_id) = (cal.id, other.id);
        CalendarRepository::save(&repos, cal).await.unwrap();
        CalendarRepository::save(&repos, other).await.unwrap();

        let mut busy = future_slot(cal_id, 0);
        busy.status = SlotStatus::Busy;
        let free = future_slot(cal_id, 2);
        let mut foreign = future_slot(other_id, 4);
        foreign.status = SlotStatus::Busy;

        let busy_id = busy.id;
        TimeSlotRepository::save(&repos, busy).await.unwrap();
        TimeSlotRepository::save(&repos, free).await.unwrap();
        TimeSlotRepository::save(&repos, foreign).await.unwrap();

        let start = Utc::now();
        let end = start + Duration::days(3);
        let found = repos
            .find_busy_by_users(&["u1".to_string()], start, end)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, busy_id);
    }

    #[tokio::test]
    async fn title_search_ignores_case() {
        let repos = InMemoryRepositories::new();
        let slot = future_slot(Uuid::new_v4(), 0);
        let meeting = Meeting::new("Quarterly Review", None, vec!["alice".into()], slot.id);
        TimeSlotRepository::save(&repos, slot).await.unwrap();
        MeetingRepository::save(&repos, meeting).await.unwrap();

        let found = MeetingRepository::find_by_title(&repos, "quarterly").await.unwrap();
        assert_eq!(found.len(), 1);

        let found = MeetingRepository::find_by_title(&repos, "REVIEW").await.unwrap();
        assert_eq!(found.len(), 1);

        let found = MeetingRepository::find_by_title(&repos, "standup").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn page_slice_tolerates_huge_page_numbers() {
        let repos = InMemoryRepositories::new();
        let cal_id = Uuid::new_v4();
        TimeSlotRepository::save(&repos, future_slot(cal_id, 0))
            .await
            .unwrap();

        let (items, total) = repos
            .find_by_calendar_paged(cal_id, u64::MAX, 20)
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 1);
    }
}
