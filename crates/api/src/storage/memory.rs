// In-memory storage implementation for dev mode and tests
// Decision: One parking_lot lock over all tables so each method is atomic
// Decision: Rows keep the same shape (string statuses) as the Postgres tables
//
// This implementation mirrors the PostgreSQL store semantics, allowing the
// API to run without a database for development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hoops_core::{phone, Event, EventParticipant, ParticipantStatus};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};

use super::models::*;
use super::store::*;

#[derive(Default)]
struct Tables {
    events: BTreeMap<i64, EventRow>,
    participants: BTreeMap<i64, ParticipantRow>,
    event_participants: BTreeMap<i64, EventParticipantRow>,
    next_event_id: i64,
    next_participant_id: i64,
    next_join_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn roster_row(&self, join: &EventParticipantRow) -> Result<RosterRow, StoreError> {
        let participant = self.participants.get(&join.participant_id).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "registration {} references missing participant {}",
                join.id, join.participant_id
            ))
        })?;
        Ok(RosterRow::from_parts(join, participant))
    }

    fn sorted_events(&self) -> Vec<&EventRow> {
        let mut events: Vec<&EventRow> = self.events.values().collect();
        events.sort_by_key(|e| (e.event_date, e.id));
        events
    }
}

/// In-memory store for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    /// Overwrite the status of a registration's join row only.
    /// Used by tests to reproduce data where the status mirror has drifted.
    #[cfg(test)]
    pub(crate) fn set_join_status(&self, join_id: i64, status: &str) {
        if let Some(join) = self.tables.write().event_participants.get_mut(&join_id) {
            join.status = status.to_string();
        }
    }
}

#[async_trait]
impl HoopsStore for InMemoryStore {
    async fn get_event(&self, event_id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self
            .tables
            .read()
            .events
            .get(&event_id)
            .cloned()
            .map(Event::from))
    }

    async fn get_active_event(&self) -> Result<Option<Event>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .sorted_events()
            .into_iter()
            .find(|e| e.is_active)
            .cloned()
            .map(Event::from))
    }

    async fn list_upcoming_events(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Event>, StoreError> {
        let tables = self.tables.read();
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(tables
            .sorted_events()
            .into_iter()
            .filter(|e| e.event_date >= since)
            .take(limit)
            .cloned()
            .map(Event::from)
            .collect())
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .sorted_events()
            .into_iter()
            .cloned()
            .map(Event::from)
            .collect())
    }

    async fn create_events(&self, events: Vec<NewEvent>) -> Result<Vec<Event>, StoreError> {
        let now = Self::now();
        let mut tables = self.tables.write();

        let mut created = Vec::with_capacity(events.len());
        for event in events {
            let id = Tables::next_id(&mut tables.next_event_id);
            let row = EventRow {
                id,
                event_date: event.event_date,
                location: event.location,
                max_participants: event.max_participants,
                is_active: true,
                created_at: now,
                creator_phone_number: event.creator_phone_number,
            };
            tables.events.insert(id, row.clone());
            created.push(Event::from(row));
        }
        Ok(created)
    }

    async fn set_event_active(
        &self,
        event_id: i64,
        is_active: bool,
    ) -> Result<Option<Event>, StoreError> {
        let mut tables = self.tables.write();
        if let Some(event) = tables.events.get_mut(&event_id) {
            event.is_active = is_active;
            return Ok(Some(Event::from(event.clone())));
        }
        Ok(None)
    }

    async fn delete_event(
        &self,
        event_id: i64,
        requester_phone: &str,
    ) -> Result<DeleteOutcome, StoreError> {
        let mut tables = self.tables.write();

        let Some(event) = tables.events.get(&event_id) else {
            return Ok(DeleteOutcome::NotFound);
        };
        if !creator_authorizes(event.creator_phone_number.as_deref(), requester_phone) {
            return Ok(DeleteOutcome::Unauthorized);
        }

        let mut removed: Vec<i64> = Vec::new();
        tables.event_participants.retain(|_, join| {
            if join.event_id == event_id {
                removed.push(join.participant_id);
                false
            } else {
                true
            }
        });

        let still_linked: HashSet<i64> = tables
            .event_participants
            .values()
            .map(|join| join.participant_id)
            .collect();
        for participant_id in &removed {
            if !still_linked.contains(participant_id) {
                tables.participants.remove(participant_id);
            }
        }

        tables.events.remove(&event_id);

        Ok(DeleteOutcome::Deleted {
            removed_registrations: removed.len() as u64,
        })
    }

    async fn add_participant(
        &self,
        input: NewParticipant,
    ) -> Result<Option<EventParticipant>, StoreError> {
        let now = Self::now();
        let mut tables = self.tables.write();

        if !tables.events.contains_key(&input.event_id) {
            return Ok(None);
        }

        let participant_id = Tables::next_id(&mut tables.next_participant_id);
        let participant = ParticipantRow {
            id: participant_id,
            name: input.name,
            phone_number: input.phone_number,
            payment_amount: input.payment_amount,
            status: input.status.as_str().to_string(),
            created_at: now,
        };

        let join_id = Tables::next_id(&mut tables.next_join_id);
        let join = EventParticipantRow {
            id: join_id,
            event_id: input.event_id,
            participant_id,
            status: input.status.as_str().to_string(),
            created_at: now,
        };

        let entry = EventParticipant::try_from(RosterRow::from_parts(&join, &participant))?;
        tables.participants.insert(participant_id, participant);
        tables.event_participants.insert(join_id, join);

        Ok(Some(entry))
    }

    async fn list_event_participants(
        &self,
        event_id: i64,
    ) -> Result<Vec<EventParticipant>, StoreError> {
        let tables = self.tables.read();

        let mut joins: Vec<&EventParticipantRow> = tables
            .event_participants
            .values()
            .filter(|join| join.event_id == event_id)
            .collect();
        joins.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        joins
            .into_iter()
            .map(|join| tables.roster_row(join).and_then(EventParticipant::try_from))
            .collect()
    }

    async fn back_out(
        &self,
        event_id: i64,
        normalized_phone: &str,
    ) -> Result<BackOutOutcome, StoreError> {
        let mut tables = self.tables.write();

        let registrations: Vec<RegistrationRow> = tables
            .event_participants
            .values()
            .filter(|join| join.event_id == event_id)
            .filter_map(|join| {
                let participant = tables.participants.get(&join.participant_id)?;
                (phone::normalize(&participant.phone_number) == normalized_phone).then(|| {
                    RegistrationRow {
                        participant_id: participant.id,
                        join_id: join.id,
                        participant_status: participant.status.clone(),
                        join_status: join.status.clone(),
                        created_at: join.created_at,
                    }
                })
            })
            .collect();

        let (participant_id, join_id) = match resolve_back_out(&registrations)? {
            BackOutDecision::BackOut {
                participant_id,
                join_id,
            } => (participant_id, join_id),
            BackOutDecision::AlreadyOut => return Ok(BackOutOutcome::AlreadyOut),
            BackOutDecision::NotSignedUp => return Ok(BackOutOutcome::NotSignedUp),
            BackOutDecision::NoActiveRegistration => {
                return Ok(BackOutOutcome::NoActiveRegistration)
            }
        };

        let out = ParticipantStatus::Out.as_str();
        if let Some(participant) = tables.participants.get_mut(&participant_id) {
            participant.status = out.to_string();
        }
        for join in tables.event_participants.values_mut() {
            if join.participant_id == participant_id && join.event_id == event_id {
                join.status = out.to_string();
            }
        }

        let join = tables.event_participants.get(&join_id).ok_or_else(|| {
            StoreError::Corrupt(format!("registration {join_id} vanished during back-out"))
        })?;
        let entry = EventParticipant::try_from(tables.roster_row(join)?)?;

        Ok(BackOutOutcome::BackedOut(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn new_event(date: DateTime<Utc>, creator: Option<&str>) -> NewEvent {
        NewEvent {
            event_date: date,
            location: "Lincoln Park".to_string(),
            max_participants: 10,
            creator_phone_number: creator.map(str::to_string),
        }
    }

    fn signup(event_id: i64, name: &str, phone: &str, status: ParticipantStatus) -> NewParticipant {
        NewParticipant {
            event_id,
            name: name.to_string(),
            phone_number: phone.to_string(),
            payment_amount: 0.0,
            status,
        }
    }

    async fn store_with_event() -> (InMemoryStore, i64) {
        let store = InMemoryStore::new();
        let start = Utc.with_ymd_and_hms(2030, 6, 4, 18, 0, 0).unwrap();
        let events = store
            .create_events(vec![new_event(start, Some("(555) 999-0000"))])
            .await
            .unwrap();
        (store, events[0].id)
    }

    #[tokio::test]
    async fn test_add_participant_writes_matching_rows() {
        let (store, event_id) = store_with_event().await;

        let entry = store
            .add_participant(signup(event_id, "Alex", "(555) 010-2020", ParticipantStatus::In))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(entry.event_id, event_id);
        assert_eq!(entry.status, ParticipantStatus::In);

        let tables = store.tables.read();
        let participant = tables.participants.get(&entry.participant_id).unwrap();
        assert_eq!(participant.status, "in");
        assert_eq!(tables.event_participants.len(), 1);
    }

    #[tokio::test]
    async fn test_add_participant_unknown_event() {
        let store = InMemoryStore::new();
        let result = store
            .add_participant(signup(42, "Alex", "5550102020", ParticipantStatus::In))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(store.tables.read().participants.is_empty());
    }

    #[tokio::test]
    async fn test_participants_newest_first() {
        let (store, event_id) = store_with_event().await;
        for name in ["First", "Second", "Third"] {
            store
                .add_participant(signup(event_id, name, "5550102020", ParticipantStatus::In))
                .await
                .unwrap();
        }

        let list = store.list_event_participants(event_id).await.unwrap();
        let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_back_out_mismatched_mirror() {
        let (store, event_id) = store_with_event().await;
        let entry = store
            .add_participant(signup(event_id, "Alex", "5550102020", ParticipantStatus::Out))
            .await
            .unwrap()
            .unwrap();
        store.set_join_status(entry.id, "in");

        let outcome = store.back_out(event_id, "5550102020").await.unwrap();
        assert_eq!(outcome, BackOutOutcome::NoActiveRegistration);
    }

    #[tokio::test]
    async fn test_back_out_only_touches_its_event() {
        let store = InMemoryStore::new();
        let start = Utc.with_ymd_and_hms(2030, 6, 4, 18, 0, 0).unwrap();
        let events = store
            .create_events(vec![
                new_event(start, None),
                new_event(start + Duration::days(7), None),
            ])
            .await
            .unwrap();

        store
            .add_participant(signup(events[0].id, "Alex", "5550102020", ParticipantStatus::In))
            .await
            .unwrap();
        store
            .add_participant(signup(events[1].id, "Alex", "5550102020", ParticipantStatus::In))
            .await
            .unwrap();

        let outcome = store.back_out(events[0].id, "5550102020").await.unwrap();
        assert!(matches!(outcome, BackOutOutcome::BackedOut(_)));

        let other = store.list_event_participants(events[1].id).await.unwrap();
        assert_eq!(other[0].status, ParticipantStatus::In);
    }

    #[tokio::test]
    async fn test_delete_removes_orphaned_participants() {
        let (store, event_id) = store_with_event().await;
        store
            .add_participant(signup(event_id, "Alex", "5550102020", ParticipantStatus::In))
            .await
            .unwrap();

        let outcome = store.delete_event(event_id, "5559990000").await.unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome::Deleted {
                removed_registrations: 1
            }
        );

        let tables = store.tables.read();
        assert!(tables.events.is_empty());
        assert!(tables.participants.is_empty());
        assert!(tables.event_participants.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unauthorized_keeps_event() {
        let (store, event_id) = store_with_event().await;

        let outcome = store.delete_event(event_id, "5550000000").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Unauthorized);
        assert!(store.get_event(event_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_active_event_is_earliest_active() {
        let store = InMemoryStore::new();
        let start = Utc.with_ymd_and_hms(2030, 6, 4, 18, 0, 0).unwrap();
        let events = store
            .create_events(vec![
                new_event(start + Duration::days(7), None),
                new_event(start, None),
            ])
            .await
            .unwrap();

        let active = store.get_active_event().await.unwrap().unwrap();
        assert_eq!(active.id, events[1].id);

        store.set_event_active(events[1].id, false).await.unwrap();
        let active = store.get_active_event().await.unwrap().unwrap();
        assert_eq!(active.id, events[0].id);
    }
}
