//! PostgreSQL implementation of HoopsStore
//!
//! Every multi-statement method runs in one transaction, so a failure part
//! way through (second signup insert, week N of a series, cascade delete)
//! leaves nothing behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hoops_core::{Event, EventParticipant};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use super::models::*;
use super::store::*;

const EVENT_COLUMNS: &str =
    "id, event_date, location, max_participants, is_active, created_at, creator_phone_number";

const ROSTER_SELECT: &str = r#"
    SELECT
        ep.id,
        ep.event_id,
        ep.participant_id,
        ep.status,
        ep.created_at,
        p.name,
        p.phone_number,
        p.payment_amount
    FROM event_participants ep
    JOIN participants p ON ep.participant_id = p.id
"#;

/// PostgreSQL implementation of HoopsStore
///
/// # Example
///
/// ```ignore
/// use hoops_api::storage::PostgresStore;
///
/// let store = PostgresStore::connect("postgres://localhost/hoops", 10).await?;
/// store.migrate().await?;
/// ```
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a connection pool from a database URL
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn roster_entry(
        tx: &mut Transaction<'_, Postgres>,
        join_id: i64,
    ) -> Result<EventParticipant, StoreError> {
        let row = sqlx::query_as::<_, RosterRow>(&format!("{ROSTER_SELECT} WHERE ep.id = $1"))
            .bind(join_id)
            .fetch_one(&mut **tx)
            .await?;
        EventParticipant::try_from(row)
    }
}

#[async_trait]
impl HoopsStore for PostgresStore {
    #[instrument(skip(self))]
    async fn get_event(&self, event_id: i64) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    #[instrument(skip(self))]
    async fn get_active_event(&self) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE is_active = TRUE
            ORDER BY event_date ASC, id ASC
            LIMIT 1
            "#
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    #[instrument(skip(self))]
    async fn list_upcoming_events(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE event_date >= $1
            ORDER BY event_date ASC, id ASC
            LIMIT $2
            "#
        ))
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY event_date ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self, events), fields(count = events.len()))]
    async fn create_events(&self, events: Vec<NewEvent>) -> Result<Vec<Event>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let mut created = Vec::with_capacity(events.len());
        for event in events {
            let row = sqlx::query_as::<_, EventRow>(&format!(
                r#"
                INSERT INTO events (event_date, location, max_participants, is_active, creator_phone_number)
                VALUES ($1, $2, $3, TRUE, $4)
                RETURNING {EVENT_COLUMNS}
                "#
            ))
            .bind(event.event_date)
            .bind(&event.location)
            .bind(event.max_participants)
            .bind(&event.creator_phone_number)
            .fetch_one(&mut *tx)
            .await?;
            created.push(Event::from(row));
        }

        tx.commit().await?;
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn set_event_active(
        &self,
        event_id: i64,
        is_active: bool,
    ) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE events SET is_active = $2 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(event_id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    #[instrument(skip(self, requester_phone))]
    async fn delete_event(
        &self,
        event_id: i64,
        requester_phone: &str,
    ) -> Result<DeleteOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Lock the event so a concurrent delete or signup cannot interleave
        let creator: Option<Option<String>> = sqlx::query_scalar(
            "SELECT creator_phone_number FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(creator) = creator else {
            return Ok(DeleteOutcome::NotFound);
        };
        if !creator_authorizes(creator.as_deref(), requester_phone) {
            return Ok(DeleteOutcome::Unauthorized);
        }

        let participant_ids: Vec<i64> = sqlx::query_scalar(
            "DELETE FROM event_participants WHERE event_id = $1 RETURNING participant_id",
        )
        .bind(event_id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM participants p
            WHERE p.id = ANY($1)
              AND NOT EXISTS (
                  SELECT 1 FROM event_participants ep WHERE ep.participant_id = p.id
              )
            "#,
        )
        .bind(&participant_ids)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(removed = participant_ids.len(), "Deleted event registrations");
        Ok(DeleteOutcome::Deleted {
            removed_registrations: participant_ids.len() as u64,
        })
    }

    #[instrument(skip(self, input), fields(event_id = input.event_id, status = %input.status))]
    async fn add_participant(
        &self,
        input: NewParticipant,
    ) -> Result<Option<EventParticipant>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Share-lock the event so it cannot be deleted under the signup
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM events WHERE id = $1 FOR SHARE")
                .bind(input.event_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let participant_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO participants (name, phone_number, payment_amount, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone_number)
        .bind(input.payment_amount)
        .bind(input.status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let join_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO event_participants (event_id, participant_id, status)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(input.event_id)
        .bind(participant_id)
        .bind(input.status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let entry = Self::roster_entry(&mut tx, join_id).await?;
        tx.commit().await?;

        Ok(Some(entry))
    }

    #[instrument(skip(self))]
    async fn list_event_participants(
        &self,
        event_id: i64,
    ) -> Result<Vec<EventParticipant>, StoreError> {
        let rows = sqlx::query_as::<_, RosterRow>(&format!(
            "{ROSTER_SELECT} WHERE ep.event_id = $1 ORDER BY ep.created_at DESC, ep.id DESC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EventParticipant::try_from).collect()
    }

    #[instrument(skip(self, normalized_phone))]
    async fn back_out(
        &self,
        event_id: i64,
        normalized_phone: &str,
    ) -> Result<BackOutOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        let registrations = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT
                p.id AS participant_id,
                ep.id AS join_id,
                p.status AS participant_status,
                ep.status AS join_status,
                ep.created_at
            FROM participants p
            JOIN event_participants ep ON p.id = ep.participant_id
            WHERE ep.event_id = $1
              AND REGEXP_REPLACE(p.phone_number, '[^0-9]', '', 'g') = $2
            FOR UPDATE OF p, ep
            "#,
        )
        .bind(event_id)
        .bind(normalized_phone)
        .fetch_all(&mut *tx)
        .await?;

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

        sqlx::query("UPDATE participants SET status = 'out' WHERE id = $1")
            .bind(participant_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE event_participants SET status = 'out' WHERE participant_id = $1 AND event_id = $2",
        )
        .bind(participant_id)
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        let entry = Self::roster_entry(&mut tx, join_id).await?;
        tx.commit().await?;

        Ok(BackOutOutcome::BackedOut(entry))
    }
}
