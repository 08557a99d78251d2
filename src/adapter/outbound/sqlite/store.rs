//! SQLite subscriber store implementation.
//!
//! Provides persistent storage for subscribers using SQLite and Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::{self, DbPool};
use crate::adapter::outbound::sqlite::database::model::SubscriberRow;
use crate::adapter::outbound::sqlite::database::schema::subscribers;
use crate::domain::{NewSubscriber, Subscriber, UserId};
use crate::error::{Error, Result};
use crate::port::outbound::store::SubscriberStore;

/// SQLite-backed subscriber store.
pub struct SqliteSubscriberStore {
    pool: DbPool,
}

impl SqliteSubscriberStore {
    /// Create a store over an already migrated pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (and migrate) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::new(connection::open(path)?))
    }

    /// In-memory store, for tests and dry runs.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn in_memory() -> Result<Self> {
        Self::open(connection::MEMORY)
    }

    /// Count active subscribers in the database at `path` without
    /// migrating or otherwise writing to it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened read-only or has no
    /// `subscribers` table.
    pub async fn count_active_at(path: &str) -> Result<u64> {
        let path = path.to_string();
        run_blocking(move || {
            let mut conn = connection::open_read_only(&path)?;
            count_active(&mut conn)
        })
        .await
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
            f(&mut *conn)
        })
        .await
    }

    fn to_row(profile: &NewSubscriber, now: DateTime<Utc>) -> SubscriberRow {
        SubscriberRow {
            user_id: profile.user_id.get(),
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            subscribed_at: now.to_rfc3339_opts(SecondsFormat::Micros, true),
            active: 1,
        }
    }

    fn from_row(row: SubscriberRow) -> Result<Subscriber> {
        let subscribed_at = DateTime::parse_from_rfc3339(&row.subscribed_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(Subscriber {
            user_id: UserId::new(row.user_id),
            username: row.username,
            first_name: row.first_name,
            subscribed_at,
            active: row.active != 0,
        })
    }
}

#[async_trait]
impl SubscriberStore for SqliteSubscriberStore {
    async fn subscribe(&self, profile: &NewSubscriber) -> Result<()> {
        let row = Self::to_row(profile, Utc::now());
        self.with_conn(move |conn| {
            diesel::replace_into(subscribers::table)
                .values(&row)
                .execute(conn)
                .map_err(|e| Error::Database(e.to_string()))?;
            Ok(())
        })
        .await
    }

    async fn unsubscribe(&self, user_id: UserId) -> Result<bool> {
        self.with_conn(move |conn| {
            let updated = diesel::update(subscribers::table.find(user_id.get()))
                .set(subscribers::active.eq(0))
                .execute(conn)
                .map_err(|e| Error::Database(e.to_string()))?;
            Ok(updated > 0)
        })
        .await
    }

    async fn active_ids(&self) -> Result<Vec<UserId>> {
        let ids: Vec<i64> = self
            .with_conn(|conn| {
                subscribers::table
                    .filter(subscribers::active.eq(1))
                    .order((subscribers::subscribed_at.asc(), subscribers::user_id.asc()))
                    .select(subscribers::user_id)
                    .load(conn)
                    .map_err(|e| Error::Database(e.to_string()))
            })
            .await?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }

    async fn active_count(&self) -> Result<u64> {
        self.with_conn(count_active).await
    }

    async fn list(&self) -> Result<Vec<Subscriber>> {
        let rows: Vec<SubscriberRow> = self
            .with_conn(|conn| {
                subscribers::table
                    .order((subscribers::subscribed_at.asc(), subscribers::user_id.asc()))
                    .select(SubscriberRow::as_select())
                    .load(conn)
                    .map_err(|e| Error::Database(e.to_string()))
            })
            .await?;

        rows.into_iter().map(Self::from_row).collect()
    }
}

fn count_active(conn: &mut SqliteConnection) -> Result<u64> {
    let count: i64 = subscribers::table
        .filter(subscribers::active.eq(1))
        .count()
        .get_result(conn)
        .map_err(|e| Error::Database(e.to_string()))?;

    Ok(u64::try_from(count).unwrap_or_default())
}

/// Diesel calls block, so they run off the async worker threads.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Database(format!("database task failed: {e}")))?
}
