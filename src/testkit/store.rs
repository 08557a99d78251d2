//! Subscriber storage for tests: the real SQLite store on an in-memory
//! database, migrated the same way as production files.

pub use crate::adapter::outbound::sqlite::SqliteSubscriberStore;

use crate::domain::NewSubscriber;
use crate::port::outbound::store::SubscriberStore;

/// Fresh in-memory store.
///
/// # Panics
///
/// Panics if the migrations fail, which is a test setup bug.
pub fn memory_store() -> SqliteSubscriberStore {
    SqliteSubscriberStore::in_memory().expect("in-memory store")
}

/// In-memory store with one active subscriber per id.
///
/// # Panics
///
/// Panics if a subscribe fails, which is a test setup bug.
pub async fn store_with(ids: &[i64]) -> SqliteSubscriberStore {
    let store = memory_store();
    for &id in ids {
        store
            .subscribe(&NewSubscriber::new(id, None, Some(format!("user{id}"))))
            .await
            .expect("subscribe");
    }
    store
}
