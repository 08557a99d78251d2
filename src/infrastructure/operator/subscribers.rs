//! Subscriber operator implementation.

use std::path::Path;

use async_trait::async_trait;

use crate::adapter::outbound::sqlite::SqliteSubscriberStore;
use crate::error::{Error, Result};
use crate::port::inbound::operator::subscribers::{
    SubscriberOperator, SubscriberReport, SubscribersRequest,
};
use crate::port::outbound::store::SubscriberStore;

use super::{entry::Operator, shared};

#[async_trait]
impl SubscriberOperator for Operator {
    async fn subscribers(&self, request: &SubscribersRequest) -> Result<SubscriberReport> {
        let database = match &request.database {
            Some(database) => database.clone(),
            None => {
                shared::load_env_file(&request.source.env_file)?;
                shared::load_config(&request.source)?.database
            }
        };

        // Opening would create an empty database; a report should not.
        if !Path::new(&database).exists() {
            return Err(Error::Database(format!("{database} not found")));
        }

        let store = SqliteSubscriberStore::open(&database)?;
        let subscribers = store.list().await?;
        Ok(SubscriberReport {
            database,
            subscribers,
        })
    }
}
