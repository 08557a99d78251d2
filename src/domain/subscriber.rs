//! Subscriber domain types.

use chrono::{DateTime, Utc};

use super::id::UserId;

/// A user registered to receive periodic summaries.
///
/// Rows are never physically deleted: unsubscribing clears `active`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub user_id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    pub active: bool,
}

/// Profile captured when a user subscribes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub user_id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl NewSubscriber {
    pub fn new(
        user_id: impl Into<UserId>,
        username: Option<String>,
        first_name: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username,
            first_name,
        }
    }

    /// Profile used for the operator subscribed through `--admin_id`.
    #[must_use]
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            username: Some("admin".to_string()),
            first_name: Some("Admin".to_string()),
        }
    }

    /// Name used when greeting the user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("there")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_profile_uses_fixed_names() {
        let admin = NewSubscriber::admin(UserId::new(7));
        assert_eq!(admin.username.as_deref(), Some("admin"));
        assert_eq!(admin.first_name.as_deref(), Some("Admin"));
    }

    #[test]
    fn display_name_falls_back() {
        let full = NewSubscriber::new(1, Some("jdoe".into()), Some("Jane".into()));
        assert_eq!(full.display_name(), "Jane");

        let username_only = NewSubscriber::new(1, Some("jdoe".into()), None);
        assert_eq!(username_only.display_name(), "jdoe");

        let anonymous = NewSubscriber::new(1, None, None);
        assert_eq!(anonymous.display_name(), "there");
    }
}
