//! Domain identifier types with proper encapsulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Telegram user identifier - newtype for type safety.
///
/// In private chats the user id doubles as the chat id, so a subscriber can
/// be addressed directly with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Create a new `UserId`.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw numeric identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_string() {
        assert_eq!("12345".parse::<UserId>().unwrap(), UserId::new(12345));
        assert_eq!(" 42 ".parse::<UserId>().unwrap(), UserId::new(42));
        assert!("admin".parse::<UserId>().is_err());
    }

    #[test]
    fn negative_ids_are_allowed() {
        // Group chats carry negative identifiers.
        assert_eq!("-100123".parse::<UserId>().unwrap().get(), -100_123);
    }
}
