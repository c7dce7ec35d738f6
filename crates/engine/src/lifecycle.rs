//! Soft-delete state shared by wallets and transactions.
//!
//! Storage keeps a nullable `deleted_at` column; everything above the entity
//! layer works with [`Lifecycle`]. [`Lifecycle::is_active`] is the only place
//! that decides whether a transaction counts toward its wallet balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted {
        at: DateTime<Utc>,
    },
}

impl Lifecycle {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub fn deleted_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Deleted { at } => Some(at),
        }
    }
}

impl From<Option<DateTime<Utc>>> for Lifecycle {
    fn from(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => Self::Deleted { at },
            None => Self::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn nullable_timestamp_maps_to_lifecycle() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        assert_eq!(Lifecycle::from(None), Lifecycle::Active);
        assert!(Lifecycle::from(None).is_active());

        let deleted = Lifecycle::from(Some(at));
        assert!(!deleted.is_active());
        assert_eq!(deleted.deleted_at(), Some(at));
    }
}
