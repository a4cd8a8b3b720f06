use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-side lifecycle timestamps of an object.
///
/// Ordering: `created` is the earliest of the four. A store never records a
/// later event with a time before `created`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreTimes {
    /// When the content was first seen.
    pub created: DateTime<Utc>,
    /// Most recent write that added this content.
    pub last_inserted: DateTime<Utc>,
    /// Most recent metadata-only update.
    pub props_modified: DateTime<Utc>,
    /// Soft-delete time; `None` while the object is live.
    pub removed: Option<DateTime<Utc>>,
}

impl StoreTimes {
    /// Times for content first inserted at `at`.
    pub fn inserted_at(at: DateTime<Utc>) -> Self {
        Self {
            created: at,
            last_inserted: at,
            props_modified: at,
            removed: None,
        }
    }

    /// Times for content first inserted now.
    pub fn now() -> Self {
        Self::inserted_at(Utc::now())
    }

    pub fn is_removed(&self) -> bool {
        self.removed.is_some()
    }

    /// Record a repeat insertion. Clears any soft-delete.
    pub fn reinserted(&self, at: DateTime<Utc>) -> Self {
        Self {
            last_inserted: at.max(self.created),
            removed: None,
            ..*self
        }
    }

    /// Record a metadata-only update.
    pub fn props_touched(&self, at: DateTime<Utc>) -> Self {
        Self {
            props_modified: at.max(self.created),
            ..*self
        }
    }

    /// Record a soft-delete. An existing removal time is kept.
    pub fn marked_removed(&self, at: DateTime<Utc>) -> Self {
        Self {
            removed: Some(self.removed.unwrap_or(at.max(self.created))),
            ..*self
        }
    }

    /// The first field (by name) that is earlier than `created`, if any.
    pub fn first_out_of_order(&self) -> Option<&'static str> {
        if self.last_inserted < self.created {
            return Some("last_inserted");
        }
        if self.props_modified < self.created {
            return Some("props_modified");
        }
        match self.removed {
            Some(removed) if removed < self.created => Some("removed"),
            _ => None,
        }
    }
}
