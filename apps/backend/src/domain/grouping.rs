//! Group assignment: turns the tournament's (index, count) cell into the
//! next group placement without ever exceeding the capacity.

use serde::{Deserialize, Serialize};

/// Maximum number of entrants in one group.
pub const GROUP_CAPACITY: i32 = 35;

/// The versioned counter cell stored on the tournament row.
///
/// `index` is the 1-based group currently being filled and `count` is how
/// many entrants it already holds. Every write of a new cursor is conditioned
/// on the previously observed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCursor {
    pub index: i32,
    pub count: i32,
}

impl GroupCursor {
    pub const fn initial() -> Self {
        Self { index: 1, count: 0 }
    }

    /// Cursor after placing one more entrant.
    pub fn advance(self) -> Self {
        let count = self.count + 1;
        if count > GROUP_CAPACITY {
            Self {
                index: self.index + 1,
                count: 1,
            }
        } else {
            Self {
                index: self.index,
                count,
            }
        }
    }

    /// Whether the stored values can have been produced by `initial`/`advance`.
    pub fn is_valid(self) -> bool {
        self.index >= 1 && (0..=GROUP_CAPACITY).contains(&self.count)
    }
}

impl Default for GroupCursor {
    fn default() -> Self {
        Self::initial()
    }
}

pub fn group_id(tournament_id: &str, index: i32) -> String {
    format!("{tournament_id}-group-{index}")
}

/// Where the next entrant lands, and the cursor to commit for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub cursor: GroupCursor,
    pub group_id: String,
}

impl Placement {
    pub fn next(tournament_id: &str, observed: GroupCursor) -> Self {
        let cursor = observed.advance();
        Self {
            group_id: group_id(tournament_id, cursor.index),
            cursor,
        }
    }
}
