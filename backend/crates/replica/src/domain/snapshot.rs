//! State Snapshot
//!
//! The unit of replication: every replicated table plus a version that
//! grows by one on each local mutation. Receivers only apply a snapshot
//! whose version is strictly greater than their own.

use auth::infra::memory::{TokenTable, UserTable};
use kernel::id::ItemId;
use serde::{Deserialize, Serialize};

use crate::domain::item::ItemTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub version: u64,
    pub users: UserTable,
    pub tokens: TokenTable,
    pub items: ItemTable,
    pub next_item_id: ItemId,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            version: 0,
            users: UserTable::default(),
            tokens: TokenTable::default(),
            items: ItemTable::default(),
            next_item_id: ItemId::first(),
        }
    }
}

impl StateSnapshot {
    /// Record one local mutation
    pub fn bump(&mut self) {
        self.version += 1;
    }

    /// Whether this snapshot should replace state at `version`
    pub fn supersedes(&self, version: u64) -> bool {
        self.version > version
    }

    /// Allocate the next item ID
    pub fn allocate_item_id(&mut self) -> ItemId {
        let item_id = self.next_item_id;
        self.next_item_id = item_id.next();
        item_id
    }
}
