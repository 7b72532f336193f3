//! User Entity
//!
//! Created on registration and immutable afterwards. Replicated to every
//! node as part of the state snapshot.

use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{Email, PublicKey};

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    pub public_key: PublicKey,
}

impl User {
    pub fn new(user_id: UserId, email: Email, public_key: PublicKey) -> Self {
        Self {
            user_id,
            email,
            public_key,
        }
    }
}
