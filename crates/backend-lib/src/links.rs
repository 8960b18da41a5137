//! Link entries as seen by the access layer.
//!
//! Links are persisted by a collaborator; here they only need to answer who owns them.
use crate::access::Owned;
use crate::accounts::AccountId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One outbound link on a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub id: Uuid,
    owner: AccountId,
    pub display_name: String,
    pub target_url: String,
}

impl LinkEntry {
    pub fn new(owner: AccountId, display_name: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            display_name: display_name.into(),
            target_url: target_url.into(),
        }
    }
}

impl Owned for LinkEntry {
    fn owner_id(&self) -> AccountId {
        self.owner
    }
}
