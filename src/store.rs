//! In-memory ledger storage shared across request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::ledger::UserLedger;

pub type SharedLedgerStore = Arc<LedgerStore>;

/// Process-local store of user ledgers, keyed by user id.
///
/// # Thread Safety
///
/// All mutation goes through [`LedgerStore::update`], which runs the caller's
/// closure under the write lock. Two requests touching the same user therefore
/// serialize instead of overwriting each other's read-modify-write copies.
#[derive(Default)]
pub struct LedgerStore {
    users: RwLock<HashMap<String, UserLedger>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the user's ledger, creating a default one on first touch.
    pub async fn snapshot(&self, user_id: &str) -> UserLedger {
        let mut users = self.users.write().await;
        users
            .entry(user_id.to_string())
            .or_insert_with(|| UserLedger::new(user_id))
            .clone()
    }

    /// Run `mutate` against the user's ledger (created if absent) and return
    /// its result.
    pub async fn update<F, T>(&self, user_id: &str, mutate: F) -> T
    where
        F: FnOnce(&mut UserLedger) -> T,
    {
        let mut users = self.users.write().await;
        let ledger = users
            .entry(user_id.to_string())
            .or_insert_with(|| UserLedger::new(user_id));
        mutate(ledger)
    }

    /// Drop the user's ledger entirely. Returns whether one existed.
    pub async fn remove(&self, user_id: &str) -> bool {
        self.users.write().await.remove(user_id).is_some()
    }
}
