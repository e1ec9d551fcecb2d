//! Manual UTxO selection model
//!
//! Tracks which of the wallet's spendable outputs the user has pinned as
//! transaction inputs. An empty selection tells the draft builder to
//! auto-select inputs; a non-empty selection is passed as the mandatory
//! input set.

use std::collections::HashSet;

use crate::data_structures::{Utxo, UtxoId};
use crate::wallet::WalletSession;

/// Set of selected UTxO identities
///
/// Membership is defined solely by (tx_hash, output_index). Order is
/// irrelevant. The session adapter owns the session's selection and
/// clears it on disconnect and whenever a refresh lands on a different
/// address.
#[derive(Debug, Clone, Default)]
pub struct UtxoSelection {
    selected: HashSet<UtxoId>,
}

impl UtxoSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the identity if absent, remove it if present
    pub fn toggle(&mut self, id: UtxoId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn contains(&self, id: &UtxoId) -> bool {
        self.selected.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Empty the selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Resolve selected identities back to full UTxO records
    ///
    /// Identities no longer present in the session's UTxO set are dropped;
    /// a selection never refers to outputs the wallet cannot spend.
    pub fn resolve(&self, session: &WalletSession) -> Vec<Utxo> {
        session
            .utxos
            .iter()
            .filter(|u| self.selected.contains(&u.id()))
            .cloned()
            .collect()
    }
}
