//! Wallet session adapter
//!
//! Owns the normalized view of the connected wallet: address, balance, UTxO
//! set and derived public-key hash. The adapter is the single writer of this
//! state; every other component reads a snapshot. Any state-mutating chain
//! operation elsewhere in the workbench resynchronizes through [`SessionAdapter::refresh`].

use tracing::{debug, warn};

use crate::{
    data_structures::{utxo::lovelace_of, Utxo},
    errors::{WorkbenchError, WorkbenchResult},
    selection::UtxoSelection,
    wallet::{WalletCapability, WalletProvider},
};

/// Connection status of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
}

/// Cardano network the connected wallet is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    pub fn from_id(id: u8) -> Self {
        if id == 1 {
            Network::Mainnet
        } else {
            Network::Testnet
        }
    }
}

/// Normalized snapshot of the connected wallet's state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    pub status: ConnectionStatus,
    pub network: Network,
    pub address: Option<String>,
    /// Balance in lovelace
    pub balance: u64,
    pub utxos: Vec<Utxo>,
    pub public_key_hash: Option<String>,
}

impl WalletSession {
    /// Empty, disconnected session
    pub fn empty() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            network: Network::Testnet,
            address: None,
            balance: 0,
            utxos: Vec::new(),
            public_key_hash: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

impl Default for WalletSession {
    fn default() -> Self {
        Self::empty()
    }
}

/// Adapter wrapping a wallet capability session
///
/// Created disconnected; [`connect`](Self::connect) establishes the session
/// and performs the initial refresh. On a failed refresh the last-known-good
/// snapshot stays visible until the caller disconnects.
pub struct SessionAdapter<W: WalletCapability> {
    wallet: Option<W>,
    session: WalletSession,
    selection: UtxoSelection,
}

impl<W: WalletCapability> SessionAdapter<W> {
    pub fn new() -> Self {
        Self {
            wallet: None,
            session: WalletSession::empty(),
            selection: UtxoSelection::new(),
        }
    }

    /// Establish a capability session via the provider and read initial state
    ///
    /// A provider failure or a failed initial read maps to `ConnectionError`
    /// and leaves the adapter disconnected.
    pub async fn connect<P>(&mut self, provider: &P, wallet_id: &str) -> WorkbenchResult<()>
    where
        P: WalletProvider<Capability = W>,
    {
        let wallet = provider.enable(wallet_id).await.map_err(|e| {
            WorkbenchError::ConnectionError(format!("Failed to enable wallet '{wallet_id}': {e}"))
        })?;
        self.wallet = Some(wallet);

        if let Err(e) = self.refresh().await {
            self.disconnect();
            return Err(WorkbenchError::ConnectionError(format!(
                "Failed to read initial wallet state: {e}"
            )));
        }
        debug!(wallet_id, "wallet session established");
        Ok(())
    }

    /// Release the session and reset all dependent state to empty values,
    /// including the UTxO selection
    pub fn disconnect(&mut self) {
        self.wallet = None;
        self.session = WalletSession::empty();
        self.selection.clear();
    }

    /// Re-read balance, used addresses, UTxO set and public-key hash
    ///
    /// On transport failure returns `RefreshError` while keeping the
    /// last-known-good snapshot visible (stale-but-available semantics).
    /// A refresh that lands on a different address clears the UTxO
    /// selection; pinned identities never carry across addresses.
    pub async fn refresh(&mut self) -> WorkbenchResult<()> {
        let wallet = self
            .wallet
            .as_ref()
            .ok_or_else(|| WorkbenchError::refresh_failed("No active wallet session"))?;

        let utxos = wallet
            .get_utxos()
            .await
            .map_err(|e| refresh_error("UTxO set", &e))?;
        let balance = wallet
            .get_balance()
            .await
            .map_err(|e| refresh_error("balance", &e))?;
        let used_addresses = wallet
            .get_used_addresses()
            .await
            .map_err(|e| refresh_error("used addresses", &e))?;
        let network_id = wallet
            .get_network_id()
            .await
            .map_err(|e| refresh_error("network id", &e))?;
        let drep = wallet
            .get_drep()
            .await
            .map_err(|e| refresh_error("DRep info", &e))?;

        let previous_address = self.session.address.take();
        self.session = WalletSession {
            status: ConnectionStatus::Connected,
            network: Network::from_id(network_id),
            address: used_addresses.first().cloned(),
            balance: lovelace_of(&balance),
            utxos,
            public_key_hash: Some(drep.public_key_hash),
        };
        if self.session.address != previous_address {
            self.selection.clear();
        }
        debug!(
            balance = self.session.balance,
            utxos = self.session.utxos.len(),
            "wallet session refreshed"
        );
        Ok(())
    }

    /// Current snapshot; empty values when disconnected
    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    /// The capability handle, when connected
    pub fn wallet(&self) -> Option<&W> {
        self.wallet.as_ref()
    }

    /// The manual UTxO selection tied to this session
    pub fn selection(&self) -> &UtxoSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut UtxoSelection {
        &mut self.selection
    }
}

impl<W: WalletCapability> Default for SessionAdapter<W> {
    fn default() -> Self {
        Self::new()
    }
}

fn refresh_error(what: &str, cause: &WorkbenchError) -> WorkbenchError {
    warn!(what, %cause, "wallet refresh failed");
    WorkbenchError::RefreshError(format!("Failed to fetch {what}: {cause}"))
}
