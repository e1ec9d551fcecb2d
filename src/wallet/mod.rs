//! Wallet capability boundary and session adapter
//!
//! The workbench never talks to a browser extension directly. It depends on
//! the [`WalletCapability`] trait, obtained through a [`WalletProvider`], and
//! threads the resulting session handle through every component call. Testing
//! against a fake wallet only requires implementing these two traits.

pub mod session;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    data_structures::{Asset, Utxo},
    errors::WorkbenchResult,
};

pub use session::{ConnectionStatus, Network, SessionAdapter, WalletSession};

/// DRep information reported by the wallet, used for the public-key hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DRepInfo {
    pub public_key_hash: String,
}

/// Capability session handed out by a connected wallet
///
/// Mirrors the CIP-30-style wallet API surface the workbench depends on.
/// Every method may fail asynchronously; implementations map transport and
/// wallet faults onto the workbench error taxonomy.
#[async_trait(?Send)]
pub trait WalletCapability {
    /// All spendable outputs owned by the wallet
    async fn get_utxos(&self) -> WorkbenchResult<Vec<Utxo>>;

    /// Wallet balance as an asset list
    async fn get_balance(&self) -> WorkbenchResult<Vec<Asset>>;

    /// Addresses the wallet has used, primary address first
    async fn get_used_addresses(&self) -> WorkbenchResult<Vec<String>>;

    /// Network identifier: 0 testnet, 1 mainnet
    async fn get_network_id(&self) -> WorkbenchResult<u8>;

    /// DRep info carrying the wallet's public-key hash
    async fn get_drep(&self) -> WorkbenchResult<DRepInfo>;

    /// Sign an unsigned transaction encoding, returning the signed encoding
    async fn sign_tx(&self, unsigned_tx: &str) -> WorkbenchResult<String>;

    /// Submit a signed transaction encoding, returning the transaction id
    async fn submit_tx(&self, signed_tx: &str) -> WorkbenchResult<String>;
}

/// Discovery boundary that turns a wallet id into a capability session
#[async_trait(?Send)]
pub trait WalletProvider {
    type Capability: WalletCapability;

    /// Establish a capability session for the named wallet
    async fn enable(&self, wallet_id: &str) -> WorkbenchResult<Self::Capability>;
}
