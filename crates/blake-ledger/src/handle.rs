//! LedgerHandle: a ledger shared between tasks.
//!
//! Appends go through a single writer lock, so reading the head and pushing
//! the next block happen in one critical section. Readers share the lock and
//! never see a block without its index entry. After every append the full
//! chain is published to subscribers so viewers can re-render it whole.

use std::sync::Arc;

use blake_ledger_core::{BlockHash, BlockSignature, BlockSnapshot, ChainError, Signature};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, trace};

use crate::config::LedgerConfig;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::signer::SignatureCapability;

/// The full ordered chain, as published after an append.
pub type ChainUpdate = Arc<Vec<BlockSnapshot>>;

/// Cloneable, task-safe access to a [`Ledger`].
#[derive(Debug, Clone)]
pub struct LedgerHandle {
    ledger: Arc<RwLock<Ledger>>,
    updates: broadcast::Sender<ChainUpdate>,
}

impl LedgerHandle {
    /// Create a fresh ledger behind a handle.
    pub fn new(config: LedgerConfig) -> Self {
        Self::from_ledger(Ledger::new(config))
    }

    /// Share an existing ledger.
    pub fn from_ledger(ledger: Ledger) -> Self {
        let (updates, _) = broadcast::channel(ledger.config().broadcast_capacity.max(1));
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            updates,
        }
    }

    /// Receive the full chain after every append.
    ///
    /// Every update is O(n) in chain length. Slow receivers may observe
    /// `RecvError::Lagged` and should resynchronise with [`LedgerHandle::snapshots`].
    pub fn subscribe(&self) -> broadcast::Receiver<ChainUpdate> {
        self.updates.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Append
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a payload with an already-produced signature, if any.
    pub async fn request_append(
        &self,
        payload: impl Into<String>,
        signature: Option<Signature>,
    ) -> Result<BlockSnapshot> {
        let signature = BlockSignature::from(signature);
        let mut ledger = self.ledger.write().await;
        let snapshot = ledger.append(payload, signature)?.snapshot();
        self.publish(&ledger);
        Ok(snapshot)
    }

    /// Sign the payload with `signer`, then append it.
    ///
    /// The signature is complete before the ledger is locked; a failed or
    /// refused signature leaves the ledger unchanged.
    pub async fn append_signed(
        &self,
        payload: impl Into<String>,
        signer: &dyn SignatureCapability,
    ) -> Result<BlockSnapshot> {
        let payload = payload.into();
        let signature = signer.sign(payload.as_bytes()).await?;
        trace!(scheme = ?signature.scheme, "signature ready");
        self.request_append(payload, Some(signature)).await
    }

    /// Append only if the head is still `expected_previous`.
    pub async fn append_after(
        &self,
        expected_previous: &BlockHash,
        payload: impl Into<String>,
        signature: Option<Signature>,
    ) -> Result<BlockSnapshot> {
        let signature = BlockSignature::from(signature);
        let mut ledger = self.ledger.write().await;
        let snapshot = ledger
            .append_after(expected_previous, payload, signature)?
            .snapshot();
        self.publish(&ledger);
        Ok(snapshot)
    }

    fn publish(&self, ledger: &Ledger) {
        let chain = Arc::new(ledger.snapshots());
        // No subscribers is not an error.
        match self.updates.send(chain) {
            Ok(receivers) => debug!(len = ledger.len(), receivers, "published chain"),
            Err(_) => trace!(len = ledger.len(), "no chain subscribers"),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Run a closure against the ledger under the read lock.
    pub async fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        let ledger = self.ledger.read().await;
        f(&ledger)
    }

    /// Whether the chain is internally consistent.
    pub async fn verify(&self) -> bool {
        self.ledger.read().await.verify()
    }

    /// Check the chain, reporting the first failure.
    pub async fn verify_chain(&self) -> std::result::Result<(), ChainError> {
        self.ledger.read().await.verify_chain()
    }

    /// The payload stored under a block hash.
    pub async fn retrieve(&self, hash: &BlockHash) -> Result<String> {
        let ledger = self.ledger.read().await;
        ledger.retrieve(hash).map(str::to_owned)
    }

    /// Snapshots of every block, in order.
    pub async fn snapshots(&self) -> Vec<BlockSnapshot> {
        self.ledger.read().await.snapshots()
    }

    /// Snapshot of the head block.
    pub async fn latest(&self) -> BlockSnapshot {
        self.ledger.read().await.latest().snapshot()
    }

    /// Number of blocks, genesis included.
    pub async fn len(&self) -> usize {
        self.ledger.read().await.len()
    }
}

impl Default for LedgerHandle {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
