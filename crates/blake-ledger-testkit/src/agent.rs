//! A scriptable [`ExternalAgent`] for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use blake_ledger::{AgentSigner, ExternalAgent, SignError};
use blake_ledger_core::{Keypair, SignerId};

/// How a [`MockAgent`] answers signing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentBehavior {
    /// Sign every request.
    Approve,
    /// Decline every request.
    Refuse,
    /// Report the agent as unreachable.
    Offline,
    /// Return an envelope whose signature bytes are corrupted.
    Garble,
}

/// An in-memory wallet that holds its key and signs on request.
pub struct MockAgent {
    keypair: Keypair,
    behavior: AgentBehavior,
    delay: Option<Duration>,
    requests: AtomicUsize,
}

impl MockAgent {
    /// An agent that approves everything.
    pub fn approving(keypair: Keypair) -> Self {
        Self::with_behavior(keypair, AgentBehavior::Approve)
    }

    /// An agent that answers every request according to `behavior`.
    pub fn with_behavior(keypair: Keypair, behavior: AgentBehavior) -> Self {
        Self {
            keypair,
            behavior,
            delay: None,
            requests: AtomicUsize::new(0),
        }
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The identity this agent signs as.
    pub fn signer_id(&self) -> SignerId {
        self.keypair.signer_id()
    }

    /// Number of signing requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Wrap in an [`AgentSigner`].
    pub fn into_signer(self) -> AgentSigner<Self> {
        AgentSigner::new(self)
    }
}

#[async_trait]
impl ExternalAgent for MockAgent {
    async fn request_signature(&self, message: &[u8]) -> Result<Vec<u8>, SignError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.behavior {
            AgentBehavior::Approve => Ok(self.keypair.sign_envelope(message)),
            AgentBehavior::Refuse => Err(SignError::Refused("user rejected the request".into())),
            AgentBehavior::Offline => Err(SignError::Unavailable("agent not connected".into())),
            AgentBehavior::Garble => {
                let mut envelope = self.keypair.sign_envelope(message);
                if let Some(last) = envelope.last_mut() {
                    *last ^= 0xff;
                }
                Ok(envelope)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blake_ledger::{LedgerConfig, LedgerError, LedgerHandle};
    use blake_ledger_core::SignatureScheme;

    fn keypair() -> Keypair {
        Keypair::from_seed(&[9u8; 32])
    }

    #[tokio::test]
    async fn test_approving_agent_signs_blocks() {
        let handle = LedgerHandle::new(LedgerConfig::default().reject_unsigned(true));
        let agent = MockAgent::approving(keypair());
        let expected = agent.signer_id();
        let signer = agent.into_signer();

        let snapshot = handle.append_signed("hello", &signer).await.unwrap();
        assert!(snapshot.signature.starts_with("agent:0x"));
        assert_eq!(signer.agent().requests(), 1);

        handle
            .read(|l| l.verify_block_signer(1, &expected))
            .await
            .unwrap();
        let scheme = handle
            .read(|l| l.get(1).and_then(|b| b.signature().signature()).map(|s| s.scheme))
            .await;
        assert_eq!(scheme, Some(SignatureScheme::ExternalAgent));
    }

    #[tokio::test]
    async fn test_refusing_and_offline_agents_append_nothing() {
        let handle = LedgerHandle::default();

        for behavior in [AgentBehavior::Refuse, AgentBehavior::Offline] {
            let signer = MockAgent::with_behavior(keypair(), behavior).into_signer();
            let err = handle.append_signed("x", &signer).await.unwrap_err();
            assert!(matches!(err, LedgerError::Sign(_)));
        }
        assert_eq!(handle.len().await, 1);
    }

    #[tokio::test]
    async fn test_garbled_signature_is_stored_but_fails_verification() {
        let handle = LedgerHandle::default();
        let signer = MockAgent::with_behavior(keypair(), AgentBehavior::Garble).into_signer();

        handle.append_signed("x", &signer).await.unwrap();
        assert!(handle.verify().await);

        let err = handle.read(|l| l.verify_block_signature(1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Signature(_)));
    }

    #[tokio::test]
    async fn test_delayed_agent_times_out() {
        let handle = LedgerHandle::default();
        let signer = MockAgent::approving(keypair())
            .with_delay(Duration::from_secs(10))
            .into_signer();

        let outcome = tokio::time::timeout(
            Duration::from_millis(50),
            handle.append_signed("slow", &signer),
        )
        .await;
        assert!(outcome.is_err());
        assert_eq!(handle.len().await, 1);
    }
}
