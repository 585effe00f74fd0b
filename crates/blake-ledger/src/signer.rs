//! Signing capabilities.
//!
//! The ledger never holds ambient keys. Callers hand it either a finished
//! [`Signature`] or a [`SignatureCapability`] to produce one. Two provenances
//! sit behind the same trait:
//!
//! - [`LocalKeySigner`]: the private key lives in this process.
//! - [`AgentSigner`]: the private key stays inside an [`ExternalAgent`]
//!   (a wallet, an HSM, a browser extension); only signature bytes come back.
//!
//! The message signed for a block is its payload, before the block exists.

use async_trait::async_trait;
use blake_ledger_core::{
    verify_signature, Keypair, Signature, SignatureScheme, SignerId, VerificationError,
};
use thiserror::Error;

/// Failures of a signing capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    /// The agent (or its user) declined to sign.
    #[error("signing request refused: {0}")]
    Refused(String),

    /// The agent could not be reached or failed internally.
    #[error("signing agent unavailable: {0}")]
    Unavailable(String),
}

/// A source of signatures, polymorphic over where the key lives.
#[async_trait]
pub trait SignatureCapability: Send + Sync {
    /// The provenance tag attached to produced signatures.
    fn scheme(&self) -> SignatureScheme;

    /// Sign a message. May wait on an external party.
    async fn sign(&self, message: &[u8]) -> Result<Signature, SignError>;

    /// Verify a signature and recover its signer.
    fn verify(&self, message: &[u8], signature: &Signature) -> Result<SignerId, VerificationError> {
        verify_signature(message, signature)
    }
}

/// Signs with a keypair held in-process.
#[derive(Debug, Clone)]
pub struct LocalKeySigner {
    keypair: Keypair,
}

impl LocalKeySigner {
    /// Wrap a keypair.
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// The identity signatures will recover to.
    pub fn signer_id(&self) -> SignerId {
        self.keypair.signer_id()
    }

    /// Sign without going through the async trait.
    pub fn sign_now(&self, message: &[u8]) -> Signature {
        self.keypair.sign(SignatureScheme::LocalKey, message)
    }
}

#[async_trait]
impl SignatureCapability for LocalKeySigner {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::LocalKey
    }

    async fn sign(&self, message: &[u8]) -> Result<Signature, SignError> {
        Ok(self.sign_now(message))
    }
}

/// An out-of-process key holder.
///
/// Implementations return raw envelope bytes (public key followed by the
/// Ed25519 signature). They may block on user approval; callers that need a
/// deadline wrap the call in `tokio::time::timeout`.
#[async_trait]
pub trait ExternalAgent: Send + Sync {
    /// Ask the agent to sign `message`.
    async fn request_signature(&self, message: &[u8]) -> Result<Vec<u8>, SignError>;
}

/// Signs by delegating to an [`ExternalAgent`].
#[derive(Debug, Clone)]
pub struct AgentSigner<A> {
    agent: A,
}

impl<A: ExternalAgent> AgentSigner<A> {
    /// Wrap an agent.
    pub fn new(agent: A) -> Self {
        Self { agent }
    }

    /// The wrapped agent.
    pub fn agent(&self) -> &A {
        &self.agent
    }
}

#[async_trait]
impl<A: ExternalAgent> SignatureCapability for AgentSigner<A> {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::ExternalAgent
    }

    async fn sign(&self, message: &[u8]) -> Result<Signature, SignError> {
        let bytes = self.agent.request_signature(message).await?;
        Ok(Signature::new(SignatureScheme::ExternalAgent, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct KeyInAgent(Keypair);

    #[async_trait]
    impl ExternalAgent for KeyInAgent {
        async fn request_signature(&self, message: &[u8]) -> Result<Vec<u8>, SignError> {
            Ok(self.0.sign_envelope(message))
        }
    }

    struct RefusingAgent;

    #[async_trait]
    impl ExternalAgent for RefusingAgent {
        async fn request_signature(&self, _message: &[u8]) -> Result<Vec<u8>, SignError> {
            Err(SignError::Refused("user rejected".into()))
        }
    }

    #[tokio::test]
    async fn test_local_signer_roundtrip() {
        let signer = LocalKeySigner::new(Keypair::from_seed(&[3u8; 32]));
        let sig = signer.sign(b"payload").await.unwrap();

        assert_eq!(sig.scheme, SignatureScheme::LocalKey);
        assert_eq!(signer.verify(b"payload", &sig).unwrap(), signer.signer_id());
    }

    #[tokio::test]
    async fn test_agent_signer_roundtrip() {
        let keypair = Keypair::from_seed(&[4u8; 32]);
        let expected = keypair.signer_id();
        let signer = AgentSigner::new(KeyInAgent(keypair));
        let sig = signer.sign(b"payload").await.unwrap();

        assert_eq!(sig.scheme, SignatureScheme::ExternalAgent);
        assert_eq!(signer.verify(b"payload", &sig).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_capabilities_are_interchangeable() {
        let signers: Vec<Box<dyn SignatureCapability>> = vec![
            Box::new(LocalKeySigner::new(Keypair::generate())),
            Box::new(AgentSigner::new(KeyInAgent(Keypair::generate()))),
        ];
        for signer in &signers {
            let sig = signer.sign(b"same message").await.unwrap();
            assert_eq!(sig.scheme, signer.scheme());
            assert!(signer.verify(b"same message", &sig).is_ok());
        }
    }

    #[tokio::test]
    async fn test_refusal_propagates() {
        let signer = AgentSigner::new(RefusingAgent);
        assert!(matches!(
            signer.sign(b"x").await,
            Err(SignError::Refused(_))
        ));
    }
}
