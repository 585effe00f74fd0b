//! Signing primitives for Blake Ledger.
//!
//! Wraps Ed25519 signing with strong types. A signature is stored as a
//! self-describing envelope `public key (32) || signature (64)`, so verifying
//! it recovers the identity of the signer.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SignatureError, VerificationError};

/// Text form of an unsigned block's signature.
pub const UNSIGNED_SIGNATURE: &str = "0x0";

/// Length of a signature envelope in bytes.
pub const ENVELOPE_LEN: usize = 32 + 64;

/// The identity of a signer: a 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerId(pub [u8; 32]);

impl SignerId {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignerId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 32]> for SignerId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Where the private key behind a signature lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureScheme {
    /// Key held in this process.
    LocalKey,
    /// Key held by an external agent; only the signature crosses over.
    ExternalAgent,
}

impl SignatureScheme {
    /// Short tag used in the text form of a signature.
    pub fn tag(self) -> &'static str {
        match self {
            SignatureScheme::LocalKey => "local",
            SignatureScheme::ExternalAgent => "agent",
        }
    }

    /// Parse a tag produced by [`SignatureScheme::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "local" => Some(SignatureScheme::LocalKey),
            "agent" => Some(SignatureScheme::ExternalAgent),
            _ => None,
        }
    }
}

/// An opaque signature tagged with its provenance.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub scheme: SignatureScheme,
    pub bytes: Vec<u8>,
}

impl Signature {
    /// Wrap raw signature bytes.
    pub fn new(scheme: SignatureScheme, bytes: Vec<u8>) -> Self {
        Self { scheme, bytes }
    }

    /// Convert the bytes to hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(
            f,
            "Signature({}, {}...)",
            self.scheme.tag(),
            &hex[..hex.len().min(16)]
        )
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:0x{}", self.scheme.tag(), self.to_hex())
    }
}

impl FromStr for Signature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("missing scheme tag in {s:?}"))?;
        let scheme =
            SignatureScheme::from_tag(tag).ok_or_else(|| format!("unknown scheme {tag:?}"))?;
        let hex_part = rest
            .strip_prefix("0x")
            .ok_or_else(|| "signature bytes must start with 0x".to_string())?;
        let bytes = hex::decode(hex_part).map_err(|e| e.to_string())?;
        Ok(Self { scheme, bytes })
    }
}

/// The signature field of a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BlockSignature {
    /// No signature; rendered as `"0x0"`.
    #[default]
    Unsigned,
    /// A signature produced by some signing capability.
    Signed(Signature),
}

impl BlockSignature {
    /// Whether the block carries a signature.
    pub fn is_signed(&self) -> bool {
        matches!(self, BlockSignature::Signed(_))
    }

    /// The signature, if any.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            BlockSignature::Unsigned => None,
            BlockSignature::Signed(sig) => Some(sig),
        }
    }
}

impl fmt::Display for BlockSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockSignature::Unsigned => f.write_str(UNSIGNED_SIGNATURE),
            BlockSignature::Signed(sig) => write!(f, "{sig}"),
        }
    }
}

impl FromStr for BlockSignature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == UNSIGNED_SIGNATURE {
            Ok(BlockSignature::Unsigned)
        } else {
            s.parse().map(BlockSignature::Signed)
        }
    }
}

impl From<Signature> for BlockSignature {
    fn from(sig: Signature) -> Self {
        BlockSignature::Signed(sig)
    }
}

impl From<Option<Signature>> for BlockSignature {
    fn from(sig: Option<Signature>) -> Self {
        sig.map_or(BlockSignature::Unsigned, BlockSignature::Signed)
    }
}

/// An Ed25519 keypair for signing payloads.
///
/// This wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The identity this keypair signs as.
    pub fn signer_id(&self) -> SignerId {
        SignerId(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message, producing envelope bytes (public key || signature).
    pub fn sign_envelope(&self, message: &[u8]) -> Vec<u8> {
        let sig = self.signing_key.sign(message);
        let mut envelope = Vec::with_capacity(ENVELOPE_LEN);
        envelope.extend_from_slice(&self.signing_key.verifying_key().to_bytes());
        envelope.extend_from_slice(&sig.to_bytes());
        envelope
    }

    /// Sign a message and tag the result with the given scheme.
    pub fn sign(&self, scheme: SignatureScheme, message: &[u8]) -> Signature {
        Signature::new(scheme, self.sign_envelope(message))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.signer_id())
    }
}

/// Verify a signature over a message and recover the signer.
///
/// Fails with [`VerificationError::Malformed`] if the bytes are not a valid
/// envelope, and [`VerificationError::Invalid`] if the signature does not
/// cover the message.
pub fn verify_signature(
    message: &[u8],
    signature: &Signature,
) -> Result<SignerId, VerificationError> {
    if signature.bytes.len() != ENVELOPE_LEN {
        return Err(VerificationError::Malformed(format!(
            "expected {} bytes, got {}",
            ENVELOPE_LEN,
            signature.bytes.len()
        )));
    }

    let (key_bytes, sig_bytes) = signature.bytes.split_at(32);
    let mut key = [0u8; 32];
    key.copy_from_slice(key_bytes);
    let mut sig = [0u8; 64];
    sig.copy_from_slice(sig_bytes);

    let verifying_key = VerifyingKey::from_bytes(&key)
        .map_err(|_| VerificationError::Malformed("invalid public key".into()))?;

    verifying_key
        .verify(message, &DalekSignature::from_bytes(&sig))
        .map_err(|_| VerificationError::Invalid)?;

    Ok(SignerId(key))
}

/// Verify a signature and compare the recovered signer with an expected one.
pub fn verify_signer(
    message: &[u8],
    signature: &Signature,
    expected: &SignerId,
) -> Result<(), SignatureError> {
    let recovered = verify_signature(message, signature)?;
    if &recovered != expected {
        return Err(SignatureError::SignerMismatch {
            expected: *expected,
            recovered,
        });
    }
    Ok(())
}
