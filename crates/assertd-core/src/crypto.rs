//! Keys, signatures and digests.
//!
//! Public keys and signatures travel inside assertions as packets: a format
//! byte followed by the raw key or signature.
//!
//! - key packet: `0x01 || 32-byte Ed25519 public key`
//! - signature packet: `0x01 || 64-byte Ed25519 signature`
//!
//! A key is named everywhere by its key id, the url-safe unpadded base64 of
//! the SHA3-384 of its key packet.

use std::fmt;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_384};

use crate::error::CoreError;

/// Format byte for Ed25519 key and signature packets.
pub const FORMAT_ED25519: u8 = 0x01;

/// Length of a SHA3-384 digest in bytes.
pub const SHA3_384_LEN: usize = 48;

/// Url-safe unpadded base64 of the SHA3-384 of `data`, the form used by
/// key ids and `*-sha3-384` headers.
pub fn sha3_384_digest(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(Sha3_384::digest(data))
}

fn to_packet(raw: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(raw.len() + 1);
    packet.push(FORMAT_ED25519);
    packet.extend_from_slice(raw);
    packet
}

/// Strip the format byte and check the payload length.
fn from_packet<const N: usize>(packet: &[u8]) -> Option<[u8; N]> {
    match packet.split_first() {
        Some((&FORMAT_ED25519, raw)) => raw.try_into().ok(),
        _ => None,
    }
}

fn short_hex(bytes: &[u8]) -> String {
    hex::encode(&bytes[..bytes.len().min(8)])
}

/// Blake3 digest of an encoded assertion, used to detect corrupt rows.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blake3Hash(pub [u8; 32]);

impl Blake3Hash {
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blake3Hash({})", short_hex(&self.0))
    }
}

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn to_packet(&self) -> Vec<u8> {
        to_packet(&self.0)
    }

    pub fn from_packet(packet: &[u8]) -> Result<Self, CoreError> {
        from_packet(packet)
            .map(Self)
            .ok_or(CoreError::InvalidPublicKey)
    }

    /// The id used by the `sign-key-sha3-384` and `public-key-sha3-384`
    /// headers.
    pub fn key_id(&self) -> String {
        sha3_384_digest(&self.to_packet())
    }

    /// Standard base64 of the key packet, as carried in an `account-key`
    /// body.
    pub fn encode_body(&self) -> String {
        STANDARD.encode(self.to_packet())
    }

    pub fn decode_body(body: &[u8]) -> Result<Self, CoreError> {
        let packet = std::str::from_utf8(body)
            .ok()
            .and_then(|text| STANDARD.decode(text.trim()).ok())
            .ok_or(CoreError::InvalidPublicKey)?;
        Self::from_packet(&packet)
    }

    /// Verify an Ed25519 signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CoreError> {
        let key = VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        key.verify(message, &Signature::from_bytes(&signature.0))
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", short_hex(&self.0))
    }
}

/// Encode a public key as an `account-key` body.
pub fn encode_public_key(key: &Ed25519PublicKey) -> String {
    key.encode_body()
}

/// Decode the public key held in an `account-key` body.
pub fn decode_public_key(body: &[u8]) -> Result<Ed25519PublicKey, CoreError> {
    Ed25519PublicKey::decode_body(body)
}

/// An Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// The packet carried, base64 encoded, in the assertion trailer.
    pub fn to_packet(&self) -> Vec<u8> {
        to_packet(&self.0)
    }

    pub fn from_packet(packet: &[u8]) -> Result<Self, CoreError> {
        from_packet(packet)
            .map(Self)
            .ok_or(CoreError::UnsupportedSignatureFormat)
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({}..)", short_hex(&self.0))
    }
}

/// An in-memory signing key.
///
/// Keys are never persisted by assertd.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    /// Derive a keypair from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn key_id(&self) -> String {
        self.public_key().key_id()
    }

    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", self.key_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::from_seed(&[0x11; 32]);
        let signature = keypair.sign(b"type: account");

        let public_key = keypair.public_key();
        assert!(public_key.verify(b"type: account", &signature).is_ok());
        assert!(matches!(
            public_key.verify(b"type: Account", &signature),
            Err(CoreError::InvalidSignature)
        ));
        assert!(Keypair::from_seed(&[0x12; 32])
            .public_key()
            .verify(b"type: account", &signature)
            .is_err());
    }

    #[test]
    fn test_seeded_keys_are_stable() {
        let a = Keypair::from_seed(&[0x42; 32]);
        let b = Keypair::from_seed(&[0x42; 32]);
        assert_eq!(a.key_id(), b.key_id());
        assert_ne!(a.key_id(), Keypair::generate().key_id());
    }

    #[test]
    fn test_key_id_shape() {
        let keypair = Keypair::from_seed(&[0x07; 32]);
        let id = keypair.key_id();
        // 48 bytes of url-safe base64 without padding
        assert_eq!(id.len(), 64);
        assert!(!id.contains('='));
        assert!(!id.contains('+') && !id.contains('/'));
        assert_eq!(id, sha3_384_digest(&keypair.public_key().to_packet()));
    }

    #[test]
    fn test_public_key_body() {
        let pk = Keypair::generate().public_key();
        let body = encode_public_key(&pk);
        assert_eq!(decode_public_key(body.as_bytes()).unwrap(), pk);
        assert_eq!(decode_public_key(format!("{}\n", body).as_bytes()).unwrap(), pk);

        assert!(decode_public_key(b"not base64!").is_err());
        let wrong_format = STANDARD.encode([0x02; 33]);
        assert!(decode_public_key(wrong_format.as_bytes()).is_err());
        let short = STANDARD.encode([0x01; 20]);
        assert!(decode_public_key(short.as_bytes()).is_err());
    }

    #[test]
    fn test_signature_packet() {
        let sig = Keypair::generate().sign(b"data");
        let packet = sig.to_packet();
        assert_eq!(packet.len(), 65);
        assert_eq!(packet[0], FORMAT_ED25519);
        assert_eq!(Ed25519Signature::from_packet(&packet).unwrap(), sig);

        let bad_packets: [&[u8]; 3] = [b"\x01sig", &[], &[0x02; 65]];
        for bad in bad_packets {
            assert!(matches!(
                Ed25519Signature::from_packet(bad),
                Err(CoreError::UnsupportedSignatureFormat)
            ));
        }
    }

    #[test]
    fn test_blake3_hash() {
        let h1 = Blake3Hash::hash(b"test data");
        assert_eq!(h1, Blake3Hash::hash(b"test data"));
        assert_ne!(h1, Blake3Hash::hash(b"different data"));
        assert_eq!(h1.to_hex().len(), 64);
    }
}
