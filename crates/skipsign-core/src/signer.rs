//! RSA signing and verification of exclusion records.
//!
//! Records are signed with RSASSA-PSS over SHA-256 (MGF1-SHA-256, salt length
//! equal to the digest length). The message is the record's canonical bytes;
//! `ring` hashes it internally, so this is a digest-then-sign construction.
//!
//! Accepted key encodings:
//! - `PRIVATE KEY` (PKCS#8) and `RSA PRIVATE KEY` (PKCS#1) for signing
//! - `PUBLIC KEY` (SubjectPublicKeyInfo, what `openssl rsa -pubout` writes) and
//!   `RSA PUBLIC KEY` (PKCS#1) for verification, or any accepted private key
//!   from which the public half is derived

use std::fmt;

use ring::rand::SystemRandom;
use ring::signature::{self, KeyPair, RsaKeyPair, UnparsedPublicKey};
use x509_parser::oid_registry::OID_PKCS1_RSAENCRYPTION;
use x509_parser::prelude::FromDer;
use x509_parser::x509::SubjectPublicKeyInfo;

use crate::errors::{SkipSignError, SkipSignResult};
use crate::record::{ExclusionRecord, RecordSignature, SIG_ALG_RSA_PSS_SHA256};

pub const PEM_TAG_PKCS8: &str = "PRIVATE KEY";
pub const PEM_TAG_RSA_PRIVATE: &str = "RSA PRIVATE KEY";
pub const PEM_TAG_RSA_PUBLIC: &str = "RSA PUBLIC KEY";
pub const PEM_TAG_SPKI: &str = "PUBLIC KEY";

/// An RSA private key. Only lives for the signing step.
pub struct SigningKey {
    pair: RsaKeyPair,
}

impl SigningKey {
    /// Parse a PEM-encoded RSA private key.
    pub fn from_pem(bytes: &[u8]) -> SkipSignResult<Self> {
        let block = parse_pem(bytes)?;
        let parsed = match block.tag() {
            PEM_TAG_PKCS8 => RsaKeyPair::from_pkcs8(block.contents()),
            PEM_TAG_RSA_PRIVATE => RsaKeyPair::from_der(block.contents()),
            other => {
                return Err(SkipSignError::key_format(format!(
                    "unsupported PEM block {other:?}, \
                     expected {PEM_TAG_PKCS8:?} or {PEM_TAG_RSA_PRIVATE:?}"
                )))
            }
        };
        let pair = parsed
            .map_err(|e| SkipSignError::key_format(format!("rejected RSA private key: {e}")))?;
        Ok(Self { pair })
    }

    pub fn modulus_bits(&self) -> usize {
        self.pair.public().modulus_len() * 8
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            der: self.pair.public_key().as_ref().to_vec(),
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

/// An RSA public key, held as PKCS#1 `RSAPublicKey` DER.
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    der: Vec<u8>,
}

impl VerifyingKey {
    /// Parse a public key PEM, or derive the public key from a private key PEM.
    pub fn from_pem(bytes: &[u8]) -> SkipSignResult<Self> {
        let block = parse_pem(bytes)?;
        match block.tag() {
            PEM_TAG_RSA_PUBLIC => Ok(Self {
                der: block.contents().to_vec(),
            }),
            PEM_TAG_SPKI => Ok(Self {
                der: rsa_public_key_from_spki(block.contents())?,
            }),
            PEM_TAG_PKCS8 | PEM_TAG_RSA_PRIVATE => Ok(SigningKey::from_pem(bytes)?.verifying_key()),
            other => Err(SkipSignError::key_format(format!(
                "unsupported PEM block {other:?}, \
                 expected {PEM_TAG_SPKI:?}, {PEM_TAG_RSA_PUBLIC:?} or a private key"
            ))),
        }
    }

    pub fn to_pem(&self) -> String {
        pem::encode(&pem::Pem::new(PEM_TAG_RSA_PUBLIC, self.der.clone()))
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerifyingKey({} DER bytes)", self.der.len())
    }
}

// The SPKI bit string of an rsaEncryption key is the PKCS#1 `RSAPublicKey`.
fn rsa_public_key_from_spki(der: &[u8]) -> SkipSignResult<Vec<u8>> {
    let (_, spki) = SubjectPublicKeyInfo::from_der(der)
        .map_err(|e| SkipSignError::key_format(format!("malformed public key: {e}")))?;
    if spki.algorithm.algorithm != OID_PKCS1_RSAENCRYPTION {
        return Err(SkipSignError::key_format(format!(
            "public key algorithm {} is not RSA",
            spki.algorithm.algorithm
        )));
    }
    Ok(spki.subject_public_key.data.to_vec())
}

fn parse_pem(bytes: &[u8]) -> SkipSignResult<pem::Pem> {
    pem::parse(bytes).map_err(|e| SkipSignError::key_format(format!("not a PEM encoded key: {e}")))
}

/// Sign raw canonical bytes.
pub fn sign_bytes(message: &[u8], key: &SigningKey) -> SkipSignResult<Vec<u8>> {
    let rng = SystemRandom::new();
    let mut sig = vec![0u8; key.pair.public().modulus_len()];
    key.pair
        .sign(&signature::RSA_PSS_SHA256, &rng, message, &mut sig)
        .map_err(|_| SkipSignError::signing("RSA-PSS signing failed"))?;
    Ok(sig)
}

/// Check a signature over raw canonical bytes.
pub fn verify_bytes(message: &[u8], sig: &[u8], key: &VerifyingKey) -> SkipSignResult<()> {
    UnparsedPublicKey::new(&signature::RSA_PSS_2048_8192_SHA256, &key.der)
        .verify(message, sig)
        .map_err(|_| SkipSignError::verification("signature does not match record"))
}

/// Sign a record, returning it with the signature attached.
pub fn sign(mut record: ExclusionRecord, key: &SigningKey) -> SkipSignResult<ExclusionRecord> {
    if record.is_signed() {
        return Err(SkipSignError::signing("record is already signed"));
    }
    let message = record.canonical_bytes()?;
    let bytes = sign_bytes(&message, key)?;
    record.attach_signature(RecordSignature {
        alg: SIG_ALG_RSA_PSS_SHA256.to_string(),
        bytes,
    })?;
    Ok(record)
}

/// Verify a signed record against a public key.
pub fn verify(record: &ExclusionRecord, key: &VerifyingKey) -> SkipSignResult<()> {
    let sig = record
        .signature()
        .ok_or_else(|| SkipSignError::verification("record is not signed"))?;
    if sig.alg != SIG_ALG_RSA_PSS_SHA256 {
        return Err(SkipSignError::verification(format!(
            "unsupported signature algorithm: {}",
            sig.alg
        )));
    }
    verify_bytes(&record.canonical_bytes()?, &sig.bytes, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityCodec;
    use crate::record::build;
    use crate::test_fixtures::*;
    use assert_matches::assert_matches;

    fn record() -> ExclusionRecord {
        let codec = IdentityCodec::default();
        build(vec![
            codec.decode(NODE_A).unwrap(),
            codec.decode(NODE_B).unwrap(),
        ])
    }

    #[test]
    fn loads_pkcs8_and_pkcs1_forms_of_same_key() {
        let a = SigningKey::from_pem(SIGNING_PKCS8.as_bytes()).unwrap();
        let b = SigningKey::from_pem(SIGNING_PKCS1.as_bytes()).unwrap();
        assert_eq!(a.modulus_bits(), 2048);
        assert_eq!(a.verifying_key(), b.verifying_key());
    }

    #[test]
    fn non_pem_key_rejected() {
        let e = SigningKey::from_pem(NOT_A_KEY.as_bytes()).unwrap_err();
        assert_matches!(e, SkipSignError::KeyFormat(_));
    }

    #[test]
    fn public_key_is_not_a_signing_key() {
        let e = SigningKey::from_pem(SIGNING_PUBLIC.as_bytes()).unwrap_err();
        assert!(e.to_string().contains("unsupported PEM block"));
    }

    #[test]
    fn garbage_inside_pem_rejected() {
        let fake = pem::encode(&pem::Pem::new(PEM_TAG_PKCS8, vec![1u8, 2, 3]));
        let e = SigningKey::from_pem(fake.as_bytes()).unwrap_err();
        assert_matches!(e, SkipSignError::KeyFormat(_));
    }

    #[test]
    fn debug_does_not_leak_key() {
        let k = SigningKey::from_pem(SIGNING_PKCS8.as_bytes()).unwrap();
        let s = format!("{k:?}");
        assert!(s.contains("modulus_bits"));
        assert!(!s.contains("PRIVATE"));
    }

    #[test]
    fn sign_then_verify() {
        let sk = SigningKey::from_pem(SIGNING_PKCS8.as_bytes()).unwrap();
        let pk = VerifyingKey::from_pem(SIGNING_PUBLIC.as_bytes()).unwrap();
        let signed = sign(record(), &sk).unwrap();
        assert_eq!(signed.signature().unwrap().bytes.len(), 256);
        verify(&signed, &pk).unwrap();
        verify_bytes(
            &signed.canonical_bytes().unwrap(),
            &signed.signature().unwrap().bytes,
            &pk,
        )
        .unwrap();
    }

    #[test]
    fn verifying_key_derived_from_private_pem() {
        let sk = SigningKey::from_pem(SIGNING_PKCS1.as_bytes()).unwrap();
        let pk = VerifyingKey::from_pem(SIGNING_PKCS8.as_bytes()).unwrap();
        verify(&sign(record(), &sk).unwrap(), &pk).unwrap();
    }

    #[test]
    fn spki_public_key_verifies() {
        let sk = SigningKey::from_pem(SIGNING_PKCS8.as_bytes()).unwrap();
        let spki = VerifyingKey::from_pem(SIGNING_SPKI.as_bytes()).unwrap();
        assert_eq!(spki, VerifyingKey::from_pem(SIGNING_PUBLIC.as_bytes()).unwrap());
        verify(&sign(record(), &sk).unwrap(), &spki).unwrap();
    }

    #[test]
    fn garbage_spki_rejected() {
        let fake = pem::encode(&pem::Pem::new(PEM_TAG_SPKI, vec![0x30u8, 0x03, 1, 2, 3]));
        let e = VerifyingKey::from_pem(fake.as_bytes()).unwrap_err();
        assert_matches!(e, SkipSignError::KeyFormat(_));
    }

    #[test]
    fn public_key_pem_roundtrip() {
        let pk = VerifyingKey::from_pem(SIGNING_PUBLIC.as_bytes()).unwrap();
        let again = VerifyingKey::from_pem(pk.to_pem().as_bytes()).unwrap();
        assert_eq!(pk, again);
    }

    #[test]
    fn wrong_key_fails() {
        let sk = SigningKey::from_pem(SIGNING_PKCS8.as_bytes()).unwrap();
        let other = VerifyingKey::from_pem(OTHER_PUBLIC.as_bytes()).unwrap();
        let e = verify(&sign(record(), &sk).unwrap(), &other).unwrap_err();
        assert_matches!(e, SkipSignError::Verification(_));
    }

    #[test]
    fn altered_identity_byte_fails() {
        let sk = SigningKey::from_pem(SIGNING_PKCS8.as_bytes()).unwrap();
        let pk = sk.verifying_key();
        let signed = sign(record(), &sk).unwrap();
        let sig = signed.signature().unwrap().clone();

        let mut bytes = signed.identities()[1].as_bytes().to_vec();
        bytes[0] ^= 0x01;
        let codec = IdentityCodec::default();
        let tampered_id = codec.identity_from_bytes("tampered", bytes).unwrap();
        let tampered = ExclusionRecord::from_parts(
            vec![signed.identities()[0].clone(), tampered_id],
            sig,
        );
        assert!(verify(&tampered, &pk).is_err());
    }

    #[test]
    fn unsigned_record_fails_verification() {
        let pk = VerifyingKey::from_pem(SIGNING_PUBLIC.as_bytes()).unwrap();
        let e = verify(&record(), &pk).unwrap_err();
        assert!(e.to_string().contains("not signed"));
    }

    #[test]
    fn signing_twice_rejected() {
        let sk = SigningKey::from_pem(SIGNING_PKCS8.as_bytes()).unwrap();
        let signed = sign(record(), &sk).unwrap();
        let e = sign(signed, &sk).unwrap_err();
        assert_matches!(e, SkipSignError::Signing(_));
    }

    #[test]
    fn empty_record_can_be_signed() {
        let sk = SigningKey::from_pem(SIGNING_PKCS8.as_bytes()).unwrap();
        let signed = sign(build(Vec::new()), &sk).unwrap();
        verify(&signed, &sk.verifying_key()).unwrap();
    }
}
