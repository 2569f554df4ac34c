//! ECDSA signing and verification with the stored keypair.

use crate::{
    keystore::KeyStore,
    provider::{CryptoProvider, DIGEST_SIZE},
    CryptoReason, Error, Result,
};
use alloc::vec::Vec;

/// Smallest DER encoding of a P-256 signature (`r` and `s` one byte each).
pub const MIN_SIGNATURE_SIZE: usize = 8;

/// Largest DER encoding of a P-256 signature (`r` and `s` 33 bytes each).
pub const MAX_SIGNATURE_SIZE: usize = 72;

/// Sign a precomputed SHA-256 digest with the current private key.
///
/// The digest is used as is: no hashing happens here.
pub fn sign(store: &KeyStore, provider: &impl CryptoProvider, digest: &[u8]) -> Result<Vec<u8>> {
    let digest: &[u8; DIGEST_SIZE] = digest.try_into().map_err(|_| Error::WrongDataLength {
        expected: DIGEST_SIZE,
        actual: digest.len(),
    })?;

    provider
        .sign_prehash(store.current().private_scalar(), digest)
        .map_err(|reason| {
            log::warn!("signing failed: {reason}");
            Error::from(reason)
        })
}

/// Verify `signature` over `message` with the current public key.
///
/// `message` is hashed with SHA-256 first. A signature that simply does not
/// match is `Ok(false)`; only a signature whose length cannot be a P-256 DER
/// encoding at all, or an unusable key, is an error. Bytes of an acceptable
/// length that are not valid DER also give `Ok(false)`.
pub fn verify(
    store: &KeyStore,
    provider: &impl CryptoProvider,
    message: &[u8],
    signature: &[u8],
) -> Result<bool> {
    if !(MIN_SIGNATURE_SIZE..=MAX_SIGNATURE_SIZE).contains(&signature.len()) {
        log::warn!("malformed signature of {} bytes", signature.len());
        return Err(CryptoReason::IllegalValue.into());
    }

    let digest = provider.sha256(message);
    let valid = provider.verify_prehash(store.current().public_point(), &digest, signature)?;
    log::debug!("signature valid: {valid}");
    Ok(valid)
}
