//! Persistent key material.

use crate::{
    params::{
        DomainParameters, FieldBytes, PointBytes, DEFAULT_PRIVATE_SCALAR, DEFAULT_PUBLIC_POINT,
        P256,
    },
    provider::CryptoProvider,
    CryptoReason, Result,
};
use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of candidate scalars drawn by [`KeyStore::regenerate`] before it
/// gives up. A uniformly random 256-bit string is outside `[1, r)` with
/// probability below 2⁻³², so running out means the entropy source is broken.
pub const MAX_KEYGEN_ATTEMPTS: usize = 8;

/// ECDSA keypair: private scalar `d` and public point `Q = d·G`.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    private_scalar: FieldBytes,
    public_point: PointBytes,
}

impl KeyPair {
    /// Serialized private scalar.
    pub fn private_scalar(&self) -> &FieldBytes {
        &self.private_scalar
    }

    /// Uncompressed public point.
    pub fn public_point(&self) -> &PointBytes {
        &self.public_point
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_point", &self.public_point)
            .finish_non_exhaustive()
    }
}

/// Owner of the applet's keypair and the curve it lives on.
///
/// Handlers borrow the store for the duration of one command; only
/// [`KeyStore::regenerate`] takes it mutably.
#[derive(Debug)]
pub struct KeyStore {
    domain: &'static DomainParameters,
    keys: KeyPair,
}

impl KeyStore {
    /// Load the known-answer default keypair on P-256.
    pub fn initialize() -> Self {
        Self {
            domain: &P256,
            keys: KeyPair {
                private_scalar: DEFAULT_PRIVATE_SCALAR,
                public_point: DEFAULT_PUBLIC_POINT,
            },
        }
    }

    /// Curve the keys are bound to.
    pub fn domain(&self) -> &DomainParameters {
        self.domain
    }

    /// Keypair currently in use.
    pub fn current(&self) -> &KeyPair {
        &self.keys
    }

    /// Replace the keypair with a freshly generated one.
    ///
    /// The new pair is fully built before it is installed: on error the
    /// previous pair stays in place untouched.
    pub fn regenerate(&mut self, provider: &mut impl CryptoProvider) -> Result<()> {
        let keys = generate(provider)?;
        self.keys = keys;
        log::info!("installed freshly generated keypair");
        Ok(())
    }
}

/// Rejection-sample a private scalar and derive its public point.
fn generate(provider: &mut impl CryptoProvider) -> Result<KeyPair> {
    let mut keys = KeyPair {
        private_scalar: [0; 32],
        public_point: [0; 65],
    };

    for _ in 0..MAX_KEYGEN_ATTEMPTS {
        provider.fill_random(&mut keys.private_scalar)?;

        match provider.public_point(&keys.private_scalar) {
            Ok(point) => {
                keys.public_point = point;
                return Ok(keys);
            }
            Err(CryptoReason::IllegalValue) => continue,
            Err(reason) => return Err(reason.into()),
        }
    }

    log::warn!("no valid scalar after {MAX_KEYGEN_ATTEMPTS} attempts");
    Err(CryptoReason::IllegalValue.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{provider::SoftwareProvider, Error};
    use alloc::vec::Vec;
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};

    fn provider() -> SoftwareProvider<ChaCha20Rng> {
        SoftwareProvider::new(ChaCha20Rng::seed_from_u64(7))
    }

    /// Provider whose entropy source replays a script of byte patterns.
    struct Scripted {
        inner: SoftwareProvider<ChaCha20Rng>,
        script: Vec<core::result::Result<u8, CryptoReason>>,
    }

    impl CryptoProvider for Scripted {
        fn fill_random(&mut self, dest: &mut [u8]) -> core::result::Result<(), CryptoReason> {
            match self.script.remove(0) {
                Ok(byte) => {
                    dest.fill(byte);
                    Ok(())
                }
                Err(reason) => Err(reason),
            }
        }

        fn public_point(
            &self,
            scalar: &FieldBytes,
        ) -> core::result::Result<PointBytes, CryptoReason> {
            self.inner.public_point(scalar)
        }

        fn sha256(&self, data: &[u8]) -> crate::provider::DigestBytes {
            self.inner.sha256(data)
        }

        fn sign_prehash(
            &self,
            scalar: &FieldBytes,
            digest: &crate::provider::DigestBytes,
        ) -> core::result::Result<Vec<u8>, CryptoReason> {
            self.inner.sign_prehash(scalar, digest)
        }

        fn verify_prehash(
            &self,
            point: &PointBytes,
            digest: &crate::provider::DigestBytes,
            signature: &[u8],
        ) -> core::result::Result<bool, CryptoReason> {
            self.inner.verify_prehash(point, digest, signature)
        }
    }

    fn scripted(script: Vec<core::result::Result<u8, CryptoReason>>) -> Scripted {
        Scripted {
            inner: provider(),
            script,
        }
    }

    #[test]
    fn initialize_loads_default() {
        let store = KeyStore::initialize();
        assert_eq!(store.current().private_scalar(), &DEFAULT_PRIVATE_SCALAR);
        assert_eq!(store.current().public_point(), &DEFAULT_PUBLIC_POINT);
        assert_eq!(store.domain(), &P256);
    }

    #[test]
    fn regenerate_replaces_pair() {
        let mut store = KeyStore::initialize();
        let mut provider = provider();
        store.regenerate(&mut provider).unwrap();

        let keys = store.current();
        assert_ne!(keys.private_scalar(), &DEFAULT_PRIVATE_SCALAR);
        assert_ne!(keys.public_point(), &DEFAULT_PUBLIC_POINT);
        assert_eq!(
            &provider.public_point(keys.private_scalar()).unwrap(),
            keys.public_point()
        );
    }

    #[test]
    fn regenerate_retries_out_of_range_scalars() {
        let mut store = KeyStore::initialize();
        let mut provider = scripted([Ok(0x00), Ok(0xFF), Ok(0x11)].into());
        store.regenerate(&mut provider).unwrap();
        assert_eq!(store.current().private_scalar(), &[0x11; 32]);
    }

    #[test]
    fn failed_generation_keeps_previous_pair() {
        let mut store = KeyStore::initialize();
        let before = store.current().clone();

        let mut provider = scripted([Ok(0x00), Err(CryptoReason::RandomFailure)].into());
        assert_eq!(
            store.regenerate(&mut provider),
            Err(Error::CryptographicFailure(CryptoReason::RandomFailure))
        );
        assert_eq!(store.current(), &before);
    }

    #[test]
    fn exhausted_attempts_keep_previous_pair() {
        let mut store = KeyStore::initialize();
        let mut provider = scripted([Ok(0x00); MAX_KEYGEN_ATTEMPTS].into());
        assert_eq!(
            store.regenerate(&mut provider),
            Err(Error::CryptographicFailure(CryptoReason::IllegalValue))
        );
        assert_eq!(store.current().private_scalar(), &DEFAULT_PRIVATE_SCALAR);
    }

    #[test]
    fn debug_hides_private_scalar() {
        let rendered = alloc::format!("{:?}", KeyStore::initialize());
        assert!(!rendered.contains("private_scalar"));
    }
}
