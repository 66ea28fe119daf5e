// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Server key material

use derive_where::derive_where;
use rand_core::{CryptoRng, RngCore};

use crate::{CipherSuite, Error, Group, Result};

/// The secret scalar `k` together with its public commitment `Y = k·G`.
///
/// The private key is zeroized when the key pair is dropped.
#[derive_where(Clone, ZeroizeOnDrop)]
#[derive_where(Debug, Eq, PartialEq)]
pub struct KeyPair<CS: CipherSuite> {
    pub(crate) sk: <CS::Group as Group>::Scalar,
    pub(crate) pk: <CS::Group as Group>::Elem,
}

/// The public half of a [`KeyPair`], `Y = k·G`.
#[derive_where(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PublicKey<CS: CipherSuite>(pub(crate) <CS::Group as Group>::Elem);

impl<CS: CipherSuite> KeyPair<CS> {
    /// Generates a fresh key pair from the supplied RNG.
    ///
    /// # Errors
    /// [`Error::Random`] if the RNG fails.
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let sk = CS::Group::random_scalar(rng)?;
        Ok(Self::from_nonzero_scalar(sk))
    }

    /// Loads a key pair from the canonical encoding of its private key.
    ///
    /// # Errors
    /// [`Error::Deserialization`] if the bytes are not a canonical scalar or
    /// encode zero.
    pub fn from_private_key(private_key_bytes: &[u8]) -> Result<Self> {
        let sk = CS::Group::deserialize_scalar(private_key_bytes)?;
        if bool::from(CS::Group::is_zero_scalar(sk)) {
            return Err(Error::Deserialization);
        }

        Ok(Self::from_nonzero_scalar(sk))
    }

    #[cfg(any(feature = "danger", test))]
    /// Builds a key pair from a raw scalar.
    ///
    /// # Errors
    /// [`Error::ZeroScalar`] if `sk` is zero.
    pub fn from_scalar(sk: <CS::Group as Group>::Scalar) -> Result<Self> {
        if bool::from(CS::Group::is_zero_scalar(sk)) {
            return Err(Error::ZeroScalar);
        }

        Ok(Self::from_nonzero_scalar(sk))
    }

    fn from_nonzero_scalar(sk: <CS::Group as Group>::Scalar) -> Self {
        let pk = CS::Group::base_elem() * &sk;
        Self { sk, pk }
    }

    /// Returns the public key `Y = k·G`.
    pub fn public_key(&self) -> PublicKey<CS> {
        PublicKey(self.pk)
    }

    #[cfg(any(feature = "danger", test))]
    /// Exposes the private key scalar
    pub fn private_key(&self) -> <CS::Group as Group>::Scalar {
        self.sk
    }
}

impl<CS: CipherSuite> PublicKey<CS> {
    /// Exposes the underlying group element
    pub fn value(&self) -> <CS::Group as Group>::Elem {
        self.0
    }

    #[cfg(any(feature = "danger", test))]
    /// Creates a [`PublicKey`] from a raw group element.
    ///
    /// # Caution
    ///
    /// This should be used with caution, since it does not perform any checks
    /// on the validity of the value itself!
    pub fn from_value_unchecked(value: <CS::Group as Group>::Elem) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use curve25519_dalek::scalar::Scalar;
    use rand::rngs::OsRng;

    use super::*;
    use crate::Ristretto255;

    #[test]
    fn public_key_is_base_multiple() -> Result<()> {
        let key_pair = KeyPair::<Ristretto255>::new(&mut OsRng)?;
        assert_eq!(
            key_pair.public_key().value(),
            Ristretto255::base_elem() * &key_pair.private_key()
        );

        Ok(())
    }

    #[test]
    fn loads_from_private_key_bytes() -> Result<()> {
        let key_pair = KeyPair::<Ristretto255>::new(&mut OsRng)?;
        let loaded = KeyPair::<Ristretto255>::from_private_key(&key_pair.serialize())?;
        assert_eq!(loaded, key_pair);

        Ok(())
    }

    #[test]
    fn rejects_zero_private_key() {
        assert_eq!(
            KeyPair::<Ristretto255>::from_private_key(&[0u8; 32]),
            Err(Error::Deserialization)
        );
        assert_eq!(
            KeyPair::<Ristretto255>::from_scalar(Scalar::ZERO),
            Err(Error::ZeroScalar)
        );
    }
}
