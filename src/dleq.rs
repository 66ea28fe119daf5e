// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Non-interactive Chaum-Pedersen proofs of discrete log equality

use derive_where::derive_where;
use digest::Digest;
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::{CipherSuite, Error, Group, KeyPair, PublicKey, Result};

/// A proof that `Q = k·P` for the same `k` as `Y = k·G`, without revealing
/// `k`.
#[derive_where(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Proof<CS: CipherSuite> {
    pub(crate) c_scalar: <CS::Group as Group>::Scalar,
    pub(crate) s_scalar: <CS::Group as Group>::Scalar,
}

impl<CS: CipherSuite> Proof<CS> {
    /// Proves that `q = k·p` where `k` is the private key of `key_pair`.
    ///
    /// The commitment randomness is drawn from `rng`; it must be a
    /// cryptographically secure source, as a predictable or repeated
    /// commitment reveals the private key.
    ///
    /// # Errors
    /// [`Error::Random`] if the RNG fails.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        p: <CS::Group as Group>::Elem,
        q: <CS::Group as Group>::Elem,
        key_pair: &KeyPair<CS>,
    ) -> Result<Self> {
        let t = CS::Group::random_scalar(rng)?;
        Ok(Self::prove_with_commitment(t, p, q, key_pair))
    }

    #[cfg(any(feature = "danger", test))]
    /// Proves that `q = k·p` using the caller-supplied commitment scalar `t`.
    ///
    /// # Caution
    ///
    /// Reusing `t` for two different proofs, or choosing it predictably,
    /// reveals the private key. Only meant for reproducing fixed vectors.
    pub fn new_with_commitment(
        t: <CS::Group as Group>::Scalar,
        p: <CS::Group as Group>::Elem,
        q: <CS::Group as Group>::Elem,
        key_pair: &KeyPair<CS>,
    ) -> Self {
        Self::prove_with_commitment(t, p, q, key_pair)
    }

    fn prove_with_commitment(
        mut t: <CS::Group as Group>::Scalar,
        p: <CS::Group as Group>::Elem,
        q: <CS::Group as Group>::Elem,
        key_pair: &KeyPair<CS>,
    ) -> Self {
        let g = CS::Group::base_elem();

        // A = t·G, B = t·P
        let a = g * &t;
        let b = p * &t;

        let c_scalar = challenge::<CS>(g, key_pair.pk, p, q, a, b);
        // s = t - c·k
        let s_scalar = t - &(c_scalar * &key_pair.sk);

        t.zeroize();

        Self { c_scalar, s_scalar }
    }

    /// Verifies that `q = k·p` for the `k` committed to by `public_key`.
    ///
    /// # Errors
    /// [`Error::ProofVerification`] if the proof is invalid for the given
    /// points.
    pub fn verify(
        &self,
        p: <CS::Group as Group>::Elem,
        q: <CS::Group as Group>::Elem,
        public_key: &PublicKey<CS>,
    ) -> Result<()> {
        let g = CS::Group::base_elem();
        let y = public_key.0;

        // A' = s·G + c·Y, B' = s·P + c·Q
        let a = (g * &self.s_scalar) + &(y * &self.c_scalar);
        let b = (p * &self.s_scalar) + &(q * &self.c_scalar);

        let expected_c = challenge::<CS>(g, y, p, q, a, b);

        match bool::from(expected_c.ct_eq(&self.c_scalar)) {
            true => Ok(()),
            false => Err(Error::ProofVerification),
        }
    }

    /// The challenge scalar `c`
    pub fn challenge(&self) -> <CS::Group as Group>::Scalar {
        self.c_scalar
    }

    /// The response scalar `s`
    pub fn response(&self) -> <CS::Group as Group>::Scalar {
        self.s_scalar
    }

    #[cfg(any(feature = "danger", test))]
    /// Creates a [`Proof`] from raw scalars.
    pub fn from_scalars(
        c_scalar: <CS::Group as Group>::Scalar,
        s_scalar: <CS::Group as Group>::Scalar,
    ) -> Self {
        Self { c_scalar, s_scalar }
    }
}

// c = H(G || Y || P || Q || A || B), each element in its canonical encoding
fn challenge<CS: CipherSuite>(
    g: <CS::Group as Group>::Elem,
    y: <CS::Group as Group>::Elem,
    p: <CS::Group as Group>::Elem,
    q: <CS::Group as Group>::Elem,
    a: <CS::Group as Group>::Elem,
    b: <CS::Group as Group>::Elem,
) -> <CS::Group as Group>::Scalar {
    let hash = [g, y, p, q, a, b]
        .into_iter()
        .fold(CS::Hash::new(), |hash, elem| {
            hash.chain_update(CS::Group::serialize_elem(elem))
        });

    CS::Group::hash_to_scalar(hash)
}
