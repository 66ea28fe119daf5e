// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Batched DLEQ proofs
//!
//! `n` pairs `(P_i, Q_i)` that share one key are folded into the composites
//! `M = Σ c_i·P_i` and `Z = Σ c_i·Q_i`, and a single [`Proof`] is produced for
//! `(M, Z)`. The coefficients `c_i` are full-width scalars drawn from a
//! ChaCha20 stream keyed by a hash of every pair, so a batch containing a pair
//! with `Q_j ≠ k·P_j` verifies with probability at most `1/ℓ` (about
//! `2^-252` for Ristretto255).

use alloc::vec::Vec;

use derive_where::derive_where;
use digest::{Digest, Output};
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use subtle::ConstantTimeEq;

use crate::{CipherSuite, Error, Group, KeyPair, Proof, PublicKey, Result};

/// A [`Proof`] over the composites `M` and `Z` of a batch of pairs.
#[derive_where(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BatchProof<CS: CipherSuite> {
    pub(crate) proof: Proof<CS>,
    pub(crate) m: <CS::Group as Group>::Elem,
    pub(crate) z: <CS::Group as Group>::Elem,
}

impl<CS: CipherSuite> BatchProof<CS> {
    /// Proves that `evaluated[i] = k·blinded[i]` for every `i`, where `k` is
    /// the private key of `key_pair`.
    ///
    /// # Errors
    /// - [`Error::Batch`] if the slices are empty or their lengths differ.
    /// - [`Error::Random`] if the RNG fails.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        blinded: &[<CS::Group as Group>::Elem],
        evaluated: &[<CS::Group as Group>::Elem],
        key_pair: &KeyPair<CS>,
    ) -> Result<Self> {
        let (m, z) = compute_composites::<CS>(&key_pair.public_key(), blinded, evaluated)?;
        let proof = Proof::new(rng, m, z, key_pair)?;

        Ok(Self { proof, m, z })
    }

    /// Verifies the proof against the pairs it claims to cover.
    ///
    /// # Errors
    /// - [`Error::Batch`] if the slices are empty or their lengths differ.
    /// - [`Error::ProofVerification`] if the carried composites don't match
    ///   the pairs or the inner proof is invalid.
    pub fn verify(
        &self,
        blinded: &[<CS::Group as Group>::Elem],
        evaluated: &[<CS::Group as Group>::Elem],
        public_key: &PublicKey<CS>,
    ) -> Result<()> {
        let (m, z) = compute_composites::<CS>(public_key, blinded, evaluated)?;

        if !bool::from(m.ct_eq(&self.m) & z.ct_eq(&self.z)) {
            return Err(Error::ProofVerification);
        }

        self.proof.verify(m, z, public_key)
    }

    /// The inner proof over `(M, Z)`. This is the minimal wire form; a
    /// verifier holding the pairs can recompute the composites with
    /// [`compute_composites`] and check it with [`Proof::verify`].
    pub fn proof(&self) -> &Proof<CS> {
        &self.proof
    }

    /// The composites `(M, Z)` the proof was computed over
    pub fn composites(&self) -> (<CS::Group as Group>::Elem, <CS::Group as Group>::Elem) {
        (self.m, self.z)
    }
}

/// Hashes `G`, `Y` and every pair `(P_i, Q_i)` in index order into the seed
/// of the coefficient stream.
///
/// # Errors
/// [`Error::Batch`] if the slices are empty or their lengths differ.
pub fn batch_seed<CS: CipherSuite>(
    public_key: &PublicKey<CS>,
    blinded: &[<CS::Group as Group>::Elem],
    evaluated: &[<CS::Group as Group>::Elem],
) -> Result<Output<CS::Hash>> {
    if blinded.is_empty() || blinded.len() != evaluated.len() {
        return Err(Error::Batch);
    }

    let hash = CS::Hash::new()
        .chain_update(CS::Group::serialize_elem(CS::Group::base_elem()))
        .chain_update(CS::Group::serialize_elem(public_key.0));

    let hash = blinded
        .iter()
        .zip(evaluated)
        .fold(hash, |hash, (&p, &q)| {
            hash.chain_update(CS::Group::serialize_elem(p))
                .chain_update(CS::Group::serialize_elem(q))
        });

    Ok(hash.finalize())
}

/// Expands `seed` into `n` coefficients. The DRBG is seeded once with the
/// first 32 bytes of `seed`, and each coefficient is 64 bytes of its stream
/// reduced modulo the group order.
pub fn batch_coefficients<CS: CipherSuite>(
    seed: &Output<CS::Hash>,
    n: usize,
) -> Vec<<CS::Group as Group>::Scalar> {
    let mut key = [0u8; 32];
    key.copy_from_slice(&seed[..32]);
    let mut prng = ChaCha20Rng::from_seed(key);

    (0..n)
        .map(|_| {
            let mut uniform_bytes = [0u8; 64];
            prng.fill_bytes(&mut uniform_bytes);
            CS::Group::scalar_from_wide_bytes(&uniform_bytes)
        })
        .collect()
}

/// Computes `M = Σ c_i·P_i` and `Z = Σ c_i·Q_i` with coefficients derived
/// from the pairs themselves.
///
/// # Errors
/// [`Error::Batch`] if the slices are empty or their lengths differ.
pub fn compute_composites<CS: CipherSuite>(
    public_key: &PublicKey<CS>,
    blinded: &[<CS::Group as Group>::Elem],
    evaluated: &[<CS::Group as Group>::Elem],
) -> Result<(<CS::Group as Group>::Elem, <CS::Group as Group>::Elem)> {
    let seed = batch_seed::<CS>(public_key, blinded, evaluated)?;
    // The coefficient stream is drawn in full, in index order, before any
    // (possibly parallel) combination.
    let coefficients = batch_coefficients::<CS>(&seed, blinded.len());

    Ok(combine::<CS>(&coefficients, blinded, evaluated))
}

#[cfg(not(feature = "parallel"))]
fn combine<CS: CipherSuite>(
    coefficients: &[<CS::Group as Group>::Scalar],
    blinded: &[<CS::Group as Group>::Elem],
    evaluated: &[<CS::Group as Group>::Elem],
) -> (<CS::Group as Group>::Elem, <CS::Group as Group>::Elem) {
    let identity = CS::Group::identity_elem();

    coefficients
        .iter()
        .zip(blinded.iter().zip(evaluated))
        .fold((identity, identity), |(m, z), (c, (&p, &q))| {
            (m + &(p * c), z + &(q * c))
        })
}

#[cfg(feature = "parallel")]
fn combine<CS: CipherSuite>(
    coefficients: &[<CS::Group as Group>::Scalar],
    blinded: &[<CS::Group as Group>::Elem],
    evaluated: &[<CS::Group as Group>::Elem],
) -> (<CS::Group as Group>::Elem, <CS::Group as Group>::Elem) {
    use rayon::prelude::*;

    let identity = CS::Group::identity_elem();

    coefficients
        .par_iter()
        .zip(blinded.par_iter().zip(evaluated.par_iter()))
        .map(|(c, (&p, &q))| (p * c, q * c))
        .reduce(|| (identity, identity), |(m1, z1), (m2, z2)| (m1 + &m2, z1 + &z2))
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use curve25519_dalek::ristretto::RistrettoPoint;
    use curve25519_dalek::scalar::Scalar;
    use rand::rngs::OsRng;
    use sha2::Sha512;

    use super::*;
    use crate::Ristretto255;

    fn random_point() -> RistrettoPoint {
        let mut bytes = [0u8; 64];
        OsRng.fill_bytes(&mut bytes);
        Ristretto255::random_elem(&bytes)
    }

    fn evaluated_batch(
        key: &KeyPair<Ristretto255>,
        n: usize,
    ) -> (Vec<RistrettoPoint>, Vec<RistrettoPoint>) {
        let blinded: Vec<_> = (0..n).map(|_| random_point()).collect();
        let evaluated = blinded.iter().map(|p| p * key.sk).collect();
        (blinded, evaluated)
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_combine_matches_sequential_fold() -> Result<()> {
        let key = KeyPair::<Ristretto255>::new(&mut OsRng)?;

        for n in [1, 2, 7, 64] {
            let (blinded, evaluated) = evaluated_batch(&key, n);
            let seed = batch_seed(&key.public_key(), &blinded, &evaluated)?;
            let coefficients = batch_coefficients::<Ristretto255>(&seed, n);

            let identity = Ristretto255::identity_elem();
            let sequential = coefficients.iter().zip(blinded.iter().zip(&evaluated)).fold(
                (identity, identity),
                |(m, z), (c, (p, q))| (m + p * c, z + q * c),
            );

            assert_eq!(
                combine::<Ristretto255>(&coefficients, &blinded, &evaluated),
                sequential
            );
            assert_eq!(
                compute_composites(&key.public_key(), &blinded, &evaluated)?,
                sequential
            );
        }

        Ok(())
    }

    #[test]
    fn batch_dleq_proof_works() -> Result<()> {
        let key = KeyPair::<Ristretto255>::new(&mut OsRng)?;
        let (blinded, evaluated) = evaluated_batch(&key, 5);

        let proof = BatchProof::new(&mut OsRng, &blinded, &evaluated, &key)?;
        proof.verify(&blinded, &evaluated, &key.public_key())?;

        let other = KeyPair::<Ristretto255>::new(&mut OsRng)?;
        assert_eq!(
            proof.verify(&blinded, &evaluated, &other.public_key()),
            Err(Error::ProofVerification)
        );

        Ok(())
    }

    #[test]
    fn single_pair_batch_matches_single_proof() -> Result<()> {
        let key = KeyPair::<Ristretto255>::new(&mut OsRng)?;
        let (blinded, evaluated) = evaluated_batch(&key, 1);

        let proof = BatchProof::new(&mut OsRng, &blinded, &evaluated, &key)?;
        proof.verify(&blinded, &evaluated, &key.public_key())?;

        // M and Z are the pair scaled by its single coefficient
        let seed = batch_seed(&key.public_key(), &blinded, &evaluated)?;
        let c = batch_coefficients::<Ristretto255>(&seed, 1)[0];
        assert_eq!(proof.composites(), (blinded[0] * c, evaluated[0] * c));

        // The inner proof is an ordinary proof over the composites
        let (m, z) = proof.composites();
        proof.proof().verify(m, z, &key.public_key())?;

        // A tampered pair is rejected just like a single proof would be
        assert_eq!(
            proof.verify(&blinded, &[random_point()], &key.public_key()),
            Err(Error::ProofVerification)
        );

        Ok(())
    }

    #[test]
    fn replaced_pair_is_rejected() -> Result<()> {
        let key = KeyPair::<Ristretto255>::new(&mut OsRng)?;
        let (blinded, evaluated) = evaluated_batch(&key, 8);
        let proof = BatchProof::new(&mut OsRng, &blinded, &evaluated, &key)?;

        for _ in 0..64 {
            for j in [0, 3, 7] {
                let mut tampered = evaluated.clone();
                tampered[j] = random_point();
                assert_eq!(
                    proof.verify(&blinded, &tampered, &key.public_key()),
                    Err(Error::ProofVerification)
                );
            }
        }

        Ok(())
    }

    #[test]
    fn forged_composites_are_rejected() -> Result<()> {
        let key = KeyPair::<Ristretto255>::new(&mut OsRng)?;
        let (blinded, evaluated) = evaluated_batch(&key, 3);
        let proof = BatchProof::new(&mut OsRng, &blinded, &evaluated, &key)?;

        // A valid proof over some other (M, Z) must not be accepted
        let m = random_point();
        let forged = BatchProof {
            proof: Proof::new(&mut OsRng, m, m * key.sk, &key)?,
            m,
            z: m * key.sk,
        };
        assert_eq!(
            forged.verify(&blinded, &evaluated, &key.public_key()),
            Err(Error::ProofVerification)
        );

        let reordered = vec![evaluated[1], evaluated[0], evaluated[2]];
        assert!(proof
            .verify(&blinded, &reordered, &key.public_key())
            .is_err());

        Ok(())
    }

    #[test]
    fn mismatched_lengths_are_rejected() -> Result<()> {
        let key = KeyPair::<Ristretto255>::new(&mut OsRng)?;
        let (blinded, evaluated) = evaluated_batch(&key, 2);

        assert_eq!(
            BatchProof::new(&mut OsRng, &blinded, &evaluated[..1], &key),
            Err(Error::Batch)
        );
        assert_eq!(
            BatchProof::<Ristretto255>::new(&mut OsRng, &[], &[], &key),
            Err(Error::Batch)
        );

        let proof = BatchProof::new(&mut OsRng, &blinded, &evaluated, &key)?;
        assert_eq!(
            proof.verify(&blinded[..1], &evaluated, &key.public_key()),
            Err(Error::Batch)
        );

        Ok(())
    }

    #[test]
    fn coefficients_follow_chacha_stream() {
        let seed = Sha512::digest(b"batch seed");
        let coefficients = batch_coefficients::<Ristretto255>(&seed, 3);

        let mut key = [0u8; 32];
        key.copy_from_slice(&seed[..32]);
        let mut prng = ChaCha20Rng::from_seed(key);
        for coefficient in coefficients {
            let mut bytes = [0u8; 64];
            prng.fill_bytes(&mut bytes);
            assert_eq!(coefficient, Scalar::from_bytes_mod_order_wide(&bytes));
        }

        // A prefix of a longer expansion is the shorter expansion
        assert_eq!(
            batch_coefficients::<Ristretto255>(&seed, 2)[..],
            batch_coefficients::<Ristretto255>(&seed, 5)[..2]
        );
    }

    #[test]
    fn seed_binds_every_pair_in_order() -> Result<()> {
        let key = KeyPair::<Ristretto255>::new(&mut OsRng)?;
        let (blinded, evaluated) = evaluated_batch(&key, 2);
        let pk = key.public_key();

        let seed = batch_seed(&pk, &blinded, &evaluated)?;

        let expected = Sha512::new()
            .chain_update(Ristretto255::base_elem().compress().as_bytes())
            .chain_update(pk.value().compress().as_bytes())
            .chain_update(blinded[0].compress().as_bytes())
            .chain_update(evaluated[0].compress().as_bytes())
            .chain_update(blinded[1].compress().as_bytes())
            .chain_update(evaluated[1].compress().as_bytes())
            .finalize();
        assert_eq!(seed, expected);

        let swapped = [blinded[1], blinded[0]];
        assert_ne!(batch_seed(&pk, &swapped, &evaluated)?, seed);

        Ok(())
    }
}
