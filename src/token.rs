// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Token types exchanged during a protocol run

use alloc::vec::Vec;

use derive_where::derive_where;
use digest::{Digest, Output};
use generic_array::typenum::Unsigned;
use rand_core::{CryptoRng, RngCore};

use crate::util::{i2osp_2, STR_FINALIZE};
use crate::{CipherSuite, Group, Result};

/// Byte length of the seed drawn by [`Token::random`].
pub const TOKEN_SEED_LEN: usize = 64;

/// A client-chosen seed together with the point `T = H(seed)` derived from
/// it.
#[derive_where(Clone, ZeroizeOnDrop)]
#[derive_where(Debug, Eq, PartialEq)]
pub struct Token<CS: CipherSuite> {
    pub(crate) seed: Vec<u8>,
    pub(crate) elem: <CS::Group as Group>::Elem,
}

/// The blinded point `P = r·T` sent to the server.
#[derive_where(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlindedToken<CS: CipherSuite>(pub(crate) <CS::Group as Group>::Elem);

/// The server's evaluation `Q = k·P`.
#[derive_where(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EvaluatedToken<CS: CipherSuite>(pub(crate) <CS::Group as Group>::Elem);

/// The unblinded evaluation `W = k·T`, kept alongside the seed it was derived
/// from.
#[derive_where(Clone, ZeroizeOnDrop)]
#[derive_where(Debug, Eq, PartialEq)]
pub struct UnblindedToken<CS: CipherSuite> {
    pub(crate) seed: Vec<u8>,
    pub(crate) elem: <CS::Group as Group>::Elem,
}

impl<CS: CipherSuite> Token<CS> {
    /// Derives the token point from `seed`. This mapping is part of the wire
    /// contract: both parties must compute the same point from the same seed.
    pub fn derive(seed: &[u8]) -> Self {
        Self {
            seed: seed.to_vec(),
            elem: CS::Group::hash_to_elem::<CS::Hash>(seed),
        }
    }

    /// Draws a fresh [`TOKEN_SEED_LEN`]-byte seed and derives its point.
    ///
    /// # Errors
    /// [`Error::Random`](crate::Error::Random) if the RNG fails.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let mut seed = [0u8; TOKEN_SEED_LEN];
        rng.try_fill_bytes(&mut seed)?;
        Ok(Self::derive(&seed))
    }

    /// The seed the token was derived from
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// The derived point `T`
    pub fn value(&self) -> <CS::Group as Group>::Elem {
        self.elem
    }
}

impl<CS: CipherSuite> UnblindedToken<CS> {
    /// The seed of the token this evaluation belongs to
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// The unblinded point `W = k·T`
    pub fn value(&self) -> <CS::Group as Group>::Elem {
        self.elem
    }

    /// Hashes the seed and `W` into the final OPRF output.
    ///
    /// # Errors
    /// [`Error::Input`](crate::Error::Input) if the seed is longer than
    /// [`u16::MAX`].
    pub fn output(&self) -> Result<Output<CS::Hash>> {
        let elem_len = <CS::Group as Group>::ElemLen::U16.to_be_bytes();

        // hashInput = I2OSP(len(seed), 2) || seed ||
        //             I2OSP(len(W), 2) || W ||
        //             "Finalize"
        Ok(CS::Hash::new()
            .chain_update(i2osp_2(self.seed.len())?)
            .chain_update(&self.seed)
            .chain_update(elem_len)
            .chain_update(CS::Group::serialize_elem(self.elem))
            .chain_update(STR_FINALIZE)
            .finalize())
    }
}

impl<CS: CipherSuite> BlindedToken<CS> {
    /// Exposes the internal value
    pub fn value(&self) -> <CS::Group as Group>::Elem {
        self.0
    }

    #[cfg(any(feature = "danger", test))]
    /// Creates a [`BlindedToken`] from a raw group element.
    ///
    /// # Caution
    ///
    /// This should be used with caution, since it does not perform any checks
    /// on the validity of the value itself!
    pub fn from_value_unchecked(value: <CS::Group as Group>::Elem) -> Self {
        Self(value)
    }
}

impl<CS: CipherSuite> EvaluatedToken<CS> {
    /// Exposes the internal value
    pub fn value(&self) -> <CS::Group as Group>::Elem {
        self.0
    }

    #[cfg(any(feature = "danger", test))]
    /// Creates an [`EvaluatedToken`] from a raw group element.
    ///
    /// # Caution
    ///
    /// This should be used with caution, since it does not perform any checks
    /// on the validity of the value itself!
    pub fn from_value_unchecked(value: <CS::Group as Group>::Elem) -> Self {
        Self(value)
    }
}
