// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Redemption of unblinded tokens
//!
//! The client never sends `W` back to the server. Instead it derives a
//! [`VerificationKey`] from `(seed, W)` and MACs the redemption request with
//! it. The server, which can recompute `W = k·H(seed)` from the seed alone,
//! derives the same key and checks the MAC.

use core::marker::PhantomData;

use derive_where::derive_where;
use digest::{Digest, Output};
use hmac::{Mac, SimpleHmac};

use crate::util::{i2osp_2, STR_DERIVE_KEY};
use crate::{CipherSuite, Error, Group, Result, UnblindedToken};

/// A MAC key bound to one unblinded token.
#[derive_where(Clone, ZeroizeOnDrop)]
#[derive_where(Debug, Eq, PartialEq)]
pub struct VerificationKey<CS: CipherSuite> {
    pub(crate) key: [u8; 64],
    _cs: PhantomData<CS>,
}

/// An HMAC over a redemption request, produced by
/// [`VerificationKey::sign`].
#[derive_where(Clone, Debug, Eq, PartialEq)]
pub struct VerificationSignature<CS: CipherSuite>(pub(crate) Output<CS::Hash>);

impl<CS: CipherSuite> UnblindedToken<CS> {
    /// Derives the key that authenticates redemption requests for this token:
    /// `H("hash_derive_key" || I2OSP(len(seed), 2) || seed || encode(W))`.
    ///
    /// # Errors
    /// [`Error::Input`] if the seed is longer than [`u16::MAX`].
    pub fn derive_verification_key(&self) -> Result<VerificationKey<CS>> {
        let digest = CS::Hash::new()
            .chain_update(STR_DERIVE_KEY)
            .chain_update(i2osp_2(self.seed.len())?)
            .chain_update(&self.seed)
            .chain_update(CS::Group::serialize_elem(self.elem))
            .finalize();

        let mut key = [0u8; 64];
        key.copy_from_slice(&digest);

        Ok(VerificationKey {
            key,
            _cs: PhantomData,
        })
    }
}

impl<CS: CipherSuite> VerificationKey<CS> {
    fn mac(&self) -> Result<SimpleHmac<CS::Hash>> {
        <SimpleHmac<CS::Hash> as Mac>::new_from_slice(&self.key).map_err(|_| Error::Input)
    }

    /// Signs `message` with HMAC under this key.
    ///
    /// # Errors
    /// [`Error::Input`] if the hash cannot be keyed with 64 bytes.
    pub fn sign(&self, message: &[u8]) -> Result<VerificationSignature<CS>> {
        let mut mac = self.mac()?;
        Mac::update(&mut mac, message);

        Ok(VerificationSignature(mac.finalize().into_bytes()))
    }

    /// Checks `signature` over `message` in constant time.
    ///
    /// # Errors
    /// [`Error::SignatureVerification`] if the signature does not match.
    pub fn verify(&self, message: &[u8], signature: &VerificationSignature<CS>) -> Result<()> {
        let mut mac = self.mac()?;
        Mac::update(&mut mac, message);

        mac.verify_slice(&signature.0)
            .map_err(|_| Error::SignatureVerification)
    }
}

impl<CS: CipherSuite> VerificationSignature<CS> {
    /// Exposes the MAC tag
    pub fn value(&self) -> &Output<CS::Hash> {
        &self.0
    }
}
