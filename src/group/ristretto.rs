// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use digest::Digest;
use generic_array::typenum::{U32, U64};
use generic_array::GenericArray;
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};

use super::Group;
use crate::{Error, Result};

/// [`Group`] implementation for Ristretto255.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
// `cfg` here is only needed because of a bug in Rust's crate feature documentation. See: https://github.com/rust-lang/rust/issues/83428
#[cfg(feature = "ristretto255")]
pub struct Ristretto255;

#[cfg(feature = "ristretto255-ciphersuite")]
impl crate::CipherSuite for Ristretto255 {
    const ID: &'static str = "ristretto255-SHA512";

    type Group = Ristretto255;

    type Hash = sha2::Sha512;
}

// `cfg` here is only needed because of a bug in Rust's crate feature documentation. See: https://github.com/rust-lang/rust/issues/83428
#[cfg(feature = "ristretto255")]
impl Group for Ristretto255 {
    type Elem = RistrettoPoint;

    type ElemLen = U32;

    type Scalar = Scalar;

    type ScalarLen = U32;

    // H(seed) is fed as 64 uniform bytes into the Ristretto one-way map.
    fn hash_to_elem<H: Digest<OutputSize = U64> + Default>(seed: &[u8]) -> Self::Elem {
        RistrettoPoint::hash_from_bytes::<H>(seed)
    }

    // Applies Elligator to each 32-byte half and adds the two results.
    fn random_elem(uniform_bytes: &[u8; 64]) -> Self::Elem {
        RistrettoPoint::from_uniform_bytes(uniform_bytes)
    }

    fn hash_to_scalar<H: Digest<OutputSize = U64>>(hash: H) -> Self::Scalar {
        Scalar::from_hash(hash)
    }

    fn scalar_from_wide_bytes(bytes: &[u8; 64]) -> Self::Scalar {
        Scalar::from_bytes_mod_order_wide(bytes)
    }

    fn base_elem() -> Self::Elem {
        RISTRETTO_BASEPOINT_POINT
    }

    fn identity_elem() -> Self::Elem {
        RistrettoPoint::identity()
    }

    // serialization of a group element
    fn serialize_elem(elem: Self::Elem) -> GenericArray<u8, Self::ElemLen> {
        elem.compress().to_bytes().into()
    }

    fn deserialize_elem(element_bits: &[u8]) -> Result<Self::Elem> {
        CompressedRistretto::from_slice(element_bits)
            .ok()
            .and_then(|compressed| compressed.decompress())
            .filter(|point| point != &RistrettoPoint::identity())
            .ok_or(Error::Deserialization)
    }

    fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self::Scalar> {
        loop {
            let scalar = {
                let mut scalar_bytes = [0u8; 64];
                rng.try_fill_bytes(&mut scalar_bytes)?;
                Scalar::from_bytes_mod_order_wide(&scalar_bytes)
            };

            if scalar != Scalar::ZERO {
                break Ok(scalar);
            }
        }
    }

    fn invert_scalar(scalar: Self::Scalar) -> Result<Self::Scalar> {
        if bool::from(Self::is_zero_scalar(scalar)) {
            return Err(Error::ZeroScalar);
        }

        Ok(scalar.invert())
    }

    fn is_zero_scalar(scalar: Self::Scalar) -> Choice {
        scalar.ct_eq(&Scalar::ZERO)
    }

    #[cfg(test)]
    fn zero_scalar() -> Self::Scalar {
        Scalar::ZERO
    }

    fn serialize_scalar(scalar: Self::Scalar) -> GenericArray<u8, Self::ScalarLen> {
        scalar.to_bytes().into()
    }

    fn deserialize_scalar(scalar_bits: &[u8]) -> Result<Self::Scalar> {
        scalar_bits
            .try_into()
            .ok()
            .and_then(|bytes| Option::from(Scalar::from_canonical_bytes(bytes)))
            .ok_or(Error::Deserialization)
    }
}
