// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Defines the Group trait to specify the underlying prime order group

#[cfg(feature = "ristretto255")]
mod ristretto;

use core::fmt::Debug;
use core::ops::{Add, Mul, Sub};

use digest::Digest;
use generic_array::typenum::U64;
use generic_array::{ArrayLength, GenericArray};
use rand_core::{CryptoRng, RngCore};
#[cfg(feature = "ristretto255")]
pub use ristretto::Ristretto255;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::Result;

/// A prime-order subgroup of a base field (EC, prime-order field ...). This
/// subgroup is noted additively in this trait.
pub trait Group {
    /// The type of group elements
    type Elem: ConstantTimeEq
        + Copy
        + Debug
        + Eq
        + Send
        + Sync
        + Zeroize
        + for<'a> Add<&'a Self::Elem, Output = Self::Elem>
        + for<'a> Mul<&'a Self::Scalar, Output = Self::Elem>;

    /// The byte length necessary to represent group elements
    type ElemLen: ArrayLength<u8> + 'static;

    /// The type of base field scalars
    type Scalar: ConstantTimeEq
        + Copy
        + Debug
        + Eq
        + Send
        + Sync
        + Zeroize
        + for<'a> Add<&'a Self::Scalar, Output = Self::Scalar>
        + for<'a> Sub<&'a Self::Scalar, Output = Self::Scalar>
        + for<'a> Mul<&'a Self::Scalar, Output = Self::Scalar>;

    /// The byte length necessary to represent scalars
    type ScalarLen: ArrayLength<u8> + 'static;

    /// Deterministically maps an arbitrary-length seed to a group element. The
    /// discrete log of the output relative to any other element is unknown.
    fn hash_to_elem<H: Digest<OutputSize = U64> + Default>(seed: &[u8]) -> Self::Elem;

    /// Maps 64 uniformly random bytes to a uniformly distributed group
    /// element. Only meant for synthesizing arbitrary elements, never for
    /// deriving token points.
    fn random_elem(uniform_bytes: &[u8; 64]) -> Self::Elem;

    /// Reduces a finalized 64-byte digest modulo the group order.
    fn hash_to_scalar<H: Digest<OutputSize = U64>>(hash: H) -> Self::Scalar;

    /// Reduces 64 bytes modulo the group order.
    fn scalar_from_wide_bytes(bytes: &[u8; 64]) -> Self::Scalar;

    /// Get the base point for the group
    fn base_elem() -> Self::Elem;

    /// Returns the identity group element
    fn identity_elem() -> Self::Elem;

    /// Returns `true` if the element is equal to the identity element
    fn is_identity_elem(elem: Self::Elem) -> Choice {
        elem.ct_eq(&Self::identity_elem())
    }

    /// Serializes the `self` group element
    fn serialize_elem(elem: Self::Elem) -> GenericArray<u8, Self::ElemLen>;

    /// Return an element from its fixed-length bytes representation. If the
    /// element is the identity element, return an error.
    ///
    /// # Errors
    /// [`Error::Deserialization`](crate::Error::Deserialization) if the element
    /// is not a valid point on the group or the identity element.
    fn deserialize_elem(element_bits: &[u8]) -> Result<Self::Elem>;

    /// Picks a nonzero scalar at random, retrying until the draw is nonzero.
    ///
    /// # Errors
    /// [`Error::Random`](crate::Error::Random) if the RNG fails to produce
    /// output.
    fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self::Scalar>;

    /// The multiplicative inverse of this scalar
    ///
    /// # Errors
    /// [`Error::ZeroScalar`](crate::Error::ZeroScalar) if the scalar is zero.
    fn invert_scalar(scalar: Self::Scalar) -> Result<Self::Scalar>;

    /// Returns `true` if the scalar is zero.
    fn is_zero_scalar(scalar: Self::Scalar) -> Choice;

    /// Returns the scalar representing zero
    #[cfg(test)]
    fn zero_scalar() -> Self::Scalar;

    /// Serializes a scalar to bytes
    fn serialize_scalar(scalar: Self::Scalar) -> GenericArray<u8, Self::ScalarLen>;

    /// Return a scalar from its canonical fixed-length bytes representation.
    /// Zero is accepted; callers needing an invertible scalar check
    /// [`Group::is_zero_scalar`].
    ///
    /// # Errors
    /// [`Error::Deserialization`](crate::Error::Deserialization) if the bytes
    /// are not a canonically reduced scalar.
    fn deserialize_scalar(scalar_bits: &[u8]) -> Result<Self::Scalar>;
}

#[cfg(test)]
mod tests;
