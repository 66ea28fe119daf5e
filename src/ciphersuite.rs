// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Defines the CipherSuite trait to specify the underlying primitives for the
//! DLEQ proofs and the token protocol

use digest::core_api::BlockSizeUser;
use digest::Digest;
use generic_array::typenum::U64;

use crate::Group;

/// Configures the underlying primitives used in the protocol
pub trait CipherSuite {
    /// A short human-readable name for the suite, used when labelling test
    /// vectors.
    const ID: &'static str;

    /// A finite cyclic group along with a point representation. See
    /// [`Group`].
    type Group: Group;

    /// The hash function used for hashing to the group, hashing proof
    /// transcripts to scalars and deriving the batching seed. Its output is
    /// exactly 64 bytes so that wide reduction to a scalar is unbiased. It
    /// also keys the HMAC over redemption requests.
    type Hash: Digest<OutputSize = U64> + BlockSizeUser + Default;
}
