// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Errors which are produced during an execution of the protocol

use displaydoc::Display;

/// [`Result`](core::result::Result) shorthand that uses [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Represents an error in the manipulation of internal cryptographic data
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Error {
    /// Input is longer than its length prefix allows
    Input,
    /// Failure to deserialize bytes into a canonical scalar or element
    Deserialization,
    /// Encountered a zero scalar where an invertible one is required
    ZeroScalar,
    /// The proof failed to verify
    ProofVerification,
    /// The redemption signature failed to verify
    SignatureVerification,
    /// Batched inputs are empty or their lengths don't match
    Batch,
    /// The random number generator failed to produce output
    Random,
}

impl core::error::Error for Error {}

impl From<rand_core::Error> for Error {
    fn from(_: rand_core::Error) -> Self {
        Error::Random
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_uses_doc_comments() {
        assert_eq!(
            Error::Batch.to_string(),
            "Batched inputs are empty or their lengths don't match"
        );
        assert_eq!(Error::ProofVerification.to_string(), "The proof failed to verify");
        assert_eq!(
            Error::Input.to_string(),
            "Input is longer than its length prefix allows"
        );
    }

    #[test]
    fn rng_failure_maps_to_random() {
        let err = rand_core::Error::from(core::num::NonZeroU32::new(rand_core::Error::CUSTOM_START).unwrap());
        assert_eq!(Error::from(err), Error::Random);
    }
}
