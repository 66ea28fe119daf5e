// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! An implementation of a verifiable oblivious pseudorandom function (VOPRF)
//! token protocol, built on non-interactive discrete-log-equality (DLEQ)
//! proofs over a prime-order group.
//!
//! # Overview
//!
//! A server holds a private key `k` and publishes `Y = k·G`. A client picks
//! a seed, derives the token point `T = H(seed)`, and sends the blinded point
//! `P = r·T` for a random nonzero `r`. The server answers with `Q = k·P` and
//! a [`Proof`] that `Q` was computed with the same `k` as `Y`. The client
//! checks the proof and unblinds `W = r⁻¹·Q = k·T`. The server never learns
//! `T`, and the client never learns `k`.
//!
//! Evaluations of many blinded points can be covered by a single
//! [`BatchProof`].
//!
//! # Setup
//!
//! The protocol is generic over a [`CipherSuite`], which fixes the prime-order
//! [`Group`] and a hash function with a 64-byte output. [`Ristretto255`]
//! (with SHA-512) is provided behind the `ristretto255-ciphersuite` feature,
//! enabled by default.
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "ristretto255-ciphersuite")]
//! # {
//! use dleq_voprf::{Ristretto255, VoprfClient, VoprfServer};
//! use rand::rngs::OsRng;
//!
//! let mut rng = OsRng;
//! let server = VoprfServer::<Ristretto255>::new(&mut rng)?;
//!
//! // The client blinds its seed
//! let client_blind_result = VoprfClient::<Ristretto255>::blind(b"seed", &mut rng)?;
//!
//! // The server evaluates and proves
//! let server_result = server.blind_evaluate(&mut rng, &client_blind_result.message)?;
//!
//! // The client verifies the proof and unblinds
//! let token = client_blind_result.state.finalize(
//!     &server_result.message,
//!     &server_result.proof,
//!     &server.get_public_key(),
//! )?;
//! let output = token.output()?;
//! assert_eq!(output.len(), 64);
//!
//! // Later, the client redeems the token by signing a request with it. Only
//! // the seed and the signature are sent.
//! let signature = token.derive_verification_key()?.sign(b"request")?;
//! server.redeem(token.seed(), b"request", &signature)?;
//! # }
//! # Ok::<(), dleq_voprf::Error>(())
//! ```
//!
//! # Features
//!
//! - `ristretto255`: the [`Group`] implementation over curve25519-dalek.
//! - `ristretto255-ciphersuite`: [`Ristretto255`] as a [`CipherSuite`] with
//!   SHA-512.
//! - `serde`: `Serialize`/`Deserialize` for every wire type, over the same
//!   byte encodings as the inherent `serialize`/`deserialize` methods.
//! - `parallel`: computes batch composites with `rayon`.
//! - `danger`: constructors that take raw scalars and points, for
//!   reproducing test vectors. Not for production use.
//! - `std`: enables `std` support in dependencies.
//! - `vectors`: builds the `generate-test-vectors` binary.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(clippy::cargo, missing_docs)]
#![allow(clippy::multiple_crate_versions)]

extern crate alloc;

mod batch;
mod ciphersuite;
mod dleq;
mod error;
mod group;
mod keys;
mod redemption;
mod serialization;
mod token;
mod util;
mod voprf;

#[cfg(test)]
mod tests;

// Exports

pub use crate::batch::{batch_coefficients, batch_seed, compute_composites, BatchProof};
pub use crate::ciphersuite::CipherSuite;
pub use crate::dleq::Proof;
pub use crate::error::{Error, Result};
#[cfg(feature = "ristretto255")]
pub use crate::group::Ristretto255;
pub use crate::group::Group;
pub use crate::keys::{KeyPair, PublicKey};
pub use crate::redemption::{VerificationKey, VerificationSignature};
pub use crate::token::{BlindedToken, EvaluatedToken, Token, UnblindedToken, TOKEN_SEED_LEN};
pub use crate::voprf::{
    blind, derive_token, evaluate, unblind, VoprfClient, VoprfClientBlindResult, VoprfServer,
    VoprfServerBatchEvaluateResult, VoprfServerEvaluateResult,
};
