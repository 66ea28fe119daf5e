// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Contains the main VOPRF API

use alloc::vec::Vec;

use derive_where::derive_where;
use rand_core::{CryptoRng, RngCore};

use crate::util::i2osp_2;
use crate::{
    BatchProof, BlindedToken, CipherSuite, Error, EvaluatedToken, Group, KeyPair, Proof,
    PublicKey, Result, Token, UnblindedToken, VerificationSignature,
};

////////////////////////////
// High-level API Structs //
// ====================== //
////////////////////////////

/// A client which engages with a [VoprfServer] in verifiable mode, meaning
/// that the OPRF outputs can be checked against a server public key.
#[derive_where(Clone, ZeroizeOnDrop)]
#[derive_where(Debug, Eq, PartialEq)]
pub struct VoprfClient<CS: CipherSuite> {
    pub(crate) blind: <CS::Group as Group>::Scalar,
    pub(crate) blinded_element: <CS::Group as Group>::Elem,
    pub(crate) seed: Vec<u8>,
}

/// A server which engages with a [VoprfClient] in verifiable mode, meaning
/// that the OPRF outputs can be checked against a server public key.
#[derive_where(Clone)]
#[derive_where(Debug, Eq, PartialEq)]
pub struct VoprfServer<CS: CipherSuite> {
    pub(crate) key_pair: KeyPair<CS>,
}

/////////////////////////
// API Implementations //
// =================== //
/////////////////////////

impl<CS: CipherSuite> VoprfClient<CS> {
    /// Computes the first step for the multiplicative blinding version of
    /// DH-OPRF: derives the token point from `seed` and blinds it with a
    /// fresh nonzero scalar.
    ///
    /// # Errors
    /// - [`Error::Input`] if the `seed` is longer than [`u16::MAX`].
    /// - [`Error::Random`] if the RNG fails.
    pub fn blind<R: RngCore + CryptoRng>(
        seed: &[u8],
        blinding_factor_rng: &mut R,
    ) -> Result<VoprfClientBlindResult<CS>> {
        let blind = CS::Group::random_scalar(blinding_factor_rng)?;
        Self::deterministic_blind_unchecked_inner(seed, blind)
    }

    /// Draws a random token seed and blinds it, see [`VoprfClient::blind`].
    ///
    /// # Errors
    /// [`Error::Random`] if the RNG fails.
    pub fn blind_random<R: RngCore + CryptoRng>(
        rng: &mut R,
    ) -> Result<VoprfClientBlindResult<CS>> {
        let token = Token::<CS>::random(rng)?;
        Self::blind(token.seed(), rng)
    }

    #[cfg(any(feature = "danger", test))]
    /// Computes the first step for the multiplicative blinding version of
    /// DH-OPRF, taking a blinding factor scalar as input instead of sampling
    /// from an RNG.
    ///
    /// # Caution
    ///
    /// This should be used with caution, since it does not perform any checks
    /// on the validity of the blinding factor beyond rejecting zero!
    ///
    /// # Errors
    /// - [`Error::Input`] if the `seed` is longer than [`u16::MAX`].
    /// - [`Error::ZeroScalar`] if the blind is zero.
    pub fn deterministic_blind_unchecked(
        seed: &[u8],
        blind: <CS::Group as Group>::Scalar,
    ) -> Result<VoprfClientBlindResult<CS>> {
        if bool::from(CS::Group::is_zero_scalar(blind)) {
            return Err(Error::ZeroScalar);
        }

        Self::deterministic_blind_unchecked_inner(seed, blind)
    }

    fn deterministic_blind_unchecked_inner(
        seed: &[u8],
        blind: <CS::Group as Group>::Scalar,
    ) -> Result<VoprfClientBlindResult<CS>> {
        // The seed is length-prefixed with two bytes in the final output hash
        i2osp_2(seed.len())?;

        let token = Token::<CS>::derive(seed);
        let blinded_element = token.elem * &blind;

        Ok(VoprfClientBlindResult {
            state: Self {
                blind,
                blinded_element,
                seed: seed.to_vec(),
            },
            message: BlindedToken(blinded_element),
        })
    }

    /// Computes the third step for the multiplicative blinding version of
    /// DH-OPRF, in which the client verifies the server's proof and unblinds
    /// its message.
    ///
    /// # Errors
    /// - [`Error::ProofVerification`] if the proof failed to verify.
    /// - [`Error::ZeroScalar`] if the stored blind is not invertible.
    pub fn finalize(
        &self,
        message: &EvaluatedToken<CS>,
        proof: &Proof<CS>,
        public_key: &PublicKey<CS>,
    ) -> Result<UnblindedToken<CS>> {
        proof.verify(self.blinded_element, message.0, public_key)?;
        self.unblind(message)
    }

    /// Verifies a [`BatchProof`] over several evaluations at once and
    /// unblinds each of them. `clients[i]` must be the state that produced
    /// the blinded token the server answered with `messages[i]`.
    ///
    /// # Errors
    /// - [`Error::Batch`] if the number of `clients` and `messages` don't
    ///   match or both are empty.
    /// - [`Error::ProofVerification`] if the proof failed to verify.
    pub fn batch_finalize(
        clients: &[Self],
        messages: &[EvaluatedToken<CS>],
        proof: &BatchProof<CS>,
        public_key: &PublicKey<CS>,
    ) -> Result<Vec<UnblindedToken<CS>>> {
        let blinded: Vec<_> = clients.iter().map(|client| client.blinded_element).collect();
        let evaluated: Vec<_> = messages.iter().map(|message| message.0).collect();

        proof.verify(&blinded, &evaluated, public_key)?;

        clients
            .iter()
            .zip(messages)
            .map(|(client, message)| client.unblind(message))
            .collect()
    }

    fn unblind(&self, message: &EvaluatedToken<CS>) -> Result<UnblindedToken<CS>> {
        Ok(UnblindedToken {
            seed: self.seed.clone(),
            elem: unblind::<CS>(message, self.blind)?,
        })
    }

    /// The seed this client derived its token from
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    #[cfg(any(feature = "danger", test))]
    /// Only used for test functions
    pub fn get_blind(&self) -> <CS::Group as Group>::Scalar {
        self.blind
    }
}

impl<CS: CipherSuite> VoprfServer<CS> {
    /// Produces a new instance of a [VoprfServer] using a supplied RNG
    ///
    /// # Errors
    /// [`Error::Random`] if the RNG fails.
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        Ok(Self {
            key_pair: KeyPair::new(rng)?,
        })
    }

    /// Produces a new instance of a [VoprfServer] using a supplied set of
    /// bytes to represent the server's private key
    ///
    /// # Errors
    /// [`Error::Deserialization`] if the private key is not a canonical
    /// scalar or is zero.
    pub fn new_with_key(private_key_bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            key_pair: KeyPair::from_private_key(private_key_bytes)?,
        })
    }

    /// Wraps an existing [`KeyPair`].
    pub fn from_key_pair(key_pair: KeyPair<CS>) -> Self {
        Self { key_pair }
    }

    /// Only used for tests
    #[cfg(any(feature = "danger", test))]
    pub fn get_private_key(&self) -> <CS::Group as Group>::Scalar {
        self.key_pair.sk
    }

    /// Retrieves the server's public key
    pub fn get_public_key(&self) -> PublicKey<CS> {
        self.key_pair.public_key()
    }

    /// Computes `Q = k·P` without a proof. Only useful when the client
    /// already trusts the server's key through some other channel.
    pub fn evaluate(&self, blinded_token: &BlindedToken<CS>) -> EvaluatedToken<CS> {
        evaluate(blinded_token, &self.key_pair)
    }

    /// Computes the second step for the multiplicative blinding version of
    /// DH-OPRF. This message is sent from the server (who holds the OPRF key)
    /// to the client, along with a proof that it used the key behind
    /// [`VoprfServer::get_public_key`].
    ///
    /// # Errors
    /// [`Error::Random`] if the RNG fails.
    pub fn blind_evaluate<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        blinded_token: &BlindedToken<CS>,
    ) -> Result<VoprfServerEvaluateResult<CS>> {
        let message = self.evaluate(blinded_token);
        let proof = Proof::new(rng, blinded_token.0, message.0, &self.key_pair)?;

        Ok(VoprfServerEvaluateResult { message, proof })
    }

    /// Evaluates every blinded token and proves all evaluations with a
    /// single [`BatchProof`].
    ///
    /// # Errors
    /// - [`Error::Batch`] if `blinded_tokens` is empty.
    /// - [`Error::Random`] if the RNG fails.
    pub fn batch_blind_evaluate<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        blinded_tokens: &[BlindedToken<CS>],
    ) -> Result<VoprfServerBatchEvaluateResult<CS>> {
        let messages: Vec<_> = blinded_tokens
            .iter()
            .map(|blinded_token| self.evaluate(blinded_token))
            .collect();

        let blinded: Vec<_> = blinded_tokens.iter().map(|token| token.0).collect();
        let evaluated: Vec<_> = messages.iter().map(|message| message.0).collect();
        let proof = BatchProof::new(rng, &blinded, &evaluated, &self.key_pair)?;

        Ok(VoprfServerBatchEvaluateResult { messages, proof })
    }

    /// Recomputes the unblinded token `W = k·H(seed)` a client holds for
    /// `seed`.
    pub fn rederive_unblinded_token(&self, seed: &[u8]) -> UnblindedToken<CS> {
        UnblindedToken {
            seed: seed.to_vec(),
            elem: Token::<CS>::derive(seed).elem * &self.key_pair.sk,
        }
    }

    /// Checks a redemption request. The client sends only the token's seed
    /// and a [`VerificationSignature`] over `message`; the server rederives
    /// the token under its key and checks the signature in constant time.
    ///
    /// # Errors
    /// - [`Error::SignatureVerification`] if the signature does not match,
    ///   including when the token was not issued under this key.
    /// - [`Error::Input`] if the seed is longer than [`u16::MAX`].
    pub fn redeem(
        &self,
        seed: &[u8],
        message: &[u8],
        signature: &VerificationSignature<CS>,
    ) -> Result<()> {
        self.rederive_unblinded_token(seed)
            .derive_verification_key()?
            .verify(message, signature)
    }
}

/////////////////////////
// Convenience Structs //
//==================== //
/////////////////////////

/// Contains the fields that are returned by a verifiable client blind
#[derive_where(Debug)]
pub struct VoprfClientBlindResult<CS: CipherSuite> {
    /// The state to be persisted on the client
    pub state: VoprfClient<CS>,
    /// The message to send to the server
    pub message: BlindedToken<CS>,
}

/// Contains the fields that are returned by a verifiable server evaluate
#[derive_where(Debug)]
pub struct VoprfServerEvaluateResult<CS: CipherSuite> {
    /// The message to send to the client
    pub message: EvaluatedToken<CS>,
    /// The proof for the client to verify
    pub proof: Proof<CS>,
}

/// Contains the fields that are returned by a verifiable server batch
/// evaluate
#[derive_where(Debug)]
pub struct VoprfServerBatchEvaluateResult<CS: CipherSuite> {
    /// The messages to send to the client, in the order of the blinded tokens
    pub messages: Vec<EvaluatedToken<CS>>,
    /// The proof for the client to verify
    pub proof: BatchProof<CS>,
}

////////////////////
// Free Functions //
// ============== //
////////////////////

/// Derives the token point for `seed`, see [`Token::derive`].
pub fn derive_token<CS: CipherSuite>(seed: &[u8]) -> Token<CS> {
    Token::derive(seed)
}

/// Blinds a token with a fresh nonzero scalar `r`, returning `P = r·T` and
/// `r`.
///
/// # Errors
/// [`Error::Random`] if the RNG fails.
pub fn blind<CS: CipherSuite, R: RngCore + CryptoRng>(
    token: &Token<CS>,
    rng: &mut R,
) -> Result<(BlindedToken<CS>, <CS::Group as Group>::Scalar)> {
    let blind = CS::Group::random_scalar(rng)?;
    Ok((BlindedToken(token.elem * &blind), blind))
}

/// Computes `Q = k·P`.
pub fn evaluate<CS: CipherSuite>(
    blinded_token: &BlindedToken<CS>,
    key_pair: &KeyPair<CS>,
) -> EvaluatedToken<CS> {
    EvaluatedToken(blinded_token.0 * &key_pair.sk)
}

/// Computes `W = r⁻¹·Q`.
///
/// # Errors
/// [`Error::ZeroScalar`] if `blind` is zero.
pub fn unblind<CS: CipherSuite>(
    evaluated_token: &EvaluatedToken<CS>,
    blind: <CS::Group as Group>::Scalar,
) -> Result<<CS::Group as Group>::Elem> {
    Ok(evaluated_token.0 * &CS::Group::invert_scalar(blind)?)
}

///////////
// Tests //
// ===== //
///////////
