// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Handles the serialization of each of the components used in the protocol

use alloc::vec::Vec;

use digest::Output;
use generic_array::GenericArray;

use crate::util::{i2osp_2, split_fixed};
use crate::{
    BatchProof, BlindedToken, CipherSuite, Error, EvaluatedToken, Group, KeyPair, Proof,
    PublicKey, Result, Token, UnblindedToken, VerificationSignature, VoprfClient, VoprfServer,
};

//////////////////////////////////////////////////////////
// Serialization and Deserialization for High-Level API //
// ==================================================== //
//////////////////////////////////////////////////////////

impl<CS: CipherSuite> KeyPair<CS> {
    /// Serialization into bytes. Only the private key is encoded; the public
    /// key is recomputed on load.
    pub fn serialize(&self) -> GenericArray<u8, <CS::Group as Group>::ScalarLen> {
        CS::Group::serialize_scalar(self.sk)
    }

    /// Deserialization from bytes
    ///
    /// # Errors
    /// [`Error::Deserialization`] if failed to deserialize `input`.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        Self::from_private_key(input)
    }
}

impl<CS: CipherSuite> PublicKey<CS> {
    /// Serialization into bytes
    pub fn serialize(&self) -> GenericArray<u8, <CS::Group as Group>::ElemLen> {
        CS::Group::serialize_elem(self.0)
    }

    /// Deserialization from bytes
    ///
    /// # Errors
    /// [`Error::Deserialization`] if failed to deserialize `input`.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        CS::Group::deserialize_elem(input).map(Self)
    }
}

impl<CS: CipherSuite> VoprfClient<CS> {
    /// Serialization into bytes: `blind || blinded point || seed`
    pub fn serialize(&self) -> Vec<u8> {
        [
            CS::Group::serialize_scalar(self.blind).as_slice(),
            CS::Group::serialize_elem(self.blinded_element).as_slice(),
            self.seed.as_slice(),
        ]
        .concat()
    }

    /// Deserialization from bytes. The blinded point is checked against the
    /// blind and the seed.
    ///
    /// # Errors
    /// [`Error::Deserialization`] if failed to deserialize `input`.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        let (blind, input) = split_fixed::<<CS::Group as Group>::ScalarLen>(input)?;
        let (blinded_element, seed) = split_fixed::<<CS::Group as Group>::ElemLen>(input)?;

        let blind = CS::Group::deserialize_scalar(blind)?;
        let blinded_element = CS::Group::deserialize_elem(blinded_element)?;
        i2osp_2(seed.len()).map_err(|_| Error::Deserialization)?;

        if bool::from(CS::Group::is_zero_scalar(blind)) {
            return Err(Error::Deserialization);
        }
        let expected = Token::<CS>::derive(seed).elem * &blind;
        if expected != blinded_element {
            return Err(Error::Deserialization);
        }

        Ok(Self {
            blind,
            blinded_element,
            seed: seed.to_vec(),
        })
    }
}

impl<CS: CipherSuite> VoprfServer<CS> {
    /// Serialization into bytes
    pub fn serialize(&self) -> GenericArray<u8, <CS::Group as Group>::ScalarLen> {
        self.key_pair.serialize()
    }

    /// Deserialization from bytes
    ///
    /// # Errors
    /// [`Error::Deserialization`] if failed to deserialize `input`.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        KeyPair::deserialize(input).map(Self::from_key_pair)
    }
}

impl<CS: CipherSuite> Proof<CS> {
    /// Serialization into bytes: `c || s`
    pub fn serialize(&self) -> Vec<u8> {
        [
            CS::Group::serialize_scalar(self.c_scalar).as_slice(),
            CS::Group::serialize_scalar(self.s_scalar).as_slice(),
        ]
        .concat()
    }

    /// Deserialization from bytes
    ///
    /// # Errors
    /// [`Error::Deserialization`] if failed to deserialize `input`.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        let (c_scalar, s_scalar) = split_fixed::<<CS::Group as Group>::ScalarLen>(input)?;

        Ok(Self {
            c_scalar: CS::Group::deserialize_scalar(c_scalar)?,
            s_scalar: CS::Group::deserialize_scalar(s_scalar)?,
        })
    }
}

impl<CS: CipherSuite> BatchProof<CS> {
    /// Serialization into bytes: `c || s || M || Z`. Use
    /// [`BatchProof::proof`] for the shorter form without the composites.
    pub fn serialize(&self) -> Vec<u8> {
        [
            self.proof.serialize().as_slice(),
            CS::Group::serialize_elem(self.m).as_slice(),
            CS::Group::serialize_elem(self.z).as_slice(),
        ]
        .concat()
    }

    /// Deserialization from bytes
    ///
    /// # Errors
    /// [`Error::Deserialization`] if failed to deserialize `input`.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        let (c_scalar, input) = split_fixed::<<CS::Group as Group>::ScalarLen>(input)?;
        let (s_scalar, input) = split_fixed::<<CS::Group as Group>::ScalarLen>(input)?;
        let (m, z) = split_fixed::<<CS::Group as Group>::ElemLen>(input)?;

        Ok(Self {
            proof: Proof {
                c_scalar: CS::Group::deserialize_scalar(c_scalar)?,
                s_scalar: CS::Group::deserialize_scalar(s_scalar)?,
            },
            m: CS::Group::deserialize_elem(m)?,
            z: CS::Group::deserialize_elem(z)?,
        })
    }
}

impl<CS: CipherSuite> BlindedToken<CS> {
    /// Serialization into bytes
    pub fn serialize(&self) -> GenericArray<u8, <CS::Group as Group>::ElemLen> {
        CS::Group::serialize_elem(self.0)
    }

    /// Deserialization from bytes
    ///
    /// # Errors
    /// [`Error::Deserialization`] if failed to deserialize `input`.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        CS::Group::deserialize_elem(input).map(Self)
    }
}

impl<CS: CipherSuite> EvaluatedToken<CS> {
    /// Serialization into bytes
    pub fn serialize(&self) -> GenericArray<u8, <CS::Group as Group>::ElemLen> {
        CS::Group::serialize_elem(self.0)
    }

    /// Deserialization from bytes
    ///
    /// # Errors
    /// [`Error::Deserialization`] if failed to deserialize `input`.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        CS::Group::deserialize_elem(input).map(Self)
    }
}

impl<CS: CipherSuite> UnblindedToken<CS> {
    /// Serialization into bytes: `W || seed`
    pub fn serialize(&self) -> Vec<u8> {
        [CS::Group::serialize_elem(self.elem).as_slice(), self.seed.as_slice()].concat()
    }

    /// Deserialization from bytes
    ///
    /// # Errors
    /// [`Error::Deserialization`] if failed to deserialize `input`.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        let (elem, seed) = split_fixed::<<CS::Group as Group>::ElemLen>(input)?;
        i2osp_2(seed.len()).map_err(|_| Error::Deserialization)?;

        Ok(Self {
            seed: seed.to_vec(),
            elem: CS::Group::deserialize_elem(elem)?,
        })
    }
}

impl<CS: CipherSuite> VerificationSignature<CS> {
    /// Serialization into bytes
    pub fn serialize(&self) -> Output<CS::Hash> {
        self.0.clone()
    }

    /// Deserialization from bytes
    ///
    /// # Errors
    /// [`Error::Deserialization`] if `input` is not exactly one MAC tag long.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        Output::<CS::Hash>::from_exact_iter(input.iter().copied())
            .map(Self)
            .ok_or(Error::Deserialization)
    }
}

/// Implements `serde`'s `Serialize` and `Deserialize` over the byte form
/// produced by the type's own `serialize` and accepted by its `deserialize`.
#[cfg(feature = "serde")]
macro_rules! impl_serialize_and_deserialize_for {
    ($name:ident) => {
        #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
        impl<CS: CipherSuite> serde::Serialize for $name<CS> {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_bytes(&self.serialize())
            }
        }

        #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
        impl<'de, CS: CipherSuite> serde::Deserialize<'de> for $name<CS> {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct ByteVisitor<CS: CipherSuite>(core::marker::PhantomData<CS>);

                impl<'de, CS: CipherSuite> serde::de::Visitor<'de> for ByteVisitor<CS> {
                    type Value = $name<CS>;

                    fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                        formatter.write_str(core::concat!(
                            "the byte representation of a ",
                            core::stringify!($name)
                        ))
                    }

                    fn visit_bytes<E>(self, value: &[u8]) -> core::result::Result<Self::Value, E>
                    where
                        E: serde::de::Error,
                    {
                        $name::<CS>::deserialize(value).map_err(|_| {
                            E::invalid_value(
                                serde::de::Unexpected::Bytes(value),
                                &core::concat!("invalid byte sequence for ", core::stringify!($name)),
                            )
                        })
                    }

                    // Formats without a native byte type hand bytes over as a
                    // sequence of integers.
                    fn visit_seq<A>(self, mut seq: A) -> core::result::Result<Self::Value, A::Error>
                    where
                        A: serde::de::SeqAccess<'de>,
                    {
                        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
                        while let Some(byte) = seq.next_element::<u8>()? {
                            bytes.push(byte);
                        }
                        self.visit_bytes(&bytes)
                    }
                }

                deserializer.deserialize_bytes(ByteVisitor::<CS>(core::marker::PhantomData))
            }
        }
    };
}

#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(KeyPair);
#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(PublicKey);
#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(VoprfClient);
#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(VoprfServer);
#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(Proof);
#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(BatchProof);
#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(BlindedToken);
#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(EvaluatedToken);
#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(UnblindedToken);
#[cfg(feature = "serde")]
impl_serialize_and_deserialize_for!(VerificationSignature);
