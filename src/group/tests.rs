// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Includes a series of tests for the group implementations

use rand::rngs::OsRng;
use rand::RngCore;

use crate::{Error, Group, Result};

#[test]
fn test_group_properties() -> Result<()> {
    #[cfg(feature = "ristretto255")]
    {
        use crate::Ristretto255;

        test_identity_element_error::<Ristretto255>()?;
        test_zero_scalar::<Ristretto255>()?;
        test_elem_round_trip::<Ristretto255>()?;
        test_scalar_round_trip::<Ristretto255>()?;
        test_hash_to_elem_is_deterministic::<Ristretto255>()?;
    }

    Ok(())
}

// Checks that the identity element cannot be deserialized
fn test_identity_element_error<G: Group>() -> Result<()> {
    let identity = G::identity_elem();
    let result = G::deserialize_elem(&G::serialize_elem(identity));
    assert!(matches!(result, Err(Error::Deserialization)));

    Ok(())
}

// Zero decodes as a scalar but has no inverse
fn test_zero_scalar<G: Group>() -> Result<()> {
    let zero_scalar = G::zero_scalar();
    let decoded = G::deserialize_scalar(&G::serialize_scalar(zero_scalar))?;
    assert!(bool::from(G::is_zero_scalar(decoded)));
    assert!(matches!(
        G::invert_scalar(zero_scalar),
        Err(Error::ZeroScalar)
    ));

    Ok(())
}

fn test_elem_round_trip<G: Group>() -> Result<()> {
    let mut uniform_bytes = [0u8; 64];
    OsRng.fill_bytes(&mut uniform_bytes);
    let elem = G::random_elem(&uniform_bytes);
    assert_eq!(G::deserialize_elem(&G::serialize_elem(elem))?, elem);

    Ok(())
}

fn test_scalar_round_trip<G: Group>() -> Result<()> {
    let scalar = G::random_scalar(&mut OsRng)?;
    assert_eq!(G::deserialize_scalar(&G::serialize_scalar(scalar))?, scalar);

    // s * s^-1 is one, which is its own inverse
    let one = scalar * &G::invert_scalar(scalar)?;
    assert_eq!(G::invert_scalar(one)?, one);
    assert_eq!(one * &scalar, scalar);

    Ok(())
}

fn test_hash_to_elem_is_deterministic<G: Group>() -> Result<()> {
    let first = G::hash_to_elem::<sha2::Sha512>(b"seed");
    let second = G::hash_to_elem::<sha2::Sha512>(b"seed");
    let other = G::hash_to_elem::<sha2::Sha512>(b"other seed");
    assert_eq!(first, second);
    assert_ne!(first, other);

    Ok(())
}

#[cfg(feature = "ristretto255")]
mod ristretto {
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
    use curve25519_dalek::ristretto::RistrettoPoint;
    use curve25519_dalek::scalar::Scalar;
    use sha2::{Digest, Sha512};

    use crate::{Error, Group, Ristretto255};

    // The group order l, little-endian. Not a canonical scalar.
    const ORDER: [u8; 32] = [
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
        0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x10,
    ];

    #[test]
    fn rejects_non_canonical_scalar() {
        assert_eq!(
            Ristretto255::deserialize_scalar(&ORDER),
            Err(Error::Deserialization)
        );

        let mut above = ORDER;
        above[0] += 1;
        assert_eq!(
            Ristretto255::deserialize_scalar(&above),
            Err(Error::Deserialization)
        );

        let mut below = ORDER;
        below[0] -= 1;
        assert_eq!(
            Ristretto255::deserialize_scalar(&below),
            Ok(-Scalar::ONE)
        );
    }

    #[test]
    fn rejects_malformed_elements() {
        // Wrong length
        assert_eq!(
            Ristretto255::deserialize_elem(&[1u8; 31]),
            Err(Error::Deserialization)
        );
        // A negative field element is never a canonical Ristretto encoding
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        assert_eq!(
            Ristretto255::deserialize_elem(&bytes),
            Err(Error::Deserialization)
        );
        // Non-canonical field element encoding
        assert_eq!(
            Ristretto255::deserialize_elem(&[0xff; 32]),
            Err(Error::Deserialization)
        );
    }

    #[test]
    fn base_elem_encoding() {
        assert_eq!(
            hex::encode(Ristretto255::serialize_elem(Ristretto255::base_elem())),
            "e2f2ae0a6abc4e71a884a961c500515f58e30b6aa582dd8db6a65945e08d2d76"
        );
    }

    #[test]
    fn hash_to_elem_uses_digest_of_seed() {
        let seed = b"token seed";
        let expected = RistrettoPoint::from_uniform_bytes(&Sha512::digest(seed).into());
        assert_eq!(Ristretto255::hash_to_elem::<Sha512>(seed), expected);
    }

    #[test]
    fn random_elem_adds_both_halves() {
        let mut bytes = [0u8; 64];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let elem = Ristretto255::random_elem(&bytes);
        assert_ne!(elem, Ristretto255::identity_elem());
        assert_eq!(Ristretto255::random_elem(&bytes), elem);

        let mut tweaked = bytes;
        tweaked[63] ^= 1;
        assert_ne!(Ristretto255::random_elem(&tweaked), elem);
    }

    #[test]
    fn hash_to_scalar_reduces_digest() {
        let hash = Sha512::new().chain_update(b"transcript");
        let expected = Scalar::from_bytes_mod_order_wide(&Sha512::digest(b"transcript").into());
        assert_eq!(Ristretto255::hash_to_scalar(hash), expected);
    }

    #[test]
    fn base_multiplication() {
        let three = Scalar::from(3u64);
        assert_eq!(
            Ristretto255::base_elem() * &three,
            RISTRETTO_BASEPOINT_POINT + RISTRETTO_BASEPOINT_POINT + RISTRETTO_BASEPOINT_POINT
        );
    }
}
