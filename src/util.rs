// Copyright (c) Meta Platforms, Inc. and affiliates.
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed
// licenses.

//! Helper functions

use generic_array::typenum::{Unsigned, U2};
use generic_array::{ArrayLength, GenericArray};

use crate::{Error, Result};

pub(crate) const STR_FINALIZE: [u8; 8] = *b"Finalize";
pub(crate) const STR_DERIVE_KEY: [u8; 15] = *b"hash_derive_key";

// Corresponds to the I2OSP() function from RFC8017
pub(crate) fn i2osp<L: ArrayLength<u8>>(input: usize) -> Result<GenericArray<u8, L>> {
    const SIZEOF_USIZE: usize = core::mem::size_of::<usize>();

    // Make sure input fits in output.
    if (SIZEOF_USIZE as u32 - input.leading_zeros() / 8) > L::U32 {
        return Err(Error::Input);
    }

    let mut output = GenericArray::default();
    output[L::USIZE.saturating_sub(SIZEOF_USIZE)..]
        .copy_from_slice(&input.to_be_bytes()[SIZEOF_USIZE.saturating_sub(L::USIZE)..]);
    Ok(output)
}

pub(crate) fn i2osp_2(input: usize) -> Result<GenericArray<u8, U2>> {
    i2osp::<U2>(input)
}

/// Splits `input` into a fixed-length head and the remaining bytes.
pub(crate) fn split_fixed<L: Unsigned>(input: &[u8]) -> Result<(&[u8], &[u8])> {
    if input.len() < L::USIZE {
        return Err(Error::Deserialization);
    }

    Ok(input.split_at(L::USIZE))
}
