// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::error::Error;
use crate::hash::hash256;

/// Capacity of the fixed filter in bits.
pub(super) const CAPACITY_BITS: u64 = 2048;

/// Backing storage in bytes, which is also the raw wire form.
const ARRAY_BYTES: usize = 256;

/// One 32-byte digest yields sixteen byte pairs.
const MAX_NUM_HASHES: u64 = 16;

/// Fixed 2048-bit membership filter, kept for compatibility with filters
/// serialized before the self-describing format existed.
///
/// Addressing differs from [`BloomFilter`](crate::bloom::BloomFilter): one
/// digest is computed per key and consumed as consecutive byte pairs. The
/// first byte of a pair selects one of the 256 array bytes and the low
/// three bits of the second select the bit within it, so no position is
/// ever reduced modulo the capacity and the hash-round count is capped at
/// the sixteen pairs a 32-byte digest can carry.
///
/// The wire form is the raw 256-byte array with no header and no checksum;
/// capacity and hash-round count travel out-of-band.
#[derive(Debug, Clone, PartialEq)]
pub struct Bloom2048 {
    array: [u8; ARRAY_BYTES],
    num_hashes: u64,
}

impl Bloom2048 {
    /// Creates an empty filter probing `num_hashes` byte pairs per key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless `1 <= num_hashes <= 16`.
    pub fn new(num_hashes: u64) -> Result<Self, Error> {
        if num_hashes == 0 || num_hashes > MAX_NUM_HASHES {
            return Err(
                Error::invalid_parameter("expecting 0 < number of hash rounds <= 16")
                    .with_context("num_hashes", num_hashes),
            );
        }

        Ok(Bloom2048 {
            array: [0; ARRAY_BYTES],
            num_hashes,
        })
    }

    /// Loads a filter from its raw 256-byte wire form.
    ///
    /// The capacity is fixed and the hash-round count is not part of the
    /// format, so `num_hashes` is supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an out-of-range `num_hashes` and
    /// `SizeMismatch` unless `bytes` is exactly 256 bytes long.
    pub fn from_bytes(bytes: &[u8], num_hashes: u64) -> Result<Self, Error> {
        let mut filter = Self::new(num_hashes)?;
        filter.set_bytes(bytes)?;
        Ok(filter)
    }

    /// Inserts a key. An empty key is ignored.
    pub fn insert(&mut self, key: &[u8]) {
        if key.is_empty() {
            return;
        }

        let digest = hash256(key);
        for pair in 0..self.num_hashes as usize {
            self.set_bit(digest[2 * pair], digest[2 * pair + 1]);
        }
    }

    /// Tests whether a key is possibly in the set; `false` for an empty
    /// key.
    pub fn contains(&self, key: &[u8]) -> bool {
        if key.is_empty() {
            return false;
        }

        let digest = hash256(key);
        (0..self.num_hashes as usize)
            .all(|pair| self.test_bit(digest[2 * pair], digest[2 * pair + 1]))
    }

    /// Filter capacity in bits, always 2048.
    pub fn capacity(&self) -> u64 {
        CAPACITY_BITS
    }

    /// Byte pairs consulted per key.
    pub fn num_hashes(&self) -> u64 {
        self.num_hashes
    }

    /// Always zero: the raw wire form has nowhere to carry an insert
    /// counter, so this variant does not track one.
    pub fn num_inserts(&self) -> u64 {
        0
    }

    /// Returns the raw 256-byte array.
    pub fn serialize(&self) -> Vec<u8> {
        self.array.to_vec()
    }

    /// Replaces the bit array with `bytes`.
    ///
    /// On error the filter is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` unless `bytes` is exactly 256 bytes long.
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() != ARRAY_BYTES {
            return Err(Error::size_mismatch(ARRAY_BYTES, bytes.len()));
        }
        self.array.copy_from_slice(bytes);
        Ok(())
    }

    // byte_pos selects the array byte, the low 3 bits of bit_pos the bit.
    fn set_bit(&mut self, byte_pos: u8, bit_pos: u8) {
        self.array[byte_pos as usize] |= 1 << (bit_pos & 7);
    }

    fn test_bit(&self, byte_pos: u8, bit_pos: u8) -> bool {
        self.array[byte_pos as usize] & (1 << (bit_pos & 7)) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_new_validates_num_hashes() {
        assert!(Bloom2048::new(1).is_ok());
        assert!(Bloom2048::new(16).is_ok());

        for num_hashes in [0, 17] {
            let err = Bloom2048::new(num_hashes).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    // Maps i to the pair (i & 0xff, i >> 8), which reaches every bit index
    // in [0, 2048) exactly once.
    #[test]
    fn test_bit_addressing_bijection() {
        let mut filter = Bloom2048::new(3).unwrap();
        for i in 0..2048usize {
            if i % 5 == 0 {
                filter.set_bit(i as u8, (i >> 8) as u8);
            }
        }
        for i in 0..2048usize {
            assert_eq!(filter.test_bit(i as u8, (i >> 8) as u8), i % 5 == 0);
        }
    }

    #[test]
    fn test_insert_and_contains() {
        let mut filter = Bloom2048::new(3).unwrap();
        assert!(!filter.contains(b"alpha"));

        filter.insert(b"alpha");
        assert!(filter.contains(b"alpha"));
        assert_eq!(filter.capacity(), 2048);
        assert_eq!(filter.num_hashes(), 3);
        assert_eq!(filter.num_inserts(), 0);
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let mut filter = Bloom2048::new(3).unwrap();
        filter.insert(b"");
        assert_eq!(filter.serialize(), vec![0u8; 256]);
        assert!(!filter.contains(b""));
    }

    #[test]
    fn test_set_bytes_length_check() {
        let mut filter = Bloom2048::new(3).unwrap();
        filter.insert(b"alpha");
        let before = filter.clone();

        let err = filter.set_bytes(&[0u8; 255]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
        assert_eq!(filter, before);

        filter.set_bytes(&[0u8; 256]).unwrap();
        assert!(!filter.contains(b"alpha"));
    }
}
