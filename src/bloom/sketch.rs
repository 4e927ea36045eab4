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

use crate::bloom::bit_array::BitArray;
use crate::bloom::serialization::CHECKSUM_BYTES;
use crate::bloom::serialization::HEADER_BYTES;
use crate::bloom::serialization::MIN_SERIALIZED_BYTES;
use crate::bloom::serialization::WORD_BYTES;
use crate::bloom::serialization::serialized_len;
use crate::codec::FilterBytes;
use crate::codec::FilterSlice;
use crate::error::Error;
use crate::hash::KeyPositions;
use crate::hash::hash256;

/// The wire format stores the hash-round count in a single byte's range.
const MAX_NUM_HASHES: u64 = 255;

/// General membership filter parametrized by bit capacity and hash-round
/// count.
///
/// Keys are opaque byte strings. A lookup answers "possibly present" or
/// "definitely absent": inserted keys are always found again, while an
/// absent key is reported present only with the false-positive probability
/// determined by the capacity `m`, the hash-round count `k` and the number
/// of inserts `n`, approximately `(1 - e^(-kn/m))^k`. The filter never
/// computes that bound itself; choosing `m` and `k` for a target rate is
/// the caller's responsibility.
///
/// # Examples
///
/// ```
/// use bitsieve::bloom::BloomFilter;
///
/// let mut filter = BloomFilter::new(10_000, 5).unwrap();
/// filter.insert(b"alpha");
///
/// assert!(filter.contains(b"alpha"));
/// assert!(!filter.contains(b"beta"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Bit storage of `m` bits.
    bits: BitArray,
    /// Hash rounds consulted per key (k).
    num_hashes: u64,
    /// Count of non-empty insert operations (n), duplicates included.
    num_inserts: u64,
}

impl BloomFilter {
    /// Creates an empty filter of `num_bits` capacity probing `num_hashes`
    /// positions per key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `num_bits` is zero or `num_hashes` is
    /// outside `1..=255`.
    pub fn new(num_bits: u64, num_hashes: u64) -> Result<Self, Error> {
        Self::validate_params(num_bits, num_hashes)?;

        Ok(BloomFilter {
            bits: BitArray::new(num_bits),
            num_hashes,
            num_inserts: 0,
        })
    }

    /// Inserts a key.
    ///
    /// An empty key is ignored. Every non-empty insert increments the
    /// operation counter, whether or not the key was seen before, so
    /// [`num_inserts`](Self::num_inserts) tracks operations rather than
    /// distinct keys.
    pub fn insert(&mut self, key: &[u8]) {
        if key.is_empty() {
            return;
        }

        for pos in KeyPositions::new(key, self.num_hashes) {
            self.bits.set(pos);
        }
        self.num_inserts += 1;
    }

    /// Tests whether a key is possibly in the set.
    ///
    /// Returns `false` for an empty key and for any key that is definitely
    /// absent; `true` means the key was possibly inserted. The check stops
    /// at the first unset position.
    pub fn contains(&self, key: &[u8]) -> bool {
        if key.is_empty() {
            return false;
        }

        KeyPositions::new(key, self.num_hashes).all(|pos| self.bits.test(pos))
    }

    /// Filter capacity in bits (m).
    pub fn capacity(&self) -> u64 {
        self.bits.num_bits()
    }

    /// Hash rounds consulted per key (k).
    pub fn num_hashes(&self) -> u64 {
        self.num_hashes
    }

    /// Number of non-empty insert operations performed (n).
    ///
    /// Duplicate keys count every time, so this is an operation count, not
    /// a distinct-key cardinality.
    pub fn num_inserts(&self) -> u64 {
        self.num_inserts
    }

    /// Serializes the filter to its self-describing byte layout.
    ///
    /// The layout is big-endian: `m`, `k` and `n` as 8 bytes each, the
    /// bucket words as 8 bytes each, then a trailing Keccak-256 checksum
    /// over all preceding bytes. The total length is
    /// `24 + 8 * ceil(m / 64) + 32`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitsieve::bloom::BloomFilter;
    ///
    /// let mut filter = BloomFilter::new(500, 6).unwrap();
    /// filter.insert(b"key");
    ///
    /// let bytes = filter.serialize();
    /// assert_eq!(bytes.len(), 120);
    ///
    /// let restored = BloomFilter::deserialize(&bytes).unwrap();
    /// assert!(restored.contains(b"key"));
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = FilterBytes::with_capacity(serialized_len(self.capacity()));

        bytes.write_u64_be(self.capacity());
        bytes.write_u64_be(self.num_hashes);
        bytes.write_u64_be(self.num_inserts);
        for &word in self.bits.words() {
            bytes.write_u64_be(word);
        }

        let checksum = hash256(bytes.as_slice());
        bytes.write(&checksum);
        bytes.into_bytes()
    }

    /// Reconstructs a filter from bytes produced by
    /// [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// - `TruncatedData` if the buffer cannot hold a header and checksum,
    ///   or if the bucket region is shorter than the declared capacity
    ///   requires.
    /// - `HashMismatch` if the trailing checksum does not match the
    ///   preceding bytes.
    /// - `InvalidParameter` if the header carries a capacity or hash-round
    ///   count that [`new`](Self::new) would refuse.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < MIN_SERIALIZED_BYTES {
            return Err(
                Error::truncated_data("header and checksum").with_context("length", bytes.len()),
            );
        }

        let (payload, stored) = bytes.split_at(bytes.len() - CHECKSUM_BYTES);
        let computed = hash256(payload);
        if computed.as_slice() != stored {
            return Err(Error::hash_mismatch(stored, &computed));
        }

        let mut cursor = FilterSlice::new(payload);
        let num_bits = cursor
            .read_u64_be()
            .map_err(|_| Error::truncated_data("num_bits"))?;
        let num_hashes = cursor
            .read_u64_be()
            .map_err(|_| Error::truncated_data("num_hashes"))?;
        let num_inserts = cursor
            .read_u64_be()
            .map_err(|_| Error::truncated_data("num_inserts"))?;
        Self::validate_params(num_bits, num_hashes)?;

        // The checksum has vouched for the payload, but the declared
        // capacity still has to fit the bucket region before any words are
        // allocated.
        let num_words = num_bits.div_ceil(64);
        let bucket_bytes = (payload.len() - HEADER_BYTES) as u64;
        if bucket_bytes < num_words * WORD_BYTES as u64 {
            return Err(Error::truncated_data("buckets")
                .with_context("num_bits", num_bits)
                .with_context("available_bytes", bucket_bytes));
        }

        let mut words = Vec::with_capacity(num_words as usize);
        for _ in 0..num_words {
            let word = cursor
                .read_u64_be()
                .map_err(|_| Error::truncated_data("buckets"))?;
            words.push(word);
        }
        // Surplus bytes between the buckets and the checksum were covered
        // by the checksum; the reader stops at the declared word count and
        // leaves them behind.

        Ok(BloomFilter {
            bits: BitArray::from_words(words, num_bits),
            num_hashes,
            num_inserts,
        })
    }

    /// Decodes `bytes` and replaces this filter's entire state with the
    /// decoded one.
    ///
    /// On error the filter is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Same as [`deserialize`](Self::deserialize).
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        *self = Self::deserialize(bytes)?;
        Ok(())
    }

    fn validate_params(num_bits: u64, num_hashes: u64) -> Result<(), Error> {
        if num_bits == 0 {
            return Err(Error::invalid_parameter("expecting a positive bit capacity")
                .with_context("num_bits", num_bits));
        }
        if num_hashes == 0 || num_hashes > MAX_NUM_HASHES {
            return Err(
                Error::invalid_parameter("expecting 0 < number of hash rounds < 256")
                    .with_context("num_hashes", num_hashes),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_new_validates_parameters() {
        assert!(BloomFilter::new(500, 1).is_ok());
        assert!(BloomFilter::new(500, 255).is_ok());

        for (num_bits, num_hashes) in [(500, 0), (500, 256), (0, 3)] {
            let err = BloomFilter::new(num_bits, num_hashes).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn test_insert_and_contains() {
        let mut filter = BloomFilter::new(500, 6).unwrap();
        assert!(!filter.contains(b"alpha"));

        filter.insert(b"alpha");
        assert!(filter.contains(b"alpha"));
        assert_eq!(filter.capacity(), 500);
        assert_eq!(filter.num_hashes(), 6);
        assert_eq!(filter.num_inserts(), 1);
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let mut filter = BloomFilter::new(500, 6).unwrap();
        let pristine = filter.clone();

        filter.insert(b"");
        assert_eq!(filter, pristine);
        assert!(!filter.contains(b""));
    }

    #[test]
    fn test_duplicate_inserts_increment_counter() {
        let mut filter = BloomFilter::new(500, 6).unwrap();
        for _ in 0..5 {
            filter.insert(b"same");
        }
        assert_eq!(filter.num_inserts(), 5);
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let mut filter = BloomFilter::new(300, 5).unwrap();
        filter.insert(b"one");
        filter.insert(b"two");

        let restored = BloomFilter::deserialize(&filter.serialize()).unwrap();
        assert_eq!(restored, filter);
    }
}
