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

//! Keccak-256 digests and the expansion of one key into many bit positions.
//!
//! This is the original Keccak-256 (as used by Ethereum), not NIST SHA3-256;
//! both the checksummed wire format and the legacy 2048-bit addressing depend
//! on that exact permutation and padding.

use byteorder::BigEndian;
use byteorder::ByteOrder;
use sha3::Digest;
use sha3::Keccak256;

/// Digest width in bytes.
pub(crate) const DIGEST_BYTES: usize = 32;

/// Independent 64-bit chunks carried by one digest.
const CHUNKS_PER_DIGEST: usize = DIGEST_BYTES / 8;

/// Returns the Keccak-256 digest of `data`.
pub(crate) fn hash256(data: &[u8]) -> [u8; DIGEST_BYTES] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Returns the Keccak-256 digest of `key ‖ big_endian_u64(round)`.
///
/// Streaming the two parts avoids materializing the concatenation; the result
/// is identical to hashing the joined bytes.
pub(crate) fn round_digest(key: &[u8], round: u64) -> [u8; DIGEST_BYTES] {
    let mut hasher = Keccak256::new();
    hasher.update(key);
    hasher.update(round.to_be_bytes());
    hasher.finalize().into()
}

/// Iterator expanding one key into `count` pseudo-random 64-bit positions.
///
/// Each round hashes `key ‖ big_endian_u64(round)` and yields the digest's
/// four big-endian u64 chunks in order, so `count` positions cost
/// `ceil(count / 4)` digest computations and the final digest may be consumed
/// only partially. Callers reduce positions to a bit index themselves.
pub(crate) struct KeyPositions<'a> {
    key: &'a [u8],
    remaining: u64,
    round: u64,
    digest: [u8; DIGEST_BYTES],
    chunk: usize,
}

impl<'a> KeyPositions<'a> {
    pub fn new(key: &'a [u8], count: u64) -> Self {
        KeyPositions {
            key,
            remaining: count,
            round: 0,
            digest: [0; DIGEST_BYTES],
            // Forces a fresh digest on the first call to next().
            chunk: CHUNKS_PER_DIGEST,
        }
    }
}

impl Iterator for KeyPositions<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        if self.chunk == CHUNKS_PER_DIGEST {
            self.digest = round_digest(self.key, self.round);
            self.round += 1;
            self.chunk = 0;
        }

        let start = self.chunk * 8;
        let position = BigEndian::read_u64(&self.digest[start..start + 8]);
        self.chunk += 1;
        self.remaining -= 1;
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keccak-256 of the empty input. NIST SHA3-256 gives a different value
    // (a7ffc6f8…), so this pins the legacy permutation the wire format needs.
    #[test]
    fn test_keccak256_known_answer() {
        assert_eq!(
            hex::encode(hash256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex::encode(hash256(b"abc")),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn test_round_digest_matches_concatenation() {
        let key = b"round-digest-key";
        for round in [0u64, 1, 7, u64::MAX] {
            let mut joined = key.to_vec();
            joined.extend_from_slice(&round.to_be_bytes());
            assert_eq!(round_digest(key, round), hash256(&joined));
        }
    }

    #[test]
    fn test_positions_follow_digest_chunks() {
        let key = b"position-test";
        let positions: Vec<u64> = KeyPositions::new(key, 6).collect();
        assert_eq!(positions.len(), 6);

        let first = round_digest(key, 0);
        let second = round_digest(key, 1);
        for i in 0..4 {
            assert_eq!(positions[i], BigEndian::read_u64(&first[i * 8..i * 8 + 8]));
        }
        for i in 0..2 {
            assert_eq!(
                positions[4 + i],
                BigEndian::read_u64(&second[i * 8..i * 8 + 8])
            );
        }
    }

    #[test]
    fn test_positions_count_and_determinism() {
        let key = b"deterministic";
        assert_eq!(KeyPositions::new(key, 0).count(), 0);
        assert_eq!(KeyPositions::new(key, 9).count(), 9);

        let a: Vec<u64> = KeyPositions::new(key, 9).collect();
        let b: Vec<u64> = KeyPositions::new(key, 9).collect();
        assert_eq!(a, b);

        // A different key diverges immediately.
        let c: Vec<u64> = KeyPositions::new(b"deterministic!", 9).collect();
        assert_ne!(a, c);
    }

    #[test]
    fn test_size_hint_tracks_remaining() {
        let mut positions = KeyPositions::new(b"hint", 5);
        assert_eq!(positions.size_hint(), (5, Some(5)));
        let _ = positions.next();
        assert_eq!(positions.size_hint(), (4, Some(4)));
    }
}
