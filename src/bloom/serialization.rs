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

//! Binary serialization format constants for the general filter.
//!
//! The serialized form is self-describing and protected by a trailing
//! Keccak-256 checksum over everything that precedes it.
//!
//! ## Layout (Big Endian)
//!
//! | Offset | Field    | Size                 | Description                        |
//! |--------|----------|----------------------|------------------------------------|
//! | 0      | m        | 8                    | bit capacity                       |
//! | 8      | k        | 8                    | hash rounds per key                |
//! | 16     | n        | 8                    | insert-operation count             |
//! | 24     | buckets  | 8 * ceil(m / 64)     | bit words, big-endian u64 each     |
//! | X      | checksum | 32                   | Keccak-256 over bytes `[0, X)`     |
//!
//! Total length is `24 + 8 * ceil(m / 64) + 32`. The legacy 2048-bit filter
//! does not use this format; it round-trips as its raw 256-byte array with
//! `m` and `k` supplied out-of-band.

use crate::hash::DIGEST_BYTES;

/// Header size: `m`, `k` and `n` as big-endian u64.
pub(super) const HEADER_BYTES: usize = 24;

/// Trailing checksum size.
pub(super) const CHECKSUM_BYTES: usize = DIGEST_BYTES;

/// Size of one serialized bucket word.
pub(super) const WORD_BYTES: usize = 8;

/// Smallest buffer that can carry a complete header and checksum.
pub(super) const MIN_SERIALIZED_BYTES: usize = HEADER_BYTES + CHECKSUM_BYTES;

/// Exact serialized length for a filter of `m` bits.
pub(super) fn serialized_len(num_bits: u64) -> usize {
    HEADER_BYTES + num_bits.div_ceil(64) as usize * WORD_BYTES + CHECKSUM_BYTES
}
