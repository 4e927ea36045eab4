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

//! Probabilistic set-membership filters.
//!
//! Two variants share one capability surface. [`BloomFilter`] is the
//! general filter parametrized by bit capacity `m` and hash-round count
//! `k`, with a self-describing, checksum-protected wire format.
//! [`Bloom2048`] is a fixed 2048-bit filter kept for filters serialized
//! before that format existed; it uses a different addressing scheme and
//! its raw wire form carries no header. The [`MembershipFilter`] trait
//! unifies the two for callers that pick a variant at run time, and
//! [`new_filter`] / [`filter_from_bytes`] perform that dispatch by
//! capacity.
//!
//! # Usage
//!
//! ```rust
//! use bitsieve::bloom::new_filter;
//!
//! let mut filter = new_filter(10_000, 5).unwrap();
//! filter.insert(b"alpha");
//!
//! assert!(filter.contains(b"alpha"));
//! assert!(!filter.contains(b"beta"));
//! ```

use std::fmt;

use crate::error::Error;

mod bit_array;
mod fixed;
mod serialization;
mod sketch;

pub use self::fixed::Bloom2048;
pub use self::sketch::BloomFilter;

/// Capability surface common to every filter variant.
///
/// The two implementations differ in how they map a key to bit positions
/// and keep those schemes separate; the trait only unifies what callers
/// see. It is object-safe, so heterogeneous collections can be held as
/// `Vec<Box<dyn MembershipFilter>>`, and implementations are `Debug` so
/// such boxes stay printable in assertions and diagnostics.
pub trait MembershipFilter: fmt::Debug {
    /// Inserts a key; an empty key is ignored.
    fn insert(&mut self, key: &[u8]);

    /// Tests whether a key is possibly in the set; `false` for an empty
    /// key.
    fn contains(&self, key: &[u8]) -> bool;

    /// Returns the filter's wire form.
    fn serialize(&self) -> Vec<u8>;

    /// Filter capacity in bits (m).
    fn capacity(&self) -> u64;

    /// Hash rounds consulted per key (k).
    fn num_hashes(&self) -> u64;

    /// Number of non-empty insert operations (n); zero where the variant
    /// does not track it.
    fn num_inserts(&self) -> u64;
}

impl MembershipFilter for BloomFilter {
    fn insert(&mut self, key: &[u8]) {
        BloomFilter::insert(self, key);
    }

    fn contains(&self, key: &[u8]) -> bool {
        BloomFilter::contains(self, key)
    }

    fn serialize(&self) -> Vec<u8> {
        BloomFilter::serialize(self)
    }

    fn capacity(&self) -> u64 {
        BloomFilter::capacity(self)
    }

    fn num_hashes(&self) -> u64 {
        BloomFilter::num_hashes(self)
    }

    fn num_inserts(&self) -> u64 {
        BloomFilter::num_inserts(self)
    }
}

impl MembershipFilter for Bloom2048 {
    fn insert(&mut self, key: &[u8]) {
        Bloom2048::insert(self, key);
    }

    fn contains(&self, key: &[u8]) -> bool {
        Bloom2048::contains(self, key)
    }

    fn serialize(&self) -> Vec<u8> {
        Bloom2048::serialize(self)
    }

    fn capacity(&self) -> u64 {
        Bloom2048::capacity(self)
    }

    fn num_hashes(&self) -> u64 {
        Bloom2048::num_hashes(self)
    }

    fn num_inserts(&self) -> u64 {
        Bloom2048::num_inserts(self)
    }
}

/// Creates an empty filter, choosing the variant by capacity.
///
/// A capacity of exactly 2048 bits selects the legacy [`Bloom2048`], whose
/// hash-round count is capped at 16; any other capacity selects the
/// general [`BloomFilter`]. When a general 2048-bit filter is wanted
/// instead, construct it through [`BloomFilter::new`] directly.
///
/// # Errors
///
/// Returns `InvalidParameter` when the chosen variant rejects the
/// parameters.
pub fn new_filter(num_bits: u64, num_hashes: u64) -> Result<Box<dyn MembershipFilter>, Error> {
    match num_bits {
        fixed::CAPACITY_BITS => Ok(Box::new(Bloom2048::new(num_hashes)?)),
        _ => Ok(Box::new(BloomFilter::new(num_bits, num_hashes)?)),
    }
}

/// Loads a filter from its wire form, choosing the variant by capacity.
///
/// The legacy path expects the raw 256-byte array and takes `num_hashes`
/// from the caller. The general path validates the passed parameters, then
/// decodes the self-describing layout; the decoded header wins over the
/// arguments.
///
/// # Errors
///
/// Whatever the chosen variant's constructor and load path return:
/// `InvalidParameter`, `SizeMismatch` on the legacy path, `HashMismatch`
/// or `TruncatedData` on the general one.
pub fn filter_from_bytes(
    bytes: &[u8],
    num_bits: u64,
    num_hashes: u64,
) -> Result<Box<dyn MembershipFilter>, Error> {
    match num_bits {
        fixed::CAPACITY_BITS => Ok(Box::new(Bloom2048::from_bytes(bytes, num_hashes)?)),
        _ => {
            let mut filter = BloomFilter::new(num_bits, num_hashes)?;
            filter.set_bytes(bytes)?;
            Ok(Box::new(filter))
        }
    }
}
