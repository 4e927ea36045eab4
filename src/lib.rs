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

//! Probabilistic set-membership filters over opaque byte-string keys.
//!
//! A membership filter answers "possibly present" or "definitely absent"
//! without storing the keys themselves: inserted keys are always found
//! again, while absent keys are occasionally reported present at a
//! bounded false-positive rate. The structure stays a fixed handful of
//! bytes no matter how much is inserted.
//!
//! Two variants live in [`bloom`]:
//!
//! - [`bloom::BloomFilter`], the general filter parametrized by bit
//!   capacity and hash-round count, serializable to a self-describing
//!   layout guarded by a Keccak-256 checksum.
//! - [`bloom::Bloom2048`], a fixed 2048-bit filter whose raw wire form
//!   predates that layout and is kept readable.
//!
//! # Usage
//!
//! ```rust
//! use bitsieve::bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(10_000, 5).unwrap();
//! filter.insert(b"alpha");
//! assert!(filter.contains(b"alpha"));
//!
//! let bytes = filter.serialize();
//! let restored = BloomFilter::deserialize(&bytes).unwrap();
//! assert!(restored.contains(b"alpha"));
//! ```
//!
//! # Concurrency
//!
//! Filters are plain single-threaded values: mutation takes `&mut self`
//! and nothing locks internally. Sharing a filter across threads
//! requires external synchronization, such as a `Mutex` or single-owner
//! confinement.

pub mod bloom;
pub mod error;

mod codec;
mod hash;
