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

//! Word-packed bit storage for the general filter.

/// Fixed-capacity bit array packed into 64-bit words.
///
/// Positions are reduced modulo the bit capacity before addressing, so any
/// u64 is a valid position; out-of-range values wrap instead of erroring.
/// Existing serialized filters depend on this reduction (including its slight
/// bias toward low indices when the capacity is not a power of two), so it
/// must not be replaced with rejection sampling. Bits are only ever set,
/// never cleared.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BitArray {
    words: Vec<u64>,
    num_bits: u64,
}

impl BitArray {
    /// Creates an all-zero array of `num_bits` capacity. `num_bits` must be
    /// positive; constructors validate it before reaching here.
    pub fn new(num_bits: u64) -> Self {
        debug_assert!(num_bits > 0);
        BitArray {
            words: vec![0; num_bits.div_ceil(64) as usize],
            num_bits,
        }
    }

    /// Rebuilds an array from deserialized words.
    pub fn from_words(words: Vec<u64>, num_bits: u64) -> Self {
        debug_assert!(num_bits > 0);
        debug_assert_eq!(words.len() as u64, num_bits.div_ceil(64));
        BitArray { words, num_bits }
    }

    /// Sets the bit at `pos % num_bits`.
    pub fn set(&mut self, pos: u64) {
        let pos = pos % self.num_bits;
        self.words[(pos >> 6) as usize] |= 1 << (pos & 0x3f);
    }

    /// Tests the bit at `pos % num_bits`.
    pub fn test(&self, pos: u64) -> bool {
        let pos = pos % self.num_bits;
        self.words[(pos >> 6) as usize] & (1 << (pos & 0x3f)) != 0
    }

    /// Bit capacity.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Backing words, low bit indices first within each word.
    pub fn words(&self) -> &[u64] {
        &self.words
    }
}
