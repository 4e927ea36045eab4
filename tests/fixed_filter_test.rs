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

//! Behavior of the fixed 2048-bit legacy filter and its raw-bytes load
//! path.

use bitsieve::bloom::Bloom2048;
use bitsieve::bloom::BloomFilter;
use bitsieve::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn random_key(rng: &mut StdRng) -> [u8; 32] {
    let mut key = [0u8; 32];
    rng.fill_bytes(&mut key);
    key
}

#[test]
fn test_inserted_keys_always_found() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut filter = Bloom2048::new(3).unwrap();

    let keys: Vec<[u8; 32]> = (0..50).map(|_| random_key(&mut rng)).collect();
    for key in &keys {
        filter.insert(key);
    }
    for key in &keys {
        assert!(filter.contains(key));
    }
    assert!(!filter.contains(b""));

    // With 50 keys and three bits each, almost no fresh key can collide on
    // every probed bit.
    let mut false_positives = 0;
    for _ in 0..100 {
        if filter.contains(&random_key(&mut rng)) {
            false_positives += 1;
        }
    }
    assert!(
        false_positives <= 5,
        "{false_positives} of 100 absent keys reported present"
    );
}

#[test]
fn test_invalid_num_hashes_rejected() {
    for k in [0u64, 17, 100] {
        let err = Bloom2048::new(k).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
    for k in [1u64, 16] {
        assert!(Bloom2048::new(k).is_ok());
    }
}

#[test]
fn test_wire_form_is_raw_array() {
    let mut filter = Bloom2048::new(4).unwrap();
    assert_eq!(filter.serialize(), vec![0u8; 256]);

    filter.insert(b"alpha");
    let bytes = filter.serialize();
    assert_eq!(bytes.len(), 256);
    assert!(bytes.iter().any(|&b| b != 0));

    // Capacity and hash count travel out-of-band.
    let restored = Bloom2048::from_bytes(&bytes, 4).unwrap();
    assert!(restored.contains(b"alpha"));
    assert_eq!(restored.capacity(), 2048);
    assert_eq!(restored.num_hashes(), 4);
}

#[test]
fn test_from_bytes_validates_length_and_params() {
    let err = Bloom2048::from_bytes(&[0u8; 255], 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    assert_that!(err.message(), contains_substring("256"));

    let err = Bloom2048::from_bytes(&[0u8; 257], 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SizeMismatch);

    let err = Bloom2048::from_bytes(&[0u8; 256], 17).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_failed_set_bytes_preserves_state() {
    let mut filter = Bloom2048::new(3).unwrap();
    filter.insert(b"keep-me");
    let before = filter.serialize();

    let err = filter.set_bytes(&[0u8; 100]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    assert_eq!(filter.serialize(), before);
    assert!(filter.contains(b"keep-me"));
}

#[test]
fn test_insert_counter_not_tracked() {
    let mut filter = Bloom2048::new(3).unwrap();
    for i in 0u64..10 {
        filter.insert(&i.to_be_bytes());
    }
    // The raw wire form has nowhere to carry a counter, so none is kept.
    assert_eq!(filter.num_inserts(), 0);
}

#[test]
fn test_addressing_differs_from_general_variant() {
    let mut legacy = Bloom2048::new(3).unwrap();
    let mut general = BloomFilter::new(2048, 3).unwrap();
    legacy.insert(b"alpha");
    general.insert(b"alpha");

    // Same capacity and hash count, but the byte-pair scheme and the
    // modulo-reduced scheme set different bits for the same key.
    let legacy_bits = legacy.serialize();
    let general_bytes = general.serialize();
    assert_ne!(&legacy_bits[..], &general_bytes[24..24 + 256]);
}
