// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for framing and request encoding.

use bq_core::test_support::strategies::arb_test_entries;
use bq_core::{ConfiguredTestEntry, PayloadSignature, TestEntryConfiguration};
use bq_queue::SplitStrategy;
use proptest::prelude::*;

use super::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

proptest! {
    #[test]
    fn frames_survive_concatenation(bodies in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..256), 1..8)) {
        let read_back = runtime().block_on(async {
            let mut buffer = Vec::new();
            for body in &bodies {
                write_message(&mut buffer, body).await.unwrap();
            }
            let mut cursor = std::io::Cursor::new(buffer);
            let mut read_back = Vec::new();
            for _ in &bodies {
                read_back.push(read_message(&mut cursor).await.unwrap());
            }
            read_back
        });
        prop_assert_eq!(read_back, bodies);
    }

    #[test]
    fn schedule_requests_decode_to_themselves(entries in arb_test_entries(12)) {
        let configuration = TestEntryConfiguration::builder().build();
        let request = Request::ScheduleTests {
            signature: PayloadSignature::new("sig"),
            configured_test_entries: entries
                .into_iter()
                .map(|e| ConfiguredTestEntry::new(e, configuration.clone()))
                .collect(),
            split_strategy: SplitStrategy::Progressive,
            split_info: None,
        };
        let decoded: Request = decode(&encode(&request).unwrap()).unwrap();
        prop_assert_eq!(decoded, request);
    }
}
