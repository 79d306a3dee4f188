#![no_main]

//! Fuzz target for webhook payload normalization.
//!
//! Arbitrary bytes must either normalize or fail with a malformed payload
//! error. Panics are bugs.

use hookfeed_core::{normalize, EventKind, HookfeedError, Normalized};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for kind in [EventKind::Push, EventKind::PullRequest] {
        match normalize(&kind, data) {
            Ok(Normalized::Records(events)) => {
                assert!(!events.is_empty() && events.len() <= 2);
                for event in &events {
                    let _ = event.describe();
                }
            },
            Ok(Normalized::Unrecognized(_)) => unreachable!("{kind} is recognized"),
            Err(e) => assert!(matches!(e, HookfeedError::MalformedPayload { .. })),
        }
    }

    let kind = EventKind::parse("fuzz");
    assert!(matches!(normalize(&kind, data), Ok(Normalized::Unrecognized(_))));
});
