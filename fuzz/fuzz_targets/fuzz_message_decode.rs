// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use std::sync::{Arc, OnceLock};

use libfuzzer_sys::fuzz_target;
use proofwire::{decode_from_slice, skip_in_slice, CodecConfig, InMemoryResolver, Message, MessageCodec};

fn codecs() -> &'static [MessageCodec; 2] {
    static CODECS: OnceLock<[MessageCodec; 2]> = OnceLock::new();
    CODECS.get_or_init(|| {
        let resolver = Arc::new(InMemoryResolver::new());
        [0, 1].map(|version| {
            let config = CodecConfig::builder()
                .version(version)
                .max_payload_len(4096)
                .build();
            MessageCodec::new(config, resolver.clone()).unwrap()
        })
    })
}

fuzz_target!(|data: &[u8]| {
    for codec in codecs() {
        let decoded = decode_from_slice::<Message, _>(codec, data);
        let skipped = skip_in_slice::<Message, _>(codec, data);

        if let (Ok((_, consumed)), Ok(skipped)) = (&decoded, &skipped) {
            assert_eq!(consumed, skipped, "skip and decode disagree");
        }
    }
});
