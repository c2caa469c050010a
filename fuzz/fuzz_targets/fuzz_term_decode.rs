// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use std::sync::{Arc, OnceLock};

use libfuzzer_sys::fuzz_target;
use proofwire::{
    decode_from_slice, encode_to_vec, skip_in_slice, CodecConfig, GlobalVariable,
    InMemoryResolver, Term, TermCodec,
};
use uuid::Uuid;

fn codecs() -> &'static [TermCodec; 2] {
    static CODECS: OnceLock<[TermCodec; 2]> = OnceLock::new();
    CODECS.get_or_init(|| {
        // A handful of resolvable ids so inputs can reach past global lookups.
        let resolver: Arc<InMemoryResolver> = Arc::new(
            (0..4u128)
                .map(|i| GlobalVariable::new(Uuid::from_u128(i), Term::Tau))
                .collect(),
        );
        [0, 1].map(|version| {
            TermCodec::builder()
                .config(CodecConfig::default())
                .version(version)
                .resolver(resolver.clone())
                .build()
                .unwrap()
        })
    })
}

fuzz_target!(|data: &[u8]| {
    for codec in codecs() {
        let decoded = decode_from_slice::<Term, _>(codec, data);
        let skipped = skip_in_slice::<Term, _>(codec, data);

        if let (Ok((term, consumed)), Ok(skipped)) = (&decoded, &skipped) {
            assert_eq!(consumed, skipped, "skip and decode disagree");
            // Varints need not be minimal on input, so compare terms, not bytes.
            let bytes = encode_to_vec(codec, term).unwrap();
            let (again, _) = decode_from_slice::<Term, _>(codec, &bytes).unwrap();
            assert_eq!(&again, term, "re-encode changed the term");
        }
    }
});
