// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::error::Error as _;
use std::sync::Arc;

use uuid::Uuid;

use super::*;
use crate::codec::{decode_from_slice, encode_to_vec, skip_in_slice};
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::{DecodeError, EncodeError, ProtocolError};
use crate::term::{Function, GlobalVariable, InMemoryResolver, Parameter, TermError};

fn codec_with(version: u32, resolver: &Arc<InMemoryResolver>) -> TermCodec {
    TermCodec::new(version, Arc::clone(resolver) as Arc<dyn VariableResolver>)
        .expect("term codec")
}

fn codec(version: u32) -> TermCodec {
    codec_with(version, &Arc::new(InMemoryResolver::new()))
}

/// `Function(x, Function(y, x))` when `outer`, else `Function(x, Function(y, y))`.
fn nested(outer: bool) -> Term {
    let x = Parameter::new(Term::Tau);
    let y = Parameter::new(Term::Tau);
    let body = if outer {
        Term::parameter(&x)
    } else {
        Term::parameter(&y)
    };
    Term::function(x, Term::function(y, body))
}

fn roundtrip(codec: &TermCodec, term: &Term) -> Vec<u8> {
    let bytes = encode_to_vec(codec, term).expect("encode");
    let (decoded, used) = decode_from_slice(codec, &bytes).expect("decode");
    assert_eq!(&decoded, term);
    assert_eq!(used, bytes.len());
    assert_eq!(
        skip_in_slice::<Term, _>(codec, &bytes).expect("skip"),
        bytes.len()
    );
    bytes
}

// ============================================================================
// Ordinals
// ============================================================================

#[test]
fn test_outer_reference_gets_ordinal_one() {
    let bytes = roundtrip(&codec(1), &nested(true));
    // F Tau F Tau P 1
    assert_eq!(bytes, vec![0x04, 0x00, 0x04, 0x00, 0x01, 0x01]);
}

#[test]
fn test_inner_reference_gets_ordinal_zero() {
    let bytes = roundtrip(&codec(1), &nested(false));
    assert_eq!(bytes, vec![0x04, 0x00, 0x04, 0x00, 0x01, 0x00]);
}

#[test]
fn test_alpha_equivalent_terms_encode_identically() {
    let codec = codec(0);
    let a = encode_to_vec(&codec, &nested(true)).expect("encode");
    let b = encode_to_vec(&codec, &nested(true)).expect("encode");
    assert_eq!(a, b);
    assert_ne!(a, encode_to_vec(&codec, &nested(false)).expect("encode"));
}

#[test]
fn test_parameter_type_is_outside_its_own_scope() {
    // <x:Tau -> <y:x -> y>>: y's type refers to x at ordinal 0, because y is
    // not yet in scope while its type is written.
    let x = Parameter::new(Term::Tau);
    let y = Parameter::new(Term::parameter(&x));
    let term = Term::function(x, Term::function(Arc::clone(&y), Term::parameter(&y)));

    let bytes = roundtrip(&codec(1), &term);
    assert_eq!(bytes, vec![0x04, 0x00, 0x04, 0x01, 0x00, 0x01, 0x00]);
}

#[test]
fn test_decoded_parameters_are_fresh_and_shared() {
    let codec = codec(1);
    let bytes = encode_to_vec(&codec, &nested(true)).expect("encode");
    let (decoded, _) = decode_from_slice::<Term, _>(&codec, &bytes).expect("decode");

    let Term::Function(outer) = decoded else {
        panic!("expected a function");
    };
    let Term::Function(inner) = outer.body() else {
        panic!("expected a nested function");
    };
    let Term::Parameter(reference) = inner.body() else {
        panic!("expected a parameter reference");
    };
    assert!(Arc::ptr_eq(reference, outer.parameter()));
}

// ============================================================================
// Variants
// ============================================================================

#[test]
fn test_every_variant_roundtrips_in_both_versions() {
    let resolver = Arc::new(InMemoryResolver::new());
    let g = GlobalVariable::new(Uuid::new_v4(), Term::Tau);
    let h = GlobalVariable::new(Uuid::new_v4(), Term::Tau);
    resolver.insert(Arc::clone(&g));
    resolver.insert(Arc::clone(&h));

    let model = StructuralModel;
    let x = Parameter::new(Term::global(&g));
    let function = Function::new(Arc::clone(&x), Term::parameter(&x));
    let terms = vec![
        Term::Tau,
        Term::global(&g),
        model
            .composition(Term::global(&g), Term::Tau)
            .expect("composition"),
        Term::Function(Arc::clone(&function)),
        model.projection(function).expect("projection"),
        model.projected_cast(Term::Tau).expect("cast"),
        model.unprojected_cast(Term::global(&h)).expect("cast"),
        model
            .folding_cast(Term::global(&g), Term::Tau, Arc::clone(&h), nested(true))
            .expect("folding cast"),
    ];

    for version in [0, 1] {
        let codec = codec_with(version, &resolver);
        for term in &terms {
            roundtrip(&codec, term);
        }
    }
}

#[test]
fn test_global_payload_is_raw_uuid() {
    let resolver = Arc::new(InMemoryResolver::new());
    let g = GlobalVariable::new(Uuid::from_u128(0x0102), Term::Tau);
    resolver.insert(Arc::clone(&g));

    let bytes = roundtrip(&codec_with(0, &resolver), &Term::global(&g));
    assert_eq!(bytes[0], b'I');
    assert_eq!(&bytes[1..], Uuid::from_u128(0x0102).as_bytes());
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_unknown_code_rejected() {
    let codec = codec(1);
    let err = decode_from_slice::<Term, _>(&codec, &[0x7F]).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Decode(DecodeError::UnknownCode { code: 0x7F, version: 1, .. })
    ));

    // v0 mnemonics are not valid v1 codes.
    assert!(decode_from_slice::<Term, _>(&codec, &[b'T']).is_err());
    assert!(skip_in_slice::<Term, _>(&codec, &[b'T']).is_err());
}

#[test]
fn test_unresolved_identifier_rejected() {
    let resolver = Arc::new(InMemoryResolver::new());
    let g = GlobalVariable::new(Uuid::new_v4(), Term::Tau);
    resolver.insert(Arc::clone(&g));
    let codec = codec_with(1, &resolver);
    let bytes = encode_to_vec(&codec, &Term::global(&g)).expect("encode");

    resolver.remove(&g.id());
    let err = decode_from_slice::<Term, _>(&codec, &bytes).unwrap_err();
    match err {
        ProtocolError::Decode(DecodeError::UnresolvedVariable(id)) => assert_eq!(id, g.id()),
        other => panic!("unexpected error {:?}", other),
    }

    // Skip never consults the resolver.
    assert_eq!(
        skip_in_slice::<Term, _>(&codec, &bytes).expect("skip"),
        bytes.len()
    );
}

#[test]
fn test_ordinal_out_of_range_rejected_by_decode_and_skip() {
    let codec = codec(1);
    // Bare parameter reference with no enclosing function.
    let bytes = [0x01, 0x00];
    assert!(matches!(
        decode_from_slice::<Term, _>(&codec, &bytes),
        Err(ProtocolError::Decode(DecodeError::ParameterOutOfRange { ordinal: 0, depth: 0 }))
    ));
    assert!(matches!(
        skip_in_slice::<Term, _>(&codec, &bytes),
        Err(ProtocolError::Decode(DecodeError::ParameterOutOfRange { .. }))
    ));

    // Ordinal 1 inside a single binder.
    let bytes = [0x04, 0x00, 0x01, 0x01];
    assert!(decode_from_slice::<Term, _>(&codec, &bytes).is_err());
    assert!(skip_in_slice::<Term, _>(&codec, &bytes).is_err());
}

#[test]
fn test_composite_head_rejected_on_decode() {
    let codec = codec(1);
    // C (C Tau Tau) Tau
    let bytes = [0x03, 0x03, 0x00, 0x00, 0x00];
    let err = decode_from_slice::<Term, _>(&codec, &bytes).unwrap_err();
    match &err {
        ProtocolError::Decode(DecodeError::Rejected { shape, source }) => {
            assert_eq!(*shape, "Composition");
            assert_eq!(source, &TermError::CompositeHead);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.source().is_some());

    // Skip checks framing only.
    assert_eq!(skip_in_slice::<Term, _>(&codec, &bytes).expect("skip"), 5);
}

/// Accepts everything except projections.
struct NoProjections;

impl TermModel for NoProjections {
    fn composition(&self, head: Term, tail: Term) -> Result<Term, TermError> {
        StructuralModel.composition(head, tail)
    }

    fn projection(&self, _function: Arc<Function>) -> Result<Term, TermError> {
        Err(TermError::Projection("not in this calculus".into()))
    }

    fn projected_cast(&self, term: Term) -> Result<Term, TermError> {
        StructuralModel.projected_cast(term)
    }

    fn unprojected_cast(&self, term: Term) -> Result<Term, TermError> {
        StructuralModel.unprojected_cast(term)
    }

    fn folding_cast(
        &self,
        term: Term,
        ty: Term,
        variable: Arc<GlobalVariable>,
        value: Term,
    ) -> Result<Term, TermError> {
        StructuralModel.folding_cast(term, ty, variable, value)
    }
}

#[test]
fn test_model_rejection_surfaces_as_decode_error() {
    let resolver: Arc<dyn VariableResolver> = Arc::new(InMemoryResolver::new());
    let lenient = TermCodec::new(1, Arc::clone(&resolver)).expect("codec");
    let strict = TermCodec::builder()
        .version(1)
        .resolver(resolver)
        .model(Arc::new(NoProjections))
        .build()
        .expect("codec");

    let x = Parameter::new(Term::Tau);
    let projection = StructuralModel
        .projection(Function::new(Arc::clone(&x), Term::parameter(&x)))
        .expect("projection");
    let bytes = encode_to_vec(&lenient, &projection).expect("encode");

    match decode_from_slice::<Term, _>(&strict, &bytes).unwrap_err() {
        ProtocolError::Decode(DecodeError::Rejected { shape, source }) => {
            assert_eq!(shape, "Projection");
            assert!(matches!(source, TermError::Projection(_)));
        }
        other => panic!("unexpected error {:?}", other),
    }

    // Functions are untouched by the stricter model.
    roundtrip(&strict, &Term::function(Arc::clone(&x), Term::parameter(&x)));
}

#[test]
fn test_truncated_input() {
    let codec = codec(1);
    let bytes = encode_to_vec(&codec, &nested(true)).expect("encode");
    for cut in 0..bytes.len() {
        let err = decode_from_slice::<Term, _>(&codec, &bytes[..cut]).unwrap_err();
        assert!(
            matches!(err, ProtocolError::Decode(DecodeError::Truncated { .. })),
            "cut at {}: {:?}",
            cut,
            err
        );
        assert!(skip_in_slice::<Term, _>(&codec, &bytes[..cut]).is_err());
    }
}

#[test]
fn test_depth_limit() {
    let config = CodecConfig::builder().version(1).max_depth(3).build();
    let codec = TermCodec::builder()
        .config(config)
        .resolver(Arc::new(InMemoryResolver::new()))
        .build()
        .expect("codec");

    // R(R(Tau)) is three levels deep, R(R(R(Tau))) is four.
    assert!(decode_from_slice::<Term, _>(&codec, &[0x06, 0x06, 0x00]).is_ok());
    let too_deep = [0x06, 0x06, 0x06, 0x00];
    assert!(matches!(
        decode_from_slice::<Term, _>(&codec, &too_deep),
        Err(ProtocolError::Decode(DecodeError::DepthLimit { limit: 3 }))
    ));
    assert!(matches!(
        skip_in_slice::<Term, _>(&codec, &too_deep),
        Err(ProtocolError::Decode(DecodeError::DepthLimit { limit: 3 }))
    ));
}

#[test]
fn test_encode_honours_depth_limit() {
    let config = CodecConfig::builder().version(1).max_depth(3).build();
    let codec = TermCodec::builder()
        .config(config)
        .resolver(Arc::new(InMemoryResolver::new()))
        .build()
        .expect("codec");

    let fits = cast_chain(2);
    assert_eq!(roundtrip(&codec, &fits), vec![0x06, 0x06, 0x00]);

    let mut buf = Vec::new();
    let err = codec
        .encode(&mut Sink::new(&mut buf), &cast_chain(3))
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Encode(EncodeError::DepthLimit { limit: 3 })
    ));
}

/// `casts` projected casts around Tau.
fn cast_chain(casts: usize) -> Term {
    (0..casts).fold(Term::Tau, |inner, _| {
        StructuralModel.projected_cast(inner).expect("cast")
    })
}

/// `binders` nested functions over Tau, each parameter typed Tau.
fn binder_chain(binders: usize) -> Term {
    (0..binders).fold(Term::Tau, |body, _| {
        Term::function(Parameter::new(Term::Tau), body)
    })
}

#[test]
fn test_default_depth_limit_fits_the_stack() {
    let codec = codec(1);
    assert_eq!(codec.config().max_depth, DEFAULT_MAX_DEPTH);
    let deepest = DEFAULT_MAX_DEPTH as usize - 1;

    for term in [cast_chain(deepest), binder_chain(deepest)] {
        roundtrip(&codec, &term);
    }

    let mut too_deep = vec![0x06; DEFAULT_MAX_DEPTH as usize];
    too_deep.push(0x00);
    assert!(matches!(
        decode_from_slice::<Term, _>(&codec, &too_deep),
        Err(ProtocolError::Decode(DecodeError::DepthLimit { .. }))
    ));
    assert!(matches!(
        skip_in_slice::<Term, _>(&codec, &too_deep),
        Err(ProtocolError::Decode(DecodeError::DepthLimit { .. }))
    ));

    let mut buf = Vec::new();
    assert!(matches!(
        codec.encode(&mut Sink::new(&mut buf), &binder_chain(DEFAULT_MAX_DEPTH as usize)),
        Err(ProtocolError::Encode(EncodeError::DepthLimit { .. }))
    ));
}

#[test]
fn test_decode_stops_at_value_boundary() {
    let codec = codec(1);
    let mut bytes = encode_to_vec(&codec, &nested(false)).expect("encode");
    let len = bytes.len();
    bytes.extend_from_slice(&[0xAA, 0xBB]);

    let (_, used) = decode_from_slice::<Term, _>(&codec, &bytes).expect("decode");
    assert_eq!(used, len);
    assert_eq!(skip_in_slice::<Term, _>(&codec, &bytes).expect("skip"), len);
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "unbound parameter"))]
fn test_unbound_parameter_not_encodable() {
    let free = Parameter::new(Term::Tau);
    let err = encode_to_vec(&codec(1), &Term::parameter(&free)).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Encode(EncodeError::UnboundParameter)
    ));
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_version_gate() {
    let resolver: Arc<dyn VariableResolver> = Arc::new(InMemoryResolver::new());
    assert!(matches!(
        TermCodec::new(2, resolver),
        Err(ConfigError::VersionNotAvailable {
            codec: "TermCodec",
            requested: 2,
            ..
        })
    ));
}

#[test]
fn test_resolver_is_mandatory() {
    assert!(matches!(
        TermCodec::builder().version(0).build(),
        Err(ConfigError::MissingResolver { codec: "TermCodec" })
    ));
}

#[test]
fn test_builder_version_overrides_config() {
    let config = CodecConfig::builder().version(0).build();
    let codec = TermCodec::builder()
        .config(config)
        .version(1)
        .resolver(Arc::new(InMemoryResolver::new()))
        .build()
        .expect("codec");
    assert_eq!(codec.version(), 1);
    assert_eq!(codec.config().max_depth, config.max_depth);
}
