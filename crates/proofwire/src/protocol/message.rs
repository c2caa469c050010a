// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message envelopes exchanged between peers.
//!
//! ```text
//! Code    Message        Payload                       Versions
//! 0x0001  Hello          agent: string                 0, 1
//! 0x0002  TermAnnounce   namespace, term               0, 1
//! 0x0003  Ping           nonce: u64 LE                 1
//! 0x00FF  Bye            -                             0, 1
//! ```
//!
//! Codes are 2 bytes little-endian. At message version `v` the announced
//! term uses term codec version `v`; namespaces always use version 0.

use std::sync::Arc;

use super::namespace::{Namespace, NamespaceCodec};
use super::term::TermCodec;
use crate::codec::primitive::{read_string, skip_prefixed, write_str, StringCodec};
use crate::codec::{Codec, Sink, Source, Versioned};
use crate::config::CodecConfig;
use crate::error::{ConfigError, EncodeError, ProtocolResult};
use crate::registry::{CodeWidth, SubCodec, TagEntry, Tagged, UnionCodec, WireTag};
use crate::term::{StructuralModel, Term, TermModel, VariableResolver};

/// Namespace codec version used inside every message version.
pub const NAMESPACE_VERSION: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Hello { agent: String },
    TermAnnounce { namespace: Namespace, term: Term },
    Ping { nonce: u64 },
    Bye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTag {
    Hello,
    TermAnnounce,
    Ping,
    Bye,
}

impl Versioned for MessageTag {
    const NAME: &'static str = "MessageTag";
    const AVAILABLE_VERSIONS: &'static [u32] = &[0, 1];
}

impl WireTag for MessageTag {
    const WIDTH: CodeWidth = CodeWidth::Short;

    fn variants() -> &'static [TagEntry<Self>] {
        const VARIANTS: &[TagEntry<MessageTag>] = &[
            TagEntry {
                tag: MessageTag::Hello,
                shape: "Hello",
                code: |_| Some(0x0001),
            },
            TagEntry {
                tag: MessageTag::TermAnnounce,
                shape: "TermAnnounce",
                code: |_| Some(0x0002),
            },
            TagEntry {
                tag: MessageTag::Ping,
                shape: "Ping",
                code: |v| (v >= 1).then_some(0x0003),
            },
            TagEntry {
                tag: MessageTag::Bye,
                shape: "Bye",
                code: |_| Some(0x00FF),
            },
        ];
        VARIANTS
    }

    fn sub_version(self, version: u32) -> u32 {
        match self {
            MessageTag::TermAnnounce => version,
            MessageTag::Hello | MessageTag::Ping | MessageTag::Bye => 0,
        }
    }
}

impl Tagged<MessageTag> for Message {
    fn tag(&self) -> MessageTag {
        match self {
            Message::Hello { .. } => MessageTag::Hello,
            Message::TermAnnounce { .. } => MessageTag::TermAnnounce,
            Message::Ping { .. } => MessageTag::Ping,
            Message::Bye => MessageTag::Bye,
        }
    }
}

// ============================================================================
// Payload codecs
// ============================================================================

struct HelloCodec {
    limit: u32,
}

impl Codec<Message> for HelloCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &Message) -> ProtocolResult<()> {
        match value {
            Message::Hello { agent } => write_str(sink, agent, self.limit),
            _ => Err(EncodeError::ShapeMismatch { expected: "Hello" }.into()),
        }
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<Message> {
        let agent = read_string(source, self.limit)?;
        Ok(Message::Hello { agent })
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        skip_prefixed(source, self.limit)
    }
}

struct AnnounceCodec {
    namespace: NamespaceCodec,
    term: TermCodec,
}

impl Codec<Message> for AnnounceCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &Message) -> ProtocolResult<()> {
        match value {
            Message::TermAnnounce { namespace, term } => {
                self.namespace.encode(sink, namespace)?;
                self.term.encode(sink, term)
            }
            _ => Err(EncodeError::ShapeMismatch {
                expected: "TermAnnounce",
            }
            .into()),
        }
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<Message> {
        let namespace = self.namespace.decode(source)?;
        let term = self.term.decode(source)?;
        Ok(Message::TermAnnounce { namespace, term })
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        self.namespace.skip(source)?;
        self.term.skip(source)
    }
}

struct PingCodec;

impl Codec<Message> for PingCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &Message) -> ProtocolResult<()> {
        match value {
            Message::Ping { nonce } => sink.write_u64_le(*nonce),
            _ => Err(EncodeError::ShapeMismatch { expected: "Ping" }.into()),
        }
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<Message> {
        Ok(Message::Ping {
            nonce: source.read_u64_le()?,
        })
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        source.skip_bytes(8)
    }
}

struct ByeCodec;

impl Codec<Message> for ByeCodec {
    fn encode(&self, _sink: &mut Sink<'_>, _value: &Message) -> ProtocolResult<()> {
        Ok(())
    }

    fn decode(&self, _source: &mut Source<'_>) -> ProtocolResult<Message> {
        Ok(Message::Bye)
    }

    fn skip(&self, _source: &mut Source<'_>) -> ProtocolResult<()> {
        Ok(())
    }
}

// ============================================================================
// Envelope codec
// ============================================================================

/// Codec for [`Message`] envelopes.
pub struct MessageCodec {
    inner: UnionCodec<MessageTag, Message>,
}

impl Versioned for MessageCodec {
    const NAME: &'static str = "MessageCodec";
    const AVAILABLE_VERSIONS: &'static [u32] = &[0, 1];
}

impl MessageCodec {
    /// Codec at `config.version` with the structural term model.
    pub fn new(
        config: CodecConfig,
        resolver: Arc<dyn VariableResolver>,
    ) -> Result<Self, ConfigError> {
        Self::with_model(config, resolver, Arc::new(StructuralModel))
    }

    /// Codec at `config.version`. Sub-codec versions are checked here even
    /// though the sub-codecs are built on first use.
    pub fn with_model(
        config: CodecConfig,
        resolver: Arc<dyn VariableResolver>,
        model: Arc<dyn TermModel>,
    ) -> Result<Self, ConfigError> {
        let version = config.version;
        Self::check_version(version)?;
        TermCodec::check_version(MessageTag::TermAnnounce.sub_version(version))?;
        NamespaceCodec::check_version(NAMESPACE_VERSION)?;
        StringCodec::check_version(MessageTag::Hello.sub_version(version))?;

        let inner = UnionCodec::<MessageTag, Message>::new(version, move |tag, sub_version| {
            let codec: SubCodec<Message> = match tag {
                MessageTag::Hello => Arc::new(HelloCodec {
                    limit: config.max_payload_len,
                }),
                MessageTag::TermAnnounce => Arc::new(AnnounceCodec {
                    namespace: NamespaceCodec::with_limits(
                        NAMESPACE_VERSION,
                        config.max_depth,
                        config.max_payload_len,
                    )?,
                    term: TermCodec::builder()
                        .config(config.with_version(sub_version))
                        .resolver(Arc::clone(&resolver))
                        .model(Arc::clone(&model))
                        .build()?,
                }),
                MessageTag::Ping => Arc::new(PingCodec),
                MessageTag::Bye => Arc::new(ByeCodec),
            };
            Ok(codec)
        })?;

        log::debug!("[MESSAGE] v{} ready", version);
        Ok(Self { inner })
    }

    pub fn version(&self) -> u32 {
        self.inner.version()
    }

    /// Whether `tag` can be sent at this codec's version.
    pub fn supports(&self, tag: MessageTag) -> bool {
        self.inner.table().code_for(tag).is_ok()
    }
}

impl Codec<Message> for MessageCodec {
    fn encode(&self, sink: &mut Sink<'_>, value: &Message) -> ProtocolResult<()> {
        self.inner.encode(sink, value).inspect_err(|e| {
            log::debug!("[MESSAGE] encode {:?} failed: {}", value.tag(), e);
        })
    }

    fn decode(&self, source: &mut Source<'_>) -> ProtocolResult<Message> {
        self.inner.decode(source)
    }

    fn skip(&self, source: &mut Source<'_>) -> ProtocolResult<()> {
        self.inner.skip(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_from_slice, encode_to_vec};
    use crate::error::{DecodeError, ProtocolError};
    use crate::term::InMemoryResolver;

    fn codec(version: u32) -> MessageCodec {
        MessageCodec::new(
            CodecConfig::default().with_version(version),
            Arc::new(InMemoryResolver::new()),
        )
        .expect("message codec")
    }

    #[test]
    fn test_bye_is_just_a_code() {
        let bytes = encode_to_vec(&codec(0), &Message::Bye).expect("encode");
        assert_eq!(bytes, vec![0xFF, 0x00]);
    }

    #[test]
    fn test_hello_payload() {
        let hello = Message::Hello {
            agent: "pw".into(),
        };
        let bytes = encode_to_vec(&codec(1), &hello).expect("encode");
        assert_eq!(bytes, vec![0x01, 0x00, 0x02, b'p', b'w']);
        let (decoded, _) = decode_from_slice::<Message, _>(&codec(1), &bytes).expect("decode");
        assert_eq!(decoded, hello);
    }

    #[test]
    fn test_ping_needs_version_one() {
        let ping = Message::Ping { nonce: 7 };
        assert!(codec(1).supports(MessageTag::Ping));
        assert!(!codec(0).supports(MessageTag::Ping));

        assert!(matches!(
            encode_to_vec(&codec(0), &ping),
            Err(ProtocolError::Config(ConfigError::TagNotAvailable { version: 0, .. }))
        ));
        assert!(matches!(
            decode_from_slice::<Message, _>(&codec(0), &[0x03, 0x00]),
            Err(ProtocolError::Decode(DecodeError::UnknownCode { code: 3, .. }))
        ));
    }

    #[test]
    fn test_sub_codec_shape_mismatch() {
        let err = HelloCodec { limit: 16 }
            .encode(&mut Sink::new(&mut Vec::new()), &Message::Bye)
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Encode(EncodeError::ShapeMismatch { expected: "Hello" })
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let result = MessageCodec::new(
            CodecConfig::default().with_version(5),
            Arc::new(InMemoryResolver::new()),
        );
        assert!(matches!(
            result,
            Err(ConfigError::VersionNotAvailable {
                codec: "MessageCodec",
                ..
            })
        ));
    }
}
