// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration
//!
//! The required format version plus the decode-side resource limits. The
//! struct is `serde`-friendly so hosts can embed it in their own config files.

use serde::{Deserialize, Serialize};

/// Default required format version for new codecs.
pub const DEFAULT_VERSION: u32 = 1;

/// Default maximum nesting accepted by encode, decode and skip.
///
/// The term walks recurse once per level, so this must stay well inside a
/// 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: u32 = 128;

/// Default maximum length prefix (16 MiB).
pub const DEFAULT_MAX_PAYLOAD_LEN: u32 = 16 * 1024 * 1024;

/// Codec configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Required format version
    pub version: u32,

    /// Maximum nesting depth of a term, and maximum name count of a namespace
    pub max_depth: u32,

    /// Maximum accepted length prefix for strings, byte arrays and name lists
    pub max_payload_len: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            max_depth: DEFAULT_MAX_DEPTH,
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }
}

impl CodecConfig {
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }

    /// Same limits, different version. Used when deriving sub-codec configs.
    pub fn with_version(self, version: u32) -> Self {
        Self { version, ..self }
    }
}

/// Config builder for fluent API
#[derive(Debug, Default)]
pub struct CodecConfigBuilder {
    version: Option<u32>,
    max_depth: Option<u32>,
    max_payload_len: Option<u32>,
}

impl CodecConfigBuilder {
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn max_payload_len(mut self, len: u32) -> Self {
        self.max_payload_len = Some(len);
        self
    }

    pub fn build(self) -> CodecConfig {
        let default = CodecConfig::default();
        CodecConfig {
            version: self.version.unwrap_or(default.version),
            max_depth: self.max_depth.unwrap_or(default.max_depth),
            max_payload_len: self.max_payload_len.unwrap_or(default.max_payload_len),
        }
    }
}
