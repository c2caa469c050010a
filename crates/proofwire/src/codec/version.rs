// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Format version gate.
//!
//! Every codec type declares the versions it can produce and consume. A codec
//! asked for anything else refuses to be constructed; there is no in-band
//! negotiation.

use crate::error::ConfigError;

/// Static version metadata carried by codec and tag types.
pub trait Versioned {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Versions this type can produce and consume.
    const AVAILABLE_VERSIONS: &'static [u32];

    fn check_version(required: u32) -> Result<(), ConfigError> {
        check_version(Self::NAME, Self::AVAILABLE_VERSIONS, required)
    }
}

/// Validate `required` against a declared version set.
pub fn check_version(
    codec: &'static str,
    available: &'static [u32],
    required: u32,
) -> Result<(), ConfigError> {
    if available.is_empty() {
        log::warn!("[VERSION] {} declares no versions", codec);
        return Err(ConfigError::MissingVersionInfo { codec });
    }
    if !available.contains(&required) {
        log::warn!(
            "[VERSION] {} asked for v{}, available {:?}",
            codec,
            required,
            available
        );
        return Err(ConfigError::VersionNotAvailable {
            codec,
            requested: required,
            available,
        });
    }
    Ok(())
}
