// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concrete wire types built on the codec substrate and the registry.

pub mod message;
pub mod namespace;
pub mod term;

pub use message::{Message, MessageCodec, MessageTag};
pub use namespace::{InvalidName, Namespace, NamespaceCodec, NamespaceTag};
pub use term::{TermCodec, TermCodecBuilder, TermTag};
