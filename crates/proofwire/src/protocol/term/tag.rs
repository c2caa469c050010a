// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Term variant tags and their wire codes.
//!
//! v0 uses ASCII mnemonics, v1 packs the codes densely from zero:
//!
//! ```text
//! Tag              v0        v1
//! Tau              'T' 0x54  0x00
//! Parameter        'P' 0x50  0x01
//! Global           'I' 0x49  0x02
//! Composition      'C' 0x43  0x03
//! Function         'F' 0x46  0x04
//! Projection       'J' 0x4A  0x05
//! ProjectedCast    'R' 0x52  0x06
//! UnprojectedCast  'U' 0x55  0x07
//! FoldingCast      'D' 0x44  0x08
//! ```

use crate::codec::Versioned;
use crate::registry::{CodeWidth, TagEntry, Tagged, WireTag};
use crate::term::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermTag {
    Tau,
    Parameter,
    Global,
    Composition,
    Function,
    Projection,
    ProjectedCast,
    UnprojectedCast,
    FoldingCast,
}

const fn by_version(version: u32, mnemonic: u8, dense: u16) -> Option<u16> {
    if version == 0 {
        Some(mnemonic as u16)
    } else {
        Some(dense)
    }
}

impl TermTag {
    pub const ALL: [TermTag; 9] = [
        TermTag::Tau,
        TermTag::Parameter,
        TermTag::Global,
        TermTag::Composition,
        TermTag::Function,
        TermTag::Projection,
        TermTag::ProjectedCast,
        TermTag::UnprojectedCast,
        TermTag::FoldingCast,
    ];

    /// Name of the node shape this tag decodes into.
    pub fn shape(self) -> &'static str {
        match self {
            TermTag::Tau => "Tau",
            TermTag::Parameter => "Parameter",
            TermTag::Global => "GlobalVariable",
            TermTag::Composition => "Composition",
            TermTag::Function => "Function",
            TermTag::Projection => "Projection",
            TermTag::ProjectedCast => "ProjectedCast",
            TermTag::UnprojectedCast => "UnprojectedCast",
            TermTag::FoldingCast => "FoldingCast",
        }
    }
}

impl Versioned for TermTag {
    const NAME: &'static str = "TermTag";
    const AVAILABLE_VERSIONS: &'static [u32] = &[0, 1];
}

impl WireTag for TermTag {
    const WIDTH: CodeWidth = CodeWidth::Byte;

    fn variants() -> &'static [TagEntry<Self>] {
        const VARIANTS: &[TagEntry<TermTag>] = &[
            TagEntry {
                tag: TermTag::Tau,
                shape: "Tau",
                code: |v| by_version(v, b'T', 0x00),
            },
            TagEntry {
                tag: TermTag::Parameter,
                shape: "Parameter",
                code: |v| by_version(v, b'P', 0x01),
            },
            TagEntry {
                tag: TermTag::Global,
                shape: "GlobalVariable",
                code: |v| by_version(v, b'I', 0x02),
            },
            TagEntry {
                tag: TermTag::Composition,
                shape: "Composition",
                code: |v| by_version(v, b'C', 0x03),
            },
            TagEntry {
                tag: TermTag::Function,
                shape: "Function",
                code: |v| by_version(v, b'F', 0x04),
            },
            TagEntry {
                tag: TermTag::Projection,
                shape: "Projection",
                code: |v| by_version(v, b'J', 0x05),
            },
            TagEntry {
                tag: TermTag::ProjectedCast,
                shape: "ProjectedCast",
                code: |v| by_version(v, b'R', 0x06),
            },
            TagEntry {
                tag: TermTag::UnprojectedCast,
                shape: "UnprojectedCast",
                code: |v| by_version(v, b'U', 0x07),
            },
            TagEntry {
                tag: TermTag::FoldingCast,
                shape: "FoldingCast",
                code: |v| by_version(v, b'D', 0x08),
            },
        ];
        VARIANTS
    }
}

impl Tagged<TermTag> for Term {
    fn tag(&self) -> TermTag {
        match self {
            Term::Tau => TermTag::Tau,
            Term::Parameter(_) => TermTag::Parameter,
            Term::Global(_) => TermTag::Global,
            Term::Composition(_) => TermTag::Composition,
            Term::Function(_) => TermTag::Function,
            Term::Projection(_) => TermTag::Projection,
            Term::ProjectedCast(_) => TermTag::ProjectedCast,
            Term::UnprojectedCast(_) => TermTag::UnprojectedCast,
            Term::FoldingCast(_) => TermTag::FoldingCast,
        }
    }
}
