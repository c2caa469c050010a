// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Allocation-free skip. Mirrors `decode` field for field; only the number
//! of open binders is tracked.

use super::numbering::check_ordinal;
use super::{TermCodec, TermTag};
use crate::codec::Source;
use crate::error::{DecodeError, ProtocolResult};

const UUID_LEN: u64 = 16;

impl TermCodec {
    pub(super) fn skip_term(
        &self,
        source: &mut Source<'_>,
        binders: usize,
        depth: u32,
    ) -> ProtocolResult<()> {
        let depth = self.descend(depth, |limit| DecodeError::DepthLimit { limit })?;

        match self.table.read_tag(source)? {
            TermTag::Tau => Ok(()),
            TermTag::Parameter => {
                let ordinal = source.read_varint_u32()?;
                check_ordinal(ordinal, binders)?;
                Ok(())
            }
            TermTag::Global => source.skip_bytes(UUID_LEN),
            TermTag::Composition => {
                self.skip_term(source, binders, depth)?;
                self.skip_term(source, binders, depth)
            }
            TermTag::Function | TermTag::Projection => {
                self.skip_term(source, binders, depth)?;
                self.skip_term(source, binders + 1, depth)
            }
            TermTag::ProjectedCast | TermTag::UnprojectedCast => {
                self.skip_term(source, binders, depth)
            }
            TermTag::FoldingCast => {
                self.skip_term(source, binders, depth)?;
                self.skip_term(source, binders, depth)?;
                source.skip_bytes(UUID_LEN)?;
                self.skip_term(source, binders, depth)
            }
        }
    }
}
