// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::numbering::ParameterNumbering;
use super::TermCodec;
use crate::codec::Sink;
use crate::error::{EncodeError, ProtocolResult};
use crate::registry::Tagged;
use crate::term::{Function, Term};

impl TermCodec {
    pub(super) fn encode_term(
        &self,
        sink: &mut Sink<'_>,
        term: &Term,
        scope: &mut ParameterNumbering,
        depth: u32,
    ) -> ProtocolResult<()> {
        let depth = self.descend(depth, |limit| EncodeError::DepthLimit { limit })?;
        self.table.write_tag(sink, term.tag())?;

        match term {
            Term::Tau => Ok(()),
            Term::Parameter(parameter) => {
                let ordinal = scope.ordinal_of(parameter);
                debug_assert!(ordinal.is_some(), "unbound parameter in encoded term");
                match ordinal {
                    Some(ordinal) => sink.write_varint(u64::from(ordinal)),
                    None => Err(EncodeError::UnboundParameter.into()),
                }
            }
            Term::Global(variable) => sink.write_uuid(&variable.id()),
            Term::Composition(c) => {
                self.encode_term(sink, c.head(), scope, depth)?;
                self.encode_term(sink, c.tail(), scope, depth)
            }
            Term::Function(f) => self.encode_function(sink, f, scope, depth),
            Term::Projection(p) => self.encode_function(sink, p.function(), scope, depth),
            Term::ProjectedCast(cast) | Term::UnprojectedCast(cast) => {
                self.encode_term(sink, cast.term(), scope, depth)
            }
            Term::FoldingCast(fc) => {
                self.encode_term(sink, fc.term(), scope, depth)?;
                self.encode_term(sink, fc.ty(), scope, depth)?;
                sink.write_uuid(&fc.variable().id())?;
                self.encode_term(sink, fc.value(), scope, depth)
            }
        }
    }

    /// Parameter type outside the new scope, body inside it.
    fn encode_function(
        &self,
        sink: &mut Sink<'_>,
        function: &Function,
        scope: &mut ParameterNumbering,
        depth: u32,
    ) -> ProtocolResult<()> {
        self.encode_term(sink, function.parameter().ty(), scope, depth)?;

        scope.push(function.parameter());
        let result = self.encode_term(sink, function.body(), scope, depth);
        scope.pop();
        result
    }
}
