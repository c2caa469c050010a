// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use uuid::Uuid;

use super::numbering::ParameterStack;
use super::{TermCodec, TermTag};
use crate::codec::Source;
use crate::error::{DecodeError, ProtocolResult};
use crate::term::{Function, GlobalVariable, Parameter, Term, TermError};

impl TermCodec {
    pub(super) fn decode_term(
        &self,
        source: &mut Source<'_>,
        scope: &mut ParameterStack,
        depth: u32,
    ) -> ProtocolResult<Term> {
        let depth = self.descend(depth, |limit| DecodeError::DepthLimit { limit })?;
        let tag = self.table.read_tag(source)?;

        match tag {
            TermTag::Tau => Ok(Term::Tau),
            TermTag::Parameter => {
                let ordinal = source.read_varint_u32()?;
                let parameter = scope.get(ordinal).inspect_err(|e| {
                    log::debug!("[TERM-CODEC] {} at offset {}", e, source.position());
                })?;
                Ok(Term::Parameter(parameter))
            }
            TermTag::Global => {
                let id = source.read_uuid()?;
                Ok(Term::Global(self.resolve(id)?))
            }
            TermTag::Composition => {
                let head = self.decode_term(source, scope, depth)?;
                let tail = self.decode_term(source, scope, depth)?;
                self.checked(tag, source, self.model.composition(head, tail))
            }
            TermTag::Function => {
                let function = self.decode_function(source, scope, depth)?;
                Ok(Term::Function(function))
            }
            TermTag::Projection => {
                let function = self.decode_function(source, scope, depth)?;
                self.checked(tag, source, self.model.projection(function))
            }
            TermTag::ProjectedCast => {
                let inner = self.decode_term(source, scope, depth)?;
                self.checked(tag, source, self.model.projected_cast(inner))
            }
            TermTag::UnprojectedCast => {
                let inner = self.decode_term(source, scope, depth)?;
                self.checked(tag, source, self.model.unprojected_cast(inner))
            }
            TermTag::FoldingCast => {
                let term = self.decode_term(source, scope, depth)?;
                let ty = self.decode_term(source, scope, depth)?;
                let variable = self.resolve(source.read_uuid()?)?;
                let value = self.decode_term(source, scope, depth)?;
                self.checked(
                    tag,
                    source,
                    self.model.folding_cast(term, ty, variable, value),
                )
            }
        }
    }

    fn decode_function(
        &self,
        source: &mut Source<'_>,
        scope: &mut ParameterStack,
        depth: u32,
    ) -> ProtocolResult<Arc<Function>> {
        let ty = self.decode_term(source, scope, depth)?;
        let parameter = Parameter::new(ty);

        scope.push(Arc::clone(&parameter));
        let body = self.decode_term(source, scope, depth);
        scope.pop();

        Ok(Function::new(parameter, body?))
    }

    fn resolve(&self, id: Uuid) -> Result<Arc<GlobalVariable>, DecodeError> {
        self.resolver.resolve(&id).ok_or_else(|| {
            log::debug!("[TERM-CODEC] unresolved global variable {}", id);
            DecodeError::UnresolvedVariable(id)
        })
    }

    /// Turn a term-model rejection into a decode error, keeping the cause.
    fn checked(
        &self,
        tag: TermTag,
        source: &Source<'_>,
        built: Result<Term, TermError>,
    ) -> ProtocolResult<Term> {
        built.map_err(|cause| {
            log::debug!(
                "[TERM-CODEC] {} rejected at offset {}: {}",
                tag.shape(),
                source.position(),
                cause
            );
            DecodeError::Rejected {
                shape: tag.shape(),
                source: cause,
            }
            .into()
        })
    }
}
