// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Term model: the validating constructors the codec goes through.
//!
//! The typing rules behind projections and casts live with whoever owns the
//! calculus. The codec only needs a [`TermModel`] to call and a
//! [`TermError`] to propagate, so the rules are injected rather than
//! reproduced here.

use std::sync::Arc;

use thiserror::Error;

use super::{Function, GlobalVariable, Term};

/// Rejection raised by a term model constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    #[error("composition head must not itself be a composition")]
    CompositeHead,

    #[error("ill-formed projection: {0}")]
    Projection(String),

    #[error("ill-formed cast: {0}")]
    Cast(String),

    #[error("inconsistent folding cast: {0}")]
    FoldingCast(String),
}

/// Fallible smart constructors for the variants with legality rules.
pub trait TermModel: Send + Sync {
    fn composition(&self, head: Term, tail: Term) -> Result<Term, TermError>;

    fn projection(&self, function: Arc<Function>) -> Result<Term, TermError>;

    fn projected_cast(&self, term: Term) -> Result<Term, TermError>;

    fn unprojected_cast(&self, term: Term) -> Result<Term, TermError>;

    fn folding_cast(
        &self,
        term: Term,
        ty: Term,
        variable: Arc<GlobalVariable>,
        value: Term,
    ) -> Result<Term, TermError>;
}

/// Model enforcing only the structural shape rules.
///
/// A composition head may not be a composition; every other variant is
/// accepted as given. Hosts with a type checker wrap or replace this.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralModel;

impl TermModel for StructuralModel {
    fn composition(&self, head: Term, tail: Term) -> Result<Term, TermError> {
        if matches!(head, Term::Composition(_)) {
            return Err(TermError::CompositeHead);
        }
        Ok(Term::raw_composition(head, tail))
    }

    fn projection(&self, function: Arc<Function>) -> Result<Term, TermError> {
        Ok(Term::raw_projection(function))
    }

    fn projected_cast(&self, term: Term) -> Result<Term, TermError> {
        Ok(Term::raw_projected_cast(term))
    }

    fn unprojected_cast(&self, term: Term) -> Result<Term, TermError> {
        Ok(Term::raw_unprojected_cast(term))
    }

    fn folding_cast(
        &self,
        term: Term,
        ty: Term,
        variable: Arc<GlobalVariable>,
        value: Term,
    ) -> Result<Term, TermError> {
        Ok(Term::raw_folding_cast(term, ty, variable, value))
    }
}
