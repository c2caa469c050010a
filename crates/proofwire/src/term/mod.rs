// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Proof-object terms.
//!
//! Terms are immutable trees of `Arc`-shared nodes. Two kinds of variables
//! appear in them:
//!
//! - [`Parameter`]: bound by exactly one enclosing [`Function`]. Identity is
//!   the `Arc` allocation, never the structure.
//! - [`GlobalVariable`]: identified by a UUID and resolved against an
//!   external store ([`VariableResolver`]).
//!
//! Variants whose legality depends on typing rules (compositions,
//! projections, casts) can only be built through a [`TermModel`]:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use proofwire::term::{Cast, Term};
//!
//! let unchecked = Term::ProjectedCast(Arc::new(Cast { term: Term::Tau }));
//! ```
//!
//! Equality on [`Term`] is alpha-equivalence: bound parameters compare by
//! binder position, so a decoded term equals the one that was encoded.

mod model;
mod resolver;

pub use model::{StructuralModel, TermError, TermModel};
pub use resolver::{InMemoryResolver, VariableResolver};

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// A node of the proof-object AST.
#[derive(Clone)]
pub enum Term {
    /// The primitive type constant.
    Tau,
    Parameter(Arc<Parameter>),
    Global(Arc<GlobalVariable>),
    Composition(Arc<Composition>),
    Function(Arc<Function>),
    Projection(Arc<Projection>),
    ProjectedCast(Arc<Cast>),
    UnprojectedCast(Arc<Cast>),
    FoldingCast(Arc<FoldingCast>),
}

/// A bound parameter, carrying its declared domain type.
#[derive(Debug)]
pub struct Parameter {
    ty: Term,
}

impl Parameter {
    pub fn new(ty: Term) -> Arc<Self> {
        Arc::new(Self { ty })
    }

    pub fn ty(&self) -> &Term {
        &self.ty
    }
}

/// A globally identified variable.
#[derive(Debug)]
pub struct GlobalVariable {
    id: Uuid,
    ty: Term,
}

impl GlobalVariable {
    pub fn new(id: Uuid, ty: Term) -> Arc<Self> {
        Arc::new(Self { id, ty })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn ty(&self) -> &Term {
        &self.ty
    }
}

impl PartialEq for GlobalVariable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GlobalVariable {}

#[derive(Debug)]
pub struct Composition {
    head: Term,
    tail: Term,
}

impl Composition {
    pub fn head(&self) -> &Term {
        &self.head
    }

    pub fn tail(&self) -> &Term {
        &self.tail
    }
}

/// A binder: one parameter scoped over `body`.
#[derive(Debug)]
pub struct Function {
    parameter: Arc<Parameter>,
    body: Term,
}

impl Function {
    pub fn new(parameter: Arc<Parameter>, body: Term) -> Arc<Self> {
        Arc::new(Self { parameter, body })
    }

    pub fn parameter(&self) -> &Arc<Parameter> {
        &self.parameter
    }

    pub fn body(&self) -> &Term {
        &self.body
    }

    fn closed_under(&self, scope: &mut Vec<*const Parameter>) -> bool {
        if !self.parameter.ty.closed_under(scope) {
            return false;
        }
        scope.push(Arc::as_ptr(&self.parameter));
        let closed = self.body.closed_under(scope);
        scope.pop();
        closed
    }

    fn size(&self) -> usize {
        self.parameter.ty.size() + self.body.size()
    }
}

/// A projection binder.
#[derive(Debug)]
pub struct Projection {
    function: Arc<Function>,
}

impl Projection {
    pub fn function(&self) -> &Arc<Function> {
        &self.function
    }
}

/// Operand of a projected or unprojected cast.
#[derive(Debug)]
pub struct Cast {
    term: Term,
}

impl Cast {
    pub fn term(&self) -> &Term {
        &self.term
    }
}

#[derive(Debug)]
pub struct FoldingCast {
    term: Term,
    ty: Term,
    variable: Arc<GlobalVariable>,
    value: Term,
}

impl FoldingCast {
    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn ty(&self) -> &Term {
        &self.ty
    }

    pub fn variable(&self) -> &Arc<GlobalVariable> {
        &self.variable
    }

    pub fn value(&self) -> &Term {
        &self.value
    }
}

impl Term {
    pub fn parameter(parameter: &Arc<Parameter>) -> Self {
        Term::Parameter(Arc::clone(parameter))
    }

    pub fn global(variable: &Arc<GlobalVariable>) -> Self {
        Term::Global(Arc::clone(variable))
    }

    pub fn function(parameter: Arc<Parameter>, body: Term) -> Self {
        Term::Function(Function::new(parameter, body))
    }

    pub(crate) fn raw_composition(head: Term, tail: Term) -> Self {
        Term::Composition(Arc::new(Composition { head, tail }))
    }

    pub(crate) fn raw_projection(function: Arc<Function>) -> Self {
        Term::Projection(Arc::new(Projection { function }))
    }

    pub(crate) fn raw_projected_cast(term: Term) -> Self {
        Term::ProjectedCast(Arc::new(Cast { term }))
    }

    pub(crate) fn raw_unprojected_cast(term: Term) -> Self {
        Term::UnprojectedCast(Arc::new(Cast { term }))
    }

    pub(crate) fn raw_folding_cast(
        term: Term,
        ty: Term,
        variable: Arc<GlobalVariable>,
        value: Term,
    ) -> Self {
        Term::FoldingCast(Arc::new(FoldingCast {
            term,
            ty,
            variable,
            value,
        }))
    }

    /// True when every parameter reference sits inside its own binder.
    pub fn is_closed(&self) -> bool {
        let mut scope = Vec::new();
        self.closed_under(&mut scope)
    }

    fn closed_under(&self, scope: &mut Vec<*const Parameter>) -> bool {
        match self {
            Term::Tau | Term::Global(_) => true,
            Term::Parameter(p) => scope.contains(&Arc::as_ptr(p)),
            Term::Composition(c) => c.head.closed_under(scope) && c.tail.closed_under(scope),
            Term::Function(f) => f.closed_under(scope),
            Term::Projection(p) => p.function.closed_under(scope),
            Term::ProjectedCast(c) | Term::UnprojectedCast(c) => c.term.closed_under(scope),
            Term::FoldingCast(fc) => {
                fc.term.closed_under(scope)
                    && fc.ty.closed_under(scope)
                    && fc.value.closed_under(scope)
            }
        }
    }

    /// Number of nodes, counting each parameter's type once per binder.
    pub fn size(&self) -> usize {
        1 + match self {
            Term::Tau | Term::Parameter(_) | Term::Global(_) => 0,
            Term::Composition(c) => c.head.size() + c.tail.size(),
            Term::Function(f) => f.size(),
            Term::Projection(p) => p.function.size(),
            Term::ProjectedCast(c) | Term::UnprojectedCast(c) => c.term.size(),
            Term::FoldingCast(fc) => fc.term.size() + fc.ty.size() + fc.value.size(),
        }
    }
}

// ============================================================================
// Alpha-equivalence
// ============================================================================

/// Position of `p` counted from the innermost binder.
fn binder_index(scope: &[*const Parameter], p: &Arc<Parameter>) -> Option<usize> {
    let ptr = Arc::as_ptr(p);
    scope.iter().rev().position(|&q| q == ptr)
}

fn alpha_eq(
    a: &Term,
    b: &Term,
    left: &mut Vec<*const Parameter>,
    right: &mut Vec<*const Parameter>,
) -> bool {
    match (a, b) {
        (Term::Tau, Term::Tau) => true,
        (Term::Parameter(p), Term::Parameter(q)) => {
            match (binder_index(left, p), binder_index(right, q)) {
                (Some(i), Some(j)) => i == j,
                // Free on both sides: only the same object is equal.
                (None, None) => Arc::ptr_eq(p, q),
                _ => false,
            }
        }
        (Term::Global(x), Term::Global(y)) => x == y,
        (Term::Composition(x), Term::Composition(y)) => {
            alpha_eq(&x.head, &y.head, left, right) && alpha_eq(&x.tail, &y.tail, left, right)
        }
        (Term::Function(f), Term::Function(g)) => function_eq(f, g, left, right),
        (Term::Projection(x), Term::Projection(y)) => {
            function_eq(&x.function, &y.function, left, right)
        }
        (Term::ProjectedCast(x), Term::ProjectedCast(y))
        | (Term::UnprojectedCast(x), Term::UnprojectedCast(y)) => {
            alpha_eq(&x.term, &y.term, left, right)
        }
        (Term::FoldingCast(x), Term::FoldingCast(y)) => {
            x.variable == y.variable
                && alpha_eq(&x.term, &y.term, left, right)
                && alpha_eq(&x.ty, &y.ty, left, right)
                && alpha_eq(&x.value, &y.value, left, right)
        }
        _ => false,
    }
}

fn function_eq(
    f: &Function,
    g: &Function,
    left: &mut Vec<*const Parameter>,
    right: &mut Vec<*const Parameter>,
) -> bool {
    if !alpha_eq(&f.parameter.ty, &g.parameter.ty, left, right) {
        return false;
    }
    left.push(Arc::as_ptr(&f.parameter));
    right.push(Arc::as_ptr(&g.parameter));
    let eq = alpha_eq(&f.body, &g.body, left, right);
    left.pop();
    right.pop();
    eq
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        alpha_eq(self, other, &mut Vec::new(), &mut Vec::new())
    }
}

impl Eq for Term {}

// ============================================================================
// Rendering
// ============================================================================

struct Render;

impl Render {
    fn write(
        term: &Term,
        scope: &mut Vec<*const Parameter>,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match term {
            Term::Tau => write!(f, "Tau"),
            Term::Parameter(p) => match scope.iter().position(|&q| q == Arc::as_ptr(p)) {
                Some(depth) => write!(f, "x{}", depth),
                None => write!(f, "x?"),
            },
            Term::Global(v) => write!(f, "@{}", v.id),
            Term::Composition(c) => {
                write!(f, "(")?;
                Self::write(&c.head, scope, f)?;
                write!(f, " ")?;
                Self::write(&c.tail, scope, f)?;
                write!(f, ")")
            }
            Term::Function(func) => Self::write_function(func, scope, f),
            Term::Projection(p) => {
                write!(f, "proj ")?;
                Self::write_function(&p.function, scope, f)
            }
            Term::ProjectedCast(c) => {
                write!(f, "pcast(")?;
                Self::write(&c.term, scope, f)?;
                write!(f, ")")
            }
            Term::UnprojectedCast(c) => {
                write!(f, "ucast(")?;
                Self::write(&c.term, scope, f)?;
                write!(f, ")")
            }
            Term::FoldingCast(fc) => {
                write!(f, "fold(")?;
                Self::write(&fc.term, scope, f)?;
                write!(f, " : ")?;
                Self::write(&fc.ty, scope, f)?;
                write!(f, " | @{} := ", fc.variable.id)?;
                Self::write(&fc.value, scope, f)?;
                write!(f, ")")
            }
        }
    }

    fn write_function(
        func: &Function,
        scope: &mut Vec<*const Parameter>,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "<x{}:", scope.len())?;
        Self::write(&func.parameter.ty, scope, f)?;
        write!(f, " -> ")?;
        scope.push(Arc::as_ptr(&func.parameter));
        let result = Self::write(&func.body, scope, f);
        scope.pop();
        result?;
        write!(f, ">")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Render::write(self, &mut Vec::new(), f)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({})", self)
    }
}
