// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scope stacks for bound parameters.
//!
//! Ordinals count binders outward from the reference: 0 is the innermost
//! enclosing function. Both stacks live for exactly one top-level call and
//! are threaded through the recursion by `&mut`.

use std::sync::Arc;

use crate::error::DecodeError;
use crate::term::Parameter;

/// Encode side: parameters in scope, outermost first, compared by identity.
#[derive(Debug, Default)]
pub(crate) struct ParameterNumbering {
    scope: Vec<*const Parameter>,
}

impl ParameterNumbering {
    pub(crate) fn push(&mut self, parameter: &Arc<Parameter>) {
        self.scope.push(Arc::as_ptr(parameter));
    }

    pub(crate) fn pop(&mut self) {
        self.scope.pop();
    }

    /// Ordinal of this exact parameter object, innermost match first.
    pub(crate) fn ordinal_of(&self, parameter: &Arc<Parameter>) -> Option<u32> {
        let ptr = Arc::as_ptr(parameter);
        self.scope
            .iter()
            .rev()
            .position(|&p| p == ptr)
            .and_then(|ordinal| u32::try_from(ordinal).ok())
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.scope.len()
    }
}

/// Decode side: freshly built parameters in encounter order.
#[derive(Debug, Default)]
pub(crate) struct ParameterStack {
    scope: Vec<Arc<Parameter>>,
}

impl ParameterStack {
    pub(crate) fn push(&mut self, parameter: Arc<Parameter>) {
        self.scope.push(parameter);
    }

    pub(crate) fn pop(&mut self) {
        self.scope.pop();
    }

    pub(crate) fn get(&self, ordinal: u32) -> Result<Arc<Parameter>, DecodeError> {
        let depth = self.scope.len();
        (ordinal as usize)
            .checked_add(1)
            .and_then(|n| depth.checked_sub(n))
            .map(|index| Arc::clone(&self.scope[index]))
            .ok_or(DecodeError::ParameterOutOfRange { ordinal, depth })
    }
}

/// Skip side: only the number of open binders matters.
pub(crate) fn check_ordinal(ordinal: u32, binders: usize) -> Result<(), DecodeError> {
    if (ordinal as usize) < binders {
        Ok(())
    } else {
        Err(DecodeError::ParameterOutOfRange {
            ordinal,
            depth: binders,
        })
    }
}
