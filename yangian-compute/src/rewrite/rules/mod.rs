//! The default algebraic identities, organized per node kind.
//!
//! Each submodule exposes constructors for its rules plus an `all` function returning them in
//! priority order. [`default_rules`] assembles the full ordered list consumed by
//! [`default_rewriter`].

pub mod commutator;

use once_cell::sync::Lazy;
use super::{Rewriter, Rule};

/// The default rule set, in scan order. Earlier rules take priority.
pub fn default_rules() -> Vec<Rule> {
    commutator::all()
}

/// The shared rewriter over [`default_rules`], initialized on first use.
pub fn default_rewriter() -> &'static Rewriter {
    static REWRITER: Lazy<Rewriter> = Lazy::new(|| Rewriter::new(default_rules()));
    &REWRITER
}
