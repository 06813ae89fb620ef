//! Symbolic pattern matching, term rewriting and coproduct expansion for a small graded
//! Yangian-like Hopf algebra.
//!
//! The crate is a toy computer-algebra core in three layers:
//!
//! - [`expr`] — the [`Expr`] tree: atoms, wildcards, flattened sums and products, commutators,
//!   the symbolic coproduct and tensor pairings, with structural equality and a rendering
//!   contract that doubles as the canonical-ordering key.
//! - [`rewrite`] — a wildcard matcher, binding substitution, and a rewrite engine that applies
//!   an ordered rule list to a fixed point (first-applicable-rule policy, iteration-capped).
//!   The default rule set encodes linearity of the commutator over sums and canonical
//!   antisymmetric ordering.
//! - [`yangian`] — expansion of the graded coproduct `Δ` on named generators, the composite
//!   operators `id ⊗ Δ` and `Δ ⊗ id`, and the canonicalization that makes coassociativity
//!   checkable by comparing rendered text.
//!
//! ```
//! use yangian_compute::expr::Expr;
//! use yangian_compute::rewrite::rules::default_rewriter;
//! use yangian_compute::yangian::{delta, delta_associative_left, delta_associative_right};
//!
//! // [h, e + f] distributes and each commutator is put into canonical order
//! let expr = Expr::commutator(
//!     Expr::atom("h"),
//!     Expr::sum(vec![Expr::atom("e"), Expr::atom("f")]),
//! );
//! let out = default_rewriter().normalize(&expr);
//! assert_eq!(out.to_string(), "((-1 * [e,h]) + (-1 * [f,h]))");
//!
//! // Δ is coassociative on the generators this model covers
//! assert_eq!(delta("E1_1").to_string(), "((E1_1 ⊗ 1) + (1 ⊗ E1_1))");
//! assert_eq!(
//!     delta_associative_left("E1_2").to_string(),
//!     delta_associative_right("E1_2").to_string(),
//! );
//! ```

pub mod expr;
pub mod rewrite;
pub mod yangian;

pub use expr::Expr;
pub use rewrite::{match_pattern, substitute, Bindings, Rewriter, Rule};
pub use rewrite::rules::{default_rewriter, default_rules};
