//! A tree representation of algebraic terms that is easy to match against and rewrite.
//!
//! Terms are built from a closed set of node kinds: named [`Atom`](Expr::Atom)s, pattern-only
//! [`Wildcard`](Expr::Wildcard)s, flattened [`Sum`](Expr::Sum)s and [`Product`](Expr::Product)s,
//! binary [`Commutator`](Expr::Commutator)s `[a,b]`, the symbolic unary
//! [`Coproduct`](Expr::Coproduct) `Δ(a)`, and binary [`Tensor`](Expr::Tensor) pairings
//! `(a ⊗ b)`. Keeping the set closed lets the matcher, the rewrite engine and the
//! canonicalization helpers dispatch with exhaustive `match`es, so adding a node kind forces
//! every site to be updated.
//!
//! # Flattening
//!
//! `Sum` and `Product` store their operands as explicit ordered lists rather than nested binary
//! nodes. The [`Expr::sum`] and [`Expr::product`] constructors splice one level of same-kind
//! nesting: building `sum([sum([a, b]), c])` yields a single `Sum` with the three terms `a`, `b`,
//! `c`. A `Sum` therefore never directly contains another `Sum` as an immediate term, and
//! likewise for `Product`. The [`Add`] and [`Mul`] operator impls preserve the same invariant.
//!
//! # Structural equality
//!
//! [`PartialEq`] on [`Expr`] is **structural**: two expressions are equal iff they have the same
//! node kind and structurally equal children, in the same order. Order inside a `Sum` or
//! `Product` is not semantically significant, but it is significant for equality and for pattern
//! matching; nothing is sorted on construction. Consumers that need order-insensitive comparison
//! canonicalize first (see the `yangian` module's sorted rendering).
//!
//! # Rendering
//!
//! The [`Display`](std::fmt::Display) output is a contract, not a cosmetic detail: it is the key
//! used for canonical ordering decisions (the antisymmetry rule, sum sorting), and tests assert
//! on exact separators. `Sum` renders as `(a + b)`, `Product` as `(a * b)`, `Commutator` as
//! `[a,b]`, `Coproduct` as `Δ(a)`, `Tensor` as `(a ⊗ b)`, atoms as their name and wildcards as
//! `?name`.

mod iter;

pub use iter::ExprIter;

use std::fmt;
use std::ops::{Add, Mul};

/// An algebraic term.
///
/// Values are immutable by convention: rewriting and substitution always build new nodes, never
/// mutate the children of an existing one. See the [module-level documentation](self) for the
/// invariants upheld by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A named leaf: a symbol or a generator such as `E1_2`.
    Atom(String),

    /// A pattern-only placeholder, bound to a concrete sub-expression during matching. A fully
    /// rewritten, ground expression never contains one.
    Wildcard(String),

    /// An ordered list of terms added together. Never directly contains another `Sum`.
    Sum(Vec<Expr>),

    /// An ordered list of factors multiplied together. Never directly contains another
    /// `Product`.
    Product(Vec<Expr>),

    /// The commutator `[a,b]`. Not antisymmetrized at construction; antisymmetry is a rewrite
    /// rule, not an invariant.
    Commutator(Box<Expr>, Box<Expr>),

    /// The symbolic, unexpanded coproduct marker `Δ(a)`. The `yangian` module's public
    /// expansion operations never return one.
    Coproduct(Box<Expr>),

    /// The tensor pairing `(a ⊗ b)`. Chains built by repeated pairwise tensoring are
    /// right-associated; canonicalization can force left-association.
    Tensor(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Creates an atom with the given name.
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    /// Creates a wildcard with the given binding name.
    pub fn wildcard(name: impl Into<String>) -> Self {
        Self::Wildcard(name.into())
    }

    /// Creates a sum, splicing the terms of any immediate `Sum` operand into the new term list.
    pub fn sum(terms: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Self::Sum(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Self::Sum(flat)
    }

    /// Creates a product, splicing the factors of any immediate `Product` operand into the new
    /// factor list.
    pub fn product(factors: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                Self::Product(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Self::Product(flat)
    }

    /// Creates the commutator `[a,b]`.
    pub fn commutator(a: Expr, b: Expr) -> Self {
        Self::Commutator(Box::new(a), Box::new(b))
    }

    /// Creates the symbolic coproduct `Δ(a)`.
    pub fn coproduct(a: Expr) -> Self {
        Self::Coproduct(Box::new(a))
    }

    /// Creates the tensor pairing `(left ⊗ right)`.
    pub fn tensor(left: Expr, right: Expr) -> Self {
        Self::Tensor(Box::new(left), Box::new(right))
    }

    /// If the expression is an [`Expr::Atom`], returns its name.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(name) => Some(name),
            _ => None,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns true if no [`Expr::Wildcard`] occurs anywhere in the tree.
    ///
    /// Matching binds wildcards to ground sub-expressions, so patterns are generally not ground
    /// while everything produced by expansion and rewriting is.
    pub fn is_ground(&self) -> bool {
        self.post_order_iter()
            .all(|node| !matches!(node, Self::Wildcard(_)))
    }

    /// Returns true if an [`Expr::Coproduct`] occurs anywhere in the tree.
    pub fn contains_coproduct(&self) -> bool {
        self.post_order_iter()
            .any(|node| matches!(node, Self::Coproduct(_)))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(name) => write!(f, "{}", name),
            Self::Wildcard(name) => write!(f, "?{}", name),
            Self::Sum(terms) => {
                write!(f, "(")?;
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        write!(f, " + {}", term)?;
                    }
                }
                write!(f, ")")
            },
            Self::Product(factors) => {
                write!(f, "(")?;
                let mut iter = factors.iter();
                if let Some(factor) = iter.next() {
                    write!(f, "{}", factor)?;
                    for factor in iter {
                        write!(f, " * {}", factor)?;
                    }
                }
                write!(f, ")")
            },
            Self::Commutator(a, b) => write!(f, "[{},{}]", a, b),
            Self::Coproduct(a) => write!(f, "Δ({})", a),
            Self::Tensor(left, right) => write!(f, "({} ⊗ {})", left, right),
        }
    }
}

/// Adds two [`Expr`]s together. No simplification is done, except that `Sum` operands are
/// combined into one flat term list, preserving left-to-right order.
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Sum(mut terms), Self::Sum(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Sum(terms)
            },
            (Self::Sum(mut terms), rhs) => {
                terms.push(rhs);
                Self::Sum(terms)
            },
            (lhs, Self::Sum(rhs_terms)) => {
                let mut terms = Vec::with_capacity(rhs_terms.len() + 1);
                terms.push(lhs);
                terms.extend(rhs_terms);
                Self::Sum(terms)
            },
            (lhs, rhs) => Self::Sum(vec![lhs, rhs]),
        }
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done, except that `Product` operands
/// are combined into one flat factor list, preserving left-to-right order.
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Product(mut factors), Self::Product(rhs_factors)) => {
                factors.extend(rhs_factors);
                Self::Product(factors)
            },
            (Self::Product(mut factors), rhs) => {
                factors.push(rhs);
                Self::Product(factors)
            },
            (lhs, Self::Product(rhs_factors)) => {
                let mut factors = Vec::with_capacity(rhs_factors.len() + 1);
                factors.push(lhs);
                factors.extend(rhs_factors);
                Self::Product(factors)
            },
            (lhs, rhs) => Self::Product(vec![lhs, rhs]),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn sum_flattens_one_level() {
        let expr = Expr::sum(vec![
            Expr::sum(vec![Expr::atom("a"), Expr::atom("b")]),
            Expr::atom("c"),
        ]);
        assert_eq!(expr, Expr::Sum(vec![
            Expr::atom("a"),
            Expr::atom("b"),
            Expr::atom("c"),
        ]));
    }

    #[test]
    fn product_flattens_one_level() {
        let expr = Expr::product(vec![
            Expr::product(vec![Expr::atom("a"), Expr::atom("b")]),
            Expr::atom("c"),
        ]);
        assert_eq!(expr, Expr::Product(vec![
            Expr::atom("a"),
            Expr::atom("b"),
            Expr::atom("c"),
        ]));
    }

    #[test]
    fn equality_is_positional() {
        let ab = Expr::sum(vec![Expr::atom("a"), Expr::atom("b")]);
        let ba = Expr::sum(vec![Expr::atom("b"), Expr::atom("a")]);
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn add_operator_flattens_in_order() {
        let lhs = Expr::atom("x");
        let rhs = Expr::sum(vec![Expr::atom("y"), Expr::atom("z")]);
        assert_eq!(lhs + rhs, Expr::Sum(vec![
            Expr::atom("x"),
            Expr::atom("y"),
            Expr::atom("z"),
        ]));
    }

    #[test]
    fn mul_operator_flattens_in_order() {
        let lhs = Expr::product(vec![Expr::atom("-1"), Expr::atom("a")]);
        let rhs = Expr::atom("b");
        assert_eq!(lhs * rhs, Expr::Product(vec![
            Expr::atom("-1"),
            Expr::atom("a"),
            Expr::atom("b"),
        ]));
    }

    #[test]
    fn rendering_contract() {
        let sum = Expr::sum(vec![Expr::atom("a"), Expr::atom("b")]);
        assert_eq!(sum.to_string(), "(a + b)");

        let product = Expr::product(vec![Expr::atom("-1"), Expr::atom("a")]);
        assert_eq!(product.to_string(), "(-1 * a)");

        let commutator = Expr::commutator(Expr::atom("a"), Expr::atom("b"));
        assert_eq!(commutator.to_string(), "[a,b]");

        let coproduct = Expr::coproduct(Expr::atom("a"));
        assert_eq!(coproduct.to_string(), "Δ(a)");

        let tensor = Expr::tensor(Expr::atom("a"), Expr::atom("b"));
        assert_eq!(tensor.to_string(), "(a ⊗ b)");

        assert_eq!(Expr::wildcard("x").to_string(), "?x");
    }

    #[test]
    fn ground_and_coproduct_queries() {
        let pattern = Expr::commutator(
            Expr::wildcard("x"),
            Expr::sum(vec![Expr::wildcard("y"), Expr::atom("a")]),
        );
        assert!(!pattern.is_ground());

        let ground = Expr::tensor(
            Expr::atom("a"),
            Expr::coproduct(Expr::atom("b")),
        );
        assert!(ground.is_ground());
        assert!(ground.contains_coproduct());
        assert!(!Expr::atom("a").contains_coproduct());
    }

    #[test]
    fn post_order_visits_children_first() {
        let expr = Expr::commutator(
            Expr::atom("a"),
            Expr::sum(vec![Expr::atom("b"), Expr::atom("c")]),
        );
        let rendered = expr.post_order_iter()
            .map(|node| node.to_string())
            .collect::<Vec<_>>();
        assert_eq!(rendered, vec!["a", "b", "c", "(b + c)", "[a,(b + c)]"]);
    }
}
