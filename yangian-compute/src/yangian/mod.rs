//! Coproduct expansion for a graded Yangian-like Hopf algebra.
//!
//! Generators are atoms whose names encode a type, an index and a grading level as
//! `<Type><Index>_<Level>`, e.g. `E1_2` (types `E`, `F`, `H`). The coproduct `Δ` acts on
//! generators; [`delta`] and [`coproduct_expand`] resolve it directly to a [`Tensor`](crate::expr::Expr::Tensor)
//! or a `Sum` of tensors, so no symbolic [`Coproduct`](crate::expr::Expr::Coproduct) node ever
//! survives in their output.
//!
//! The expansion table is deliberately minimal:
//!
//! - `Δ(1) = 1 ⊗ 1`
//! - levels 0 and 1 (and anything unparseable): the primitive `Δ(a) = a⊗1 + 1⊗a`
//! - level 2, type `E` only: the primitive terms plus the symmetric corrections
//!   `E_1⊗H_0 + H_0⊗E_1`
//! - levels 3 and up: the primitive expansion again (a stub, kept as-is)
//!
//! [`apply_id_otimes_delta`] and [`apply_delta_otimes_id`] lift `id ⊗ Δ` and `Δ ⊗ id` over
//! sums of tensors, and [`delta_associative_left`]/[`delta_associative_right`] compose them
//! with `Δ` and canonicalize the result (left-associated tensor chains, sums sorted by rendered
//! text) so that coassociativity can be checked by comparing renderings.

use crate::expr::Expr;

/// A generator name `<Type><Index>_<Level>`, parsed into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorName {
    /// The generator type, conventionally `E`, `F` or `H`.
    pub kind: char,

    /// The generator index, e.g. `1` in `E1_2`.
    pub index: String,

    /// The grading level, e.g. `2` in `E1_2`.
    pub level: u32,
}

/// Parses a generator name of the form `<Type><Index>_<Level>`, e.g. `E1_2`.
///
/// Returns `None` for anything malformed: no underscore, more than one underscore, an empty
/// part before the underscore, or a level that is not a non-negative integer. Malformed names
/// are a normal outcome (such atoms expand as primitives), never an error.
pub fn parse_generator_name(name: &str) -> Option<GeneratorName> {
    let (head, level) = name.split_once('_')?;
    if level.contains('_') {
        return None;
    }
    let mut chars = head.chars();
    let kind = chars.next()?;
    Some(GeneratorName {
        kind,
        index: chars.as_str().to_string(),
        level: level.parse().ok()?,
    })
}

fn unit() -> Expr {
    Expr::atom("1")
}

/// The primitive coproduct `Δ(a) = a⊗1 + 1⊗a`.
fn primitive(atom: Expr) -> Expr {
    Expr::tensor(atom.clone(), unit()) + Expr::tensor(unit(), atom)
}

/// Expands `Δ` for the atom with the given name.
///
/// The result is always a `Tensor` or a `Sum` of `Tensor`s, never a symbolic `Coproduct`. The
/// unit `1` expands to `1 ⊗ 1`; unparseable names and levels 0/1 expand as primitives; level 2
/// adds the symmetric `E_1⊗H_0` corrections for type `E` only (types `F` and `H` stay
/// primitive at level 2 — intentional asymmetry of this model). Levels 3 and up fall back to
/// the primitive expansion; that is a documented limitation, not an error.
pub fn coproduct_expand(name: &str) -> Expr {
    if name == "1" {
        return Expr::tensor(unit(), unit());
    }

    let atom = Expr::atom(name);
    let Some(generator) = parse_generator_name(name) else {
        // unknown atoms are treated as primitive, level-0-like generators
        return primitive(atom);
    };

    match generator.level {
        0 | 1 => primitive(atom),
        2 => {
            let mut terms = vec![
                Expr::tensor(atom.clone(), unit()),
                Expr::tensor(unit(), atom),
            ];
            if generator.kind == 'E' {
                let e1 = Expr::atom(format!("E{}_1", generator.index));
                let h0 = Expr::atom(format!("H{}_0", generator.index));
                terms.push(Expr::tensor(e1.clone(), h0.clone()));
                terms.push(Expr::tensor(h0, e1));
            }
            Expr::sum(terms)
        },
        _ => primitive(atom),
    }
}

/// The coproduct of the generator with the given name, always in expanded form.
///
/// Alias for [`coproduct_expand`]; the output never contains a bare
/// [`Coproduct`](crate::expr::Expr::Coproduct) node.
pub fn delta(name: &str) -> Expr {
    coproduct_expand(name)
}

/// Flattens the parts into a single `Sum`, splicing nested sums, and unwraps a one-part result.
fn splice_sum(parts: Vec<Expr>) -> Expr {
    let mut flat = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            Expr::Sum(terms) => flat.extend(terms),
            other => flat.push(other),
        }
    }
    if flat.len() == 1 {
        flat.remove(0)
    } else {
        Expr::Sum(flat)
    }
}

/// Expands a tensor leg if it is an atom, and leaves it untouched otherwise.
fn expand_leg(leg: &Expr) -> Expr {
    match leg {
        Expr::Atom(name) => coproduct_expand(name),
        other => other.clone(),
    }
}

/// `(id ⊗ Δ)(expr)`: expands `Δ` on the **right** leg of every tensor, recursing into sums.
///
/// Only atom legs are expanded; a leg that is already a tensor (or anything else composite) is
/// left untouched. A bare atom input is expanded first and then recursed into. The result is a
/// flat `Sum` of `Tensor`s (or a single `Tensor`).
pub fn apply_id_otimes_delta(expr: &Expr) -> Expr {
    match expr {
        Expr::Sum(terms) => splice_sum(terms.iter().map(apply_id_otimes_delta).collect()),
        Expr::Tensor(left, right) => match expand_leg(right) {
            Expr::Sum(terms) => splice_sum(
                terms.into_iter()
                    .map(|term| Expr::tensor((**left).clone(), term))
                    .collect(),
            ),
            expanded => Expr::tensor((**left).clone(), expanded),
        },
        Expr::Atom(name) => apply_id_otimes_delta(&coproduct_expand(name)),
        other => other.clone(),
    }
}

/// `(Δ ⊗ id)(expr)`: the mirror of [`apply_id_otimes_delta`], expanding the **left** leg.
pub fn apply_delta_otimes_id(expr: &Expr) -> Expr {
    match expr {
        Expr::Sum(terms) => splice_sum(terms.iter().map(apply_delta_otimes_id).collect()),
        Expr::Tensor(left, right) => match expand_leg(left) {
            Expr::Sum(terms) => splice_sum(
                terms.into_iter()
                    .map(|term| Expr::tensor(term, (**right).clone()))
                    .collect(),
            ),
            expanded => Expr::tensor(expanded, (**right).clone()),
        },
        Expr::Atom(name) => apply_delta_otimes_id(&coproduct_expand(name)),
        other => other.clone(),
    }
}

/// Collects the leaves of a tensor chain in left-to-right order.
fn tensor_factors(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Tensor(left, right) => {
            tensor_factors(left, out);
            tensor_factors(right, out);
        },
        leaf => out.push(leaf.clone()),
    }
}

/// Re-associates every tensor chain into strictly left-associated form `((a⊗b)⊗c)`, recursing
/// into sums, regardless of the original nesting.
fn canonicalize_tensor_left(expr: &Expr) -> Expr {
    match expr {
        Expr::Sum(terms) => Expr::sum(terms.iter().map(canonicalize_tensor_left).collect()),
        Expr::Tensor(left, right) => {
            let mut factors = Vec::new();
            tensor_factors(left, &mut factors);
            tensor_factors(right, &mut factors);
            let mut iter = factors.into_iter();
            // a tensor chain always yields at least its own two legs
            let first = iter.next().unwrap();
            iter.fold(first, Expr::tensor)
        },
        other => other.clone(),
    }
}

/// Recursively sorts `Sum` terms by their rendered text (stable, purely lexicographic), after
/// canonicalizing tensor children, so that structurally different but semantically equal trees
/// render identically.
fn canonicalize_sum(expr: &Expr) -> Expr {
    match expr {
        Expr::Sum(terms) => {
            let mut terms: Vec<Expr> = terms.iter().map(canonicalize_sum).collect();
            terms.sort_by_cached_key(|term| term.to_string());
            Expr::Sum(terms)
        },
        Expr::Tensor(left, right) => {
            Expr::tensor(canonicalize_sum(left), canonicalize_sum(right))
        },
        other => other.clone(),
    }
}

/// `(id ⊗ Δ)(Δ(a))`, canonicalized: the left-hand side of the coassociativity property.
pub fn delta_associative_left(name: &str) -> Expr {
    canonicalize_sum(&canonicalize_tensor_left(&apply_id_otimes_delta(&delta(name))))
}

/// `(Δ ⊗ id)(Δ(a))`, canonicalized: the right-hand side of the coassociativity property.
///
/// For the generator levels this model covers (0 through 2), the output renders identically to
/// [`delta_associative_left`]'s.
pub fn delta_associative_right(name: &str) -> Expr {
    canonicalize_sum(&canonicalize_tensor_left(&apply_delta_otimes_id(&delta(name))))
}
