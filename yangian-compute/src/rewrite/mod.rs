//! Pattern matching and fixed-point term rewriting over [`Expr`] trees.
//!
//! # Matching
//!
//! [`match_pattern`] structurally unifies a pattern (an [`Expr`] that may contain
//! [`Wildcard`](Expr::Wildcard)s) against a concrete expression, producing a [`Bindings`]
//! environment from wildcard names to the sub-expressions they matched. Matching is positional:
//! a `Sum`/`Product` pattern requires the same arity and matches term-by-term, with no
//! permutation search or associative-commutative unification. The same wildcard name must match
//! structurally equal sub-expressions everywhere it occurs in one pattern.
//!
//! # Rewriting
//!
//! A [`Rule`] pairs a pattern with a pure builder that maps a successful match environment to
//! the replacement expression. [`Rule::try_apply`] tries the whole expression first, then
//! recursively descends into the children of composite nodes, so one application can rewrite
//! several independent sub-expressions at once.
//!
//! A [`Rewriter`] holds an ordered rule list and drives applications to a fixed point: on every
//! iteration it takes the **first** rule that matches and actually changes the expression, then
//! restarts the scan from the first rule. This first-applicable-rule policy is deterministic but
//! not confluent in general; the iteration cap ([`DEFAULT_MAX_ITERS`]) is the safety valve
//! against cyclic rule sets, and hitting it silently returns the best effort so far.

pub mod rules;

use crate::expr::Expr;
use std::collections::HashMap;
use std::fmt;

/// The environment built during one matching attempt: wildcard name to the ground
/// sub-expression it is bound to.
pub type Bindings = HashMap<String, Expr>;

/// The number of outer normalization iterations [`Rewriter::normalize`] runs before giving up
/// and returning the expression as-is.
pub const DEFAULT_MAX_ITERS: usize = 100;

/// Matches `pattern` against `expr`, returning the accumulated wildcard bindings on success.
///
/// A fresh environment is built per attempt and discarded on failure, so no partial bindings
/// ever escape a failed match. Each kind of composite pattern only matches the same kind of
/// expression; the first failing sub-match aborts the whole attempt.
pub fn match_pattern(pattern: &Expr, expr: &Expr) -> Option<Bindings> {
    let mut env = Bindings::new();
    match_into(pattern, expr, &mut env).then_some(env)
}

/// The recursive worker behind [`match_pattern`]. `env` may hold partial bindings when this
/// returns false; the caller owns the environment and throws it away in that case.
fn match_into(pattern: &Expr, expr: &Expr, env: &mut Bindings) -> bool {
    match (pattern, expr) {
        (Expr::Wildcard(name), _) => match env.get(name) {
            Some(bound) => bound == expr,
            None => {
                env.insert(name.clone(), expr.clone());
                true
            },
        },
        (Expr::Atom(pname), Expr::Atom(ename)) => pname == ename,
        (Expr::Sum(pterms), Expr::Sum(eterms))
        | (Expr::Product(pterms), Expr::Product(eterms)) => {
            pterms.len() == eterms.len()
                && pterms.iter()
                    .zip(eterms)
                    .all(|(pterm, eterm)| match_into(pterm, eterm, env))
        },
        (Expr::Commutator(pa, pb), Expr::Commutator(ea, eb))
        | (Expr::Tensor(pa, pb), Expr::Tensor(ea, eb)) => {
            match_into(pa, ea, env) && match_into(pb, eb, env)
        },
        (Expr::Coproduct(pa), Expr::Coproduct(ea)) => match_into(pa, ea, env),
        _ => false,
    }
}

/// A rule right-hand side referenced a wildcard its left-hand side never bound.
///
/// This is a programmer error in the rule definition, not a property of the expression being
/// rewritten, which is why it is surfaced explicitly instead of being silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundWildcard(pub String);

impl fmt::Display for UnboundWildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wildcard `?{}` is not bound in the match environment", self.0)
    }
}

impl std::error::Error for UnboundWildcard {}

/// Replaces every wildcard in `template` with its binding from `env`, rebuilding composite
/// nodes through the flattening constructors.
pub fn substitute(template: &Expr, env: &Bindings) -> Result<Expr, UnboundWildcard> {
    match template {
        Expr::Wildcard(name) => env.get(name)
            .cloned()
            .ok_or_else(|| UnboundWildcard(name.clone())),
        Expr::Atom(_) => Ok(template.clone()),
        Expr::Sum(terms) => Ok(Expr::sum(
            terms.iter()
                .map(|term| substitute(term, env))
                .collect::<Result<_, _>>()?,
        )),
        Expr::Product(factors) => Ok(Expr::product(
            factors.iter()
                .map(|factor| substitute(factor, env))
                .collect::<Result<_, _>>()?,
        )),
        Expr::Commutator(a, b) => Ok(Expr::commutator(
            substitute(a, env)?,
            substitute(b, env)?,
        )),
        Expr::Coproduct(a) => Ok(Expr::coproduct(substitute(a, env)?)),
        Expr::Tensor(left, right) => Ok(Expr::tensor(
            substitute(left, env)?,
            substitute(right, env)?,
        )),
    }
}

type Builder = Box<dyn Fn(&Bindings) -> Expr + Send + Sync>;

/// A rewrite rule: a pattern plus a pure builder mapping a successful match environment to the
/// replacement expression.
///
/// Most rules are substitution templates (see [`Rule::template`]), but a builder may be an
/// arbitrary pure function of the environment; the antisymmetry rule uses one to make its
/// ordering decision.
pub struct Rule {
    name: &'static str,
    pattern: Expr,
    builder: Builder,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// Creates a rule from a pattern and an arbitrary builder.
    pub fn new(
        name: &'static str,
        pattern: Expr,
        builder: impl Fn(&Bindings) -> Expr + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            pattern,
            builder: Box::new(builder),
        }
    }

    /// Creates the common kind of rule whose right-hand side is a fixed template instantiated
    /// by [`substitute`].
    ///
    /// # Panics
    ///
    /// The builder panics when applied if `rhs` references a wildcard that `lhs` never binds.
    /// That is a broken rule definition, caught the first time the rule fires.
    pub fn template(name: &'static str, lhs: Expr, rhs: Expr) -> Self {
        Self::new(name, lhs, move |env| match substitute(&rhs, env) {
            Ok(expr) => expr,
            Err(UnboundWildcard(wildcard)) => panic!(
                "rule `{}`: right-hand side references `?{}`, which the pattern never binds",
                name, wildcard,
            ),
        })
    }

    /// The rule's name, as recorded in normalization traces.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Applies the rule to `expr` or, failing that, to its sub-expressions.
    ///
    /// The whole expression is tried first; if it matches, the builder's result is returned. If
    /// not, the rule is recursively tried on each immediate child of a composite node, and the
    /// node is rebuilt (through the flattening constructors) with the rewritten children iff at
    /// least one child changed.
    ///
    /// `None` means the rule matched nowhere. A `Some` result may still be structurally equal
    /// to the input (e.g. antisymmetry on an already-ordered commutator); distinguishing
    /// "matched but unchanged" from "matched nowhere" is what lets [`Rewriter`] detect fixed
    /// points.
    pub fn try_apply(&self, expr: &Expr) -> Option<Expr> {
        if let Some(env) = match_pattern(&self.pattern, expr) {
            return Some((self.builder)(&env));
        }

        match expr {
            Expr::Atom(_) | Expr::Wildcard(_) => None,
            Expr::Sum(terms) => self.apply_to_children(terms).map(Expr::sum),
            Expr::Product(factors) => self.apply_to_children(factors).map(Expr::product),
            Expr::Commutator(a, b) => {
                let (new_a, new_b) = (self.try_apply(a), self.try_apply(b));
                if new_a.is_none() && new_b.is_none() {
                    return None;
                }
                Some(Expr::commutator(
                    new_a.unwrap_or_else(|| (**a).clone()),
                    new_b.unwrap_or_else(|| (**b).clone()),
                ))
            },
            Expr::Coproduct(a) => self.try_apply(a).map(Expr::coproduct),
            Expr::Tensor(left, right) => {
                let (new_left, new_right) = (self.try_apply(left), self.try_apply(right));
                if new_left.is_none() && new_right.is_none() {
                    return None;
                }
                Some(Expr::tensor(
                    new_left.unwrap_or_else(|| (**left).clone()),
                    new_right.unwrap_or_else(|| (**right).clone()),
                ))
            },
        }
    }

    /// Applies the rule to every child, returning the rewritten child list iff at least one
    /// child changed.
    fn apply_to_children(&self, children: &[Expr]) -> Option<Vec<Expr>> {
        let mut rewritten = Vec::with_capacity(children.len());
        let mut changed = false;
        for child in children {
            match self.try_apply(child) {
                Some(new_child) => {
                    rewritten.push(new_child);
                    changed = true;
                },
                None => rewritten.push(child.clone()),
            }
        }
        changed.then_some(rewritten)
    }
}

/// Drives an ordered rule list to a fixed point.
#[derive(Debug)]
pub struct Rewriter {
    rules: Vec<Rule>,
}

impl Rewriter {
    /// Creates a rewriter over the given rules. Order matters: earlier rules take priority on
    /// every scan.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The rules in scan order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Normalizes `expr` with the default iteration cap of [`DEFAULT_MAX_ITERS`].
    pub fn normalize(&self, expr: &Expr) -> Expr {
        self.run(expr, DEFAULT_MAX_ITERS).0
    }

    /// Normalizes `expr`, giving up after `max_iters` outer iterations.
    ///
    /// Hitting the cap is not an error: the current expression is returned as-is, and potential
    /// non-termination of the rule set is the caller's risk.
    pub fn normalize_capped(&self, expr: &Expr, max_iters: usize) -> Expr {
        self.run(expr, max_iters).0
    }

    /// Normalizes `expr` and also returns the names of the rules applied, in order.
    pub fn normalize_with_trace(&self, expr: &Expr) -> (Expr, Vec<&'static str>) {
        self.run(expr, DEFAULT_MAX_ITERS)
    }

    /// The normalization loop: an explicit iteration counter rather than recursion, so the
    /// stack does not grow with `max_iters`.
    fn run(&self, expr: &Expr, max_iters: usize) -> (Expr, Vec<&'static str>) {
        let mut current = expr.clone();
        let mut trace = Vec::new();
        for _ in 0..max_iters {
            let mut changed = false;
            for rule in &self.rules {
                if let Some(next) = rule.try_apply(&current) {
                    // a rule that fires but reproduces the current expression does not count
                    // as progress; otherwise antisymmetry would loop forever on ordered
                    // commutators
                    if next != current {
                        trace.push(rule.name);
                        current = next;
                        changed = true;
                        break;
                    }
                }
            }
            if !changed {
                // fixed point: one full pass over all rules produced no applicable change
                break;
            }
        }
        (current, trace)
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::Expr;
    use pretty_assertions::assert_eq;
    use super::rules::default_rewriter;
    use super::*;

    #[test]
    fn wildcard_matching_is_consistent() {
        let x = Expr::atom("x");
        let y = Expr::atom("y");
        let pattern = Expr::commutator(
            Expr::wildcard("a"),
            Expr::sum(vec![Expr::wildcard("b"), Expr::wildcard("c")]),
        );
        let expr = Expr::commutator(x.clone(), Expr::sum(vec![y.clone(), x.clone()]));

        let env = match_pattern(&pattern, &expr).unwrap();
        assert_eq!(env["a"], x);
        assert_eq!(env["b"], y);
        assert_eq!(env["c"], x);
    }

    #[test]
    fn repeated_wildcard_requires_equal_bindings() {
        let pattern = Expr::sum(vec![Expr::wildcard("a"), Expr::wildcard("a")]);
        let same = Expr::sum(vec![Expr::atom("x"), Expr::atom("x")]);
        let different = Expr::sum(vec![Expr::atom("x"), Expr::atom("y")]);

        assert!(match_pattern(&pattern, &same).is_some());
        assert_eq!(match_pattern(&pattern, &different), None);
    }

    #[test]
    fn sum_matching_is_positional_only() {
        let pattern = Expr::sum(vec![Expr::wildcard("a"), Expr::wildcard("b")]);
        let expr = Expr::sum(vec![Expr::atom("y"), Expr::atom("x")]);

        // the only solution is the positional zip; there is no permutation search
        let env = match_pattern(&pattern, &expr).unwrap();
        assert_eq!(env["a"], Expr::atom("y"));
        assert_eq!(env["b"], Expr::atom("x"));
    }

    #[test]
    fn mismatched_kinds_and_arities_fail() {
        let pattern = Expr::sum(vec![Expr::wildcard("a"), Expr::wildcard("b")]);
        assert_eq!(match_pattern(&pattern, &Expr::product(vec![
            Expr::atom("x"),
            Expr::atom("y"),
        ])), None);
        assert_eq!(match_pattern(&pattern, &Expr::sum(vec![
            Expr::atom("x"),
            Expr::atom("y"),
            Expr::atom("z"),
        ])), None);
        assert_eq!(match_pattern(&Expr::atom("x"), &Expr::atom("y")), None);
    }

    #[test]
    fn substitute_reports_unbound_wildcards() {
        let mut env = Bindings::new();
        env.insert("x".to_string(), Expr::atom("a"));

        let template = Expr::commutator(Expr::wildcard("x"), Expr::wildcard("z"));
        assert_eq!(
            substitute(&template, &env),
            Err(UnboundWildcard("z".to_string())),
        );

        let bound = Expr::coproduct(Expr::wildcard("x"));
        assert_eq!(substitute(&bound, &env), Ok(Expr::coproduct(Expr::atom("a"))));
    }

    #[test]
    fn substitution_reflattens_sums() {
        let mut env = Bindings::new();
        env.insert(
            "x".to_string(),
            Expr::sum(vec![Expr::atom("a"), Expr::atom("b")]),
        );

        let template = Expr::sum(vec![Expr::wildcard("x"), Expr::atom("c")]);
        let result = substitute(&template, &env).unwrap();
        assert_eq!(result, Expr::Sum(vec![
            Expr::atom("a"),
            Expr::atom("b"),
            Expr::atom("c"),
        ]));
    }

    #[test]
    fn normalize_distributes_and_orders_commutators() {
        let expr = Expr::commutator(
            Expr::atom("h"),
            Expr::sum(vec![Expr::atom("e"), Expr::atom("f")]),
        );
        let (out, trace) = default_rewriter().normalize_with_trace(&expr);

        let terms = match &out {
            Expr::Sum(terms) => terms,
            other => panic!("expected a Sum, got {}", other),
        };
        assert_eq!(terms.len(), 2);

        // "h" > "e" and "h" > "f", so both commutators come out flipped
        let rendered = terms.iter().map(|term| term.to_string()).collect::<Vec<_>>();
        assert!(rendered.iter().any(|s| s.contains("[e,h]")));
        assert!(rendered.iter().any(|s| s.contains("[f,h]")));
        assert_eq!(out.to_string(), "((-1 * [e,h]) + (-1 * [f,h]))");

        assert_eq!(trace, vec![
            "commutator-right-linearity",
            "commutator-antisymmetry",
        ]);
    }

    #[test]
    fn normalize_distributes_deeply() {
        let nested = Expr::commutator(
            Expr::sum(vec![Expr::atom("h"), Expr::atom("e")]),
            Expr::sum(vec![Expr::atom("f"), Expr::atom("h")]),
        );
        let out = default_rewriter().normalize(&nested);

        let terms = match &out {
            Expr::Sum(terms) => terms,
            other => panic!("expected a Sum, got {}", other),
        };
        assert_eq!(terms.len(), 4);
    }

    #[test]
    fn coproduct_is_untouched_by_default_rules() {
        let expr = Expr::coproduct(Expr::atom("x"));
        let out = default_rewriter().normalize(&expr);
        assert_eq!(out, expr);
    }

    #[test]
    fn cyclic_rule_set_stops_at_the_cap() {
        let rewriter = Rewriter::new(vec![
            Rule::template("a-to-b", Expr::atom("a"), Expr::atom("b")),
            Rule::template("b-to-a", Expr::atom("b"), Expr::atom("a")),
        ]);

        // every iteration flips the atom, so the cap's parity decides the output
        assert_eq!(rewriter.normalize_capped(&Expr::atom("a"), 3), Expr::atom("b"));
        assert_eq!(rewriter.normalize_capped(&Expr::atom("a"), 4), Expr::atom("a"));
        assert_eq!(rewriter.normalize(&Expr::atom("a")), Expr::atom("a"));
    }

    #[test]
    #[should_panic(expected = "never binds")]
    fn template_with_unbound_rhs_wildcard_panics_when_fired() {
        let rule = Rule::template(
            "broken",
            Expr::wildcard("x"),
            Expr::commutator(Expr::wildcard("x"), Expr::wildcard("y")),
        );
        rule.try_apply(&Expr::atom("a"));
    }
}
