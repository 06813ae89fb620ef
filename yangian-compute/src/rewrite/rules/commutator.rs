//! Rewrite rules for the commutator: linearity over sums and canonical antisymmetric ordering.

use crate::expr::Expr;
use crate::rewrite::{Bindings, Rule};

/// `[x, y + z] = [x,y] + [x,z]`
pub fn right_linearity() -> Rule {
    Rule::template(
        "commutator-right-linearity",
        Expr::commutator(
            Expr::wildcard("x"),
            Expr::sum(vec![Expr::wildcard("y"), Expr::wildcard("z")]),
        ),
        Expr::sum(vec![
            Expr::commutator(Expr::wildcard("x"), Expr::wildcard("y")),
            Expr::commutator(Expr::wildcard("x"), Expr::wildcard("z")),
        ]),
    )
}

/// `[x + y, z] = [x,z] + [y,z]`
pub fn left_linearity() -> Rule {
    Rule::template(
        "commutator-left-linearity",
        Expr::commutator(
            Expr::sum(vec![Expr::wildcard("x"), Expr::wildcard("y")]),
            Expr::wildcard("z"),
        ),
        Expr::sum(vec![
            Expr::commutator(Expr::wildcard("x"), Expr::wildcard("z")),
            Expr::commutator(Expr::wildcard("y"), Expr::wildcard("z")),
        ]),
    )
}

/// `[x,y] = -1 * [y,x]` when the rendering of `x` sorts after that of `y`.
///
/// The lexicographic order on rendered text is the sole tie-break: a commutator whose operands
/// are already in order is rebuilt unchanged, which the rewrite engine treats as "no change", so
/// repeated application cannot oscillate.
pub fn antisymmetry() -> Rule {
    Rule::new(
        "commutator-antisymmetry",
        Expr::commutator(Expr::wildcard("x"), Expr::wildcard("y")),
        |env: &Bindings| {
            let (x, y) = (&env["x"], &env["y"]);
            if x.to_string() <= y.to_string() {
                Expr::commutator(x.clone(), y.clone())
            } else {
                Expr::product(vec![
                    Expr::atom("-1"),
                    Expr::commutator(y.clone(), x.clone()),
                ])
            }
        },
    )
}

/// All commutator rules, in priority order: sums must be distributed before operands are put
/// into canonical order.
pub fn all() -> Vec<Rule> {
    vec![right_linearity(), left_linearity(), antisymmetry()]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn right_linearity_distributes_over_two_term_sums() {
        let rule = right_linearity();
        let expr = Expr::commutator(
            Expr::atom("a"),
            Expr::sum(vec![Expr::atom("b"), Expr::atom("c")]),
        );
        let out = rule.try_apply(&expr).unwrap();
        assert_eq!(out.to_string(), "([a,b] + [a,c])");

        // a three-term sum is not the two-term pattern
        let wider = Expr::commutator(
            Expr::atom("a"),
            Expr::sum(vec![Expr::atom("b"), Expr::atom("c"), Expr::atom("d")]),
        );
        assert_eq!(rule.try_apply(&wider), None);
    }

    #[test]
    fn left_linearity_distributes_over_two_term_sums() {
        let rule = left_linearity();
        let expr = Expr::commutator(
            Expr::sum(vec![Expr::atom("a"), Expr::atom("b")]),
            Expr::atom("c"),
        );
        let out = rule.try_apply(&expr).unwrap();
        assert_eq!(out.to_string(), "([a,c] + [b,c])");
    }

    #[test]
    fn antisymmetry_flips_out_of_order_operands() {
        let rule = antisymmetry();
        let expr = Expr::commutator(Expr::atom("h"), Expr::atom("e"));
        let out = rule.try_apply(&expr).unwrap();
        assert_eq!(out.to_string(), "(-1 * [e,h])");
    }

    #[test]
    fn antisymmetry_is_a_fixed_point_on_ordered_operands() {
        let rule = antisymmetry();
        let ordered = [
            Expr::commutator(Expr::atom("a"), Expr::atom("b")),
            Expr::commutator(Expr::atom("e"), Expr::atom("h")),
            Expr::commutator(Expr::atom("x"), Expr::atom("x")),
            // "(b + c)" sorts before "z", so the composite operand is already in order
            Expr::commutator(
                Expr::sum(vec![Expr::atom("b"), Expr::atom("c")]),
                Expr::atom("z"),
            ),
        ];

        for expr in ordered {
            // the rule fires (its pattern matches every commutator) but must reproduce the
            // input, repeatedly
            let mut current = expr.clone();
            for _ in 0..5 {
                current = rule.try_apply(&current).unwrap();
                assert_eq!(current, expr);
            }
        }
    }

    #[test]
    fn antisymmetry_flip_is_itself_a_fixed_point() {
        let rule = antisymmetry();
        let expr = Expr::commutator(Expr::atom("y"), Expr::atom("x"));

        let flipped = rule.try_apply(&expr).unwrap();
        assert_eq!(flipped.to_string(), "(-1 * [x,y])");

        // descending into the product finds an ordered commutator and leaves it alone
        let again = rule.try_apply(&flipped).unwrap();
        assert_eq!(again, flipped);
    }
}
