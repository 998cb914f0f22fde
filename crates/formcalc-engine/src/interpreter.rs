//! Formula interpreter: walks the parsed AST against a flat variable
//! scope.
//!
//! The public contract is deliberately total: [`evaluate`] returns `0.0`
//! for empty input, malformed expressions (including expressions the
//! sanitizer mangled), unknown variables and non-finite results — it never
//! panics and never surfaces an error. Schema authors who need the
//! distinction can go through [`evaluate_checked`].

use formcalc_common::{EvalError, EvalErrorKind, coerce_number};
use formcalc_parse::{AstNode, BinaryOp, ParsingError, UnaryOp, parse};
use rustc_hash::FxHashMap;
use serde_json::Value;

/// Flat variable scope for one evaluation: name → JSON field value.
pub type Scope = FxHashMap<String, Value>;

/// Evaluate `expr` against `scope`, failing to `0.0`.
pub fn evaluate(expr: &str, scope: &Scope) -> f64 {
    evaluate_checked(expr, scope).unwrap_or(0.0)
}

/// Evaluate `expr` against `scope`, surfacing pipeline errors.
///
/// Unknown or missing variables still coerce to `0.0` (that is part of the
/// language, not an error); only unparseable input and non-finite results
/// are reported.
pub fn evaluate_checked(expr: &str, scope: &Scope) -> Result<f64, EvalError> {
    let ast = parse(expr).map_err(|e| match e {
        ParsingError::Tokenizer(t) => {
            EvalError::new(EvalErrorKind::Tokenize).with_message(t.to_string())
        }
        ParsingError::Parser(p) => EvalError::new(EvalErrorKind::Parse).with_message(p.to_string()),
    })?;

    let result = eval_node(&ast, scope);
    if result.is_finite() {
        Ok(result)
    } else {
        Err(EvalError::new(EvalErrorKind::Value).with_message("result is not a finite number"))
    }
}

fn eval_node(node: &AstNode, scope: &Scope) -> f64 {
    match node {
        AstNode::Literal(n) => *n,
        AstNode::Variable(name) => coerce_number(scope.get(name.as_str())),
        AstNode::UnaryOp { op, expr } => {
            let v = eval_node(expr, scope);
            match op {
                UnaryOp::Plus => v,
                UnaryOp::Neg => -v,
            }
        }
        AstNode::BinaryOp { op, left, right } => {
            let l = eval_node(left, scope);
            let r = eval_node(right, scope);
            // IEEE semantics throughout; division by zero produces an
            // infinity that the finiteness check at the top collapses to 0.
            match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div => l / r,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope(pairs: &[(&str, Value)]) -> Scope {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn arithmetic_is_correct() {
        let s = Scope::default();
        assert_eq!(evaluate("2 + 3 * 4", &s), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4", &s), 20.0);
        assert_eq!(evaluate("10 / 4", &s), 2.5);
        assert_eq!(evaluate("10 - 4 - 3", &s), 3.0);
        assert_eq!(evaluate("-2 * -3", &s), 6.0);
    }

    #[test]
    fn variables_resolve_from_scope() {
        let s = scope(&[("precio", json!(12.5)), ("cantidad", json!(4))]);
        assert_eq!(evaluate("precio * cantidad", &s), 50.0);
    }

    #[test]
    fn missing_variable_coerces_to_zero() {
        let s = scope(&[("a", json!(5))]);
        assert_eq!(evaluate("a + b", &s), 5.0);
    }

    #[test]
    fn string_and_null_values_coerce() {
        let s = scope(&[
            ("a", json!("7")),
            ("b", json!(null)),
            ("c", json!("")),
            ("d", json!(true)),
        ]);
        assert_eq!(evaluate("a + b + c + d", &s), 8.0);
    }

    #[test]
    fn malformed_input_fails_to_zero() {
        let s = Scope::default();
        assert_eq!(evaluate("", &s), 0.0);
        assert_eq!(evaluate("(1 + 2", &s), 0.0);
        assert_eq!(evaluate("1 +", &s), 0.0);
        assert_eq!(evaluate("1.2.3", &s), 0.0);
    }

    #[test]
    fn unsupported_operators_are_stripped_then_rejected() {
        // Known schema-authoring pitfall: `||` is not part of the
        // language; stripping leaves two adjacent operands, so the whole
        // expression safely evaluates to 0 regardless of scope.
        let s = scope(&[("pedidos", json!(7))]);
        assert_eq!(evaluate("(pedidos || 0) * 10", &s), 0.0);
        assert_eq!(evaluate("a > 3", &scope(&[("a", json!(5))])), 0.0);
    }

    #[test]
    fn non_finite_results_fail_to_zero() {
        let s = scope(&[("a", json!(1))]);
        assert_eq!(evaluate("a / 0", &s), 0.0);
        assert_eq!(evaluate("1 / 0", &s), 0.0);
    }

    #[test]
    fn checked_variant_reports_the_stage() {
        let s = Scope::default();
        assert_eq!(
            evaluate_checked("1 / 0", &s).unwrap_err().kind,
            EvalErrorKind::Value
        );
        assert_eq!(
            evaluate_checked("(a  b)", &s).unwrap_err().kind,
            EvalErrorKind::Parse
        );
        assert_eq!(evaluate_checked("a + 1", &s), Ok(1.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_panics_on_arbitrary_input(expr in ".{0,48}", a in -1e6f64..1e6) {
                let s = scope(&[("a", json!(a))]);
                let out = evaluate(&expr, &s);
                prop_assert!(out.is_finite());
            }

            #[test]
            fn sum_matches_ieee(a in -1e9f64..1e9, b in -1e9f64..1e9) {
                let s = scope(&[("a", json!(a)), ("b", json!(b))]);
                prop_assert_eq!(evaluate("a + b", &s), a + b);
            }

            #[test]
            fn precedence_matches_reference(a in -1e3f64..1e3, b in -1e3f64..1e3, c in -1e3f64..1e3) {
                let s = scope(&[("a", json!(a)), ("b", json!(b)), ("c", json!(c))]);
                prop_assert_eq!(evaluate("a + b * c", &s), a + b * c);
            }
        }
    }
}
