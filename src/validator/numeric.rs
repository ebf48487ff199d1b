use serde_json::Value;

use super::IssueCode;
use crate::raw::RawProp;

/// Numeric reading of a content value. Numeric strings count as numbers,
/// since form posts deliver everything as text.
pub fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

/// JSON has one number type; `integer` means "no fractional part".
pub fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Breach {
    pub code: IssueCode,
    /// Completes "Field 'x' must be ...".
    pub requirement: String,
    pub bound: f64,
}

/// Every numeric keyword on `prop` that `n` violates, in keyword order.
pub fn breaches(n: f64, prop: RawProp<'_>) -> Vec<Breach> {
    let mut out = Vec::new();
    let mut check = |key: &str, code: IssueCode, words: &str, fails: fn(f64, f64) -> bool| {
        if let Some(bound) = prop.num(key) {
            if fails(n, bound) {
                out.push(Breach { code, requirement: format!("{words} {bound:.2}"), bound });
            }
        }
    };

    check("minimum", IssueCode::Minimum, "at least", |n, b| n < b);
    check("maximum", IssueCode::Maximum, "at most", |n, b| n > b);
    check("exclusiveMinimum", IssueCode::ExclusiveMinimum, "greater than", |n, b| n <= b);
    check("exclusiveMaximum", IssueCode::ExclusiveMaximum, "less than", |n, b| n >= b);
    // Float quotient compared against its integer part; not exact for
    // decimal steps like 0.1.
    check("multipleOf", IssueCode::MultipleOf, "a multiple of", |n, b| b > 0.0 && (n / b).fract() != 0.0);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codes(n: f64, schema: Value) -> Vec<IssueCode> {
        breaches(n, RawProp::of(&schema).unwrap()).into_iter().map(|b| b.code).collect()
    }

    #[test]
    fn inclusive_bounds() {
        let s = json!({"minimum": 1, "maximum": 10});
        assert!(codes(1.0, s.clone()).is_empty());
        assert!(codes(10.0, s.clone()).is_empty());
        assert_eq!(codes(0.5, s.clone()), vec![IssueCode::Minimum]);
        assert_eq!(codes(11.0, s), vec![IssueCode::Maximum]);
    }

    #[test]
    fn exclusive_bounds_are_strict() {
        let s = json!({"exclusiveMinimum": 0, "exclusiveMaximum": 1});
        assert_eq!(codes(0.0, s.clone()), vec![IssueCode::ExclusiveMinimum]);
        assert_eq!(codes(1.0, s.clone()), vec![IssueCode::ExclusiveMaximum]);
        assert!(codes(0.5, s).is_empty());
    }

    #[test]
    fn multiple_of() {
        let s = json!({"multipleOf": 5});
        assert!(codes(15.0, s.clone()).is_empty());
        assert_eq!(codes(12.0, s), vec![IssueCode::MultipleOf]);
        assert!(codes(1.5, json!({"multipleOf": 0.5})).is_empty());
        // non-positive divisors are ignored
        assert!(codes(3.0, json!({"multipleOf": 0})).is_empty());
    }

    #[test]
    fn requirement_text_uses_two_decimals() {
        let b = breaches(0.0, RawProp::of(&json!({"minimum": 1})).unwrap());
        assert_eq!(b[0].requirement, "at least 1.00");
    }

    #[test]
    fn coercion_accepts_numeric_strings_only() {
        assert_eq!(coerce(&json!(3)), Some(3.0));
        assert_eq!(coerce(&json!("2.5")), Some(2.5));
        assert_eq!(coerce(&json!("two")), None);
        assert_eq!(coerce(&json!(true)), None);
        assert!(is_integral(4.0));
        assert!(!is_integral(4.2));
        assert!(!is_integral(f64::NAN));
    }
}
