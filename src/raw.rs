//! Read-only helpers over raw, JSON-decoded schema and content values.
//!
//! The validator and the form deriver both walk the raw schema rather than a
//! parsed tree; `RawProp` gives them typed accessors so neither has to repeat
//! the same `get(..).and_then(as_..)` probing at every keyword.
use serde_json::{Map, Value};

/// One schema property definition (a JSON object).
#[derive(Clone, Copy, Debug)]
pub struct RawProp<'a>(pub &'a Map<String, Value>);

impl<'a> RawProp<'a> {
    /// `None` when the definition is not an object; callers skip those.
    pub fn of(value: &'a Value) -> Option<Self> {
        value.as_object().map(RawProp)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.0.get(key)?.as_str()
    }

    /// Like [`RawProp::str`] but treats `""` as absent.
    pub fn non_empty_str(&self, key: &str) -> Option<&'a str> {
        self.str(key).filter(|s| !s.is_empty())
    }

    pub fn num(&self, key: &str) -> Option<f64> {
        self.0.get(key)?.as_f64()
    }

    /// A numeric keyword read as a whole count (fraction truncated, negatives clamp to 0).
    pub fn count(&self, key: &str) -> Option<u64> {
        self.num(key).map(|n| n as u64)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.0.get(key)?.as_bool()
    }

    pub fn list(&self, key: &str) -> Option<&'a Vec<Value>> {
        self.0.get(key)?.as_array()
    }

    pub fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.0.get(key)?.as_object()
    }

    pub fn type_name(&self) -> Option<&'a str> {
        self.str("type")
    }

    pub fn title(&self) -> &'a str {
        self.str("title").unwrap_or_default()
    }

    pub fn description(&self) -> &'a str {
        self.str("description").unwrap_or_default()
    }

    /// String entries of a `required` name list; non-strings are ignored.
    pub fn required_names(&self) -> Vec<String> {
        string_list(self.0.get("required"))
    }
}

pub fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|xs| xs.iter().filter_map(|x| x.as_str().map(str::to_owned)).collect())
        .unwrap_or_default()
}

/// Dot-join a parent path and a child name (`""` parent → bare name).
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}.{name}")
    }
}

/// JSON type name of a value, as used in `_root` type errors.
pub fn type_name_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a value the way a loose `%v` print would. Used for duplicate
/// detection in `uniqueItems` and for select options, so `1` and `"1"`
/// render identically on purpose.
///
/// Numbers always print as plain digits. Go's `%v` switches large floats to
/// exponent form (`1e+08`, `1e+21`); that is not reproduced, so option text
/// and duplicate checks stay readable for big integers.
pub fn render_display(value: &Value) -> String {
    match value {
        Value::Null => "<nil>".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(u)) => u.to_string(),
            (None, None) => n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string()),
        },
        Value::String(s) => s.clone(),
        Value::Array(xs) => {
            let parts: Vec<String> = xs.iter().map(render_display).collect();
            format!("[{}]", parts.join(" "))
        }
        Value::Object(m) => {
            let mut entries: Vec<(&String, &Value)> = m.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let parts: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{k}:{}", render_display(v)))
                .collect();
            format!("map[{}]", parts.join(" "))
        }
    }
}

/// Deep equality where numbers compare by value (`1 == 1.0`).
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm.iter().all(|(k, x)| ym.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

// Helper: prefer emitting integers when exact
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_collapses_number_and_string() {
        assert_eq!(render_display(&json!(1)), render_display(&json!("1")));
        assert_eq!(render_display(&json!(1.0)), "1");
        assert_eq!(render_display(&json!(2.5)), "2.5");
        assert_eq!(render_display(&json!(100000000)), "100000000");
        assert_eq!(render_display(&json!(1e21)), "1000000000000000000000");
        assert_eq!(render_display(&json!(null)), "<nil>");
    }

    #[test]
    fn display_of_containers() {
        assert_eq!(render_display(&json!([1, "a", true])), "[1 a true]");
        assert_eq!(render_display(&json!({"b": 2, "a": 1})), "map[a:1 b:2]");
    }

    #[test]
    fn equality_is_numeric_aware() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!([1]), &json!([1, 2])));
    }

    #[test]
    fn raw_prop_accessors() {
        let v = json!({"type": "string", "minLength": 3.9, "format": "", "required": ["a", 1, "b"]});
        let p = RawProp::of(&v).unwrap();
        assert_eq!(p.type_name(), Some("string"));
        assert_eq!(p.count("minLength"), Some(3));
        assert_eq!(p.non_empty_str("format"), None);
        assert_eq!(p.required_names(), vec!["a".to_string(), "b".to_string()]);
        assert!(RawProp::of(&json!("not a property")).is_none());
    }

    #[test]
    fn paths_join_with_dots() {
        assert_eq!(join_path("", "email"), "email");
        assert_eq!(join_path("contact", "email"), "contact.email");
    }
}
