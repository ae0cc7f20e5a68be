use serde_json::Value;

/// Coerces a loosely-typed wire value into a strict boolean.
///
/// Only four values count as `true`: the boolean `true`, the number `1`, and
/// the strings `"true"` and `"1"`. Everything else, including a missing value
/// (`null`), `0`, `"false"` and `"TRUE"`, is `false`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use shelf_model::normalize_flag;
///
/// assert!(normalize_flag(&json!("1")));
/// assert!(!normalize_flag(&json!("yes")));
/// ```
pub fn normalize_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(s.as_str(), "true" | "1"),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!("true"), true)]
    #[case(json!(1), true)]
    #[case(json!(1.0), true)]
    #[case(json!("1"), true)]
    #[case(json!(false), false)]
    #[case(json!("false"), false)]
    #[case(json!(0), false)]
    #[case(json!("0"), false)]
    #[case(json!(2), false)]
    #[case(json!("TRUE"), false)]
    #[case(json!(" true"), false)]
    #[case(json!(null), false)]
    #[case(json!([true]), false)]
    #[case(json!({"read": true}), false)]
    fn test_normalize_flag(#[case] input: Value, #[case] expected: bool) {
        assert_eq!(normalize_flag(&input), expected);
    }

    #[rstest]
    #[case(json!("1"))]
    #[case(json!(0))]
    #[case(json!(null))]
    #[case(json!("nope"))]
    #[case(json!(true))]
    fn test_normalize_flag_is_idempotent(#[case] input: Value) {
        let once = normalize_flag(&input);
        assert_eq!(normalize_flag(&Value::Bool(once)), once);
    }
}
