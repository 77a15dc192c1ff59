use serde_json::Value;

use super::format_scalar;

/// Keys searched, in order, for the single headline value.
const PRIORITY_KEYS: [&str; 4] = [
    "monthly_interest_only_payment",
    "base_case_value",
    "formatted",
    "deposit",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, one level of
/// nesting deep, then falls back to the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", headline(result_obj));
}

fn headline(result: &Value) -> String {
    let Value::Object(map) = result else {
        return format_scalar(result);
    };

    for key in PRIORITY_KEYS {
        if let Some(val) = find_key(result, key) {
            return format_scalar(val);
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_scalar(val)),
        None => String::new(),
    }
}

/// The value under `key` at the top level or inside a direct child object,
/// skipping nulls and objects.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    let usable = |v: &&Value| !v.is_null() && !v.is_object();

    if let Some(v) = map.get(key).filter(usable) {
        return Some(v);
    }
    map.values()
        .filter_map(|child| child.as_object())
        .find_map(|child| child.get(key).filter(usable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_finds_nested_payment() {
        let result = json!({
            "input": { "purchase_price": "300000" },
            "result": { "deposit": "75000", "monthly_interest_only_payment": "937.5" },
            "formatted": { "monthly_interest_only_payment": "£938" }
        });
        // "formatted" sorts before "result", so the formatted figure wins
        assert_eq!(headline(&result), "£938");
    }

    #[test]
    fn test_headline_formatted_amount() {
        let result = json!({ "amount": "-1234.5", "currency": "GBP", "formatted": "-£1,235" });
        assert_eq!(headline(&result), "-£1,235");
    }

    #[test]
    fn test_headline_sensitivity() {
        let result = json!({ "base_case_value": "937.5", "matrix": [] });
        assert_eq!(headline(&result), "937.5");
    }
}
