use serde_json::Value;

/// Parses a currency-formatted amount ("$1,234.50") into its numeric value.
/// `$` and `,` are stripped before parsing; anything else unparsable is None.
pub fn parse_amount(raw: &str) -> Option<f64> {
	let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
	let trimmed = cleaned.trim();

	if trimmed.is_empty() {
		return None;
	}

	trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Normalizes a raw salary-like value. Upstream sources deliver these either
/// as numbers or as currency-formatted text; numbers pass through untouched.
pub fn amount(raw: Option<&Value>) -> Option<f64> {
	match raw? {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => parse_amount(text),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn parses_currency_formatted_text() {
		assert_eq!(parse_amount("$1,234.50"), Some(1_234.5));
		assert_eq!(parse_amount("100000"), Some(100_000.0));
		assert_eq!(parse_amount(" $98,765 "), Some(98_765.0));
	}

	#[test]
	fn rejects_unparsable_text() {
		assert_eq!(parse_amount(""), None);
		assert_eq!(parse_amount("n/a"), None);
		assert_eq!(parse_amount("$"), None);
	}

	#[test]
	fn numbers_pass_through_untouched() {
		assert_eq!(amount(Some(&json!(1_234.5))), Some(1_234.5));
		assert_eq!(amount(Some(&json!("$1,234.50"))), Some(1_234.5));
		assert_eq!(amount(Some(&json!(null))), None);
		assert_eq!(amount(None), None);
	}
}
