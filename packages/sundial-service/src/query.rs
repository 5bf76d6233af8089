use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_START: i64 = 0;
pub const DEFAULT_SORT_FIELD: &str = "year";
pub const DEFAULT_SORT_ORDER: &str = "descending";

/// One read request as the client declared it. Scalar fields arrive through
/// URL query parameters and are parsed leniently at the HTTP edge; the filter
/// arrives as URL-encoded JSON and is decoded leniently here. Nothing in a
/// query is trusted until it has passed through the planners.
#[derive(Clone, Debug, Serialize)]
pub struct ListQuery {
	pub limit: i64,
	pub start: i64,
	pub filter: Filter,
	pub search: String,
	pub sort_field: String,
	pub sort_order: String,
}
impl Default for ListQuery {
	fn default() -> Self {
		Self {
			limit: DEFAULT_LIMIT,
			start: DEFAULT_START,
			filter: Filter::default(),
			search: String::new(),
			sort_field: DEFAULT_SORT_FIELD.to_string(),
			sort_order: DEFAULT_SORT_ORDER.to_string(),
		}
	}
}

/// The declarative filter shape. Every field decodes leniently: a value of
/// the wrong type degrades to "no restriction" instead of failing the
/// request, which is the externally observable contract.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Filter {
	#[serde(deserialize_with = "lenient_string_list")]
	pub provinces: Option<Vec<String>>,
	#[serde(deserialize_with = "lenient_int")]
	pub min_year: Option<i32>,
	#[serde(deserialize_with = "lenient_int")]
	pub max_year: Option<i32>,
	#[serde(deserialize_with = "lenient_float")]
	pub min_salary: Option<f64>,
	#[serde(deserialize_with = "lenient_float")]
	pub max_salary: Option<f64>,
	#[serde(deserialize_with = "lenient_text_filters")]
	pub text_filters: Vec<TextFilterSpec>,
}

/// A raw text predicate as sent by the client. Validation happens in the
/// filter compiler, which either admits the entry or records why it was
/// ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextFilterSpec {
	pub field: Option<String>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub text: Option<String>,
}

/// Lenient integer parsing for URL parameters: plain integers, or numeric
/// text truncated toward zero. Anything else is None.
pub fn parse_integer(raw: &str) -> Option<i64> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return None;
	}

	trimmed.parse::<i64>().ok().or_else(|| {
		trimmed.parse::<f64>().ok().filter(|value| value.is_finite()).map(|value| value.trunc() as i64)
	})
}

pub(crate) fn integer_value(raw: &Value) -> Option<i32> {
	let wide = match raw {
		Value::Number(number) =>
			number.as_i64().or_else(|| number.as_f64().map(|value| value.trunc() as i64)),
		Value::String(text) => parse_integer(text),
		_ => None,
	};

	wide.and_then(|value| i32::try_from(value).ok())
}

pub(crate) fn float_value(raw: &Value) -> Option<f64> {
	match raw {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => text.trim().parse::<f64>().ok(),
		_ => None,
	}
	.filter(|value| value.is_finite())
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(raw.as_ref().and_then(integer_value))
}

fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(raw.as_ref().and_then(float_value))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(raw.and_then(|value| match value {
		Value::Array(items) => Some(
			items
				.into_iter()
				.filter_map(|item| match item {
					Value::String(text) => Some(text),
					_ => None,
				})
				.collect(),
		),
		_ => None,
	}))
}

fn lenient_text_filters<'de, D>(deserializer: D) -> Result<Vec<TextFilterSpec>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;

	Ok(match raw {
		Some(Value::Array(items)) => items
			.into_iter()
			.map(|item| serde_json::from_value(item).unwrap_or_default())
			.collect(),
		_ => Vec::new(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn filter_decodes_camel_case_fields() {
		let filter: Filter = serde_json::from_str(
			r#"{"provinces": ["ontario"], "minYear": 2015, "maxSalary": 250000.5}"#,
		)
		.expect("valid filter");

		assert_eq!(filter.provinces, Some(vec!["ontario".to_string()]));
		assert_eq!(filter.min_year, Some(2015));
		assert_eq!(filter.max_year, None);
		assert_eq!(filter.max_salary, Some(250_000.5));
	}

	#[test]
	fn filter_accepts_numeric_text_bounds() {
		let filter: Filter =
			serde_json::from_str(r#"{"minYear": "2015", "minSalary": "100000"}"#).expect("valid filter");

		assert_eq!(filter.min_year, Some(2015));
		assert_eq!(filter.min_salary, Some(100_000.0));
	}

	#[test]
	fn filter_degrades_garbage_to_no_restriction() {
		let filter: Filter = serde_json::from_str(
			r#"{"provinces": "ontario", "minYear": "later", "maxSalary": {}, "textFilters": 7}"#,
		)
		.expect("valid filter");

		assert_eq!(filter, Filter::default());
	}

	#[test]
	fn malformed_text_filter_entries_survive_decoding() {
		let filter: Filter = serde_json::from_str(
			r#"{"textFilters": [{"field": "employer", "type": "includes", "text": "Hydro"}, {"field": 7}]}"#,
		)
		.expect("valid filter");

		assert_eq!(filter.text_filters.len(), 2);
		assert_eq!(filter.text_filters[0].field.as_deref(), Some("employer"));
		assert_eq!(filter.text_filters[1], TextFilterSpec::default());
	}

	#[test]
	fn parse_integer_is_lenient() {
		assert_eq!(parse_integer("25"), Some(25));
		assert_eq!(parse_integer(" 10.9 "), Some(10));
		assert_eq!(parse_integer("-3"), Some(-3));
		assert_eq!(parse_integer("ten"), None);
		assert_eq!(parse_integer(""), None);
	}
}
