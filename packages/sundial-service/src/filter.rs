use sqlx::{Postgres, QueryBuilder};

use sundial_domain::field::RecordField;

use crate::query::{Filter, TextFilterSpec};

/// One compiled restriction. The variants are a closed enumeration: every one
/// renders as a fixed SQL fragment with bound values, so no client-supplied
/// operator or identifier can reach the query text.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Predicate {
	ProvinceIn(Vec<String>),
	YearAtLeast(i32),
	YearAtMost(i32),
	SalaryAtLeast(f64),
	SalaryAtMost(f64),
	Text { field: RecordField, op: TextOp, text: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TextOp {
	Includes,
	NotIncludes,
	Matches,
	NotMatches,
}
impl TextOp {
	fn parse(raw: &str) -> Option<Self> {
		match raw.to_ascii_lowercase().as_str() {
			"includes" => Some(Self::Includes),
			"not_includes" => Some(Self::NotIncludes),
			"matches" => Some(Self::Matches),
			"not_matches" => Some(Self::NotMatches),
			_ => None,
		}
	}
}

/// A text filter the compiler refused, with the reason it was refused.
/// Compilation never fails; these are surfaced for debuggability while the
/// query proceeds without the entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct IgnoredPredicate {
	pub entry: TextFilterSpec,
	pub reason: IgnoredReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
	MissingType,
	UnknownType,
	MissingField,
	UnknownField,
}

/// Joins conditions with AND, emitting the WHERE keyword lazily so a query
/// with no restrictions carries no clause at all.
pub(crate) struct ConditionWriter {
	wrote: bool,
}
impl ConditionWriter {
	pub(crate) fn new() -> Self {
		Self { wrote: false }
	}

	pub(crate) fn begin(&mut self, builder: &mut QueryBuilder<'_, Postgres>) {
		builder.push(if self.wrote { " AND " } else { " WHERE " });

		self.wrote = true;
	}
}

pub(crate) struct CompiledFilter {
	predicates: Vec<Predicate>,
	pub(crate) ignored: Vec<IgnoredPredicate>,
}
impl CompiledFilter {
	pub(crate) fn compile(filter: &Filter) -> Self {
		let mut predicates = Vec::new();
		let mut ignored = Vec::new();

		if let Some(provinces) = &filter.provinces
			&& !provinces.is_empty()
		{
			predicates.push(Predicate::ProvinceIn(provinces.clone()));
		}

		// A bound of zero counts as absent. Years are never zero and a zero
		// salary floor restricts nothing, so the quirk is harmless to keep.
		if let Some(min_year) = filter.min_year.filter(|value| *value != 0) {
			predicates.push(Predicate::YearAtLeast(min_year));
		}
		if let Some(max_year) = filter.max_year.filter(|value| *value != 0) {
			predicates.push(Predicate::YearAtMost(max_year));
		}
		if let Some(min_salary) = filter.min_salary.filter(|value| *value != 0.0) {
			predicates.push(Predicate::SalaryAtLeast(min_salary));
		}
		if let Some(max_salary) = filter.max_salary.filter(|value| *value != 0.0) {
			predicates.push(Predicate::SalaryAtMost(max_salary));
		}

		for entry in &filter.text_filters {
			match compile_text_filter(entry) {
				Ok(predicate) => predicates.push(predicate),
				Err(reason) => ignored.push(IgnoredPredicate { entry: entry.clone(), reason }),
			}
		}

		Self { predicates, ignored }
	}

	pub(crate) fn push_conditions(
		&self,
		builder: &mut QueryBuilder<'_, Postgres>,
		conditions: &mut ConditionWriter,
	) {
		for predicate in &self.predicates {
			conditions.begin(builder);

			match predicate {
				Predicate::ProvinceIn(provinces) => {
					builder.push("province = ANY(");
					builder.push_bind(provinces.clone());
					builder.push(")");
				},
				Predicate::YearAtLeast(value) => {
					builder.push("year >= ");
					builder.push_bind(*value);
				},
				Predicate::YearAtMost(value) => {
					builder.push("year <= ");
					builder.push_bind(*value);
				},
				Predicate::SalaryAtLeast(value) => {
					builder.push("salary >= ");
					builder.push_bind(*value);
				},
				Predicate::SalaryAtMost(value) => {
					builder.push("salary <= ");
					builder.push_bind(*value);
				},
				Predicate::Text { field, op, text } => push_text_condition(builder, *field, *op, text),
			}
		}
	}
}

fn compile_text_filter(entry: &TextFilterSpec) -> Result<Predicate, IgnoredReason> {
	let Some(kind) = entry.kind.as_deref() else {
		return Err(IgnoredReason::MissingType);
	};
	let Some(op) = TextOp::parse(kind) else {
		return Err(IgnoredReason::UnknownType);
	};
	let field_name = entry.field.as_deref().unwrap_or("");

	if field_name.is_empty() {
		return Err(IgnoredReason::MissingField);
	}

	let Some(field) = RecordField::parse(field_name) else {
		return Err(IgnoredReason::UnknownField);
	};

	Ok(Predicate::Text { field, op, text: entry.text.clone().unwrap_or_default() })
}

fn push_text_condition(
	builder: &mut QueryBuilder<'_, Postgres>,
	field: RecordField,
	op: TextOp,
	text: &str,
) {
	// Negated operators must admit rows where the field is absent, so the
	// inner match is coalesced to FALSE before negation.
	match op {
		TextOp::Includes => {
			builder.push("COALESCE(");
			push_column_text(builder, field);
			builder.push(" ILIKE ");
			builder.push_bind(like_pattern(text));
			builder.push(" ESCAPE '\\', FALSE)");
		},
		TextOp::NotIncludes => {
			builder.push("NOT COALESCE(");
			push_column_text(builder, field);
			builder.push(" ILIKE ");
			builder.push_bind(like_pattern(text));
			builder.push(" ESCAPE '\\', FALSE)");
		},
		TextOp::Matches => {
			builder.push("LOWER(");
			push_column_text(builder, field);
			builder.push(") = LOWER(");
			builder.push_bind(text.to_string());
			builder.push(")");
		},
		TextOp::NotMatches => {
			builder.push("NOT COALESCE(LOWER(");
			push_column_text(builder, field);
			builder.push(") = LOWER(");
			builder.push_bind(text.to_string());
			builder.push("), FALSE)");
		},
	}
}

fn push_column_text(builder: &mut QueryBuilder<'_, Postgres>, field: RecordField) {
	builder.push(field.column());

	if !field.is_textual() {
		builder.push("::text");
	}
}

/// Escapes LIKE metacharacters in client text, then wraps it for a substring
/// match. The pattern is always bound, never inlined.
fn like_pattern(text: &str) -> String {
	let mut pattern = String::with_capacity(text.len() + 2);

	pattern.push('%');

	for c in text.chars() {
		if matches!(c, '\\' | '%' | '_') {
			pattern.push('\\');
		}

		pattern.push(c);
	}

	pattern.push('%');

	pattern
}
