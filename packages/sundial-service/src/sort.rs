use sqlx::{Postgres, QueryBuilder};
use tracing::debug;

use sundial_domain::field::RecordField;

/// Sort direction. Parsing is closed-list-allow, open-list-deny: exactly the
/// four spellings below sort ascending and every other value sorts
/// descending. This is the externally observed contract, not a validated
/// enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
	Ascending,
	Descending,
}
impl SortOrder {
	pub fn parse(raw: &str) -> Self {
		match raw {
			"asc" | "ascending" | "1" | "true" => Self::Ascending,
			_ => Self::Descending,
		}
	}

	pub(crate) fn sql(self) -> &'static str {
		match self {
			Self::Ascending => "ASC",
			Self::Descending => "DESC",
		}
	}
}

/// Resolves the requested sort key through the field allowlist; an unknown
/// name degrades to the default key rather than erroring.
pub(crate) fn resolve_sort_field(raw: &str) -> RecordField {
	match RecordField::parse(raw) {
		Some(field) => field,
		None => {
			debug!(field = raw, "Unknown sort field; sorting by year.");

			RecordField::Year
		},
	}
}

/// Relevance always outranks the requested field when a search is active;
/// `record_id` is the final tie-break so pagination is deterministic.
pub(crate) fn push_order_by(
	builder: &mut QueryBuilder<'_, Postgres>,
	search_active: bool,
	field: RecordField,
	order: SortOrder,
) {
	builder.push(" ORDER BY ");

	if search_active {
		builder.push("score DESC, ");
	}

	builder.push(field.column());
	builder.push(" ");
	builder.push(order.sql());
	builder.push(", record_id");
}

/// Pagination applies after sorting. Negative inputs clamp to zero; lenient
/// parsing of the raw parameters happens at the HTTP edge.
pub(crate) fn push_page(builder: &mut QueryBuilder<'_, Postgres>, limit: i64, start: i64) {
	builder.push(" LIMIT ");
	builder.push_bind(limit.max(0));
	builder.push(" OFFSET ");
	builder.push_bind(start.max(0));
}
