use sqlx::{Postgres, QueryBuilder};

use crate::filter::ConditionWriter;

/// An empty search string bypasses full-text search entirely; the query is
/// predicate-only and no relevance score exists.
pub(crate) fn is_active(search: &str) -> bool {
	!search.is_empty()
}

/// Selects the transient relevance score. It exists only for ordering and is
/// never copied into a client-facing shape.
pub(crate) fn push_rank_selection(builder: &mut QueryBuilder<'_, Postgres>, search: &str) {
	builder.push(", ts_rank(textsearch, plainto_tsquery('english', ");
	builder.push_bind(search.to_string());
	builder.push(")) AS score");
}

pub(crate) fn push_match_condition(
	builder: &mut QueryBuilder<'_, Postgres>,
	conditions: &mut ConditionWriter,
	search: &str,
) {
	conditions.begin(builder);
	builder.push("textsearch @@ plainto_tsquery('english', ");
	builder.push_bind(search.to_string());
	builder.push(")");
}
