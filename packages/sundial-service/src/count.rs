use sqlx::{Postgres, QueryBuilder};

use crate::{
	ListQuery, Result, SundialService,
	filter::{CompiledFilter, ConditionWriter},
	search,
};

impl SundialService {
	/// Counts the records the same query would list; sorting and pagination
	/// do not apply.
	pub async fn get_count(&self, query: ListQuery) -> Result<i64> {
		let filter = self.effective_filter(&query.filter);
		let compiled = CompiledFilter::compile(&filter);
		let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM salary_records");
		let mut conditions = ConditionWriter::new();

		compiled.push_conditions(&mut builder, &mut conditions);

		if search::is_active(&query.search) {
			search::push_match_condition(&mut builder, &mut conditions, &query.search);
		}

		let count: i64 = builder.build_query_scalar().fetch_one(&self.db.pool).await?;

		Ok(count)
	}
}
