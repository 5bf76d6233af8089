use sqlx::{Postgres, QueryBuilder};
use tracing::debug;

use sundial_storage::models::SalaryRecord;

use crate::{
	ListQuery, Result, SortOrder, SundialService,
	filter::{CompiledFilter, ConditionWriter},
	search, sort,
};

pub(crate) const SELECT_RECORD_COLUMNS: &str = "\
SELECT record_id, first_name, last_name, sector, salary, taxable_benefits, employer, title, \
province, year, position_class, severance, original, dataset, ingested_at";

/// The client-facing shape of one record. `dataset` and the transient
/// relevance score have no field here, so they cannot leak by accident.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub sector: Option<String>,
	pub salary: Option<f64>,
	pub taxable_benefits: Option<f64>,
	pub employer: Option<String>,
	pub title: Option<String>,
	pub province: Option<String>,
	pub year: Option<i32>,
	pub position_class: Option<String>,
	pub severance: Option<String>,
	pub original: Option<serde_json::Value>,
}
impl RecordView {
	pub(crate) fn from_record(record: SalaryRecord) -> Self {
		Self {
			first_name: record.first_name,
			last_name: record.last_name,
			sector: record.sector,
			salary: record.salary,
			taxable_benefits: record.taxable_benefits,
			employer: record.employer,
			title: record.title,
			province: record.province,
			year: record.year,
			position_class: record.position_class,
			severance: record.severance,
			original: record.original,
		}
	}
}

impl SundialService {
	pub async fn get_list(&self, query: ListQuery) -> Result<Vec<RecordView>> {
		let search_active = search::is_active(&query.search);
		let mut builder = self.record_query(&query);

		sort::push_order_by(
			&mut builder,
			search_active,
			sort::resolve_sort_field(&query.sort_field),
			SortOrder::parse(&query.sort_order),
		);
		sort::push_page(&mut builder, query.limit, query.start);

		let records: Vec<SalaryRecord> = builder.build_query_as().fetch_all(&self.db.pool).await?;

		Ok(records.into_iter().map(RecordView::from_record).collect())
	}

	/// The shared head of every record-returning query: column selection, the
	/// optional relevance score, and the compiled filter plus full-text
	/// conditions. Ordering and pagination are the caller's concern.
	pub(crate) fn record_query(&self, query: &ListQuery) -> QueryBuilder<'static, Postgres> {
		let filter = self.effective_filter(&query.filter);
		let compiled = CompiledFilter::compile(&filter);

		if !compiled.ignored.is_empty() {
			debug!(ignored = ?compiled.ignored, "Ignoring malformed text filters.");
		}

		let search_active = search::is_active(&query.search);
		let mut builder = QueryBuilder::new(SELECT_RECORD_COLUMNS);

		if search_active {
			search::push_rank_selection(&mut builder, &query.search);
		}

		builder.push(" FROM salary_records");

		let mut conditions = ConditionWriter::new();

		compiled.push_conditions(&mut builder, &mut conditions);

		if search_active {
			search::push_match_condition(&mut builder, &mut conditions, &query.search);
		}

		builder
	}
}
