use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use sundial_domain::{currency, dataset};

use crate::{Result, SundialService, query};

// 15 bind parameters per row; stays well under the Postgres limit of 65535
// per statement.
const INSERT_CHUNK_ROWS: usize = 1_000;

/// One record as delivered by a provincial scrape. Salary-like values arrive
/// as numbers or currency-formatted text; the ingest path normalizes both.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRecord {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub sector: Option<String>,
	pub salary: Option<serde_json::Value>,
	pub taxable_benefits: Option<serde_json::Value>,
	pub employer: Option<String>,
	pub title: Option<String>,
	pub province: Option<String>,
	pub year: Option<serde_json::Value>,
	pub position_class: Option<String>,
	pub severance: Option<String>,
	pub original: Option<serde_json::Value>,
}

impl SundialService {
	/// Replaces every record of one dataset with the given batch. The delete
	/// and the inserts run in a single transaction, so readers observe the
	/// old set or the new set and nothing in between. An empty key or an
	/// empty batch is a no-op.
	pub async fn add_data(&self, dataset_key: &str, records: &[RawRecord]) -> Result<()> {
		let Some(dataset) = dataset::canonical_key(dataset_key) else {
			debug!("Skipping ingestion batch with an empty dataset key.");

			return Ok(());
		};

		if records.is_empty() {
			debug!(%dataset, "Skipping ingestion batch with no records.");

			return Ok(());
		}

		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;

		sqlx::query("DELETE FROM salary_records WHERE dataset = $1")
			.bind(&dataset)
			.execute(&mut *tx)
			.await?;

		for chunk in records.chunks(INSERT_CHUNK_ROWS) {
			let mut builder = QueryBuilder::<Postgres>::new(
				"\
INSERT INTO salary_records (record_id, first_name, last_name, sector, salary, taxable_benefits, \
employer, title, province, year, position_class, severance, original, dataset, ingested_at) ",
			);

			builder.push_values(chunk, |mut row, record| {
				row.push_bind(Uuid::new_v4())
					.push_bind(record.first_name.clone())
					.push_bind(record.last_name.clone())
					.push_bind(record.sector.clone())
					.push_bind(currency::amount(record.salary.as_ref()))
					.push_bind(currency::amount(record.taxable_benefits.as_ref()))
					.push_bind(record.employer.clone())
					.push_bind(record.title.clone())
					.push_bind(record.province.clone())
					.push_bind(record.year.as_ref().and_then(query::integer_value))
					.push_bind(record.position_class.clone())
					.push_bind(record.severance.clone())
					.push_bind(record.original.clone())
					.push_bind(dataset.clone())
					.push_bind(now);
			});

			builder.build().execute(&mut *tx).await?;
		}

		tx.commit().await?;

		info!(%dataset, records = records.len(), "Replaced dataset records.");

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn raw_records_decode_camel_case_and_mixed_value_types() {
		let record: RawRecord = serde_json::from_value(json!({
			"firstName": "Alex",
			"lastName": "Singh",
			"salary": "$101,500.50",
			"taxableBenefits": 350.25,
			"year": "2019",
			"positionClass": "Executive",
		}))
		.expect("valid raw record");

		assert_eq!(record.first_name.as_deref(), Some("Alex"));
		assert_eq!(currency::amount(record.salary.as_ref()), Some(101_500.5));
		assert_eq!(currency::amount(record.taxable_benefits.as_ref()), Some(350.25));
		assert_eq!(record.year.as_ref().and_then(crate::query::integer_value), Some(2019));
		assert_eq!(record.position_class.as_deref(), Some("Executive"));
	}
}
