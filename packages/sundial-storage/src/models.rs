use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// One stored salary-disclosure entry. `dataset` and `ingested_at` are
/// internal provenance and never serialized toward clients.
#[derive(Debug, sqlx::FromRow)]
pub struct SalaryRecord {
	pub record_id: Uuid,
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
	pub original: Option<Value>,
	pub dataset: String,
	pub ingested_at: OffsetDateTime,
}
