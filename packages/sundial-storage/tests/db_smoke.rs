use sundial_config::Postgres;
use sundial_storage::{db::Db, models::SalaryRecord};
use sundial_testkit::TestDatabase;
use uuid::Uuid;

async fn test_db() -> Option<TestDatabase> {
	let Some(base_dsn) = sundial_testkit::env_dsn() else {
		eprintln!("Skipping; SUNDIAL_PG_DSN is not set.");

		return None;
	};

	Some(TestDatabase::new(&base_dsn).await.expect("Failed to create test database."))
}

async fn connect(db: &TestDatabase) -> Db {
	Db::connect(&Postgres { dsn: db.dsn().to_string(), pool_max_conns: 2 })
		.await
		.expect("Failed to connect.")
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
	let Some(db) = test_db().await else {
		return;
	};
	let storage = connect(&db).await;

	storage.ensure_schema().await.expect("Failed to create schema.");
	storage.ensure_schema().await.expect("Failed to re-run schema.");

	db.cleanup().await.expect("Failed to clean up.");
}

#[tokio::test]
async fn records_round_trip_through_the_row_model() {
	let Some(db) = test_db().await else {
		return;
	};
	let storage = connect(&db).await;

	storage.ensure_schema().await.expect("Failed to create schema.");

	sqlx::query(
		"\
INSERT INTO salary_records (record_id, first_name, employer, province, year, salary, dataset)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(Uuid::new_v4())
	.bind("Alex")
	.bind("Hydro One")
	.bind("ontario")
	.bind(2019_i32)
	.bind(101_500.5_f64)
	.bind("ontario")
	.execute(&storage.pool)
	.await
	.expect("Failed to insert.");

	let record: SalaryRecord = sqlx::query_as(
		"\
SELECT record_id, first_name, last_name, sector, salary, taxable_benefits, employer, title, \
province, year, position_class, severance, original, dataset, ingested_at
FROM salary_records",
	)
	.fetch_one(&storage.pool)
	.await
	.expect("Failed to select.");

	assert_eq!(record.first_name.as_deref(), Some("Alex"));
	assert_eq!(record.salary, Some(101_500.5));
	assert_eq!(record.year, Some(2019));
	assert_eq!(record.dataset, "ontario");
	assert_eq!(record.original, None);

	db.cleanup().await.expect("Failed to clean up.");
}

#[tokio::test]
async fn generated_text_search_column_indexes_text_fields() {
	let Some(db) = test_db().await else {
		return;
	};
	let storage = connect(&db).await;

	storage.ensure_schema().await.expect("Failed to create schema.");

	sqlx::query(
		"\
INSERT INTO salary_records (record_id, employer, province, dataset)
VALUES ($1, $2, $3, $4)",
	)
	.bind(Uuid::new_v4())
	.bind("Metrolinx")
	.bind("ontario")
	.bind("ontario")
	.execute(&storage.pool)
	.await
	.expect("Failed to insert.");

	let matched: i64 = sqlx::query_scalar(
		"\
SELECT COUNT(*)
FROM salary_records
WHERE textsearch @@ plainto_tsquery('english', $1)",
	)
	.bind("metrolinx")
	.fetch_one(&storage.pool)
	.await
	.expect("Failed to query.");

	assert_eq!(matched, 1);

	db.cleanup().await.expect("Failed to clean up.");
}
