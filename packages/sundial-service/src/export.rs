use futures::{SinkExt, Stream, StreamExt, channel::mpsc};

use sundial_domain::field::{CLIENT_FIELDS, RecordField};
use sundial_storage::models::SalaryRecord;

use crate::{ListQuery, RecordView, Result, SortOrder, SundialService, search, sort};

impl SundialService {
	/// Streams the filtered, sorted result set as CSV lines: one header row,
	/// then one row per record. Pagination is deliberately ignored — an
	/// export bounds itself by the filter alone — and rows are forwarded as
	/// the store produces them, so the full set is never buffered.
	pub fn export_csv(&self, query: ListQuery) -> impl Stream<Item = Result<String>> + Send + 'static {
		let search_active = search::is_active(&query.search);
		let mut builder = self.record_query(&query);

		sort::push_order_by(
			&mut builder,
			search_active,
			sort::resolve_sort_field(&query.sort_field),
			SortOrder::parse(&query.sort_order),
		);

		let pool = self.db.pool.clone();
		let (mut tx, rx) = mpsc::channel::<Result<String>>(64);

		tokio::spawn(async move {
			let mut records = builder.build_query_as::<SalaryRecord>().fetch(&pool);

			loop {
				match records.next().await {
					Some(Ok(record)) => {
						let line = record_line(&RecordView::from_record(record));

						if tx.send(Ok(line)).await.is_err() {
							break;
						}
					},
					Some(Err(err)) => {
						let _ = tx.send(Err(err.into())).await;

						break;
					},
					None => break,
				}
			}
		});

		futures::stream::once(async { Ok(header_line()) }).chain(rx)
	}
}

pub(crate) fn header_line() -> String {
	csv_line(CLIENT_FIELDS.iter().map(|field| Some((*field).to_string())))
}

pub(crate) fn record_line(view: &RecordView) -> String {
	csv_line(RecordField::ALL.iter().map(|field| field_text(view, *field)))
}

fn field_text(view: &RecordView, field: RecordField) -> Option<String> {
	match field {
		RecordField::FirstName => view.first_name.clone(),
		RecordField::LastName => view.last_name.clone(),
		RecordField::Sector => view.sector.clone(),
		RecordField::Salary => view.salary.map(|value| value.to_string()),
		RecordField::TaxableBenefits => view.taxable_benefits.map(|value| value.to_string()),
		RecordField::Employer => view.employer.clone(),
		RecordField::Title => view.title.clone(),
		RecordField::Province => view.province.clone(),
		RecordField::Year => view.year.map(|value| value.to_string()),
		RecordField::PositionClass => view.position_class.clone(),
		RecordField::Severance => view.severance.clone(),
		RecordField::Original => view.original.as_ref().map(|value| value.to_string()),
	}
}

/// Every field is double-quoted with inner quotes doubled; a missing value
/// emits an empty quoted field, keeping the column count fixed.
fn csv_line<I>(values: I) -> String
where
	I: Iterator<Item = Option<String>>,
{
	let mut line = String::new();

	for (index, value) in values.enumerate() {
		if index > 0 {
			line.push(',');
		}

		line.push('"');
		line.push_str(&value.unwrap_or_default().replace('"', "\"\""));
		line.push('"');
	}

	line.push('\n');

	line
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_view() -> RecordView {
		RecordView {
			first_name: Some("Dana".to_string()),
			last_name: Some("O\"Hare".to_string()),
			sector: Some("Crown Agencies".to_string()),
			salary: Some(123_456.78),
			taxable_benefits: None,
			employer: Some("Metrolinx".to_string()),
			title: Some("Director, Capital Projects".to_string()),
			province: Some("ontario".to_string()),
			year: Some(2021),
			position_class: None,
			severance: None,
			original: None,
		}
	}

	#[test]
	fn header_matches_canonical_fields() {
		let header = header_line();
		let columns: Vec<_> = header.trim_end().split(',').collect();

		assert_eq!(columns.len(), CLIENT_FIELDS.len());
		assert_eq!(columns[0], "\"firstName\"");
		assert!(!header.contains("dataset"));
	}

	#[test]
	fn rows_keep_the_header_column_count() {
		let line = record_line(&sample_view());
		let header_columns = header_line().trim_end().split(',').count();

		// Quoted commas would break this naive split, so the sample title's
		// comma is the interesting part.
		let mut columns = 0;
		let mut in_quotes = false;

		for c in line.trim_end().chars() {
			match c {
				'"' => in_quotes = !in_quotes,
				',' if !in_quotes => columns += 1,
				_ => {},
			}
		}

		assert_eq!(columns + 1, header_columns);
	}

	#[test]
	fn missing_values_emit_empty_quoted_fields() {
		let line = record_line(&sample_view());

		assert!(line.contains(",\"\","));
		assert!(line.ends_with("\"\"\n"));
	}

	#[test]
	fn inner_quotes_are_doubled() {
		let line = record_line(&sample_view());

		assert!(line.contains("\"O\"\"Hare\""));
	}

	#[test]
	fn numbers_render_without_trailing_zeroes() {
		let line = record_line(&sample_view());

		assert!(line.contains("\"123456.78\""));
		assert!(line.contains("\"2021\""));
	}
}
