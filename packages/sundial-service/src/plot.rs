use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};

use sundial_domain::field::RecordField;

use crate::{
	Error, ListQuery, Result, SundialService,
	filter::{CompiledFilter, ConditionWriter},
	search,
};

/// The closed set of grouped statistics. `Std` is the sample standard
/// deviation (N-1 denominator); `Count` counts rows rather than aggregating
/// the dependent field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotMethod {
	Avg,
	Max,
	Min,
	Std,
	Sum,
	Count,
}
impl PlotMethod {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"avg" => Some(Self::Avg),
			"max" => Some(Self::Max),
			"min" => Some(Self::Min),
			"std" => Some(Self::Std),
			"sum" => Some(Self::Sum),
			"count" => Some(Self::Count),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Avg => "avg",
			Self::Max => "max",
			Self::Min => "min",
			Self::Std => "std",
			Self::Sum => "sum",
			Self::Count => "count",
		}
	}

	fn push_aggregate(&self, builder: &mut QueryBuilder<'_, Postgres>, y_column: &str) {
		let function = match self {
			Self::Avg => "AVG",
			Self::Max => "MAX",
			Self::Min => "MIN",
			Self::Std => "STDDEV_SAMP",
			Self::Sum => "SUM",
			Self::Count => {
				builder.push("COUNT(*)::float8");

				return;
			},
		};

		builder.push(function);
		builder.push("(");
		builder.push(y_column);
		builder.push(")::float8");
	}
}

/// Validated plot parameters. Both axes resolve through the record-field
/// allowlist and the method through the closed statistic set, so an unmapped
/// operator can never reach the store layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotRequest {
	pub y_field: RecordField,
	pub method: PlotMethod,
	pub x_field: RecordField,
}
impl PlotRequest {
	pub fn parse(y_field: &str, method: &str, x_field: &str) -> Result<Self> {
		let Some(method) = PlotMethod::parse(method) else {
			return Err(Error::InvalidRequest {
				message: format!(
					"Unknown plot method {method:?}; expected one of avg, max, min, std, sum, count."
				),
			});
		};
		let Some(y_field) = RecordField::parse(y_field) else {
			return Err(Error::InvalidRequest {
				message: format!("Unknown plot field {y_field:?}."),
			});
		};
		let Some(x_field) = RecordField::parse(x_field) else {
			return Err(Error::InvalidRequest {
				message: format!("Unknown plot field {x_field:?}."),
			});
		};

		Ok(Self { y_field, method, x_field })
	}
}

/// One aggregated bucket: a distinct value of the independent field and the
/// statistic computed over the dependent field. `y` is null when the
/// statistic is undefined for the bucket (a one-record sample deviation).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlotPoint {
	pub x: Value,
	pub y: Option<f64>,
}

impl SundialService {
	pub async fn get_plot(&self, request: PlotRequest, query: ListQuery) -> Result<Vec<PlotPoint>> {
		// The type guard discards records whose dependent value is not a
		// usable number, so a non-numeric dependent field yields an empty
		// series rather than an error.
		if !request.y_field.is_numeric() {
			return Ok(Vec::new());
		}

		let filter = self.effective_filter(&query.filter);
		let compiled = CompiledFilter::compile(&filter);
		let x_column = request.x_field.column();
		let y_column = request.y_field.column();
		let mut builder = QueryBuilder::<Postgres>::new("SELECT ");

		builder.push(x_column);

		if request.x_field.is_numeric() {
			builder.push("::float8");
		}

		builder.push(" AS x, ");
		request.method.push_aggregate(&mut builder, y_column);
		builder.push(" AS y FROM salary_records");

		let mut conditions = ConditionWriter::new();

		compiled.push_conditions(&mut builder, &mut conditions);

		if search::is_active(&query.search) {
			search::push_match_condition(&mut builder, &mut conditions, &query.search);
		}

		conditions.begin(&mut builder);
		builder.push("(");
		builder.push(y_column);
		builder.push(" IS NOT NULL AND ");
		builder.push(y_column);
		builder.push(" <> 'NaN'::float8)");
		builder.push(" GROUP BY x ORDER BY x ASC NULLS FIRST");

		let points = if request.x_field.is_numeric() {
			let rows: Vec<(Option<f64>, Option<f64>)> =
				builder.build_query_as().fetch_all(&self.db.pool).await?;

			rows.into_iter()
				.map(|(x, y)| PlotPoint { x: x.map(number_value).unwrap_or(Value::Null), y })
				.collect()
		} else if request.x_field == RecordField::Original {
			let rows: Vec<(Option<Value>, Option<f64>)> =
				builder.build_query_as().fetch_all(&self.db.pool).await?;

			rows.into_iter().map(|(x, y)| PlotPoint { x: x.unwrap_or(Value::Null), y }).collect()
		} else {
			let rows: Vec<(Option<String>, Option<f64>)> =
				builder.build_query_as().fetch_all(&self.db.pool).await?;

			rows.into_iter()
				.map(|(x, y)| PlotPoint { x: x.map(Value::String).unwrap_or(Value::Null), y })
				.collect()
		};

		Ok(points)
	}
}

/// Whole numbers serialize as JSON integers so a year bucket reads as 2019,
/// not 2019.0.
fn number_value(value: f64) -> Value {
	if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
		Value::from(value as i64)
	} else {
		serde_json::Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
	}
}
