/// Client-visible field names of a salary record, in canonical order. This is
/// the list served by the fields route and the CSV export header; `dataset` is
/// internal provenance and deliberately absent.
pub const CLIENT_FIELDS: [&str; 12] = [
	"firstName",
	"lastName",
	"sector",
	"salary",
	"taxableBenefits",
	"employer",
	"title",
	"province",
	"year",
	"positionClass",
	"severance",
	"original",
];

/// Allowlist of record fields clients may reference in text filters, sort
/// keys, and plot axes. Anything a client names resolves through here or not
/// at all, so no client-supplied identifier ever reaches the query text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordField {
	FirstName,
	LastName,
	Sector,
	Salary,
	TaxableBenefits,
	Employer,
	Title,
	Province,
	Year,
	PositionClass,
	Severance,
	Original,
}
impl RecordField {
	pub const ALL: [Self; 12] = [
		Self::FirstName,
		Self::LastName,
		Self::Sector,
		Self::Salary,
		Self::TaxableBenefits,
		Self::Employer,
		Self::Title,
		Self::Province,
		Self::Year,
		Self::PositionClass,
		Self::Severance,
		Self::Original,
	];

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"firstName" => Some(Self::FirstName),
			"lastName" => Some(Self::LastName),
			"sector" => Some(Self::Sector),
			"salary" => Some(Self::Salary),
			"taxableBenefits" => Some(Self::TaxableBenefits),
			"employer" => Some(Self::Employer),
			"title" => Some(Self::Title),
			"province" => Some(Self::Province),
			"year" => Some(Self::Year),
			"positionClass" => Some(Self::PositionClass),
			"severance" => Some(Self::Severance),
			"original" => Some(Self::Original),
			_ => None,
		}
	}

	pub fn client_name(&self) -> &'static str {
		match self {
			Self::FirstName => "firstName",
			Self::LastName => "lastName",
			Self::Sector => "sector",
			Self::Salary => "salary",
			Self::TaxableBenefits => "taxableBenefits",
			Self::Employer => "employer",
			Self::Title => "title",
			Self::Province => "province",
			Self::Year => "year",
			Self::PositionClass => "positionClass",
			Self::Severance => "severance",
			Self::Original => "original",
		}
	}

	pub fn column(&self) -> &'static str {
		match self {
			Self::FirstName => "first_name",
			Self::LastName => "last_name",
			Self::Sector => "sector",
			Self::Salary => "salary",
			Self::TaxableBenefits => "taxable_benefits",
			Self::Employer => "employer",
			Self::Title => "title",
			Self::Province => "province",
			Self::Year => "year",
			Self::PositionClass => "position_class",
			Self::Severance => "severance",
			Self::Original => "original",
		}
	}

	/// Fields whose stored value is numeric and can serve as a plot's
	/// dependent axis.
	pub fn is_numeric(&self) -> bool {
		matches!(self, Self::Salary | Self::TaxableBenefits | Self::Year)
	}

	/// Fields stored as plain text. Text filters on any other field compare
	/// against the value's text rendering.
	pub fn is_textual(&self) -> bool {
		!matches!(self, Self::Salary | Self::TaxableBenefits | Self::Year | Self::Original)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn client_names_round_trip() {
		for field in RecordField::ALL {
			assert_eq!(RecordField::parse(field.client_name()), Some(field));
		}
	}

	#[test]
	fn canonical_order_matches_allowlist() {
		let names: Vec<_> = RecordField::ALL.iter().map(|field| field.client_name()).collect();

		assert_eq!(names, CLIENT_FIELDS);
	}

	#[test]
	fn parse_is_case_sensitive() {
		assert_eq!(RecordField::parse("firstname"), None);
		assert_eq!(RecordField::parse("dataset"), None);
		assert_eq!(RecordField::parse(""), None);
	}
}
