pub mod count;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod list;
pub mod plot;
pub mod query;
pub mod search;
pub mod sort;

mod error;

pub use error::{Error, Result};

pub use filter::{IgnoredPredicate, IgnoredReason};
pub use ingest::RawRecord;
pub use list::RecordView;
pub use plot::{PlotMethod, PlotPoint, PlotRequest};
pub use query::{Filter, ListQuery, TextFilterSpec};
pub use sort::SortOrder;

use sundial_storage::db::Db;

pub struct SundialService {
	pub cfg: sundial_config::Config,
	pub db: Db,
}
impl SundialService {
	pub fn new(cfg: sundial_config::Config, db: Db) -> Self {
		Self { cfg, db }
	}

	/// The canonical client-facing field list, as served by the fields route
	/// and used for the CSV export header.
	pub fn get_fields() -> &'static [&'static str] {
		&sundial_domain::field::CLIENT_FIELDS
	}

	/// Fills in the default province restriction (every enabled province)
	/// when the client sent none. An explicit empty list means no restriction
	/// and passes through untouched.
	pub(crate) fn effective_filter(&self, filter: &Filter) -> Filter {
		let mut filter = filter.clone();

		if filter.provinces.is_none() {
			filter.provinces = Some(self.cfg.enabled_provinces());
		}

		filter
	}
}
