use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub provinces: Vec<Province>,
}
impl Config {
	/// Lower-cased keys of the provinces currently enabled for ingestion;
	/// queries without an explicit province restriction default to this set.
	pub fn enabled_provinces(&self) -> Vec<String> {
		self.provinces
			.iter()
			.filter(|province| province.enabled)
			.map(|province| province.key.clone())
			.collect()
	}
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default = "default_environment")]
	pub environment: String,
}
impl Service {
	pub fn is_production(&self) -> bool {
		self.environment == "production"
	}
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Province {
	pub key: String,
	pub enabled: bool,
}

fn default_environment() -> String {
	"development".to_string()
}
