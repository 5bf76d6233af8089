mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Postgres, Province, Service, Storage};

use std::{collections::HashSet, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if !matches!(cfg.service.environment.as_str(), "development" | "production") {
		return Err(Error::Validation {
			message: "service.environment must be one of development or production.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	let mut seen = HashSet::new();

	for province in &cfg.provinces {
		if province.key.is_empty() {
			return Err(Error::Validation {
				message: "provinces.key must be non-empty.".to_string(),
			});
		}
		if !seen.insert(province.key.as_str()) {
			return Err(Error::Validation {
				message: format!("provinces.key {:?} is listed more than once.", province.key),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for province in &mut cfg.provinces {
		province.key = province.key.trim().to_lowercase();
	}
}
