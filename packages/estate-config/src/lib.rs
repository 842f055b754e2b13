mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Postgres, Search, Service, Storage, default_sort_aliases};

use std::{fs, path::Path};

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
	if cfg.storage.postgres.query_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.query_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_page_limit == 0 {
		return Err(Error::Validation {
			message: "search.max_page_limit must be greater than zero.".to_string(),
		});
	}

	for (logical, storage) in &cfg.search.sort_aliases {
		if logical.trim().is_empty() {
			return Err(Error::Validation {
				message: "search.sort_aliases keys must be non-empty.".to_string(),
			});
		}
		if storage.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("search.sort_aliases.{logical} must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.cors_allowed_origins = cfg
		.service
		.cors_allowed_origins
		.iter()
		.map(|origin| origin.trim())
		.filter(|origin| !origin.is_empty())
		.map(str::to_string)
		.collect();
	cfg.search.sort_aliases = cfg
		.search
		.sort_aliases
		.iter()
		.map(|(logical, storage)| (logical.trim().to_string(), storage.trim().to_string()))
		.collect();
}
