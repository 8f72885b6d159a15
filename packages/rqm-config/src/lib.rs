mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Catalog, Config, Postgres, Search, SearchCache, Security, Service, Storage};

use std::{fs, path::Path};

/// Hard ceiling on `search.max_limit`; page sizes above it are never served.
pub const SEARCH_LIMIT_CEILING: u32 = 100;

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
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.mcp_bind", &cfg.service.mcp_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.service.request_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "service.request_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_limit == 0 || cfg.search.max_limit > SEARCH_LIMIT_CEILING {
		return Err(Error::Validation {
			message: format!("search.max_limit must be in the range 1-{SEARCH_LIMIT_CEILING}."),
		});
	}
	if cfg.search.default_limit == 0 || cfg.search.default_limit > cfg.search.max_limit {
		return Err(Error::Validation {
			message: "search.default_limit must be in the range 1-search.max_limit.".to_string(),
		});
	}
	if cfg.search.cache.ttl_seconds == 0 {
		return Err(Error::Validation {
			message: "search.cache.ttl_seconds must be greater than zero.".to_string(),
		});
	}

	if let Some(max) = cfg.search.cache.max_payload_bytes
		&& max == 0
	{
		return Err(Error::Validation {
			message: "search.cache.max_payload_bytes must be greater than zero.".to_string(),
		});
	}

	if cfg.catalog.max_entities_per_provider == 0 {
		return Err(Error::Validation {
			message: "catalog.max_entities_per_provider must be greater than zero.".to_string(),
		});
	}

	match cfg.security.auth_mode.as_str() {
		"off" => {},
		"static_token" =>
			if cfg.security.mcp_token.is_none() {
				return Err(Error::Validation {
					message: "security.mcp_token is required when security.auth_mode=static_token."
						.to_string(),
				});
			},
		_ => {
			return Err(Error::Validation {
				message: "security.auth_mode must be one of off or static_token.".to_string(),
			});
		},
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.security.auth_mode = cfg.security.auth_mode.trim().to_string();

	if cfg.security.mcp_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false) {
		cfg.security.mcp_token = None;
	}
}
