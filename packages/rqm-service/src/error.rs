use rqm_domain::EntityKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid search option {field}: {value:?}.")]
	InvalidOptions { field: String, value: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Retrieval failed for {kind}.")]
	RetrievalFailed { kind: EntityKind },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Resource provider {name} failed: {message}")]
	ProviderFailed { name: String, message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<rqm_storage::Error> for Error {
	fn from(err: rqm_storage::Error) -> Self {
		match err {
			rqm_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			rqm_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			rqm_storage::Error::UnsupportedKind(kind) =>
				Self::InvalidRequest { message: format!("{kind} has no backing table.") },
		}
	}
}
