use rqm_domain::EntityKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Entity kind {0} has no backing table.")]
	UnsupportedKind(EntityKind),
}
