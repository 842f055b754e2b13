#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Unknown listing field: {0}")]
	UnknownField(String),
	#[error("Listing field cannot be sorted: {0}")]
	UnsortableField(String),
	#[error("Listing query exceeded {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
}
