pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid input at {field}: {issue}")]
	Validation { field: String, issue: String },
	#[error("Query rejected at {field}: {message}")]
	Query { field: String, message: String },
	#[error("Query timed out after {timeout_ms} ms.")]
	QueryTimeout { timeout_ms: u64 },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Fingerprint error: {message}")]
	Fingerprint { message: String },
}
impl Error {
	pub(crate) fn validation(field: impl Into<String>, issue: impl Into<String>) -> Self {
		Self::Validation { field: field.into(), issue: issue.into() }
	}
}

impl From<estate_storage::Error> for Error {
	fn from(err: estate_storage::Error) -> Self {
		match err {
			estate_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			estate_storage::Error::UnknownField(ref field)
			| estate_storage::Error::UnsortableField(ref field) =>
				Self::Query { field: field.clone(), message: err.to_string() },
			estate_storage::Error::Timeout { timeout_ms } => Self::QueryTimeout { timeout_ms },
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::Error;

	#[test]
	fn storage_rejections_keep_the_rejected_field() {
		let err = Error::from(estate_storage::Error::UnknownField("city".to_string()));

		assert!(
			matches!(&err, Error::Query { field, .. } if field == "city"),
			"Unexpected error: {err:?}."
		);

		let err = Error::from(estate_storage::Error::UnsortableField("amenities".to_string()));

		assert!(
			matches!(&err, Error::Query { field, .. } if field == "amenities"),
			"Unexpected error: {err:?}."
		);
	}
}
