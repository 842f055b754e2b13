//! Content fingerprints used as entity tags for conditional search requests.

use serde::Serialize;
use uuid::Uuid;

use crate::{Error, Result};

/// Quoted BLAKE3 digest of the canonical JSON form of `request`.
///
/// Canonical means object keys in sorted order with no insignificant whitespace, so two payloads
/// that differ only in key order hash alike. Falls back to a unique token when the request cannot
/// be serialized, which never matches a client validator.
pub fn fingerprint<T>(request: &T) -> String
where
	T: Serialize,
{
	match digest(request) {
		Ok(token) => token,
		Err(err) => {
			tracing::warn!(error = %err, "Request fingerprint failed; using a non-matching token.");

			fallback_token()
		},
	}
}

pub fn digest<T>(request: &T) -> Result<String>
where
	T: Serialize,
{
	// `Value` objects are B-tree maps, so re-encoding a value sorts every nested object.
	let value = serde_json::to_value(request).map_err(|err| Error::Fingerprint {
		message: format!("Failed to canonicalize request: {err}"),
	})?;
	let raw = serde_json::to_vec(&value).map_err(|err| Error::Fingerprint {
		message: format!("Failed to encode canonical request: {err}"),
	})?;

	Ok(format!("\"{}\"", blake3::hash(&raw).to_hex()))
}

pub fn fallback_token() -> String {
	format!("\"no-etag-{}\"", Uuid::new_v4().simple())
}

/// Whether any entity tag in a client `If-None-Match` value names `server`.
///
/// Weak tags compare by their opaque part. `*` is an ordinary token here.
pub fn matches(server: &str, client: &str) -> bool {
	client
		.split(',')
		.map(str::trim)
		.map(|tag| tag.strip_prefix("W/").unwrap_or(tag))
		.any(|tag| !tag.is_empty() && tag == server)
}
