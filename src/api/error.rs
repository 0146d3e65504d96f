use thiserror::Error;

/// Why a graph API request produced no usable value.
///
/// Every variant is handled the same way by callers: log it and skip the
/// mutation that depended on the response.
#[derive(Error, Debug)]
pub enum FetchError {
	#[error("request to {url} failed: {source}")]
	Transport {
		url: String,
		#[source]
		source: reqwest::Error,
	},

	#[error("{url} answered with status {status}")]
	Status { url: String, status: u16 },

	#[error("unexpected payload from {url}: {source}")]
	Malformed {
		url: String,
		#[source]
		source: serde_json::Error,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_error_names_url_and_code() {
		let err = FetchError::Status {
			url: "http://localhost:8080/api/node/n9".into(),
			status: 404,
		};
		assert_eq!(
			err.to_string(),
			"http://localhost:8080/api/node/n9 answered with status 404"
		);
	}

	#[test]
	fn malformed_error_keeps_parse_source() {
		let source = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
		let err = FetchError::Malformed {
			url: "http://x/tooltip/n1".into(),
			source,
		};
		assert!(err.to_string().starts_with("unexpected payload from http://x/tooltip/n1"));
		assert!(std::error::Error::source(&err).is_some());
	}
}
