pub type Result<T, E = Error> = std::result::Result<T, E>;

const RATE_LIMIT_MARKERS: [&str; 5] =
	["resource_exhausted", "quota", "rate limit", "rate-limit", "too many requests"];

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Provider returned HTTP {status}: {body}")]
	Status { status: u16, body: String },
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl Error {
	/// Whether the failure signals quota exhaustion rather than a hard error.
	///
	/// Providers do not agree on a structured signal, so this inspects the status code where one
	/// exists and otherwise the rendered error content.
	pub fn is_rate_limited(&self) -> bool {
		let status = match self {
			Self::Status { status, .. } => Some(*status),
			Self::Reqwest(err) => err.status().map(|status| status.as_u16()),
			_ => None,
		};

		if status == Some(429) {
			return true;
		}

		let content = self.to_string().to_lowercase();

		RATE_LIMIT_MARKERS.iter().any(|marker| content.contains(marker))
	}
}
