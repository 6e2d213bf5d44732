use std::{
	fmt,
	sync::atomic::{AtomicUsize, Ordering},
};

use crate::{Error, Result};

/// Fixed pool of generation credentials handed out round-robin across all requests.
///
/// The cursor is advanced with a single atomic read-modify-write, so two concurrent leases never
/// observe the same cursor value. Distribution is fair per lease, not per request.
pub struct CredentialPool {
	keys: Vec<String>,
	cursor: AtomicUsize,
}
impl CredentialPool {
	pub fn new(keys: Vec<String>) -> Result<Self> {
		if keys.is_empty() {
			return Err(Error::Config {
				message: "At least one generation credential is required.".to_string(),
			});
		}

		Ok(Self { keys, cursor: AtomicUsize::new(0) })
	}

	/// Number of credentials, which is also the attempt budget of one report.
	pub fn size(&self) -> usize {
		self.keys.len()
	}

	/// Takes the next credential, wrapping after the last one.
	pub fn lease(&self) -> Lease<'_> {
		let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();

		Lease { index, key: &self.keys[index] }
	}
}
impl fmt::Debug for CredentialPool {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CredentialPool")
			.field("len", &self.keys.len())
			.field("cursor", &self.cursor.load(Ordering::Relaxed))
			.finish()
	}
}

/// A credential borrowed for one generation attempt. `index` is safe to log; `key` is not.
#[derive(Clone, Copy)]
pub struct Lease<'a> {
	pub index: usize,
	pub key: &'a str,
}
impl fmt::Debug for Lease<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Lease").field("index", &self.index).finish_non_exhaustive()
	}
}
