use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use super::Ingestor;
use crate::error::IngestError;

/// Request timeout for every call to the API.
const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct Friend {
	screen_name: String,
}

#[derive(Deserialize)]
struct Status {
	text: String,
}

/// Fetches friends and timelines from a Twitter-like JSON API.
///
/// Every request is authenticated with HTTP basic auth.
///
/// # Endpoints
/// - `GET {base}/statuses/friends.json` → `[{"screen_name": "..."}]`
/// - `GET {base}/statuses/user_timeline.json?screen_name=..&count=..` → `[{"text": "..."}]`
pub struct HttpIngestor {
	client: Client,
	base_url: String,
	username: String,
	password: String,
}

impl HttpIngestor {
	/// Creates an ingestor against `base_url` with a reusable blocking client.
	pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, IngestError> {
		let client = Client::builder()
			.timeout(TIMEOUT)
			.build()?;
		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_owned(),
			username: username.to_owned(),
			password: password.to_owned(),
		})
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path)
	}
}

impl Ingestor for HttpIngestor {
	fn friends(&self) -> Result<Vec<String>, IngestError> {
		let friends: Vec<Friend> = self.client
			.get(self.endpoint("statuses/friends.json"))
			.basic_auth(&self.username, Some(&self.password))
			.send()?
			.error_for_status()?
			.json()?;

		Ok(friends.into_iter().map(|f| f.screen_name).collect())
	}

	fn timeline(&self, friend: &str, count: usize) -> Result<Vec<String>, IngestError> {
		let statuses: Vec<Status> = self.client
			.get(self.endpoint("statuses/user_timeline.json"))
			.basic_auth(&self.username, Some(&self.password))
			.query(&[("screen_name", friend.to_owned()), ("count", count.to_string())])
			.send()?
			.error_for_status()?
			.json()?;

		Ok(statuses.into_iter().map(|s| s.text).collect())
	}
}
