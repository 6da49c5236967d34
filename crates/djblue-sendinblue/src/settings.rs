//! SendinBlue backend settings
//!
//! A flat, immutable record read once when the backend is constructed.
//! Settings can be built in code, deserialized (e.g. from a TOML section) or
//! read from `SENDIN_BLUE_*` environment variables.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{SendinBlueError, SendinBlueResult};

pub const DEFAULT_API_URL: &str = "https://api.sendinblue.com/v2.0";

/// Default timeout of the HTTP collaborator.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "SENDIN_BLUE_ACCESS_KEY";
pub const ENV_API_URL: &str = "SENDIN_BLUE_API_URL";
pub const ENV_IGNORE_RECIPIENT_STATUS: &str = "SENDIN_BLUE_IGNORE_RECIPIENT_STATUS";
pub const ENV_FAIL_SILENTLY: &str = "SENDIN_BLUE_FAIL_SILENTLY";
pub const ENV_TIMEOUT: &str = "SENDIN_BLUE_TIMEOUT";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendinBlueSettings {
	#[serde(default)]
	api_key: String,

	/// Base API URL, always ending with `/`
	#[serde(
		default = "default_api_url",
		deserialize_with = "deserialize_api_url"
	)]
	api_url: String,

	/// Tolerate messages whose recipients were all refused.
	///
	/// Off by default: a message whose every per-recipient call came back 200
	/// with a `"code": "failure"` body fails with `RecipientsRefused`, so a
	/// batch of N such messages does not report N sent.
	#[serde(default)]
	ignore_recipient_status: bool,

	/// Swallow send failures and report messages as not sent
	#[serde(default)]
	fail_silently: bool,

	/// HTTP timeout in milliseconds
	#[serde(default)]
	timeout_ms: Option<u64>,

	#[serde(default = "default_user_agent")]
	user_agent: String,
}

fn default_api_url() -> String {
	normalize_api_url(DEFAULT_API_URL)
}

fn default_user_agent() -> String {
	format!("djblue/{}", env!("CARGO_PKG_VERSION"))
}

fn deserialize_api_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	let url = String::deserialize(deserializer)?;
	Ok(normalize_api_url(&url))
}

fn normalize_api_url(url: &str) -> String {
	if url.ends_with('/') {
		url.to_string()
	} else {
		format!("{}/", url)
	}
}

fn parse_flag(value: &str) -> bool {
	value.to_lowercase() == "true" || value == "1"
}

impl SendinBlueSettings {
	/// Settings with the given API key and defaults for everything else.
	pub fn new(api_key: impl Into<String>) -> Self {
		Self {
			api_key: api_key.into(),
			api_url: default_api_url(),
			ignore_recipient_status: false,
			fail_silently: false,
			timeout_ms: None,
			user_agent: default_user_agent(),
		}
	}

	pub fn with_api_url(mut self, api_url: impl AsRef<str>) -> Self {
		self.api_url = normalize_api_url(api_url.as_ref());
		self
	}

	/// Whether an all-refused message still counts as sent.
	///
	/// When `false` (the default) `send_messages` turns a message whose
	/// recipients were all refused into a `RecipientsRefused` error even though
	/// every HTTP call returned 200.
	pub fn with_ignore_recipient_status(mut self, ignore: bool) -> Self {
		self.ignore_recipient_status = ignore;
		self
	}

	pub fn with_fail_silently(mut self, fail_silently: bool) -> Self {
		self.fail_silently = fail_silently;
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
		self
	}

	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();
		self
	}

	pub fn api_key(&self) -> &str {
		&self.api_key
	}

	pub fn api_url(&self) -> &str {
		&self.api_url
	}

	/// `false` unless set: all-refused messages are reported as
	/// `RecipientsRefused` instead of counted as sent.
	pub fn ignore_recipient_status(&self) -> bool {
		self.ignore_recipient_status
	}

	pub fn fail_silently(&self) -> bool {
		self.fail_silently
	}

	pub fn timeout(&self) -> Duration {
		self.timeout_ms
			.map(Duration::from_millis)
			.unwrap_or(DEFAULT_TIMEOUT)
	}

	pub fn user_agent(&self) -> &str {
		&self.user_agent
	}

	/// Check the settings a backend needs before it can be constructed.
	pub fn validate(&self) -> SendinBlueResult<()> {
		if self.api_key.trim().is_empty() {
			return Err(SendinBlueError::configuration(format!(
				"Set {} in settings to use the SendinBlue backend",
				ENV_API_KEY
			)));
		}

		url::Url::parse(&self.api_url).map_err(|e| {
			SendinBlueError::configuration(format!(
				"Invalid SendinBlue API URL '{}': {}",
				self.api_url, e
			))
			.with_source(e)
		})?;

		Ok(())
	}

	/// Load settings from `SENDIN_BLUE_*` environment variables.
	pub fn from_env() -> SendinBlueResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Load settings through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> SendinBlueResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let api_key = lookup(ENV_API_KEY).ok_or_else(|| {
			SendinBlueError::configuration(format!(
				"Set {} in settings to use the SendinBlue backend",
				ENV_API_KEY
			))
		})?;

		let mut settings = Self::new(api_key);

		if let Some(url) = lookup(ENV_API_URL) {
			settings = settings.with_api_url(url);
		}

		if let Some(ignore) = lookup(ENV_IGNORE_RECIPIENT_STATUS) {
			settings.ignore_recipient_status = parse_flag(&ignore);
		}

		if let Some(silent) = lookup(ENV_FAIL_SILENTLY) {
			settings.fail_silently = parse_flag(&silent);
		}

		if let Some(timeout) = lookup(ENV_TIMEOUT) {
			let invalid = || {
				SendinBlueError::configuration(format!(
					"{} must be a number of seconds, got '{}'",
					ENV_TIMEOUT, timeout
				))
			};
			let secs = timeout
				.trim()
				.parse::<f64>()
				.map_err(|e| invalid().with_source(e))?;
			let duration = Duration::try_from_secs_f64(secs).map_err(|e| invalid().with_source(e))?;
			settings = settings.with_timeout(duration);
		}

		settings.validate()?;
		Ok(settings)
	}

	/// Parse settings from a TOML document.
	pub fn from_toml_str(source: &str) -> SendinBlueResult<Self> {
		let settings: Self = toml::from_str(source).map_err(|e| {
			SendinBlueError::configuration(format!("Invalid SendinBlue settings: {}", e))
				.with_source(e)
		})?;
		settings.validate()?;
		Ok(settings)
	}
}

impl fmt::Debug for SendinBlueSettings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SendinBlueSettings")
			.field("api_key", &"[REDACTED]")
			.field("api_url", &self.api_url)
			.field("ignore_recipient_status", &self.ignore_recipient_status)
			.field("fail_silently", &self.fail_silently)
			.field("timeout", &self.timeout())
			.field("user_agent", &self.user_agent)
			.finish()
	}
}
