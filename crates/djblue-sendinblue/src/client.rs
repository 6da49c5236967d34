//! SendinBlue API client
//!
//! The backend talks to SendinBlue through two small traits so that tests can
//! swap the HTTP layer for a recording double. [`HttpConnector`] is the
//! production implementation built on `reqwest`.

use async_trait::async_trait;
use djblue_mail::ProviderResponse;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::{SendinBlueError, SendinBlueResult};
use crate::payload::Payload;
use crate::settings::SendinBlueSettings;

const SEND_EMAIL_PATH: &str = "email";
const TEMPLATE_PATH: &str = "template";

/// An open connection to the SendinBlue API.
#[async_trait]
pub trait ApiSession: Send + Sync {
	/// Send a standard message.
	async fn send_email(&self, payload: &Payload) -> SendinBlueResult<ProviderResponse>;

	/// Send a message rendered from a stored transactional template.
	async fn send_transactional_template(
		&self,
		payload: &Payload,
	) -> SendinBlueResult<ProviderResponse>;

	async fn close(&self) -> SendinBlueResult<()>;
}

/// Creates sessions from backend settings.
#[async_trait]
pub trait Connector: Send + Sync {
	type Session: ApiSession + 'static;

	async fn connect(&self, settings: &SendinBlueSettings) -> SendinBlueResult<Self::Session>;
}

/// Connector producing [`HttpSession`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

#[async_trait]
impl Connector for HttpConnector {
	type Session = HttpSession;

	async fn connect(&self, settings: &SendinBlueSettings) -> SendinBlueResult<HttpSession> {
		HttpSession::new(settings)
	}
}

/// Session holding a configured `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSession {
	client: Client,
	base_url: Url,
	api_key: String,
}

impl HttpSession {
	pub fn new(settings: &SendinBlueSettings) -> SendinBlueResult<Self> {
		let base_url = Url::parse(settings.api_url()).map_err(|e| {
			SendinBlueError::configuration(format!(
				"Invalid SendinBlue API URL '{}': {}",
				settings.api_url(),
				e
			))
			.with_source(e)
		})?;

		let client = Client::builder()
			.timeout(settings.timeout())
			.user_agent(settings.user_agent())
			.build()?;

		Ok(Self {
			client,
			base_url,
			api_key: settings.api_key().to_string(),
		})
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn endpoint(&self, segments: &[&str]) -> SendinBlueResult<Url> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|_| {
				SendinBlueError::configuration(format!(
					"SendinBlue API URL '{}' cannot be used as a base",
					self.base_url
				))
			})?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	async fn call(
		&self,
		method: reqwest::Method,
		url: Url,
		body: &Value,
	) -> SendinBlueResult<ProviderResponse> {
		tracing::debug!(%method, %url, "calling SendinBlue API");

		let response = self
			.client
			.request(method, url)
			.header("api-key", &self.api_key)
			.json(body)
			.send()
			.await?;

		let status = response.status().as_u16();
		let text = response.text().await?;
		Ok(ProviderResponse::new(status, text))
	}
}

#[async_trait]
impl ApiSession for HttpSession {
	async fn send_email(&self, payload: &Payload) -> SendinBlueResult<ProviderResponse> {
		let url = self.endpoint(&[SEND_EMAIL_PATH])?;
		let body = payload.to_json()?;
		self.call(reqwest::Method::POST, url, &body).await
	}

	async fn send_transactional_template(
		&self,
		payload: &Payload,
	) -> SendinBlueResult<ProviderResponse> {
		let id = payload.template_id().ok_or_else(|| {
			SendinBlueError::unsupported_feature("Payload does not reference a template")
		})?;
		let url = self.endpoint(&[TEMPLATE_PATH, id])?;

		// The template id travels in the path only.
		let mut body = payload.to_json()?;
		if let Value::Object(fields) = &mut body {
			fields.remove("id");
		}
		self.call(reqwest::Method::PUT, url, &body).await
	}

	async fn close(&self) -> SendinBlueResult<()> {
		Ok(())
	}
}
