//! SendinBlue email backend
//!
//! Delivers a batch of [`EmailMessage`]s through the SendinBlue v2 API, one
//! API call per recipient.
//!
//! # Examples
//!
//! ```no_run
//! use djblue_mail::{EmailBackend, EmailMessage};
//! use djblue_sendinblue::{SendinBlueBackend, SendinBlueSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SendinBlueBackend::new(SendinBlueSettings::new("xkeysib-..."))?;
//!
//! let mut messages = vec![
//! 	EmailMessage::builder()
//! 		.from("Shop <shop@example.com>")
//! 		.to(vec!["customer@example.com".to_string()])
//! 		.subject("Your order")
//! 		.body("Thanks for your order!")
//! 		.build()?,
//! ];
//!
//! let sent = backend.send_messages(&mut messages).await?;
//! assert_eq!(sent, 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use djblue_mail::{EmailBackend, EmailMessage, ProviderResponse};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::client::{ApiSession, Connector, HttpConnector};
use crate::error::{SendinBlueError, SendinBlueResult};
use crate::payload::{Payload, build_payload, recipient_list};
use crate::settings::SendinBlueSettings;

/// A session borrowed for the duration of one batch.
struct SessionLease<S> {
	session: Arc<S>,
	/// The batch created the session and must close it
	owned: bool,
}

pub struct SendinBlueBackend<C: Connector = HttpConnector> {
	settings: SendinBlueSettings,
	connector: C,
	session: Mutex<Option<Arc<C::Session>>>,
}

impl SendinBlueBackend<HttpConnector> {
	/// Create a backend talking HTTP to the configured API URL.
	pub fn new(settings: SendinBlueSettings) -> SendinBlueResult<Self> {
		Self::with_connector(settings, HttpConnector)
	}

	/// Create a backend from `SENDIN_BLUE_*` environment variables.
	pub fn from_env() -> SendinBlueResult<Self> {
		Self::new(SendinBlueSettings::from_env()?)
	}
}

impl<C: Connector> SendinBlueBackend<C> {
	pub fn with_connector(settings: SendinBlueSettings, connector: C) -> SendinBlueResult<Self> {
		settings.validate()?;
		Ok(Self {
			settings,
			connector,
			session: Mutex::new(None),
		})
	}

	pub fn settings(&self) -> &SendinBlueSettings {
		&self.settings
	}

	/// Whether a session opened with [`open`](Self::open) is currently held.
	pub async fn is_open(&self) -> bool {
		self.session.lock().await.is_some()
	}

	/// Open a session that later batches reuse until [`close`](Self::close).
	///
	/// Returns `true` when a new session was created. A silenced connection
	/// failure returns `false`.
	pub async fn open(&self) -> SendinBlueResult<bool> {
		let mut slot = self.session.lock().await;
		if slot.is_some() {
			return Ok(false);
		}

		match self.connector.connect(&self.settings).await {
			Ok(session) => {
				*slot = Some(Arc::new(session));
				Ok(true)
			}
			Err(err) if self.silences(&err) => {
				warn!(error = %err, "failed to open SendinBlue session");
				Ok(false)
			}
			Err(err) => Err(err),
		}
	}

	/// Close the session opened with [`open`](Self::open), if any.
	pub async fn close(&self) -> SendinBlueResult<()> {
		let session = self.session.lock().await.take();
		match session {
			Some(session) => self.close_session(session.as_ref()).await,
			None => Ok(()),
		}
	}

	fn silences(&self, err: &SendinBlueError) -> bool {
		self.settings.fail_silently() && err.is_silenceable()
	}

	async fn close_session(&self, session: &C::Session) -> SendinBlueResult<()> {
		match session.close().await {
			Err(err) if self.silences(&err) => {
				warn!(error = %err, "failed to close SendinBlue session");
				Ok(())
			}
			other => other,
		}
	}

	async fn acquire(&self) -> SendinBlueResult<Option<SessionLease<C::Session>>> {
		if let Some(session) = self.session.lock().await.as_ref() {
			return Ok(Some(SessionLease {
				session: Arc::clone(session),
				owned: false,
			}));
		}

		match self.connector.connect(&self.settings).await {
			Ok(session) => Ok(Some(SessionLease {
				session: Arc::new(session),
				owned: true,
			})),
			Err(err) if self.silences(&err) => {
				warn!(error = %err, "failed to open SendinBlue session");
				Ok(None)
			}
			Err(err) => Err(err),
		}
	}

	async fn release(&self, lease: SessionLease<C::Session>) -> SendinBlueResult<()> {
		if !lease.owned {
			return Ok(());
		}
		self.close_session(lease.session.as_ref()).await
	}

	async fn deliver_batch(
		&self,
		session: &C::Session,
		messages: &mut [EmailMessage],
	) -> SendinBlueResult<usize> {
		let mut sent = 0;
		for message in messages.iter_mut() {
			if self.send_one(session, message).await? {
				sent += 1;
			}
		}
		Ok(sent)
	}

	async fn send_one(
		&self,
		session: &C::Session,
		message: &mut EmailMessage,
	) -> SendinBlueResult<bool> {
		message.clear_provider_response();
		if message.recipients().is_empty() {
			return Ok(false);
		}

		match self.deliver(session, message).await {
			Ok(()) => Ok(true),
			Err(err) if self.silences(&err) => {
				warn!(error = %err, kind = %err.kind(), "failed to send message through SendinBlue");
				Ok(false)
			}
			Err(err) => Err(err),
		}
	}

	async fn deliver(
		&self,
		session: &C::Session,
		message: &mut EmailMessage,
	) -> SendinBlueResult<()> {
		let mut payload = build_payload(message)?;
		let recipients = recipient_list(message).map_err(|err| err.with_email(message))?;

		let mut refused = 0;
		let mut last_response = None;
		for recipient in &recipients {
			payload.set_recipient(recipient);
			let response = self
				.post_to_sendinblue(session, message, &mut payload)
				.await?;
			if is_refused(&response) {
				refused += 1;
			}
			last_response = Some(response);
		}

		if refused == recipients.len() && !self.settings.ignore_recipient_status() {
			let mut err = SendinBlueError::recipients_refused()
				.with_email(message)
				.with_payload(&payload);
			if let Some(response) = last_response {
				err = err.with_response(response);
			}
			return Err(err);
		}
		Ok(())
	}

	async fn post_to_sendinblue(
		&self,
		session: &C::Session,
		message: &mut EmailMessage,
		payload: &mut Payload,
	) -> SendinBlueResult<ProviderResponse> {
		let result = if payload.is_template() {
			payload.narrow_recipient();
			session.send_transactional_template(payload).await
		} else {
			payload.set_text(message.body());
			session.send_email(payload).await
		};
		let response = result.map_err(|err| err.with_email(message).with_payload(payload))?;

		debug!(
			status = response.status,
			to = ?payload.recipient_addresses(),
			template = payload.is_template(),
			"SendinBlue API responded"
		);
		message.set_provider_response(response.clone());

		if !response.is_success() {
			return Err(SendinBlueError::api(message, payload, response));
		}
		Ok(response)
	}
}

// SendinBlue answers 200 with `"code": "failure"` for rejected recipients.
fn is_refused(response: &ProviderResponse) -> bool {
	response
		.json()
		.and_then(|body| body.get("code").and_then(Value::as_str).map(|code| code == "failure"))
		.unwrap_or(false)
}

#[async_trait]
impl<C: Connector> EmailBackend for SendinBlueBackend<C> {
	type Error = SendinBlueError;

	async fn send_messages(&self, messages: &mut [EmailMessage]) -> SendinBlueResult<usize> {
		if messages.is_empty() {
			return Ok(0);
		}

		let Some(lease) = self.acquire().await? else {
			return Ok(0);
		};

		let outcome = self.deliver_batch(lease.session.as_ref(), messages).await;
		let released = self.release(lease).await;

		let sent = outcome?;
		released?;
		Ok(sent)
	}
}
