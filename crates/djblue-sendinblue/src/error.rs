//! Error taxonomy for the SendinBlue backend
//!
//! A single error type tagged with an [`ErrorKind`]. Callers dispatch on
//! [`SendinBlueError::kind`]; the optional message/payload/response fields
//! carry whatever diagnostics were available when the error was raised.

use std::fmt;

use djblue_mail::{EmailError, EmailMessage, ProviderResponse};

use crate::payload::Payload;

pub type SendinBlueResult<T> = std::result::Result<T, SendinBlueError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Required configuration is missing or invalid. Never silenced.
	Configuration,
	/// The message uses a feature SendinBlue cannot express.
	UnsupportedFeature,
	/// The payload could not be converted to the wire format.
	Serialization,
	/// SendinBlue answered with a non-200 status.
	Api,
	/// Every recipient of a message was rejected.
	RecipientsRefused,
	/// The HTTP call itself failed (connect, timeout, body read).
	Transport,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Configuration => "configuration",
			Self::UnsupportedFeature => "unsupported_feature",
			Self::Serialization => "serialization",
			Self::Api => "api",
			Self::RecipientsRefused => "recipients_refused",
			Self::Transport => "transport",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug)]
pub struct SendinBlueError {
	kind: ErrorKind,
	message: String,
	email: Option<Box<EmailMessage>>,
	payload: Option<Box<Payload>>,
	response: Option<ProviderResponse>,
	source: Option<BoxError>,
}

impl SendinBlueError {
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
			email: None,
			payload: None,
			response: None,
			source: None,
		}
	}

	pub fn configuration(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Configuration, message)
	}

	pub fn unsupported_feature(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::UnsupportedFeature, message)
	}

	pub fn serialization(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Serialization, message)
	}

	pub fn transport(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Transport, message)
	}

	/// Unsuccessful response from the SendinBlue API.
	pub fn api(email: &EmailMessage, payload: &Payload, response: ProviderResponse) -> Self {
		Self::new(ErrorKind::Api, "SendinBlue API call failed")
			.with_email(email)
			.with_payload(payload)
			.with_response(response)
	}

	pub fn recipients_refused() -> Self {
		Self::new(
			ErrorKind::RecipientsRefused,
			"All message recipients were rejected or invalid",
		)
	}

	pub fn with_email(mut self, email: &EmailMessage) -> Self {
		self.email = Some(Box::new(email.clone()));
		self
	}

	pub fn with_payload(mut self, payload: &Payload) -> Self {
		self.payload = Some(Box::new(payload.clone()));
		self
	}

	pub fn with_response(mut self, response: ProviderResponse) -> Self {
		self.response = Some(response);
		self
	}

	pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
		self.source = Some(source.into());
		self
	}

	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	/// The message that was being sent.
	pub fn email(&self) -> Option<&EmailMessage> {
		self.email.as_deref()
	}

	/// The payload of the attempted API call.
	pub fn payload(&self) -> Option<&Payload> {
		self.payload.as_deref()
	}

	/// The raw provider response.
	pub fn response(&self) -> Option<&ProviderResponse> {
		self.response.as_ref()
	}

	/// HTTP status of the provider response, if one was received.
	pub fn status(&self) -> Option<u16> {
		self.response.as_ref().map(|response| response.status)
	}

	/// Whether the fail-silently policy may swallow this error.
	pub fn is_silenceable(&self) -> bool {
		self.kind != ErrorKind::Configuration
	}

	/// Describe the attempted send, if a payload is attached.
	pub fn describe_send(&self) -> Option<String> {
		let payload = self.payload.as_deref()?;
		let mut description = String::from("Sending a message");

		let to = payload.recipient_addresses();
		if !to.is_empty() {
			description.push_str(&format!(" to {}", to.join(",")));
		}
		if let Some(from) = payload.from_address() {
			description.push_str(&format!(" from {}", from));
		}
		Some(description)
	}

	/// Describe the provider response, pretty-printing JSON bodies.
	pub fn describe_response(&self) -> Option<String> {
		let response = self.response.as_ref()?;
		let mut description = format!("SendinBlue API response {}:", response.status);

		match response
			.json()
			.and_then(|json| serde_json::to_string_pretty(&json).ok())
		{
			Some(pretty) => {
				description.push('\n');
				description.push_str(&pretty);
			}
			None if !response.body.is_empty() => {
				description.push(' ');
				description.push_str(&response.body);
			}
			None => {}
		}
		Some(description)
	}
}

impl fmt::Display for SendinBlueError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let parts = [
			Some(self.message.clone()),
			self.describe_send(),
			self.describe_response(),
		];
		let rendered: Vec<String> = parts
			.into_iter()
			.flatten()
			.filter(|part| !part.is_empty())
			.collect();
		f.write_str(&rendered.join("\n"))
	}
}

impl std::error::Error for SendinBlueError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_deref()
			.map(|source| source as &(dyn std::error::Error + 'static))
	}
}

impl From<EmailError> for SendinBlueError {
	fn from(err: EmailError) -> Self {
		Self::unsupported_feature(err.to_string()).with_source(err)
	}
}

impl From<serde_json::Error> for SendinBlueError {
	fn from(err: serde_json::Error) -> Self {
		Self::serialization(format!(
			"Don't know how to send this data to SendinBlue. \
			 Try converting it to a string or number first.\n{}",
			err
		))
		.with_source(err)
	}
}

impl From<reqwest::Error> for SendinBlueError {
	fn from(err: reqwest::Error) -> Self {
		Self::transport(format!("SendinBlue API request failed: {}", err)).with_source(err)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::payload::{Payload, Recipient};
	use rstest::rstest;

	fn standard_payload() -> Payload {
		let mut payload = Payload::standard(
			Some(("sender@example.com".to_string(), "sender".to_string())),
			Some("Hi".to_string()),
		);
		payload.set_recipient(&Recipient::new("to@example.com", "to"));
		payload
	}

	#[rstest]
	fn test_display_includes_send_description_and_json_response() {
		// Arrange
		let message = EmailMessage::builder()
			.from("sender@example.com")
			.to(vec!["to@example.com".to_string()])
			.build()
			.unwrap();
		let response = ProviderResponse::new(400, r#"{"code":"failure","message":"bad"}"#);

		// Act
		let err = SendinBlueError::api(&message, &standard_payload(), response);
		let rendered = err.to_string();

		// Assert
		assert_eq!(err.kind(), ErrorKind::Api);
		assert_eq!(err.status(), Some(400));
		assert!(rendered.starts_with("SendinBlue API call failed\n"));
		assert!(rendered.contains("Sending a message to to@example.com from sender@example.com"));
		assert!(rendered.contains("SendinBlue API response 400:\n{"));
		assert!(rendered.contains("  \"code\": \"failure\""));
	}

	#[rstest]
	fn test_display_falls_back_to_raw_text() {
		// Arrange
		let err = SendinBlueError::transport("boom")
			.with_response(ProviderResponse::new(502, "Bad Gateway"));

		// Act
		let rendered = err.to_string();

		// Assert
		assert_eq!(rendered, "boom\nSendinBlue API response 502: Bad Gateway");
	}

	#[rstest]
	#[case(ErrorKind::Configuration, false)]
	#[case(ErrorKind::UnsupportedFeature, true)]
	#[case(ErrorKind::Serialization, true)]
	#[case(ErrorKind::Api, true)]
	#[case(ErrorKind::RecipientsRefused, true)]
	#[case(ErrorKind::Transport, true)]
	fn test_is_silenceable(#[case] kind: ErrorKind, #[case] silenceable: bool) {
		assert_eq!(SendinBlueError::new(kind, "x").is_silenceable(), silenceable);
	}

	#[rstest]
	fn test_email_error_maps_to_unsupported_feature() {
		let err: SendinBlueError = EmailError::InvalidAddress("nope".to_string()).into();
		assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
		assert!(std::error::Error::source(&err).is_some());
	}
}
