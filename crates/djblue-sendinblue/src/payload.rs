//! Payload builder
//!
//! Translates an [`EmailMessage`] into the body of a SendinBlue v2 API call.
//! The builder is pure: it performs no I/O and never sets the per-call
//! fields (`to`, `text`), which the backend fills in for each recipient.

use std::collections::BTreeMap;

use base64::Engine as _;
use djblue_mail::{Attachment, AttachmentContent, EmailMessage, parse_address};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{SendinBlueError, SendinBlueResult};

/// Fields of a standard (non-template) send.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StandardContent {
	/// `[address, display name or local part]`
	#[serde(skip_serializing_if = "Option::is_none")]
	pub from: Option<(String, String)>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subject: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub html: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
}

/// Fields of a transactional-template send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateContent {
	pub id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub attr: Option<Map<String, Value>>,
}

/// Exactly one of the standard or template field sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PayloadContent {
	Standard(StandardContent),
	Template(TemplateContent),
}

/// A single delivery target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
	pub address: String,
	pub name: String,
}

impl Recipient {
	pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			name: name.into(),
		}
	}
}

/// The `to` field of one API call.
///
/// Standard sends serialize as `{"address": "name"}`; template sends take
/// the bare address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadTo {
	Named { address: String, name: String },
	Address(String),
}

impl PayloadTo {
	pub fn address(&self) -> &str {
		match self {
			Self::Named { address, .. } => address.as_str(),
			Self::Address(address) => address.as_str(),
		}
	}
}

impl Serialize for PayloadTo {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Named { address, name } => {
				let mut map = serializer.serialize_map(Some(1))?;
				map.serialize_entry(address, name)?;
				map.end()
			}
			Self::Address(address) => serializer.serialize_str(address),
		}
	}
}

/// Body of a SendinBlue API call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
	#[serde(flatten)]
	pub content: PayloadContent,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub to: Option<PayloadTo>,
	/// filename -> base64 content
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub attachment: BTreeMap<String, String>,
	/// content id -> base64 content
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub inline_image: BTreeMap<String, String>,
}

impl Payload {
	pub fn standard(from: Option<(String, String)>, subject: Option<String>) -> Self {
		Self::with_content(PayloadContent::Standard(StandardContent {
			from,
			subject,
			..Default::default()
		}))
	}

	pub fn template(id: impl Into<String>, attr: Option<Map<String, Value>>) -> Self {
		Self::with_content(PayloadContent::Template(TemplateContent {
			id: id.into(),
			attr,
		}))
	}

	fn with_content(content: PayloadContent) -> Self {
		Self {
			content,
			to: None,
			attachment: BTreeMap::new(),
			inline_image: BTreeMap::new(),
		}
	}

	pub fn is_template(&self) -> bool {
		matches!(self.content, PayloadContent::Template(_))
	}

	pub fn template_id(&self) -> Option<&str> {
		match &self.content {
			PayloadContent::Template(template) => Some(template.id.as_str()),
			PayloadContent::Standard(_) => None,
		}
	}

	/// Point the payload at one recipient.
	pub fn set_recipient(&mut self, recipient: &Recipient) {
		self.to = Some(PayloadTo::Named {
			address: recipient.address.clone(),
			name: recipient.name.clone(),
		});
	}

	/// Reduce `to` to the bare address of its recipient.
	pub fn narrow_recipient(&mut self) {
		if let Some(to) = self.to.take() {
			self.to = Some(PayloadTo::Address(to.address().to_string()));
		}
	}

	/// Set the plain text body. No effect on template payloads.
	pub fn set_text(&mut self, text: &str) {
		if let PayloadContent::Standard(standard) = &mut self.content {
			standard.text = Some(text.to_string());
		}
	}

	pub fn recipient_addresses(&self) -> Vec<String> {
		self.to
			.iter()
			.map(|to| to.address().to_string())
			.collect()
	}

	pub fn from_address(&self) -> Option<&str> {
		match &self.content {
			PayloadContent::Standard(StandardContent {
				from: Some((address, _)),
				..
			}) => Some(address.as_str()),
			_ => None,
		}
	}

	/// JSON body sent on the wire.
	pub fn to_json(&self) -> SendinBlueResult<Value> {
		Ok(serde_json::to_value(self)?)
	}
}

/// Build the payload for a message.
///
/// Fails with an `UnsupportedFeature` error for alternatives SendinBlue
/// cannot carry and with `Serialization` for attachment text that cannot be
/// encoded in the message charset.
pub fn build_payload(message: &EmailMessage) -> SendinBlueResult<Payload> {
	build(message).map_err(|err| err.with_email(message))
}

fn build(message: &EmailMessage) -> SendinBlueResult<Payload> {
	let mut payload = match message.template_id() {
		Some(id) => Payload::template(id, merge_vars(message)),
		None => standard_payload(message)?,
	};

	if !payload.is_template() && !message.alternatives().is_empty() {
		add_alternatives(message, &mut payload)?;
	}
	add_attachments(message, &mut payload)?;

	Ok(payload)
}

fn merge_vars(message: &EmailMessage) -> Option<Map<String, Value>> {
	message
		.global_merge_vars()
		.filter(|vars| !vars.is_empty())
		.cloned()
}

fn standard_payload(message: &EmailMessage) -> SendinBlueResult<Payload> {
	let from = if message.use_template_from() {
		None
	} else {
		if message.from_email().is_empty() {
			return Err(SendinBlueError::unsupported_feature(
				"Message has no from_email and does not use the template sender",
			));
		}
		let sender = parse_address(message.from_email())?;
		Some((sender.address.clone(), sender.display_name()))
	};

	let subject = (!message.use_template_subject()).then(|| message.subject().to_string());

	Ok(Payload::standard(from, subject))
}

// There can be only one alternative, and it must be text/html.
fn add_alternatives(message: &EmailMessage, payload: &mut Payload) -> SendinBlueResult<()> {
	let alternatives = message.alternatives();
	if alternatives.len() > 1 {
		return Err(SendinBlueError::unsupported_feature(
			"Too many alternatives attached to the message. \
			 SendinBlue only accepts plain text and html emails.",
		));
	}

	let alternative = &alternatives[0];
	if alternative.mimetype() != "text/html" {
		return Err(SendinBlueError::unsupported_feature(format!(
			"Invalid alternative mimetype '{}'. \
			 SendinBlue only accepts plain text and html emails.",
			alternative.mimetype()
		)));
	}

	if let PayloadContent::Standard(standard) = &mut payload.content {
		standard.html = Some(alternative.content().to_string());
	}
	Ok(())
}

/// An attachment reduced to what the payload needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
	/// Filename, or the Content-ID for inline images
	pub name: String,
	pub content: Vec<u8>,
	pub mimetype: String,
	pub inline: bool,
}

impl ResolvedAttachment {
	pub fn encoded_content(&self) -> String {
		base64::engine::general_purpose::STANDARD.encode(&self.content)
	}
}

fn add_attachments(message: &EmailMessage, payload: &mut Payload) -> SendinBlueResult<()> {
	for attachment in message.attachments() {
		let resolved = resolve_attachment(attachment, message.charset())?;
		tracing::debug!(
			name = %resolved.name,
			mimetype = %resolved.mimetype,
			inline = resolved.inline,
			"adding attachment to SendinBlue payload"
		);

		let encoded = resolved.encoded_content();
		if resolved.inline {
			payload.inline_image.insert(resolved.name, encoded);
		} else {
			payload.attachment.insert(resolved.name, encoded);
		}
	}
	Ok(())
}

/// Determine name, raw bytes, MIME type and inline-ness of an attachment.
///
/// Image MIME parts carrying a `Content-ID` header are inline images keyed
/// by that Content-ID; everything else is keyed by filename.
pub fn resolve_attachment(
	attachment: &Attachment,
	charset: &str,
) -> SendinBlueResult<ResolvedAttachment> {
	let mimetype = attachment.mimetype();

	let (name, content, inline) = match attachment {
		Attachment::Mime(part) => match part.header("Content-ID") {
			Some(content_id) if part.content_maintype() == "image" => {
				(Some(content_id.to_string()), part.payload().to_vec(), true)
			}
			_ => (part.filename(), part.payload().to_vec(), false),
		},
		Attachment::File {
			filename, content, ..
		} => (filename.clone(), encode_content(content, charset)?, false),
	};

	let name = name.ok_or_else(|| {
		SendinBlueError::unsupported_feature(
			"SendinBlue requires a filename for every attachment",
		)
	})?;

	Ok(ResolvedAttachment {
		name,
		content,
		mimetype,
		inline,
	})
}

fn encode_content(content: &AttachmentContent, charset: &str) -> SendinBlueResult<Vec<u8>> {
	let text = match content {
		AttachmentContent::Bytes(bytes) => return Ok(bytes.clone()),
		AttachmentContent::Text(text) => text,
	};

	let encoding = encoding_rs::Encoding::for_label(charset.as_bytes()).ok_or_else(|| {
		SendinBlueError::serialization(format!("Unknown charset '{}'", charset))
	})?;

	let (bytes, _, had_errors) = encoding.encode(text);
	if had_errors {
		return Err(SendinBlueError::serialization(format!(
			"Attachment text cannot be encoded as '{}'",
			charset
		)));
	}
	Ok(bytes.into_owned())
}

/// Flatten to, cc and bcc (in that order) into delivery targets.
pub fn recipient_list(message: &EmailMessage) -> SendinBlueResult<Vec<Recipient>> {
	message
		.recipients()
		.into_iter()
		.map(|raw| {
			let parsed = parse_address(raw)?;
			Ok(Recipient {
				name: parsed.display_name(),
				address: parsed.address,
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use djblue_mail::MimePart;
	use rstest::rstest;
	use serde_json::json;

	fn message() -> djblue_mail::EmailMessageBuilder {
		EmailMessage::builder()
			.from("Sender Name <sender@example.com>")
			.to(vec!["to@example.com".to_string()])
			.subject("Subject")
			.body("Body")
	}

	#[rstest]
	fn test_standard_payload_fields() {
		// Arrange
		let message = message().build().unwrap();

		// Act
		let payload = build_payload(&message).unwrap();

		// Assert
		assert_eq!(
			payload.to_json().unwrap(),
			json!({
				"from": ["sender@example.com", "Sender Name"],
				"subject": "Subject",
			})
		);
	}

	#[rstest]
	fn test_sender_without_name_uses_local_part() {
		let message = message().from("noreply@example.com").build().unwrap();

		let payload = build_payload(&message).unwrap();

		assert_eq!(
			payload.to_json().unwrap()["from"],
			json!(["noreply@example.com", "noreply"])
		);
	}

	#[rstest]
	fn test_template_switches_suppress_sender_and_subject() {
		let message = message()
			.use_template_from(true)
			.use_template_subject(true)
			.build()
			.unwrap();

		let payload = build_payload(&message).unwrap();

		assert_eq!(payload.to_json().unwrap(), json!({}));
	}

	#[rstest]
	fn test_missing_sender_is_unsupported() {
		let message = message().from("").build().unwrap();

		let err = build_payload(&message).unwrap_err();

		assert_eq!(err.kind(), crate::ErrorKind::UnsupportedFeature);
		assert!(err.email().is_some());
	}

	#[rstest]
	fn test_template_mode_ignores_alternatives() {
		let message = message()
			.template_id("7")
			.html("<p>one</p>")
			.alternative(djblue_mail::Alternative::new("two", "text/plain"))
			.merge_var("NAME", "Alice")
			.build()
			.unwrap();

		let payload = build_payload(&message).unwrap();

		assert_eq!(
			payload.to_json().unwrap(),
			json!({"id": "7", "attr": {"NAME": "Alice"}})
		);
	}

	#[rstest]
	fn test_empty_merge_vars_are_omitted() {
		let message = message()
			.template_id("7")
			.global_merge_vars(Map::new())
			.build()
			.unwrap();

		let payload = build_payload(&message).unwrap();

		assert_eq!(payload.to_json().unwrap(), json!({"id": "7"}));
	}

	#[rstest]
	fn test_payload_to_serialization() {
		let mut payload = Payload::template("3", None);
		payload.set_recipient(&Recipient::new("a@example.com", "a"));
		assert_eq!(payload.to_json().unwrap()["to"], json!({"a@example.com": "a"}));

		payload.narrow_recipient();
		assert_eq!(payload.to_json().unwrap()["to"], json!("a@example.com"));
	}

	#[rstest]
	fn test_set_text_only_applies_to_standard_payloads() {
		let mut template = Payload::template("3", None);
		template.set_text("ignored");
		assert!(template.to_json().unwrap().get("text").is_none());

		let mut standard = Payload::standard(None, None);
		standard.set_text("body");
		assert_eq!(standard.to_json().unwrap()["text"], json!("body"));
	}

	#[rstest]
	fn test_text_attachment_encoded_with_message_charset() {
		let attachment = Attachment::file(Some("note.txt".to_string()), "café", None);

		let resolved = resolve_attachment(&attachment, "iso-8859-1").unwrap();

		assert_eq!(resolved.content, vec![b'c', b'a', b'f', 0xE9]);
		assert_eq!(resolved.mimetype, "text/plain");
	}

	#[rstest]
	#[case("no-such-charset")]
	#[case("us-ascii")]
	fn test_unencodable_text_attachment(#[case] charset: &str) {
		let attachment = Attachment::file(Some("note.txt".to_string()), "日本", None);

		let err = resolve_attachment(&attachment, charset).unwrap_err();

		assert_eq!(err.kind(), crate::ErrorKind::Serialization);
	}

	#[rstest]
	fn test_image_without_content_id_is_regular_attachment() {
		let attachment =
			Attachment::mime(MimePart::new("image/png", vec![1, 2, 3]).with_filename("chart.png"));

		let resolved = resolve_attachment(&attachment, "utf-8").unwrap();

		assert!(!resolved.inline);
		assert_eq!(resolved.name, "chart.png");
	}

	#[rstest]
	fn test_non_image_with_content_id_is_regular_attachment() {
		let attachment = Attachment::mime(
			MimePart::new("application/pdf", vec![1])
				.with_filename("doc.pdf")
				.with_content_id("<doc>"),
		);

		let resolved = resolve_attachment(&attachment, "utf-8").unwrap();

		assert!(!resolved.inline);
		assert_eq!(resolved.name, "doc.pdf");
	}

	#[rstest]
	fn test_nameless_attachment_is_unsupported() {
		let attachment = Attachment::file(None, b"data".to_vec(), None);

		let err = resolve_attachment(&attachment, "utf-8").unwrap_err();

		assert_eq!(err.kind(), crate::ErrorKind::UnsupportedFeature);
	}

	#[rstest]
	fn test_recipient_list_order_and_names() {
		let message = message()
			.to(vec!["First <first@example.com>".to_string()])
			.cc(vec!["cc@example.com".to_string()])
			.bcc(vec!["Hidden <bcc@example.com>".to_string()])
			.build()
			.unwrap();

		let recipients = recipient_list(&message).unwrap();

		assert_eq!(
			recipients,
			vec![
				Recipient::new("first@example.com", "First"),
				Recipient::new("cc@example.com", "cc"),
				Recipient::new("bcc@example.com", "Hidden"),
			]
		);
	}
}
