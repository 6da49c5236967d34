use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backend::EmailBackend;

/// Represents an alternative content type for an email message.
///
/// Alternatives provide different representations of the same content,
/// typically an HTML version of the plain text body.
///
/// # Examples
///
/// ```
/// use djblue_mail::Alternative;
///
/// let alternative = Alternative::new("<h1>Hello!</h1>", "text/html");
/// assert_eq!(alternative.mimetype(), "text/html");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
	/// Content of the alternative part
	content: String,
	/// MIME content type (e.g., "text/html")
	mimetype: String,
}

impl Alternative {
	/// Create a new alternative from its content and MIME type
	pub fn new(content: impl Into<String>, mimetype: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			mimetype: mimetype.into(),
		}
	}

	/// Create an HTML alternative
	///
	/// # Examples
	///
	/// ```
	/// use djblue_mail::Alternative;
	///
	/// let html = Alternative::html("<h1>Welcome!</h1>");
	/// assert_eq!(html.mimetype(), "text/html");
	/// ```
	pub fn html(content: impl Into<String>) -> Self {
		Self::new(content, "text/html")
	}

	/// Get the content
	pub fn content(&self) -> &str {
		&self.content
	}

	/// Get the MIME type
	pub fn mimetype(&self) -> &str {
		&self.mimetype
	}
}

/// Raw content of an attachment triple.
///
/// Text content is encoded with the message charset before it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentContent {
	Bytes(Vec<u8>),
	Text(String),
}

impl From<Vec<u8>> for AttachmentContent {
	fn from(bytes: Vec<u8>) -> Self {
		Self::Bytes(bytes)
	}
}

impl From<&[u8]> for AttachmentContent {
	fn from(bytes: &[u8]) -> Self {
		Self::Bytes(bytes.to_vec())
	}
}

impl From<String> for AttachmentContent {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<&str> for AttachmentContent {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

/// A structured MIME part: headers plus the already transfer-decoded payload.
///
/// # Examples
///
/// ```
/// use djblue_mail::MimePart;
///
/// let part = MimePart::new("image/png", vec![0x89, 0x50])
///     .with_filename("logo.png")
///     .with_content_id("<logo>");
///
/// assert_eq!(part.content_maintype(), "image");
/// assert_eq!(part.filename().as_deref(), Some("logo.png"));
/// assert_eq!(part.header("content-id"), Some("<logo>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimePart {
	headers: Vec<(String, String)>,
	payload: Vec<u8>,
}

impl MimePart {
	/// Create a part with a `Content-Type` header
	pub fn new(content_type: impl Into<String>, payload: Vec<u8>) -> Self {
		Self {
			headers: vec![("Content-Type".to_string(), content_type.into())],
			payload,
		}
	}

	/// Append a header
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Mark the part as an attachment with the given filename
	pub fn with_filename(self, filename: impl AsRef<str>) -> Self {
		let value = disposition("attachment", filename.as_ref());
		self.with_header("Content-Disposition", value)
	}

	/// Add a `Content-ID` header
	pub fn with_content_id(self, content_id: impl Into<String>) -> Self {
		self.with_header("Content-ID", content_id)
	}

	/// Look up a header value (case-insensitive, first match)
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	pub fn headers(&self) -> &[(String, String)] {
		&self.headers
	}

	pub fn payload(&self) -> &[u8] {
		&self.payload
	}

	/// `type/subtype` in lowercase; `text/plain` when missing or unparsable.
	pub fn content_type(&self) -> String {
		self.header("Content-Type")
			.and_then(|value| value.parse::<mime::Mime>().ok())
			.map(|mime| mime.essence_str().to_string())
			.unwrap_or_else(|| "text/plain".to_string())
	}

	/// Top-level type, e.g. `image` for `image/png`.
	pub fn content_maintype(&self) -> String {
		let content_type = self.content_type();
		match content_type.split_once('/') {
			Some((maintype, _)) => maintype.to_string(),
			None => content_type,
		}
	}

	/// Filename from `Content-Disposition`, falling back to the `name`
	/// parameter of `Content-Type`.
	pub fn filename(&self) -> Option<String> {
		self.header("Content-Disposition")
			.and_then(|value| header_param(value, "filename"))
			.or_else(|| {
				self.header("Content-Type")
					.and_then(|value| header_param(value, "name"))
			})
	}
}

/// Render a `Content-Disposition` value for `filename`.
///
/// ASCII names are written as a quoted string; anything else uses the RFC 2231
/// `filename*=utf-8''...` form.
fn disposition(kind: &str, filename: &str) -> String {
	if filename.is_ascii() && !filename.chars().any(|c| c.is_ascii_control()) {
		let quoted = filename.replace('\\', "\\\\").replace('"', "\\\"");
		format!("{}; filename=\"{}\"", kind, quoted)
	} else {
		let encoded = utf8_percent_encode(filename, NON_ALPHANUMERIC);
		format!("{}; filename*=utf-8''{}", kind, encoded)
	}
}

/// Split a header value into lowercased `(name, value)` parameters.
///
/// `;` inside a quoted string does not end a parameter, and backslash escapes
/// in quoted values are resolved.
fn header_params(value: &str) -> Vec<(String, String)> {
	let mut segments = Vec::new();
	let mut current = String::new();
	let mut in_quotes = false;
	let mut escaped = false;

	for c in value.chars() {
		if escaped {
			current.push(c);
			escaped = false;
			continue;
		}
		match c {
			'\\' if in_quotes => {
				current.push(c);
				escaped = true;
			}
			'"' => {
				in_quotes = !in_quotes;
				current.push(c);
			}
			';' if !in_quotes => segments.push(std::mem::take(&mut current)),
			_ => current.push(c),
		}
	}
	segments.push(current);

	segments
		.into_iter()
		.skip(1)
		.filter_map(|segment| {
			let (key, val) = segment.split_once('=')?;
			Some((key.trim().to_ascii_lowercase(), unquote_param(val.trim())))
		})
		.collect()
}

fn unquote_param(value: &str) -> String {
	let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) else {
		return value.to_string();
	};
	let mut out = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		match c {
			'\\' => out.extend(chars.next()),
			c => out.push(c),
		}
	}
	out
}

/// Look up a parameter, preferring the RFC 2231 extended forms
/// (`name*=charset'lang'value` and `name*0*=` continuations).
fn header_param(value: &str, param: &str) -> Option<String> {
	let params = header_params(value);
	extended_param(&params, param).or_else(|| {
		params
			.into_iter()
			.find(|(key, _)| key == param)
			.map(|(_, val)| val)
	})
}

fn extended_param(params: &[(String, String)], param: &str) -> Option<String> {
	let extended = format!("{}*", param);
	if let Some((_, val)) = params.iter().find(|(key, _)| *key == extended) {
		let (charset, encoded) = split_charset(val)?;
		let bytes: Vec<u8> = percent_decode_str(encoded).collect();
		return Some(decode_charset(charset, &bytes));
	}

	let mut sections: Vec<(usize, bool, &str)> = params
		.iter()
		.filter_map(|(key, val)| {
			let section = key.strip_prefix(param)?.strip_prefix('*')?;
			let (index, encoded) = match section.strip_suffix('*') {
				Some(index) => (index, true),
				None => (section, false),
			};
			Some((index.parse::<usize>().ok()?, encoded, val.as_str()))
		})
		.collect();
	if sections.is_empty() {
		return None;
	}
	sections.sort_by_key(|(index, _, _)| *index);

	let mut charset = "utf-8";
	let mut bytes = Vec::new();
	for (index, encoded, val) in sections {
		if !encoded {
			bytes.extend_from_slice(val.as_bytes());
			continue;
		}
		let val = if index == 0 {
			let (declared, rest) = split_charset(val)?;
			charset = declared;
			rest
		} else {
			val
		};
		bytes.extend(percent_decode_str(val));
	}
	Some(decode_charset(charset, &bytes))
}

/// Split `charset'language'value`.
fn split_charset(value: &str) -> Option<(&str, &str)> {
	let mut parts = value.splitn(3, '\'');
	let charset = parts.next()?;
	let _language = parts.next()?;
	Some((charset, parts.next()?))
}

fn decode_charset(charset: &str, bytes: &[u8]) -> String {
	let encoding = encoding_rs::Encoding::for_label(charset.trim().as_bytes())
		.unwrap_or(encoding_rs::UTF_8);
	let (decoded, _, _) = encoding.decode(bytes);
	decoded.into_owned()
}

/// Represents an attachment on an email message.
///
/// An attachment is either a `(filename, content, mimetype)` triple, where
/// filename and mimetype may be missing, or a structured [`MimePart`].
///
/// # Examples
///
/// ```
/// use djblue_mail::Attachment;
///
/// let data = b"Hello, world!".to_vec();
/// let attachment = Attachment::new("hello.txt", data);
/// assert_eq!(attachment.filename().as_deref(), Some("hello.txt"));
/// assert_eq!(attachment.mimetype(), "text/plain");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
	File {
		filename: Option<String>,
		content: AttachmentContent,
		mimetype: Option<String>,
	},
	Mime(MimePart),
}

impl Attachment {
	/// Create a file attachment from bytes; the MIME type is guessed later
	pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
		Self::File {
			filename: Some(filename.into()),
			content: AttachmentContent::Bytes(content),
			mimetype: None,
		}
	}

	/// Create a file attachment from a full triple
	pub fn file(
		filename: Option<String>,
		content: impl Into<AttachmentContent>,
		mimetype: Option<String>,
	) -> Self {
		Self::File {
			filename,
			content: content.into(),
			mimetype,
		}
	}

	/// Wrap a structured MIME part
	pub fn mime(part: MimePart) -> Self {
		Self::Mime(part)
	}

	/// Create an inline attachment (for embedded images, etc.)
	///
	/// The MIME type is detected from the filename and the Content-ID header
	/// is written in its bracketed form.
	///
	/// # Examples
	///
	/// ```
	/// use djblue_mail::Attachment;
	///
	/// let image_data = b"\x89PNG\r\n\x1a\n".to_vec();
	/// let attachment = Attachment::inline("logo.png", image_data, "logo-cid");
	/// assert_eq!(attachment.content_id(), Some("<logo-cid>"));
	/// assert_eq!(attachment.mimetype(), "image/png");
	/// ```
	pub fn inline(filename: impl Into<String>, content: Vec<u8>, content_id: impl AsRef<str>) -> Self {
		let filename = filename.into();
		let part = MimePart::new(guess_mime_type(&filename), content)
			.with_header("Content-Disposition", disposition("inline", &filename))
			.with_content_id(format!("<{}>", content_id.as_ref()));
		Self::Mime(part)
	}

	/// Get the filename, if any
	pub fn filename(&self) -> Option<String> {
		match self {
			Self::File { filename, .. } => filename.clone(),
			Self::Mime(part) => part.filename(),
		}
	}

	/// Get the MIME type, guessing it from the filename when it is missing
	pub fn mimetype(&self) -> String {
		match self {
			Self::File {
				filename, mimetype, ..
			} => mimetype
				.clone()
				.or_else(|| filename.as_deref().map(guess_mime_type))
				.unwrap_or_else(|| crate::DEFAULT_ATTACHMENT_MIME_TYPE.to_string()),
			Self::Mime(part) => part.content_type(),
		}
	}

	/// Get the Content-ID header of a MIME part
	pub fn content_id(&self) -> Option<&str> {
		match self {
			Self::File { .. } => None,
			Self::Mime(part) => part.header("Content-ID"),
		}
	}
}

/// Guess a MIME type from a filename extension.
pub fn guess_mime_type(filename: &str) -> String {
	mime_guess::from_path(filename)
		.first()
		.map(|mime| mime.to_string())
		.unwrap_or_else(|| crate::DEFAULT_ATTACHMENT_MIME_TYPE.to_string())
}

/// Raw response returned by an email provider for one API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResponse {
	pub status: u16,
	pub body: String,
}

impl ProviderResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	/// Providers signal success with HTTP 200 only.
	pub fn is_success(&self) -> bool {
		self.status == 200
	}

	/// The body parsed as JSON, if it is JSON.
	pub fn json(&self) -> Option<Value> {
		serde_json::from_str(&self.body).ok()
	}
}

/// Represents an email message with validated addresses.
///
/// All fields are private to enforce validation through the builder. Every
/// optional feature is an explicit field: templates, merge variables and the
/// sender/subject suppression switches are always present.
#[derive(Debug, Clone)]
pub struct EmailMessage {
	subject: String,
	body: String,
	from_email: String,
	to: Vec<String>,
	cc: Vec<String>,
	bcc: Vec<String>,
	reply_to: Vec<String>,
	encoding: Option<String>,
	alternatives: Vec<Alternative>,
	attachments: Vec<Attachment>,
	headers: Vec<(String, String)>,
	template_id: Option<String>,
	use_template_from: bool,
	use_template_subject: bool,
	global_merge_vars: Option<Map<String, Value>>,
	provider_response: Option<ProviderResponse>,
}

impl EmailMessage {
	/// Create a new builder for constructing an `EmailMessage`.
	pub fn builder() -> EmailMessageBuilder {
		EmailMessageBuilder::default()
	}

	pub fn subject(&self) -> &str {
		&self.subject
	}

	pub fn body(&self) -> &str {
		&self.body
	}

	pub fn from_email(&self) -> &str {
		&self.from_email
	}

	pub fn to(&self) -> &[String] {
		&self.to
	}

	pub fn cc(&self) -> &[String] {
		&self.cc
	}

	pub fn bcc(&self) -> &[String] {
		&self.bcc
	}

	pub fn reply_to(&self) -> &[String] {
		&self.reply_to
	}

	/// Declared charset, if any.
	pub fn encoding(&self) -> Option<&str> {
		self.encoding.as_deref()
	}

	/// Charset to use when encoding text content.
	pub fn charset(&self) -> &str {
		self.encoding.as_deref().unwrap_or(crate::DEFAULT_CHARSET)
	}

	pub fn alternatives(&self) -> &[Alternative] {
		&self.alternatives
	}

	/// Content of the first `text/html` alternative.
	pub fn html_body(&self) -> Option<&str> {
		self.alternatives
			.iter()
			.find(|alt| alt.mimetype() == "text/html")
			.map(Alternative::content)
	}

	pub fn attachments(&self) -> &[Attachment] {
		&self.attachments
	}

	pub fn headers(&self) -> &[(String, String)] {
		&self.headers
	}

	pub fn template_id(&self) -> Option<&str> {
		self.template_id.as_deref()
	}

	/// Whether the message references a remote template.
	pub fn is_template(&self) -> bool {
		self.template_id.is_some()
	}

	/// The template supplies the sender.
	pub fn use_template_from(&self) -> bool {
		self.use_template_from
	}

	/// The template supplies the subject.
	pub fn use_template_subject(&self) -> bool {
		self.use_template_subject
	}

	pub fn global_merge_vars(&self) -> Option<&Map<String, Value>> {
		self.global_merge_vars.as_ref()
	}

	/// All recipients: to, then cc, then bcc.
	pub fn recipients(&self) -> Vec<&str> {
		self.to
			.iter()
			.chain(&self.cc)
			.chain(&self.bcc)
			.map(String::as_str)
			.collect()
	}

	/// Last raw provider response recorded by a backend.
	pub fn provider_response(&self) -> Option<&ProviderResponse> {
		self.provider_response.as_ref()
	}

	pub fn set_provider_response(&mut self, response: ProviderResponse) {
		self.provider_response = Some(response);
	}

	pub fn clear_provider_response(&mut self) {
		self.provider_response = None;
	}

	/// Send the email using the given backend.
	///
	/// Returns whether the backend counted the message as sent.
	pub async fn send<B>(&mut self, backend: &B) -> Result<bool, B::Error>
	where
		B: EmailBackend + ?Sized,
	{
		let sent = backend.send_messages(std::slice::from_mut(self)).await?;
		Ok(sent == 1)
	}
}

#[derive(Default)]
pub struct EmailMessageBuilder {
	subject: String,
	body: String,
	from_email: String,
	to: Vec<String>,
	cc: Vec<String>,
	bcc: Vec<String>,
	reply_to: Vec<String>,
	encoding: Option<String>,
	alternatives: Vec<Alternative>,
	attachments: Vec<Attachment>,
	headers: Vec<(String, String)>,
	template_id: Option<String>,
	use_template_from: bool,
	use_template_subject: bool,
	global_merge_vars: Option<Map<String, Value>>,
}

impl EmailMessageBuilder {
	pub fn subject(mut self, subject: impl Into<String>) -> Self {
		self.subject = subject.into();
		self
	}

	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();
		self
	}

	pub fn from(mut self, from: impl Into<String>) -> Self {
		self.from_email = from.into();
		self
	}

	pub fn from_email(mut self, from: impl Into<String>) -> Self {
		self.from_email = from.into();
		self
	}

	pub fn to(mut self, to: Vec<String>) -> Self {
		self.to = to;
		self
	}

	pub fn cc(mut self, cc: Vec<String>) -> Self {
		self.cc = cc;
		self
	}

	pub fn bcc(mut self, bcc: Vec<String>) -> Self {
		self.bcc = bcc;
		self
	}

	pub fn reply_to(mut self, reply_to: Vec<String>) -> Self {
		self.reply_to = reply_to;
		self
	}

	pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
		self.encoding = Some(encoding.into());
		self
	}

	/// Attach an HTML alternative (shorthand for `alternative(Alternative::html(..))`)
	pub fn html(mut self, html: impl Into<String>) -> Self {
		self.alternatives.push(Alternative::html(html));
		self
	}

	pub fn alternative(mut self, alternative: Alternative) -> Self {
		self.alternatives.push(alternative);
		self
	}

	pub fn attachment(mut self, attachment: Attachment) -> Self {
		self.attachments.push(attachment);
		self
	}

	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn template_id(mut self, template_id: impl Into<String>) -> Self {
		self.template_id = Some(template_id.into());
		self
	}

	pub fn use_template_from(mut self, enabled: bool) -> Self {
		self.use_template_from = enabled;
		self
	}

	pub fn use_template_subject(mut self, enabled: bool) -> Self {
		self.use_template_subject = enabled;
		self
	}

	/// Replace the merge variables
	pub fn global_merge_vars(mut self, vars: Map<String, Value>) -> Self {
		self.global_merge_vars = Some(vars);
		self
	}

	/// Add one merge variable
	pub fn merge_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.global_merge_vars
			.get_or_insert_with(Map::new)
			.insert(name.into(), value.into());
		self
	}

	/// Build the email message with validation.
	///
	/// Validates every address with [`parse_address`](crate::parse_address)
	/// and checks subject/header values for header injection before
	/// constructing the message.
	pub fn build(self) -> crate::EmailResult<EmailMessage> {
		use crate::address::parse_address;

		if !self.from_email.is_empty() {
			parse_address(&self.from_email)?;
		}

		for address in self
			.to
			.iter()
			.chain(&self.cc)
			.chain(&self.bcc)
			.chain(&self.reply_to)
		{
			parse_address(address)?;
		}

		check_header_injection(&self.subject)?;

		for (name, value) in &self.headers {
			validate_header_name(name)?;
			check_header_injection(value)?;
		}

		Ok(EmailMessage {
			subject: self.subject,
			body: self.body,
			from_email: self.from_email,
			to: self.to,
			cc: self.cc,
			bcc: self.bcc,
			reply_to: self.reply_to,
			encoding: self.encoding,
			alternatives: self.alternatives,
			attachments: self.attachments,
			headers: self.headers,
			template_id: self.template_id,
			use_template_from: self.use_template_from,
			use_template_subject: self.use_template_subject,
			global_merge_vars: self.global_merge_vars,
			provider_response: None,
		})
	}
}

fn check_header_injection(value: &str) -> crate::EmailResult<()> {
	if value.contains(['\r', '\n']) {
		return Err(crate::EmailError::HeaderInjection(value.to_string()));
	}
	Ok(())
}

// RFC 2822: printable ASCII except colon
fn validate_header_name(name: &str) -> crate::EmailResult<()> {
	let valid = !name.is_empty() && name.bytes().all(|b| (33..=126).contains(&b) && b != b':');
	if !valid {
		return Err(crate::EmailError::InvalidHeader(name.to_string()));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("attachment; filename=\"report.pdf\"", Some("report.pdf"))]
	#[case("attachment; FILENAME=plain.txt", Some("plain.txt"))]
	#[case("inline", None)]
	#[case("attachment; filename=\"a;b.pdf\"", Some("a;b.pdf"))]
	#[case("attachment; filename=\"say \\\"hi\\\".txt\"", Some("say \"hi\".txt"))]
	#[case("attachment; filename*=UTF-8''na%C3%AFve.txt", Some("naïve.txt"))]
	#[case("attachment; filename*=iso-8859-1'en'caf%E9.txt", Some("café.txt"))]
	#[case("attachment; filename*0*=utf-8''r%C3%A9sum; filename*1=\"e.pdf\"", Some("résume.pdf"))]
	#[case("attachment; filename=fallback.txt; filename*=utf-8''pr%C3%A9f.txt", Some("préf.txt"))]
	fn test_header_param(#[case] value: &str, #[case] expected: Option<&str>) {
		assert_eq!(header_param(value, "filename").as_deref(), expected);
	}

	#[rstest]
	#[case("a;b.pdf")]
	#[case("quote\"and\\slash.txt")]
	#[case("naïve résumé.pdf")]
	fn test_with_filename_round_trips(#[case] filename: &str) {
		let part = MimePart::new("application/pdf", vec![1]).with_filename(filename);
		assert_eq!(part.filename().as_deref(), Some(filename));
	}

	#[rstest]
	fn test_inline_filename_round_trips() {
		let attachment = Attachment::inline("chart; v2.png", vec![1], "chart");
		assert_eq!(attachment.filename().as_deref(), Some("chart; v2.png"));
	}

	#[rstest]
	fn test_mime_part_filename_falls_back_to_content_type_name() {
		let part = MimePart::new("application/pdf; name=\"doc.pdf\"", vec![]);
		assert_eq!(part.filename().as_deref(), Some("doc.pdf"));
		assert_eq!(part.content_type(), "application/pdf");
	}

	#[rstest]
	fn test_mime_part_without_content_type_defaults_to_text_plain() {
		let part = MimePart {
			headers: vec![],
			payload: b"x".to_vec(),
		};
		assert_eq!(part.content_type(), "text/plain");
		assert_eq!(part.content_maintype(), "text");
	}

	#[rstest]
	fn test_file_attachment_mimetype_fallback() {
		let unnamed = Attachment::file(None, b"data".to_vec(), None);
		assert_eq!(unnamed.mimetype(), "application/octet-stream");

		let explicit = Attachment::file(
			Some("data.bin".to_string()),
			b"data".to_vec(),
			Some("application/x-custom".to_string()),
		);
		assert_eq!(explicit.mimetype(), "application/x-custom");
	}

	#[rstest]
	#[case("X-Custom", true)]
	#[case("Bad:Name", false)]
	#[case("Bad Name", false)]
	#[case("", false)]
	fn test_validate_header_name(#[case] name: &str, #[case] valid: bool) {
		assert_eq!(validate_header_name(name).is_ok(), valid);
	}
}
