//! # djblue mail
//!
//! Django-style email messages for djblue backends.
//!
//! ## Features
//!
//! - **EmailMessage**: Validated message record built through a fluent builder
//! - **Alternative Content**: HTML (or other) representations of the body
//! - **Attachments**: File triples or structured MIME parts, with MIME type guessing
//! - **Inline Images**: Image parts carrying a `Content-ID` header
//! - **Templates**: Remote template reference, merge variables and the
//!   `use_template_from` / `use_template_subject` switches
//! - **Address Utilities**: Sanitizing and parsing of `"Name <addr>"` strings
//! - **Backend Trait**: [`EmailBackend`], the async "send these messages" contract
//!
//! ## Examples
//!
//! ### HTML Email with Inline Images
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use djblue_mail::{Attachment, EmailMessage};
//!
//! let logo = Attachment::inline("logo.png", b"PNG content".to_vec(), "logo-cid");
//!
//! let email = EmailMessage::builder()
//!     .from("Marketing <marketing@example.com>")
//!     .to(vec!["customer@example.com".to_string()])
//!     .subject("Newsletter")
//!     .body("Newsletter content")
//!     .html(r#"<html><body><img src="cid:logo-cid"/><h1>Newsletter</h1></body></html>"#)
//!     .attachment(logo)
//!     .build()?;
//!
//! assert_eq!(email.recipients().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ### Template-based Emails
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use djblue_mail::EmailMessage;
//!
//! let email = EmailMessage::builder()
//!     .to(vec!["customer@example.com".to_string()])
//!     .template_id("12")
//!     .merge_var("ORDER_ID", "12345")
//!     .build()?;
//!
//! assert!(email.is_template());
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod backend;
pub mod message;

use thiserror::Error;

pub use address::{ParsedAddress, parse_address, sanitize_address};
pub use backend::EmailBackend;
pub use message::{
	Alternative, Attachment, AttachmentContent, EmailMessage, EmailMessageBuilder, MimePart,
	ProviderResponse,
};

/// Default charset used when a message does not declare one.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// MIME type used for attachments whose type cannot be guessed.
pub const DEFAULT_ATTACHMENT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum EmailError {
	#[error("Invalid email address: {0}")]
	InvalidAddress(String),

	#[error("Invalid header: {0}")]
	InvalidHeader(String),

	#[error("Header injection attempt detected: {0}")]
	HeaderInjection(String),
}

pub type EmailResult<T> = std::result::Result<T, EmailError>;
