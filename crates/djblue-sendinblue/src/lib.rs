//! # djblue-sendinblue
//!
//! Email backend delivering [`djblue_mail::EmailMessage`]s through the
//! SendinBlue transactional API (v2).
//!
//! ## Features
//!
//! - **Standard sends**: subject, plain text body, one HTML alternative,
//!   attachments and inline images
//! - **Transactional templates**: a stored template rendered with the
//!   message's global merge variables
//! - **Per-recipient delivery**: every to/cc/bcc recipient gets its own call
//! - **Fail silently**: optionally log failures and keep sending
//!
//! ## Example
//!
//! ```rust,no_run
//! use djblue_mail::EmailMessage;
//! use djblue_sendinblue::{SendinBlueBackend, SendinBlueSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SendinBlueBackend::new(
//! 	SendinBlueSettings::new("xkeysib-...").with_fail_silently(true),
//! )?;
//!
//! let mut message = EmailMessage::builder()
//! 	.from("orders@example.com")
//! 	.to(vec!["customer@example.com".to_string()])
//! 	.template_id("12")
//! 	.merge_var("ORDER", 1042)
//! 	.build()?;
//!
//! message.send(&backend).await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod payload;
pub mod settings;

pub use backend::SendinBlueBackend;
pub use client::{ApiSession, Connector, HttpConnector, HttpSession};
pub use error::{ErrorKind, SendinBlueError, SendinBlueResult};
pub use payload::{Payload, PayloadContent, PayloadTo, Recipient, build_payload};
pub use settings::{DEFAULT_API_URL, SendinBlueSettings};
