//! # djblue
//!
//! Django-style email messages delivered through the SendinBlue
//! transactional API.
//!
//! The workspace is split into two crates, re-exported here behind feature
//! flags:
//!
//! - `mail` - [`EmailMessage`], attachments and the [`EmailBackend`] trait
//! - `sendinblue` - [`SendinBlueBackend`], its settings and error type
//! - `full` (default) - everything
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use djblue::{EmailBackend, EmailMessage, SendinBlueBackend, SendinBlueSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SendinBlueSettings::from_toml_str(r#"
//! api_key = "xkeysib-..."
//! fail_silently = true
//! "#)?;
//! let backend = SendinBlueBackend::new(settings)?;
//!
//! let mut messages = vec![
//! 	EmailMessage::builder()
//! 		.from("Shop <shop@example.com>")
//! 		.to(vec!["customer@example.com".to_string()])
//! 		.subject("Welcome")
//! 		.body("Thanks for signing up.")
//! 		.html("<p>Thanks for signing up.</p>")
//! 		.build()?,
//! ];
//! let sent = backend.send_messages(&mut messages).await?;
//! println!("sent {} message(s)", sent);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "mail")]
pub mod mail;
#[cfg(feature = "sendinblue")]
pub mod sendinblue;

// Re-export the message model
#[cfg(feature = "mail")]
pub use djblue_mail::{
	Alternative, Attachment, EmailBackend, EmailError, EmailMessage, EmailMessageBuilder,
	MimePart, ProviderResponse,
};

// Re-export the SendinBlue backend
#[cfg(feature = "sendinblue")]
pub use djblue_sendinblue::{
	ErrorKind, SendinBlueBackend, SendinBlueError, SendinBlueResult, SendinBlueSettings,
};
