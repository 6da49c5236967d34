//! Email message model.
//!
//! # Examples
//!
//! ```rust
//! use djblue::mail::{Attachment, EmailMessage};
//!
//! let message = EmailMessage::builder()
//! 	.from("shop@example.com")
//! 	.to(vec!["customer@example.com".to_string()])
//! 	.attachment(Attachment::new("receipt.txt", b"Total: 10".to_vec()))
//! 	.build()
//! 	.unwrap();
//! assert_eq!(message.attachments().len(), 1);
//! ```

#[cfg(feature = "mail")]
pub use djblue_mail::*;
