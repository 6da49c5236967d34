//! Email backend trait

use async_trait::async_trait;

use crate::message::EmailMessage;

/// A backend able to deliver a batch of messages.
///
/// Backends may record diagnostics on the messages they are given (see
/// [`EmailMessage::provider_response`]), which is why the batch is borrowed
/// mutably.
#[async_trait]
pub trait EmailBackend: Send + Sync {
	type Error: std::error::Error + Send + Sync + 'static;

	/// Send the messages in order and return how many were sent.
	async fn send_messages(&self, messages: &mut [EmailMessage]) -> Result<usize, Self::Error>;
}
