//! SendinBlue email backend.
//!
//! # Examples
//!
//! ```rust,no_run
//! use djblue::sendinblue::SendinBlueBackend;
//!
//! let backend = SendinBlueBackend::from_env().unwrap();
//! ```

#[cfg(feature = "sendinblue")]
pub use djblue_sendinblue::*;
