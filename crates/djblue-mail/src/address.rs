//! Address sanitizing and parsing
//!
//! Turns `"Name <addr@example.com>"`, `"\"Name\" <addr@example.com>"`,
//! `addr@example.com (Name)` or a bare `addr@example.com` into a validated
//! (display name, address) pair. Mailbox syntax is parsed by `mailparse`;
//! domains are converted to their ASCII (punycode) form.

use mailparse::MailAddr;

use crate::{EmailError, EmailResult};

/// Characters that force a display name to be quoted when rendered.
const NAME_SPECIALS: &[char] = &['(', ')', '<', '>', '[', ']', ':', ';', '@', '\\', ',', '.', '"'];

/// A sanitized address with its optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
	pub name: Option<String>,
	pub address: String,
}

impl ParsedAddress {
	/// Part of the address before the last `@`.
	pub fn local_part(&self) -> &str {
		self.address
			.rsplit_once('@')
			.map(|(local, _)| local)
			.unwrap_or(&self.address)
	}

	/// The display name, or the local part when no name was given.
	///
	/// # Examples
	///
	/// ```
	/// use djblue_mail::parse_address;
	///
	/// let named = parse_address("Jane Doe <jane@example.com>").unwrap();
	/// assert_eq!(named.display_name(), "Jane Doe");
	///
	/// let bare = parse_address("jane@example.com").unwrap();
	/// assert_eq!(bare.display_name(), "jane");
	/// ```
	pub fn display_name(&self) -> String {
		match &self.name {
			Some(name) => name.clone(),
			None => self.local_part().to_string(),
		}
	}
}

/// Parse and sanitize a single address.
///
/// Accepts the name-addr form (`Name <addr>`), a bare addr-spec (quoted local
/// parts included) and an addr-spec followed by a `(comment)`, which is used as
/// the display name. Lists and groups are rejected.
pub fn parse_address(raw: &str) -> EmailResult<ParsedAddress> {
	if raw.contains(['\r', '\n']) {
		return Err(EmailError::HeaderInjection(raw.to_string()));
	}

	let invalid = || EmailError::InvalidAddress(raw.to_string());
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return Err(invalid());
	}

	let (spec, comment) = split_trailing_comment(trimmed);
	// A bare addr-spec goes through the angle-bracket path so a quoted local
	// part is not taken for a display name.
	let mailbox = if spec.contains('<') {
		spec.to_string()
	} else {
		format!("<{}>", spec)
	};

	let list = mailparse::addrparse(&mailbox).map_err(|_| invalid())?;
	let (name, address) = match list.as_slice() {
		[MailAddr::Single(info)] => (info.display_name.clone(), info.addr.clone()),
		_ => return Err(invalid()),
	};

	let name = comment
		.or(name)
		.map(|name| name.trim().to_string())
		.filter(|name| !name.is_empty());
	let address = normalize_addr_spec(address.trim()).ok_or_else(invalid)?;

	Ok(ParsedAddress { name, address })
}

/// Parse an address and render it back as a canonical string.
///
/// Named addresses come back as `Name <local@ascii-domain>`, bare ones as
/// `local@ascii-domain`. Names containing specials are quoted.
pub fn sanitize_address(raw: &str) -> EmailResult<String> {
	let parsed = parse_address(raw)?;
	Ok(match parsed.name {
		Some(name) if name.contains(NAME_SPECIALS) => format!(
			"\"{}\" <{}>",
			name.replace('\\', "\\\\").replace('"', "\\\""),
			parsed.address
		),
		Some(name) => format!("{} <{}>", name, parsed.address),
		None => parsed.address,
	})
}

/// Split `addr (Comment)` into the address and the comment text.
fn split_trailing_comment(raw: &str) -> (&str, Option<String>) {
	if raw.contains('<') || !raw.ends_with(')') {
		return (raw, None);
	}
	match raw.rfind('(') {
		Some(open) if open > 0 => {
			let comment = raw[open + 1..raw.len() - 1].to_string();
			(raw[..open].trim_end(), Some(comment))
		}
		_ => (raw, None),
	}
}

fn normalize_addr_spec(address: &str) -> Option<String> {
	let (local, domain) = address.rsplit_once('@')?;
	if !is_valid_local_part(local) {
		return None;
	}
	if domain.is_empty()
		|| domain.split('.').any(str::is_empty)
		|| domain.chars().any(|c| c.is_whitespace() || "<>\"()[],;:\\".contains(c))
	{
		return None;
	}

	let domain = idna::domain_to_ascii(domain).ok()?;
	Some(format!("{}@{}", local, domain))
}

fn is_valid_local_part(local: &str) -> bool {
	if let Some(inner) = local.strip_prefix('"').and_then(|l| l.strip_suffix('"')) {
		let mut chars = inner.chars();
		while let Some(c) = chars.next() {
			match c {
				'\\' => {
					if chars.next().is_none() {
						return false;
					}
				}
				'"' => return false,
				c if c.is_control() => return false,
				_ => {}
			}
		}
		return true;
	}

	!local.is_empty()
		&& !local
			.chars()
			.any(|c| c.is_whitespace() || c.is_control() || "<>\"()[],;:\\@".contains(c))
}
