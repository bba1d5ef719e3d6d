//! Log-safe views of player-supplied text.
//!
//! Emails and opaque tokens are masked wherever they appear; report text is
//! never logged at all, only its size.

use std::fmt;

use lazy_regex::{lazy_regex, Lazy};
use regex::{Captures, Regex};

static EMAIL: Lazy<Regex> = lazy_regex!(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b");
static BASE64_TOKEN: Lazy<Regex> = lazy_regex!(r"\b[A-Za-z0-9+/]{16,}={0,2}\b");
static HEX_TOKEN: Lazy<Regex> = lazy_regex!(r"\b[A-Fa-f0-9]{16,}\b");

/// Masks emails (first character of the local part survives, domain is kept)
/// and base64/hex runs of 16+ characters.
pub fn redact(input: &str) -> String {
    let emails_masked = EMAIL.replace_all(input, |caps: &Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => full.to_string(),
        }
    });

    let base64_masked = BASE64_TOKEN.replace_all(&emails_masked, "[REDACTED_TOKEN]");
    HEX_TOKEN
        .replace_all(&base64_masked, "[REDACTED_TOKEN]")
        .to_string()
}

/// Display wrapper applying [`redact`].
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

/// Display wrapper for free-form text that only reveals its length.
pub struct Withheld<'a>(pub &'a str);

impl fmt::Display for Withheld<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} chars withheld]", self.0.chars().count())
    }
}

impl fmt::Debug for Withheld<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
