//! Trust boundary for generated markup
//!
//! Markup produced by a generation step (the SVG blueprint) is carried as
//! [`UntrustedMarkup`]. The core guarantees only that it is a string; whoever
//! renders it must sanitize it first.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally generated markup that has not been sanitized.
///
/// Serializes as `{ "trusted": false, "markup": "..." }` so that consumers
/// of the JSON API see the boundary as well.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Tagged", into = "Tagged")]
pub struct UntrustedMarkup(String);

#[derive(Serialize, Deserialize)]
struct Tagged {
    trusted: bool,
    markup: String,
}

impl From<Tagged> for UntrustedMarkup {
    fn from(tagged: Tagged) -> Self {
        // Anything coming back in is untrusted regardless of the flag.
        UntrustedMarkup(tagged.markup)
    }
}

impl From<UntrustedMarkup> for Tagged {
    fn from(markup: UntrustedMarkup) -> Self {
        Tagged {
            trusted: false,
            markup: markup.0,
        }
    }
}

impl UntrustedMarkup {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// Raw, unsanitized content. Callers embedding this in a document are
    /// responsible for sanitizing it.
    pub fn as_unsanitized_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for UntrustedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UntrustedMarkup({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_untrusted_tag() {
        let markup = UntrustedMarkup::new("<svg></svg>");
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "trusted": false, "markup": "<svg></svg>" })
        );
    }

    #[test]
    fn test_trusted_flag_is_ignored_on_input() {
        let json = serde_json::json!({ "trusted": true, "markup": "<svg/>" });
        let markup: UntrustedMarkup = serde_json::from_value(json).unwrap();
        let back = serde_json::to_value(&markup).unwrap();
        assert_eq!(back["trusted"], serde_json::json!(false));
        assert_eq!(markup.as_unsanitized_str(), "<svg/>");
    }
}
