//! Input resolution for the address bar
//!
//! 1. `http://` / `https://` address → navigate unchanged
//! 2. Bare domain (has a dot, no spaces) → navigate over https
//! 3. Anything else → search
//!
//! Nothing here touches the network. A bad address only shows up later as a
//! failed navigation reported by the engine.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Default search engine URL template (`%s` replaced with the query)
pub const DEFAULT_SEARCH_TEMPLATE: &str = "https://duckduckgo.com/?q=%s";

/// Everything outside the RFC 3986 unreserved set gets escaped.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const SCHEME_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Result of resolving address bar input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum InputResolution {
    /// Navigate to an address
    Navigate(String),
    /// Search URL built from the input
    Search(String),
}

impl InputResolution {
    pub fn as_url(&self) -> &str {
        match self {
            InputResolution::Navigate(url) | InputResolution::Search(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            InputResolution::Navigate(url) | InputResolution::Search(url) => url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputResolver {
    /// Search engine URL template (%s replaced with query)
    search_template: String,
}

impl InputResolver {
    pub fn new() -> Self {
        Self::with_search_engine(DEFAULT_SEARCH_TEMPLATE.to_string())
    }

    pub fn with_search_engine(template: String) -> Self {
        Self {
            search_template: template,
        }
    }

    pub fn set_search_engine(&mut self, template: String) {
        self.search_template = template;
    }

    pub fn search_template(&self) -> &str {
        &self.search_template
    }

    /// Resolve user input into a navigable address
    pub fn resolve(&self, input: &str) -> InputResolution {
        let input = input.trim();

        if has_web_scheme(input) {
            return InputResolution::Navigate(input.to_string());
        }

        if looks_like_domain(input) {
            return InputResolution::Navigate(format!("https://{input}"));
        }

        InputResolution::Search(self.build_search_url(input))
    }

    fn build_search_url(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, QUERY_ENCODE_SET).to_string();
        self.search_template.replace("%s", &encoded)
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn free-text input into an address using the default search engine.
pub fn normalize(input: &str) -> String {
    InputResolver::new().resolve(input).into_url()
}

fn has_web_scheme(input: &str) -> bool {
    SCHEME_PREFIXES.iter().any(|prefix| {
        input
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

fn looks_like_domain(input: &str) -> bool {
    input.contains('.') && !input.contains(char::is_whitespace)
}
