//! Compact address labels for the tab strip and sidebar

use url::Url;

/// Short host-only label for an address.
///
/// `https://www.example.com/a/b?c` becomes `example.com`. Addresses without a
/// host (`about:blank`, `data:` URLs) or that fail to parse are returned
/// trimmed but otherwise as given.
pub fn display_address(address: &str) -> String {
    let address = address.trim();

    let host = Url::parse(address)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .filter(|host| !host.is_empty());

    match host {
        Some(host) => match host.strip_prefix("www.") {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => host,
        },
        None => address.to_string(),
    }
}
