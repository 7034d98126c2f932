//! Yakoa token identifiers: `{contract}:{tokenId}`.

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("address pattern compiles"));

/// Build the Yakoa id for a token: lowercased contract address, a colon, the token id.
pub fn token_id(contract: &str, token: impl Display) -> String {
    format!("{}:{}", contract.trim().to_lowercase(), token)
}

/// Strip anything past `contract:token`.
///
/// Older registrations appended a millisecond timestamp (`addr:57:1754506037466`);
/// the API only knows the base id.
pub fn base_id(id: &str) -> String {
    let mut parts = id.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(contract), Some(token), Some(_)) => format!("{}:{}", contract, token),
        _ => id.to_string(),
    }
}

/// True for a `0x`-prefixed, 40-hex-digit address string.
pub fn is_address(candidate: &str) -> bool {
    ADDRESS.is_match(candidate)
}
