//! IPFS URI helpers.

use url::Url;

/// `ipfs://{cid}`.
pub fn ipfs_uri(cid: &str) -> String {
    format!("ipfs://{}", cid)
}

/// Rewrite an IPFS reference onto `gateway`.
///
/// `ipfs://X` and any URL containing `/ipfs/X` become `{gateway}/ipfs/X`.
/// Anything else is returned unchanged.
pub fn gateway_url(gateway: &str, url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let gateway = gateway.trim_end_matches('/');

    if let Some(cid) = url.strip_prefix("ipfs://") {
        return format!("{}/ipfs/{}", gateway, cid);
    }
    if let Some((_, cid)) = url.split_once("/ipfs/") {
        return format!("{}/ipfs/{}", gateway, cid);
    }
    url.to_string()
}

/// True for `ipfs://` URIs, `/ipfs/` paths and http(s) URLs whose path
/// contains `/ipfs/`. Inline JSON metadata is never a reference.
pub fn is_ipfs_reference(value: &str) -> bool {
    if value.starts_with("ipfs://") || value.starts_with("/ipfs/") {
        return true;
    }
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.path().contains("/ipfs/"),
        Err(_) => false,
    }
}
