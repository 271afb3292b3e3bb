//! URL canonicalisation for listing deduplication.

use url::Url;

/// Query parameters that only track the visitor and never identify a listing.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "ref",
    "referrer",
    "source",
];

/// Canonical form of a listing URL so that the same advert reached through
/// different links compares equal.
///
/// The host is lowercased and loses its `www.` prefix. The default port, the
/// fragment, tracking parameters and any trailing slash are dropped. The
/// remaining query parameters are sorted. Unparseable input is returned
/// trimmed and otherwise unchanged.
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    if parsed.port().is_some() && parsed.port() == default_port(parsed.scheme()) {
        let _ = parsed.set_port(None);
    }

    if let Some(host) = parsed.host_str() {
        let host = host.to_ascii_lowercase();
        let bare = host.strip_prefix("www.").unwrap_or(&host).to_string();
        let _ = parsed.set_host(Some(&bare));
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(params.iter());
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(path.trim_end_matches('/'));
    }

    parsed.to_string()
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}
