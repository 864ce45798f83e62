use crate::{UrlError, UrlResult};
use url::Url;

/// Click-tracking parameters dropped from sitemap URLs; any `utm_*` key is
/// dropped as well
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "msclkid", "mc_eid", "_ga"];

/// Normalizes a sitemap URL so that duplicate entries collapse
///
/// Sitemaps of large sites list the same page more than once, with and
/// without a trailing slash, a fragment or campaign parameters. The result
/// of this function is also the URL that gets fetched, so scheme and host
/// are kept apart from lowercasing the host.
///
/// - only `http` and `https` URLs with a host are accepted
/// - dot segments, repeated slashes and the trailing slash are removed
/// - the fragment is removed
/// - tracking parameters are removed and the rest sorted
///
/// # Examples
///
/// ```
/// use bilingual_harvest::url::normalize_url;
///
/// let url = normalize_url("https://WWW.GOV.WALES/en/page/#top").unwrap();
/// assert_eq!(url.as_str(), "https://www.gov.wales/en/page");
/// ```
pub fn normalize_url(raw: &str) -> UrlResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    let path = collapse_path(url.path());
    url.set_path(&path);
    url.set_fragment(None);
    clean_query(&mut url);

    Ok(url)
}

/// Resolves `.`/`..`, drops empty segments and the trailing slash
fn collapse_path(path: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                kept.pop();
            }
            _ => kept.push(segment),
        }
    }

    format!("/{}", kept.join("/"))
}

fn clean_query(url: &mut Url) {
    if url.query().is_none() {
        return;
    }

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    params.sort();

    if params.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(params);
    }
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
