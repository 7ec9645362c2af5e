//! Civitai page and API URLs.

use std::borrow::Cow;
use url::form_urlencoded;

/// Marker that must appear in a Civitai URL for the safetensors format.
pub const SAFETENSOR_MARKER: &str = "SafeTensor";

const VERSION_PARAM: &str = "modelVersionId";
const TOKEN_PARAM: &str = "token";
const TOKEN_MASK: &str = "***";

/// Rewrites a model page URL carrying `modelVersionId` into the direct
/// download API form. Other query parameters are discarded. URLs without the
/// parameter are returned unchanged.
///
/// `https://civitai.com/models/111?modelVersionId=5000` becomes
/// `https://civitai.com/api/download/models/5000?type=Model&format=SafeTensor`.
pub fn canonical_download_url(url: &str) -> Cow<'_, str> {
    match version_id(url) {
        Some(id) => Cow::Owned(format!(
            "https://civitai.com/api/download/models/{id}?type=Model&format={SAFETENSOR_MARKER}"
        )),
        None => Cow::Borrowed(url),
    }
}

/// Appends `token=<api_key>` to the query string, form-urlencoding the key.
pub fn inject_token(url: &str, api_key: &str) -> String {
    let key = api_key.trim();
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair(TOKEN_PARAM, key);
            parsed.into()
        }
        Err(_) => {
            let sep = if url.contains('?') { '&' } else { '?' };
            let key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
            format!("{url}{sep}{TOKEN_PARAM}={key}")
        }
    }
}

/// Same URL with every `token` query value masked, for logs and errors.
pub fn redact_token(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let pairs: Vec<Cow<'_, str>> = query
        .split('&')
        .map(|pair| {
            let is_token = form_urlencoded::parse(pair.as_bytes())
                .next()
                .is_some_and(|(k, _)| k == TOKEN_PARAM);
            if is_token {
                Cow::Owned(format!("{TOKEN_PARAM}={TOKEN_MASK}"))
            } else {
                Cow::Borrowed(pair)
            }
        })
        .collect();
    format!("{base}?{}", pairs.join("&"))
}

fn version_id(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let (_, id) = parsed.query_pairs().find(|(k, _)| k == VERSION_PARAM)?;
    Some(id.into_owned())
}
