//! Single blocking HTTP GET that buffers the whole body in memory.

use crate::error::{LoraError, Result};
use std::time::Duration;

/// Transfer knobs taken from the config file.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub max_redirections: u32,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            max_redirections: 10,
        }
    }
}

/// GETs `url`, following redirects, and returns the body on a 200 status.
///
/// Any other final status becomes [`LoraError::Download`] and the body is
/// dropped. A cached file is never re-checked, so 206 partial and 204 empty
/// bodies must not reach the cache.
/// `log_url` is what gets logged (callers pass a redacted form).
pub fn get_bytes(url: &str, log_url: &str, opts: HttpOptions) -> Result<Vec<u8>> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirections)?;
    easy.connect_timeout(opts.connect_timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if code != 200 {
        tracing::warn!(status = code, "GET {} failed", log_url);
        return Err(LoraError::Download {
            url: log_url.to_string(),
            status: code,
        });
    }

    tracing::debug!(status = code, bytes = body.len(), "GET {} done", log_url);
    Ok(body)
}
