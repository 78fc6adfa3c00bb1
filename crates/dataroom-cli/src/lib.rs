use dataroom_client::UploadCandidate;
use tracing_subscriber::EnvFilter;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Multipart candidates for endpoints given on the command line, in order.
pub fn endpoint_candidates(urls: &[String]) -> Vec<UploadCandidate> {
    urls.iter()
        .enumerate()
        .map(|(i, url)| UploadCandidate::multipart(format!("endpoint-{}", i + 1), url.clone()))
        .collect()
}

/// Offset of the first differing byte, or `None` when both are identical.
pub fn first_mismatch(expected: &[u8], actual: &[u8]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}

/// Log filter from a `RUST_LOG` value, `info` when unset or unparsable.
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Load `.env`, then initialize tracing so a `RUST_LOG` set there applies.
/// Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    dotenvy::dotenv().ok();
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_multibyte() {
        assert_eq!(truncate_string("déjà vu encore", 7), "déjà...");
    }

    #[test]
    fn endpoints_keep_command_line_order() {
        let candidates = endpoint_candidates(&[
            "http://a/api/upload-file".to_string(),
            "http://b/functions/v1/upload-file".to_string(),
        ]);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "endpoint-1");
        assert_eq!(candidates[1].endpoint_url, "http://b/functions/v1/upload-file");
    }

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("dataroom_client=debug")).to_string(), "dataroom_client=debug");
        assert_eq!(log_filter(Some("dataroom=verbose")).to_string(), "info");
    }

    #[test]
    fn mismatch_offsets() {
        assert_eq!(first_mismatch(b"abc", b"abc"), None);
        assert_eq!(first_mismatch(b"abc", b"abd"), Some(2));
        assert_eq!(first_mismatch(b"abc", b"ab"), Some(2));
        assert_eq!(first_mismatch(b"", b"x"), Some(0));
    }
}
