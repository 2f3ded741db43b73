//! Media download URL selection
//!
//! Precedence reflects deployment topology: CDN, then the static asset tier,
//! then the engage origin server.

/// Where media downloads are served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSource {
    Cloudfront,
    AssetServer,
    Engage,
}

/// Pick the media source for the given topology
pub fn media_source(cloudfront_url: Option<&str>, asset_server_host: Option<&str>) -> MediaSource {
    if cloudfront_url.is_some_and(|url| !url.is_empty()) {
        MediaSource::Cloudfront
    } else if asset_server_host.is_some_and(|host| !host.is_empty()) {
        MediaSource::AssetServer
    } else {
        MediaSource::Engage
    }
}

/// Base URL media downloads are served from
pub fn effective_media_download_url(
    cloudfront_url: Option<&str>,
    asset_server_host: Option<&str>,
    engage_host: &str,
    ssl_enabled: bool,
) -> String {
    match media_source(cloudfront_url, asset_server_host) {
        MediaSource::Cloudfront => format!("https://{}", cloudfront_url.unwrap_or_default()),
        MediaSource::AssetServer => format!("http://{}/static", asset_server_host.unwrap_or_default()),
        MediaSource::Engage => {
            let scheme = if ssl_enabled { "https" } else { "http" };
            format!("{scheme}://{engage_host}/static")
        }
    }
}

/// Host component of a media download URL
pub fn media_download_domain(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloudfront_wins() {
        assert_eq!(
            effective_media_download_url(Some("cdn.example.com"), Some("static.example.com"), "engage.example.com", false),
            "https://cdn.example.com"
        );
        assert_eq!(
            effective_media_download_url(Some("cdn.example.com"), None, "", true),
            "https://cdn.example.com"
        );
    }

    #[test]
    fn test_asset_server_when_no_cloudfront() {
        assert_eq!(
            effective_media_download_url(Some(""), Some("static.example.com"), "engage.example.com", true),
            "http://static.example.com/static"
        );
        assert_eq!(
            effective_media_download_url(None, Some("static.example.com"), "engage.example.com", false),
            "http://static.example.com/static"
        );
    }

    #[test]
    fn test_engage_origin_scheme_follows_ssl() {
        assert_eq!(
            effective_media_download_url(Some(""), None, "engage.example.com", true),
            "https://engage.example.com/static"
        );
        assert_eq!(
            effective_media_download_url(None, Some(""), "engage.example.com", false),
            "http://engage.example.com/static"
        );
    }

    #[test]
    fn test_media_download_domain() {
        assert_eq!(media_download_domain("https://cdn.example.com").as_deref(), Some("cdn.example.com"));
        assert_eq!(media_download_domain("http://static.example.com/static").as_deref(), Some("static.example.com"));
        assert_eq!(media_download_domain("engage.example.com/static"), None);
    }
}
