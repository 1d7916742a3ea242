use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT,
};

/// Build browser-like request headers
///
/// `Accept-Encoding` is left to the client, which negotiates gzip and
/// decompresses transparently.
///
/// # Arguments
///
/// * `user_agent` - User agent string picked from the rotation pool
/// * `referer` - Optional referer, usually the site root
///
/// # Examples
///
/// ```
/// use tcscrape::crawler::headers::build_browser_headers;
///
/// let headers = build_browser_headers(
///     "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0",
///     Some("https://techcrunch.com/"),
/// );
/// assert!(headers.contains_key("user-agent"));
/// ```
pub fn build_browser_headers(user_agent: &str, referer: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(value) = HeaderValue::from_str(user_agent) {
        headers.insert(USER_AGENT, value);
    }
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );

    if let Some(referer) = referer.and_then(|r| HeaderValue::from_str(r).ok()) {
        headers.insert(REFERER, referer);
    }

    headers
}
