//! Listing page URL scheme
//!
//! Page 1 is the site root; later pages live under `/page/{n}/`.

/// URL of listing page `page` (1-based)
///
/// # Examples
///
/// ```
/// use tcscrape::crawler::url::listing_page_url;
///
/// assert_eq!(listing_page_url("https://techcrunch.com", 1), "https://techcrunch.com/");
/// assert_eq!(listing_page_url("https://techcrunch.com/", 3), "https://techcrunch.com/page/3/");
/// ```
pub fn listing_page_url(base_url: &str, page: u32) -> String {
    let base = base_url.trim_end_matches('/');
    if page <= 1 {
        format!("{base}/")
    } else {
        format!("{base}/page/{page}/")
    }
}
