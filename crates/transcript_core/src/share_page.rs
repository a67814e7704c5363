use url::Url;

const SHARE_HOST: &str = "gemini.google.com";
const SHARE_PATH_PREFIX: &str = "/share/";

/// True for `https://gemini.google.com/share/...` pages, the only pages the
/// actions run on.
pub fn is_share_page(page_url: &str) -> bool {
    let Ok(url) = Url::parse(page_url.trim()) else {
        return false;
    };
    url.scheme() == "https"
        && url.host_str() == Some(SHARE_HOST)
        && url.path().starts_with(SHARE_PATH_PREFIX)
        && url.path().len() > SHARE_PATH_PREFIX.len()
}
