use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::http::HttpClient;

/// GitLab's maximum page size.
pub const PER_PAGE: u32 = 100;

/// Fetches and decodes one page of a GitLab listing endpoint.
///
/// `query` holds extra `key=value` pairs appended after `per_page` and `page`;
/// `what` names the listed items in parse errors. Callers treat an empty page as
/// the end of the listing.
pub async fn fetch_page<C, T>(
    client: &C,
    url: &str,
    headers: &[(String, String)],
    page: u32,
    query: &[(&str, &str)],
    what: &'static str,
) -> Result<Vec<T>, FetchError>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let page_url = page_url(url, page, query);
    tracing::debug!(url = %page_url, page, "Fetching listing page");

    let body = client
        .request("GET", &page_url, headers)
        .await
        .map_err(|source| FetchError::PageFetch {
            url: url.to_string(),
            page,
            source,
        })?;

    serde_json::from_slice(&body).map_err(|source| FetchError::Parse {
        what,
        url: page_url,
        source,
    })
}

fn page_url(url: &str, page: u32, query: &[(&str, &str)]) -> String {
    let mut full = format!("{url}?per_page={PER_PAGE}&page={page}");
    for (key, value) in query {
        full.push('&');
        full.push_str(key);
        full.push('=');
        full.push_str(value);
    }
    full
}
