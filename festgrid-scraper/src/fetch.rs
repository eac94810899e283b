use tracing::info;

use crate::common::error::Result;

/// Fetches one grid page. A failure here propagates to the caller; the parser
/// is simply never invoked for that page.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    info!(url, "fetching grid page");
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    info!(url, bytes = body.len(), "fetched grid page");
    Ok(body)
}
