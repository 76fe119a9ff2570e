use std::path::Path;

use url::Url;

/// Result of fetching a page source
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub html: String,
    pub url: String,
    pub status: u16,
    pub content_type: String,
}

/// Error during fetch
#[derive(Debug)]
pub struct FetchError {
    pub message: String,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}

/// Load a page from a local path, a `file://` URL, or over HTTP(S).
///
/// Bare hosts (`example.com`) are treated as HTTPS; anything that exists on
/// disk is read directly.
pub fn load_source(source: &str) -> Result<FetchResult, FetchError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(FetchError {
            message: "empty source".to_string(),
        });
    }
    if source.starts_with("file://") {
        let parsed = Url::parse(source).map_err(|e| FetchError {
            message: format!("Invalid URL: {}", e),
        })?;
        let path = parsed.to_file_path().map_err(|_| FetchError {
            message: format!("Not a local path: {}", source),
        })?;
        return read_file(&path);
    }
    let path = Path::new(source);
    if path.exists() {
        return read_file(path);
    }
    fetch_url(source)
}

fn read_file(path: &Path) -> Result<FetchResult, FetchError> {
    let html = std::fs::read_to_string(path).map_err(|e| FetchError {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;
    let abs = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let url = Url::from_file_path(&abs)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("file://{}", abs.display()));
    log::debug!("read {} bytes from {}", html.len(), url);
    Ok(FetchResult {
        html,
        url,
        status: 200,
        content_type: "text/html".to_string(),
    })
}

/// Fetch a URL and return the HTML content (blocking).
pub fn fetch_url(url_str: &str) -> Result<FetchResult, FetchError> {
    // Normalize URL
    let url = if !url_str.starts_with("http://") && !url_str.starts_with("https://") {
        format!("https://{}", url_str)
    } else {
        url_str.to_string()
    };

    let parsed = Url::parse(&url).map_err(|e| FetchError {
        message: format!("Invalid URL: {}", e),
    })?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("page-reveal/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| FetchError {
            message: format!("Client error: {}", e),
        })?;

    let response = client
        .get(parsed.as_str())
        .header("Accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .send()
        .map_err(|e| FetchError {
            message: format!("Request failed: {}", e),
        })?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        return Err(FetchError {
            message: format!("HTTP {} for {}", status, parsed),
        });
    }
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    let final_url = response.url().to_string();

    let html = response.text().map_err(|e| FetchError {
        message: format!("Failed to read body: {}", e),
    })?;
    log::info!("fetched {} ({}, {} bytes)", final_url, status, html.len());

    Ok(FetchResult {
        html,
        url: final_url,
        status,
        content_type,
    })
}
