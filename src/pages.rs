//! Loading pages from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use mailquill_dom::dom::{Document, PageSnapshot, SnapshotError};
use mailquill_dom::Page;

/// URL used for markup files loaded without `--url`.
pub(crate) const BLANK_URL: &str = "about:blank";

#[derive(Debug, Error)]
pub(crate) enum PageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },
}

fn is_snapshot(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load a `.json` DevTools snapshot or any other file as HTML markup.
///
/// `url` overrides the snapshot's own URL.
pub(crate) fn load_page(path: &Path, url: Option<&str>) -> Result<Page, PageError> {
    let content = fs::read_to_string(path).map_err(|source| PageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let snapshot_err = |source| PageError::Snapshot {
        path: path.to_path_buf(),
        source,
    };

    let (page_url, document) = if is_snapshot(path) {
        let snapshot = PageSnapshot::from_json(&content).map_err(snapshot_err)?;
        let document = Document::from_snapshot(&snapshot.root).map_err(snapshot_err)?;
        (url.map(str::to_string).unwrap_or(snapshot.url), document)
    } else {
        if url.is_none() {
            warn!(path = %path.display(), "No --url given, provider probes will not apply");
        }
        let url = url.unwrap_or(BLANK_URL).to_string();
        (url, Document::parse_html(&content))
    };

    let page = Page::new(page_url, document);
    info!(path = %path.display(), url = page.url(), provider = %page.provider(), "Page loaded");
    Ok(page)
}

/// Write the page body markup to `path`.
pub(crate) fn write_body(page: &Page, path: &Path) -> Result<(), PageError> {
    fs::write(path, page.body_html()).map_err(|source| PageError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailquill_dom::ProviderIdentity;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_with(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_html_with_url() {
        let file = temp_with(".html", r#"<div class="a3s">Hello</div>"#);
        let page = load_page(file.path(), Some("https://mail.google.com/mail/u/0/")).unwrap();
        assert_eq!(page.provider(), ProviderIdentity::Gmail);
        assert_eq!(page.body_html(), r#"<div class="a3s">Hello</div>"#);
    }

    #[test]
    fn test_load_html_without_url() {
        let file = temp_with(".htm", "<p>x</p>");
        let page = load_page(file.path(), None).unwrap();
        assert_eq!(page.url(), BLANK_URL);
        assert_eq!(page.provider(), ProviderIdentity::Unknown);
    }

    #[test]
    fn test_load_snapshot() {
        let file = temp_with(
            ".JSON",
            r##"{"url": "https://mail.yahoo.com/d/folders/1",
                "root": {"nodeId": 1, "nodeType": 9, "nodeName": "#document", "children": [
                  {"nodeId": 2, "nodeType": 1, "nodeName": "P", "localName": "p",
                   "children": [{"nodeId": 3, "nodeType": 3, "nodeName": "#text", "nodeValue": "hi"}]}
                ]}}"##,
        );
        let page = load_page(file.path(), None).unwrap();
        assert_eq!(page.provider(), ProviderIdentity::YahooMail);

        let page = load_page(file.path(), Some("https://outlook.live.com/mail/")).unwrap();
        assert_eq!(page.provider(), ProviderIdentity::OutlookWeb);
    }

    #[test]
    fn test_load_bad_snapshot() {
        let file = temp_with(".json", "<html></html>");
        let err = load_page(file.path(), None).unwrap_err();
        assert!(matches!(err, PageError::Snapshot { .. }));
        assert!(err.to_string().starts_with("Invalid snapshot"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_page(Path::new("/nonexistent/page.html"), None).unwrap_err();
        assert!(matches!(err, PageError::Read { .. }));
    }

    #[test]
    fn test_write_body() {
        let page = Page::new(BLANK_URL, Document::parse_html("<p>a &amp; b</p>"));
        let out = NamedTempFile::new().unwrap();
        write_body(&page, out.path()).unwrap();
        assert_eq!(fs::read_to_string(out.path()).unwrap(), "<p>a &amp; b</p>");
    }
}
