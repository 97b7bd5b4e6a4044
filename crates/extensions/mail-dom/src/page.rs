//! Shared handle to a live page: URL, provider identity, document and the
//! host page's reactions to clicks.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::{Document, ElementRef, EventKind};

/// Webmail application serving the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderIdentity {
    Gmail,
    OutlookWeb,
    YahooMail,
    Unknown,
}

impl ProviderIdentity {
    /// Known providers, in probe-table order.
    pub const KNOWN: [ProviderIdentity; 3] = [Self::Gmail, Self::OutlookWeb, Self::YahooMail];

    /// Identify the provider from a page URL. Unparseable URLs are `Unknown`.
    pub fn from_url(url: &str) -> Self {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(Self::from_host))
            .unwrap_or(Self::Unknown)
    }

    pub fn from_host(host: &str) -> Self {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        match host.as_str() {
            "mail.google.com" => Self::Gmail,
            "outlook.live.com" | "outlook.office.com" | "outlook.office365.com" => Self::OutlookWeb,
            "mail.yahoo.com" => Self::YahooMail,
            h if h.ends_with(".mail.yahoo.com") => Self::YahooMail,
            _ => Self::Unknown,
        }
    }

    /// Short name, also used as the `[probes.<name>]` config key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gmail => "gmail",
            Self::OutlookWeb => "outlook",
            Self::YahooMail => "yahoo",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-page reaction to a click, run after the `click` event is recorded.
///
/// Behaviors run outside the document lock and may spawn tasks that edit the
/// document later, the way webmail clients render editors asynchronously.
pub type ClickBehavior = Arc<dyn Fn(&Page, ElementRef) + Send + Sync>;

struct PageInner {
    url: String,
    provider: ProviderIdentity,
    document: Mutex<Document>,
    behaviors: Mutex<Vec<ClickBehavior>>,
}

/// Cheaply clonable page handle.
#[derive(Clone)]
pub struct Page {
    inner: Arc<PageInner>,
}

impl Page {
    pub fn new(url: impl Into<String>, document: Document) -> Self {
        let url = url.into();
        let provider = ProviderIdentity::from_url(&url);
        Self {
            inner: Arc::new(PageInner {
                url,
                provider,
                document: Mutex::new(document),
                behaviors: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn provider(&self) -> ProviderIdentity {
        self.inner.provider
    }

    /// Run `f` with shared access to the document.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&*self.inner.document.lock())
    }

    /// Run `f` with exclusive access to the document.
    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut *self.inner.document.lock())
    }

    /// Register a click reaction.
    pub fn on_click(&self, behavior: impl Fn(&Page, ElementRef) + Send + Sync + 'static) {
        self.inner.behaviors.lock().push(Arc::new(behavior));
    }

    /// Activate `target`: record a bubbling `click` and run the registered
    /// behaviors. Returns `false` (and does nothing) if `target` no longer
    /// resolves.
    pub fn click(&self, target: ElementRef) -> bool {
        let dispatched = self.write(|doc| {
            if !doc.resolves(&target) {
                return false;
            }
            match doc.scope_mut(target.frame) {
                Some(scope) => {
                    scope.dispatch(target.node, EventKind::Click);
                    true
                }
                None => false,
            }
        });
        if !dispatched {
            return false;
        }

        let behaviors: Vec<ClickBehavior> = self.inner.behaviors.lock().clone();
        for behavior in behaviors {
            behavior(self, target);
        }
        true
    }

    /// Serialized top-level `<body>` (or the whole document if it has none).
    pub fn body_html(&self) -> String {
        self.read(|doc| match doc.body() {
            Some(body) => doc.inner_html(body),
            None => doc.inner_html(doc.root()),
        })
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.inner.url)
            .field("provider", &self.inner.provider)
            .field("behaviors", &self.inner.behaviors.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_provider_from_url() {
        assert_eq!(
            ProviderIdentity::from_url("https://mail.google.com/mail/u/0/#inbox"),
            ProviderIdentity::Gmail
        );
        assert_eq!(
            ProviderIdentity::from_url("https://outlook.office365.com/mail/"),
            ProviderIdentity::OutlookWeb
        );
        assert_eq!(
            ProviderIdentity::from_url("https://outlook.live.com/mail/0/"),
            ProviderIdentity::OutlookWeb
        );
        assert_eq!(
            ProviderIdentity::from_url("https://us-mg5.mail.yahoo.com/d/folders/1"),
            ProviderIdentity::YahooMail
        );
        assert_eq!(
            ProviderIdentity::from_url("https://MAIL.YAHOO.COM/"),
            ProviderIdentity::YahooMail
        );
    }

    #[test]
    fn test_unknown_provider() {
        assert_eq!(ProviderIdentity::from_url("https://example.com/"), ProviderIdentity::Unknown);
        assert_eq!(ProviderIdentity::from_url("https://notmail.google.com.evil.net/"), ProviderIdentity::Unknown);
        assert_eq!(ProviderIdentity::from_url("not a url"), ProviderIdentity::Unknown);
        assert_eq!(ProviderIdentity::from_url("file:///tmp/page.html"), ProviderIdentity::Unknown);
        assert!(!ProviderIdentity::Unknown.is_known());
    }

    #[test]
    fn test_provider_serialization() {
        let json = serde_json::to_string(&ProviderIdentity::OutlookWeb).unwrap();
        assert_eq!(json, "\"outlook_web\"");
        assert_eq!(ProviderIdentity::OutlookWeb.to_string(), "outlook");
    }

    #[test]
    fn test_click_records_event_and_runs_behaviors() {
        let doc = Document::parse_html(r#"<button id="r">Reply</button>"#);
        let page = Page::new("https://mail.google.com/", doc);
        let button = page.read(|doc| doc.children(doc.body().unwrap())[0]);

        let clicks = Arc::new(AtomicUsize::new(0));
        let seen = clicks.clone();
        page.on_click(move |page, target| {
            seen.fetch_add(1, Ordering::SeqCst);
            page.write(|doc| {
                let body = doc.body().unwrap();
                doc.append_markup(body, r#"<div contenteditable="true"></div>"#);
            });
            assert_eq!(target.frame, None);
        });

        assert!(page.click(ElementRef::top(button)));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        page.read(|doc| {
            assert_eq!(doc.events_of(EventKind::Click).len(), 1);
            assert_eq!(doc.children(doc.body().unwrap()).len(), 2);
        });
    }

    #[test]
    fn test_click_on_detached_target_is_ignored() {
        let doc = Document::parse_html(r#"<button id="r">Reply</button>"#);
        let page = Page::new("https://mail.google.com/", doc);
        let button = page.read(|doc| doc.children(doc.body().unwrap())[0]);
        page.write(|doc| doc.remove(button));

        assert!(!page.click(ElementRef::top(button)));
        page.read(|doc| assert!(doc.events().is_empty()));
    }

    #[test]
    fn test_page_clones_share_document() {
        let page = Page::new("https://mail.google.com/", Document::new());
        let other = page.clone();
        other.write(|doc| doc.set_design_mode(true));
        assert!(page.read(|doc| doc.design_mode()));
        assert_eq!(page.provider(), ProviderIdentity::Gmail);
    }
}
