//! Webmail editor tooling for mailquill.
//!
//! Finds the compose/reply editor of Gmail, Outlook on the web and Yahoo Mail
//! pages (or any page with an editable region), opens one when needed, and
//! inserts text so that the web application sees ordinary typing.
//!
//! ## Architecture
//!
//! ```text
//! ContentRequest ──▶ ContentAgent ──▶ ReplyOpener ──(poll)──┐
//!                         │                                 ▼
//!                         ├──────────────────────────▶ EditorLocator ──▶ TextInjector
//!                         └──▶ ThreadReader                 │
//!                                                     ProbeTable
//! ```
//!
//! Everything runs against [`dom::Document`], an in-memory page model that can
//! be built from HTML or from a DevTools `DOM.getDocument` snapshot.
//!
//! ## Operations
//!
//! - `insert_text` - insert into the editor that is already open
//! - `get_incoming_thread_text` - visible text of the displayed conversation
//! - `open_reply_or_compose_and_insert` - click Reply (or New message) if no
//!   editor is open, wait for it, then insert

pub mod agent;
pub mod dom;
pub mod injector;
pub mod locator;
pub mod opener;
pub mod page;
pub mod probes;
pub mod reader;

pub use agent::ContentAgent;
pub use injector::{InjectError, InsertMode, InsertPath, InsertionRequest, TextInjector};
pub use locator::{EditableSurface, EditorLocator, Located, NotFound, ProbeOutcome, SurfaceKind};
pub use opener::{AffordanceKind, OpenError, Opened, OpenerState, ReplyOpener, WaitPolicy};
pub use page::{ClickBehavior, Page, ProviderIdentity};
pub use probes::{Probe, ProbeKind, ProbeTable, ProviderProbes};
pub use reader::ThreadReader;
