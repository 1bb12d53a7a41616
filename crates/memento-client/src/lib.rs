#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::multiple_crate_versions)]
//! Client core for the Memento memo/journal service.
//!
//! Two cooperating pieces do the real work: the request pipeline
//! ([`pipeline::Pipeline`]) owns the HTTP transport, token attachment, and
//! the single shared token-refresh cycle; the paginated loader
//! ([`loader::PageLoader`]) turns page-based endpoints into an append-only,
//! scroll-friendly collection. [`api::MemoClient`] layers the typed endpoint
//! surface on top. Session state lives in an injected [`session::SessionHandle`]
//! persisted through [`storage::SessionStore`], and UI-facing signals travel
//! over [`events::EventBus`].

pub mod api;
pub mod error;
pub mod events;
pub mod loader;
pub mod pipeline;
pub mod session;
pub mod storage;

pub use api::{FileUpload, MemoClient, PostFeed, UserCommentFeed};
pub use error::{ClientError, ClientResult};
pub use events::{EventBus, UiEvent, UiEventStream};
pub use loader::{FetchPage, FetchedPage, PageLoader};
pub use pipeline::{Pipeline, PipelineConfig};
pub use session::{Session, SessionHandle};
pub use storage::SessionStore;
