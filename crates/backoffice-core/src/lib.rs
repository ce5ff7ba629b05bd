//! Session state and remote list controllers between `backoffice-api` and
//! UI consumers (the CLI).
//!
//! - **[`SessionStore`]** holds the current [`Session`], mirrors it to
//!   [`DurableStorage`] under two keys, and publishes every change in order
//!   through a [`SequenceStream`]. Only [`AuthGateway`] can write to it.
//!
//! - **[`AuthGateway`]** turns [`Credentials`] into a session through an
//!   [`Authenticator`], and clears it on logout or when the server rejects
//!   the token.
//!
//! - **Route guards** ([`AuthGuard`], [`LoginGuard`]) are pure predicates
//!   over the session returning [`GuardDecision`]; redirecting goes through
//!   a [`Navigator`].
//!
//! - **[`RemoteListController`]** pages, sorts, filters, and deletes rows of
//!   any [`Resource`] through a [`ResourceFetcher`], applying only the
//!   latest-issued load.
//!
//! - **[`Console`]** wires all of the above to the HTTP API.

pub mod config;
pub mod console;
pub mod convert;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod list;
pub mod model;
pub mod remote;
pub mod resource;
pub mod session;
pub mod storage;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, DEFAULT_PAGE_SIZE, RouteConfig, TlsVerification};
pub use console::Console;
pub use error::{AuthError, CoreError, ListError, TransportError, TransportErrorKind};
pub use gateway::{AuthGateway, Authenticator, LoginGrant};
pub use guard::{AuthGuard, GuardDecision, LoginGuard, Navigator, Redirect, RouteGuard, return_destination};
pub use list::{
    ListPhase, ListQuery, ListState, LoadOutcome, PagedResponse, Pagination, RemoteListController,
    ResourceFetcher, SortDirection, SortSpec,
};
pub use model::{AccessToken, Credentials, Identity, Session};
pub use remote::HttpBackend;
pub use resource::{
    CellValue, Column, ColumnKind, Product, Products, Resource, RoleBadge, RowId, StockLevel, User, Users,
};
pub use session::SessionStore;
pub use storage::{DetachedStorage, DurableStorage, FileStorage, MemoryStorage, StorageBatch};
pub use stream::{SequenceError, SequenceStream, StateStream};
