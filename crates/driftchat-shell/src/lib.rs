//! Bootstrap and view-orchestration core for the Driftchat client.
//!
//! The crate owns sequencing, not pixels: it gates rendering until the
//! client environment is ready, resolves the current location to a visual
//! branch, lazily activates heavyweight view modules exactly once each, and
//! runs the independent startup tasks without letting any single failure
//! block the others or the UI. The visual components themselves, persisted
//! configuration, the network client, localization tables, and style tokens
//! are collaborators reached through the traits in [`context`].
//!
//! Composition order mirrors the boot path: a [`readiness::ReadinessGate`]
//! short-circuits everything to a placeholder, the [`theme`] and [`locale`]
//! synchronizers run as passive side effects, the [`init`] pipeline fires
//! its tasks, and [`routes::dispatch`] plus the [`views::ViewRegistry`]
//! decide what the content region shows. The
//! [`orchestrator::RootOrchestrator`] composes all of it inside a
//! failure-isolation boundary.

pub mod context;
pub mod error;
pub mod init;
pub mod locale;
pub mod orchestrator;
pub mod readiness;
pub mod routes;
pub mod testing;
pub mod theme;
pub mod views;

pub use context::AppContext;
pub use error::ShellError;
pub use orchestrator::{Frame, RootOrchestrator, ShellPhase, Surface};
pub use readiness::ReadinessGate;
pub use routes::{LayoutFlags, RouteBranch, dispatch};
pub use theme::ThemePreference;
pub use views::{ViewKind, ViewRegistry};
