//! Contracts for the collaborators the shell core orchestrates.
//!
//! The core never reaches into a global store. Every external dependency is
//! a narrow trait held behind an [`AppContext`] that is injected once at
//! composition time, which keeps the orchestrator testable in isolation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ShellError;
use crate::locale::Locale;
use crate::theme::ThemePreference;

/// Supplies the current location. A hash-based history router is assumed
/// but not mandated; the dispatcher normalizes whatever comes back.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
}

/// One entry of a provider's model catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub name: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Narrow view of the process-wide configuration store.
pub trait ConfigStore: Send + Sync {
    fn theme(&self) -> ThemePreference;
    fn model_provider(&self) -> String;
    fn tight_border(&self) -> bool;

    /// Merge a fetched catalogue into configuration.
    ///
    /// Implementations must be idempotent: merging the same catalogue twice
    /// leaves configuration unchanged beyond the first merge.
    fn merge_models(&self, models: Vec<ModelRecord>);
}

/// The one method the core needs from a provider's API client.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn models(&self) -> Result<Vec<ModelRecord>, ShellError>;
}

/// Resolves the API client for a named model provider.
pub trait ClientApiFactory: Send + Sync {
    fn client_for(&self, provider: &str) -> Arc<dyn ModelClient>;
}

/// Process-wide authorization/access state. The refresh is fire-and-forget;
/// failure handling belongs to the store, not to the pipeline.
#[async_trait]
pub trait AccessStore: Send + Sync {
    async fn fetch(&self);
}

/// Controller for the optional capability subsystem. Errors from either
/// method must never escape the initialization pipeline.
#[async_trait]
pub trait CapabilityController: Send + Sync {
    async fn is_enabled(&self) -> Result<bool, ShellError>;
    async fn initialize(&self) -> Result<(), ShellError>;
}

/// Lookup for named presentation color tokens.
pub trait ThemeTokens: Send + Sync {
    fn color_token(&self, name: &str) -> Option<String>;
}

/// Which ambient color scheme a hint targets.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ColorScheme {
    Dark,
    Light,
}

impl ColorScheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Document-level presentation effects: root classes, theme-color hints,
/// the language tag, and viewport metrics.
pub trait PresentationSurface: Send + Sync {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn set_color_hint(&self, scheme: ColorScheme, value: &str);
    fn language_tag(&self) -> Option<String>;
    fn set_language_tag(&self, tag: &str);
    fn viewport_width(&self) -> u32;

    /// Kick off an async font preload. No-op unless the host overrides it.
    fn preload_font(&self, _family: &str) {}
}

/// Build-time facts about the running client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildInfo {
    /// True when running as a packaged/embedded client rather than a
    /// browser tab.
    pub packaged: bool,
}

/// Everything the shell core needs, injected once at composition time.
#[derive(Clone)]
pub struct AppContext {
    pub navigator: Arc<dyn Navigator>,
    pub config: Arc<dyn ConfigStore>,
    pub api: Arc<dyn ClientApiFactory>,
    pub access: Arc<dyn AccessStore>,
    pub capability: Arc<dyn CapabilityController>,
    pub tokens: Arc<dyn ThemeTokens>,
    pub surface: Arc<dyn PresentationSurface>,
    pub locale: Locale,
    pub build: BuildInfo,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("locale", &self.locale)
            .field("build", &self.build)
            .finish_non_exhaustive()
    }
}
