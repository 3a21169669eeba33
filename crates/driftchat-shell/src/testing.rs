//! In-memory collaborators for tests and examples.
//!
//! These doubles implement the collaborator contracts with just enough
//! recording to assert on the shell's observable effects. Production hosts
//! supply their own implementations.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::context::{
    AccessStore, AppContext, BuildInfo, CapabilityController, ClientApiFactory, ColorScheme,
    ConfigStore, ModelClient, ModelRecord, Navigator, PresentationSurface, ThemeTokens,
};
use crate::error::ShellError;
use crate::locale::Locale;
use crate::theme::ThemePreference;
use crate::views::{View, ViewDescriptor, ViewKind, ViewRegistry};

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_LOCALE_TAG: &str = "en-US";
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Navigator whose location is set by the test.
#[derive(Debug)]
pub struct ScriptedNavigator {
    path: Mutex<String>,
}

impl ScriptedNavigator {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(path.into()),
        }
    }

    pub fn set_path(&self, path: impl Into<String>) {
        *lock(&self.path) = path.into();
    }
}

impl Navigator for ScriptedNavigator {
    fn current_path(&self) -> String {
        lock(&self.path).clone()
    }
}

/// Configuration store backed by plain memory. The model merge upserts by
/// name, preserving first-seen order, which makes it idempotent.
#[derive(Debug, Default)]
pub struct MemoryConfig {
    theme: Mutex<ThemePreference>,
    provider: Mutex<String>,
    tight_border: AtomicBool,
    models: Mutex<Vec<ModelRecord>>,
}

impl MemoryConfig {
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: Mutex::new(provider.into()),
            ..Self::default()
        }
    }

    pub fn set_theme(&self, theme: ThemePreference) {
        *lock(&self.theme) = theme;
    }

    pub fn set_tight_border(&self, enabled: bool) {
        self.tight_border.store(enabled, Ordering::SeqCst);
    }

    #[must_use]
    pub fn models(&self) -> Vec<ModelRecord> {
        lock(&self.models).clone()
    }
}

impl ConfigStore for MemoryConfig {
    fn theme(&self) -> ThemePreference {
        *lock(&self.theme)
    }

    fn model_provider(&self) -> String {
        lock(&self.provider).clone()
    }

    fn tight_border(&self) -> bool {
        self.tight_border.load(Ordering::SeqCst)
    }

    fn merge_models(&self, models: Vec<ModelRecord>) {
        let mut known = lock(&self.models);
        for model in models {
            if let Some(existing) = known.iter_mut().find(|entry| entry.name == model.name) {
                *existing = model;
            } else {
                known.push(model);
            }
        }
    }
}

/// Model client that serves a scripted outcome.
#[derive(Debug)]
pub struct StaticModelClient {
    outcome: Mutex<Result<Vec<ModelRecord>, ShellError>>,
}

impl StaticModelClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            outcome: Mutex::new(Ok(Vec::new())),
        }
    }

    pub fn set_models(&self, models: Vec<ModelRecord>) {
        *lock(&self.outcome) = Ok(models);
    }

    pub fn fail(&self, message: impl Into<String>) {
        *lock(&self.outcome) = Err(ShellError::ModelCatalogue {
            message: message.into(),
        });
    }
}

impl Default for StaticModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelClient for StaticModelClient {
    async fn models(&self) -> Result<Vec<ModelRecord>, ShellError> {
        lock(&self.outcome).clone()
    }
}

/// Factory that always hands out the same scripted client and records the
/// providers it was asked for.
#[derive(Debug)]
pub struct StaticApiFactory {
    client: Arc<StaticModelClient>,
    requested: Mutex<Vec<String>>,
}

impl StaticApiFactory {
    #[must_use]
    pub fn new(client: Arc<StaticModelClient>) -> Self {
        Self {
            client,
            requested: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn requested_providers(&self) -> Vec<String> {
        lock(&self.requested).clone()
    }
}

impl ClientApiFactory for StaticApiFactory {
    fn client_for(&self, provider: &str) -> Arc<dyn ModelClient> {
        lock(&self.requested).push(provider.to_string());
        Arc::clone(&self.client) as Arc<dyn ModelClient>
    }
}

/// Access store that only counts refresh triggers.
#[derive(Debug, Default)]
pub struct CountingAccessStore {
    pub fetches: AtomicUsize,
}

#[async_trait]
impl AccessStore for CountingAccessStore {
    async fn fetch(&self) {
        self.fetches.fetch_add(1, Ordering::SeqCst);
    }
}

/// Capability controller with scriptable flag and failure switches.
#[derive(Debug, Default)]
pub struct ScriptedCapability {
    enabled: AtomicBool,
    fail_check: AtomicBool,
    fail_init: AtomicBool,
    pub init_calls: AtomicUsize,
}

impl ScriptedCapability {
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn set_fail_check(&self, fail: bool) {
        self.fail_check.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CapabilityController for ScriptedCapability {
    async fn is_enabled(&self) -> Result<bool, ShellError> {
        if self.fail_check.load(Ordering::SeqCst) {
            return Err(ShellError::Capability {
                message: "flag check failed".to_string(),
            });
        }
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn initialize(&self) -> Result<(), ShellError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(ShellError::Capability {
                message: "bring-up failed".to_string(),
            });
        }
        Ok(())
    }
}

/// Token store backed by a plain map.
#[derive(Debug, Default)]
pub struct StaticTokens {
    tokens: Mutex<BTreeMap<String, String>>,
}

impl StaticTokens {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        lock(&self.tokens).insert(name.into(), value.into());
    }
}

impl ThemeTokens for StaticTokens {
    fn color_token(&self, name: &str) -> Option<String> {
        lock(&self.tokens).get(name).cloned()
    }
}

/// Presentation surface that records every effect applied to it.
#[derive(Debug)]
pub struct RecordingSurface {
    classes: Mutex<BTreeSet<String>>,
    hints: Mutex<BTreeMap<&'static str, String>>,
    language: Mutex<Option<String>>,
    language_writes: AtomicUsize,
    viewport: AtomicU32,
    fonts: Mutex<Vec<String>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            classes: Mutex::new(BTreeSet::new()),
            hints: Mutex::new(BTreeMap::new()),
            language: Mutex::new(None),
            language_writes: AtomicUsize::new(0),
            viewport: AtomicU32::new(DEFAULT_VIEWPORT_WIDTH),
            fonts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_viewport_width(&self, width: u32) {
        self.viewport.store(width, Ordering::SeqCst);
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        lock(&self.classes).contains(class)
    }

    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        lock(&self.classes).iter().cloned().collect()
    }

    #[must_use]
    pub fn hint(&self, scheme: ColorScheme) -> Option<String> {
        lock(&self.hints).get(scheme.as_str()).cloned()
    }

    #[must_use]
    pub fn language(&self) -> Option<String> {
        lock(&self.language).clone()
    }

    #[must_use]
    pub fn language_writes(&self) -> usize {
        self.language_writes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn fonts(&self) -> Vec<String> {
        lock(&self.fonts).clone()
    }

    /// Full applied state, for idempotence comparisons.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<String>, Vec<(&'static str, String)>) {
        let hints = lock(&self.hints)
            .iter()
            .map(|(scheme, value)| (*scheme, value.clone()))
            .collect();
        (self.classes(), hints)
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationSurface for RecordingSurface {
    fn add_class(&self, class: &str) {
        lock(&self.classes).insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        lock(&self.classes).remove(class);
    }

    fn set_color_hint(&self, scheme: ColorScheme, value: &str) {
        lock(&self.hints).insert(scheme.as_str(), value.to_string());
    }

    fn language_tag(&self) -> Option<String> {
        lock(&self.language).clone()
    }

    fn set_language_tag(&self, tag: &str) {
        self.language_writes.fetch_add(1, Ordering::SeqCst);
        *lock(&self.language) = Some(tag.to_string());
    }

    fn viewport_width(&self) -> u32 {
        self.viewport.load(Ordering::SeqCst)
    }

    fn preload_font(&self, family: &str) {
        lock(&self.fonts).push(family.to_string());
    }
}

/// An activated stub view carrying only its kind.
#[derive(Debug)]
pub struct StubView {
    kind: ViewKind,
}

impl StubView {
    #[must_use]
    pub fn new(kind: ViewKind) -> Self {
        Self { kind }
    }
}

impl View for StubView {
    fn kind(&self) -> ViewKind {
        self.kind
    }
}

/// Descriptor whose activation completes immediately with a stub view.
#[must_use]
pub fn ready_descriptor(kind: ViewKind) -> ViewDescriptor {
    ViewDescriptor::new(kind, move || async move {
        Ok(Arc::new(StubView::new(kind)) as Arc<dyn View>)
    })
}

/// Descriptor whose activation fails with a module-unavailable error.
#[must_use]
pub fn failing_descriptor(kind: ViewKind) -> ViewDescriptor {
    ViewDescriptor::new(kind, move || async move {
        Err(ShellError::ViewActivation {
            view: kind.as_str(),
            message: "module unavailable".to_string(),
        })
    })
}

/// One bundle of scripted collaborators, pre-wired with sane defaults:
/// home location, `openai` provider, auto theme, capability disabled,
/// desktop viewport, `en-US` locale, browser (non-packaged) build.
#[derive(Debug)]
pub struct TestHarness {
    pub navigator: Arc<ScriptedNavigator>,
    pub config: Arc<MemoryConfig>,
    pub model_client: Arc<StaticModelClient>,
    pub api: Arc<StaticApiFactory>,
    pub access: Arc<CountingAccessStore>,
    pub capability: Arc<ScriptedCapability>,
    pub tokens: Arc<StaticTokens>,
    pub surface: Arc<RecordingSurface>,
    pub locale: Locale,
    pub build: BuildInfo,
}

impl TestHarness {
    #[must_use]
    pub fn new() -> Self {
        let model_client = Arc::new(StaticModelClient::new());
        Self {
            navigator: Arc::new(ScriptedNavigator::new("/")),
            config: Arc::new(MemoryConfig::new(DEFAULT_PROVIDER)),
            api: Arc::new(StaticApiFactory::new(Arc::clone(&model_client))),
            model_client,
            access: Arc::new(CountingAccessStore::default()),
            capability: Arc::new(ScriptedCapability::default()),
            tokens: Arc::new(StaticTokens::new()),
            surface: Arc::new(RecordingSurface::new()),
            locale: Locale::new(DEFAULT_LOCALE_TAG),
            build: BuildInfo::default(),
        }
    }

    pub fn set_models(&self, models: Vec<ModelRecord>) {
        self.model_client.set_models(models);
    }

    pub fn fail_models(&self, message: impl Into<String>) {
        self.model_client.fail(message);
    }

    #[must_use]
    pub fn context(&self) -> AppContext {
        AppContext {
            navigator: Arc::clone(&self.navigator) as Arc<dyn Navigator>,
            config: Arc::clone(&self.config) as Arc<dyn ConfigStore>,
            api: Arc::clone(&self.api) as Arc<dyn ClientApiFactory>,
            access: Arc::clone(&self.access) as Arc<dyn AccessStore>,
            capability: Arc::clone(&self.capability) as Arc<dyn CapabilityController>,
            tokens: Arc::clone(&self.tokens) as Arc<dyn ThemeTokens>,
            surface: Arc::clone(&self.surface) as Arc<dyn PresentationSurface>,
            locale: self.locale.clone(),
            build: self.build,
        }
    }

    /// Registry covering every view kind with immediately-ready stubs.
    #[must_use]
    pub fn registry() -> ViewRegistry {
        ViewRegistry::new(ViewKind::ALL.iter().copied().map(ready_descriptor).collect())
    }

    /// Like [`TestHarness::registry`], but one view's activation fails.
    #[must_use]
    pub fn registry_with_failing(failing: ViewKind) -> ViewRegistry {
        ViewRegistry::new(
            ViewKind::ALL
                .iter()
                .copied()
                .map(|kind| {
                    if kind == failing {
                        failing_descriptor(kind)
                    } else {
                        ready_descriptor(kind)
                    }
                })
                .collect(),
        )
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::TestHarness;
    use crate::context::{ConfigStore, ModelRecord};

    #[test]
    fn memory_config_merge_upserts_by_name() {
        let harness = TestHarness::new();
        let first = ModelRecord {
            name: "drift-4".to_string(),
            available: true,
            provider: Some("openai".to_string()),
        };
        let updated = ModelRecord {
            name: "drift-4".to_string(),
            available: false,
            provider: Some("openai".to_string()),
        };

        harness.config.merge_models(vec![first]);
        harness.config.merge_models(vec![updated.clone()]);
        assert_eq!(harness.config.models(), vec![updated]);
    }
}
