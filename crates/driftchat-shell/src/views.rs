//! Static view registry and the lazy activation arena.
//!
//! Heavyweight view modules are activated on demand. Each [`ViewKind`] maps
//! to exactly one activation future, created through double-checked
//! initialization and shared between every caller, so repeated resolution
//! before the first activation completes hands back the same in-flight
//! handle and the outcome is memoized for the process lifetime.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::error::ShellError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ViewKind {
    Chat,
    NewChat,
    Masks,
    Plugins,
    SearchChat,
    Settings,
    McpMarket,
    ImageGen,
    Artifacts,
    Auth,
}

impl ViewKind {
    pub const ALL: [ViewKind; 10] = [
        Self::Chat,
        Self::NewChat,
        Self::Masks,
        Self::Plugins,
        Self::SearchChat,
        Self::Settings,
        Self::McpMarket,
        Self::ImageGen,
        Self::Artifacts,
        Self::Auth,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::NewChat => "new-chat",
            Self::Masks => "masks",
            Self::Plugins => "plugins",
            Self::SearchChat => "search-chat",
            Self::Settings => "settings",
            Self::McpMarket => "mcp-market",
            Self::ImageGen => "image-gen",
            Self::Artifacts => "artifacts",
            Self::Auth => "auth",
        }
    }
}

/// What to draw while an activation is still pending.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placeholder {
    /// Boot surface: logo plus spinner.
    Logo,
    /// Spinner only, used by every lazily activated view.
    Plain,
}

#[derive(Clone, Copy, Debug)]
pub struct ViewSpec {
    pub kind: ViewKind,
    pub title: &'static str,
    pub placeholder: Placeholder,
}

#[must_use]
pub fn view_specs() -> &'static [ViewSpec] {
    &VIEW_SPECS
}

#[must_use]
pub fn view_spec(kind: ViewKind) -> &'static ViewSpec {
    view_specs()
        .iter()
        .find(|spec| spec.kind == kind)
        .unwrap_or(&VIEW_SPECS[0])
}

const VIEW_SPECS: [ViewSpec; 10] = [
    ViewSpec {
        kind: ViewKind::Chat,
        title: "Chat",
        placeholder: Placeholder::Plain,
    },
    ViewSpec {
        kind: ViewKind::NewChat,
        title: "New Chat",
        placeholder: Placeholder::Plain,
    },
    ViewSpec {
        kind: ViewKind::Masks,
        title: "Masks",
        placeholder: Placeholder::Plain,
    },
    ViewSpec {
        kind: ViewKind::Plugins,
        title: "Plugins",
        placeholder: Placeholder::Plain,
    },
    ViewSpec {
        kind: ViewKind::SearchChat,
        title: "Search Chat",
        placeholder: Placeholder::Plain,
    },
    ViewSpec {
        kind: ViewKind::Settings,
        title: "Settings",
        placeholder: Placeholder::Plain,
    },
    ViewSpec {
        kind: ViewKind::McpMarket,
        title: "Capability Market",
        placeholder: Placeholder::Plain,
    },
    ViewSpec {
        kind: ViewKind::ImageGen,
        title: "Image Generation",
        placeholder: Placeholder::Plain,
    },
    ViewSpec {
        kind: ViewKind::Artifacts,
        title: "Artifacts",
        placeholder: Placeholder::Plain,
    },
    ViewSpec {
        kind: ViewKind::Auth,
        title: "Sign In",
        placeholder: Placeholder::Plain,
    },
];

/// An activated view module. Rendering behavior stays with the collaborator
/// that produced it; the core only needs a named handle.
pub trait View: fmt::Debug + Send + Sync {
    fn kind(&self) -> ViewKind;
}

pub type ActivationFuture = BoxFuture<'static, Result<Arc<dyn View>, ShellError>>;

/// The memoized handle for one view's activation. Cloning is cheap and every
/// clone observes the same outcome.
pub type ViewHandle = Shared<ActivationFuture>;

/// A view name bound to its async activation factory.
pub struct ViewDescriptor {
    kind: ViewKind,
    activate: Box<dyn Fn() -> ActivationFuture + Send + Sync>,
}

impl ViewDescriptor {
    pub fn new<F, Fut>(kind: ViewKind, activate: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn View>, ShellError>> + Send + 'static,
    {
        Self {
            kind,
            activate: Box::new(move || activate().boxed()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ViewKind {
        self.kind
    }
}

struct ViewEntry {
    descriptor: ViewDescriptor,
    handle: Mutex<Option<ViewHandle>>,
}

/// Arena of named activations, each created at most once.
pub struct ViewRegistry {
    entries: HashMap<ViewKind, ViewEntry>,
}

impl ViewRegistry {
    #[must_use]
    pub fn new(descriptors: Vec<ViewDescriptor>) -> Self {
        let entries = descriptors
            .into_iter()
            .map(|descriptor| {
                (
                    descriptor.kind(),
                    ViewEntry {
                        descriptor,
                        handle: Mutex::new(None),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn placeholder(&self, kind: ViewKind) -> Placeholder {
        view_spec(kind).placeholder
    }

    /// Resolve a view to its activation handle.
    ///
    /// The first resolution creates the activation future; every later one,
    /// whether the activation is still in flight or long settled, returns a
    /// clone of the same shared handle. A failed activation stays failed:
    /// the memoized error propagates to the failure-isolation boundary
    /// instead of silently re-running the factory.
    pub fn resolve(&self, kind: ViewKind) -> Option<ViewHandle> {
        let entry = self.entries.get(&kind)?;
        let mut slot = lock(&entry.handle);
        if let Some(handle) = slot.as_ref() {
            return Some(handle.clone());
        }
        let handle = (entry.descriptor.activate)().shared();
        *slot = Some(handle.clone());
        Some(handle)
    }

    /// Whether the activation future for `kind` has been created.
    #[must_use]
    pub fn activation_started(&self, kind: ViewKind) -> bool {
        self.entries
            .get(&kind)
            .is_some_and(|entry| lock(&entry.handle).is_some())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
