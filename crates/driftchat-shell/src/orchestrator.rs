//! Root orchestrator: the `Hydrating -> Ready` state machine that gates
//! rendering, wires the passive synchronizers, launches the startup
//! pipeline, and wraps lazy view activation in a failure-isolation boundary.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::context::AppContext;
use crate::error::ShellError;
use crate::init::{InitPipeline, startup_tasks};
use crate::locale::LocaleSynchronizer;
use crate::readiness::ReadinessGate;
use crate::routes::{LayoutFlags, RouteBranch, dispatch, layout_flags};
use crate::theme::sync_theme;
use crate::views::{Placeholder, View, ViewKind, ViewRegistry};

/// Font family preloaded once the shell becomes interactive.
pub const SHELL_FONT_FAMILY: &str = "Noto Sans";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShellPhase {
    /// Client-only APIs are not safe yet; only the boot placeholder renders.
    Hydrating,
    /// Terminal for the process lifetime.
    Ready,
}

/// A pure description of what should be on screen right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Hydrating { placeholder: Placeholder },
    Ready { branch: RouteBranch, layout: LayoutFlags },
}

/// What the content region shows for one view slot.
#[derive(Clone)]
pub enum Surface {
    /// Activation still in flight; draw the view's declared placeholder.
    Pending(Placeholder),
    View(Arc<dyn View>),
    /// The failure-isolation boundary replaced a broken subtree.
    Failure { message: String },
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(placeholder) => f.debug_tuple("Pending").field(placeholder).finish(),
            Self::View(view) => f.debug_tuple("View").field(&view.kind()).finish(),
            Self::Failure { message } => {
                f.debug_struct("Failure").field("message", message).finish()
            }
        }
    }
}

pub struct RootOrchestrator {
    ctx: AppContext,
    registry: Arc<ViewRegistry>,
    gate: ReadinessGate,
    locale_sync: LocaleSynchronizer,
    pipeline: InitPipeline,
}

impl RootOrchestrator {
    #[must_use]
    pub fn new(ctx: AppContext, registry: Arc<ViewRegistry>) -> Self {
        Self {
            ctx,
            registry,
            gate: ReadinessGate::new(),
            locale_sync: LocaleSynchronizer::new(),
            pipeline: InitPipeline::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> ShellPhase {
        if self.gate.is_ready() {
            ShellPhase::Ready
        } else {
            ShellPhase::Hydrating
        }
    }

    #[must_use]
    pub fn readiness(&self) -> &ReadinessGate {
        &self.gate
    }

    /// Fire the `Hydrating -> Ready` transition.
    ///
    /// On the first call this runs the entry effects in one place, without
    /// waiting for any route to resolve: the locale synchronizer (once), the
    /// theme projection, the shell font preload, and the startup pipeline.
    /// Returns the pipeline's join handles from that first call; every later
    /// call is a no-op and returns nothing.
    pub fn mark_client_ready(&self) -> Vec<JoinHandle<Result<(), ShellError>>> {
        if !self.gate.mark_ready() {
            return Vec::new();
        }
        tracing::info!(
            packaged = self.ctx.build.packaged,
            locale = self.ctx.locale.tag(),
            "client ready"
        );
        self.locale_sync
            .sync_once(&self.ctx.locale, self.ctx.surface.as_ref());
        self.sync_theme();
        self.ctx.surface.preload_font(SHELL_FONT_FAMILY);
        self.pipeline.launch(startup_tasks(&self.ctx))
    }

    /// Re-project the configured theme preference onto the surface. Safe to
    /// call on every preference change; the projection is idempotent.
    pub fn sync_theme(&self) {
        sync_theme(
            self.ctx.config.theme(),
            self.ctx.surface.as_ref(),
            self.ctx.tokens.as_ref(),
        );
    }

    /// Describe the current screen. While hydrating this is only the boot
    /// placeholder; no route dispatch happens before the gate fires.
    #[must_use]
    pub fn frame(&self) -> Frame {
        if !self.gate.is_ready() {
            return Frame::Hydrating {
                placeholder: Placeholder::Logo,
            };
        }
        let location = self.ctx.navigator.current_path();
        let branch = dispatch(&location);
        let layout = layout_flags(
            self.ctx.build.packaged,
            self.ctx.config.tight_border(),
            self.ctx.surface.viewport_width(),
            &self.ctx.locale,
        );
        Frame::Ready { branch, layout }
    }

    /// Failure-isolation boundary around lazy activation: awaits the view's
    /// memoized handle and turns an activation error into a visible failure
    /// surface without touching sibling scopes.
    pub async fn surface_for(&self, kind: ViewKind) -> Surface {
        let Some(handle) = self.registry.resolve(kind) else {
            return self.missing_view(kind);
        };
        match handle.await {
            Ok(view) => Surface::View(view),
            Err(err) => {
                tracing::error!(view = kind.as_str(), error = %err, "view activation failed");
                Surface::Failure {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Non-blocking probe of a view slot. Reports the memoized outcome when
    /// the activation has settled and the declared placeholder while it is
    /// still in flight; completion is driven by whoever awaits
    /// [`RootOrchestrator::surface_for`].
    #[must_use]
    pub fn surface_now(&self, kind: ViewKind) -> Surface {
        let Some(handle) = self.registry.resolve(kind) else {
            return self.missing_view(kind);
        };
        match handle.peek() {
            None => Surface::Pending(self.registry.placeholder(kind)),
            Some(Ok(view)) => Surface::View(Arc::clone(view)),
            Some(Err(err)) => Surface::Failure {
                message: err.to_string(),
            },
        }
    }

    fn missing_view(&self, kind: ViewKind) -> Surface {
        let err = ShellError::Render {
            message: format!("no view registered for {}", kind.as_str()),
        };
        tracing::error!(view = kind.as_str(), error = %err, "view resolution failed");
        Surface::Failure {
            message: err.to_string(),
        }
    }
}

impl fmt::Debug for RootOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootOrchestrator")
            .field("phase", &self.phase())
            .field("pipeline_launched", &self.pipeline.launched())
            .finish_non_exhaustive()
    }
}
