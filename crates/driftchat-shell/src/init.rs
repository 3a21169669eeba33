//! One-shot startup pipeline.
//!
//! A fixed set of independent tasks fires when the shell becomes ready.
//! Tasks run concurrently, with no ordering between each other or relative
//! to route dispatch, and none of them is awaited before the shell renders.
//! Each task declares its own failure policy so one bad collaborator cannot
//! take the UI down with it.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::context::AppContext;
use crate::error::ShellError;

pub const TASK_MODEL_CATALOGUE: &str = "model-catalogue";
pub const TASK_ACCESS_STATE: &str = "access-state";
pub const TASK_CAPABILITY: &str = "capability-subsystem";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailurePolicy {
    /// No local handling; the outcome surfaces through the join handle.
    Propagate,
    /// Caught at the task site, logged, and discarded.
    CatchAndLog,
}

/// A startup task: identifier, isolation policy, and the work itself.
/// Each task runs exactly once per application lifetime.
pub struct InitTask {
    pub id: &'static str,
    pub policy: FailurePolicy,
    run: BoxFuture<'static, Result<(), ShellError>>,
}

impl InitTask {
    pub fn new<Fut>(id: &'static str, policy: FailurePolicy, run: Fut) -> Self
    where
        Fut: Future<Output = Result<(), ShellError>> + Send + 'static,
    {
        Self {
            id,
            policy,
            run: run.boxed(),
        }
    }
}

/// The fixed startup set for the shell.
#[must_use]
pub fn startup_tasks(ctx: &AppContext) -> Vec<InitTask> {
    vec![
        model_catalogue_task(ctx),
        access_state_task(ctx),
        capability_task(ctx),
    ]
}

/// Fetch the active provider's model list and merge it into configuration.
/// The merge is idempotent, so a replayed catalogue changes nothing.
fn model_catalogue_task(ctx: &AppContext) -> InitTask {
    let config = ctx.config.clone();
    let api = ctx.api.clone();
    InitTask::new(TASK_MODEL_CATALOGUE, FailurePolicy::Propagate, async move {
        let client = api.client_for(&config.model_provider());
        let models = client.models().await?;
        tracing::debug!(task = TASK_MODEL_CATALOGUE, count = models.len(), "merging model catalogue");
        config.merge_models(models);
        Ok(())
    })
}

/// Trigger the access store's async refresh. Fire-and-forget: the store
/// owns whatever failure handling it wants.
fn access_state_task(ctx: &AppContext) -> InitTask {
    let access = ctx.access.clone();
    InitTask::new(TASK_ACCESS_STATE, FailurePolicy::Propagate, async move {
        access.fetch().await;
        Ok(())
    })
}

/// Bring up the optional capability subsystem when its flag is enabled.
/// This is the one task with a mandatory local-catch policy: any error from
/// the flag check or the bring-up is logged and discarded.
fn capability_task(ctx: &AppContext) -> InitTask {
    let capability = ctx.capability.clone();
    InitTask::new(TASK_CAPABILITY, FailurePolicy::CatchAndLog, async move {
        if capability.is_enabled().await? {
            tracing::info!(task = TASK_CAPABILITY, "initializing capability subsystem");
            capability.initialize().await?;
            tracing::info!(task = TASK_CAPABILITY, "capability subsystem initialized");
        }
        Ok(())
    })
}

/// Launches a startup set exactly once per application lifetime.
#[derive(Debug, Default)]
pub struct InitPipeline {
    launched: AtomicBool,
}

impl InitPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn launched(&self) -> bool {
        self.launched.load(Ordering::SeqCst)
    }

    /// Spawn every task concurrently and return the join handles without
    /// awaiting any of them. Calls after the first are no-ops.
    pub fn launch(&self, tasks: Vec<InitTask>) -> Vec<JoinHandle<Result<(), ShellError>>> {
        if self.launched.swap(true, Ordering::SeqCst) {
            return Vec::new();
        }
        tasks.into_iter().map(spawn_task).collect()
    }
}

fn spawn_task(task: InitTask) -> JoinHandle<Result<(), ShellError>> {
    let InitTask { id, policy, run } = task;
    tokio::spawn(async move {
        match run.await {
            Ok(()) => Ok(()),
            Err(err) => match policy {
                FailurePolicy::CatchAndLog => {
                    tracing::error!(task = id, error = %err, "startup task failed; continuing");
                    Ok(())
                }
                FailurePolicy::Propagate => {
                    tracing::error!(task = id, error = %err, "startup task failed");
                    Err(err)
                }
            },
        }
    })
}
