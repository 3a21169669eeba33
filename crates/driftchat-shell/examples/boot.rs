//! Boots the shell core against the in-memory collaborators and logs the
//! frame resolved for a few locations.
//!
//! ```sh
//! RUST_LOG=info cargo run -p driftchat-shell --example boot
//! ```

use std::sync::Arc;

use driftchat_shell::orchestrator::RootOrchestrator;
use driftchat_shell::testing::TestHarness;
use driftchat_shell::theme::ThemePreference;
use driftchat_shell::views::ViewKind;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let harness = TestHarness::new();
    harness.config.set_theme(ThemePreference::Dark);

    let shell = RootOrchestrator::new(harness.context(), Arc::new(TestHarness::registry()));
    tracing::info!(frame = ?shell.frame(), "before readiness");

    let handles = shell.mark_client_ready();
    for handle in handles {
        if let Err(err) = handle.await? {
            tracing::warn!(error = %err, "startup task reported a failure");
        }
    }

    for path in ["/", "/chat", "/settings", "/sd", "/auth", "/artifacts/42"] {
        harness.navigator.set_path(path);
        tracing::info!(path, frame = ?shell.frame(), "dispatched");
    }

    let surface = shell.surface_for(ViewKind::Chat).await;
    tracing::info!(surface = ?surface, "chat view activated");

    Ok(())
}
