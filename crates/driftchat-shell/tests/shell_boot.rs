//! End-to-end boot scenarios for the shell core, wired against the
//! in-memory collaborators.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use driftchat_shell::context::{BuildInfo, ModelRecord};
use driftchat_shell::locale::Locale;
use driftchat_shell::orchestrator::{Frame, RootOrchestrator, ShellPhase, Surface};
use driftchat_shell::routes::RouteBranch;
use driftchat_shell::testing::TestHarness;
use driftchat_shell::theme::{DARK_CLASS, LIGHT_CLASS, ThemePreference};
use driftchat_shell::views::ViewKind;

fn catalogue() -> Vec<ModelRecord> {
    vec![
        ModelRecord {
            name: "drift-4".to_string(),
            available: true,
            provider: Some("openai".to_string()),
        },
        ModelRecord {
            name: "drift-mini".to_string(),
            available: true,
            provider: Some("openai".to_string()),
        },
    ]
}

/// Location `/chat`, dark theme, capability disabled: the shell renders the
/// chat view with the side panel collapsed, the dark class applied, and no
/// capability bring-up attempted.
#[tokio::test]
async fn dark_chat_boot_reaches_the_shell_without_capability_bringup() {
    let harness = TestHarness::new();
    harness.navigator.set_path("/chat");
    harness.config.set_theme(ThemePreference::Dark);
    harness.set_models(catalogue());

    let shell = RootOrchestrator::new(harness.context(), Arc::new(TestHarness::registry()));
    assert_eq!(shell.phase(), ShellPhase::Hydrating);

    let handles = shell.mark_client_ready();
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert!(harness.surface.has_class(DARK_CLASS));
    assert!(!harness.surface.has_class(LIGHT_CLASS));

    match shell.frame() {
        Frame::Ready { branch, layout } => {
            assert_eq!(
                branch,
                RouteBranch::Shell {
                    view: Some(ViewKind::Chat),
                    sidebar_expanded: false,
                }
            );
            assert!(!layout.tight_border);
            assert!(!layout.rtl);
        }
        other => panic!("expected a ready frame, got {other:?}"),
    }

    assert!(matches!(
        shell.surface_for(ViewKind::Chat).await,
        Surface::View(_)
    ));
    assert_eq!(harness.capability.init_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.config.models(), catalogue());
    assert_eq!(harness.access.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(harness.api.requested_providers(), vec!["openai".to_string()]);
}

/// An enabled capability subsystem whose bring-up throws must not keep the
/// shell from rendering.
#[tokio::test]
async fn failing_capability_bringup_still_reaches_a_rendered_shell() {
    let harness = TestHarness::new();
    harness.navigator.set_path("/");
    harness.capability.set_enabled(true);
    harness.capability.set_fail_init(true);

    let shell = RootOrchestrator::new(harness.context(), Arc::new(TestHarness::registry()));
    for handle in shell.mark_client_ready() {
        // Every handle resolves Ok: the capability failure is consumed at
        // the task site.
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(harness.capability.init_calls.load(Ordering::SeqCst), 1);
    match shell.frame() {
        Frame::Ready { branch, .. } => {
            assert_eq!(
                branch,
                RouteBranch::Shell {
                    view: Some(ViewKind::Chat),
                    sidebar_expanded: true,
                }
            );
        }
        other => panic!("expected a ready frame, got {other:?}"),
    }
    assert!(matches!(
        shell.surface_for(ViewKind::Chat).await,
        Surface::View(_)
    ));
}

/// Readiness strictly precedes dispatch: the same location yields only the
/// boot placeholder until the gate fires.
#[tokio::test]
async fn no_route_dispatch_before_readiness() {
    let harness = TestHarness::new();
    harness.navigator.set_path("/artifacts/42");

    let shell = RootOrchestrator::new(harness.context(), Arc::new(TestHarness::registry()));
    assert!(matches!(shell.frame(), Frame::Hydrating { .. }));
    assert_eq!(harness.access.fetches.load(Ordering::SeqCst), 0);

    for handle in shell.mark_client_ready() {
        handle.await.unwrap().ok();
    }
    match shell.frame() {
        Frame::Ready { branch, .. } => assert_eq!(
            branch,
            RouteBranch::Artifact {
                id: Some("42".to_string())
            }
        ),
        other => panic!("expected the standalone artifact branch, got {other:?}"),
    }
}

/// Packaged RTL clients carry both layout modifiers on every branch.
#[tokio::test]
async fn layout_modifiers_apply_regardless_of_branch() {
    let mut harness = TestHarness::new();
    harness.locale = Locale::new("ar-EG");
    harness.build = BuildInfo { packaged: true };
    harness.navigator.set_path("/auth");

    let shell = RootOrchestrator::new(harness.context(), Arc::new(TestHarness::registry()));
    for handle in shell.mark_client_ready() {
        handle.await.unwrap().ok();
    }

    match shell.frame() {
        Frame::Ready { branch, layout } => {
            assert_eq!(branch, RouteBranch::Auth);
            assert!(layout.tight_border);
            assert!(layout.rtl);
        }
        other => panic!("expected a ready frame, got {other:?}"),
    }
    // The document language tag was aligned with the active locale.
    assert_eq!(harness.surface.language(), Some("ar-EG".to_string()));
}
