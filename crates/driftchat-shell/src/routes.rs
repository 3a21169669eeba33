//! Maps the current location to a visual branch.
//!
//! Dispatch is a pure function of the location string, decoupled from any
//! rendering concern: the orchestrator turns the chosen branch into a frame,
//! and the presentation collaborators decide how it looks.

use crate::locale::Locale;
use crate::views::ViewKind;

pub mod paths {
    pub const HOME: &str = "/";
    pub const CHAT: &str = "/chat";
    pub const NEW_CHAT: &str = "/new-chat";
    pub const MASKS: &str = "/masks";
    pub const PLUGINS: &str = "/plugins";
    pub const SEARCH_CHAT: &str = "/search-chat";
    pub const SETTINGS: &str = "/settings";
    pub const MCP_MARKET: &str = "/mcp-market";
    pub const AUTH: &str = "/auth";
    pub const IMAGE_GEN: &str = "/sd";
    pub const IMAGE_GEN_NEW: &str = "/sd-new";
    pub const ARTIFACTS: &str = "/artifacts";

    pub(super) const ARTIFACTS_SEGMENT: &str = "artifacts";
}

/// Viewport cutoff at or below which the tight-border treatment is
/// suppressed for the configured flag.
pub const MOBILE_MAX_WIDTH: u32 = 600;

/// The visual branch chosen for a location. First match wins, and the
/// standalone branches never carry the shell chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteBranch {
    /// Standalone artifact detail, rendered without side panel or chrome.
    Artifact { id: Option<String> },
    /// Auth view, no side panel.
    Auth,
    /// Image-generation views (list or "new"), no side panel.
    ImageGen,
    /// Standard layout: side panel plus the routed content region.
    Shell {
        /// The routed sub-view; `None` means the sub-path is unmatched and
        /// the content region renders nothing. Policy choice, not an error.
        view: Option<ViewKind>,
        /// The side panel is expanded only on the home location.
        sidebar_expanded: bool,
    },
}

/// Presentation-only modifiers. They never influence which branch is
/// chosen, only how the root container is attributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutFlags {
    pub tight_border: bool,
    pub rtl: bool,
}

/// Strip hash-router and query noise from a raw location. Empty input means
/// home.
#[must_use]
pub fn normalize_location(raw: &str) -> String {
    let mut path = raw.trim();
    if let Some(rest) = path.strip_prefix('#') {
        path = rest;
    }
    if let Some((head, _)) = path.split_once('?') {
        path = head;
    }
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        paths::HOME.to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Resolve a location to its branch. Evaluation order, by specificity:
/// artifact detail, then auth, then image generation, then the shell.
#[must_use]
pub fn dispatch(location: &str) -> RouteBranch {
    let location = normalize_location(location);
    if let Some(id) = match_artifact(&location) {
        return RouteBranch::Artifact { id };
    }
    if location == paths::AUTH {
        return RouteBranch::Auth;
    }
    if location == paths::IMAGE_GEN || location == paths::IMAGE_GEN_NEW {
        return RouteBranch::ImageGen;
    }
    RouteBranch::Shell {
        view: shell_view(&location),
        sidebar_expanded: location == paths::HOME,
    }
}

/// Compute the presentation modifiers for the root container.
#[must_use]
pub fn layout_flags(
    packaged: bool,
    tight_border_configured: bool,
    viewport_width: u32,
    locale: &Locale,
) -> LayoutFlags {
    let narrow = viewport_width <= MOBILE_MAX_WIDTH;
    LayoutFlags {
        tight_border: packaged || (tight_border_configured && !narrow),
        rtl: locale.is_rtl(),
    }
}

/// Any location carrying an `artifacts` segment is an artifact detail; the
/// segment that follows, if any, is the artifact id.
fn match_artifact(location: &str) -> Option<Option<String>> {
    let mut segments = location.split('/').filter(|segment| !segment.is_empty());
    segments
        .by_ref()
        .any(|segment| segment == paths::ARTIFACTS_SEGMENT)
        .then(|| segments.next().map(str::to_string))
}

fn shell_view(location: &str) -> Option<ViewKind> {
    match location {
        paths::HOME | paths::CHAT => Some(ViewKind::Chat),
        paths::NEW_CHAT => Some(ViewKind::NewChat),
        paths::MASKS => Some(ViewKind::Masks),
        paths::PLUGINS => Some(ViewKind::Plugins),
        paths::SEARCH_CHAT => Some(ViewKind::SearchChat),
        paths::SETTINGS => Some(ViewKind::Settings),
        paths::MCP_MARKET => Some(ViewKind::McpMarket),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        LayoutFlags, MOBILE_MAX_WIDTH, RouteBranch, dispatch, layout_flags, normalize_location,
        paths,
    };
    use crate::locale::Locale;
    use crate::views::ViewKind;

    #[test]
    fn locations_are_normalized_before_dispatch() {
        assert_eq!(normalize_location(""), "/");
        assert_eq!(normalize_location("#/chat"), "/chat");
        assert_eq!(normalize_location("/chat/"), "/chat");
        assert_eq!(normalize_location("/settings?tab=sync"), "/settings");
        assert_eq!(normalize_location("chat"), "/chat");
    }

    #[test]
    fn artifact_detail_always_wins_over_the_shell() {
        assert_eq!(
            dispatch("/artifacts/42"),
            RouteBranch::Artifact {
                id: Some("42".to_string())
            }
        );
        assert_eq!(dispatch(paths::ARTIFACTS), RouteBranch::Artifact { id: None });
        // Even a nested location with an artifacts segment short-circuits
        // before the shell is considered.
        assert_eq!(
            dispatch("/share/artifacts/abc"),
            RouteBranch::Artifact {
                id: Some("abc".to_string())
            }
        );
    }

    #[test]
    fn auth_and_image_gen_render_without_the_shell() {
        assert_eq!(dispatch(paths::AUTH), RouteBranch::Auth);
        assert_eq!(dispatch(paths::IMAGE_GEN), RouteBranch::ImageGen);
        assert_eq!(dispatch(paths::IMAGE_GEN_NEW), RouteBranch::ImageGen);
    }

    #[test]
    fn home_routes_to_chat_with_the_sidebar_expanded() {
        assert_eq!(
            dispatch(paths::HOME),
            RouteBranch::Shell {
                view: Some(ViewKind::Chat),
                sidebar_expanded: true,
            }
        );
    }

    #[test]
    fn named_shell_paths_map_to_their_views() {
        let cases = [
            (paths::CHAT, ViewKind::Chat),
            (paths::NEW_CHAT, ViewKind::NewChat),
            (paths::MASKS, ViewKind::Masks),
            (paths::PLUGINS, ViewKind::Plugins),
            (paths::SEARCH_CHAT, ViewKind::SearchChat),
            (paths::SETTINGS, ViewKind::Settings),
            (paths::MCP_MARKET, ViewKind::McpMarket),
        ];
        for (path, expected) in cases {
            assert_eq!(
                dispatch(path),
                RouteBranch::Shell {
                    view: Some(expected),
                    sidebar_expanded: false,
                },
                "path {path}"
            );
        }
    }

    #[test]
    fn unmatched_shell_paths_render_nothing() {
        assert_eq!(
            dispatch("/totally-unknown"),
            RouteBranch::Shell {
                view: None,
                sidebar_expanded: false,
            }
        );
    }

    #[test]
    fn tight_border_applies_for_packaged_or_wide_configured_clients() {
        let en = Locale::new("en-US");
        // Packaged clients always get the tight border, even on narrow viewports.
        assert!(layout_flags(true, false, 400, &en).tight_border);
        // Configured flag only applies above the mobile cutoff.
        assert!(layout_flags(false, true, MOBILE_MAX_WIDTH + 1, &en).tight_border);
        assert!(!layout_flags(false, true, MOBILE_MAX_WIDTH, &en).tight_border);
        assert!(!layout_flags(false, false, 1280, &en).tight_border);
    }

    #[test]
    fn rtl_flag_follows_the_locale() {
        assert_eq!(
            layout_flags(false, false, 1280, &Locale::new("ar")),
            LayoutFlags {
                tight_border: false,
                rtl: true,
            }
        );
        assert!(!layout_flags(false, false, 1280, &Locale::new("en")).rtl);
    }
}
