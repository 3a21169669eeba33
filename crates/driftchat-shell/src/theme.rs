//! Projects the configured theme preference onto the presentation surface.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::{ColorScheme, PresentationSurface, ThemeTokens};

pub const LIGHT_CLASS: &str = "light";
pub const DARK_CLASS: &str = "dark";

/// Fixed color hints used in auto mode, where the explicit classes are
/// removed and the ambient OS/browser preference decides.
pub const AUTO_DARK_HINT: &str = "#151515";
pub const AUTO_LIGHT_HINT: &str = "#fafafa";

/// Token consulted for the active theme's accent color in non-auto modes.
pub const ACCENT_TOKEN: &str = "theme-color";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    Auto,
}

impl ThemePreference {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }
}

impl FromStr for ThemePreference {
    type Err = Infallible;

    /// Unknown values fall back to the configuration default, `auto`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "light" => Self::Light,
            "dark" => Self::Dark,
            _ => Self::Auto,
        })
    }
}

/// Apply a theme preference as a deterministic presentation effect.
///
/// Both explicit classes are removed before the new one is added, so
/// switching preferences can never stack conflicting classes. The projection
/// is idempotent: applying the same preference twice leaves the surface in
/// the same state as applying it once. Re-invoke whenever the configured
/// preference changes.
pub fn sync_theme(
    preference: ThemePreference,
    surface: &dyn PresentationSurface,
    tokens: &dyn ThemeTokens,
) {
    surface.remove_class(LIGHT_CLASS);
    surface.remove_class(DARK_CLASS);

    match preference {
        ThemePreference::Light => surface.add_class(LIGHT_CLASS),
        ThemePreference::Dark => surface.add_class(DARK_CLASS),
        ThemePreference::Auto => {}
    }

    if preference == ThemePreference::Auto {
        surface.set_color_hint(ColorScheme::Dark, AUTO_DARK_HINT);
        surface.set_color_hint(ColorScheme::Light, AUTO_LIGHT_HINT);
    } else {
        // Non-auto modes pin both hints to the active theme's accent color.
        // A missing token falls back to the per-scheme neutral defaults.
        let accent = tokens.color_token(ACCENT_TOKEN);
        surface.set_color_hint(
            ColorScheme::Dark,
            accent.as_deref().unwrap_or(AUTO_DARK_HINT),
        );
        surface.set_color_hint(
            ColorScheme::Light,
            accent.as_deref().unwrap_or(AUTO_LIGHT_HINT),
        );
    }
}
