use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::context::PresentationSurface;

/// Primary language subtags laid out right-to-left.
const RTL_PRIMARY_SUBTAGS: &[&str] = &["ar", "fa", "he", "ur"];

/// The active locale, as reported by the localization collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    tag: String,
}

impl Locale {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Canonical language tag, e.g. `en-US` or `zh-Hans`.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn is_rtl(&self) -> bool {
        let primary = self
            .tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        RTL_PRIMARY_SUBTAGS.contains(&primary.as_str())
    }
}

/// Aligns the document language tag with the active locale, once per
/// process lifetime. Locale changes during the session do not re-tag the
/// document.
#[derive(Debug, Default)]
pub struct LocaleSynchronizer {
    applied: AtomicBool,
}

impl LocaleSynchronizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the first activation; later calls are no-ops.
    pub fn sync_once(&self, locale: &Locale, surface: &dyn PresentationSurface) -> bool {
        if self.applied.swap(true, Ordering::SeqCst) {
            return false;
        }
        let current = surface.language_tag();
        if current.as_deref() != Some(locale.tag()) {
            surface.set_language_tag(locale.tag());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Locale, LocaleSynchronizer};
    use crate::context::PresentationSurface;
    use crate::testing::RecordingSurface;

    #[test]
    fn rtl_detection_uses_the_primary_subtag() {
        assert!(Locale::new("ar").is_rtl());
        assert!(Locale::new("ar-EG").is_rtl());
        assert!(Locale::new("he-IL").is_rtl());
        assert!(!Locale::new("en-US").is_rtl());
        assert!(!Locale::new("zh-Hans").is_rtl());
    }

    #[test]
    fn mismatched_document_tag_is_overwritten_once() {
        let surface = RecordingSurface::new();
        surface.set_language_tag("en");

        let sync = LocaleSynchronizer::new();
        assert!(sync.sync_once(&Locale::new("zh-CN"), &surface));
        assert_eq!(surface.language(), Some("zh-CN".to_string()));
    }

    #[test]
    fn matching_document_tag_is_left_untouched() {
        let surface = RecordingSurface::new();
        surface.set_language_tag("en-US");

        let sync = LocaleSynchronizer::new();
        assert!(sync.sync_once(&Locale::new("en-US"), &surface));
        assert_eq!(surface.language_writes(), 1);
    }

    #[test]
    fn second_activation_is_a_no_op() {
        let surface = RecordingSurface::new();
        let sync = LocaleSynchronizer::new();

        assert!(sync.sync_once(&Locale::new("en-US"), &surface));
        // A later locale change does not re-tag the document.
        assert!(!sync.sync_once(&Locale::new("ar"), &surface));
        assert_eq!(surface.language(), Some("en-US".to_string()));
    }
}
