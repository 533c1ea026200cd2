//! Translation Dictionary - Fixed Card Labels
//!
//! One label set per supported locale. Read-only for the process lifetime.

use serde::{Deserialize, Serialize};

/// Locales the post card ships labels for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

/// Stable ordering, used for schema examples and CLI output.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Es];

impl Locale {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Exact match on the locale code. Region tags (`es-MX`) are not accepted.
    pub fn parse(value: &str) -> Option<Self> {
        SUPPORTED_LOCALES.iter().copied().find(|l| l.as_str() == value)
    }

    /// Calendar data used for month names.
    pub(crate) const fn calendar(self) -> chrono::Locale {
        match self {
            Self::En => chrono::Locale::en_US,
            Self::Es => chrono::Locale::es_ES,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub published: &'static str,
    pub share: &'static str,
    pub views: &'static str,
}

const EN: Labels = Labels {
    published: "Published",
    share: "Share this post",
    views: "views",
};

const ES: Labels = Labels {
    published: "Publicado",
    share: "Comparte este post",
    views: "vistas",
};

/// Lookup is total: every `Locale` variant has a label set.
pub fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::En => &EN,
        Locale::Es => &ES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("es"), Some(Locale::Es));
    }

    #[test]
    fn test_parse_rejects_unknown_and_region_tags() {
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::parse("es-MX"), None);
        assert_eq!(Locale::parse("EN"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn test_spanish_labels() {
        let l = labels(Locale::Es);
        assert_eq!(l.published, "Publicado");
        assert_eq!(l.share, "Comparte este post");
        assert_eq!(l.views, "vistas");
    }

    #[test]
    fn test_default_locale_is_english() {
        assert_eq!(Locale::default(), Locale::En);
        assert_eq!(labels(Locale::default()).views, "views");
    }
}
