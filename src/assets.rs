//! Bundled static images, referenced by stable identifiers.
//!
//! Packaging of the files themselves is the host's concern.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundledAsset {
    /// Default cover image.
    Background,
    /// Second example cover offered in the variables UI.
    Alternative,
    /// Fixed author avatar.
    Avatar,
}

pub const AVATAR_ALT: &str = "Daniel Esteves";

impl BundledAsset {
    pub const ALL: [BundledAsset; 3] = [Self::Background, Self::Alternative, Self::Avatar];

    pub const fn reference(self) -> &'static str {
        match self {
            Self::Background => "/static/background.jpeg",
            Self::Alternative => "/static/alternative.jpeg",
            Self::Avatar => "/static/me.jpeg",
        }
    }

    pub fn from_reference(reference: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.reference() == reference)
    }
}
