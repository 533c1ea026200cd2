//! Layout Tree - Declarative Card Description
//!
//! An owned tree of tagged nodes consumed by the host renderer. Each node
//! carries base style intents plus per-tier overrides; choosing the tier is
//! the host's job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Output size tiers the host renders the card at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Thumb,
    Banner,
    Story,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Self::Thumb, Self::Banner, Self::Story];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tiers: BTreeMap<Tier, Vec<String>>,
}

fn classes(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split_whitespace().map(str::to_string)
}

impl Style {
    pub fn new(base: &str) -> Self {
        Self {
            base: classes(base).collect(),
            tiers: BTreeMap::new(),
        }
    }

    pub fn tier(mut self, tier: Tier, list: &str) -> Self {
        self.tiers.entry(tier).or_default().extend(classes(list));
        self
    }

    /// Base intents followed by the tier's overrides.
    pub fn resolve(&self, tier: Tier) -> Vec<&str> {
        self.base
            .iter()
            .chain(self.tiers.get(&tier).into_iter().flatten())
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Heading,
    Byline,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub view_box: String,
    pub path: String,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutNode {
    Container {
        name: String,
        style: Style,
        children: Vec<LayoutNode>,
    },
    Image {
        src: String,
        alt: String,
        style: Style,
    },
    Text {
        role: TextRole,
        content: String,
        /// Machine-readable timestamp behind a formatted date.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datetime: Option<String>,
        style: Style,
    },
    Badge {
        label: String,
        style: Style,
    },
    Button {
        label: String,
        label_style: Style,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<Icon>,
        style: Style,
    },
}

impl LayoutNode {
    pub fn container(name: &str, style: Style, children: Vec<LayoutNode>) -> Self {
        Self::Container {
            name: name.to_string(),
            style,
            children,
        }
    }

    pub fn style(&self) -> &Style {
        match self {
            Self::Container { style, .. }
            | Self::Image { style, .. }
            | Self::Text { style, .. }
            | Self::Badge { style, .. }
            | Self::Button { style, .. } => style,
        }
    }

    pub fn children(&self) -> &[LayoutNode] {
        match self {
            Self::Container { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first, pre-order.
    pub fn walk(&self) -> Vec<&LayoutNode> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.walk());
        }
        out
    }

    /// Visible strings in document order.
    pub fn texts(&self) -> Vec<&str> {
        self.walk()
            .into_iter()
            .filter_map(|node| match node {
                Self::Text { content, .. } => Some(content.as_str()),
                Self::Badge { label, .. } | Self::Button { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn find_container(&self, wanted: &str) -> Option<&LayoutNode> {
        self.walk()
            .into_iter()
            .find(|node| matches!(node, Self::Container { name, .. } if name == wanted))
    }
}
