//! Render Function - Single Entry Point
//!
//! CRITICAL: render MUST validate internally. Invalid variables render nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::assets::{BundledAsset, AVATAR_ALT};
use crate::config::{ConfigError, RenderConfig};
use crate::format::{ChronoDateFormatter, DateFormatter};
use crate::hashing::{compute_input_hash, layout_fingerprint};
use crate::i18n::{labels, Labels, Locale};
use crate::layout::{Icon, LayoutNode, Style, TextRole, Tier};
use crate::proxy::{ImageProxy, PassthroughProxy};
use crate::schema::{post_schema, PostSchema, TEMPLATE_ID, TEMPLATE_VERSION};
use crate::validation::{ValidationResult, Validator};
use crate::variables::Variables;
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

const SHARE_ICON_PATH: &str = "M15 8a3 3 0 10-2.977-2.63l-4.94 2.47a3 3 0 100 4.319l4.94 2.47a3 3 0 10.895-1.789l-4.94-2.47a3.027 3.027 0 000-.74l4.94-2.47C13.456 7.68 14.19 8 15 8z";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Host execution context. Passed through, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Agent(Value);

impl Agent {
    pub fn new(value: Value) -> Self {
        Self(value)
    }
}

/// A render plus the metadata needed to reproduce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderManifest {
    pub template_id: String,
    pub template_version: String,
    pub engine_version: String,
    pub locale: Locale,
    pub rendered_at: DateTime<Utc>,
    pub input_hash: String,
    pub layout_hash: String,
    pub validation: ValidationResult,
    pub layout: LayoutNode,
}

/// The post card template.
pub struct PostTemplate {
    validator: Validator,
    formatter: Box<dyn DateFormatter + Send + Sync>,
    proxy: Box<dyn ImageProxy + Send + Sync>,
}

impl PostTemplate {
    pub fn new() -> Self {
        Self {
            validator: Validator::new(),
            formatter: Box::new(ChronoDateFormatter),
            proxy: Box::new(PassthroughProxy),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            validator: Validator::with_policy(config.unknown_locale),
            formatter: Box::new(ChronoDateFormatter),
            proxy: config.image_proxy()?,
        })
    }

    pub fn with_formatter(mut self, formatter: impl DateFormatter + Send + Sync + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn with_proxy(mut self, proxy: impl ImageProxy + Send + Sync + 'static) -> Self {
        self.proxy = Box::new(proxy);
        self
    }

    pub fn schema(&self) -> &'static PostSchema {
        post_schema()
    }

    /// Validate variables without rendering.
    pub fn check(&self, variables: &Value) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.check(variables)
    }

    /// Render the card, or nothing when the variables are invalid.
    pub fn render(&self, _agent: &Agent, variables: &Value) -> Option<LayoutNode> {
        self.render_checked(variables).ok().map(|(_, _, layout)| layout)
    }

    /// Render and wrap in a manifest.
    ///
    /// CRITICAL: This ALWAYS validates. Invalid variables are an error here.
    pub fn render_manifest(&self, _agent: &Agent, variables: &Value) -> Result<RenderManifest, RenderError> {
        let (validation, vars, layout) = self.render_checked(variables).map_err(|result| {
            RenderError::ValidationFailed(result.summary())
        })?;

        let input_hash = compute_input_hash(TEMPLATE_ID, TEMPLATE_VERSION, &vars, ENGINE_VERSION)?;
        let layout_hash = layout_fingerprint(&layout)?;

        Ok(RenderManifest {
            template_id: TEMPLATE_ID.to_string(),
            template_version: TEMPLATE_VERSION.to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            locale: vars.resolved_locale(),
            rendered_at: Utc::now(),
            input_hash,
            layout_hash,
            validation,
            layout,
        })
    }

    fn render_checked(
        &self,
        variables: &Value,
    ) -> Result<(ValidationResult, Variables, LayoutNode), ValidationResult> {
        // MANDATORY: no render path skips validation.
        let validation = self.check(variables);
        if !validation.valid {
            tracing::debug!(violations = %validation.summary(), "Variables rejected, rendering nothing");
            return Err(validation);
        }
        let vars = Variables::extract(variables);

        let locale = vars.resolved_locale();
        let card = Card {
            labels: labels(locale),
            formatted_date: self.formatter.format_long_date(&vars.date, locale),
            cover_src: self.proxy.proxy(&vars.image),
            avatar_src: self.proxy.proxy(BundledAsset::Avatar.reference()),
            vars: &vars,
        };
        let layout = card.compose();
        Ok((validation, vars, layout))
    }
}

impl Default for PostTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PostTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostTemplate")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

/// Render with the default collaborators.
pub fn render(agent: &Agent, variables: &Value) -> Option<LayoutNode> {
    PostTemplate::new().render(agent, variables)
}

/// Everything the layout needs, already resolved.
struct Card<'a> {
    vars: &'a Variables,
    labels: &'static Labels,
    formatted_date: String,
    cover_src: String,
    avatar_src: String,
}

impl Card<'_> {
    fn compose(&self) -> LayoutNode {
        let grid = LayoutNode::container(
            "grid",
            Style::new("grid items-center grid-cols-12 gap-y-[24px] md:gap-[48px]"),
            vec![self.media_column(), self.text_column()],
        );
        let frame = LayoutNode::container(
            "frame",
            Style::new("container max-w-[1172.4px] mx-auto z-10"),
            vec![grid],
        );
        LayoutNode::container(
            "root",
            Style::new("flex items-center px-2 overflow-hidden bg-white"),
            vec![frame],
        )
    }

    fn media_column(&self) -> LayoutNode {
        let cover = LayoutNode::container(
            "cover",
            Style::new("overflow-hidden shadow-md rounded-[19.2px]")
                .tier(Tier::Story, "rounded-[38.4px]"),
            vec![LayoutNode::Image {
                src: self.cover_src.clone(),
                alt: self.vars.title.clone(),
                style: Style::new("w-full"),
            }],
        );

        let avatar = LayoutNode::container(
            "avatar",
            Style::new("overflow-hidden rounded-full drop-shadow-lg")
                .tier(Tier::Thumb, "w-[64px] h-[64px]")
                .tier(Tier::Banner, "w-[96px] h-[96px]")
                .tier(Tier::Story, "w-[192px] h-[192px]"),
            vec![LayoutNode::Image {
                src: self.avatar_src.clone(),
                alt: AVATAR_ALT.to_string(),
                style: Style::new("w-full"),
            }],
        );

        let views = LayoutNode::Badge {
            label: format!("{} {}", self.vars.views, self.labels.views),
            style: Style::new("font-bold text-black rounded-full bg-primary")
                .tier(Tier::Thumb, "px-[10px] py-[5px] text-[12px]")
                .tier(Tier::Banner, "px-[14.4px] py-[9.6px] text-[14.4px]")
                .tier(Tier::Story, "px-[28.8px] py-[19.2px] text-[28.8px]"),
        };

        let share = LayoutNode::container(
            "share",
            Style::new("absolute flex justify-end flex-1 right-[28.8px]")
                .tier(Tier::Thumb, "bottom-[16px]")
                .tier(Tier::Banner, "bottom-[28.8px]")
                .tier(Tier::Story, "right-[57.6px] bottom-[57.6px]"),
            vec![LayoutNode::Button {
                label: self.labels.share.to_string(),
                label_style: Style::new("sr-only sm:not-sr-only"),
                icon: Some(Icon {
                    view_box: "0 0 20 20".to_string(),
                    path: SHARE_ICON_PATH.to_string(),
                    style: Style::new("w-[19.2px] h-[19.2px] sm:ml-[9.6px] sm:mr-[-4.8px]")
                        .tier(Tier::Story, "w-[38.4px] h-[38.4px] ml-[19.2px] mr-[-9.6px]"),
                }),
                style: Style::new("z-10 flex items-center px-[14.4px] py-[9.6px] text-[14.4px] font-bold text-black rounded-full bg-primary")
                    .tier(Tier::Story, "px-[28.8px] py-[19.2px] text-[28.8px]"),
            }],
        );

        let byline = LayoutNode::container(
            "byline",
            Style::new("relative flex items-end px-[28.8px] space-x-[19.2px]")
                .tier(Tier::Thumb, "mt-[-32px]")
                .tier(Tier::Banner, "mt-[-48px]")
                .tier(Tier::Story, "px-[57.6px] mt-[-96px] space-x-[38.4px]"),
            vec![avatar, views, share],
        );

        LayoutNode::container(
            "media",
            Style::new("col-span-12 md:col-span-7").tier(Tier::Story, "col-span-12"),
            vec![cover, byline],
        )
    }

    fn text_column(&self) -> LayoutNode {
        let title = LayoutNode::Text {
            role: TextRole::Heading,
            content: self.vars.title.clone(),
            datetime: None,
            style: Style::new("font-bold text-[#071D49]")
                .tier(Tier::Thumb, "text-[18px]")
                .tier(Tier::Banner, "text-[28.8px]")
                .tier(Tier::Story, "text-[57.6px]"),
        };

        let published = LayoutNode::Text {
            role: TextRole::Byline,
            content: format!("{} {}", self.labels.published, self.formatted_date),
            datetime: Some(self.vars.date.clone()),
            style: Style::new("font-bold text-primary")
                .tier(Tier::Thumb, "text-[12px]")
                .tier(Tier::Banner, "text-[14.4px]")
                .tier(Tier::Story, "text-[28.8px]"),
        };

        // hidden on thumbnails
        let body = LayoutNode::Text {
            role: TextRole::Body,
            content: self.vars.content.clone(),
            datetime: None,
            style: Style::new("font-bold text-[#838383] whitespace-pre-line")
                .tier(Tier::Thumb, "hidden")
                .tier(Tier::Banner, "block text-[14.4px]")
                .tier(Tier::Story, "text-[28.8px]"),
        };

        LayoutNode::container(
            "text",
            Style::new("col-span-12 md:col-span-5")
                .tier(Tier::Thumb, "space-y-[16px]")
                .tier(Tier::Banner, "space-y-[19.2px]")
                .tier(Tier::Story, "col-span-12 space-y-[38.4px]"),
            vec![title, published, body],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::default_variables;
    use serde_json::json;

    struct FixedFormatter;

    impl DateFormatter for FixedFormatter {
        fn format_long_date(&self, _iso: &str, locale: Locale) -> String {
            format!("<{}>", locale)
        }
    }

    struct TaggingProxy;

    impl ImageProxy for TaggingProxy {
        fn proxy(&self, src: &str) -> String {
            format!("proxied:{}", src)
        }
    }

    #[test]
    fn test_render_uses_injected_formatter() {
        let template = PostTemplate::new().with_formatter(FixedFormatter);
        let layout = template.render(&Agent::default(), &default_variables()).unwrap();
        assert!(layout.texts().contains(&"Published <en>"));
    }

    #[test]
    fn test_both_images_go_through_proxy() {
        let template = PostTemplate::new().with_proxy(TaggingProxy);
        let layout = template.render(&Agent::default(), &default_variables()).unwrap();
        let srcs: Vec<_> = layout
            .walk()
            .into_iter()
            .filter_map(|n| match n {
                LayoutNode::Image { src, .. } => Some(src.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(srcs, ["proxied:/static/background.jpeg", "proxied:/static/me.jpeg"]);
    }

    #[test]
    fn test_cover_alt_is_title() {
        let mut vars = default_variables();
        vars["title"] = json!("Hello");
        let layout = render(&Agent::default(), &vars).unwrap();
        let cover = layout.find_container("cover").unwrap();
        assert!(matches!(&cover.children()[0], LayoutNode::Image { alt, .. } if alt == "Hello"));
    }

    #[test]
    fn test_byline_keeps_raw_datetime() {
        let layout = render(&Agent::default(), &default_variables()).unwrap();
        let text = layout.find_container("text").unwrap();
        match &text.children()[1] {
            LayoutNode::Text { role, datetime, .. } => {
                assert_eq!(*role, TextRole::Byline);
                assert_eq!(datetime.as_deref(), Some("2005-12-24T04:00:00.000Z"));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_agent_is_not_interpreted() {
        let vars = default_variables();
        let a = render(&Agent::default(), &vars);
        let b = render(&Agent::new(json!({"name": "jsdom", "width": 1200})), &vars);
        assert_eq!(a, b);
    }

    #[test]
    fn test_manifest_for_invalid_variables() {
        let err = PostTemplate::new()
            .render_manifest(&Agent::default(), &json!({}))
            .unwrap_err();
        assert!(err.to_string().starts_with("Validation failed: required(content)"));
    }

    #[test]
    fn test_from_config_carries_locale_policy() {
        let config = RenderConfig {
            unknown_locale: crate::config::LocalePolicy::Fallback,
            ..Default::default()
        };
        let template = PostTemplate::from_config(&config).unwrap();
        assert_eq!(template.validator.policy(), crate::config::LocalePolicy::Fallback);
        assert_eq!(PostTemplate::new().validator.policy(), crate::config::LocalePolicy::Reject);
    }

    #[test]
    fn test_manifest_fields() {
        let manifest = PostTemplate::new()
            .render_manifest(&Agent::default(), &default_variables())
            .unwrap();
        assert_eq!(manifest.template_id, "post");
        assert_eq!(manifest.engine_version, ENGINE_VERSION);
        assert_eq!(manifest.locale, Locale::En);
        assert_eq!(manifest.layout_hash, layout_fingerprint(&manifest.layout).unwrap());
        assert!(manifest.validation.valid);
    }
}
