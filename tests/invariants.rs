//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees of the post card.

use forgecards_core::{
    default_variables, render, Agent, LayoutNode, LocalePolicy, PostTemplate, RenderConfig,
    layout::Tier,
    schema::{DEFAULT_CONTENT, DEFAULT_TITLE},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

fn with(field: &str, value: Value) -> Value {
    let mut vars = default_variables();
    vars[field] = value;
    vars
}

fn without(field: &str) -> Value {
    let mut vars = default_variables();
    vars.as_object_mut().unwrap().remove(field);
    vars
}

fn badge_label(layout: &LayoutNode) -> String {
    layout
        .walk()
        .into_iter()
        .find_map(|n| match n {
            LayoutNode::Badge { label, .. } => Some(label.clone()),
            _ => None,
        })
        .expect("views badge")
}

fn button_label(layout: &LayoutNode) -> String {
    layout
        .walk()
        .into_iter()
        .find_map(|n| match n {
            LayoutNode::Button { label, .. } => Some(label.clone()),
            _ => None,
        })
        .expect("share button")
}

#[rstest]
#[case("content")]
#[case("date")]
#[case("image")]
#[case("title")]
#[case("views")]
fn invariant_missing_required_field_renders_nothing(#[case] field: &str) {
    assert!(render(&Agent::default(), &without(field)).is_none());
}

#[test]
fn invariant_absent_locale_renders_english() {
    let layout = render(&Agent::default(), &without("locale")).unwrap();
    assert_eq!(badge_label(&layout), "300 views");
    assert_eq!(button_label(&layout), "Share this post");
    assert!(layout.texts().contains(&"Published December 24, 2005"));
}

#[test]
fn invariant_spanish_labels() {
    let layout = render(&Agent::default(), &with("locale", json!("es"))).unwrap();
    assert_eq!(badge_label(&layout), "300 vistas");
    assert_eq!(button_label(&layout), "Comparte este post");
    assert!(layout.texts().contains(&"Publicado 24 de diciembre de 2005"));
}

#[test]
fn invariant_long_date_in_english() {
    let vars = with("date", json!("2005-12-24T04:00:00.000Z"));
    let layout = render(&Agent::default(), &with_locale(vars, "en")).unwrap();
    assert!(layout.texts().contains(&"Published December 24, 2005"));
}

#[rstest]
#[case("2005-12-24T04:00:00")]
#[case("2005-12-24T04:00:00.000")]
#[case("2005-12-24T04:00:00+0000")]
fn invariant_offsetless_iso_dates_render(#[case] date: &str) {
    let layout = render(&Agent::default(), &with("date", json!(date))).unwrap();
    assert!(layout.texts().contains(&"Published December 24, 2005"));
}

#[test]
fn invariant_malformed_date_renders_invalid_date() {
    let vars = with("date", json!("yesterday"));
    let layout = render(&Agent::default(), &vars).unwrap();
    assert!(layout.texts().contains(&"Published Invalid Date"));

    let manifest = PostTemplate::new().render_manifest(&Agent::default(), &vars).unwrap();
    assert!(manifest.validation.valid);
    assert_eq!(manifest.validation.violations[0].rule, "date_time");
}

fn with_locale(mut vars: Value, locale: &str) -> Value {
    vars["locale"] = json!(locale);
    vars
}

#[test]
fn invariant_render_is_deterministic() {
    let template = PostTemplate::new();
    let agent = Agent::new(json!({"name": "host"}));
    let vars = with("title", json!("Same every time"));

    let first = template.render(&agent, &vars).unwrap();
    let second = template.render(&agent, &vars).unwrap();
    assert_eq!(first, second);

    let m1 = template.render_manifest(&agent, &vars).unwrap();
    let m2 = template.render_manifest(&agent, &vars).unwrap();
    assert_eq!(m1.layout_hash, m2.layout_hash);
    assert_eq!(m1.input_hash, m2.input_hash);
}

#[test]
fn invariant_defaults_render_full_card() {
    let layout = render(&Agent::default(), &default_variables()).unwrap();
    let texts = layout.texts();
    assert!(texts.contains(&DEFAULT_TITLE));
    assert!(texts.contains(&DEFAULT_CONTENT));
    assert!(texts.contains(&"300 views"));
}

#[test]
fn invariant_unknown_locale_rejected_by_default() {
    let vars = with("locale", json!("fr"));
    assert!(render(&Agent::default(), &vars).is_none());

    let err = PostTemplate::new().render_manifest(&Agent::default(), &vars).unwrap_err();
    assert!(err.to_string().contains("Unsupported locale"));
}

#[test]
fn invariant_unknown_locale_falls_back_when_configured() {
    let config = RenderConfig {
        unknown_locale: LocalePolicy::Fallback,
        ..Default::default()
    };
    let template = PostTemplate::from_config(&config).unwrap();
    let vars = with("locale", json!("fr"));

    let layout = template.render(&Agent::default(), &vars).unwrap();
    assert_eq!(badge_label(&layout), "300 views");

    let manifest = template.render_manifest(&Agent::default(), &vars).unwrap();
    assert!(manifest.validation.valid);
    assert_eq!(manifest.validation.violations.len(), 1);
}

#[test]
fn invariant_schema_locale_enum_is_the_dictionary() {
    let config = RenderConfig {
        unknown_locale: LocalePolicy::Fallback,
        ..Default::default()
    };
    let template = PostTemplate::from_config(&config).unwrap();
    let doc = template.schema().document();
    assert_eq!(doc["properties"]["locale"]["enum"], json!(["en", "es"]));
    assert!(template.render(&Agent::default(), &with("locale", json!("fr"))).is_some());
}

#[rstest]
#[case(json!(null))]
#[case(json!([]))]
#[case(json!({"title": 42}))]
fn invariant_malformed_candidates_render_nothing(#[case] vars: Value) {
    assert!(render(&Agent::default(), &vars).is_none());
}

#[test]
fn invariant_tree_shape() {
    let layout = render(&Agent::default(), &default_variables()).unwrap();
    let names: Vec<_> = layout
        .walk()
        .into_iter()
        .filter_map(|n| match n {
            LayoutNode::Container { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["root", "frame", "grid", "media", "cover", "byline", "avatar", "share", "text"]);
}

#[test]
fn invariant_body_hidden_on_thumb_only() {
    let layout = render(&Agent::default(), &default_variables()).unwrap();
    let body = layout
        .walk()
        .into_iter()
        .find(|n| matches!(n, LayoutNode::Text { content, .. } if content == DEFAULT_CONTENT))
        .unwrap();
    for tier in Tier::ALL {
        let hidden = body.style().resolve(tier).contains(&"hidden");
        assert_eq!(hidden, tier == Tier::Thumb, "{:?}", tier);
    }
}

#[test]
fn invariant_cdn_proxy_from_config() {
    let config = RenderConfig::from_json(r#"{"proxy": {"endpoint": "https://cdn.example.com/v2"}}"#).unwrap();
    let template = PostTemplate::from_config(&config).unwrap();
    let vars = with("image", json!("https://example.com/cover.png"));
    let layout = template.render(&Agent::default(), &vars).unwrap();
    let cover = layout.find_container("cover").unwrap();
    match &cover.children()[0] {
        LayoutNode::Image { src, .. } => {
            assert_eq!(src, "https://cdn.example.com/v2?url=https%3A%2F%2Fexample.com%2Fcover.png")
        }
        other => panic!("unexpected node {:?}", other),
    }
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_render_calls_validate() {
    use forgecards_core::render::{get_validation_call_count, reset_validation_call_count};

    reset_validation_call_count();
    let template = PostTemplate::new();
    let _ = template.render(&Agent::default(), &default_variables());
    let _ = template.render(&Agent::default(), &json!({}));
    assert!(get_validation_call_count() >= 2);
}
