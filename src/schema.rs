//! Schema Definition - The Variables Contract
//!
//! Declares the six accepted fields with defaults and editor metadata.
//! Built once, never mutated. Exported as a JSON document for the
//! variables-editing UI.

use std::sync::OnceLock;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::assets::BundledAsset;
use crate::i18n::{Locale, SUPPORTED_LOCALES};

pub const TEMPLATE_ID: &str = "post";
pub const TEMPLATE_VERSION: &str = "1.0.0";

pub const DEFAULT_CONTENT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Diam phasellus vestibulum lorem sed. Scelerisque fermentum dui faucibus in ornare quam viverra. Consectetur libero id faucibus nisl tincidunt eget nullam non nisi. Ornare arcu dui vivamus arcu felis bibendum ut tristique. Dui nunc mattis enim ut tellus. Est pellentesque elit ullamcorper dignissim cras. Consequat semper viverra nam libero. Velit euismod in pellentesque massa.";
pub const DEFAULT_DATE: &str = "2005-12-24T04:00:00.000Z";
pub const DEFAULT_TITLE: &str = "Created with React.js, TailwindCSS & Flayyer";
pub const DEFAULT_VIEWS: &str = "300";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    String,
    DateTime,
    Image,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub optional: bool,
    pub title: &'static str,
    pub description: &'static str,
    pub default: String,
    pub examples: Vec<String>,
}

impl FieldSchema {
    fn new(name: &'static str, kind: FieldKind, default: impl Into<String>) -> Self {
        Self {
            name,
            kind,
            optional: false,
            title: "",
            description: "",
            default: default.into(),
            examples: vec![],
        }
    }

    fn titled(mut self, title: &'static str, description: &'static str) -> Self {
        self.title = title;
        self.description = description;
        self
    }

    fn examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// JSON-Schema-like property description.
    fn property(&self) -> Value {
        let mut prop = json!({
            "type": "string",
            "title": self.title,
            "description": self.description,
            "default": self.default,
        });
        let mut examples = self.examples.clone();
        match self.kind {
            FieldKind::String => {}
            FieldKind::DateTime => {
                prop["format"] = json!("date-time");
                // The only wall-clock read in the crate; rendering never sees it.
                examples.push(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
            }
            FieldKind::Image => {
                prop["format"] = json!("uri-reference");
                prop["contentMediaType"] = json!("image/*");
            }
        }
        // Lists the translation dictionary. Under `LocalePolicy::Fallback`
        // the validator also accepts other codes and renders them in English.
        if self.name == "locale" {
            prop["enum"] = json!(SUPPORTED_LOCALES.iter().map(|l| l.as_str()).collect::<Vec<_>>());
        }
        if !examples.is_empty() {
            prop["examples"] = json!(examples);
        }
        prop
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostSchema {
    pub fields: Vec<FieldSchema>,
}

impl PostSchema {
    fn build() -> Self {
        let fields = vec![
            FieldSchema::new("content", FieldKind::String, DEFAULT_CONTENT)
                .titled("Post content", "The content of the post"),
            FieldSchema::new("date", FieldKind::DateTime, DEFAULT_DATE)
                .titled("Post date", "The date of the post"),
            FieldSchema::new("image", FieldKind::Image, BundledAsset::Background.reference())
                .titled("Post image", "The image to use for the post")
                .examples([BundledAsset::Alternative.reference()]),
            FieldSchema::new("locale", FieldKind::String, Locale::default().as_str())
                .titled("Post locale", "The locale of the post")
                .examples(SUPPORTED_LOCALES.iter().map(|l| l.as_str()))
                .optional(),
            FieldSchema::new("title", FieldKind::String, DEFAULT_TITLE)
                .titled("Post title", "The title of the post")
                .examples([DEFAULT_TITLE]),
            FieldSchema::new("views", FieldKind::String, DEFAULT_VIEWS)
                .titled("Post views", "The number of views for the post")
                .examples(["300", "100"]),
        ];
        Self { fields }
    }

    pub fn required(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| !f.optional)
    }

    /// Document consumed by the external variables editor.
    pub fn document(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.property()))
            .collect();
        let required: Vec<&str> = self.required().map(|f| f.name).collect();
        json!({
            "$id": format!("{}@{}", TEMPLATE_ID, TEMPLATE_VERSION),
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// A candidate variables object made of every field's default.
    pub fn defaults(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), Value::String(f.default.clone())))
            .collect();
        Value::Object(map)
    }
}

/// Process-wide schema accessor.
pub fn post_schema() -> &'static PostSchema {
    static SCHEMA: OnceLock<PostSchema> = OnceLock::new();
    SCHEMA.get_or_init(PostSchema::build)
}

pub fn schema_document() -> Value {
    post_schema().document()
}

pub fn default_variables() -> Value {
    post_schema().defaults()
}
