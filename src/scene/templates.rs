//! Read-only catalog of preset flyers.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::scene::model::{FlyerContent, FlyerDesign};

/// A preset bundle of content, design and an optional remote background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    pub thumbnail_url: String,
    pub flyer_content: FlyerContent,
    pub flyer_design: FlyerDesign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
}

static CATALOG: LazyLock<Vec<Template>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("templates.json")).unwrap_or_else(|e| {
        tracing::error!(error = %e, "embedded template catalog failed to parse");
        Vec::new()
    })
});

/// All templates, in gallery order.
pub fn catalog() -> &'static [Template] {
    &CATALOG
}

/// Case-insensitive lookup by display name.
pub fn find(name: &str) -> Option<&'static Template> {
    let name = name.trim();
    catalog().iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/templates.rs"]
mod tests;
