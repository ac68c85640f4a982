//! Site logo detection and replacement.

use restyle_config::SiteConfig;
use restyle_protocols::{Document, DomError, NodeId};
use tracing::debug;

/// Elements that may be the logo, queried in document order.
pub const LOGO_CANDIDATES: &str =
    r#"header svg, .AppHeader-inner svg, a[href="/"] svg, svg[class*="logo"], svg[class^="css-"]"#;

/// Class of the replacement image.
pub const LOGO_CLASS: &str = "theme-image index-module_logo_tHEfk";

/// One way of recognising the logo among the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoRule {
    /// `viewBox` equals one of the known logo boxes.
    ViewBox(&'static [&'static str]),
    /// `class` contains the marker.
    ClassContains(&'static str),
    /// `class` starts with the prefix.
    ClassPrefix(&'static str),
    /// Inside a link to the site root.
    UnderRootLink,
}

/// Rules in priority order.
pub const LOGO_RULES: &[LogoRule] = &[
    LogoRule::ViewBox(&["0 0 84 32", "0 0 64 30"]),
    LogoRule::ClassContains("logo"),
    LogoRule::ClassPrefix("css-"),
    LogoRule::UnderRootLink,
];

impl LogoRule {
    pub async fn matches(&self, doc: &dyn Document, node: NodeId) -> Result<bool, DomError> {
        Ok(match self {
            LogoRule::ViewBox(boxes) => doc
                .attribute(node, "viewBox")
                .await?
                .is_some_and(|v| boxes.contains(&v.as_str())),
            LogoRule::ClassContains(marker) => doc
                .attribute(node, "class")
                .await?
                .is_some_and(|c| c.contains(marker)),
            LogoRule::ClassPrefix(prefix) => doc
                .attribute(node, "class")
                .await?
                .is_some_and(|c| c.starts_with(prefix)),
            LogoRule::UnderRootLink => doc.closest(node, r#"a[href="/"]"#).await?.is_some(),
        })
    }
}

/// Locate the logo: the first rule in [`LOGO_RULES`] that any candidate
/// satisfies decides, and among its matches the earliest in document
/// order wins. Only `<svg>` candidates count.
pub async fn find_logo(doc: &dyn Document) -> Result<Option<NodeId>, DomError> {
    let mut candidates = Vec::new();
    for node in doc.query_all(LOGO_CANDIDATES).await? {
        if doc.tag_name(node).await? == "svg" {
            candidates.push(node);
        }
    }

    for rule in LOGO_RULES {
        for &node in &candidates {
            if rule.matches(doc, node).await? {
                debug!(?rule, %node, "Logo matched");
                return Ok(Some(node));
            }
        }
    }
    Ok(None)
}

/// Replace `logo` with the configured image unless its parent already
/// holds one. Returns whether a replacement happened.
pub async fn replace_logo(
    doc: &dyn Document,
    logo: NodeId,
    site: &SiteConfig,
) -> Result<bool, DomError> {
    let Some(parent) = doc.parent(logo).await? else {
        return Ok(false);
    };

    let existing = format!(r#"img[alt="{}"]"#, site.logo_alt);
    if !doc.query_within(parent, &existing).await?.is_empty() {
        return Ok(false);
    }

    let img = doc.create_element("img").await?;
    doc.set_attribute(img, "src", &site.logo_url).await?;
    doc.set_attribute(img, "alt", &site.logo_alt).await?;
    doc.set_attribute(img, "class", LOGO_CLASS).await?;
    doc.set_style_property(img, "height", "28px").await?;
    doc.replace_child(parent, img, logo).await?;
    Ok(true)
}

#[cfg(test)]
#[path = "logo_tests.rs"]
mod tests;
