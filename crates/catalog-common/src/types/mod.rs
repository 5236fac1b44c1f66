//! Work record types shared across the catalog tooling
//!
//! A work record arrives as one line of NDJSON. Only its `annotations` array
//! is interpreted; everything else is carried as the raw JSON text so it can
//! be written back out exactly as it was read.

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// Property name of the annotation carrying a work's identifier link.
pub const IDENTIFIER_PROPERTY: &str = "identifier";

/// Property name of the annotation carrying a work's locator link.
pub const LOCATOR_PROPERTY: &str = "locator";

/// One typed fact about a work, distinguished by its `propertyName`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator_link: Option<String>,
}

impl Annotation {
    /// Annotation for `propertyName: "identifier"`
    pub fn identifier(link: impl Into<String>) -> Self {
        Self {
            property_name: Some(IDENTIFIER_PROPERTY.to_string()),
            identifier_link: Some(link.into()),
            locator_link: None,
        }
    }

    /// Annotation for `propertyName: "locator"`
    pub fn locator(link: impl Into<String>) -> Self {
        Self {
            property_name: Some(LOCATOR_PROPERTY.to_string()),
            identifier_link: None,
            locator_link: Some(link.into()),
        }
    }

    /// Read the fields we care about from a JSON value.
    ///
    /// Fields that are missing or not strings are treated as absent.
    /// Returns `None` when the value is not a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            property_name: text("propertyName"),
            identifier_link: text("identifierLink"),
            locator_link: text("locatorLink"),
        })
    }
}

/// Return the first annotation whose `propertyName` matches.
pub fn find_annotation_by_property<'a>(
    property_name: &str,
    annotations: &'a [Annotation],
) -> Option<&'a Annotation> {
    annotations
        .iter()
        .find(|a| a.property_name.as_deref() == Some(property_name))
}

/// Identifier link of the first `identifier` annotation.
///
/// A matching annotation without an `identifierLink` yields `None` as well.
pub fn identifier_link_of(annotations: &[Annotation]) -> Option<&str> {
    find_annotation_by_property(IDENTIFIER_PROPERTY, annotations)?
        .identifier_link
        .as_deref()
}

/// Locator link of the first `locator` annotation.
pub fn locator_link_of(annotations: &[Annotation]) -> Option<&str> {
    find_annotation_by_property(LOCATOR_PROPERTY, annotations)?
        .locator_link
        .as_deref()
}

/// A decoded work record: parsed annotations plus the untouched JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRecord {
    annotations: Option<Vec<Annotation>>,
    raw: String,
}

impl WorkRecord {
    /// Decode one NDJSON line.
    ///
    /// Fails only when the text is not valid JSON. A document that is not an
    /// object, or has no `annotations` array, decodes to a record without
    /// annotations.
    pub fn from_json(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let value: Value = serde_json::from_str(&raw)?;

        let annotations = value
            .get("annotations")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Annotation::from_value).collect());

        Ok(Self { annotations, raw })
    }

    /// Annotations in document order; empty when the record has none.
    pub fn annotations(&self) -> &[Annotation] {
        self.annotations.as_deref().unwrap_or_default()
    }

    /// Whether the record carried an `annotations` array at all
    pub fn has_annotations(&self) -> bool {
        self.annotations.is_some()
    }

    pub fn identifier_link(&self) -> Option<&str> {
        identifier_link_of(self.annotations())
    }

    pub fn locator_link(&self) -> Option<&str> {
        locator_link_of(self.annotations())
    }

    /// The JSON text exactly as it was read
    pub fn raw(&self) -> &str {
        &self.raw
    }
}
