//! Report document model.
//!
//! A PBIP report definition (`<project>.Report/report.json`) lists pages as
//! `sections`, each holding `visualContainers`. A container's `config` is a
//! JSON document encoded as a *string*; it carries the visual's type and its
//! object set under `singleVisual`.
//!
//! Only the fields needed for theme extraction are modeled. Everything else in
//! the document is ignored.
//!
//! Iterating a report with [`Report::visuals`] yields one [`VisualOutcome`]
//! per container: either a [`VisualEntry`] ready for projection, or a
//! [`SkippedVisual`] saying why the container was passed over.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{Result, ThemeError};

/// Prefix for pages with no display name; the section index is appended.
pub const UNNAMED_PAGE_PREFIX: &str = "Page_";

/// Deserialize `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A parsed report definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Report {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

/// One report page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visual_containers: Vec<VisualContainer>,
}

/// One visual on a page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisualContainer {
    /// String-encoded visual configuration.
    #[serde(default)]
    pub config: Option<Value>,
}

/// Decoded `config` of a visual container.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualConfig {
    #[serde(default)]
    pub single_visual: Option<SingleVisual>,
}

/// The `singleVisual` block of a visual configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleVisual {
    #[serde(default)]
    pub visual_type: Option<Value>,
    #[serde(default)]
    pub objects: Option<Value>,
}

/// Result of decoding a container's `config` string.
#[derive(Debug, Clone)]
pub enum ConfigOutcome {
    Decoded(VisualConfig),
    /// Absent, `null`, not a string, or empty.
    Missing,
    /// The string is not a valid configuration document.
    Malformed(String),
}

impl Report {
    /// Parse a report from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(ThemeError::Report)
    }

    /// Read and parse a report file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
        Self::from_json(&text)
    }

    /// Walk every visual container of every page, in document order.
    ///
    /// `fallback_type` names visuals whose configuration has no visual type;
    /// when `None`, such visuals are skipped.
    pub fn visuals<'a>(
        &'a self,
        fallback_type: Option<&'a str>,
    ) -> impl Iterator<Item = VisualOutcome> + 'a {
        self.sections
            .iter()
            .enumerate()
            .flat_map(move |(page_index, section)| {
                let page_name = section.page_name(page_index);
                section
                    .visual_containers
                    .iter()
                    .enumerate()
                    .map(move |(container_index, container)| {
                        let position = Position {
                            page_index,
                            page_name: page_name.clone(),
                            container_index,
                        };
                        container.resolve(position, fallback_type)
                    })
            })
    }
}

impl Section {
    /// The display name, or `Page_<index>` when it is absent.
    pub fn page_name(&self, index: usize) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => format!("{UNNAMED_PAGE_PREFIX}{index}"),
        }
    }
}

impl VisualContainer {
    /// Decode the inner configuration string.
    pub fn decode_config(&self) -> ConfigOutcome {
        let text = match &self.config {
            Some(Value::String(text)) if !text.is_empty() => text,
            _ => return ConfigOutcome::Missing,
        };
        match serde_json::from_str(text) {
            Ok(config) => ConfigOutcome::Decoded(config),
            Err(e) => ConfigOutcome::Malformed(e.to_string()),
        }
    }

    fn resolve(&self, position: Position, fallback_type: Option<&str>) -> VisualOutcome {
        let config = match self.decode_config() {
            ConfigOutcome::Decoded(config) => config,
            ConfigOutcome::Missing => return position.skip(SkipReason::MissingConfig),
            ConfigOutcome::Malformed(msg) => {
                return position.skip(SkipReason::MalformedConfig(msg))
            }
        };

        let Some(visual) = config.single_visual else {
            return position.skip(SkipReason::MissingSingleVisual);
        };

        let visual_type = match (&visual.visual_type, fallback_type) {
            (Some(Value::String(name)), _) => name.clone(),
            (_, Some(fallback)) => fallback.to_string(),
            (_, None) => return position.skip(SkipReason::MissingVisualType),
        };

        let objects = match visual.objects {
            Some(Value::Object(objects)) if !objects.is_empty() => objects,
            _ => return position.skip(SkipReason::MissingObjects),
        };

        VisualOutcome::Visual(VisualEntry {
            page_index: position.page_index,
            page_name: position.page_name,
            container_index: position.container_index,
            visual_type,
            objects,
        })
    }
}

/// Where a container sits in the report.
#[derive(Debug, Clone)]
struct Position {
    page_index: usize,
    page_name: String,
    container_index: usize,
}

impl Position {
    fn skip(self, reason: SkipReason) -> VisualOutcome {
        VisualOutcome::Skipped(SkippedVisual {
            page_index: self.page_index,
            page_name: self.page_name,
            container_index: self.container_index,
            reason,
        })
    }
}

/// A visual ready for projection.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualEntry {
    pub page_index: usize,
    pub page_name: String,
    /// Position within the page, counting skipped containers.
    pub container_index: usize,
    pub visual_type: String,
    pub objects: Map<String, Value>,
}

/// A container that produced no visual, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedVisual {
    pub page_index: usize,
    pub page_name: String,
    pub container_index: usize,
    pub reason: SkipReason,
}

/// Why a container was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingConfig,
    MalformedConfig(String),
    MissingSingleVisual,
    MissingVisualType,
    /// Absent, `null`, not an object, or empty.
    MissingObjects,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingConfig => write!(f, "no config"),
            SkipReason::MalformedConfig(msg) => write!(f, "malformed config: {}", msg),
            SkipReason::MissingSingleVisual => write!(f, "no singleVisual"),
            SkipReason::MissingVisualType => write!(f, "no visualType"),
            SkipReason::MissingObjects => write!(f, "no objects"),
        }
    }
}

/// One step of [`Report::visuals`].
#[derive(Debug, Clone, PartialEq)]
pub enum VisualOutcome {
    Visual(VisualEntry),
    Skipped(SkippedVisual),
}
