//! Report-wide export.
//!
//! [`export_report`] runs the [`ThemeProjector`] over every visual of a
//! report and renders the two output documents of each visual as indented
//! JSON. It does no I/O; [`write_artifacts`] puts the results on disk.
//!
//! ```
//! use pbip_theme::{export_report, ExportOptions, Report};
//! use serde_json::json;
//!
//! let config = json!({"singleVisual": {
//!     "visualType": "card",
//!     "objects": {"background": [{"properties": {
//!         "color": {"expr": {"Literal": {"Value": "'#FFFFFF'"}}}
//!     }}]}
//! }});
//! let report: Report = serde_json::from_value(json!({
//!     "sections": [{"displayName": "Main", "visualContainers": [
//!         {"config": config.to_string()}
//!     ]}]
//! })).unwrap();
//!
//! let summary = export_report(&report, &ExportOptions::default()).unwrap();
//! assert_eq!(summary.artifacts.len(), 1);
//! assert_eq!(summary.artifacts[0].names.theme, "theme_Main_0_card.json");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Result, ThemeError};
use crate::naming::OutputNames;
use crate::projector::ThemeProjector;
use crate::report::{Report, SkippedVisual, VisualEntry, VisualOutcome};

/// Options for [`export_report`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Visual type to assume when a visual declares none.
    ///
    /// When `None`, untyped visuals are skipped.
    pub unknown_visual_type: Option<String>,
    /// Projector used for every visual.
    pub projector: ThemeProjector,
}

impl ExportOptions {
    /// Keep untyped visuals under `name`.
    pub fn unknown_visual_type(mut self, name: impl Into<String>) -> Self {
        self.unknown_visual_type = Some(name.into());
        self
    }

    /// Use a custom projector.
    pub fn projector(mut self, projector: ThemeProjector) -> Self {
        self.projector = projector;
        self
    }
}

/// The rendered outputs for one visual.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub page_name: String,
    pub container_index: usize,
    pub visual_type: String,
    pub names: OutputNames,
    /// Pretty-printed raw object set.
    pub raw_json: String,
    /// Pretty-printed theme document.
    pub theme_json: String,
}

/// Everything produced from one report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    pub artifacts: Vec<ExportArtifact>,
    pub skipped: Vec<SkippedVisual>,
}

/// Project and render every visual in `report`.
///
/// Containers that cannot be exported are recorded in
/// [`ExportSummary::skipped`]; they never abort the export.
pub fn export_report(report: &Report, options: &ExportOptions) -> Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    for outcome in report.visuals(options.unknown_visual_type.as_deref()) {
        match outcome {
            VisualOutcome::Visual(entry) => {
                summary.artifacts.push(render(&options.projector, entry)?);
            }
            VisualOutcome::Skipped(skipped) => {
                debug!(
                    "skipping {} container {}: {}",
                    skipped.page_name, skipped.container_index, skipped.reason
                );
                summary.skipped.push(skipped);
            }
        }
    }

    Ok(summary)
}

fn render(projector: &ThemeProjector, entry: VisualEntry) -> Result<ExportArtifact> {
    let projection = projector.project(&entry.visual_type, &entry.objects);
    let raw_json =
        serde_json::to_string_pretty(&projection.raw_objects).map_err(ThemeError::Serialize)?;
    let theme_json =
        serde_json::to_string_pretty(&projection.theme).map_err(ThemeError::Serialize)?;

    let names = OutputNames::for_visual(&entry.page_name, entry.container_index, &entry.visual_type);

    Ok(ExportArtifact {
        names,
        page_name: entry.page_name,
        container_index: entry.container_index,
        visual_type: entry.visual_type,
        raw_json,
        theme_json,
    })
}

/// Write each artifact's two files into `dir`, creating it if needed.
///
/// Returns the written paths, config file before theme file for each artifact.
pub fn write_artifacts(
    dir: impl AsRef<Path>,
    artifacts: &[ExportArtifact],
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| ThemeError::io(dir, e))?;

    let mut written = Vec::with_capacity(artifacts.len() * 2);
    for artifact in artifacts {
        for (name, content) in [
            (&artifact.names.config, &artifact.raw_json),
            (&artifact.names.theme, &artifact.theme_json),
        ] {
            let path = dir.join(name);
            fs::write(&path, content).map_err(|e| ThemeError::io(&path, e))?;
            info!("wrote {}", path.display());
            written.push(path);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueCoercer;
    use serde_json::{json, Value};

    fn report_with(configs: Vec<Value>) -> Report {
        let containers: Vec<Value> = configs
            .into_iter()
            .map(|c| json!({"config": c.to_string()}))
            .collect();
        serde_json::from_value(json!({
            "sections": [{"displayName": "Page One", "visualContainers": containers}]
        }))
        .unwrap()
    }

    fn card(objects: Value) -> Value {
        json!({"singleVisual": {"visualType": "card", "objects": objects}})
    }

    #[test]
    fn export_renders_both_documents() {
        let objects = json!({"title": [{"properties": {
            "show": {"expr": {"Literal": {"Value": "true"}}}
        }}]});
        let report = report_with(vec![card(objects.clone())]);

        let summary = export_report(&report, &ExportOptions::default()).unwrap();
        let artifact = &summary.artifacts[0];

        let raw: Value = serde_json::from_str(&artifact.raw_json).unwrap();
        assert_eq!(raw, objects);

        let theme: Value = serde_json::from_str(&artifact.theme_json).unwrap();
        assert_eq!(
            theme,
            json!({"visualStyles": {"card": {"*": {"title": [{"show": true}]}}}})
        );
    }

    #[test]
    fn export_output_is_indented() {
        let report = report_with(vec![card(json!({"title": [{}]}))]);
        let summary = export_report(&report, &ExportOptions::default()).unwrap();
        assert!(summary.artifacts[0].theme_json.contains("\n  \"visualStyles\""));
    }

    #[test]
    fn export_records_skips_without_failing() {
        let report = report_with(vec![
            json!({"singleVisual": {"visualType": "card"}}),
            card(json!({"title": [{}]})),
        ]);
        let summary = export_report(&report, &ExportOptions::default()).unwrap();
        assert_eq!(summary.artifacts.len(), 1);
        assert_eq!(summary.artifacts[0].container_index, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].container_index, 0);
    }

    #[test]
    fn export_uses_configured_projector() {
        let objects = json!({"labels": [{"properties": {
            "fontSize": {"expr": {"Literal": {"Value": "9D"}}}
        }}]});
        let report = report_with(vec![card(objects)]);
        let options =
            ExportOptions::default().projector(ThemeProjector::new(ValueCoercer::empty()));

        let summary = export_report(&report, &options).unwrap();
        let theme: Value = serde_json::from_str(&summary.artifacts[0].theme_json).unwrap();
        assert_eq!(theme["visualStyles"]["card"]["*"]["labels"][0]["fontSize"], "9D");
    }

    #[test]
    fn artifact_names_follow_page_and_type() {
        let report = report_with(vec![card(json!({"title": [{}]}))]);
        let summary = export_report(&report, &ExportOptions::default()).unwrap();
        assert_eq!(summary.artifacts[0].names.config, "config_Page_One_0_card.json");
    }
}
