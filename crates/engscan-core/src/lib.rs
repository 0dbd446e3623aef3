pub mod capability;
pub mod profiles;
pub mod report;
pub mod signature;
pub mod snapshot;
pub mod util;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::profiles::{Classifier, ProfileRegistry};
use crate::report::model::{AnalysisInfo, Classification, Report, ToolInfo};
use crate::snapshot::model::DocumentSnapshot;
use crate::snapshot::read::{ArtifactContext, read_artifact};

pub const TOOL_NAME: &str = "engscan";

/// JSON schema version of engscan reports.
/// Bump only when the report shape changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Reads a JSON snapshot capture and classifies it against the built-in
/// profiles.
///
/// Only I/O failures are errors. A capture that is not valid JSON yields a
/// report with a `parse_error` status and no detection.
pub fn inspect(path: &Path, tool: ToolInfo) -> Result<Report> {
    let artifact = read_artifact(path)?;
    let classifier = Classifier::new(Arc::new(ProfileRegistry::builtin()?));

    Ok(inspect_artifact(&classifier, artifact, tool))
}

/// Classifies already-read capture bytes with the given classifier.
pub fn inspect_artifact(
    classifier: &Classifier,
    artifact: ArtifactContext,
    tool: ToolInfo,
) -> Report {
    let (analysis, classification) = match DocumentSnapshot::from_json(&artifact.bytes) {
        Ok(snapshot) => (
            AnalysisInfo::ok(),
            classifier.classify_with_candidates(&snapshot),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "snapshot capture is not valid JSON");
            (
                AnalysisInfo::parse_error(format!("invalid snapshot: {e}")),
                Classification::default(),
            )
        }
    };

    Report::new(tool, artifact.into_artifact(), analysis, classification)
}

/// Classifies an in-memory snapshot against the built-in profiles.
pub fn inspect_snapshot(snapshot: &DocumentSnapshot) -> Result<Classification> {
    let classifier = Classifier::new(Arc::new(ProfileRegistry::builtin()?));
    Ok(classifier.classify_with_candidates(snapshot))
}
