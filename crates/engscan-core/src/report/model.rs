use serde::Serialize;

use crate::SCHEMA_VERSION;
use crate::profiles::score::{Confidence, SignatureOutcome};

/// Top-level engscan report.
///
/// Stable JSON contract; identical snapshot bytes produce an identical
/// report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub artifact: ArtifactInfo,
    pub analysis: AnalysisInfo,
    pub detection: Option<ClassificationResult>,
    pub candidates: Vec<CandidateScore>,
    pub exit_code: i32,
}

impl Report {
    /// Assemble a report from pipeline outputs.
    ///
    /// Exit code mapping:
    /// - engine detected    → 0
    /// - no engine detected → 1
    /// - snapshot unreadable → 3
    pub fn new(
        tool: ToolInfo,
        artifact: ArtifactInfo,
        analysis: AnalysisInfo,
        classification: Classification,
    ) -> Self {
        let exit_code = if analysis.status == AnalysisInfo::PARSE_ERROR {
            3
        } else if classification.result.is_some() {
            0
        } else {
            1
        };

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            artifact,
            analysis,
            detection: classification.result,
            candidates: classification.candidates,
            exit_code,
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub commit: Option<String>,
}

/// Snapshot capture bound to this report.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: ArtifactHash,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactHash {
    pub algorithm: String,
    pub value: String,
}

/// Snapshot loading status.
#[derive(Debug, Clone, Serialize, Default)]
pub struct AnalysisInfo {
    pub status: String,
    pub warnings: Vec<String>,
}

impl AnalysisInfo {
    pub const OK: &'static str = "ok";
    pub const PARSE_ERROR: &'static str = "parse_error";

    pub fn ok() -> Self {
        Self {
            status: Self::OK.into(),
            warnings: vec![],
        }
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self {
            status: Self::PARSE_ERROR.into(),
            warnings: vec![msg.into()],
        }
    }
}

/// The identification handed back to callers of the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub name: String,
    pub confidence: Confidence,
    pub features: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Score of one registered profile, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub name: String,
    pub label: String,
    pub matched: u32,
    pub total: u32,
    pub confidence: Confidence,
    pub signatures: Vec<SignatureOutcome>,
}

/// Classifier output including every candidate's score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub result: Option<ClassificationResult>,
    pub candidates: Vec<CandidateScore>,
}
