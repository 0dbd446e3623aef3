//! Classification engine.
//!
//! Scores every registered profile against a snapshot and selects the best
//! candidate.
//!
//! Selection policy:
//!
//!   - Profiles are evaluated one at a time, in registration order.
//!   - A candidate replaces the running best only if its confidence is
//!     strictly greater, so the first-registered profile wins every tie.
//!   - A best confidence of zero means "no engine detected".
//!
//! Deep analysis and feature detection run for the selected profile only.
//! A failing deep analysis degrades to an empty warning list; it never
//! fails the classification.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::capability::{CapabilityProber, WebGlProber};
use crate::profiles::catalog::{EngineProfile, ProfileRegistry};
use crate::profiles::features;
use crate::profiles::score::{Confidence, score_breakdown};
use crate::report::model::{CandidateScore, Classification, ClassificationResult};
use crate::snapshot::model::DocumentSnapshot;

/// Classifies snapshots against an injected, read-only registry.
///
/// Cheap to clone and safe to share across threads; each call needs only
/// its own snapshot.
#[derive(Clone)]
pub struct Classifier {
    registry: Arc<ProfileRegistry>,
    prober: Arc<dyn CapabilityProber>,
}

impl Classifier {
    pub fn new(registry: Arc<ProfileRegistry>) -> Self {
        Self::with_prober(registry, Arc::new(WebGlProber))
    }

    pub fn with_prober(registry: Arc<ProfileRegistry>, prober: Arc<dyn CapabilityProber>) -> Self {
        Self { registry, prober }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Best-matching profile, or `None` when nothing scores above zero.
    pub fn classify(&self, snapshot: &DocumentSnapshot) -> Option<ClassificationResult> {
        self.classify_with_candidates(snapshot).result
    }

    /// Like [`Classifier::classify`], also returning every profile's score.
    pub fn classify_with_candidates(&self, snapshot: &DocumentSnapshot) -> Classification {
        let mut best_score = Confidence::ZERO;
        let mut best: Option<&EngineProfile> = None;
        let mut candidates = Vec::with_capacity(self.registry.len());

        for profile in self.registry.iter() {
            let (confidence, signatures) = score_breakdown(profile, snapshot);
            debug!(
                profile = %profile.name,
                matched = confidence.matched(),
                total = confidence.total(),
                "profile scored"
            );

            if confidence > best_score {
                best_score = confidence;
                best = Some(profile);
            }

            candidates.push(CandidateScore {
                name: profile.name.clone(),
                label: profile.label.clone(),
                matched: confidence.matched(),
                total: confidence.total(),
                confidence,
                signatures,
            });
        }

        let result = best.map(|profile| {
            info!(profile = %profile.name, confidence = best_score.as_f64(), "engine selected");
            self.assemble(profile, best_score, snapshot)
        });

        Classification { result, candidates }
    }

    fn assemble(
        &self,
        profile: &EngineProfile,
        confidence: Confidence,
        snapshot: &DocumentSnapshot,
    ) -> ClassificationResult {
        let warnings = match profile.deep_analyze(snapshot, self.prober.as_ref()) {
            Ok(warnings) => warnings,
            Err(err) => {
                warn!(profile = %profile.name, error = %err, "deep analysis failed");
                Vec::new()
            }
        };

        ClassificationResult {
            name: profile.name.clone(),
            confidence,
            features: features::detect(profile, snapshot),
            recommendations: profile.recommendations.clone(),
            warnings,
        }
    }
}
