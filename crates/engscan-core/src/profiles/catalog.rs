//! Engine profiles and the registry that holds them.
//!
//! Registration order is the classifier's tie-break key: when two profiles
//! score the same, the one registered first wins. More specific profiles
//! must therefore be registered before more general ones.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::capability::{CapabilityProber, ProbeError};
use crate::profiles::builtin;
use crate::signature::Signature;
use crate::snapshot::model::DocumentSnapshot;

/// Failure of a profile's deep analysis. Recovered by the classifier.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("deep analysis failed: {0}")]
    Check(String),
}

/// Profile-specific checks run against the winning candidate only.
///
/// Implementations must be read-only and idempotent, and must return no
/// capability warnings when no rendering context is available.
pub trait DeepAnalysis: Send + Sync {
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError>;
}

impl<F> DeepAnalysis for F
where
    F: Fn(&DocumentSnapshot, &dyn CapabilityProber) -> Result<Vec<String>, AnalysisError>
        + Send
        + Sync,
{
    fn analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        self(snapshot, prober)
    }
}

/// Deep analysis that never warns.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeepAnalysis;

impl DeepAnalysis for NoDeepAnalysis {
    fn analyze(
        &self,
        _snapshot: &DocumentSnapshot,
        _prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        Ok(Vec::new())
    }
}

/// A feature label reported when its signature matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRule {
    pub label: String,
    pub signature: Signature,
}

/// One candidate engine/template identity.
pub struct EngineProfile {
    pub name: String,
    pub label: String,
    pub signatures: Vec<Signature>,
    pub recommendations: Vec<String>,
    pub features: Vec<FeatureRule>,
    deep_analysis: Box<dyn DeepAnalysis>,
}

impl EngineProfile {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            signatures: Vec::new(),
            recommendations: Vec::new(),
            features: Vec::new(),
            deep_analysis: Box::new(NoDeepAnalysis),
        }
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signatures.push(signature);
        self
    }

    pub fn recommend(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendations.push(recommendation.into());
        self
    }

    pub fn feature(mut self, label: impl Into<String>, signature: Signature) -> Self {
        self.features.push(FeatureRule {
            label: label.into(),
            signature,
        });
        self
    }

    pub fn deep_analysis(mut self, analysis: impl DeepAnalysis + 'static) -> Self {
        self.deep_analysis = Box::new(analysis);
        self
    }

    pub fn deep_analyze(
        &self,
        snapshot: &DocumentSnapshot,
        prober: &dyn CapabilityProber,
    ) -> Result<Vec<String>, AnalysisError> {
        self.deep_analysis.analyze(snapshot, prober)
    }
}

impl fmt::Debug for EngineProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineProfile")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("signatures", &self.signatures)
            .field("recommendations", &self.recommendations)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

/// Configuration errors detected while building a registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("profile registry is empty")]
    Empty,

    #[error("profile `{name}` has no signatures")]
    NoSignatures { name: String },

    #[error("profile `{name}` has no recommendations")]
    NoRecommendations { name: String },

    #[error("duplicate profile name `{name}`")]
    DuplicateName { name: String },
}

/// Ordered, read-only set of engine profiles.
///
/// Validated once at construction; shared across classification calls.
#[derive(Debug)]
pub struct ProfileRegistry {
    profiles: Vec<EngineProfile>,
}

impl ProfileRegistry {
    /// Builds a registry, rejecting profiles that could not be scored.
    pub fn with_profiles(profiles: Vec<EngineProfile>) -> Result<Self, RegistryError> {
        if profiles.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = BTreeSet::new();
        for profile in &profiles {
            if profile.signatures.is_empty() {
                return Err(RegistryError::NoSignatures {
                    name: profile.name.clone(),
                });
            }
            if profile.recommendations.is_empty() {
                return Err(RegistryError::NoRecommendations {
                    name: profile.name.clone(),
                });
            }
            if !seen.insert(profile.name.as_str()) {
                return Err(RegistryError::DuplicateName {
                    name: profile.name.clone(),
                });
            }
        }

        Ok(Self { profiles })
    }

    /// The built-in engine catalog.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::with_profiles(builtin::profiles())
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngineProfile> {
        self.profiles.iter()
    }

    pub fn get(&self, name: &str) -> Option<&EngineProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
