//! Confidence scoring.
//!
//! A profile's confidence is the fraction of its signatures that match:
//! every signature weighs the same, regardless of kind. The fraction is
//! kept exact so comparisons (and therefore tie-breaks) never depend on
//! floating-point rounding.

use std::cmp::Ordering;

use serde::{Serialize, Serializer};
use tracing::trace;

use crate::profiles::catalog::EngineProfile;
use crate::signature::matches;
use crate::snapshot::model::DocumentSnapshot;

/// Exact rational confidence `matched / total` in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct Confidence {
    matched: u32,
    total: u32,
}

impl Confidence {
    pub const ZERO: Confidence = Confidence {
        matched: 0,
        total: 1,
    };

    /// `matched` is clamped to `total`; a zero `total` yields [`Confidence::ZERO`].
    pub fn new(matched: u32, total: u32) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        Self {
            matched: matched.min(total),
            total,
        }
    }

    pub fn matched(&self) -> u32 {
        self.matched
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_zero(&self) -> bool {
        self.matched == 0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.matched) / f64::from(self.total)
    }
}

impl Ord for Confidence {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u64::from(self.matched) * u64::from(other.total);
        let rhs = u64::from(other.matched) * u64::from(self.total);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Confidence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Confidence {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Confidence {}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Match outcome of a single signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureOutcome {
    pub signature: String,
    pub matched: bool,
}

/// Scores a profile against a snapshot.
pub fn score(profile: &EngineProfile, snapshot: &DocumentSnapshot) -> Confidence {
    let matched = profile
        .signatures
        .iter()
        .filter(|s| matches(s, snapshot))
        .count();

    Confidence::new(count_u32(matched), count_u32(profile.signatures.len()))
}

/// Scores a profile and keeps each signature's outcome, in registration order.
pub fn score_breakdown(
    profile: &EngineProfile,
    snapshot: &DocumentSnapshot,
) -> (Confidence, Vec<SignatureOutcome>) {
    let outcomes: Vec<SignatureOutcome> = profile
        .signatures
        .iter()
        .map(|s| {
            let signature = s.describe();
            let matched = matches(s, snapshot);
            trace!(profile = %profile.name, %signature, matched, "signature evaluated");
            SignatureOutcome { signature, matched }
        })
        .collect();

    let matched = outcomes.iter().filter(|o| o.matched).count();
    let confidence = Confidence::new(count_u32(matched), count_u32(outcomes.len()));

    (confidence, outcomes)
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;
    use crate::snapshot::model::{CanvasElement, ScriptElement};

    fn snapshot() -> DocumentSnapshot {
        DocumentSnapshot::new(
            "<html></html>",
            vec![ScriptElement {
                text: Some("UnityLoader.instantiate()".into()),
                src: None,
            }],
            vec![],
            vec![CanvasElement::new(512, 512).with_id("unity-canvas")],
        )
    }

    #[test]
    fn equal_fractions_compare_equal() {
        assert_eq!(Confidence::new(1, 2), Confidence::new(3, 6));
        assert!(Confidence::new(2, 3) > Confidence::new(1, 2));
        assert!(Confidence::new(1, 6) > Confidence::ZERO);
        assert_eq!(Confidence::new(0, 4), Confidence::ZERO);
    }

    #[test]
    fn zero_total_is_zero_and_matched_is_clamped() {
        assert!(Confidence::new(3, 0).is_zero());
        assert_eq!(Confidence::new(5, 2).as_f64(), 1.0);
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&Confidence::new(1, 4)).unwrap();
        assert_eq!(json, "0.25");
    }

    #[test]
    fn score_is_match_count_over_total() {
        let profile = EngineProfile::new("p", "P")
            .signature(Signature::script(["UnityLoader"]))
            .signature(Signature::dom(["unity-canvas"]))
            .signature(Signature::webgl())
            .signature(Signature::html(["Made with Unity"]));

        let c = score(&profile, &snapshot());

        assert_eq!(c.matched(), 2);
        assert_eq!(c.total(), 4);
        assert_eq!(c.as_f64(), 0.5);
    }

    #[test]
    fn score_grows_with_each_additional_match() {
        let snap = snapshot();
        let sigs = [
            Signature::script(["UnityLoader"]),
            Signature::canvas_size(512, 512),
            Signature::canvas(["unity"]),
        ];

        // Profiles differ only in how many of the three signatures can match.
        let mut previous = Confidence::ZERO;
        for matching in 0..=sigs.len() {
            let mut profile = EngineProfile::new("p", "P");
            for (i, sig) in sigs.iter().enumerate() {
                profile = if i < matching {
                    profile.signature(sig.clone())
                } else {
                    profile.signature(Signature::script(["NeverPresent"]))
                };
            }
            let c = score(&profile, &snap);
            assert_eq!(c.matched(), matching as u32);
            assert!(c >= previous);
            previous = c;
        }
        assert_eq!(previous.as_f64(), 1.0);
    }

    #[test]
    fn breakdown_agrees_with_score() {
        let profile = EngineProfile::new("p", "P")
            .signature(Signature::script(["UnityLoader"]))
            .signature(Signature::webgl());

        let (c, outcomes) = score_breakdown(&profile, &snapshot());

        assert_eq!(c, score(&profile, &snapshot()));
        assert_eq!(
            outcomes,
            vec![
                SignatureOutcome {
                    signature: "script:UnityLoader".into(),
                    matched: true,
                },
                SignatureOutcome {
                    signature: "webgl:context".into(),
                    matched: false,
                },
            ]
        );
    }
}
