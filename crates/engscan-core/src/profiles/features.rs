//! Feature detection for the winning profile.
//!
//! Features are descriptive only; they never influence scoring. The
//! profile's own feature rules come first, followed by platform features
//! common to every bundle.

use crate::profiles::catalog::EngineProfile;
use crate::signature::matches;
use crate::snapshot::model::DocumentSnapshot;
use crate::util::deterministic::dedup_stable;

/// Platform features recognised by API usage in scripts or markup.
const TEXT_FEATURES: &[(&str, &[&str])] = &[
    ("webassembly", &["WebAssembly", ".wasm"]),
    ("service-worker", &["serviceWorker"]),
    ("web-audio", &["AudioContext"]),
    ("fullscreen", &["requestFullscreen"]),
    ("gamepad", &["getGamepads"]),
    ("pointer-lock", &["requestPointerLock"]),
    ("high-dpi", &["devicePixelRatio"]),
    (
        "offscreen-canvas",
        &["OffscreenCanvas", "transferControlToOffscreen"],
    ),
];

pub fn detect(profile: &EngineProfile, snapshot: &DocumentSnapshot) -> Vec<String> {
    let mut features: Vec<String> = profile
        .features
        .iter()
        .filter(|rule| matches(&rule.signature, snapshot))
        .map(|rule| rule.label.clone())
        .collect();

    features.extend(common_features(snapshot));
    dedup_stable(&mut features);
    features
}

fn common_features(snapshot: &DocumentSnapshot) -> Vec<String> {
    let mut out = Vec::new();
    let canvases = snapshot.canvases();

    if !canvases.is_empty() {
        out.push("canvas".to_string());
    }
    // A lost context cannot say which tier the page would have rendered with.
    if let Some(ctx) = snapshot.first_context().filter(|c| !c.is_context_lost()) {
        out.push(ctx.version().as_str().to_string());
    }

    let mentions =
        |needle: &str| snapshot.scripts_contain(needle) || snapshot.html().contains(needle);

    for (label, needles) in TEXT_FEATURES {
        if needles.iter().any(|n| mentions(n)) {
            out.push((*label).to_string());
        }
    }

    if mentions("touchstart") || canvases.iter().any(|c| c.style.touch_action_none) {
        out.push("touch-input".to_string());
    }
    if canvases.iter().any(|c| c.style.pixelated) {
        out.push("pixel-art-rendering".to_string());
    }

    out
}
