//! Signature evaluation.
//!
//! Every check is a read-only lookup on the snapshot. Missing canvases or
//! contexts degrade to "no match"; nothing here can fail.

use crate::signature::model::Signature;
use crate::snapshot::model::DocumentSnapshot;

/// Evaluates one signature against a snapshot.
///
/// Patterns within a signature are OR-ed: any one hit satisfies it.
pub fn matches(signature: &Signature, snapshot: &DocumentSnapshot) -> bool {
    match signature {
        Signature::DomPattern { patterns } => patterns.iter().any(|p| dom_hit(snapshot, p)),

        Signature::ScriptPattern { patterns } => {
            patterns.iter().any(|p| snapshot.scripts_contain(p))
        }

        Signature::CanvasPattern { patterns } if patterns.is_empty() => {
            !snapshot.canvases().is_empty()
        }
        Signature::CanvasPattern { patterns } => snapshot.canvases().iter().any(|c| {
            patterns.iter().any(|p| {
                c.id.as_deref().is_some_and(|id| id.contains(p.as_str()))
                    || c.classes.iter().any(|class| class.contains(p.as_str()))
            })
        }),

        Signature::CanvasSize { width, height } => snapshot
            .canvases()
            .iter()
            .any(|c| c.width == *width && c.height == *height),

        Signature::HtmlSubstring { patterns } => {
            let html = snapshot.html();
            patterns.iter().any(|p| html.contains(p.as_str()))
        }

        // Shader sources are not inspected; an obtainable context is enough.
        Signature::WebGlProbe { require_context } => {
            let canvases = snapshot.canvases();
            if *require_context {
                canvases.iter().any(|c| c.webgl_context().is_some())
            } else {
                !canvases.is_empty()
            }
        }
    }
}

fn dom_hit(snapshot: &DocumentSnapshot, pattern: &str) -> bool {
    snapshot.has_class(pattern)
        || snapshot.has_id(pattern)
        || snapshot.has_attribute(&format!("data-{pattern}"))
}
