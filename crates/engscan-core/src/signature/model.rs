use serde::{Deserialize, Serialize};

/// One typed, declarative condition checked against a snapshot.
///
/// The set of kinds is closed; matching is exhaustive in
/// [`crate::signature::matcher::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signature {
    /// Element with class `p`, id `p` or attribute `data-p`.
    DomPattern { patterns: Vec<String> },
    /// Substring of any script's inline text or `src`.
    ScriptPattern { patterns: Vec<String> },
    /// Substring of any canvas id or class. No patterns means "a canvas exists".
    CanvasPattern { patterns: Vec<String> },
    /// Some canvas has exactly these dimensions.
    CanvasSize { width: u32, height: u32 },
    /// Substring of the serialized document.
    HtmlSubstring { patterns: Vec<String> },
    /// A canvas exists and, if required, yields a WebGL context.
    WebGlProbe { require_context: bool },
}

impl Signature {
    pub fn dom<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::DomPattern {
            patterns: collect(patterns),
        }
    }

    pub fn script<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ScriptPattern {
            patterns: collect(patterns),
        }
    }

    pub fn canvas<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::CanvasPattern {
            patterns: collect(patterns),
        }
    }

    pub fn canvas_present() -> Self {
        Self::CanvasPattern {
            patterns: Vec::new(),
        }
    }

    pub fn canvas_size(width: u32, height: u32) -> Self {
        Self::CanvasSize { width, height }
    }

    pub fn html<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::HtmlSubstring {
            patterns: collect(patterns),
        }
    }

    pub fn webgl() -> Self {
        Self::WebGlProbe {
            require_context: true,
        }
    }

    /// Short, stable description used in logs and candidate breakdowns.
    pub fn describe(&self) -> String {
        match self {
            Self::DomPattern { patterns } => format!("dom:{}", patterns.join("|")),
            Self::ScriptPattern { patterns } => format!("script:{}", patterns.join("|")),
            Self::CanvasPattern { patterns } if patterns.is_empty() => "canvas:*".to_string(),
            Self::CanvasPattern { patterns } => format!("canvas:{}", patterns.join("|")),
            Self::CanvasSize { width, height } => format!("canvas-size:{width}x{height}"),
            Self::HtmlSubstring { patterns } => format!("html:{}", patterns.join("|")),
            Self::WebGlProbe { require_context } => {
                if *require_context {
                    "webgl:context".to_string()
                } else {
                    "webgl:canvas".to_string()
                }
            }
        }
    }
}

fn collect<I, S>(patterns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    patterns.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_is_stable() {
        assert_eq!(
            Signature::script(["UnityLoader", "createUnityInstance"]).describe(),
            "script:UnityLoader|createUnityInstance"
        );
        assert_eq!(Signature::canvas_present().describe(), "canvas:*");
        let size = Signature::canvas_size(512, 512);
        assert_eq!(size.describe(), "canvas-size:512x512");
        assert_eq!(Signature::webgl().describe(), "webgl:context");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Signature::canvas_size(128, 128)).unwrap();
        assert_eq!(json["type"], "canvas_size");
        assert_eq!(json["width"], 128);

        let back: Signature = serde_json::from_value(json).unwrap();
        assert_eq!(back, Signature::canvas_size(128, 128));
    }
}
