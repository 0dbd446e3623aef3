use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::snapshot::context::{ContextVersion, RenderingContext, StaticContext};
use crate::snapshot::selector::Selector;

/// Read-only view of a document at inspection time.
///
/// Built once per classification request by whoever parsed the markup and
/// never mutated afterwards. Every canvas also appears in the element list
/// (tag `canvas`) so DOM lookups see it.
#[derive(Debug, Clone, Default)]
pub struct DocumentSnapshot {
    html: String,
    scripts: Vec<ScriptElement>,
    elements: Vec<Element>,
    canvases: Vec<CanvasElement>,
}

/// An embedded `<script>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptElement {
    /// Inline script text.
    #[serde(default)]
    pub text: Option<String>,
    /// Source reference (`src` attribute).
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Inline style flags of a canvas that matter to rendering diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasStyle {
    /// `image-rendering: pixelated` or `crisp-edges`.
    #[serde(default)]
    pub pixelated: bool,
    #[serde(default)]
    pub touch_action_none: bool,
    /// Sized to the viewport (`100%`/`100vw`).
    #[serde(default)]
    pub fills_viewport: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CanvasElement {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub style: CanvasStyle,
    pub context: Option<Arc<dyn RenderingContext>>,
}

impl CanvasElement {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_style(mut self, style: CanvasStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_context(mut self, context: Arc<dyn RenderingContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// `getContext` for a specific tier. A canvas holds at most one context,
    /// so asking for the other tier yields `None`.
    pub fn context(&self, version: ContextVersion) -> Option<&dyn RenderingContext> {
        self.context.as_deref().filter(|c| c.version() == version)
    }

    /// Obtains a context preferring WebGL 2 over WebGL 1.
    pub fn webgl_context(&self) -> Option<&dyn RenderingContext> {
        self.context(ContextVersion::WebGl2)
            .or_else(|| self.context(ContextVersion::WebGl))
    }

    fn as_element(&self) -> Element {
        let mut attributes = BTreeMap::new();
        attributes.insert("width".to_string(), self.width.to_string());
        attributes.insert("height".to_string(), self.height.to_string());
        Element {
            tag: "canvas".to_string(),
            id: self.id.clone(),
            classes: self.classes.clone(),
            attributes,
        }
    }
}

impl DocumentSnapshot {
    pub fn new(
        html: impl Into<String>,
        scripts: Vec<ScriptElement>,
        mut elements: Vec<Element>,
        canvases: Vec<CanvasElement>,
    ) -> Self {
        for canvas in &canvases {
            let represented = elements.iter().any(|e| {
                e.tag.eq_ignore_ascii_case("canvas") && canvas.id.is_some() && e.id == canvas.id
            });
            if !represented {
                elements.push(canvas.as_element());
            }
        }

        Self {
            html: html.into(),
            scripts,
            elements,
            canvases,
        }
    }

    /// Full serialized markup of the document root.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn scripts(&self) -> &[ScriptElement] {
        &self.scripts
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn canvases(&self) -> &[CanvasElement] {
        &self.canvases
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.elements.iter().any(|e| e.has_class(class))
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.elements.iter().any(|e| e.id.as_deref() == Some(id))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.attributes.contains_key(name))
    }

    /// Elements matching a compound selector; unsupported selectors match
    /// nothing.
    pub fn select(&self, selector: &str) -> Vec<&Element> {
        match Selector::parse(selector) {
            Some(sel) => self.elements.iter().filter(|e| sel.matches(e)).collect(),
            None => Vec::new(),
        }
    }

    /// Whether any inline script text or `src` contains `needle`.
    pub fn scripts_contain(&self, needle: &str) -> bool {
        self.scripts.iter().any(|s| {
            s.text.as_deref().is_some_and(|t| t.contains(needle))
                || s.src.as_deref().is_some_and(|t| t.contains(needle))
        })
    }

    /// First context obtainable from any canvas, in document order.
    pub fn first_context(&self) -> Option<&dyn RenderingContext> {
        self.canvases.iter().find_map(CanvasElement::webgl_context)
    }
}

/// JSON form of a snapshot, as written by a capture tool.
#[derive(Debug, Default, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub scripts: Vec<ScriptElement>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub canvases: Vec<RawCanvas>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCanvas {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
    #[serde(default)]
    pub style: CanvasStyle,
    #[serde(default)]
    pub context: Option<StaticContext>,
}

// HTML defaults for a canvas without width/height attributes.
fn default_canvas_width() -> u32 {
    300
}

fn default_canvas_height() -> u32 {
    150
}

impl From<RawSnapshot> for DocumentSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        let canvases = raw
            .canvases
            .into_iter()
            .map(|c| CanvasElement {
                id: c.id,
                classes: c.classes,
                width: c.width,
                height: c.height,
                style: c.style,
                context: c
                    .context
                    .map(|ctx| Arc::new(ctx) as Arc<dyn RenderingContext>),
            })
            .collect();

        DocumentSnapshot::new(raw.html, raw.scripts, raw.elements, canvases)
    }
}

impl DocumentSnapshot {
    /// Parses the JSON capture format.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        let raw: RawSnapshot = serde_json::from_slice(bytes)?;
        Ok(raw.into())
    }
}
