//! Rendering-context port.
//!
//! The core never creates a rendering context. Whoever builds the snapshot
//! owns canvas/context creation and hands the core a handle implementing
//! [`RenderingContext`]. The surface mirrors the small subset of the WebGL
//! API the capability prober needs.
//!
//! [`StaticContext`] is the serialisable implementation used when a snapshot
//! is captured to JSON: it replays a recorded capability dump.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// API tier of a rendering context, as determined by its runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextVersion {
    #[serde(rename = "webgl")]
    WebGl,
    #[serde(rename = "webgl2")]
    WebGl2,
}

impl ContextVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebGl => "webgl",
            Self::WebGl2 => "webgl2",
        }
    }
}

/// Queryable numeric limits (`getParameter`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    MaxTextureSize,
    MaxViewportDims,
    MaxRenderbufferSize,
    MaxTextureImageUnits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterValue {
    Int(u32),
    Pair([u32; 2]),
}

/// Texel formats used by format-support tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelFormat {
    Rgba8,
    Rgba32F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Error state as reported by `getError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlError {
    NoError,
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    OutOfMemory,
}

impl GlError {
    fn code(self) -> u32 {
        match self {
            Self::NoError => 0,
            Self::InvalidEnum => 0x0500,
            Self::InvalidValue => 0x0501,
            Self::InvalidOperation => 0x0502,
            Self::OutOfMemory => 0x0505,
        }
    }

    fn from_code(code: u32) -> Self {
        match code {
            0x0500 => Self::InvalidEnum,
            0x0501 => Self::InvalidValue,
            0x0502 => Self::InvalidOperation,
            0x0505 => Self::OutOfMemory,
            _ => Self::NoError,
        }
    }
}

/// A live rendering-context handle.
///
/// Methods take `&self`: like the browser API, a context is shared and
/// mutated through aliases. Implementations must be thread-safe because
/// snapshots may be classified on any thread.
pub trait RenderingContext: Send + Sync + std::fmt::Debug {
    fn version(&self) -> ContextVersion;

    fn is_context_lost(&self) -> bool;

    /// Returns `true` when `getExtension(name)` yields a non-null object.
    fn has_extension(&self, name: &str) -> bool;

    fn parameter(&self, param: Parameter) -> Option<ParameterValue>;

    fn create_texture(&self) -> Option<TextureId>;

    fn tex_image_2d(&self, texture: TextureId, format: TexelFormat, width: u32, height: u32);

    /// Returns and clears the pending error flag.
    fn take_error(&self) -> GlError;

    fn delete_texture(&self, texture: TextureId);
}

/// Recorded numeric limits of a context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextParameters {
    #[serde(default)]
    pub max_texture_size: Option<u32>,
    #[serde(default)]
    pub max_viewport_dims: Option<[u32; 2]>,
    #[serde(default)]
    pub max_renderbuffer_size: Option<u32>,
    #[serde(default)]
    pub max_texture_image_units: Option<u32>,
}

/// Replays a recorded capability dump as a [`RenderingContext`].
#[derive(Debug, Serialize, Deserialize)]
pub struct StaticContext {
    pub version: ContextVersion,

    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub parameters: ContextParameters,

    /// Float texture uploads fail even when the extension is exposed
    /// (seen on some mobile drivers).
    #[serde(default)]
    pub float_upload_error: bool,

    #[serde(default)]
    pub lost: bool,

    #[serde(skip)]
    next_texture: AtomicU32,

    #[serde(skip)]
    live_textures: AtomicU32,

    #[serde(skip)]
    pending_error: AtomicU32,
}

impl StaticContext {
    pub fn new(version: ContextVersion) -> Self {
        Self {
            version,
            extensions: Vec::new(),
            parameters: ContextParameters::default(),
            float_upload_error: false,
            lost: false,
            next_texture: AtomicU32::new(0),
            live_textures: AtomicU32::new(0),
            pending_error: AtomicU32::new(0),
        }
    }

    pub fn with_extensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_parameters(mut self, parameters: ContextParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_float_upload_error(mut self) -> Self {
        self.float_upload_error = true;
        self
    }

    pub fn lost(mut self) -> Self {
        self.lost = true;
        self
    }

    /// Number of textures created and not yet deleted.
    pub fn live_textures(&self) -> u32 {
        self.live_textures.load(Ordering::SeqCst)
    }

    fn set_error(&self, error: GlError) {
        // Like GL, the first unread error sticks.
        let pending = &self.pending_error;
        let _ = pending.compare_exchange(0, error.code(), Ordering::SeqCst, Ordering::SeqCst);
    }
}

impl RenderingContext for StaticContext {
    fn version(&self) -> ContextVersion {
        self.version
    }

    fn is_context_lost(&self) -> bool {
        self.lost
    }

    fn has_extension(&self, name: &str) -> bool {
        !self.lost && self.extensions.iter().any(|e| e == name)
    }

    fn parameter(&self, param: Parameter) -> Option<ParameterValue> {
        if self.lost {
            return None;
        }
        let p = &self.parameters;
        match param {
            Parameter::MaxTextureSize => p.max_texture_size.map(ParameterValue::Int),
            Parameter::MaxViewportDims => p.max_viewport_dims.map(ParameterValue::Pair),
            Parameter::MaxRenderbufferSize => p.max_renderbuffer_size.map(ParameterValue::Int),
            Parameter::MaxTextureImageUnits => p.max_texture_image_units.map(ParameterValue::Int),
        }
    }

    fn create_texture(&self) -> Option<TextureId> {
        if self.lost {
            return None;
        }
        let id = self.next_texture.fetch_add(1, Ordering::SeqCst) + 1;
        self.live_textures.fetch_add(1, Ordering::SeqCst);
        Some(TextureId(id))
    }

    fn tex_image_2d(&self, _texture: TextureId, format: TexelFormat, width: u32, height: u32) {
        if width == 0 || height == 0 {
            self.set_error(GlError::InvalidValue);
            return;
        }
        if format == TexelFormat::Rgba32F {
            let exposed = match self.version {
                ContextVersion::WebGl2 => true,
                ContextVersion::WebGl => self.has_extension("OES_texture_float"),
            };
            if !exposed {
                self.set_error(GlError::InvalidEnum);
            } else if self.float_upload_error {
                self.set_error(GlError::InvalidOperation);
            }
        }
    }

    fn take_error(&self) -> GlError {
        GlError::from_code(self.pending_error.swap(0, Ordering::SeqCst))
    }

    fn delete_texture(&self, _texture: TextureId) {
        let live = &self.live_textures;
        let _ = live.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_recorded_context() {
        let json = r#"{
            "version": "webgl2",
            "extensions": ["EXT_texture_filter_anisotropic"],
            "parameters": { "max_texture_size": 8192, "max_viewport_dims": [8192, 8192] }
        }"#;

        let ctx: StaticContext = serde_json::from_str(json).unwrap();

        assert_eq!(ctx.version(), ContextVersion::WebGl2);
        assert!(ctx.has_extension("EXT_texture_filter_anisotropic"));
        assert!(!ctx.has_extension("WEBGL_multi_draw"));
        assert_eq!(
            ctx.parameter(Parameter::MaxTextureSize),
            Some(ParameterValue::Int(8192))
        );
        assert_eq!(ctx.parameter(Parameter::MaxRenderbufferSize), None);
        assert!(!ctx.is_context_lost());
    }

    #[test]
    fn float_upload_on_webgl1_without_extension_sets_error() {
        let ctx = StaticContext::new(ContextVersion::WebGl);
        let tex = ctx.create_texture().unwrap();
        ctx.tex_image_2d(tex, TexelFormat::Rgba32F, 1, 1);

        assert_eq!(ctx.take_error(), GlError::InvalidEnum);
        // getError clears the flag.
        assert_eq!(ctx.take_error(), GlError::NoError);
    }

    #[test]
    fn first_error_sticks_until_read() {
        let ctx = StaticContext::new(ContextVersion::WebGl2).with_float_upload_error();
        let tex = ctx.create_texture().unwrap();
        ctx.tex_image_2d(tex, TexelFormat::Rgba8, 0, 1);
        ctx.tex_image_2d(tex, TexelFormat::Rgba32F, 1, 1);

        assert_eq!(ctx.take_error(), GlError::InvalidValue);
    }

    #[test]
    fn tracks_live_textures() {
        let ctx = StaticContext::new(ContextVersion::WebGl2);
        let a = ctx.create_texture().unwrap();
        let b = ctx.create_texture().unwrap();
        assert_ne!(a, b);
        assert_eq!(ctx.live_textures(), 2);

        ctx.delete_texture(a);
        ctx.delete_texture(b);
        ctx.delete_texture(b);
        assert_eq!(ctx.live_textures(), 0);
    }

    #[test]
    fn lost_context_exposes_nothing() {
        let ctx = StaticContext::new(ContextVersion::WebGl2)
            .with_extensions(["WEBGL_multi_draw"])
            .lost();

        assert!(ctx.is_context_lost());
        assert!(!ctx.has_extension("WEBGL_multi_draw"));
        assert!(ctx.create_texture().is_none());
    }
}
