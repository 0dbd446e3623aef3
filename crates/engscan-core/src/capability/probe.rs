//! Capability prober.
//!
//! Enumerates what a rendering context supports into a flat
//! [`CapabilityRecord`]. Pure function of the context: the only state it
//! touches is a scratch texture used for the float format-support test,
//! which is released on every exit path by [`ScratchTexture`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snapshot::context::{
    ContextVersion, GlError, Parameter, ParameterValue, RenderingContext, TexelFormat, TextureId,
};

pub const EXT_COLOR_BUFFER_FLOAT: &str = "EXT_color_buffer_float";
pub const OES_TEXTURE_FLOAT: &str = "OES_texture_float";
pub const EXT_TEXTURE_FILTER_ANISOTROPIC: &str = "EXT_texture_filter_anisotropic";
pub const ANGLE_INSTANCED_ARRAYS: &str = "ANGLE_instanced_arrays";
pub const WEBGL_MULTI_DRAW: &str = "WEBGL_multi_draw";

/// Supported feature set and numeric limits of one context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    pub webgl2: bool,
    pub float_textures: bool,
    pub anisotropic_filtering: bool,
    pub instanced_arrays: bool,
    pub multi_draw: bool,
    pub max_texture_size: u32,
    pub max_viewport_dims: [u32; 2],
    pub max_renderbuffer_size: u32,
    pub max_texture_image_units: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("rendering context is lost")]
    ContextLost,
}

/// Capability probing seam handed to deep-analysis routines.
pub trait CapabilityProber: Send + Sync {
    fn probe(&self, context: &dyn RenderingContext) -> Result<CapabilityRecord, ProbeError>;
}

/// Default prober speaking the WebGL extension/parameter vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebGlProber;

impl CapabilityProber for WebGlProber {
    fn probe(&self, context: &dyn RenderingContext) -> Result<CapabilityRecord, ProbeError> {
        if context.is_context_lost() {
            return Err(ProbeError::ContextLost);
        }

        let webgl2 = context.version() == ContextVersion::WebGl2;
        let float_extension = if webgl2 {
            EXT_COLOR_BUFFER_FLOAT
        } else {
            OES_TEXTURE_FLOAT
        };

        let float_textures = context.has_extension(float_extension)
            && supports_format(context, TexelFormat::Rgba32F);

        Ok(CapabilityRecord {
            webgl2,
            float_textures,
            anisotropic_filtering: context.has_extension(EXT_TEXTURE_FILTER_ANISOTROPIC),
            instanced_arrays: context.has_extension(ANGLE_INSTANCED_ARRAYS),
            multi_draw: context.has_extension(WEBGL_MULTI_DRAW),
            max_texture_size: int_parameter(context, Parameter::MaxTextureSize),
            max_viewport_dims: match context.parameter(Parameter::MaxViewportDims) {
                Some(ParameterValue::Pair(dims)) => dims,
                _ => [0, 0],
            },
            max_renderbuffer_size: int_parameter(context, Parameter::MaxRenderbufferSize),
            max_texture_image_units: int_parameter(context, Parameter::MaxTextureImageUnits),
        })
    }
}

fn int_parameter(context: &dyn RenderingContext, param: Parameter) -> u32 {
    match context.parameter(param) {
        Some(ParameterValue::Int(v)) => v,
        _ => 0,
    }
}

/// Texture allocated for a format test, deleted when dropped.
struct ScratchTexture<'a> {
    context: &'a dyn RenderingContext,
    id: TextureId,
}

impl<'a> ScratchTexture<'a> {
    fn create(context: &'a dyn RenderingContext) -> Option<Self> {
        context.create_texture().map(|id| Self { context, id })
    }
}

impl Drop for ScratchTexture<'_> {
    fn drop(&mut self) {
        self.context.delete_texture(self.id);
    }
}

/// Uploads a 1x1 image in `format` and reports whether the context accepted it.
fn supports_format(context: &dyn RenderingContext, format: TexelFormat) -> bool {
    // Stale errors would be attributed to the upload.
    let _ = context.take_error();

    let Some(scratch) = ScratchTexture::create(context) else {
        return false;
    };
    context.tex_image_2d(scratch.id, format, 1, 1);

    context.take_error() == GlError::NoError
}
