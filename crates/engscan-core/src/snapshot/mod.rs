pub mod context;
pub mod model;
pub mod read;
pub mod selector;

pub use context::{ContextVersion, RenderingContext, StaticContext};
pub use model::{CanvasElement, CanvasStyle, DocumentSnapshot, Element, ScriptElement};
