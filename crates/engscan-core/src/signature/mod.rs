pub mod matcher;
pub mod model;

pub use matcher::matches;
pub use model::Signature;
