pub mod probe;

pub use probe::{CapabilityProber, CapabilityRecord, ProbeError, WebGlProber};
