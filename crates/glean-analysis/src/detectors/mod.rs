//! Detectors: the plugin contract, the two built-in kinds and their registry.

pub mod openapi;
pub mod registry;
pub mod secrets;
pub mod traits;

pub use openapi::OpenApiDetector;
pub use registry::{create_default_registry, DetectorRegistry};
pub use secrets::SecretLeakDetector;
pub use traits::{Detector, DetectorKind};
