pub mod batch;
pub mod config;
pub mod detection;
pub mod models;
pub mod pipeline;

pub use batch::{BatchExtractor, BatchReport, ExtractOptions};
pub use config::{ConfigError, IsolatorConfig};
pub use detection::RegionIsolator;
pub use detection::candidates::Rejection;
pub use detection::normalize::{ClassifierInput, NormalizeError};
pub use models::{BoundingBox, Contour, Hierarchy, RegionOfInterest};
pub use pipeline::{DebugConfig, Isolation, Stage, StageTrace};
