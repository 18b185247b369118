mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from digitroi for tests
pub use digitroi::{
    BatchExtractor, ClassifierInput, DebugConfig, ExtractOptions, IsolatorConfig, RegionIsolator,
    RegionOfInterest, Rejection,
};
