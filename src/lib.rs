pub mod cadence;
pub mod constants;
pub mod data_server;
pub mod diagnostics;
pub mod light_curve;
pub mod metadata;
pub mod parsers;
pub mod pipeline;
pub mod query;
pub mod rate;
pub mod rebin;
pub mod response;
pub mod spiacs_errors;
pub mod time;
pub mod time_reference;

pub use data_server::{DataServer, DataServerConfig};
pub use light_curve::{Sample, TimeSeriesProduct};
pub use parsers::DataTier;
pub use pipeline::LightCurvePipeline;
pub use query::{LightCurveQuery, PipelineParams};
pub use response::RawResponse;
pub use spiacs_errors::{LightCurveError, SpiacsAnalysisError};
