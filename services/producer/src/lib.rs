//! Synthetic water-quality imagery producer.
//!
//! Periodically tiles each configured micro-area, fabricates band readings,
//! renders and compresses a scene image, uploads it and emits the payload.

pub mod config;
pub mod pipeline;
pub mod sink;

pub use config::{AreaConfig, ProducerConfig};
pub use pipeline::{CycleSummary, ProducerPipeline};
pub use sink::{FileSink, PayloadSink, StdoutSink};
