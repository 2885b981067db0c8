//! Application layer: the log → chat pipeline.

pub mod ingest_log;

pub use ingest_log::{
    ChatPoster, Clock, FixedClock, IngestLogUseCase, IngestStats, LineOutcome, SystemClock,
};
