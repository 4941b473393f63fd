//! Data models for yt-clipper.
//!
//! This module contains the core data structures shared by the CLI
//! and GUI front-ends:
//! - Timestamps and clip requests
//! - Output naming strategies
//! - Run reports and phase timings

mod report;
mod request;
mod timestamp;

pub use report::{JobTiming, RunReport};
pub use request::{ClipRequest, OutputNaming};
pub use timestamp::{Timestamp, TimestampError};
