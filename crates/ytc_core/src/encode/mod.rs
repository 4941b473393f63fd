//! Trim/re-encode (ffmpeg) support.
//!
//! Pure parameter types and argument construction; the subprocess
//! itself is driven by the orchestrator's encode step.

mod caption;
mod profile;

pub use caption::{escape_filter_text, Caption};
pub use profile::EncodeProfile;
