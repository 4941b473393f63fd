//! Concrete pipeline steps.

mod encode;
mod fetch;

pub use encode::EncodeStep;
pub use fetch::FetchStep;
