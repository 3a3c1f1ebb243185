//! Risk assessment pipeline.
//!
//! Pipeline: Observation + Patient → scoring → threshold classification
//! → escalation decision (alert / auto follow-up).

mod policy;
mod scorer;

pub use policy::*;
pub use scorer::*;
