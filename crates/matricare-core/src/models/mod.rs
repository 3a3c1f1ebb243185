//! Domain models for the matricare system.

mod alert;
mod assessment;
mod follow_up;
mod observation;
mod patient;
mod user;

pub use alert::*;
pub use assessment::*;
pub use follow_up::*;
pub use observation::*;
pub use patient::*;
pub use user::*;
