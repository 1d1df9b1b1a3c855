pub mod clock;
pub mod controller;
pub mod drill;
pub mod input;
pub mod result;
pub mod timer;

pub use controller::{Phase, Session, SessionSettings};
pub use result::SessionSummary;
