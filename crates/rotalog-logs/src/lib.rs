//! rotalog logs - Log rotation and the reloadable `tracing` output

mod control;
mod rotation;
mod writer;

pub use control::{FileLayer, LogControl};
pub use rotation::{Clock, RotationConfig, SystemClock};
pub use writer::RotatingFileWriter;
