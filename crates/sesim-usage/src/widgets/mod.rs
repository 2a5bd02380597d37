//! TUI widget modules

pub mod chart;
pub mod header;
pub mod popup;
pub mod session_popup;
pub mod shortcuts;
pub mod statistics;

pub use chart::*;
pub use header::*;
pub use popup::*;
pub use session_popup::*;
pub use shortcuts::*;
pub use statistics::*;
