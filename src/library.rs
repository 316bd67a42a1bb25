//! Track library: the record type, the import path (pick + probe) and
//! display helpers shared by the UI.

mod display;
mod import;
mod model;

pub use display::*;
pub use import::*;
pub use model::Track;
