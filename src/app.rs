//! Application module: the model the UI renders and the runtime mutates.
//!
//! `App` lives in `app::model` and holds the library view, the selection,
//! the import prompt and the status line.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
