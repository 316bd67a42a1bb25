//! Persistent track storage backed by SQLite.
//!
//! `Library` offers the small CRUD surface the player needs: insert a
//! record, delete it, and list everything in import order.

mod connection;
mod error;
mod migrations;
mod tracks;

pub use connection::Library;
pub use error::StoreError;

#[cfg(test)]
mod tests;
