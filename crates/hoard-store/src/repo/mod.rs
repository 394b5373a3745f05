//! Entity repository
//!
//! `Store` is the only public way to read or write entities. Every method
//! takes the owning user id explicitly and runs in one engine transaction,
//! so a primary record, its index entries, and any cascaded children are
//! always written or removed together.

mod categories;
mod contracts;
mod index;
mod indexed;
mod purchases;
pub(crate) mod records;
mod settings;
mod store;
mod users;
mod vehicles;

pub use store::{Census, Store};
