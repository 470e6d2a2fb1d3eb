//! Domain types and the view-event protocol shared by the catalog, the session core
//! and the front ends.

pub mod domain;
pub mod error;
pub mod protocol;
