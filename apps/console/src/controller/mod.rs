//! Controller layer: console commands, error modeling and dispatch into the session.

pub mod events;
pub mod orchestration;
