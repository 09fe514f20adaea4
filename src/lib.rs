//! Riot match-v5 harvesting behind a rate-limit aware client.
//!
//! The modules live in a library so the `patch-harvester` binary and the unit
//! tests share them; `main.rs` only wires arguments to them.

pub mod args;
pub mod client;
pub mod config;
pub mod harvester;
pub mod reference;
pub mod store;

#[cfg(test)]
mod testing;
