//! The interview domain: candidate profile, transcript, the four model-backed
//! collaborators, the orchestrating state machine and its HTTP surface.

pub mod analysis;
pub mod error;
pub mod handlers;
pub mod orchestrator;
pub mod profile;
pub mod questions;
pub mod reference;
pub mod scoring;
pub mod services;
pub mod session;
pub mod transcript;

#[cfg(test)]
mod testing;
