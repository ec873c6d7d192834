//! Logan 501 match engine.
//!
//! Tracks a two-player darts match played to 501 legs-and-sets rules:
//! visit-by-visit scoring with bust detection, single-step undo that can
//! reopen a closed leg or set, checkout suggestions, and per-player
//! statistics recomputed from the visit history. The engine itself is
//! transport-free; `server` wraps it in a gRPC service.

pub mod engine;
pub mod server;
pub mod settings;
pub mod store;
