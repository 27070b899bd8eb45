//! Core type definitions used throughout the codebase

pub use glam::Vec2;

/// Simulation tick counter (one tick per rendered frame while running)
pub type Tick = u64;
