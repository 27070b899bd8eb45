//! Grid Skirmish - real-time tactical simulation core

pub mod battle;
pub mod core;
