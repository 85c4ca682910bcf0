//! Vibe Oracle — a generative music engine that layers up to three styles
//! into an endless, evolving session.

pub mod audio;
pub mod config;
pub mod control;
pub mod effects;
pub mod emotion;
pub mod instrument;
pub mod osc;
pub mod scheduler;
pub mod session;
pub mod style;
pub mod theory;
