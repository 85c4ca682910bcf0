//! OSC ingress — UDP control messages mapped onto session control events.

pub mod config;
pub mod listener;
pub mod mapping;

pub use config::OscConfig;
pub use listener::OscListener;
pub use mapping::{apply_osc_message, OscMapping, OscTarget};
