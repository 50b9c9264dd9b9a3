pub mod config;
pub mod tracer;

pub use config::TracingConfig;
