//! CLI command implementations.

mod config;
mod doctor;
mod fetch;
mod generate;
mod script;

pub use config::run_config;
pub use doctor::run_doctor;
pub use fetch::run_fetch;
pub use generate::run_generate;
pub use script::run_script;
