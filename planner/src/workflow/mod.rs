pub mod config;
pub mod session;

pub use config::PlannerConfig;
pub use session::Session;
