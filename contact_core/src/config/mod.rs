pub mod settings;

pub use settings::{AppConfig, CorsConfig, RateLimitConfig, ServerConfig};
