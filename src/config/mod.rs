pub mod env_file;
pub mod settings;

pub use env_file::{load_env_file, EnvFileStatus};
pub use settings::{AuditConfig, Config, ConfigError, ExecutionConfig, LLMConfig};
