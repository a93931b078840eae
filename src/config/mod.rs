mod app_config;
mod env_vars;

// Re-export run configuration
pub use app_config::{
    AppConfig,
    RemoteSettings,
    SmtpSettings,
    StageConfig,
};

// Re-export environment helpers
pub use env_vars::{
    load_dotenv,
    process_env,
    read_var,
};
