pub mod app_config;
pub mod config;
pub mod items;
pub mod location;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use items::{
    ClaimRequest, FoundItem, FoundReport, LostItem, LostItemUpdate, ManagedLostItem,
    DEFAULT_PAGE_LIMIT, MAX_IMAGES,
};
pub use location::{LocationOption, LocationSelection};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
