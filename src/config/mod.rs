//! Configuration module

mod site;

pub use site::BlogConfig;
pub use site::BlogSection;
pub use site::CacheConfig;
pub use site::ConfigError;
pub use site::RenderConfig;
pub use site::RepoConfig;
