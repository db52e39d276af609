use caspolcheck::engine::config::ValidationConfig;
use std::path::PathBuf;

#[derive(Debug)]
pub struct AppConfig {
    pub program: PathBuf,
    pub data_dir: PathBuf,
    pub validation: ValidationConfig,
}
