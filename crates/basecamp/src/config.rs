//! Explicit client configuration.
//!
//! There is no ambient "initialize then use" state anywhere in this
//! workspace: callers build a config, validate it, and thread the resulting
//! handles through every operation explicitly.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Backend-imposed ceiling on records returned per query.
pub const DEFAULT_PAGE_SIZE: u64 = 500;

/// Default batch size for chunked bulk saves.
pub const DEFAULT_SAVE_CHUNK: usize = 200;

/// Connection and traversal limits for one backend client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseConfig {
    /// Base URL of the backend server.
    pub server_url: String,
    /// Application identifier sent with every request.
    pub app_id: String,
    /// Per-query record ceiling the backend enforces.
    #[serde(default = "default_page_size")]
    pub page_size_max: u64,
    /// Records per bulk-save batch.
    #[serde(default = "default_save_chunk")]
    pub save_chunk_size: usize,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_save_chunk() -> usize {
    DEFAULT_SAVE_CHUNK
}

impl BaseConfig {
    pub fn new(server_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        BaseConfig {
            server_url: server_url.into(),
            app_id: app_id.into(),
            page_size_max: DEFAULT_PAGE_SIZE,
            save_chunk_size: DEFAULT_SAVE_CHUNK,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server_url.is_empty() {
            return Err(Error::InvalidConfig("server_url cannot be empty".into()));
        }
        if self.app_id.is_empty() {
            return Err(Error::InvalidConfig("app_id cannot be empty".into()));
        }
        if self.page_size_max == 0 {
            return Err(Error::InvalidConfig(
                "page_size_max must be greater than 0".into(),
            ));
        }
        if self.save_chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "save_chunk_size must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
