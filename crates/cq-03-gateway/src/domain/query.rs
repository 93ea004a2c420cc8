//! Fetch query parameters.
//!
//! Flags are parsed leniently: `true/false`, `1/0`, `yes/no`, `on/off` in any
//! case. An absent `ack` means true and an absent `block` means false.

use super::error::ApiError;
use cq_02_queue_store::FetchMode;
use serde::Deserialize;

/// Raw `?ack=&block=` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchQuery {
    pub ack: Option<String>,
    pub block: Option<String>,
}

impl FetchQuery {
    pub fn mode(&self) -> Result<FetchMode, ApiError> {
        let defaults = FetchMode::default();
        Ok(FetchMode::new(
            flag("ack", self.ack.as_deref(), defaults.ack)?,
            flag("block", self.block.as_deref(), defaults.block)?,
        ))
    }
}

fn flag(name: &str, raw: Option<&str>, default: bool) -> Result<bool, ApiError> {
    match raw {
        None => Ok(default),
        Some(raw) => parse_flag(raw).ok_or_else(|| {
            ApiError::invalid_request(format!("{name} must be a boolean, got {raw:?}"))
        }),
    }
}

/// Parse one boolean flag; `None` when the text is not a recognised spelling.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
