//! Console client configuration loaded from environment variables.

use std::env;

use crate::shared::ClientError;

pub const DEFAULT_PLAYER_NAME: &str = "player";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub ws_url: String,
    pub player_name: String,
    /// Join this room instead of creating one
    pub room_id: Option<String>,
    pub fill_bots: bool,
    pub autoplay: bool,
}

impl ClientConfig {
    /// Load from the process environment. `url_arg` (first CLI argument) takes
    /// precedence over `GUANDAN_WS_URL`.
    pub fn from_env(url_arg: Option<String>) -> Result<Self, ClientError> {
        Self::from_lookup(url_arg, |key| env::var(key).ok())
    }

    pub fn from_lookup(
        url_arg: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        let ws_url = url_arg
            .or_else(|| lookup("GUANDAN_WS_URL"))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                ClientError::Config(
                    "GUANDAN_WS_URL must be set or the server URL passed as an argument"
                        .to_string(),
                )
            })?;
        if !ws_url.starts_with("ws://") && !ws_url.starts_with("wss://") {
            return Err(ClientError::Config(format!(
                "server URL must use ws:// or wss://, got '{}'",
                ws_url
            )));
        }

        let player_name = lookup("GUANDAN_PLAYER_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
        let room_id = lookup("GUANDAN_ROOM").filter(|room| !room.trim().is_empty());
        let fill_bots = parse_flag("GUANDAN_FILL_BOTS", lookup("GUANDAN_FILL_BOTS"))?;
        let autoplay = parse_flag("GUANDAN_AUTOPLAY", lookup("GUANDAN_AUTOPLAY"))?;

        Ok(ClientConfig {
            ws_url,
            player_name,
            room_id,
            fill_bots,
            autoplay,
        })
    }
}

fn parse_flag(key: &str, value: Option<String>) -> Result<bool, ClientError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(ClientError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
