use std::{collections::HashMap, fs};

use anyhow::{bail, Result};

pub struct Settings {
    pub server_url: String,
    pub user_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000/api".into(),
            user_id: String::new(),
        }
    }
}

/// Layering: defaults, then `client.toml`, then environment variables,
/// then CLI flags.
pub fn load_settings(
    server_url_flag: Option<String>,
    user_id_flag: Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("client.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
            if let Some(v) = file_cfg.get("user_id") {
                settings.user_id = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("CHAT_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("CHAT_USER_ID") {
        settings.user_id = v;
    }

    if let Some(v) = server_url_flag {
        settings.server_url = v;
    }
    if let Some(v) = user_id_flag {
        settings.user_id = v;
    }

    if settings.user_id.trim().is_empty() {
        bail!("no user id configured; pass --user-id, set CHAT_USER_ID, or add user_id to client.toml");
    }

    Ok(settings)
}
