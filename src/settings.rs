// src/settings.rs
// =============================================================================
// Site settings: where keywords link to, and which keywords.
//
// The settings file is the JSON row the admin panel saves, e.g.
//
//   {
//     "smartlink_url": "https://smartlink.example/abc",
//     "smartlink_keywords": "AI, bitcoin, C++",
//     "banner_header": "<script>...</script>"
//   }
//
// Only the two smartlink fields feed the engine. The ad-slot fields are
// kept so a settings file round-trips without losing anything.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::linkify::{parse_keywords, rules_for, LinkRule};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid smartlink URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Smartlink and ad-slot configuration for the whole site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartlinkSettings {
    pub smartlink_url: String,
    pub smartlink_keywords: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_sidebar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_article_bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popunder_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_bar_code: Option<String>,
}

impl SmartlinkSettings {
    /// Reads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses settings from JSON text. Missing fields are empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid settings object.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn keywords(&self) -> Vec<String> {
        parse_keywords(&self.smartlink_keywords)
    }

    /// The rules the engine should run, in keyword order.
    ///
    /// Empty when either the URL or the keyword list is blank.
    pub fn rules(&self) -> Vec<LinkRule> {
        let destination = self.smartlink_url.trim();
        if destination.is_empty() {
            return Vec::new();
        }
        rules_for(self.keywords(), destination)
    }

    /// Checks that a configured smartlink URL is an absolute http(s) URL.
    ///
    /// A blank URL is valid: it just switches linking off.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the URL is not usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let raw = self.smartlink_url.trim();
        if raw.is_empty() {
            return Ok(());
        }

        let invalid = |reason: String| SettingsError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }
}
