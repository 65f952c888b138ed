use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Notification rendering settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Prefix joined with a bare handle to form a profile link
    #[serde(default = "default_profile_base_url")]
    pub profile_base_url: String,

    /// Subject attached to every outbound track message
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            profile_base_url: default_profile_base_url(),
            subject: default_subject(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.profile_base_url.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "profile_base_url must not be empty".into(),
            )));
        }
        Ok(())
    }
}

fn default_profile_base_url() -> String {
    "http://twitter.com/".to_string()
}
fn default_subject() -> String {
    "Track Message".to_string()
}
