//! Workflow configuration
//!
//! Defines the parameters required to construct the maintenance workflow:
//! the record store endpoint and credential, plus the optional notification
//! webhook. Values are read from the environment once and passed explicitly
//! into the collaborators; nothing is written back into the process
//! environment.

/// Workflow configuration
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Record store base URL (e.g., "https://store.example.com")
    pub store_url: String,

    /// Record store access credential
    pub store_key: String,

    /// Webhook to notify when tasks are created; notifications are logged
    /// locally when unset
    pub notify_webhook_url: Option<String>,
}

impl WorkflowConfig {
    /// Creates a new configuration
    pub fn new(store_url: impl Into<String>, store_key: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            store_key: store_key.into(),
            notify_webhook_url: None,
        }
    }

    /// Sets the notification webhook
    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.notify_webhook_url = Some(url.into());
        self
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - GANTRY_STORE_URL (required)
    /// - GANTRY_STORE_KEY (required)
    /// - GANTRY_NOTIFY_WEBHOOK_URL (optional)
    pub fn from_env() -> anyhow::Result<Self> {
        let store_url = std::env::var("GANTRY_STORE_URL")
            .map_err(|_| anyhow::anyhow!("GANTRY_STORE_URL environment variable not set"))?;

        let store_key = std::env::var("GANTRY_STORE_KEY")
            .map_err(|_| anyhow::anyhow!("GANTRY_STORE_KEY environment variable not set"))?;

        let notify_webhook_url = std::env::var("GANTRY_NOTIFY_WEBHOOK_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            store_url,
            store_key,
            notify_webhook_url,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.store_url.trim().is_empty() {
            anyhow::bail!("store_url cannot be empty");
        }

        if !self.store_url.starts_with("http://") && !self.store_url.starts_with("https://") {
            anyhow::bail!("store_url must start with http:// or https://");
        }

        if self.store_key.trim().is_empty() {
            anyhow::bail!("store_key cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = WorkflowConfig::new("https://store.example.com", "key");
        assert!(config.validate().is_ok());
        assert!(config.notify_webhook_url.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = WorkflowConfig::new("https://store.example.com", "key");

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Empty store_url should fail
        config.store_url = String::new();
        assert!(config.validate().is_err());

        // Invalid URL should fail
        config.store_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.store_url = "https://store.example.com".to_string();
        assert!(config.validate().is_ok());

        // Empty store_key should fail
        config.store_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_webhook() {
        let config = WorkflowConfig::new("https://store.example.com", "key")
            .with_webhook("https://hooks.example.com/maintenance");

        assert_eq!(
            config.notify_webhook_url.as_deref(),
            Some("https://hooks.example.com/maintenance")
        );
    }
}
