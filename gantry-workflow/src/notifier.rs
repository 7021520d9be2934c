//! Maintenance notifications
//!
//! Best-effort dispatch of "machines flagged for service" notices. When a
//! webhook is configured the notice is POSTed as JSON; otherwise it is
//! logged locally and the dispatch succeeds.

use async_trait::async_trait;
use gantry_core::domain::task::ServiceCandidate;
use serde_json::json;
use tracing::info;

/// Notifies stakeholders about machines flagged for service
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, machines: &[ServiceCandidate]) -> anyhow::Result<()>;
}

/// Webhook-backed implementation of Notifier
pub struct WebhookNotifier {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, machines: &[ServiceCandidate]) -> anyhow::Result<()> {
        let Some(url) = &self.webhook_url else {
            info!(
                "No notification webhook configured; {} machine(s) flagged for maintenance",
                machines.len()
            );
            for machine in machines {
                info!(
                    "  - {} ({:?}): {}",
                    machine.machine_id, machine.priority, machine.reason
                );
            }
            return Ok(());
        };

        let payload = json!({
            "machine_count": machines.len(),
            "machines": machines
                .iter()
                .map(|m| json!({
                    "machine_id": m.machine_id,
                    "priority": m.priority,
                    "reason": m.reason,
                }))
                .collect::<Vec<_>>(),
        });

        let response = self.client.post(url).json(&payload).send().await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "notification webhook returned status {}",
                response.status()
            );
        }

        info!("Notified webhook about {} machine(s)", machines.len());

        Ok(())
    }
}
