//! Gantry Store Client
//!
//! A type-safe HTTP client for the record store's REST interface.
//!
//! The store exposes tables through a PostgREST-style dialect: rows are
//! read with `GET /rest/v1/<table>` using `select`, `limit`, and
//! `<field>=<op>.<value>` query parameters, and written with `POST` plus
//! `Prefer: return=representation`. Authentication is a single credential
//! sent as both the `apikey` header and a bearer token.
//!
//! # Example
//!
//! ```no_run
//! use gantry_client::StoreClient;
//! use gantry_core::domain::window::QueryFilters;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gantry_client::StoreError> {
//!     let client = StoreClient::new("https://store.example.com", "service-key")?;
//!
//!     let mut filters = QueryFilters::new();
//!     filters.insert("resolved_at.gte", "2024-01-01T00:00:00");
//!
//!     let rows = client.query_rows("downtime_detail", "*", &filters, 1000).await?;
//!     println!("fetched {} rows", rows.len());
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{Result, StoreError};

use std::fmt;

use gantry_core::domain::record::Row;
use gantry_core::domain::window::QueryFilters;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the record store
#[derive(Clone)]
pub struct StoreClient {
    /// Base URL of the store (e.g., "https://store.example.com")
    base_url: String,
    /// Access credential, sent with every request
    credential: String,
    /// HTTP client instance
    client: Client,
}

// Manual impl so the credential never lands in logs or error chains.
impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("base_url", &self.base_url)
            .field("credential", &"<redacted>")
            .finish()
    }
}

impl StoreClient {
    /// Create a new store client
    ///
    /// Fails when either the endpoint or the credential is empty; a client
    /// is never constructed in an unusable state.
    pub fn new(base_url: impl Into<String>, credential: impl Into<String>) -> Result<Self> {
        Self::with_client(base_url, credential, Client::new())
    }

    /// Create a new store client with a custom HTTP client
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        credential: impl Into<String>,
        client: Client,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let credential = credential.into();

        if base_url.trim().is_empty() {
            return Err(StoreError::invalid_config("store endpoint must not be empty"));
        }
        if credential.trim().is_empty() {
            return Err(StoreError::invalid_config(
                "store credential must not be empty",
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
            client,
        })
    }

    /// Get the base URL of the store
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Table Operations
    // =============================================================================

    /// Query rows from a named table
    ///
    /// # Arguments
    /// * `table` - Table name
    /// * `columns` - Column selection (e.g., `"*"` or `"machine_id,status"`)
    /// * `filters` - Filter map in `field.operator` key convention
    /// * `limit` - Maximum number of rows to return
    ///
    /// # Returns
    /// The matching rows, possibly empty. A non-success status from the
    /// store is always surfaced as an error, never as a partial result.
    pub async fn query_rows(
        &self,
        table: &str,
        columns: &str,
        filters: &QueryFilters,
        limit: u32,
    ) -> Result<Vec<Row>> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);

        let mut params: Vec<(String, String)> = vec![
            ("select".to_string(), columns.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        params.extend(filter_params(filters));

        debug!("Querying table '{}' with {} filter(s)", table, filters.len());

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.credential)
            .bearer_auth(&self.credential)
            .query(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Insert rows into a named table
    ///
    /// # Returns
    /// The created rows as the store confirmed them.
    pub async fn insert_rows(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/rest/v1/{}", self.base_url, table);

        debug!("Inserting {} row(s) into table '{}'", rows.len(), table);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.credential)
            .bearer_auth(&self.credential)
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle a store response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Translate a `field.operator` filter map into store query parameters
///
/// `resolved_at.gte = v` becomes `resolved_at=gte.v`; a key without an
/// operator suffix becomes an equality match.
fn filter_params(filters: &QueryFilters) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(key, value)| match key.rsplit_once('.') {
            Some((field, op)) => (field.to_string(), format!("{}.{}", op, value)),
            None => (key.to_string(), format!("eq.{}", value)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = StoreClient::new("https://store.example.com", "key").unwrap();
        assert_eq!(client.base_url(), "https://store.example.com");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = StoreClient::new("https://store.example.com/", "key").unwrap();
        assert_eq!(client.base_url(), "https://store.example.com");
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        assert!(matches!(
            StoreClient::new("", "key"),
            Err(StoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_credential_rejected() {
        assert!(matches!(
            StoreClient::new("https://store.example.com", "  "),
            Err(StoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_debug_redacts_credential() {
        let client = StoreClient::new("https://store.example.com", "super-secret").unwrap();
        let debug = format!("{:?}", client);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_filter_params_split_on_operator_suffix() {
        let mut filters = QueryFilters::new();
        filters.insert("resolved_at.gte", "2024-01-01T00:00:00");
        filters.insert("resolved_at.lte", "2024-01-31T23:59:59.999999");

        let params = filter_params(&filters);

        assert_eq!(
            params,
            vec![
                (
                    "resolved_at".to_string(),
                    "gte.2024-01-01T00:00:00".to_string()
                ),
                (
                    "resolved_at".to_string(),
                    "lte.2024-01-31T23:59:59.999999".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_filter_params_default_to_equality() {
        let mut filters = QueryFilters::new();
        filters.insert("status", "open");

        let params = filter_params(&filters);

        assert_eq!(params, vec![("status".to_string(), "eq.open".to_string())]);
    }

    #[test]
    fn test_error_classification() {
        assert!(StoreError::api_error(404, "missing").is_client_error());
        assert!(StoreError::api_error(503, "down").is_server_error());
        assert!(!StoreError::api_error(503, "down").is_client_error());
    }
}
