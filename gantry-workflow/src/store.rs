//! Record store abstraction
//!
//! One store handle is shared between the workflow (which reads downtime
//! records) and the scheduler/writer (which read and write maintenance
//! tasks). The trait keeps the workflow testable against in-memory stores.

use async_trait::async_trait;
use gantry_client::StoreClient;
use gantry_core::domain::record::Row;
use gantry_core::domain::window::QueryFilters;

/// Queryable store of tabular records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Query rows from a named table with filters and a row limit
    async fn query(
        &self,
        table: &str,
        columns: &str,
        filters: &QueryFilters,
        limit: u32,
    ) -> anyhow::Result<Vec<Row>>;

    /// Insert rows into a named table, returning the created rows
    async fn insert(&self, table: &str, rows: Vec<Row>) -> anyhow::Result<Vec<Row>>;
}

#[async_trait]
impl RecordStore for StoreClient {
    async fn query(
        &self,
        table: &str,
        columns: &str,
        filters: &QueryFilters,
        limit: u32,
    ) -> anyhow::Result<Vec<Row>> {
        Ok(self.query_rows(table, columns, filters, limit).await?)
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> anyhow::Result<Vec<Row>> {
        Ok(self.insert_rows(table, &rows).await?)
    }
}
