//! Collaborator traits through which the generator reaches the database
//!
//! The generator never queries SQL Server itself. Enrichment (loading a
//! table's column list) and ad-hoc query metadata are provided by
//! implementations of these traits; tests supply in-memory fakes.

use crate::error::Result;
use crate::types::{ColumnDefinition, QueryColumn, TableDefinition};
use async_trait::async_trait;

/// Populates the column list of a table or table type
#[async_trait]
pub trait TableEnricher: Send + Sync {
    /// Load the columns of the given table.
    ///
    /// # Errors
    /// Returns an error if the column metadata cannot be retrieved
    async fn load_columns(&self, table: &TableDefinition) -> Result<Vec<ColumnDefinition>>;
}

/// Executes an ad-hoc query for its result-set column metadata only
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute the query and return the result-set column metadata. The
    /// caller shapes the query so that no rows are fetched.
    ///
    /// # Errors
    /// Returns an error if the query is invalid or execution fails
    async fn query_metadata(&self, query: &str) -> Result<Vec<QueryColumn>>;
}
