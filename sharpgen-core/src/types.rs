//! Table and column metadata types
//!
//! These are plain data holders produced by the enrichment layer and consumed
//! by the generator. They carry no behavior beyond the invariants that must
//! hold regardless of which layer created them (table types always emit all
//! of their columns, with no custom naming).

use serde::{Deserialize, Serialize};

/// Kind of a database object the generator can process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// A regular table with schema qualification
    #[default]
    Table,
    /// A user-defined table type. Has no primary key and no independent
    /// SELECT semantics; aliasing and column selection are ignored.
    TableType,
}

/// Metadata of a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDefinition {
    /// Column name as stored in the database
    pub name: String,

    /// SQL type name (e.g. `nvarchar`, `int`)
    pub sql_type: String,

    /// Ordinal position within the table; emission order follows this value
    pub ordinal: i32,

    /// Maximum length for character/binary types, `-1` for `max`
    pub max_length: i32,

    /// Whether the column allows NULL
    pub nullable: bool,

    /// Whether the column is part of the primary key
    pub primary_key: bool,

    /// Whether the column is an identity column
    pub identity: bool,

    /// Whether the column is computed
    pub computed: bool,

    /// Whether the column is included in the generated output
    pub use_in_output: bool,

    /// Optional rename applied to the generated property
    pub alias: Option<String>,
}

impl Default for ColumnDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            sql_type: String::new(),
            ordinal: 0,
            max_length: 0,
            nullable: false,
            primary_key: false,
            identity: false,
            computed: false,
            use_in_output: true,
            alias: None,
        }
    }
}

impl ColumnDefinition {
    /// Create a new column definition with the given name, SQL type and
    /// ordinal position. The column is included in the output by default.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>, ordinal: i32) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            ordinal,
            ..Self::default()
        }
    }

    /// Set the nullable flag
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the primary key flag
    #[must_use]
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Set the maximum length
    #[must_use]
    pub fn with_max_length(mut self, max_length: i32) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the output alias
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Metadata of a table or a user-defined table type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDefinition {
    /// Table name as stored in the database
    pub name: String,

    /// Schema name; empty for table types
    pub schema: String,

    /// Whether this is a regular table or a table type
    pub kind: TableKind,

    /// Optional rename applied to the generated class
    pub alias: Option<String>,

    /// Whether the table takes part in a batch export
    pub export: bool,

    /// Set when two selected/aliased columns resolve to the same output
    /// identifier. Advisory only; generation still proceeds.
    pub column_name_collision: bool,

    /// Ordered column list; empty until the table has been enriched
    columns: Vec<ColumnDefinition>,
}

impl Default for TableDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            schema: String::new(),
            kind: TableKind::Table,
            alias: None,
            export: true,
            column_name_collision: false,
            columns: Vec::new(),
        }
    }
}

impl TableDefinition {
    /// Create a new table definition
    #[must_use]
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            ..Self::default()
        }
    }

    /// Create a new table type definition. Table types carry no schema
    /// qualification.
    #[must_use]
    pub fn table_type(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TableKind::TableType,
            ..Self::default()
        }
    }

    /// Whether the column list has been loaded
    #[must_use]
    pub fn is_enriched(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Ordered column list
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Mutable access to the column list for user curation (alias, use flag).
    /// Mutations on a table type are overruled on the next [`set_columns`]
    /// call; callers should not rely on them surviving.
    ///
    /// [`set_columns`]: TableDefinition::set_columns
    pub fn columns_mut(&mut self) -> &mut [ColumnDefinition] {
        &mut self.columns
    }

    /// Replace the column list, normalizing per table kind: on a table type
    /// every column is forced into the output and aliases are discarded.
    pub fn set_columns(&mut self, mut columns: Vec<ColumnDefinition>) {
        if self.kind == TableKind::TableType {
            for column in &mut columns {
                column.use_in_output = true;
                column.alias = None;
            }
        }
        self.columns = columns;
    }

    /// The columns taking part in the output, in ordinal order
    #[must_use]
    pub fn selected_columns(&self) -> Vec<&ColumnDefinition> {
        let mut selected: Vec<&ColumnDefinition> = self
            .columns
            .iter()
            .filter(|c| c.use_in_output)
            .collect();
        selected.sort_by_key(|c| c.ordinal);
        selected
    }
}

/// Result-set column metadata obtained from an ad-hoc query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryColumn {
    /// Column name in the result set
    pub name: String,

    /// Runtime ("system") type name reported by the driver (e.g. `Int32`)
    pub system_type: String,

    /// Whether the result column allows NULL
    pub nullable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_type_columns_always_used() {
        let mut table = TableDefinition::table_type("IdList");
        let columns = vec![
            ColumnDefinition::new("Id", "int", 1).with_alias("Renamed"),
            ColumnDefinition {
                use_in_output: false,
                ..ColumnDefinition::new("Value", "nvarchar", 2)
            },
        ];
        table.set_columns(columns);

        assert!(table.columns().iter().all(|c| c.use_in_output));
        assert!(table.columns().iter().all(|c| c.alias.is_none()));
    }

    #[test]
    fn regular_table_keeps_curation() {
        let mut table = TableDefinition::new("Person", "dbo");
        table.set_columns(vec![
            ColumnDefinition::new("Id", "int", 1),
            ColumnDefinition {
                use_in_output: false,
                ..ColumnDefinition::new("Internal", "int", 2)
            },
        ]);

        let selected = table.selected_columns();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Id");
    }

    #[test]
    fn selected_columns_follow_ordinal() {
        let mut table = TableDefinition::new("Person", "dbo");
        table.set_columns(vec![
            ColumnDefinition::new("Name", "nvarchar", 2),
            ColumnDefinition::new("Id", "int", 1),
        ]);

        let names: Vec<_> = table.selected_columns().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Id", "Name"]);
    }
}
