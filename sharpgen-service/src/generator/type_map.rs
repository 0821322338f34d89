//! SQL to C# type conversion table
//!
//! The table is a persisted list mapping a SQL type name to the C# type used
//! in generated code, its CLR "system type" alias, and whether the C# type is
//! nullable by default (reference types). It is loaded lazily from a JSON
//! side-car file that the user can edit, and cached until invalidated. The
//! owning component holds a direct reference and calls [`invalidate`] after
//! an edit; there is no global notification channel.
//!
//! [`invalidate`]: TypeConversionTable::invalidate

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use tracing::warn;

/// Built-in mapping table used when no side-car file is configured or the
/// configured file cannot be read
const BUILTIN_TABLE: &str = include_str!("../../resources/type_conversion.json");

/// A single SQL type to C# type mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMapping {
    /// SQL type name (e.g. `nvarchar`); unique within the table,
    /// case-insensitive, first match wins
    #[serde(rename = "SqlType")]
    pub sql_type: String,

    /// C# type name emitted in generated code (e.g. `string`)
    #[serde(rename = "CSharpType")]
    pub csharp_type: String,

    /// CLR system type alias used for reverse lookups (e.g. `String`)
    #[serde(rename = "CSharpSystemType")]
    pub system_type: String,

    /// Whether the C# type is nullable by default (reference types)
    #[serde(rename = "IsNullable")]
    pub nullable_by_default: bool,

    /// Derived id, hashed from the three type name strings
    #[serde(skip)]
    id: u64,
}

impl TypeMapping {
    /// Derived integer id of this mapping
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether this is the empty default entry returned on a failed lookup.
    /// Callers must emit the raw SQL type name verbatim in that case.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.csharp_type.is_empty()
    }

    fn derive_id(&mut self) {
        let mut hasher = DefaultHasher::new();
        self.sql_type.hash(&mut hasher);
        self.csharp_type.hash(&mut hasher);
        self.system_type.hash(&mut hasher);
        self.id = hasher.finish();
    }
}

/// Lazily cached SQL to C# type conversion table
#[derive(Debug, Default)]
pub struct TypeConversionTable {
    /// Side-car file with user-edited mappings; `None` uses the built-ins
    file: Option<PathBuf>,
    cache: RwLock<Option<Vec<TypeMapping>>>,
}

impl TypeConversionTable {
    /// Create a table backed by the built-in mappings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table backed by a user-editable JSON side-car file
    #[must_use]
    pub fn with_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
            cache: RwLock::new(None),
        }
    }

    /// Drop the cached entries. The table is repopulated on the next read;
    /// call this after the side-car file has been edited.
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    /// Load the table now. Reads the side-car file when one is configured;
    /// every lookup afterwards is a cache hit.
    pub fn warm(&self) {
        self.ensure_loaded();
    }

    /// Look up the C# type for a SQL type name, case-insensitive exact match.
    /// Returns the empty default entry when no mapping exists.
    #[must_use]
    pub fn csharp_type(&self, sql_type: &str) -> TypeMapping {
        self.ensure_loaded();
        let guard = self.cache.read();
        guard
            .as_deref()
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|m| m.sql_type.eq_ignore_ascii_case(sql_type))
            })
            .cloned()
            .unwrap_or_default()
    }

    /// Reverse lookup: map a CLR system type name back to a SQL type name.
    /// Falls back to returning the input unchanged when no mapping exists,
    /// so ad-hoc queries with unmapped CLR types still generate something.
    #[must_use]
    pub fn sql_type_by_system_type(&self, system_type: &str) -> String {
        self.ensure_loaded();
        let guard = self.cache.read();
        guard
            .as_deref()
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|m| m.system_type.eq_ignore_ascii_case(system_type))
            })
            .map_or_else(|| system_type.to_string(), |m| m.sql_type.clone())
    }

    /// Snapshot of every mapping, in table order
    #[must_use]
    pub fn mappings(&self) -> Vec<TypeMapping> {
        self.ensure_loaded();
        self.cache.read().clone().unwrap_or_default()
    }

    fn ensure_loaded(&self) {
        if self.cache.read().is_some() {
            return;
        }
        let entries = self.load();
        *self.cache.write() = Some(entries);
    }

    fn load(&self) -> Vec<TypeMapping> {
        let text = match &self.file {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(file = %path.display(), %err, "type conversion file unreadable, using built-in table");
                    BUILTIN_TABLE.to_string()
                }
            },
            None => BUILTIN_TABLE.to_string(),
        };

        let mut entries: Vec<TypeMapping> = match serde_json::from_str(&text) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(%err, "type conversion table malformed, using built-in table");
                serde_json::from_str(BUILTIN_TABLE).unwrap_or_default()
            }
        };
        for entry in &mut entries {
            entry.derive_id();
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_is_case_insensitive() {
        let table = TypeConversionTable::new();
        assert_eq!(table.csharp_type("NVARCHAR").csharp_type, "string");
        assert_eq!(table.csharp_type("Int").csharp_type, "int");
    }

    #[test]
    fn unknown_type_yields_empty_entry() {
        let table = TypeConversionTable::new();
        let entry = table.csharp_type("geography");
        assert!(entry.is_empty());
    }

    #[test]
    fn reference_types_are_nullable_by_default() {
        let table = TypeConversionTable::new();
        assert!(table.csharp_type("nvarchar").nullable_by_default);
        assert!(!table.csharp_type("int").nullable_by_default);
    }

    #[test]
    fn reverse_lookup_falls_back_to_input() {
        let table = TypeConversionTable::new();
        assert_eq!(table.sql_type_by_system_type("Int32"), "int");
        assert_eq!(table.sql_type_by_system_type("SqlHierarchyId"), "SqlHierarchyId");
    }

    #[test]
    fn ids_are_derived_from_the_type_names() {
        let table = TypeConversionTable::new();
        let a = table.csharp_type("int");
        let b = table.csharp_type("bigint");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), table.csharp_type("INT").id());
    }

    #[test]
    fn invalidate_reloads_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("types.json");
        std::fs::write(
            &path,
            r#"[{ "SqlType": "int", "CSharpType": "i32", "CSharpSystemType": "Int32", "IsNullable": false }]"#,
        )
        .expect("write side-car");

        let table = TypeConversionTable::with_file(&path);
        assert_eq!(table.csharp_type("int").csharp_type, "i32");

        std::fs::write(
            &path,
            r#"[{ "SqlType": "int", "CSharpType": "long", "CSharpSystemType": "Int64", "IsNullable": false }]"#,
        )
        .expect("rewrite side-car");

        // Still cached until invalidated
        assert_eq!(table.csharp_type("int").csharp_type, "i32");
        table.invalidate();
        assert_eq!(table.csharp_type("int").csharp_type, "long");
    }

    #[test]
    fn warm_reads_the_side_car_up_front() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("types.json");
        std::fs::write(
            &path,
            r#"[{ "SqlType": "int", "CSharpType": "i32", "CSharpSystemType": "Int32", "IsNullable": false }]"#,
        )
        .expect("write side-car");

        let table = TypeConversionTable::with_file(&path);
        table.warm();
        std::fs::remove_file(&path).expect("remove side-car");

        // Lookups hit the cache; the deleted file is not read again
        assert_eq!(table.csharp_type("int").csharp_type, "i32");
    }

    #[test]
    fn unreadable_file_degrades_to_builtins() {
        let table = TypeConversionTable::with_file("/nonexistent/types.json");
        assert_eq!(table.csharp_type("int").csharp_type, "int");
    }
}
