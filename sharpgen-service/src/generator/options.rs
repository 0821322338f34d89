//! Generation options
//!
//! Options are constructed only through [`ClassGenOptionsBuilder`], which
//! enforces the cross-field implications the flat options bag used to leave
//! to the caller: change notification requires a backing field, column
//! attributes require an EF model, and a table-name remark requires a
//! summary. The generator itself trusts the finished options.

use std::fmt;
use std::path::{Path, PathBuf};

/// Access modifier of the generated class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessModifier {
    /// `public`
    #[default]
    Public,
    /// `internal`
    Internal,
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// What kind of class is generated. Replaces the independent "EF attributes"
/// and "column attribute" booleans with mutually exclusive variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    /// Plain class, no data annotations
    #[default]
    Plain,
    /// EF model class: `[Table]`, `[Key]`, `[DataType]`, `[MaxLength]`
    EfModel,
    /// EF model class that additionally carries an explicit `[Column]`
    /// attribute on every property
    EfModelWithColumnAttributes,
}

impl ModelKind {
    /// Whether EF data annotations are emitted at all
    #[must_use]
    pub const fn ef_attributes(self) -> bool {
        !matches!(self, Self::Plain)
    }

    /// Whether every property carries an explicit `[Column]` attribute
    #[must_use]
    pub const fn column_attributes(self) -> bool {
        matches!(self, Self::EfModelWithColumnAttributes)
    }
}

/// Immutable-per-call configuration for a generation run
#[derive(Debug, Clone)]
pub struct ClassGenOptions {
    class_name: String,
    modifier: AccessModifier,
    sealed: bool,
    namespace: Option<String>,
    nullable: bool,
    backing_field: bool,
    change_notification: bool,
    kind: ModelKind,
    summary: bool,
    table_name_in_summary: bool,
    output_dir: Option<PathBuf>,
    empty_dir_first: bool,
    sql_query: Option<String>,
}

impl ClassGenOptions {
    /// Start building options for a class with the given name
    #[must_use]
    pub fn builder(class_name: impl Into<String>) -> ClassGenOptionsBuilder {
        ClassGenOptionsBuilder {
            options: Self {
                class_name: class_name.into(),
                modifier: AccessModifier::default(),
                sealed: false,
                namespace: None,
                nullable: false,
                backing_field: false,
                change_notification: false,
                kind: ModelKind::default(),
                summary: false,
                table_name_in_summary: false,
                output_dir: None,
                empty_dir_first: false,
                sql_query: None,
            },
        }
    }

    /// Clone these options with a different class name. Used by the batch
    /// exporter, which derives one name per table.
    #[must_use]
    pub fn for_class(&self, class_name: impl Into<String>) -> Self {
        let mut options = self.clone();
        options.class_name = class_name.into();
        options
    }

    /// Name of the generated class
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Access modifier
    #[must_use]
    pub fn modifier(&self) -> AccessModifier {
        self.modifier
    }

    /// Whether the class is sealed
    #[must_use]
    pub fn sealed(&self) -> bool {
        self.sealed
    }

    /// Namespace, if any
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether nullable output was requested for reference types
    #[must_use]
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Whether properties are backed by explicit fields
    #[must_use]
    pub fn backing_field(&self) -> bool {
        self.backing_field
    }

    /// Whether setters raise change notification
    #[must_use]
    pub fn change_notification(&self) -> bool {
        self.change_notification
    }

    /// Kind of class being generated
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Whether summary comments are emitted
    #[must_use]
    pub fn summary(&self) -> bool {
        self.summary
    }

    /// Whether the table name appears in the class summary
    #[must_use]
    pub fn table_name_in_summary(&self) -> bool {
        self.table_name_in_summary
    }

    /// Output directory for batch export
    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Whether the output directory is emptied before batch export
    #[must_use]
    pub fn empty_dir_first(&self) -> bool {
        self.empty_dir_first
    }

    /// Raw SQL query for ad-hoc mode
    #[must_use]
    pub fn sql_query(&self) -> Option<&str> {
        self.sql_query.as_deref()
    }
}

/// Builder for [`ClassGenOptions`]
#[derive(Debug, Clone)]
pub struct ClassGenOptionsBuilder {
    options: ClassGenOptions,
}

impl ClassGenOptionsBuilder {
    /// Set the access modifier
    #[must_use]
    pub fn modifier(mut self, modifier: AccessModifier) -> Self {
        self.options.modifier = modifier;
        self
    }

    /// Mark the class sealed
    #[must_use]
    pub fn sealed(mut self, sealed: bool) -> Self {
        self.options.sealed = sealed;
        self
    }

    /// Set the namespace; empty input clears it
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.options.namespace = if namespace.trim().is_empty() {
            None
        } else {
            Some(namespace)
        };
        self
    }

    /// Request nullable output for reference types
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.options.nullable = nullable;
        self
    }

    /// Back properties with explicit fields. Disabling also disables change
    /// notification, which cannot exist without a backing field.
    #[must_use]
    pub fn backing_field(mut self, backing_field: bool) -> Self {
        self.options.backing_field = backing_field;
        if !backing_field {
            self.options.change_notification = false;
        }
        self
    }

    /// Raise change notification in setters; implies a backing field
    #[must_use]
    pub fn change_notification(mut self, change_notification: bool) -> Self {
        self.options.change_notification = change_notification;
        if change_notification {
            self.options.backing_field = true;
        }
        self
    }

    /// Set the kind of class being generated
    #[must_use]
    pub fn kind(mut self, kind: ModelKind) -> Self {
        self.options.kind = kind;
        self
    }

    /// Emit summary comments
    #[must_use]
    pub fn summary(mut self, summary: bool) -> Self {
        self.options.summary = summary;
        if !summary {
            self.options.table_name_in_summary = false;
        }
        self
    }

    /// Mention the table name in the class summary; implies summaries
    #[must_use]
    pub fn table_name_in_summary(mut self, table_name_in_summary: bool) -> Self {
        self.options.table_name_in_summary = table_name_in_summary;
        if table_name_in_summary {
            self.options.summary = true;
        }
        self
    }

    /// Set the batch export output directory
    #[must_use]
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.options.output_dir = Some(output_dir.into());
        self
    }

    /// Empty the output directory before batch export
    #[must_use]
    pub fn empty_dir_first(mut self, empty_dir_first: bool) -> Self {
        self.options.empty_dir_first = empty_dir_first;
        self
    }

    /// Set the raw SQL query for ad-hoc mode
    #[must_use]
    pub fn sql_query(mut self, sql_query: impl Into<String>) -> Self {
        self.options.sql_query = Some(sql_query.into());
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> ClassGenOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_notification_implies_backing_field() {
        let options = ClassGenOptions::builder("Person")
            .change_notification(true)
            .build();
        assert!(options.backing_field());

        let options = ClassGenOptions::builder("Person")
            .change_notification(true)
            .backing_field(false)
            .build();
        assert!(!options.change_notification());
    }

    #[test]
    fn table_name_in_summary_implies_summary() {
        let options = ClassGenOptions::builder("Person")
            .table_name_in_summary(true)
            .build();
        assert!(options.summary());
    }

    #[test]
    fn empty_namespace_is_cleared() {
        let options = ClassGenOptions::builder("Person").namespace("  ").build();
        assert!(options.namespace().is_none());
    }

    #[test]
    fn model_kind_flags() {
        assert!(!ModelKind::Plain.ef_attributes());
        assert!(ModelKind::EfModel.ef_attributes());
        assert!(!ModelKind::EfModel.column_attributes());
        assert!(ModelKind::EfModelWithColumnAttributes.column_attributes());
    }
}
