//! C# class generation from table metadata
//!
//! The core of the service: turns an enriched [`TableDefinition`] and a
//! [`ClassGenOptions`] bag into a class source string, an optional EF
//! composite-key snippet, and an optional SQL SELECT statement reconstructing
//! the same projection. Designed to be exception-light: unmapped SQL types
//! degrade to the raw type name, duplicate output identifiers are reported
//! but never block generation.

use super::options::ClassGenOptions;
use super::sanitize::{clean_column_name, clean_namespace, lowercase_first};
use super::template::{ClassTemplateKey, PropertyTemplateKey, Substitutions, TemplateStore, Token};
use super::traits::{ClassGenResult, GeneratorError, GeneratorResult};
use super::type_map::TypeConversionTable;
use sharpgen_core::traits::QueryExecutor;
use sharpgen_core::types::{ColumnDefinition, TableDefinition, TableKind};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Attribute emission priority. `[Key]` always precedes `[Column]`, which
/// precedes `[DataType]`/`[MaxLength]`, regardless of which options
/// triggered each.
const PRIORITY_KEY: u8 = 1;
const PRIORITY_COLUMN: u8 = 2;
const PRIORITY_DATA: u8 = 3;

/// SQL types whose declared length is emitted as `[MaxLength]`
const LENGTH_TYPES: [&str; 6] = ["char", "nchar", "varchar", "nvarchar", "binary", "varbinary"];

/// Warning banner attached to the result when two output properties resolve
/// to the same identifier
const DUPLICATE_NAME_WARNING: &str =
    "Duplicate property names detected. Rename or deselect the affected columns before using the generated code.";

/// C# class generator
pub struct CSharpClassGenerator {
    templates: Arc<TemplateStore>,
    types: Arc<TypeConversionTable>,
}

impl CSharpClassGenerator {
    /// Create a generator using the given template store and type conversion
    /// table. Both are shared so the owning component can invalidate their
    /// caches directly after a settings edit.
    #[must_use]
    pub fn new(templates: Arc<TemplateStore>, types: Arc<TypeConversionTable>) -> Self {
        Self { templates, types }
    }

    /// The template store backing this generator
    #[must_use]
    pub fn templates(&self) -> &Arc<TemplateStore> {
        &self.templates
    }

    /// The type conversion table backing this generator
    #[must_use]
    pub fn types(&self) -> &Arc<TypeConversionTable> {
        &self.types
    }

    /// Generate a class from an enriched table.
    ///
    /// For table types the EF key and SQL query steps are skipped; both come
    /// back as empty strings, as they do when there is no primary key.
    ///
    /// # Errors
    /// Generation itself does not fail by design; the `Result` is kept for
    /// API symmetry with the ad-hoc and batch paths.
    pub fn generate(
        &self,
        options: &ClassGenOptions,
        table: &TableDefinition,
        create_sql_query: bool,
        info_text: &str,
    ) -> GeneratorResult<ClassGenResult> {
        self.generate_inner(options, table, create_sql_query, true, info_text)
    }

    pub(crate) fn generate_inner(
        &self,
        options: &ClassGenOptions,
        table: &TableDefinition,
        create_sql_query: bool,
        create_key_code: bool,
        info_text: &str,
    ) -> GeneratorResult<ClassGenResult> {
        debug!(class = options.class_name(), table = %table.name, "generating class");

        let columns = table.selected_columns();

        let mut property_blocks = Vec::new();
        let mut output_names = Vec::new();
        for column in &columns {
            let (rendered, name) = self.generate_column(options, column);
            property_blocks.push(rendered);
            output_names.push(name);
        }

        let mut seen = HashSet::new();
        let has_duplicate_names = output_names.iter().any(|name| !seen.insert(name.clone()));

        let code = self.generate_class(options, table, &property_blocks);

        let (ef_key_code, ef_key_code_short) = if create_key_code && table.kind == TableKind::Table
        {
            self.generate_ef_key_code(options, &columns)
        } else {
            (String::new(), String::new())
        };

        let sql_query = if create_sql_query && table.kind == TableKind::Table {
            Self::generate_sql_query(table, &columns)
        } else {
            String::new()
        };

        let mut info = info_text.to_string();
        if has_duplicate_names {
            if !info.is_empty() {
                info.push('\n');
            }
            info.push_str(DUPLICATE_NAME_WARNING);
        }

        Ok(ClassGenResult {
            code,
            ef_key_code,
            ef_key_code_short,
            sql_query,
            info_text: info,
            has_duplicate_names,
        })
    }

    /// Generate one property from a column. Returns the rendered property
    /// text and the output identifier used for duplicate detection.
    fn generate_column(
        &self,
        options: &ClassGenOptions,
        column: &ColumnDefinition,
    ) -> (String, String) {
        let name = column
            .alias
            .as_deref()
            .filter(|alias| !alias.trim().is_empty())
            .map_or_else(|| clean_column_name(&column.name), ToString::to_string);

        let entry = self.types.csharp_type(&column.sql_type);
        let cs_type = if entry.is_empty() {
            column.sql_type.clone()
        } else {
            entry.csharp_type.clone()
        };

        // Value types become nullable whenever the column allows NULL;
        // reference types only when nullable output was requested.
        let nullable_suffix =
            column.nullable && (!entry.nullable_by_default || options.nullable());

        let attributes = Self::column_attributes(options, column);

        let mut template = self.templates.property_template(PropertyTemplateKey {
            has_summary: options.summary(),
            has_backing_field: options.backing_field(),
            has_change_notification: options.change_notification(),
        });
        if cs_type == "string" && options.nullable() && !nullable_suffix {
            template = template.with_string_default();
        }

        let subs = Substitutions::new()
            .set(Token::Name, name.clone())
            .set(Token::Name2, format!("_{}", lowercase_first(&name)))
            .set(Token::Type, cs_type)
            .set(Token::Nullable, if nullable_suffix { "?" } else { "" })
            .set_block(Token::Attributes, attributes);

        (template.render(&subs), name)
    }

    /// Ordered attribute list for a column, in fixed priority order
    fn column_attributes(options: &ClassGenOptions, column: &ColumnDefinition) -> Vec<String> {
        if !options.kind().ef_attributes() {
            return Vec::new();
        }

        let mut attributes: Vec<(u8, String)> = Vec::new();
        if column.primary_key {
            attributes.push((PRIORITY_KEY, "[Key]".to_string()));
        }
        if options.kind().column_attributes() {
            attributes.push((PRIORITY_COLUMN, format!("[Column(\"{}\")]", column.name)));
        }
        if column.sql_type.eq_ignore_ascii_case("date") {
            attributes.push((PRIORITY_DATA, "[DataType(DataType.Date)]".to_string()));
        }
        if LENGTH_TYPES
            .iter()
            .any(|t| column.sql_type.eq_ignore_ascii_case(t))
            && column.max_length > 0
        {
            attributes.push((PRIORITY_DATA, format!("[MaxLength({})]", column.max_length)));
        }

        attributes.sort_by_key(|(priority, _)| *priority);
        attributes.into_iter().map(|(_, text)| text).collect()
    }

    /// Assemble the class source from the rendered properties
    fn generate_class(
        &self,
        options: &ClassGenOptions,
        table: &TableDefinition,
        property_blocks: &[String],
    ) -> String {
        let template = self.templates.class_template(ClassTemplateKey {
            has_namespace: options.namespace().is_some(),
            has_summary: options.summary(),
        });

        let mut property_lines = Vec::new();
        for (index, block) in property_blocks.iter().enumerate() {
            if index > 0 {
                property_lines.push(String::new());
            }
            property_lines.extend(block.lines().map(ToString::to_string));
        }

        let mut subs = Substitutions::new()
            .set(Token::Modifier, options.modifier().to_string())
            .set(Token::Sealed, if options.sealed() { "sealed " } else { "" })
            .set(Token::Name, options.class_name())
            .set(
                Token::Inherits,
                if options.change_notification() {
                    " : ObservableObject"
                } else {
                    ""
                },
            )
            .set_block(Token::Attributes, Self::class_attributes(options, table))
            .set_block(Token::Properties, property_lines);
        if let Some(namespace) = options.namespace() {
            subs = subs.set(Token::Namespace, clean_namespace(namespace));
        }

        template.render(&subs)
    }

    /// Ordered remark/attribute list above the class declaration
    fn class_attributes(options: &ClassGenOptions, table: &TableDefinition) -> Vec<String> {
        let mut attributes: Vec<(u8, String)> = Vec::new();
        if options.table_name_in_summary() {
            attributes.push((
                PRIORITY_KEY,
                format!("/// <remarks>Table: {}</remarks>", Self::qualified_name(table)),
            ));
        }
        if options.kind().ef_attributes() {
            let attribute = if table.schema.is_empty() {
                format!("[Table(\"{}\")]", table.name)
            } else {
                format!("[Table(\"{}\", Schema = \"{}\")]", table.name, table.schema)
            };
            attributes.push((PRIORITY_COLUMN, attribute));
        }

        attributes.sort_by_key(|(priority, _)| *priority);
        attributes.into_iter().map(|(_, text)| text).collect()
    }

    fn qualified_name(table: &TableDefinition) -> String {
        if table.schema.is_empty() {
            format!("[{}]", table.name)
        } else {
            format!("[{}].[{}]", table.schema, table.name)
        }
    }

    /// EF composite-key snippet for the primary-key columns; empty strings
    /// when no column is marked primary key
    fn generate_ef_key_code(
        &self,
        options: &ClassGenOptions,
        columns: &[&ColumnDefinition],
    ) -> (String, String) {
        let key_names: Vec<String> = columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| {
                c.alias
                    .as_deref()
                    .filter(|alias| !alias.trim().is_empty())
                    .map_or_else(|| clean_column_name(&c.name), ToString::to_string)
            })
            .collect();

        if key_names.is_empty() {
            return (String::new(), String::new());
        }

        let expression = if key_names.len() == 1 {
            format!("e => e.{}", key_names[0])
        } else {
            let members: Vec<String> = key_names.iter().map(|n| format!("e.{n}")).collect();
            format!("e => new {{ {} }}", members.join(", "))
        };
        let short = format!("entity.HasKey({expression});");

        let full = self.templates.model_builder_template().render(
            &Substitutions::new()
                .set(Token::Name, options.class_name())
                .set_block(Token::Entries, vec![short.clone()]),
        );

        (full, short)
    }

    /// SQL SELECT statement covering the same projection as the class
    fn generate_sql_query(table: &TableDefinition, columns: &[&ColumnDefinition]) -> String {
        let schema = if table.schema.is_empty() {
            "dbo"
        } else {
            table.schema.as_str()
        };

        let mut lines = vec!["SELECT".to_string()];
        for (index, column) in columns.iter().enumerate() {
            let mut line = match column
                .alias
                .as_deref()
                .filter(|alias| !alias.trim().is_empty())
            {
                Some(alias) => format!("    [{}] AS [{}]", column.name, alias),
                None => format!("    [{}]", column.name),
            };
            if index < columns.len() - 1 {
                line.push(',');
            }
            lines.push(line);
        }
        lines.push("FROM".to_string());
        lines.push(format!("    [{}].[{}]", schema, table.name));

        let mut query = lines.join("\n");
        query.push('\n');
        query
    }

    /// Reverse-engineer a class from an ad-hoc SQL query.
    ///
    /// The query is executed against an empty result shape (a `WHERE 0 = 1`
    /// clause is appended when the query has none) so only column metadata is
    /// fetched. Runtime type names are mapped back to SQL type names so the
    /// normal emission path can be reused; every result column takes part in
    /// the output.
    ///
    /// # Errors
    /// Returns an error if the options carry no query or execution fails
    pub async fn generate_from_query(
        &self,
        options: &ClassGenOptions,
        executor: &dyn QueryExecutor,
    ) -> GeneratorResult<ClassGenResult> {
        let query = options.sql_query().ok_or_else(|| {
            GeneratorError::Generation("ad-hoc mode requires a SQL query".to_string())
        })?;

        let shaped = if query.to_lowercase().contains("where") {
            query.to_string()
        } else {
            format!("{} WHERE 0 = 1", query.trim_end())
        };
        debug!(query = %shaped, "loading ad-hoc query metadata");

        let metadata = executor.query_metadata(&shaped).await?;

        let mut seen = HashSet::new();
        let unique_error = metadata.iter().any(|c| !seen.insert(c.name.clone()));

        let columns: Vec<ColumnDefinition> = metadata
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let sql_type = self.types.sql_type_by_system_type(&column.system_type);
                let ordinal = i32::try_from(index + 1).unwrap_or(i32::MAX);
                ColumnDefinition::new(column.name.clone(), sql_type, ordinal)
                    .with_nullable(column.nullable)
            })
            .collect();

        let mut table = TableDefinition::new(options.class_name(), "");
        table.set_columns(columns);
        table.column_name_collision = unique_error;

        let mut result = self.generate_inner(options, &table, false, true, "")?;
        if unique_error && !result.has_duplicate_names {
            result.has_duplicate_names = true;
            if !result.info_text.is_empty() {
                result.info_text.push('\n');
            }
            result.info_text.push_str(DUPLICATE_NAME_WARNING);
        }
        Ok(result)
    }
}
