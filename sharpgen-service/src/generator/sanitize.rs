//! Identifier sanitization for generated C# code
//!
//! Pure functions that clean column, namespace and table names before they
//! become C# identifiers. All replacements are literal substring rules
//! applied in order; none of the functions performs I/O.

/// Fallback identifier used when a cleaned name is empty or starts with a
/// digit
const FALLBACK_NAME: &str = "Column";

/// Ordered replacement list shared by the column and class name sanitizers.
/// The underscore rule is optional because the class name sanitizer must not
/// strip underscores a second time after it already split on them.
fn replacements(include_underscore: bool) -> Vec<(&'static str, &'static str)> {
    let mut list = vec![
        (" ", ""),
        ("ä", "ae"),
        ("ö", "oe"),
        ("ü", "ue"),
        ("Ä", "Ae"),
        ("Ö", "Oe"),
        ("Ü", "Ue"),
        ("ß", "ss"),
    ];
    if include_underscore {
        list.push(("_", ""));
    }
    list
}

fn apply_replacements(name: &str, include_underscore: bool) -> String {
    let mut result = name.to_string();
    for (from, to) in replacements(include_underscore) {
        result = result.replace(from, to);
    }
    result
}

/// Uppercase the first character of a string, leaving the rest untouched
fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first character of a string, leaving the rest untouched
pub(crate) fn lowercase_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Clean a column name so it forms a valid C# identifier.
///
/// Applies the literal replacement list (spaces removed, umlauts and `ß`
/// transliterated, underscores removed). An empty result yields the literal
/// `Column`; a result starting with a digit is prefixed with `Column`.
///
/// The function is idempotent: cleaning an already clean name is a no-op.
#[must_use]
pub fn clean_column_name(name: &str) -> String {
    let cleaned = apply_replacements(name, true);
    if cleaned.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    if cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("{FALLBACK_NAME}{cleaned}")
    } else {
        cleaned
    }
}

/// Clean a namespace: each dot-separated segment loses its spaces and gets
/// its first character uppercased.
#[must_use]
pub fn clean_namespace(name: &str) -> String {
    name.split('.')
        .map(|segment| capitalize_first(&segment.replace(' ', "")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Derive a class name from a table name.
///
/// A name containing underscores is treated as `snake_case` and converted to
/// `PascalCase`; afterwards the replacement list runs WITHOUT the underscore
/// rule (the split already consumed every underscore, and a second pass must
/// not alter segments further). A name without underscores only gets its
/// first character uppercased before the full replacement list runs. The two
/// branches intentionally build their replacement lists differently.
#[must_use]
pub fn class_name_from_table(table_name: &str) -> String {
    if table_name.contains('_') {
        let joined: String = table_name.split('_').map(capitalize_first).collect();
        apply_replacements(&joined, false)
    } else {
        apply_replacements(&capitalize_first(table_name), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_column_name_removes_illegal_characters() {
        assert_eq!(clean_column_name("First Name"), "FirstName");
        assert_eq!(clean_column_name("Straße"), "Strasse");
        assert_eq!(clean_column_name("Größe"), "Groesse");
        assert_eq!(clean_column_name("user_id"), "userid");
    }

    #[test]
    fn clean_column_name_is_idempotent() {
        for input in ["First Name", "Straße", "Übung", "3rd_party", "", "  "] {
            let once = clean_column_name(input);
            assert_eq!(clean_column_name(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(clean_column_name(""), "Column");
        assert_eq!(clean_column_name(" "), "Column");
        assert_eq!(clean_column_name("_"), "Column");
    }

    #[test]
    fn digit_prefixed_names_get_fallback_prefix() {
        assert_eq!(clean_column_name("3rdParty"), "Column3rdParty");
        assert_eq!(clean_column_name(" 42"), "Column42");
    }

    #[test]
    fn clean_namespace_capitalizes_segments() {
        assert_eq!(clean_namespace("my app.data"), "Myapp.Data");
        assert_eq!(clean_namespace("contoso.models"), "Contoso.Models");
    }

    #[test]
    fn class_name_converts_snake_case() {
        assert_eq!(class_name_from_table("order_line_item"), "OrderLineItem");
        assert_eq!(class_name_from_table("customer"), "Customer");
    }

    #[test]
    fn class_name_branches_differ_on_replacement_list() {
        // Underscore branch: spaces are still removed after joining
        assert_eq!(class_name_from_table("order_li ne"), "OrderLine");
        // Non-underscore branch: umlauts transliterated after capitalization
        assert_eq!(class_name_from_table("übung"), "Uebung");
    }
}
