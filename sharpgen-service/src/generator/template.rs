//! Template store for generated C# code
//!
//! Templates are plain text with `$TOKEN$` placeholders. Instead of textual
//! line-splitting, each template is parsed once into a structured model: an
//! ordered list of lines, where a line is either literal text with inline
//! slots or a block slot standing alone on its line. Block slots
//! (`$ATTRIBUTES$`, `$PROPERTIES$`, `$ENTRIES$`) expand to zero or more
//! indented lines and disappear entirely when their fill is empty.
//!
//! Built-in templates ship with the crate; a user directory can override any
//! of them by file name. [`reload`] drops the cache so edited files are
//! picked up; the owning component calls it directly after an edit.
//!
//! [`reload`]: TemplateStore::reload

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

/// Placeholder tokens recognized inside templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Namespace of the generated class
    Namespace,
    /// Class or property name
    Name,
    /// Backing field name
    Name2,
    /// C# type of a property
    Type,
    /// Literal `?` for nullable output, empty otherwise
    Nullable,
    /// Access modifier (`public`, `internal`)
    Modifier,
    /// Literal `sealed ` or empty
    Sealed,
    /// Inheritance clause, including the leading ` : `
    Inherits,
    /// Block: attribute and remark lines
    Attributes,
    /// Block: property lines
    Properties,
    /// Block: statement lines inside a model builder body
    Entries,
}

impl Token {
    fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "$NAMESPACE$" => Some(Self::Namespace),
            "$NAME$" => Some(Self::Name),
            "$NAME2$" => Some(Self::Name2),
            "$TYPE$" => Some(Self::Type),
            "$NULLABLE$" => Some(Self::Nullable),
            "$MODIFIER$" => Some(Self::Modifier),
            "$SEALED$" => Some(Self::Sealed),
            "$INHERITS$" => Some(Self::Inherits),
            "$ATTRIBUTES$" => Some(Self::Attributes),
            "$PROPERTIES$" => Some(Self::Properties),
            "$ENTRIES$" => Some(Self::Entries),
            _ => None,
        }
    }

    /// Whether the token expands to whole lines rather than inline text
    #[must_use]
    pub const fn is_block(self) -> bool {
        matches!(self, Self::Attributes | Self::Properties | Self::Entries)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Token),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Text(Vec<Segment>),
    Block { indent: String, token: Token },
}

/// Values and block fills substituted into a template
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    values: HashMap<Token, String>,
    blocks: HashMap<Token, Vec<String>>,
}

impl Substitutions {
    /// Create an empty substitution set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an inline token value
    #[must_use]
    pub fn set(mut self, token: Token, value: impl Into<String>) -> Self {
        self.values.insert(token, value.into());
        self
    }

    /// Set a block token fill; each entry becomes one line
    #[must_use]
    pub fn set_block(mut self, token: Token, lines: Vec<String>) -> Self {
        self.blocks.insert(token, lines);
        self
    }
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    lines: Vec<Line>,
}

impl Template {
    /// Parse template text into the structured model. Unrecognized `$...$`
    /// markers stay literal.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|raw| {
                let trimmed = raw.trim();
                if let Some(token) = Token::from_marker(trimmed) {
                    if token.is_block() {
                        let indent_len = raw.len() - raw.trim_start().len();
                        return Line::Block {
                            indent: raw[..indent_len].to_string(),
                            token,
                        };
                    }
                }
                Line::Text(Self::parse_segments(raw))
            })
            .collect();
        Self { lines }
    }

    fn parse_segments(line: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = line;

        while let Some(start) = rest.find('$') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('$') else {
                break;
            };
            let marker = &rest[start..start + end + 2];
            if let Some(token) = Token::from_marker(marker) {
                literal.push_str(&rest[..start]);
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Slot(token));
                rest = &rest[start + end + 2..];
            } else {
                // Not one of ours; keep the first '$' literal and move on
                literal.push_str(&rest[..=start]);
                rest = &rest[start + 1..];
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        segments
    }

    /// Render the template with the given substitutions. Missing inline
    /// values render empty; missing or empty block fills drop the line.
    #[must_use]
    pub fn render(&self, subs: &Substitutions) -> String {
        let mut out = Vec::new();
        for line in &self.lines {
            match line {
                Line::Text(segments) => {
                    let mut rendered = String::new();
                    for segment in segments {
                        match segment {
                            Segment::Literal(text) => rendered.push_str(text),
                            Segment::Slot(token) => {
                                if let Some(value) = subs.values.get(token) {
                                    rendered.push_str(value);
                                }
                            }
                        }
                    }
                    out.push(rendered);
                }
                Line::Block { indent, token } => {
                    let Some(fill) = subs.blocks.get(token) else {
                        continue;
                    };
                    for fill_line in fill {
                        if fill_line.is_empty() {
                            out.push(String::new());
                        } else {
                            out.push(format!("{indent}{fill_line}"));
                        }
                    }
                }
            }
        }
        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    /// Append a `= string.Empty;` initializer to the declaration carrying the
    /// name token: the backing field declaration when the template has one,
    /// the auto-property line otherwise. When neither line can be located the
    /// template is returned unchanged.
    #[must_use]
    pub fn with_string_default(&self) -> Self {
        let mut copy = self.clone();

        // Backing field declaration: `private $TYPE$$NULLABLE$ $NAME2$;`
        for line in &mut copy.lines {
            if let Line::Text(segments) = line {
                let has_type = segments.contains(&Segment::Slot(Token::Type));
                let has_field = segments.contains(&Segment::Slot(Token::Name2));
                if has_type && has_field {
                    if let Some(Segment::Literal(text)) = segments.last_mut() {
                        if let Some(stripped) = text.strip_suffix(';') {
                            *text = format!("{stripped} = string.Empty;");
                            return copy;
                        }
                    }
                }
            }
        }

        // Auto-property: `public $TYPE$$NULLABLE$ $NAME$ { get; set; }`
        for line in &mut copy.lines {
            if let Line::Text(segments) = line {
                let has_type = segments.contains(&Segment::Slot(Token::Type));
                let has_name = segments.contains(&Segment::Slot(Token::Name));
                if has_type && has_name {
                    segments.push(Segment::Literal(" = string.Empty;".to_string()));
                    return copy;
                }
            }
        }

        copy
    }
}

/// Selects a class template: 2 booleans, 4 variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassTemplateKey {
    /// Whether the class lives in a namespace
    pub has_namespace: bool,
    /// Whether a summary comment is emitted
    pub has_summary: bool,
}

/// Selects a property template: 3 booleans. Change notification implies a
/// backing field; the unrepresentable combination without one is normalized
/// to the notification variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyTemplateKey {
    /// Whether a summary comment is emitted
    pub has_summary: bool,
    /// Whether the property is backed by an explicit field
    pub has_backing_field: bool,
    /// Whether the setter raises change notification
    pub has_change_notification: bool,
}

struct TemplateSet {
    class_default: Template,
    class_default_comment: Template,
    class_ns: Template,
    class_ns_comment: Template,
    property_default: Template,
    property_default_comment: Template,
    property_backing_field: Template,
    property_backing_field_comment: Template,
    property_notify: Template,
    property_notify_comment: Template,
    model_builder: Template,
}

macro_rules! builtin {
    ($name:literal) => {
        include_str!(concat!("../../resources/templates/", $name))
    };
}

/// Template store with built-in defaults and optional on-disk overrides
#[derive(Default)]
pub struct TemplateStore {
    /// Directory with user-edited overrides, matched by file name
    dir: Option<PathBuf>,
    cache: RwLock<Option<std::sync::Arc<TemplateSet>>>,
}

impl TemplateStore {
    /// Create a store serving the built-in templates
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that prefers templates found in the given directory
    #[must_use]
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            cache: RwLock::new(None),
        }
    }

    /// Drop the cached templates so edited files are re-read on next use
    pub fn reload(&self) {
        *self.cache.write() = None;
    }

    /// Load the templates now. Reads from disk when overrides are
    /// configured; every lookup afterwards is a cache hit.
    pub fn warm(&self) {
        self.ensure_loaded();
    }

    /// Class template for the given option combination
    #[must_use]
    pub fn class_template(&self, key: ClassTemplateKey) -> Template {
        let set = self.ensure_loaded();
        match (key.has_namespace, key.has_summary) {
            (false, false) => set.class_default.clone(),
            (false, true) => set.class_default_comment.clone(),
            (true, false) => set.class_ns.clone(),
            (true, true) => set.class_ns_comment.clone(),
        }
    }

    /// Property template for the given option combination
    #[must_use]
    pub fn property_template(&self, key: PropertyTemplateKey) -> Template {
        let set = self.ensure_loaded();
        match (key.has_change_notification, key.has_backing_field, key.has_summary) {
            (true, _, false) => set.property_notify.clone(),
            (true, _, true) => set.property_notify_comment.clone(),
            (false, true, false) => set.property_backing_field.clone(),
            (false, true, true) => set.property_backing_field_comment.clone(),
            (false, false, false) => set.property_default.clone(),
            (false, false, true) => set.property_default_comment.clone(),
        }
    }

    /// Template wrapping EF key statements in a model builder body
    #[must_use]
    pub fn model_builder_template(&self) -> Template {
        self.ensure_loaded().model_builder.clone()
    }

    fn ensure_loaded(&self) -> std::sync::Arc<TemplateSet> {
        if let Some(set) = self.cache.read().as_ref() {
            return std::sync::Arc::clone(set);
        }
        let set = std::sync::Arc::new(self.load());
        *self.cache.write() = Some(std::sync::Arc::clone(&set));
        set
    }

    fn load(&self) -> TemplateSet {
        TemplateSet {
            class_default: self.load_one("class_default.txt", builtin!("class_default.txt")),
            class_default_comment: self
                .load_one("class_default_comment.txt", builtin!("class_default_comment.txt")),
            class_ns: self.load_one("class_ns.txt", builtin!("class_ns.txt")),
            class_ns_comment: self.load_one("class_ns_comment.txt", builtin!("class_ns_comment.txt")),
            property_default: self.load_one("property_default.txt", builtin!("property_default.txt")),
            property_default_comment: self.load_one(
                "property_default_comment.txt",
                builtin!("property_default_comment.txt"),
            ),
            property_backing_field: self.load_one(
                "property_backing_field.txt",
                builtin!("property_backing_field.txt"),
            ),
            property_backing_field_comment: self.load_one(
                "property_backing_field_comment.txt",
                builtin!("property_backing_field_comment.txt"),
            ),
            property_notify: self.load_one("property_notify.txt", builtin!("property_notify.txt")),
            property_notify_comment: self
                .load_one("property_notify_comment.txt", builtin!("property_notify_comment.txt")),
            model_builder: self.load_one("model_builder.txt", builtin!("model_builder.txt")),
        }
    }

    fn load_one(&self, name: &str, builtin: &str) -> Template {
        if let Some(dir) = &self.dir {
            let path = dir.join(name);
            if path.is_file() {
                match std::fs::read_to_string(&path) {
                    Ok(text) => return Template::parse(&text),
                    Err(err) => {
                        warn!(file = %path.display(), %err, "template override unreadable, using built-in");
                    }
                }
            }
        }
        Template::parse(builtin)
    }
}
