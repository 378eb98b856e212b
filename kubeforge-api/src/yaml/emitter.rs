//! Renders [`YamlValue`] trees as block-style YAML

use super::{Mapping, YamlValue};

/// Separator placed between documents of a multi-document stream
pub const DOCUMENT_SEPARATOR: &str = "\n---\n";

const SPECIAL_CHARS: [char; 17] = [
    ':', '#', '*', '?', '[', ']', '{', '}', '|', '>', '@', '&', '!', '%', '`', '"', '\'',
];

/// Plain scalars a YAML parser would not read back as a string
const TYPED_WORDS: [&str; 22] = [
    "true", "True", "TRUE", "false", "False", "FALSE", "yes", "Yes", "YES", "no", "No", "NO",
    "on", "On", "ON", "off", "Off", "OFF", "null", "Null", "NULL", "~",
];

/// Whether a string scalar has to be double-quoted
pub fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value == "*"
        || value.contains(SPECIAL_CHARS)
        || value.contains('\\')
        || value.starts_with(' ')
        || value.ends_with(' ')
        || value.contains(['\n', '\r', '\t'])
        || reads_as_non_string(value)
        || starts_with_indicator(value)
}

fn reads_as_non_string(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let special_float = unsigned.to_ascii_lowercase();

    TYPED_WORDS.contains(&value)
        || value.parse::<i64>().is_ok()
        || value.parse::<f64>().is_ok()
        || special_float == ".inf"
        || special_float == ".nan"
        || ["0x", "0o", "0b"].iter().any(|prefix| unsigned.starts_with(prefix))
}

fn starts_with_indicator(value: &str) -> bool {
    value == "-" || value.starts_with("- ") || value.starts_with("---") || value.starts_with(',')
}

/// Double-quote a scalar, escaping the characters that are special inside quotes
pub fn quote_scalar(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn format_str(value: &str) -> String {
    if needs_quoting(value) {
        quote_scalar(value)
    } else {
        value.to_string()
    }
}

fn format_scalar(value: &YamlValue) -> String {
    match value {
        YamlValue::Null => "null".to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Int(i) => i.to_string(),
        YamlValue::Float(f) => f.to_string(),
        YamlValue::Str(s) => format_str(s),
        YamlValue::Seq(items) if items.is_empty() => "[]".to_string(),
        YamlValue::Map(map) if map.is_empty() => "{}".to_string(),
        // Non-empty collections never reach here
        YamlValue::Seq(_) | YamlValue::Map(_) => String::new(),
    }
}

fn padding(indent: usize) -> String {
    "  ".repeat(indent)
}

/// Render a value.
///
/// A mapping renders as a block of `key: value` lines indented by
/// `indent_level` steps of two spaces; a top-level sequence renders as a
/// multi-document stream; a scalar renders as its inline form.
pub fn render(value: &YamlValue, indent_level: usize) -> String {
    match value {
        YamlValue::Map(map) => {
            let mut buf = String::new();
            write_mapping(map, indent_level, &mut buf);
            buf
        }
        YamlValue::Seq(documents) => render_documents(documents),
        scalar => format_scalar(scalar),
    }
}

/// Render each document and join them with `---`; no trailing separator
pub fn render_documents(documents: &[YamlValue]) -> String {
    documents
        .iter()
        .map(|doc| render(doc, 0))
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}

fn write_mapping(map: &Mapping, indent: usize, buf: &mut String) {
    let pad = padding(indent);

    for (key, value) in map.iter() {
        match value {
            YamlValue::Null => continue,
            YamlValue::Map(nested) if !nested.is_empty() => {
                buf.push_str(&format!("{}{}:\n", pad, format_str(key)));
                write_mapping(nested, indent + 1, buf);
            }
            YamlValue::Seq(items) if !items.is_empty() => {
                buf.push_str(&format!("{}{}:\n", pad, format_str(key)));
                write_sequence(items, indent, buf);
            }
            scalar => {
                buf.push_str(&format!("{}{}: {}\n", pad, format_str(key), format_scalar(scalar)));
            }
        }
    }
}

/// Items of a sequence that belongs to a key at `indent`
fn write_sequence(items: &[YamlValue], indent: usize, buf: &mut String) {
    let pad = padding(indent);

    for item in items {
        match item {
            YamlValue::Map(map) if !map.is_empty() => {
                buf.push_str(&format!("{}  -\n", pad));
                write_mapping(map, indent + 2, buf);
            }
            YamlValue::Seq(nested) if !nested.is_empty() => {
                buf.push_str(&format!("{}  -\n", pad));
                write_sequence(nested, indent + 1, buf);
            }
            scalar => {
                buf.push_str(&format!("{}  - {}\n", pad, format_scalar(scalar)));
            }
        }
    }
}
