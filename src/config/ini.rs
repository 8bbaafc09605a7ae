//! INI reader producing a [`ConfigDocument`].
//!
//! Follows the conventions of the classic INI dialect the writer targets:
//! `[section]` headers, `key=value` or `key: value` options, full-line `#`
//! and `;` comments, indented continuation lines, and an optional
//! `[DEFAULT]` section whose options every other section inherits.
use std::io;
use std::path::Path;

use super::{ConfigDocument, Section};
use crate::error::ConfigError;

/// Name of the section whose options are inherited by all other sections.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Source name used in errors for in-memory input.
const STRING_SOURCE: &str = "<string>";

/// Read and parse a config file.
///
/// A missing file yields an empty document.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, or a
/// syntax error ([`ConfigError::MissingSectionHeader`],
/// [`ConfigError::DuplicateSection`], [`ConfigError::DuplicateOption`],
/// [`ConfigError::InvalidSyntax`]) if its content cannot be interpreted.
pub fn read_config(path: &Path) -> Result<ConfigDocument, ConfigError> {
    let Some(content) = read_file(path)? else {
        tracing::debug!("config file {} not found, using empty document", path.display());
        return Ok(ConfigDocument::new());
    };
    let doc = parse(&content, &path.display().to_string())?;
    tracing::debug!(
        "read {} sections from {}",
        doc.len(),
        path.display()
    );
    Ok(doc)
}

/// Parse config content from a string.
///
/// A blank line always ends a continued value; blank lines are never kept
/// inside a value, unlike Python `configparser`'s default.
///
/// # Examples
///
/// ```
/// use devtools::config::ini::parse_config_str;
///
/// let doc = parse_config_str("[server]\nPort = 8080\nhost: localhost\n").unwrap();
/// assert_eq!(doc.get("server", "port"), Some("8080"));
/// assert_eq!(doc.get("server", "host"), Some("localhost"));
/// ```
///
/// Options in `[DEFAULT]` are inherited by every section:
///
/// ```
/// use devtools::config::ini::parse_config_str;
///
/// let doc = parse_config_str("[DEFAULT]\ntimeout=30\n\n[a]\nx=1\n").unwrap();
/// assert_eq!(doc.get("a", "timeout"), Some("30"));
/// assert!(!doc.contains_section("DEFAULT"));
/// ```
///
/// # Errors
///
/// Returns an error if the content contains an option outside of a section,
/// a duplicate section or option, or a line without a delimiter.
pub fn parse_config_str(content: &str) -> Result<ConfigDocument, ConfigError> {
    parse(content, STRING_SOURCE)
}

/// Which section the parser is currently filling.
#[derive(Debug, Clone, Copy)]
enum Target {
    Default,
    Section(usize),
}

/// The option most recently added, eligible for continuation lines.
#[derive(Debug, Clone, Copy)]
struct OpenOption {
    target: Target,
    index: usize,
    indent: usize,
}

#[derive(Debug, Default)]
struct Parser {
    defaults: Vec<(String, String)>,
    sections: Vec<(String, Vec<(String, String)>)>,
    current: Option<Target>,
    open: Option<OpenOption>,
}

impl Parser {
    fn options_mut(&mut self, target: Target) -> Option<&mut Vec<(String, String)>> {
        match target {
            Target::Default => Some(&mut self.defaults),
            Target::Section(idx) => self.sections.get_mut(idx).map(|(_, opts)| opts),
        }
    }

    fn target_name(&self, target: Target) -> &str {
        match target {
            Target::Default => DEFAULT_SECTION,
            Target::Section(idx) => self.sections.get(idx).map_or("", |(name, _)| name),
        }
    }

    /// Append a continuation line to the open option, if `indent` qualifies.
    fn continue_value(&mut self, indent: usize, text: &str) -> bool {
        let Some(open) = self.open else {
            return false;
        };
        if indent <= open.indent {
            return false;
        }
        let Some(value) = self
            .options_mut(open.target)
            .and_then(|opts| opts.get_mut(open.index))
            .map(|(_, value)| value)
        else {
            return false;
        };
        value.push('\n');
        value.push_str(text);
        true
    }

    fn into_document(self) -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        for (name, options) in self.sections {
            let mut section = Section::new(name);
            for (key, value) in options {
                section.set(key, value);
            }
            for (key, value) in &self.defaults {
                if !section.contains(key) {
                    section.set(key.clone(), value.clone());
                }
            }
            doc.insert_section(section);
        }
        doc
    }
}

fn parse(content: &str, file: &str) -> Result<ConfigDocument, ConfigError> {
    let mut parser = Parser::default();

    for (line_num, line) in content.lines().enumerate() {
        let line_no = line_num + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            parser.open = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indent = line.len() - line.trim_start().len();
        if indent > 0 && parser.continue_value(indent, trimmed) {
            continue;
        }

        if let Some(name) = parse_header(trimmed) {
            parser.open = None;
            if name == DEFAULT_SECTION {
                parser.current = Some(Target::Default);
                continue;
            }
            if parser.sections.iter().any(|(existing, _)| existing == name) {
                return Err(ConfigError::DuplicateSection {
                    file: file.to_string(),
                    section: name.to_string(),
                    line: line_no,
                });
            }
            parser.sections.push((name.to_string(), Vec::new()));
            parser.current = Some(Target::Section(parser.sections.len() - 1));
            continue;
        }

        let Some(target) = parser.current else {
            return Err(ConfigError::MissingSectionHeader {
                file: file.to_string(),
                line: line_no,
                content: trimmed.to_string(),
            });
        };

        let Some((key, value)) = parse_option_line(trimmed) else {
            return Err(ConfigError::InvalidSyntax {
                file: file.to_string(),
                line: line_no,
                content: trimmed.to_string(),
            });
        };

        let section_name = parser.target_name(target).to_string();
        let Some(options) = parser.options_mut(target) else {
            continue;
        };
        if options.iter().any(|(existing, _)| *existing == key) {
            return Err(ConfigError::DuplicateOption {
                file: file.to_string(),
                section: section_name,
                option: key,
                line: line_no,
            });
        }
        options.push((key, value));
        let index = options.len() - 1;
        parser.open = Some(OpenOption {
            target,
            index,
            indent,
        });
    }

    Ok(parser.into_document())
}

/// Parse a `[header]` line, keeping the name verbatim.
fn parse_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        return None;
    }
    Some(inner)
}

/// Parse a `key = value` or `key: value` line.
///
/// The first delimiter wins, both sides are trimmed and the key is
/// lowercased. Returns `None` if there is no delimiter or the key is empty.
///
/// # Examples
///
/// - `"Port = 8080"` → `("port", "8080")`
/// - `"url: http://host:80/"` → `("url", "http://host:80/")`
fn parse_option_line(line: &str) -> Option<(String, String)> {
    let split = line.find(['=', ':'])?;
    let key = line.get(..split)?.trim();
    let value = line.get(split + 1..)?.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_lowercase(), value.to_string()))
}

/// Read a file to a string, mapping "not found" to `None`.
fn read_file(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
