//! Two-level key-value configuration documents and their INI file format.
//!
//! A [`ConfigDocument`] maps section names to ordered option/value pairs.
//! [`writer::write_config`] serialises it, [`ini::read_config`] parses it
//! back.
pub mod ini;
pub mod writer;

use std::fmt;

use serde::ser::{Serialize, SerializeMap as _, Serializer};

/// A named group of options inside a [`ConfigDocument`].
///
/// # Examples
///
/// ```
/// use devtools::config::Section;
///
/// let mut section = Section::new("database");
/// section.set("host", "localhost");
/// section.set("port", "5432");
/// section.set("host", "db.internal");
///
/// assert_eq!(section.get("host"), Some("db.internal"));
/// assert_eq!(section.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    options: Vec<(String, String)>,
}

impl Section {
    /// Create an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// Section name as written between the brackets.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an option value.
    #[must_use]
    pub fn get(&self, option: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(key, _)| key == option)
            .map(|(_, value)| value.as_str())
    }

    /// Whether `option` is present in this section.
    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        self.get(option).is_some()
    }

    /// Set an option, replacing an existing value in place.
    pub fn set(&mut self, option: impl Into<String>, value: impl Into<String>) {
        let option = option.into();
        let value = value.into();
        match self.options.iter_mut().find(|(key, _)| *key == option) {
            Some((_, existing)) => *existing = value,
            None => self.options.push((option, value)),
        }
    }

    /// Iterate over `(option, value)` pairs in insertion order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of options.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the section holds no options.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Ordered mapping of section name to options.
///
/// Section names are unique; option names are unique within a section.
/// Values are plain strings and never coerced.
///
/// # Examples
///
/// ```
/// use devtools::config::ConfigDocument;
///
/// let mut doc = ConfigDocument::new();
/// doc.set("server", "port", "8080");
/// doc.set("server", "host", "0.0.0.0");
/// doc.set("logging", "level", "info");
///
/// assert_eq!(doc.get("server", "port"), Some("8080"));
/// assert_eq!(doc.section_names().collect::<Vec<_>>(), ["server", "logging"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: Vec<Section>,
}

impl ConfigDocument {
    /// Create an empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Look up a section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Look up a section by name, creating an empty one at the end if absent.
    #[allow(clippy::indexing_slicing)]
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    /// Insert a whole section, replacing any section of the same name in place.
    pub fn insert_section(&mut self, section: Section) {
        match self.sections.iter_mut().find(|s| s.name == section.name) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    /// Whether a section named `name` exists.
    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Look up a single option value.
    #[must_use]
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.section(section)?.get(option)
    }

    /// Set a single option, creating the section if needed.
    pub fn set(&mut self, section: &str, option: impl Into<String>, value: impl Into<String>) {
        self.section_mut(section).set(option, value);
    }

    /// Iterate over sections in insertion order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Iterate over section names in insertion order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(Section::name)
    }

    /// Number of sections.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the document holds no sections.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Renders the on-disk format: a blank line, `[section]`, then
/// `option=value` lines, for every section in order.
impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "[{}]", section.name)?;
            for (option, value) in section.options() {
                writeln!(f, "{option}={value}")?;
            }
        }
        Ok(())
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.options.len()))?;
        for (option, value) in self.options() {
            map.serialize_entry(option, value)?;
        }
        map.end()
    }
}

/// Serialises as a nested map (`{"section": {"option": "value"}}`) keeping
/// insertion order.
impl Serialize for ConfigDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, section)?;
        }
        map.end()
    }
}
