//! Widget naming.

use std::any::type_name;

use convert_case::{Case, Casing};

/// Return true if the character is valid in a widget name.
pub fn valid_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// A widget name: lowercase ASCII alphanumerics plus underscores. Used in
/// tracing output, debug dumps and error messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetName {
    name: String,
}

impl WidgetName {
    /// Munge an arbitrary string into a valid widget name by snake-casing it
    /// and dropping invalid characters.
    pub fn convert(name: &str) -> Self {
        let raw = name.to_case(Case::Snake);
        let filtered: String = raw.chars().filter(|c| valid_name_char(*c)).collect();
        let name = if filtered.is_empty() {
            "widget".to_string()
        } else {
            filtered
        };
        Self { name }
    }

    /// Derive a name from a type.
    pub fn of<T: ?Sized>() -> Self {
        let full = type_name::<T>();
        let short = full.rsplit("::").next().unwrap_or(full);
        Self::convert(short)
    }
}

impl std::fmt::Display for WidgetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq<&str> for WidgetName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}
