//! Rendering configuration for derived declarations

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Whether to separate the field group and each initializer with a blank line
    pub blank_line_between_members: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            blank_line_between_members: true,
        }
    }
}

impl RenderConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set whether members are separated by blank lines
    pub fn with_blank_line_between_members(mut self, enabled: bool) -> Self {
        self.blank_line_between_members = enabled;
        self
    }

    /// One level of indentation as text.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}
