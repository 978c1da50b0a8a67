//! Consistent styling utilities for CLI output.

use std::fmt::Display;

use owo_colors::OwoColorize;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Style for primary values (e.g. the wiki domain)
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    /// Style for language codes
    pub fn code<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// Style for success messages
    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }
}
