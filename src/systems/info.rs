//! Info panel text for the focused body

use orrery_core::{BodyKind, Entity};

/// Describe a picked entity
///
/// Only the star and planets have a description; anything else (or nothing)
/// yields an empty string.
pub fn describe(entity: Option<&Entity>) -> String {
    match entity {
        Some(e) if e.kind == BodyKind::Star => {
            "Star: The Sun\nType: G-Type Main-Sequence Star".to_string()
        }
        Some(e) if e.kind == BodyKind::Planet => format!(
            "Planet: {}\nType: Terrestrial",
            e.name.as_deref().unwrap_or("Unknown")
        ),
        _ => String::new(),
    }
}

/// The text shown for the current selection
#[derive(Debug, Default)]
pub struct InfoPanel {
    text: String,
}

impl InfoPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text with a description of `entity`; returns true if it changed
    pub fn update(&mut self, entity: Option<&Entity>) -> bool {
        let text = describe(entity);
        if text == self.text {
            return false;
        }
        self.text = text;
        if !self.text.is_empty() {
            log::info!("{}", self.one_line());
        }
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text on a single line
    pub fn one_line(&self) -> String {
        self.text.replace('\n', " | ")
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
