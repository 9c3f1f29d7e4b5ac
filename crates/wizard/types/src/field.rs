//! Text field state
//!
//! Citation and context inputs start out showing example text. The
//! first focus clears it; that is a one-time `Pristine -> Dirty`
//! transition and has nothing to do with validity.

use serde::{Deserialize, Serialize};

/// Whether a field still shows its placeholder
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FieldState {
    /// Showing the placeholder; never focused or edited
    #[default]
    Pristine,
    /// Focused or edited at least once
    Dirty,
}

/// A text input with an optional placeholder
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TextField {
    text: String,
    placeholder: String,
    state: FieldState,
}

impl TextField {
    /// Field with no placeholder; starts dirty and empty
    pub fn new() -> Self {
        Self {
            text: String::new(),
            placeholder: String::new(),
            state: FieldState::Dirty,
        }
    }

    /// Field that shows `placeholder` until first focused
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        Self {
            text: placeholder.clone(),
            placeholder,
            state: FieldState::Pristine,
        }
    }

    /// Clear the placeholder on first focus. Later calls are no-ops.
    pub fn focus(&mut self) -> bool {
        if self.state == FieldState::Pristine {
            self.text.clear();
            self.state = FieldState::Dirty;
            true
        } else {
            false
        }
    }

    /// Replace the buffer contents
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.state = FieldState::Dirty;
    }

    pub fn clear(&mut self) {
        self.edit(String::new());
    }

    /// What the field currently displays (may be the placeholder)
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn is_showing_placeholder(&self) -> bool {
        self.state == FieldState::Pristine
            || (!self.placeholder.is_empty() && self.text == self.placeholder)
    }

    /// The user-entered value, trimmed; `None` while empty or showing the placeholder
    pub fn value(&self) -> Option<&str> {
        if self.is_showing_placeholder() {
            return None;
        }
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_focus_clears_placeholder_once() {
        let mut field = TextField::with_placeholder("e.g. Smith et al., 2019");
        assert_eq!(field.state(), FieldState::Pristine);
        assert!(field.is_showing_placeholder());
        assert_eq!(field.value(), None);

        assert!(field.focus());
        assert_eq!(field.text(), "");
        assert_eq!(field.state(), FieldState::Dirty);

        field.edit("Doe, 2021");
        assert!(!field.focus());
        assert_eq!(field.text(), "Doe, 2021");
    }

    #[test]
    fn test_value_trims_and_rejects_blank() {
        let mut field = TextField::new();
        assert_eq!(field.value(), None);
        field.edit("   ");
        assert_eq!(field.value(), None);
        field.edit("  hello ");
        assert_eq!(field.value(), Some("hello"));
    }

    #[test]
    fn test_retyping_placeholder_counts_as_placeholder() {
        let mut field = TextField::with_placeholder("example");
        field.edit("example");
        assert!(field.is_showing_placeholder());
        assert_eq!(field.value(), None);
    }

    #[test]
    fn test_edit_without_focus_marks_dirty() {
        let mut field = TextField::with_placeholder("example");
        field.edit("mine");
        assert_eq!(field.state(), FieldState::Dirty);
        assert_eq!(field.value(), Some("mine"));
    }
}
