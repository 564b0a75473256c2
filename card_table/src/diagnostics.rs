//! Runtime-toggled diagnostic sink.
//!
//! Lines go through the `log` facade with the category as the log target,
//! so a host can filter them like any other target (`RUST_LOG=Action=info`).

use std::fmt::Display;

pub const CATEGORY_ACTION: &str = "Action";
pub const CATEGORY_ROUND: &str = "Round";
pub const CATEGORY_TABLE: &str = "Table";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Diagnostics {
    enabled: bool,
}

impl Diagnostics {
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the toggle and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn emit(&self, category: &str, line: impl Display) {
        if self.enabled {
            log::info!(target: category, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut diagnostics = Diagnostics::default();
        assert!(!diagnostics.is_enabled());
        assert!(diagnostics.toggle());
        assert!(!diagnostics.toggle());
    }

    #[test]
    fn test_emit_does_not_panic_either_way() {
        Diagnostics::new(false).emit(CATEGORY_ACTION, "ignored");
        Diagnostics::new(true).emit(CATEGORY_ROUND, format_args!("round {}", 1));
    }
}
