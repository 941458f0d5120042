//! Colouring for command output.

use owo_colors::{OwoColorize, colors::css};

/// How command output is coloured, decided once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    colored: bool,
}

impl Style {
    /// Colours output when stdout supports it.
    pub fn detect() -> Self {
        Self {
            colored: supports_color::on(supports_color::Stream::Stdout).is_some(),
        }
    }

    /// Never colours output.
    #[cfg(test)]
    pub const fn plain() -> Self {
        Self { colored: false }
    }

    /// Green, for a completed step.
    pub fn success(self, text: &str) -> String {
        self.paint(text, |t| t.fg::<css::Green>().to_string())
    }

    /// Amber, for the warning count.
    pub fn warning(self, text: &str) -> String {
        self.paint(text, |t| t.fg::<css::Orange>().to_string())
    }

    /// Dimmed, for individual warnings.
    pub fn dim(self, text: &str) -> String {
        self.paint(text, |t| t.dimmed().to_string())
    }

    fn paint(self, text: &str, color: impl FnOnce(&str) -> String) -> String {
        if self.colored {
            color(text)
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_style_leaves_text_unchanged() {
        let style = Style::plain();
        assert_eq!(style.success("done"), "done");
        assert_eq!(style.warning("careful"), "careful");
        assert_eq!(style.dim("quiet"), "quiet");
    }

    #[test]
    fn colored_style_adds_escape_codes() {
        let style = Style { colored: true };
        let painted = style.warning("careful");
        assert!(painted.contains("careful"));
        assert_ne!(painted, "careful");
    }
}
