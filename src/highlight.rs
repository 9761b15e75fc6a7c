use inksac::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colours the command word and `-flags`, keeping every whitespace run
    /// intact so the cursor position stays valid.
    pub fn highlight_command(&self, input: &str) -> String {
        if !self.enabled() {
            return input.to_string();
        }

        let command_style = Style::builder()
            .foreground(Color::Cyan)
            .bold()
            .build();
        let flag_style = Style::builder()
            .foreground(Color::Yellow)
            .build();

        let mut highlighted = String::with_capacity(input.len());
        let mut seen_command = false;
        for segment in segments(input) {
            if segment.trim().is_empty() {
                highlighted.push_str(segment);
            } else if !seen_command {
                seen_command = true;
                highlighted.push_str(&segment.style(command_style).to_string());
            } else if segment.starts_with('-') {
                highlighted.push_str(&segment.style(flag_style).to_string());
            } else {
                highlighted.push_str(segment);
            }
        }
        highlighted
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if !self.enabled() {
            return error.to_string();
        }

        let error_style = Style::builder()
            .foreground(Color::Red)
            .bold()
            .build();

        error.style(error_style).to_string()
    }
}

/// Alternating runs of whitespace and non-whitespace.
fn segments(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (idx, c) in input.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            parts.push(&input[start..idx]);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < input.len() {
        parts.push(&input[start..]);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_keep_whitespace() {
        assert_eq!(segments("ls  -la x"), vec!["ls", "  ", "-la", " ", "x"]);
        assert_eq!(segments(" cd"), vec![" ", "cd"]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_plain_is_identity() {
        let highlighter = SyntaxHighlighter::plain();
        assert_eq!(highlighter.highlight_command("echo  -n hi "), "echo  -n hi ");
        assert_eq!(highlighter.highlight_error("oops"), "oops");
    }
}
