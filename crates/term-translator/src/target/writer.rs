// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Simple line-based writer for target text with indentation.

/// Writer context for target text.
/// Tracks indentation and handles line-based output.
#[derive(Debug)]
pub struct TargetWriter {
    out: String,
    indent: usize,
    at_line_start: bool,
}

impl TargetWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    /// Write a string, handling indentation at line starts.
    pub fn write(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.out.push('\n');
                self.at_line_start = true;
            } else {
                if self.at_line_start {
                    for _ in 0..self.indent {
                        self.out.push_str("  ");
                    }
                }
                self.at_line_start = false;
                self.out.push(c);
            }
        }
    }

    /// Increase indentation for subsequent lines.
    /// If `newline` is true, writes a newline before indenting (for block starts).
    pub fn indent(&mut self, newline: bool) {
        if newline {
            self.newline();
        }
        self.indent += 1;
    }

    /// Decrease indentation for subsequent lines.
    /// If `newline` is true, writes a newline after dedenting (for block ends).
    pub fn dedent(&mut self, newline: bool) {
        if self.indent > 0 {
            self.indent -= 1;
        }
        if newline {
            self.newline();
        }
    }

    /// Write an empty line (just a newline).
    pub fn newline(&mut self) {
        self.write("\n");
    }

    /// Write items with a separator, using a custom render function for each item.
    pub fn sep_with<I, T, F>(&mut self, separator: &str, items: I, mut render: F)
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&mut Self, T),
    {
        let mut first = true;
        for item in items {
            if !first {
                self.write(separator);
            }
            first = false;
            render(self, item);
        }
    }

    /// Get the written text (consumes self).
    pub fn into_inner(self) -> String {
        self.out
    }
}

impl Default for TargetWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render to a string.
pub fn render_to_string<F>(f: F) -> String
where
    F: FnOnce(&mut TargetWriter),
{
    let mut writer = TargetWriter::new();
    f(&mut writer);
    writer.into_inner()
}
