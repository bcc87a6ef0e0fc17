// Wed Jan 15 2026 - Alex

use colored::*;
use std::cmp::max;

pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
    alignment: Vec<Alignment>,
    use_color: bool,
    border_style: BorderStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    None,
    Ascii,
    Unicode,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            column_widths: Vec::new(),
            alignment: Vec::new(),
            use_color: true,
            border_style: BorderStyle::Unicode,
        }
    }

    pub fn with_headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|s| s.to_string()).collect();
        self.column_widths = self.headers.iter().map(|h| h.chars().count()).collect();
        self.alignment = vec![Alignment::Left; self.headers.len()];
        self
    }

    pub fn add_row<T: std::fmt::Display>(mut self, row: &[T]) -> Self {
        let row: Vec<String> = row.iter().map(|c| c.to_string()).collect();

        for (i, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            match self.column_widths.get_mut(i) {
                Some(w) => *w = max(*w, width),
                None => self.column_widths.push(width),
            }
        }

        self.rows.push(row);
        self
    }

    pub fn with_alignment(mut self, column: usize, alignment: Alignment) -> Self {
        if let Some(a) = self.alignment.get_mut(column) {
            *a = alignment;
        }
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_border_style(mut self, style: BorderStyle) -> Self {
        self.border_style = style;
        self
    }

    fn border(&self) -> Option<BorderChars> {
        match self.border_style {
            BorderStyle::None => None,
            BorderStyle::Ascii => Some(BorderChars::ascii()),
            BorderStyle::Unicode => Some(BorderChars::unicode()),
        }
    }

    fn align_cell(content: &str, width: usize, alignment: Alignment) -> String {
        match alignment {
            Alignment::Left => format!("{:<width$}", content, width = width),
            Alignment::Right => format!("{:>width$}", content, width = width),
        }
    }

    pub fn build(&self) -> String {
        if self.headers.is_empty() && self.rows.is_empty() {
            return String::new();
        }

        let border = self.border();
        let mut output = Vec::new();

        if let Some(chars) = &border {
            output.push(self.horizontal_line(chars, LinePosition::Top));
        }

        if !self.headers.is_empty() {
            output.push(self.build_row(&self.headers, border.as_ref(), true));
            if let Some(chars) = &border {
                output.push(self.horizontal_line(chars, LinePosition::Middle));
            }
        }

        for row in &self.rows {
            output.push(self.build_row(row, border.as_ref(), false));
        }

        if let Some(chars) = &border {
            output.push(self.horizontal_line(chars, LinePosition::Bottom));
        }

        output.join("\n")
    }

    fn build_row(&self, cells: &[String], border: Option<&BorderChars>, is_header: bool) -> String {
        let mut line = String::new();
        if let Some(chars) = border {
            line.push(chars.vertical);
        }

        for (i, cell) in cells.iter().enumerate() {
            let width = self.column_widths.get(i).copied().unwrap_or(0);
            let alignment = self.alignment.get(i).copied().unwrap_or(Alignment::Left);
            let aligned = Self::align_cell(cell, width, alignment);

            let formatted = if is_header && self.use_color {
                aligned.bold().to_string()
            } else {
                aligned
            };

            line.push(' ');
            line.push_str(&formatted);
            line.push(' ');
            if let Some(chars) = border {
                line.push(chars.vertical);
            }
        }

        line.trim_end().to_string()
    }

    fn horizontal_line(&self, chars: &BorderChars, position: LinePosition) -> String {
        let (left, middle, right) = match position {
            LinePosition::Top => (chars.top_left, chars.top_middle, chars.top_right),
            LinePosition::Middle => (chars.middle_left, chars.middle_middle, chars.middle_right),
            LinePosition::Bottom => (chars.bottom_left, chars.bottom_middle, chars.bottom_right),
        };

        let segments: Vec<String> = self
            .column_widths
            .iter()
            .map(|w| chars.horizontal.to_string().repeat(w + 2))
            .collect();

        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum LinePosition {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy)]
struct BorderChars {
    horizontal: char,
    vertical: char,
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    top_middle: char,
    bottom_middle: char,
    middle_left: char,
    middle_right: char,
    middle_middle: char,
}

impl BorderChars {
    fn ascii() -> Self {
        Self {
            horizontal: '-',
            vertical: '|',
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
            top_middle: '+',
            bottom_middle: '+',
            middle_left: '+',
            middle_right: '+',
            middle_middle: '+',
        }
    }

    fn unicode() -> Self {
        Self {
            horizontal: '─',
            vertical: '│',
            top_left: '┌',
            top_right: '┐',
            bottom_left: '└',
            bottom_right: '┘',
            top_middle: '┬',
            bottom_middle: '┴',
            middle_left: '├',
            middle_right: '┤',
            middle_middle: '┼',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_table_aligns_columns() {
        let table = TableBuilder::new()
            .with_headers(&["algo", "hits"])
            .add_row(&["6Hit", "12"])
            .add_row(&["Entropy", "3"])
            .with_alignment(1, Alignment::Right)
            .with_color(false)
            .with_border_style(BorderStyle::Ascii)
            .build();

        let expected = [
            "+---------+------+",
            "| algo    | hits |",
            "+---------+------+",
            "| 6Hit    |   12 |",
            "| Entropy |    3 |",
            "+---------+------+",
        ]
        .join("\n");
        assert_eq!(table, expected);
    }
}
