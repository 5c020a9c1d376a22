use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A fixed-width text table drawn with box characters.
///
/// Column widths include one space of padding on each side. Cells longer than
/// their column are cut and end with `…`. Widths are terminal columns, so wide
/// glyphs count double.
#[derive(Clone, Debug)]
pub struct Table {
    head: Vec<String>,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(head: &[&str], widths: &[usize]) -> Self {
        Self {
            head: head.iter().map(|cell| (*cell).to_owned()).collect(),
            widths: widths.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 4);

        lines.push(self.border('┌', '┬', '┐'));
        lines.push(self.line(&self.head));
        lines.push(self.border('├', '┼', '┤'));
        for row in &self.rows {
            lines.push(self.line(row));
        }
        lines.push(self.border('└', '┴', '┘'));

        lines.join("\n")
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|width| "─".repeat(*width)).collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn line(&self, cells: &[String]) -> String {
        let segments: Vec<String> = self
            .widths
            .iter()
            .enumerate()
            .map(|(idx, width)| {
                let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                format!(" {} ", fit_cell(cell, width.saturating_sub(2).max(1)))
            })
            .collect();

        format!("│{}│", segments.join("│"))
    }
}

fn fit_cell(text: &str, inner: usize) -> String {
    let width = UnicodeWidthStr::width(text);
    if width <= inner {
        return format!("{}{}", text, " ".repeat(inner - width));
    }

    let mut cut = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width >= inner {
            break;
        }
        cut.push(ch);
        used += ch_width;
    }

    cut.push('…');
    cut.push_str(&" ".repeat(inner - used - 1));
    cut
}
