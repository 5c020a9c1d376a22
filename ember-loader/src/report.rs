//! Per-file load outcomes and their table rendering.

use std::path::Path;

use ember_utils::formatting::truncate_display;
use ember_utils::table::Table;

use crate::descriptor::file_label;

/// Friendly names longer than this are cut in the report.
pub const FRIENDLY_NAME_WIDTH: usize = 30;

const COMMAND_HEAD: [&str; 3] = ["Command Name", "Type", "Status"];
const COMMAND_WIDTHS: [usize; 3] = [26, 8, 8];
const EVENT_HEAD: [&str; 5] = ["#", "Event Name", "Event", "Type", "Status"];
const EVENT_WIDTHS: [usize; 5] = [4, 36, 20, 6, 11];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Bad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Global,
    Dev,
    Sub,
    On,
    Once,
    Unknown,
}

impl RowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowKind::Global => "GLOBAL",
            RowKind::Dev => "DEV",
            RowKind::Sub => "SUB",
            RowKind::On => "ON",
            RowKind::Once => "ONCE",
            RowKind::Unknown => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Commands,
    Events,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    /// 1-based position of the file in discovery order.
    pub index: usize,
    pub label: String,
    /// Event name column; always `None` for command rows.
    pub event: Option<String>,
    pub kind: RowKind,
    pub status: Status,
    /// Why a bad row was rejected.
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusGlyphs {
    pub ok: String,
    pub bad: String,
}

impl Default for StatusGlyphs {
    fn default() -> Self {
        Self {
            ok: "✔".to_owned(),
            bad: "✘".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub kind: ReportKind,
    /// Number of descriptor files discovered, including skipped ones.
    pub files: usize,
    pub rows: Vec<ReportRow>,
}

impl LoadReport {
    pub fn new(kind: ReportKind, files: usize) -> Self {
        Self {
            kind,
            files,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn ok_count(&self) -> usize {
        self.count(Status::Ok)
    }

    pub fn bad_count(&self) -> usize {
        self.count(Status::Bad)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    pub fn render(&self, glyphs: &StatusGlyphs) -> String {
        let mut table = match self.kind {
            ReportKind::Commands => Table::new(&COMMAND_HEAD, &COMMAND_WIDTHS),
            ReportKind::Events => Table::new(&EVENT_HEAD, &EVENT_WIDTHS),
        };

        for row in &self.rows {
            let status = match row.status {
                Status::Ok => glyphs.ok.clone(),
                Status::Bad => glyphs.bad.clone(),
            };

            match self.kind {
                ReportKind::Commands => {
                    table.push([row.label.clone(), row.kind.as_str().to_owned(), status])
                }
                ReportKind::Events => table.push([
                    row.index.to_string(),
                    row.label.clone(),
                    row.event.clone().unwrap_or_default(),
                    row.kind.as_str().to_owned(),
                    status,
                ]),
            }
        }

        table.render()
    }

    fn count(&self, status: Status) -> usize {
        self.rows.iter().filter(|row| row.status == status).count()
    }
}

/// Display label for an event row: friendly name, then event name, then file name.
pub fn event_label(friendly_name: Option<&str>, name: Option<&str>, source: &Path) -> String {
    match (friendly_name, name) {
        (Some(friendly), _) => truncate_display(friendly, FRIENDLY_NAME_WIDTH),
        (None, Some(name)) => name.to_owned(),
        (None, None) => file_label(source),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use unicode_width::UnicodeWidthStr;

    use super::*;

    fn row(label: &str, kind: RowKind, status: Status) -> ReportRow {
        ReportRow {
            index: 1,
            label: label.to_owned(),
            event: None,
            kind,
            status,
            detail: None,
        }
    }

    #[test]
    fn counts_rows_by_status() {
        let mut report = LoadReport::new(ReportKind::Commands, 3);
        report.push(row("ping", RowKind::Global, Status::Ok));
        report.push(row("broken.toml", RowKind::Unknown, Status::Bad));

        assert_eq!(report.ok_count(), 1);
        assert_eq!(report.bad_count(), 1);
        assert_eq!(report.labels(), vec!["ping", "broken.toml"]);
    }

    #[test]
    fn command_table_shows_type_and_glyph() {
        let mut report = LoadReport::new(ReportKind::Commands, 1);
        report.push(row("ping", RowKind::Global, Status::Ok));
        report.push(row("kick", RowKind::Dev, Status::Bad));

        let rendered = report.render(&StatusGlyphs::default());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[1].contains("Command Name"));
        assert!(lines[3].starts_with("│ ping "));
        assert!(lines[3].contains("│ GLOBAL │ ✔"));
        assert!(lines[4].contains("│ DEV    │ ✘"));
    }

    #[test]
    fn event_table_has_index_and_event_columns() {
        let mut report = LoadReport::new(ReportKind::Events, 1);
        report.push(ReportRow {
            index: 2,
            label: "Startup banner".to_owned(),
            event: Some("ready".to_owned()),
            kind: RowKind::Once,
            status: Status::Ok,
            detail: None,
        });

        let rendered = report.render(&StatusGlyphs {
            ok: "OK".to_owned(),
            bad: "BAD".to_owned(),
        });
        assert!(rendered.contains("│ 2  │ Startup banner"));
        assert!(rendered.contains("│ ready "));
        assert!(rendered.contains("│ ONCE │ OK "));
    }

    #[test]
    fn wide_labels_and_emoji_glyphs_keep_borders_aligned() {
        let mut report = LoadReport::new(ReportKind::Events, 2);
        report.push(ReportRow {
            index: 1,
            label: event_label(Some("準備完了イベントハンドラー"), Some("ready"), Path::new("a")),
            event: Some("ready".to_owned()),
            kind: RowKind::Once,
            status: Status::Ok,
            detail: None,
        });
        report.push(row("broken.toml", RowKind::Unknown, Status::Bad));

        let rendered = report.render(&StatusGlyphs {
            ok: "✅".to_owned(),
            bad: "❌".to_owned(),
        });
        let widths: Vec<usize> = rendered.lines().map(UnicodeWidthStr::width).collect();

        assert_eq!(widths, vec![83; 6], "{rendered}");
    }

    #[test]
    fn event_labels_fall_back_in_order() {
        let source = Path::new("events/client/ready.toml");
        let long = "x".repeat(40);

        assert_eq!(event_label(Some("Boot"), Some("ready"), source), "Boot");
        assert_eq!(
            event_label(Some(&long), None, source),
            format!("{}...", "x".repeat(30))
        );
        assert_eq!(event_label(None, Some("ready"), source), "ready");
        assert_eq!(event_label(None, None, source), "ready.toml");
    }
}
