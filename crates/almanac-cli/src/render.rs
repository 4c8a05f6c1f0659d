use std::collections::HashMap;
use std::io::Write;

use almanac_core::config::AlmanacConfig;
use almanac_core::grid::{GRID_COLUMNS, MonthGrid, WEEKDAY_LABELS};
use almanac_core::layout::MonthLayout;
use almanac_core::task::{Task, TaskId};
use chrono::Datelike;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const DEFAULT_CELL_WIDTH: usize = 12;
pub const MIN_CELL_WIDTH: usize = 4;
pub const MAX_CELL_WIDTH: usize = 64;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    cell_width: usize,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            cell_width: DEFAULT_CELL_WIDTH,
        }
    }

    /// Width is clamped to `MIN_CELL_WIDTH..=MAX_CELL_WIDTH`.
    pub fn with_cell_width(mut self, width: usize) -> Self {
        self.cell_width = width.clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH);
        self
    }

    #[tracing::instrument(skip_all, fields(month = %grid.title()))]
    pub fn write_month<W: Write>(
        &self,
        mut out: W,
        grid: &MonthGrid,
        layout: &MonthLayout,
        tasks: &[Task],
        config: &AlmanacConfig,
    ) -> anyhow::Result<()> {
        let by_id: HashMap<TaskId, &Task> = tasks.iter().map(|task| (task.id, task)).collect();
        let total_width = self.cell_width * GRID_COLUMNS;

        let title = grid.title();
        let pad = total_width.saturating_sub(UnicodeWidthStr::width(title.as_str())) / 2;
        writeln!(out, "{}{}", " ".repeat(pad), title)?;

        for label in WEEKDAY_LABELS {
            write!(out, "{}", fit(label, self.cell_width))?;
        }
        writeln!(out)?;
        writeln!(out, "{:-<total_width$}", "")?;

        for (row, cells) in grid.rows().enumerate() {
            for cell in cells {
                let mut label = format!("{:>2}", cell.date.day());
                if cell.is_today {
                    label.push('*');
                }
                let label = fit(&label, self.cell_width);
                let label = if cell.is_today {
                    self.paint(&label, "1;4")
                } else if !cell.in_month {
                    self.paint(&label, "2")
                } else {
                    label
                };
                write!(out, "{label}")?;
            }
            writeln!(out)?;

            for lane in 0..layout.lane_count[row] {
                let mut line = String::new();
                let mut col = 0;
                while col < GRID_COLUMNS {
                    let bar = layout.row_bars(row).find(|bar| {
                        bar.lane == lane && bar.segment.start_col == col
                    });
                    let Some(bar) = bar else {
                        line.push_str(&" ".repeat(self.cell_width));
                        col += 1;
                        continue;
                    };

                    let segment = bar.segment;
                    let width = segment.span() * self.cell_width;
                    let (title, color) = by_id
                        .get(&segment.task_id)
                        .map(|task| (task.title.as_str(), config.color_for(task)))
                        .unwrap_or(("?", String::new()));
                    let open = if segment.continues_before { '<' } else { '[' };
                    let close = if segment.continues_after { '>' } else { ']' };
                    let inner = fit(title, width.saturating_sub(3));
                    let text = format!("{open}{inner}{close} ");
                    line.push_str(&self.paint_hex(&text, &color));
                    col = segment.end_col + 1;
                }
                writeln!(out, "{}", line.trim_end())?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    #[tracing::instrument(skip_all, fields(count = tasks.len()))]
    pub fn write_task_table<W: Write>(
        &self,
        out: W,
        tasks: &[Task],
        config: &AlmanacConfig,
    ) -> anyhow::Result<()> {
        let headers = vec![
            "ID".to_string(),
            "Start".to_string(),
            "End".to_string(),
            "Category".to_string(),
            "Title".to_string(),
        ];

        let rows = tasks
            .iter()
            .map(|task| {
                let id = task.id.to_string();
                let short = id.get(..8).unwrap_or(&id).to_string();
                vec![
                    self.paint(&short, "33"),
                    task.start.format("%Y-%m-%d").to_string(),
                    task.end.format("%Y-%m-%d").to_string(),
                    task.category
                        .map(|category| category.as_key().to_string())
                        .unwrap_or_default(),
                    self.paint_hex(&task.title, &config.color_for(task)),
                ]
            })
            .collect();

        write_table(out, headers, rows)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }

    fn paint_hex(&self, text: &str, hex: &str) -> String {
        match hex_rgb(hex) {
            Some((r, g, b)) => self.paint(text, &format!("38;2;{r};{g};{b}")),
            None => text.to_string(),
        }
    }
}

fn hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.strip_prefix('#')?;
    let expanded = match hex.len() {
        3 => hex.chars().flat_map(|ch| [ch, ch]).collect::<String>(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |idx: usize| u8::from_str_radix(expanded.get(idx..idx + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Truncates or pads `text` to exactly `width` terminal columns.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    let full = UnicodeWidthStr::width(text) <= width;

    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        let reserve = if full { 0 } else { 1 };
        if used + w + reserve > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    if !full && used < width {
        out.push('…');
        used += 1;
    }

    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use almanac_core::config::AlmanacConfig;
    use almanac_core::grid::MonthGrid;
    use almanac_core::layout::layout_month;
    use almanac_core::task::Task;
    use chrono::NaiveDate;

    use super::{MAX_CELL_WIDTH, Renderer, fit, hex_rgb};

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdefgh", 5), "abcd…");
        assert_eq!(fit("日本語", 4), "日… ");
    }

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(hex_rgb("#e91e63"), Some((0xe9, 0x1e, 0x63)));
        assert_eq!(hex_rgb("#abc"), Some((0xaa, 0xbb, 0xcc)));
        assert_eq!(hex_rgb("blue"), None);
    }

    #[test]
    fn month_text_shows_split_bars() {
        let grid = MonthGrid::build(ymd(1), ymd(17));
        let tasks = vec![
            Task::new("Conference", ymd(8), ymd(13)).expect("valid task"),
            Task::new("Call", ymd(9), ymd(9)).expect("valid task"),
        ];
        let layout = layout_month(&grid, &tasks);

        let mut out = Vec::new();
        Renderer::new(false)
            .write_month(&mut out, &grid, &layout, &tasks, &AlmanacConfig::default())
            .expect("render month");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("October 2026"));
        assert!(text.contains("17*"));
        assert!(text.contains("[Conference"));
        assert!(text.contains("<Conference"));
        assert!(text.contains("[Call"));
    }

    #[test]
    fn oversized_cell_width_is_clamped() {
        let grid = MonthGrid::build(ymd(1), ymd(17));
        let layout = layout_month(&grid, &[]);

        let mut out = Vec::new();
        Renderer::new(false)
            .with_cell_width(usize::MAX / 2)
            .write_month(&mut out, &grid, &layout, &[], &AlmanacConfig::default())
            .expect("render month");
        let text = String::from_utf8(out).expect("utf8");

        let rule = text
            .lines()
            .find(|line| line.starts_with('-'))
            .expect("header rule");
        assert_eq!(rule.len(), MAX_CELL_WIDTH * 7);
    }

    #[test]
    fn task_table_lists_rows() {
        let tasks = vec![Task::new("Call", ymd(9), ymd(9)).expect("valid task")];
        let mut out = Vec::new();
        Renderer::new(false)
            .write_task_table(&mut out, &tasks, &AlmanacConfig::default())
            .expect("render table");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("2026-10-09"));
        assert!(text.contains("Call"));
    }
}
