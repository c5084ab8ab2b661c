//! Terminal output utilities: notes on stderr and the field table.
//!
//! Notes go to stderr so recognized text and JSON on stdout can be piped.

use forestclaim_autofill::MergeReport;
use forestclaim_core::{FieldKey, FormState};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Widest value cell before truncation.
const MAX_VALUE_WIDTH: usize = 48;

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

pub fn note_info(msg: &str) {
    if supports_color() {
        eprintln!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        eprintln!("INFO: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        eprintln!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        eprintln!("OK: {msg}");
    }
}

/// Render `rows` under `headers`, left-aligned, padded to the widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| visible_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(visible_width(cell));
        }
    }

    let line = |cells: Vec<String>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell}{}", " ".repeat(width - visible_width(cell))))
            .collect();
        format!("  {}\n", padded.join("  ").trim_end())
    };

    let mut out = String::new();
    out.push_str(&line(headers.iter().map(|h| h.to_string()).collect()));
    out.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        let cells = (0..widths.len())
            .map(|i| row.get(i).cloned().unwrap_or_default())
            .collect();
        out.push_str(&line(cells));
    }
    out
}

fn truncate(value: &str) -> String {
    let flat = value.replace('\n', " ");
    if flat.chars().count() <= MAX_VALUE_WIDTH {
        return flat;
    }
    let head: String = flat.chars().take(MAX_VALUE_WIDTH - 1).collect();
    format!("{head}…")
}

/// One row per form field with its value and what autofill did to it.
pub fn render_form(form: &FormState, report: &MergeReport) -> String {
    let color = supports_color();
    let rows: Vec<Vec<String>> = FieldKey::ALL
        .iter()
        .map(|key| {
            let value = form.value(*key).map(|v| truncate(&v)).unwrap_or_default();
            let status = if report.applied.contains(key) {
                paint(color, GREEN, "filled")
            } else if report.skipped_touched.contains(key) {
                paint(color, YELLOW, "kept")
            } else {
                paint(color, DIM, "-")
            };
            vec![key.to_string(), value, status]
        })
        .collect();
    render_table(&["Field", "Value", "Autofill"], &rows)
}

fn paint(enabled: bool, style: &str, text: &str) -> String {
    if enabled {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}filled{RESET}");
        assert_eq!(strip_ansi(&colored), "filled");
    }

    #[test]
    fn table_pads_to_widest_cell() {
        let rows = vec![
            vec!["village".to_string(), "Kalahandi".to_string()],
            vec!["age".to_string(), "45".to_string()],
        ];
        let table = render_table(&["Field", "Value"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "  Field    Value");
        assert_eq!(lines[1], "  -------  ---------");
        assert_eq!(lines[3], "  age      45");
    }

    #[test]
    fn form_table_marks_filled_and_kept_fields() {
        let form = FormState {
            village: Some("Rayagada".into()),
            claimant_name: Some("Ram Singh".into()),
            ..Default::default()
        };
        let report = MergeReport {
            applied: vec![FieldKey::ClaimantName],
            skipped_touched: vec![FieldKey::Village],
        };
        let table = strip_ansi(&render_form(&form, &report));
        assert!(table.lines().any(|l| l.contains("claimantName") && l.contains("Ram Singh") && l.contains("filled")));
        assert!(table.lines().any(|l| l.contains("village") && l.contains("Rayagada") && l.contains("kept")));
    }

    #[test]
    fn long_values_are_truncated() {
        let long = "x".repeat(100);
        assert_eq!(truncate(&long).chars().count(), MAX_VALUE_WIDTH);
    }
}
