use dupcheck_core::Table;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a rendered column may get before cells are cut.
const MAX_COLUMN_WIDTH: usize = 32;

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .next()
            .filter(|ch| UnicodeWidthChar::width(*ch).unwrap_or(0) <= width)
            .map(String::from)
            .unwrap_or_default();
    }

    // Leave room for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let cut = truncate_display(s, width);
    let w = display_width(&cut);
    format!("{}{}", cut, " ".repeat(width.saturating_sub(w)))
}

/// Row limit given on the command line: `0` means every row.
pub(crate) fn row_limit(rows: usize) -> Option<usize> {
    (rows > 0).then_some(rows)
}

/// Render a table as aligned plain text, at most `limit` rows.
///
/// Cells are flattened to one line; long values are cut to keep rows readable.
pub(crate) fn render_table(table: &Table, limit: Option<usize>) -> String {
    let shown = table.head(limit.unwrap_or(table.len()));
    let flat = |s: &str| s.replace(['\n', '\r', '\t'], " ");

    let header: Vec<String> = table.columns.iter().map(|c| flat(c)).collect();
    let body: Vec<Vec<String>> = shown
        .rows
        .iter()
        .map(|row| row.iter().map(|c| flat(&c.as_text())).collect())
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            let cells = body.iter().map(|r| display_width(&r[col]));
            cells
                .chain(std::iter::once(display_width(&header[col])))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    // Trailing empty cells are left out so no line ends in a dangling separator
    let line = |cells: &[String]| -> String {
        let used = cells.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
        let padded: Vec<String> = cells[..used]
            .iter()
            .zip(&widths)
            .map(|(c, &w)| pad_right(c, w))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&header));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &body {
        out.push_str(&line(row));
        out.push('\n');
    }
    if shown.len() < table.len() {
        out.push_str(&format!("... {} more row(s)\n", table.len() - shown.len()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dupcheck_core::CellValue;

    #[test]
    fn display_width_cjk() {
        assert_eq!(display_width("\u{4e16}\u{754c}"), 4); // "世界"
        assert_eq!(display_width("Ann"), 3);
    }

    #[test]
    fn truncate_cuts() {
        assert_eq!(truncate_display("abc", 3), "abc");
        assert_eq!(truncate_display("abcdef", 5), "abc..");
        assert_eq!(truncate_display("abc", 2), "a");
        assert_eq!(truncate_display("", 0), "");
    }

    #[test]
    fn truncate_cjk_boundary() {
        let s = "\u{4e16}\u{754c}\u{4f60}\u{597d}";
        let t = truncate_display(s, 5);
        // budget of 3 columns fits one double-width char
        assert_eq!(t, "\u{4e16}..");
        assert!(display_width(&t) <= 5);
    }

    #[test]
    fn pad_right_pads_after_cut() {
        assert_eq!(pad_right("ab", 5), "ab   ");
        assert_eq!(pad_right("abcdef", 5), "abc..");
        assert_eq!(display_width(&pad_right("\u{4e16}\u{754c}\u{4f60}", 5)), 5);
    }

    fn sample() -> Table {
        Table::from_rows(
            vec!["name_file1".into(), "phone".into()],
            vec![
                vec!["Ann".into(), CellValue::Int(9998887770)],
                vec!["Bob\nJr".into(), CellValue::Empty],
                vec!["Cy".into(), "1".into()],
            ],
        )
    }

    #[test]
    fn render_aligns_columns() {
        let out = render_table(&sample(), None);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "name_file1 | phone");
        assert_eq!(lines[1], "-----------+-----------");
        assert_eq!(lines[2], "Ann        | 9998887770");
        assert_eq!(lines[3], "Bob Jr");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn render_limit_reports_rest() {
        let out = render_table(&sample(), Some(1));
        assert!(out.ends_with("... 2 more row(s)\n"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn render_drops_trailing_empty_cells() {
        let table = Table::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec!["x".into(), CellValue::Empty, CellValue::Empty], vec![CellValue::Empty, CellValue::Empty, "z".into()]],
        );
        let out = render_table(&table, None);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "x");
        assert_eq!(lines[3], "  |   | z");
        assert!(lines.iter().all(|l| !l.ends_with('|')));
    }

    #[test]
    fn zero_row_limit_means_all() {
        assert_eq!(row_limit(0), None);
        assert_eq!(row_limit(3), Some(3));
        let out = render_table(&sample(), row_limit(0));
        assert!(!out.contains("more row(s)"));
        assert_eq!(out.lines().count(), 5);
    }

    #[test]
    fn render_empty_table_has_header() {
        let out = render_table(&Table::new(vec!["a".into()]), Some(5));
        assert_eq!(out, "a\n-\n");
    }
}
