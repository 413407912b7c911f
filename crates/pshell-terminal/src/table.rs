//! Fixed-width table formatting.
//!
//! Header and data rows go through the same [`format_row`], so columns line
//! up as long as no field is wider than its column. Overlong fields are not
//! truncated; they push the rest of the row to the right.

/// Left-justify each field and pad it with `fill` to its column width.
///
/// Fields without a matching width are dropped.
pub fn format_row<S: AsRef<str>>(fields: &[S], widths: &[usize], fill: char) -> String {
    let mut out = String::with_capacity(widths.iter().sum());
    for (field, &width) in fields.iter().zip(widths) {
        let field = field.as_ref();
        out.push_str(field);
        let len = field.chars().count();
        out.extend(std::iter::repeat_n(fill, width.saturating_sub(len)));
    }
    out
}

/// A rule as long as all columns together.
pub fn separator(widths: &[usize], ch: char) -> String {
    std::iter::repeat_n(ch, widths.iter().sum()).collect()
}

/// Header row, dashed separator, then one line per row.
pub fn render_table<S: AsRef<str>>(headers: &[S], widths: &[usize], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers, widths, ' '));
    lines.push(separator(widths, '-'));
    for row in rows {
        lines.push(format_row(row, widths, ' '));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_each_column() {
        assert_eq!(format_row(&["ab", "c"], &[4, 3], ' '), "ab  c  ");
    }

    #[test]
    fn custom_fill() {
        assert_eq!(format_row(&["x"], &[3], '.'), "x..");
    }

    #[test]
    fn overlong_field_overflows() {
        assert_eq!(format_row(&["abcdef", "g"], &[3, 2], ' '), "abcdefg ");
    }

    #[test]
    fn width_counts_chars_not_bytes() {
        assert_eq!(format_row(&["é"], &[3], ' '), "é  ");
    }

    #[test]
    fn separator_length_is_sum_of_widths() {
        let widths = [25, 21, 15, 25, 25, 20];
        let rule = separator(&widths, '-');
        assert_eq!(rule.len(), 131);
        assert!(rule.chars().all(|c| c == '-'));
    }

    #[test]
    fn render_table_layout() {
        let out = render_table(&["A", "B"], &[3, 2], &[vec!["1".into(), "2".into()]]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["A  B ", "-----", "1  2 "]);
    }

    #[test]
    fn header_and_row_share_alignment() {
        let widths = [6, 4];
        let out = render_table(&["Name", "Ty"], &widths, &[vec!["x".into(), "dir".into()]]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].find("Ty"), lines[2].find("dir"));
    }
}
