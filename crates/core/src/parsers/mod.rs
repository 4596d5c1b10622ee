pub mod centerline;
pub mod trajectory;

/// Split one CSV row into trimmed cells.
///
/// The recordings are plain comma-separated numbers; quoting is only ever
/// around whole cells, so stripping surrounding quotes is enough.
pub(crate) fn split_row(line: &str) -> Vec<&str> {
    line.split(',')
        .map(|cell| cell.trim().trim_matches('"').trim())
        .collect()
}

/// Non-empty data lines with their 1-based line numbers, header excluded.
pub(crate) fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .skip(1)
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// A cell that pandas would read as NaN.
pub(crate) fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("na")
}
