//! Plain-text grid rendering of table views

use crate::models::TableView;

/// Render a view as a bordered grid with the header row underlined by `=`.
///
/// Column widths count characters, not bytes.
pub fn render_table(view: &TableView) -> String {
    let mut widths: Vec<usize> = view.headers.iter().map(|h| h.chars().count()).collect();
    for row in &view.rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = String::new();
    out.push_str(&rule(&widths, '-'));
    out.push_str(&line(&widths, &view.headers));
    out.push_str(&rule(&widths, '='));
    for row in &view.rows {
        out.push_str(&line(&widths, row));
        out.push_str(&rule(&widths, '-'));
    }
    if view.rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.extend(std::iter::repeat(fill).take(w + 2));
        s.push('+');
    }
    s.push('\n');
    s
}

fn line(widths: &[usize], cells: &[String]) -> String {
    let mut s = String::from("|");
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let pad = w - cell.chars().count();
        s.push(' ');
        s.push_str(cell);
        s.extend(std::iter::repeat(' ').take(pad + 1));
        s.push('|');
    }
    s.push('\n');
    s
}
