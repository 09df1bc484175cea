use serde::Serialize;

/// Pretty-print any serializable value, used by the global `--json` flag.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Column-aligned listing for `task list` and `timeline list`.
///
/// Every column is as wide as its widest cell, a dashed rule separates the
/// header from the rows, and trailing padding is trimmed per line.
pub struct Listing {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Listing {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.rows.push(cells.into_iter().collect());
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }

    fn column_width(&self, col: usize) -> usize {
        self.rows
            .iter()
            .map(|row| row.get(col).map_or(0, String::len))
            .chain(std::iter::once(self.headers[col].len()))
            .max()
            .unwrap_or(0)
    }

    fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| self.column_width(col))
            .collect();

        let mut out = String::new();
        push_line(
            &mut out,
            &widths,
            self.headers.iter().map(|h| h.to_string()),
        );
        push_line(&mut out, &widths, widths.iter().map(|w| "-".repeat(*w)));
        for row in &self.rows {
            push_line(&mut out, &widths, row.iter().cloned());
        }
        out
    }
}

fn push_line<I>(out: &mut String, widths: &[usize], cells: I)
where
    I: IntoIterator<Item = String>,
{
    let start = out.len();
    for (i, cell) in cells.into_iter().enumerate().take(widths.len()) {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&cell);
        for _ in cell.len()..widths[i] {
            out.push(' ');
        }
    }
    out.truncate(start + out[start..].trim_end().len());
    out.push('\n');
}
