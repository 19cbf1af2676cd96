//! `Label: value` detail rendering for single resources

use std::io::{self, Write};

/// Write one `Label: value` line per pair with labels padded to a common
/// width. Pairs with an empty value are skipped.
pub fn render_details<W: Write>(pairs: &[(String, String)], writer: &mut W) -> io::Result<()> {
    let visible: Vec<&(String, String)> = pairs
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect();

    let width = visible
        .iter()
        .map(|(label, _)| label.chars().count() + 1)
        .max()
        .unwrap_or(0);

    for (label, value) in visible {
        let label = format!("{}:", label);
        writeln!(writer, "{:<width$} {}", label, value, width = width)?;
    }
    Ok(())
}
