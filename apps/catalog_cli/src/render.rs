//! Plain-text rendering of a table page.

use std::io::{self, Write};

use shared::domain::{Product, ProductId};
use view::PageView;

const HEADERS: [&str; 5] = ["id", "title", "price", "category", "images"];
const TITLE_WIDTH: usize = 40;
const IMAGES_SHOWN: usize = 2;

fn cells(product: &Product) -> [String; 5] {
    [
        product.id.to_string(),
        truncate(&product.title, TITLE_WIDTH),
        product.price.to_string(),
        product.category_label(),
        product
            .images
            .iter()
            .take(IMAGES_SHOWN)
            .cloned()
            .collect::<Vec<_>>()
            .join(" "),
    ]
}

/// Output of `catalog update`: the server's echo, or a note when it sent none.
pub fn update_report(id: ProductId, updated: Option<&Product>) -> serde_json::Result<String> {
    match updated {
        Some(product) => serde_json::to_string_pretty(product),
        None => Ok(format!(
            "update of {id} accepted; server returned no product body"
        )),
    }
}

fn truncate(text: &str, width: usize) -> String {
    // Newlines would break the row layout.
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= width {
        return flat;
    }
    let mut cut: String = flat.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn render_page(view: &PageView<'_>, out: &mut impl Write) -> io::Result<()> {
    let rows: Vec<[String; 5]> = view.rows.iter().map(|product| cells(product)).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &HEADERS.map(str::to_string), &widths)?;
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", pagination_line(view))?;
    writeln!(out, "{}", view.summary())?;
    Ok(())
}

fn write_row(out: &mut impl Write, cells: &[String; 5], widths: &[usize; 5]) -> io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", padded.join(" | ").trim_end())
}

/// Page buttons, current one bracketed: `1 [2] 3`.
pub fn pagination_line(view: &PageView<'_>) -> String {
    view.pages()
        .map(|(page, current)| {
            if current {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
