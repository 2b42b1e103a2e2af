use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use shared::domain::Product;
use thiserror::Error;

const HEADERS: [&str; 5] = ["id", "title", "price", "category", "images"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the given rows (normally the visible page) as CSV. Fields holding a
/// comma, quote or newline are quoted with inner quotes doubled.
pub fn write_csv<W: Write>(rows: &[&Product], writer: W) -> Result<(), ExportError> {
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(HEADERS)?;
    for product in rows {
        csv.write_record([
            product.id.to_string(),
            product.title.clone(),
            product.price.to_string(),
            product.category_label(),
            product.images.join("|"),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn to_csv_string(rows: &[&Product]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
