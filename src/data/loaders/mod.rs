// mod.rs - Table loaders

pub mod delimited;
pub mod sample;

use crate::data::table::{Table, TableFormat};
use crate::error::Result;
use std::path::Path;

/// Read a table in the given layout (or guess it from the extension)
pub fn read_table(path: &Path, format: Option<TableFormat>) -> Result<Table> {
    let format = format.unwrap_or_else(|| TableFormat::from_path(path));
    tracing::debug!(path = %path.display(), ?format, "reading table");

    match format {
        TableFormat::Csv | TableFormat::Tsv => Table::from_delimited(path, format.delimiter()),
        TableFormat::OxfordSample => Table::from_oxford_sample(path),
    }
}
