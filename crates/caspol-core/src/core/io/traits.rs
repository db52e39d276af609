use crate::core::io::table::{TableError, parse_table};
use crate::core::models::row::TableRow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing one kind of simulation output table.
///
/// Implementors fix the row type, and with it the number of fields every data line must
/// carry. Parsing itself is shared: see [`parse_table`].
pub trait OutputFile {
    /// The typed record of this table.
    type Row: TableRow;

    /// Column names written into the `#` header by [`OutputFile::write_to`].
    const COLUMNS: &'static [&'static str];

    /// Reads every data row from a buffered reader, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Parse`] for malformed tokens or blank lines and
    /// [`TableError::Shape`] for lines with the wrong number of fields.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Self::Row>, TableError> {
        let raw = parse_table(reader)?;
        Ok(raw.into_rows::<Self::Row>()?)
    }

    /// Writes a commented header followed by one line per row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(rows: &[Self::Row], writer: &mut impl Write) -> Result<(), TableError> {
        write!(writer, "#")?;
        for (idx, column) in Self::COLUMNS.iter().enumerate() {
            write!(writer, " {}:{}", idx + 1, column)?;
        }
        writeln!(writer)?;

        for row in rows {
            let line = row
                .to_fields()
                .iter()
                .map(|value| format!("{value:e}"))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    /// Reads every data row from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Self::Row>, TableError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes rows to a file path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(rows: &[Self::Row], path: P) -> Result<(), TableError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(rows, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
