use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::app::BatchRow;

use eyre::{Context, Result};
use log::trace;

/// Reads the ISBNs listed in the file at `path`, one per line, skipping blank lines.
pub fn read_isbn_list(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open the '{}' file for reading.", path.display()))?;

    let mut isbns = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.wrap_err("Cannot read contents of file")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        isbns.push(line.to_owned());
    }
    Ok(isbns)
}

/// Writes one line per row to the file at `path`, replacing anything already in it.
///
/// A line holds the ISBN, price, sales rank and notes, or only the ISBN-10 and price when
/// `price_only` is set.
pub fn write_results(path: &Path, rows: &[BatchRow], price_only: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .wrap_err_with(|| format!("Failed to open the '{}' file for writing.", path.display()))?;

    trace!("Writing {} results to '{}'", rows.len(), path.display());

    let mut writer = BufWriter::new(file);
    for row in rows {
        let line = if price_only {
            format!("{} {}", row.isbn10, row.best_price)
        } else {
            format!(
                "{} {} {} {}",
                row.isbn, row.best_price, row.sales_rank, row.notes
            )
        };
        writeln!(writer, "{}", line.trim_end())
            .wrap_err_with(|| format!("Cannot write results to '{}'", path.display()))?;
    }
    writer
        .flush()
        .wrap_err_with(|| format!("Cannot write results to '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_fs::{
        fixture::{FileWriteStr, PathChild},
        TempDir,
    };

    fn row(isbn: &str, isbn10: &str, price: &str, rank: &str, notes: &str) -> BatchRow {
        BatchRow {
            isbn: isbn.to_owned(),
            isbn10: isbn10.to_owned(),
            best_price: price.to_owned(),
            sales_rank: rank.to_owned(),
            notes: notes.to_owned(),
        }
    }

    #[test]
    #[should_panic(expected = "Failed to open the 'file does not exist.txt' file for reading")]
    fn err_when_list_does_not_exist() {
        read_isbn_list(Path::new("file does not exist.txt")).unwrap();
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let list = dir.child("isbns.txt");
        list.write_str("1573980137\r\n\n   \n 0-306-40615-2 \n").unwrap();

        let isbns = read_isbn_list(list.path()).unwrap();

        assert_eq!(vec!["1573980137", "0-306-40615-2"], isbns);
    }

    #[test]
    fn results_are_written_per_line() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let out = dir.child("out.txt");
        out.write_str("previous contents that are much longer than the results\n")
            .unwrap();

        let rows = [
            row("9780306406157", "0306406152", "12.50", "1234", "A Title"),
            row("1573980137", "1573980137", "(None)", "(None)", ""),
        ];
        write_results(out.path(), &rows, false).unwrap();

        let written = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!(
            "9780306406157 12.50 1234 A Title\n1573980137 (None) (None)\n",
            written
        );
    }

    #[test]
    fn price_only_uses_isbn10() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let out = dir.child("prices.txt");

        let rows = [
            row("9780306406157", "0306406152", "12.50", "1234", "A Title"),
            row("12345", "12345", "", "", ""),
        ];
        write_results(out.path(), &rows, true).unwrap();

        let written = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!("0306406152 12.50\n12345\n", written);
    }
}
