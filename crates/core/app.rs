use std::path::PathBuf;

use bookrank::{
    api::item_lookup::NONE,
    config::{CredentialFiles, Credentials},
    isbn::{self, Validation},
    LookupResult,
};

use log::warn;

const NOTES_WIDTH: usize = 40;

/// Where the credentials come from: explicit files or the defaults in the home directory.
#[derive(Debug)]
pub struct CredentialSource {
    id_file: Option<PathBuf>,
    key_file: Option<PathBuf>,
}

impl CredentialSource {
    pub const fn new(id_file: Option<PathBuf>, key_file: Option<PathBuf>) -> Self {
        Self { id_file, key_file }
    }

    pub fn files(&self) -> Result<CredentialFiles, bookrank::Error> {
        match (&self.id_file, &self.key_file) {
            (Some(id_file), Some(key_file)) => Ok(CredentialFiles::new(id_file, key_file)),
            (id_file, key_file) => {
                let defaults = CredentialFiles::from_home()?;
                Ok(CredentialFiles::new(
                    id_file.clone().unwrap_or(defaults.id_file),
                    key_file.clone().unwrap_or(defaults.key_file),
                ))
            }
        }
    }

    pub fn load(&self) -> Result<Credentials, bookrank::Error> {
        let credentials = Credentials::load(&self.files()?)?;
        if !credentials.is_complete() {
            warn!("Access id or secret key is empty - the lookup will likely be rejected");
        }
        Ok(credentials)
    }
}

/// A line of the batch output. Fields are left empty when the lookup failed.
#[derive(Debug, PartialEq, Eq)]
pub struct BatchRow {
    pub isbn: String,
    pub isbn10: String,
    pub best_price: String,
    pub sales_rank: String,
    pub notes: String,
}

pub fn lookup_all<F>(isbns: &[String], mut lookup: F) -> Vec<BatchRow>
where
    F: FnMut(&str) -> Result<LookupResult, bookrank::Error>,
{
    isbns
        .iter()
        .map(|raw| {
            let isbn = isbn::clean(raw);
            match lookup(&isbn) {
                Ok(res) => BatchRow {
                    isbn,
                    isbn10: res.isbn,
                    best_price: res.best_price,
                    sales_rank: res.sales_rank,
                    notes: res.notes,
                },
                Err(err) => {
                    warn!("Lookup of ISBN '{isbn}' failed: {err}");
                    let isbn10 = isbn::normalize(&isbn)
                        .map_or_else(|_| isbn.clone(), isbn::NormalizedIsbn::into_string);
                    BatchRow {
                        isbn,
                        isbn10,
                        best_price: String::new(),
                        sales_rank: String::new(),
                        notes: String::new(),
                    }
                }
            }
        })
        .collect()
}

pub fn render_lookup(isbn: &str, res: &LookupResult) -> String {
    let price = if is_price(&res.best_price) {
        format!("${}", res.best_price)
    } else {
        res.best_price.clone()
    };
    let rank = group_thousands(&res.sales_rank).unwrap_or_else(|| res.sales_rank.clone());

    let mut lines = vec![
        format!("ISBN: {isbn}"),
        format!("Best Price: {price}"),
        format!("Sales Rank: {rank}"),
    ];
    if !res.notes.is_empty() {
        lines.push(format!("Title: {}", res.notes));
    }
    lines.join("\n")
}

pub fn render_validation(validation: &Validation) -> String {
    let mut lines = vec![format!("ISBN: {}", validation.cleaned)];
    if let Some(corrected) = &validation.corrected {
        lines.push(format!("Corrected ISBN: {corrected}"));
    }
    if let Some(isbn10) = &validation.isbn10 {
        lines.push(format!("ISBN10: {isbn10}"));
    }
    lines.join("\n")
}

pub fn render_table(rows: &[BatchRow]) -> String {
    let mut lines = vec![
        "    ISBN         Price    Sales Rank     Notes".to_owned(),
        "------------- ---------- ------------ -----------".to_owned(),
    ];
    lines.extend(rows.iter().map(|row| {
        let price = if is_price(&row.best_price) {
            format!("${}", row.best_price)
        } else {
            NONE.to_owned()
        };
        let rank = group_thousands(&row.sales_rank).unwrap_or_else(|| NONE.to_owned());
        format!(
            "{:>13} {:>10} {:>12}  {}",
            row.isbn,
            price,
            rank,
            truncate_notes(&row.notes)
        )
        .trim_end()
        .to_owned()
    }));
    lines.join("\n")
}

fn is_price(s: &str) -> bool {
    s.parse::<f64>().is_ok()
}

/// Formats a whole number with a comma between each group of three digits.
fn group_thousands(s: &str) -> Option<String> {
    let n = s.trim().parse::<u64>().ok()?;
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    Some(grouped)
}

fn truncate_notes(notes: &str) -> String {
    if notes.chars().count() > NOTES_WIDTH {
        let mut cut: String = notes.chars().take(NOTES_WIDTH - 3).collect();
        cut.push_str("...");
        cut
    } else {
        notes.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bookrank::ErrorKind;

    fn result(best_price: &str, sales_rank: &str, notes: &str) -> LookupResult {
        LookupResult {
            isbn: "1573980137".to_owned(),
            best_price: best_price.to_owned(),
            sales_rank: sales_rank.to_owned(),
            notes: notes.to_owned(),
        }
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(Some("7".to_owned()), group_thousands("7"));
        assert_eq!(Some("123".to_owned()), group_thousands("123"));
        assert_eq!(Some("1,234".to_owned()), group_thousands("1234"));
        assert_eq!(Some("12,345,678".to_owned()), group_thousands("12345678"));
        assert_eq!(None, group_thousands(NONE));
    }

    #[test]
    fn long_notes_are_truncated() {
        let notes = "a".repeat(41);
        let cut = truncate_notes(&notes);
        assert_eq!(40, cut.len());
        assert!(cut.ends_with("..."));
        assert_eq!("short", truncate_notes("short"));
        assert_eq!("a".repeat(40), truncate_notes(&"a".repeat(40)));
    }

    #[test]
    fn lookup_is_rendered() {
        let rendered = render_lookup("978-1-57398-013-5", &result("12.50", "12345", "Title"));
        assert_eq!(
            "ISBN: 978-1-57398-013-5\nBest Price: $12.50\nSales Rank: 12,345\nTitle: Title",
            rendered
        );

        let rendered = render_lookup("1573980137", &result(NONE, NONE, ""));
        assert_eq!(
            "ISBN: 1573980137\nBest Price: (None)\nSales Rank: (None)",
            rendered
        );
    }

    #[test]
    fn validation_is_rendered() {
        let validation = bookrank::isbn::validate("9780306406150").unwrap();
        assert_eq!(
            "ISBN: 9780306406150\nCorrected ISBN: 9780306406157\nISBN10: 0306406152",
            render_validation(&validation)
        );
    }

    #[test]
    fn batch_continues_after_failure() {
        let isbns = vec!["1-57398-013-7".to_owned(), "0306406150".to_owned()];
        let rows = lookup_all(&isbns, |isbn| {
            if isbn == "1573980137" {
                Ok(result("1.00", "10", ""))
            } else {
                Err(bookrank::Error::new(ErrorKind::Transport, "Network error"))
            }
        });

        assert_eq!(2, rows.len());
        assert_eq!("1573980137", rows[0].isbn);
        assert_eq!("1.00", rows[0].best_price);
        assert_eq!(
            BatchRow {
                isbn: "0306406150".to_owned(),
                isbn10: "0306406152".to_owned(),
                best_price: String::new(),
                sales_rank: String::new(),
                notes: String::new(),
            },
            rows[1]
        );
    }

    #[test]
    fn table_is_aligned() {
        let rows = vec![BatchRow {
            isbn: "1573980137".to_owned(),
            isbn10: "1573980137".to_owned(),
            best_price: "12.50".to_owned(),
            sales_rank: "1234".to_owned(),
            notes: String::new(),
        }];

        let table = render_table(&rows);
        let last = table.lines().last().unwrap();
        assert_eq!("   1573980137     $12.50        1,234", last);
    }

    #[test]
    fn failed_rows_show_none() {
        let rows = lookup_all(&["12345".to_owned()], |_| {
            Err(bookrank::Error::new(ErrorKind::InvalidLength, "bad"))
        });
        let table = render_table(&rows);
        assert!(table.ends_with("12345     (None)       (None)"));
    }
}
