//! Parsing CSV text into an ordered sequence of [`Row`] records. The first
//! line is the header row; header names are trimmed and lower-cased and
//! become the record keys. Data lines are split on the comma character with
//! no quoting support, so a literal comma inside a field value will misalign
//! columns. This mirrors the upstream data contract and is deliberate.

use std::collections::HashMap;
use std::fmt;

/// One parsed CSV data line: a mapping from lower-cased header name to the
/// trimmed field value. Rows with fewer values than headers simply lack the
/// trailing keys.
#[derive(Debug, Clone)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    /// Looks up a field by its lower-cased header name. Absent fields and
    /// fields whose value is the empty string both yield `None`, so callers
    /// see one notion of "missing".
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// The record's `date` field, used verbatim as the output file stem and
    /// as the neighbor-link key. It is never parsed as a calendar date.
    pub fn date(&self) -> Option<&str> {
        self.get("date")
    }
}

/// Parses CSV text into rows, preserving source order. Source order is
/// load-bearing: neighbor links and the sitemap's root entry are derived
/// from positions in this sequence, not from date values.
pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut lines = text.lines();
    let headers: Vec<String> = match lines.next() {
        None => return Err(Error::EmptyInput),
        Some(header_line) => header_line
            .split(',')
            .map(|h| h.trim().to_lowercase())
            .collect(),
    };

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = HashMap::with_capacity(headers.len());
        for (header, value) in headers.iter().zip(line.split(',')) {
            fields.insert(header.clone(), value.trim().to_owned());
        }
        rows.push(Row { fields });
    }

    if rows.is_empty() {
        return Err(Error::NoRows);
    }
    Ok(rows)
}

/// The result of a fallible row-parsing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing CSV input.
#[derive(Debug)]
pub enum Error {
    /// Returned when the input text is empty or whitespace-only.
    EmptyInput,

    /// Returned when the input contains a header row but no data rows.
    NoRows,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "CSV input is empty"),
            Error::NoRows => write!(f, "CSV input has a header row but no data rows"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_headers_lowercased_and_trimmed() -> Result<()> {
        let rows = parse_rows(" Date , TITLE\n2025-01-01,hello\n")?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("date"), Some("2025-01-01"));
        assert_eq!(rows[0].get("title"), Some("hello"));
        Ok(())
    }

    #[test]
    fn test_values_trimmed() -> Result<()> {
        let rows = parse_rows("date,title\n  2025-01-01 ,  hello world \n")?;
        assert_eq!(rows[0].get("date"), Some("2025-01-01"));
        assert_eq!(rows[0].get("title"), Some("hello world"));
        Ok(())
    }

    #[test]
    fn test_short_row_yields_absent_trailing_fields() -> Result<()> {
        let rows = parse_rows("date,title,caption\n2025-01-01,hello\n")?;
        assert_eq!(rows[0].get("title"), Some("hello"));
        assert_eq!(rows[0].get("caption"), None);
        Ok(())
    }

    #[test]
    fn test_empty_value_reads_as_absent() -> Result<()> {
        let rows = parse_rows("date,title,caption\n2025-01-01,hello,\n")?;
        assert_eq!(rows[0].get("caption"), None);
        Ok(())
    }

    #[test]
    fn test_blank_lines_skipped() -> Result<()> {
        let rows = parse_rows("date\n2025-01-01\n\n2025-01-02\n")?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].date(), Some("2025-01-02"));
        Ok(())
    }

    #[test]
    fn test_order_preserved() -> Result<()> {
        // Deliberately not sorted by date; source order wins.
        let rows = parse_rows("date\n2025-01-03\n2025-01-01\n2025-01-02\n")?;
        let dates: Vec<_> = rows.iter().map(|r| r.date().unwrap()).collect();
        assert_eq!(dates, vec!["2025-01-03", "2025-01-01", "2025-01-02"]);
        Ok(())
    }

    #[test]
    fn test_comma_in_value_misaligns_columns() -> Result<()> {
        // No quoting support: the quoted comma still splits the line.
        let rows = parse_rows("date,title,caption\n2025-01-01,\"a, b\",c\n")?;
        assert_eq!(rows[0].get("title"), Some("\"a"));
        assert_eq!(rows[0].get("caption"), Some("b\""));
        Ok(())
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(parse_rows(""), Err(Error::EmptyInput)));
        assert!(matches!(parse_rows("  \n \n"), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_header_only_is_an_error() {
        assert!(matches!(
            parse_rows("date,title\n"),
            Err(Error::NoRows)
        ));
    }
}
