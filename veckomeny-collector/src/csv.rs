use std::collections::HashMap;

use ::csv::ReaderBuilder;
use anyhow::anyhow;
use tracing::{debug, instrument};

/// Canonical column identities recognized in uploaded CSV files. Header
/// names are matched case-insensitively with Swedish, Norwegian and
/// English synonyms aliased onto one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Week,
    Weekday,
    Meal,
    Alt,
    Text,
}

impl Field {
    /// Swedish label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Year => "år",
            Field::Week => "vecka",
            Field::Weekday => "veckodag",
            Field::Meal => "måltid",
            Field::Alt => "alt",
            Field::Text => "text",
        }
    }

    fn from_header(header: &str) -> Option<Field> {
        match header.trim().to_lowercase().as_str() {
            "year" | "år" | "aar" => Some(Field::Year),
            "week" | "vecka" | "uke" | "veckonummer" => Some(Field::Week),
            "weekday" | "day" | "veckodag" | "ukedag" | "dag" => Some(Field::Weekday),
            "meal" | "måltid" | "maltid" => Some(Field::Meal),
            "alt" | "alternativ" | "variant" => Some(Field::Alt),
            "text" | "dish" | "rätt" | "rett" | "maträtt" => Some(Field::Text),
            _ => None,
        }
    }
}

/// One data record; `line` is the 1-based line number in the source file.
#[derive(Debug, Clone)]
pub struct CsvRecord {
    pub line: u64,
    fields: HashMap<Field, String>,
}

impl CsvRecord {
    /// Trimmed, non-empty value for a recognized column.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// True when every recognized column was blank on this row.
    pub fn is_blank(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub records: Vec<CsvRecord>,
}

/// Reads the byte stream as UTF-8 text (tolerating a leading byte-order
/// mark) and parses it as a header-driven record format.
#[instrument(skip(bytes))]
pub fn read_records(bytes: &[u8]) -> anyhow::Result<CsvTable> {
    let text = std::str::from_utf8(bytes).map_err(|_| anyhow!("file is not valid UTF-8"))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|err| anyhow!("failed to read CSV header: {}", err))?;
    let columns: Vec<Option<Field>> = headers.iter().map(Field::from_header).collect();
    debug!("resolved columns: {:?}", columns);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| anyhow!("malformed CSV record: {}", err))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let mut fields = HashMap::new();
        for (idx, value) in record.iter().enumerate() {
            let field = match columns.get(idx) {
                Some(Some(field)) => *field,
                _ => continue,
            };
            let value = value.trim();
            if !value.is_empty() {
                fields.insert(field, value.to_string());
            }
        }
        records.push(CsvRecord { line, fields });
    }
    Ok(CsvTable { records })
}

#[cfg(test)]
mod tests {
    use super::{read_records, Field};

    #[test]
    fn headers_alias_across_languages() {
        assert_eq!(Field::from_header("Year"), Some(Field::Year));
        assert_eq!(Field::from_header(" ÅR "), Some(Field::Year));
        assert_eq!(Field::from_header("Uke"), Some(Field::Week));
        assert_eq!(Field::from_header("Ukedag"), Some(Field::Weekday));
        assert_eq!(Field::from_header("Måltid"), Some(Field::Meal));
        assert_eq!(Field::from_header("Alternativ"), Some(Field::Alt));
        assert_eq!(Field::from_header("Rett"), Some(Field::Text));
        assert_eq!(Field::from_header("Kommentar"), None);
    }

    #[test]
    fn byte_order_mark_is_tolerated() {
        let bytes = "\u{feff}Year,Week\n2025,49\n".as_bytes();
        let table = read_records(bytes).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].get(Field::Year), Some("2025"));
        assert_eq!(table.records[0].get(Field::Week), Some("49"));
    }

    #[test]
    fn line_numbers_count_from_the_header() {
        let bytes = "Year,Week\n2025,49\n2025,50\n".as_bytes();
        let table = read_records(bytes).unwrap();
        assert_eq!(table.records[0].line, 2);
        assert_eq!(table.records[1].line, 3);
    }

    #[test]
    fn blank_rows_are_detectable() {
        let bytes = "Year,Week,Text\n,,\n2025,49,Fisk\n".as_bytes();
        let table = read_records(bytes).unwrap();
        assert!(table.records[0].is_blank());
        assert!(!table.records[1].is_blank());
    }

    #[test]
    fn values_are_trimmed_and_unknown_columns_skipped() {
        let bytes = "Year, Kommentar ,Text\n2025,ignore me,  Köttbullar  \n".as_bytes();
        let table = read_records(bytes).unwrap();
        assert_eq!(table.records[0].get(Field::Text), Some("Köttbullar"));
        assert_eq!(table.records[0].get(Field::Year), Some("2025"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let result = read_records(&[0xff, 0xfe, 0x00]);
        assert!(result.is_err());
    }
}
