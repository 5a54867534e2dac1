use lazy_static::lazy_static;
use regex::Regex;

use veckomeny_collector::csv::{read_records, CsvRecord, Field};

use crate::error::CsvImportError;
use crate::model::{ImportedMenuItem, Meal, MenuImportResult, Variant, WeekImport, Weekday};
use crate::{MenuParser, Upload};

// Meal names that always land in the dinner bucket, whatever the alt
// column says.
const DINNER_MEALS: [&str; 8] = [
    "kvällsmat", "kväll", "kveld", "kveldsmat", "middag", "dinner", "supper", "evening",
];
const DESSERT_MEALS: [&str; 2] = ["dessert", "efterrätt"];

lazy_static! {
    static ref ALT_MARKER: Regex =
        Regex::new(r"(?i)^alt(?:ernativ)?\s*\.?\s*([12])$").expect("ALT_MARKER regex to compile");
}

/// The CSV importer. Unlike the document parsers this path is fatal on
/// the first invalid row: either the whole file imports or none of it
/// does, and the caller gets a [`CsvImportError`] saying which row broke.
pub struct CsvMenuParser;

impl CsvMenuParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<MenuImportResult, CsvImportError> {
        let table =
            read_records(bytes).map_err(|err| CsvImportError::Malformed(format!("{:#}", err)))?;

        let mut grouped: Vec<((i32, u32), Vec<ImportedMenuItem>)> = Vec::new();
        for record in &table.records {
            if record.is_blank() {
                continue;
            }
            let (year, week, item) = map_record(record)?;
            match grouped.iter_mut().find(|((y, w), _)| (*y, *w) == (year, week)) {
                Some((_, items)) => items.push(item),
                None => grouped.push(((year, week), vec![item])),
            }
        }

        let mut result = MenuImportResult::default();
        for ((year, week), items) in grouped {
            let mut import = WeekImport::new(year, week);
            import.items = items;
            result.weeks.push(import);
        }
        Ok(result)
    }
}

impl Default for CsvMenuParser {
    fn default() -> Self {
        Self::new()
    }
}

fn require<'a>(record: &'a CsvRecord, field: Field) -> Result<&'a str, CsvImportError> {
    record.get(field).ok_or(CsvImportError::MissingField {
        row: record.line,
        field: field.label(),
    })
}

fn map_record(record: &CsvRecord) -> Result<(i32, u32, ImportedMenuItem), CsvImportError> {
    let row = record.line;
    let year_raw = require(record, Field::Year)?;
    let week_raw = require(record, Field::Week)?;
    let weekday_raw = require(record, Field::Weekday)?;
    let meal_raw = require(record, Field::Meal)?;
    let text_raw = require(record, Field::Text)?;

    let year: i32 = year_raw.parse().map_err(|_| CsvImportError::InvalidYear {
        row,
        value: year_raw.to_string(),
    })?;
    let week: i64 = week_raw.parse().map_err(|_| CsvImportError::InvalidWeek {
        row,
        value: week_raw.to_string(),
    })?;
    if !(1..=53).contains(&week) {
        return Err(CsvImportError::WeekOutOfRange { row, week });
    }
    let day = Weekday::from_token(weekday_raw).ok_or_else(|| CsvImportError::UnknownWeekday {
        row,
        value: weekday_raw.to_string(),
    })?;

    let meal_name = meal_raw.to_lowercase();
    let alt_raw = record.get(Field::Alt);
    let alt_variant = alt_raw.and_then(|marker| {
        let marker = marker.to_lowercase();
        if marker == "dessert" {
            return Some(Variant::Dessert);
        }
        match ALT_MARKER.captures(&marker).map(|caps| caps[1].to_string())?.as_str() {
            "1" => Some(Variant::Alt1),
            _ => Some(Variant::Alt2),
        }
    });

    let (meal, variant, category) = if DINNER_MEALS.contains(&meal_name.as_str()) {
        // dinner rows ignore the alt marker entirely
        (Meal::Dinner, Variant::Evening, "evening")
    } else {
        let variant = alt_variant.unwrap_or_else(|| {
            if DESSERT_MEALS.contains(&meal_name.as_str()) {
                Variant::Dessert
            } else {
                Variant::Alt1
            }
        });
        let category = if variant == Variant::Dessert {
            "dessert"
        } else {
            "main"
        };
        (Meal::Lunch, variant, category)
    };

    let mut item = ImportedMenuItem::new(day, meal, variant, text_raw)
        .ok_or(CsvImportError::MissingField {
            row,
            field: Field::Text.label(),
        })?
        .with_category(category)
        .with_source_label(meal_raw);
    if let Some(alt) = alt_raw {
        item = item.with_source_label(alt);
    }
    Ok((year, week as u32, item))
}

impl MenuParser for CsvMenuParser {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn accepts(&self, upload: &Upload) -> bool {
        if upload.extension().as_deref() == Some("csv") {
            return true;
        }
        if matches!(upload.mime, Some(mime) if mime == "text/csv" || mime == "application/csv") {
            return true;
        }
        // bare text uploads are accepted when the sample reads like
        // delimited text
        matches!(upload.extension().as_deref(), Some("txt") | None)
            && looks_like_delimited_text(upload.sniff())
    }

    fn parse(&self, upload: &Upload) -> anyhow::Result<MenuImportResult> {
        Ok(Self::parse_bytes(upload.bytes)?)
    }
}

fn looks_like_delimited_text(sample: &[u8]) -> bool {
    let text = String::from_utf8_lossy(sample);
    let first = text.lines().next().unwrap_or("");
    first.contains(',') || first.contains(';')
}
