use veckomeny_collector::sheet::{self, WeekGrid};

use crate::model::{ImportedMenuItem, Meal, MenuImportResult, Variant, WeekImport, Weekday};
use crate::{MenuParser, Upload};

const EXTENSIONS: [&str; 4] = ["xls", "xlsb", "xlsx", "ods"];
const MIME_TYPES: [&str; 3] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/vnd.oasis.opendocument.spreadsheet",
];

// Row cells that hold metadata rather than a dish.
const NON_DISH_MARKERS: [&str; 4] = ["Navn:", "Oppskriftsreferanse", "Kategori:", "Kommentar"];

const DAY_COLUMN: usize = 0;
const CATEGORY_COLUMN: usize = 1;
const DISH_COLUMN: usize = 3;

/// Imports workbooks with one `Uke <n>` sheet per week. Only lunch rows
/// are modelled in this format; dinner rows were never part of it and
/// every parse says so in a warning rather than guessing.
pub struct SheetMenuParser {
    default_year: i32,
}

impl SheetMenuParser {
    pub fn new(default_year: i32) -> Self {
        Self { default_year }
    }

    pub fn parse_grids(&self, grids: &[WeekGrid]) -> MenuImportResult {
        let mut result = MenuImportResult::default();
        if grids.is_empty() {
            result
                .errors
                .push("no 'Uke <n>' sheets found in workbook".to_string());
            return result;
        }
        result.warnings.push(
            "spreadsheet import only extracts lunch rows; dinner rows are not supported"
                .to_string(),
        );

        for grid in grids {
            if !(1..=53).contains(&grid.week) {
                result.warnings.push(format!(
                    "sheet 'Uke {}' skipped: week number out of range",
                    grid.week
                ));
                continue;
            }
            let mut import = WeekImport::new(self.default_year, grid.week);
            let mut current_day: Option<Weekday> = None;
            for row in &grid.rows {
                if let Some(day) = row.get(DAY_COLUMN).and_then(|cell| Weekday::from_token(cell)) {
                    current_day = Some(day);
                }
                let day = match current_day {
                    Some(day) => day,
                    None => continue,
                };
                let dish = row.get(DISH_COLUMN).map(|cell| cell.trim()).unwrap_or("");
                if dish.is_empty() || NON_DISH_MARKERS.iter().any(|m| dish.starts_with(m)) {
                    continue;
                }
                if let Some(mut item) = ImportedMenuItem::new(day, Meal::Lunch, Variant::Main, dish)
                {
                    if let Some(category) = row
                        .get(CATEGORY_COLUMN)
                        .map(|cell| cell.trim())
                        .filter(|cell| !cell.is_empty())
                    {
                        item = item.with_category(category);
                    }
                    import
                        .items
                        .push(item.with_source_label(format!("uke {}", grid.week)));
                }
            }
            result.weeks.push(import);
        }
        result
    }
}

impl MenuParser for SheetMenuParser {
    fn name(&self) -> &'static str {
        "sheet"
    }

    fn available(&self) -> bool {
        sheet::available()
    }

    fn accepts(&self, upload: &Upload) -> bool {
        if matches!(upload.extension().as_deref(), Some(ext) if EXTENSIONS.contains(&ext)) {
            return true;
        }
        matches!(upload.mime, Some(mime) if MIME_TYPES.contains(&mime))
    }

    fn parse(&self, upload: &Upload) -> anyhow::Result<MenuImportResult> {
        let grids = match sheet::extract_week_grids(upload.bytes) {
            Ok(grids) => grids,
            Err(err) => return Ok(MenuImportResult::failure(format!("{:#}", err))),
        };
        Ok(self.parse_grids(&grids))
    }
}
