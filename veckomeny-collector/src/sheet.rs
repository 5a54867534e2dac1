/// One `Uke <n>` worksheet read as a raw, headerless grid of trimmed
/// cell strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
    pub week: u32,
    pub rows: Vec<Vec<String>>,
}

/// Whether the workbook reader was compiled in.
pub fn available() -> bool {
    cfg!(feature = "spreadsheet")
}

/// Opens the workbook and returns a grid for every sheet whose name
/// matches `Uke <number>` (case-insensitive). Other sheets are ignored.
#[cfg(feature = "spreadsheet")]
#[tracing::instrument(skip(bytes))]
pub fn extract_week_grids(bytes: &[u8]) -> anyhow::Result<Vec<WeekGrid>> {
    use std::io::Cursor;

    use anyhow::anyhow;
    use calamine::{open_workbook_auto_from_rs, Reader};
    use tracing::debug;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| anyhow!("failed to open workbook: {}", err))?;

    let names = workbook.sheet_names().to_owned();
    let mut grids = Vec::new();
    for name in names {
        let week = match sheet_week(&name) {
            Some(week) => week,
            None => continue,
        };
        let range = workbook
            .worksheet_range(&name)
            .map_err(|err| anyhow!("failed to read worksheet {}: {}", name, err))?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        debug!("collected sheet {} as week {}", name, week);
        grids.push(WeekGrid { week, rows });
    }
    Ok(grids)
}

#[cfg(not(feature = "spreadsheet"))]
pub fn extract_week_grids(_bytes: &[u8]) -> anyhow::Result<Vec<WeekGrid>> {
    Err(anyhow::anyhow!(
        "workbook reader not available: built without the 'spreadsheet' feature"
    ))
}

fn sheet_week(name: &str) -> Option<u32> {
    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        static ref UKE_SHEET: Regex =
            Regex::new(r"(?i)^uke\s*(\d{1,2})$").expect("UKE_SHEET regex to compile");
    }
    UKE_SHEET
        .captures(name.trim())
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(feature = "spreadsheet")]
fn cell_to_string(cell: &calamine::DataType) -> String {
    use calamine::DataType;

    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.trim().to_string(),
        DataType::Float(f) => {
            if f.fract().abs() < f64::EPSILON {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        DataType::Int(v) => v.to_string(),
        DataType::Bool(v) => v.to_string(),
        DataType::Error(_) => String::new(),
        _ => cell.to_string(),
    }
}
