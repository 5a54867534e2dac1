mod csv;
mod docx;
mod lines;
mod sheet;

pub use self::csv::CsvMenuParser;
pub use self::docx::DocxMenuParser;
pub use self::lines::{MenuLineParser, StrictDocxMenuParser};
pub use self::sheet::SheetMenuParser;
