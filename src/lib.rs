use std::path::Path;

pub mod error;
pub mod labels;
pub mod model;
pub mod parsers;
pub mod registry;

pub use model::{ImportedMenuItem, Meal, MenuImportResult, Variant, WeekImport, Weekday};
pub use registry::Registry;

const SNIFF_LEN: usize = 256;

/// An uploaded document: raw bytes plus whatever the caller knows about
/// where they came from. The import pipeline never touches the file
/// system itself.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub bytes: &'a [u8],
    pub filename: &'a str,
    pub mime: Option<&'a str>,
}

impl<'a> Upload<'a> {
    pub fn new(bytes: &'a [u8], filename: &'a str, mime: Option<&'a str>) -> Self {
        Self {
            bytes,
            filename,
            mime,
        }
    }

    /// Lowercased filename extension, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Sample of the first bytes, used by acceptance predicates.
    pub fn sniff(&self) -> &'a [u8] {
        &self.bytes[..self.bytes.len().min(SNIFF_LEN)]
    }
}

pub trait MenuParser: Sync + Send {
    fn name(&self) -> &'static str;

    /// Capability probe; unavailable parsers are skipped by the registry
    /// instead of failing at parse time.
    fn available(&self) -> bool {
        true
    }

    /// Whether this parser wants the upload, judged on filename, MIME
    /// type and the sniff sample only.
    fn accepts(&self, upload: &Upload) -> bool;

    fn parse(&self, upload: &Upload) -> anyhow::Result<MenuImportResult>;
}
