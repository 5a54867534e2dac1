use anyhow::anyhow;
use tracing::debug;

use crate::model::MenuImportResult;
use crate::parsers::{CsvMenuParser, DocxMenuParser, SheetMenuParser, StrictDocxMenuParser};
use crate::{MenuParser, Upload};

/// Ordered set of importers. The first one whose acceptance predicate
/// matches an upload handles it alone; results are never merged across
/// importers.
pub struct Registry {
    parsers: Vec<Box<dyn MenuParser>>,
}

pub struct RegistryBuilder {
    parsers: Vec<Box<dyn MenuParser>>,
}

impl RegistryBuilder {
    pub fn register(mut self, parser: impl 'static + MenuParser) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    pub fn build(self) -> anyhow::Result<Registry> {
        let mut names = Vec::new();
        for parser in &self.parsers {
            let name = parser.name();
            if names.contains(&name) {
                return Err(anyhow!("importer {} already registered", name));
            }
            names.push(name);
        }
        Ok(Registry {
            parsers: self.parsers,
        })
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            parsers: Vec::new(),
        }
    }

    /// The production importer order: word-processor documents, then
    /// `Uke` workbooks, then CSV. With `strict_docx` the lenient
    /// word-processor grammar is swapped for the strict line grammar.
    pub fn standard(default_year: i32, strict_docx: bool) -> anyhow::Result<Registry> {
        let builder = Registry::builder();
        let builder = if strict_docx {
            builder.register(StrictDocxMenuParser::new(default_year))
        } else {
            builder.register(DocxMenuParser::new(default_year))
        };
        builder
            .register(SheetMenuParser::new(default_year))
            .register(CsvMenuParser::new())
            .build()
    }

    pub fn get(&self, name: &str) -> Option<&dyn MenuParser> {
        self.parsers
            .iter()
            .find(|parser| parser.name() == name)
            .map(|parser| &**parser)
    }

    pub fn parsers(&self) -> impl Iterator<Item = &dyn MenuParser> {
        self.parsers.iter().map(|parser| &**parser)
    }

    pub fn import(&self, upload: &Upload) -> MenuImportResult {
        for parser in &self.parsers {
            if !parser.available() {
                debug!("importer {} unavailable, skipped", parser.name());
                continue;
            }
            if !parser.accepts(upload) {
                continue;
            }
            debug!("importer {} accepted {}", parser.name(), upload.filename);
            return match parser.parse(upload) {
                Ok(result) => result,
                Err(err) => MenuImportResult::failure(format!(
                    "importer '{}' failed: {:#}",
                    parser.name(),
                    err
                )),
            };
        }
        MenuImportResult::failure("No importer accepted file")
    }
}
