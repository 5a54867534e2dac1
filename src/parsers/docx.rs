use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use veckomeny_collector::{docx, Line};

use crate::labels::{lenient_rules, match_day, match_label, UnlabeledPolicy};
use crate::model::{ImportedMenuItem, MenuImportResult, WeekImport, Weekday};
use crate::{MenuParser, Upload};

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOC_MIME: &str = "application/msword";

lazy_static! {
    static ref WEEK_HEADERS: Vec<Regex> = vec![
        Regex::new(r"(?i)\bvecka\s+(\d{1,2})\b").expect("vecka header to compile"),
        Regex::new(r"(?i)\bv\.?\s*(\d{1,2})\b").expect("v header to compile"),
        Regex::new(r"(?i)\bweek\s+(\d{1,2})\b").expect("week header to compile"),
    ];
}

pub(crate) fn accepts_word_upload(upload: &Upload) -> bool {
    if matches!(upload.extension().as_deref(), Some("docx") | Some("doc")) {
        return true;
    }
    matches!(upload.mime, Some(mime) if mime == DOCX_MIME || mime == DOC_MIME)
}

/// The lenient word-processor parser: segments the extracted lines on
/// week headers, then attributes labeled and unlabeled lines to the
/// current day. Lines that match no label still produce an item in the
/// default lunch bucket.
pub struct DocxMenuParser {
    default_year: i32,
}

impl DocxMenuParser {
    pub fn new(default_year: i32) -> Self {
        Self { default_year }
    }

    fn week_number(line: &str) -> Option<u32> {
        WEEK_HEADERS.iter().find_map(|header| {
            let caps = header.captures(line)?;
            let week = caps[1].parse().ok()?;
            (1..=52).contains(&week).then_some(week)
        })
    }

    pub fn parse_lines(&self, lines: &[Line]) -> MenuImportResult {
        let mut result = MenuImportResult::default();

        // pass 1: split into week segments, dropping everything before
        // the first recognized header
        let mut segments: Vec<(u32, Vec<&Line>)> = Vec::new();
        for line in lines {
            if let Some(week) = Self::week_number(&line.text) {
                debug!("week header at {}: {}", line.position, line.text);
                segments.push((week, Vec::new()));
            } else if let Some((_, segment)) = segments.last_mut() {
                segment.push(line);
            }
        }
        if segments.is_empty() {
            result
                .errors
                .push("no week headers recognized in document".to_string());
            return result;
        }

        // pass 2: items per segment
        for (week, segment) in segments {
            let mut import = WeekImport::new(self.default_year, week);
            let mut current_day: Option<Weekday> = None;
            for line in segment {
                let mut text = line.text.as_str();
                if let Some((day, rest)) = match_day(text, false) {
                    current_day = Some(day);
                    if rest.is_empty() {
                        continue;
                    }
                    text = rest;
                }
                let day = match current_day {
                    Some(day) => day,
                    None => continue,
                };
                let matched = match match_label(text, lenient_rules(), UnlabeledPolicy::Lenient) {
                    Some(matched) => matched,
                    None => continue,
                };
                if let Some(item) = ImportedMenuItem::new(day, matched.meal, matched.variant, matched.text)
                {
                    import.items.push(
                        item.with_category(matched.category)
                            .with_source_label(matched.source_label),
                    );
                }
            }
            if import.items.is_empty() {
                result
                    .warnings
                    .push(format!("week {} contained no menu items", week));
            }
            result.weeks.push(import);
        }
        result
    }
}

impl MenuParser for DocxMenuParser {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn available(&self) -> bool {
        docx::available()
    }

    fn accepts(&self, upload: &Upload) -> bool {
        accepts_word_upload(upload)
    }

    fn parse(&self, upload: &Upload) -> anyhow::Result<MenuImportResult> {
        let lines = match docx::extract_lines(upload.bytes) {
            Ok(lines) => lines,
            Err(err) => return Ok(MenuImportResult::failure(format!("{:#}", err))),
        };
        Ok(self.parse_lines(&lines))
    }
}
