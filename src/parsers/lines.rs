use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use veckomeny_collector::{docx, Line};

use crate::labels::{match_day, match_label, strict_rules, UnlabeledPolicy};
use crate::model::{ImportedMenuItem, MenuImportResult, WeekImport, Weekday};
use crate::parsers::docx::accepts_word_upload;
use crate::{MenuParser, Upload};

lazy_static! {
    // "v 8", "v. 8", "V.12" — nothing else on the line
    static ref WEEK_HEADER: Regex =
        Regex::new(r"(?i)^v\.?\s*(\d{1,2})$").expect("WEEK_HEADER regex to compile");
    static ref MOBILE_NUMBER: Regex =
        Regex::new(r"(?:\+46|0)\s*7\d(?:[\s-]?\d){7}").expect("MOBILE_NUMBER regex to compile");
}

// Trailing boilerplate that marks the end of a week's dishes.
const FOOTER_PHRASES: [&str; 6] = [
    "trevlig helg",
    "smaklig måltid",
    "med vänlig hälsning",
    "hälsningar",
    "välkomna",
    "med reservation för ändringar",
];

struct OpenWeek {
    week: u32,
    items: Vec<ImportedMenuItem>,
    day: Option<Weekday>,
    stopped: bool,
}

/// The strict line grammar: a reusable state machine over any flat line
/// sequence. Unlabeled lines are dropped, footer lines stop the current
/// week, and the year is injected by the caller — this parser never
/// looks at a clock.
pub struct MenuLineParser {
    default_year: i32,
}

impl MenuLineParser {
    pub fn new(default_year: i32) -> Self {
        Self { default_year }
    }

    pub fn parse_text(&self, text: &str) -> MenuImportResult {
        let lines: Vec<Line> = text
            .lines()
            .enumerate()
            .map(|(i, line)| Line::new((i + 1).to_string(), line))
            .collect();
        self.parse_lines(&lines)
    }

    pub fn parse_lines(&self, lines: &[Line]) -> MenuImportResult {
        let mut result = MenuImportResult::default();
        let mut open: Option<OpenWeek> = None;

        for line in lines {
            let mut text = line.text.trim();
            if text.is_empty() {
                continue;
            }

            // 1. week header
            if let Some(caps) = WEEK_HEADER.captures(text) {
                match caps[1].parse::<u32>() {
                    Ok(week) if (1..=53).contains(&week) => {
                        self.flush(&mut open, &mut result);
                        open = Some(OpenWeek {
                            week,
                            items: Vec::new(),
                            day: None,
                            stopped: false,
                        });
                    }
                    // week-shaped but out of range: opens nothing
                    _ => debug!("rejected week header at {}: {}", line.position, text),
                }
                continue;
            }

            // 2. nothing to attach to before the first week header
            let state = match open.as_mut() {
                Some(state) => state,
                None => continue,
            };

            // 3. footer or contact noise stops the week
            if is_footer(text) {
                debug!("footer at {}: {}", line.position, text);
                state.stopped = true;
                continue;
            }

            // 4. hard stop until the next week header
            if state.stopped {
                continue;
            }

            // 5. day header, possibly fused with a meal on the same line
            if let Some((day, rest)) = match_day(text, true) {
                state.day = Some(day);
                if rest.is_empty() {
                    continue;
                }
                text = rest;
            }

            // 6. meal lines need a current day
            let day = match state.day {
                Some(day) => day,
                None => continue,
            };

            // 7. the six fixed labels; anything else is dropped
            let matched = match match_label(text, strict_rules(), UnlabeledPolicy::Strict) {
                Some(matched) => matched,
                None => continue,
            };
            if let Some(item) = ImportedMenuItem::new(day, matched.meal, matched.variant, matched.text)
            {
                state.items.push(
                    item.with_category(matched.category)
                        .with_source_label(matched.source_label),
                );
            }
        }

        self.flush(&mut open, &mut result);
        result
    }

    fn flush(&self, open: &mut Option<OpenWeek>, result: &mut MenuImportResult) {
        if let Some(state) = open.take() {
            let mut import = WeekImport::new(self.default_year, state.week);
            import.items = state.items;
            result.weeks.push(import);
        }
    }
}

fn is_footer(line: &str) -> bool {
    let lower = line.to_lowercase();
    FOOTER_PHRASES.iter().any(|phrase| lower.contains(phrase)) || MOBILE_NUMBER.is_match(line)
}

/// The strict grammar behind the word-processor extractor, for callers
/// that prefer dropped lines over guessed buckets.
pub struct StrictDocxMenuParser {
    inner: MenuLineParser,
}

impl StrictDocxMenuParser {
    pub fn new(default_year: i32) -> Self {
        Self {
            inner: MenuLineParser::new(default_year),
        }
    }
}

impl MenuParser for StrictDocxMenuParser {
    fn name(&self) -> &'static str {
        "docx-strict"
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
        Ok(self.inner.parse_lines(&lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Meal, Variant};

    fn parser() -> MenuLineParser {
        MenuLineParser::new(2025)
    }

    #[test]
    fn week_headers_must_be_in_range() {
        let result = parser().parse_text("v. 8\nMåndag: Lunch: Soppa\n");
        assert_eq!(result.weeks.len(), 1);
        assert_eq!(result.weeks[0].week, 8);

        // the pattern matches two digits but the value is still rejected
        let result = parser().parse_text("v. 99\nMåndag: Lunch: Soppa\n");
        assert!(result.weeks.is_empty());
        let result = parser().parse_text("v 0\nMåndag: Lunch: Soppa\n");
        assert!(result.weeks.is_empty());
        let result = parser().parse_text("v53\nMåndag: Lunch: Soppa\n");
        assert_eq!(result.weeks[0].week, 53);
    }

    #[test]
    fn parsing_is_deterministic_for_a_fixed_year() {
        let text = "v. 8\nMåndag: Lunch: Soppa\nAlt 2: Fisk\nTrevlig helg!\nv. 9\nTisdag: Middag: Gryta\n";
        let first = parser().parse_text(text);
        let second = parser().parse_text(text);
        assert_eq!(first, second);
    }

    #[test]
    fn lines_before_the_first_week_header_are_ignored() {
        let result = parser().parse_text("Måndag: Lunch: Soppa\nv. 8\nTisdag: Lunch: Fisk\n");
        assert_eq!(result.weeks.len(), 1);
        assert_eq!(result.weeks[0].items.len(), 1);
        assert_eq!(result.weeks[0].items[0].day, Weekday::Tuesday);
    }

    #[test]
    fn footer_suppression_does_not_leak_across_weeks() {
        let text = "v. 8\n\
                    Måndag: Lunch: Soppa\n\
                    Trevlig helg önskar köket\n\
                    Tisdag: Lunch: Fisk\n\
                    v. 9\n\
                    Onsdag: Lunch: Gryta\n";
        let result = parser().parse_text(text);
        assert_eq!(result.weeks.len(), 2);
        // week 8 stops at the footer, the Tuesday dish is gone
        assert_eq!(result.weeks[0].items.len(), 1);
        assert_eq!(result.weeks[0].items[0].dish_name, "Soppa");
        // week 9 parses completely normally
        assert_eq!(result.weeks[1].items.len(), 1);
        assert_eq!(result.weeks[1].items[0].dish_name, "Gryta");
    }

    #[test]
    fn phone_numbers_count_as_footer_noise() {
        let text = "v. 8\nMåndag: Lunch: Soppa\nRing 070-123 45 67 vid frågor\nAlt 2: Fisk\n";
        let result = parser().parse_text(text);
        assert_eq!(result.weeks[0].items.len(), 1);
    }

    #[test]
    fn day_header_and_meal_fuse_into_exactly_one_item() {
        let result = parser().parse_text("v. 8\nSöndag: Lunch: Biff Lindström med sås\n");
        let items = &result.weeks[0].items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].day, Weekday::Sunday);
        assert_eq!((items[0].meal, items[0].variant), (Meal::Lunch, Variant::Alt1));
        assert_eq!(items[0].dish_name, "Biff Lindström med sås");
    }

    #[test]
    fn middag_and_kvall_share_a_bucket_but_keep_their_labels() {
        let text = "v. 8\nMåndag\nMiddag: Lasagne\nKväll: Smörgåsar\n";
        let result = parser().parse_text(text);
        let items = &result.weeks[0].items;
        assert_eq!(items.len(), 2);
        for item in items {
            assert_eq!((item.meal, item.variant), (Meal::Dinner, Variant::Evening));
            assert_eq!(item.category.as_deref(), Some("evening"));
        }
        assert_eq!(items[0].source_labels, ["middag"]);
        assert_eq!(items[1].source_labels, ["kväll"]);
    }

    #[test]
    fn unlabeled_lines_are_dropped_not_bucketed() {
        let text = "v. 8\nMåndag\nPannbiff med lök\nLunch: Soppa\n";
        let result = parser().parse_text(text);
        assert_eq!(result.weeks[0].items.len(), 1);
        assert_eq!(result.weeks[0].items[0].dish_name, "Soppa");
    }

    #[test]
    fn meal_lines_before_any_day_are_dropped() {
        let result = parser().parse_text("v. 8\nLunch: Soppa\n");
        assert!(result.weeks[0].items.is_empty());
    }

    #[test]
    fn a_day_header_after_the_footer_stays_dead() {
        let text = "v. 8\nMåndag: Lunch: Soppa\nMed vänlig hälsning\nTisdag: Lunch: Fisk\nOnsdag: Lunch: Gryta\n";
        let result = parser().parse_text(text);
        assert_eq!(result.weeks[0].items.len(), 1);
    }

    #[test]
    fn the_injected_year_tags_every_week(){
        let result = MenuLineParser::new(2031).parse_text("v. 8\nMåndag: Lunch: Soppa\n");
        assert_eq!(result.weeks[0].year, 2031);
    }

    #[test]
    fn the_final_week_is_flushed_at_end_of_input() {
        let result = parser().parse_text("v. 8\nMåndag: Lunch: Soppa\nv. 9\n");
        assert_eq!(result.weeks.len(), 2);
        assert!(result.weeks[1].items.is_empty());
    }
}
