use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical weekday, the one day encoding used throughout the pipeline.
/// Parsers adapt their own localized tokens at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

// (token, day, part of the Swedish/English subset)
const DAY_TOKENS: &[(&str, Weekday, bool)] = &[
    ("måndag", Weekday::Monday, true),
    ("mån", Weekday::Monday, true),
    ("mandag", Weekday::Monday, false),
    ("monday", Weekday::Monday, true),
    ("tisdag", Weekday::Tuesday, true),
    ("tis", Weekday::Tuesday, true),
    ("tirsdag", Weekday::Tuesday, false),
    ("tuesday", Weekday::Tuesday, true),
    ("onsdag", Weekday::Wednesday, true),
    ("ons", Weekday::Wednesday, true),
    ("wednesday", Weekday::Wednesday, true),
    ("torsdag", Weekday::Thursday, true),
    ("tors", Weekday::Thursday, true),
    ("tor", Weekday::Thursday, true),
    ("thursday", Weekday::Thursday, true),
    ("fredag", Weekday::Friday, true),
    ("fre", Weekday::Friday, true),
    ("friday", Weekday::Friday, true),
    ("lördag", Weekday::Saturday, true),
    ("lör", Weekday::Saturday, true),
    ("lørdag", Weekday::Saturday, false),
    ("saturday", Weekday::Saturday, true),
    ("söndag", Weekday::Sunday, true),
    ("sön", Weekday::Sunday, true),
    ("søndag", Weekday::Sunday, false),
    ("sunday", Weekday::Sunday, true),
];

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// ISO ordinal, Monday = 1.
    pub fn ordinal(&self) -> u8 {
        *self as u8 + 1
    }

    /// Stable three-letter code.
    pub fn short_code(&self) -> &'static str {
        match self {
            Weekday::Monday => "mon",
            Weekday::Tuesday => "tue",
            Weekday::Wednesday => "wed",
            Weekday::Thursday => "thu",
            Weekday::Friday => "fri",
            Weekday::Saturday => "sat",
            Weekday::Sunday => "sun",
        }
    }

    /// Canonicalizes a localized day token: Swedish full names and
    /// abbreviations, Norwegian full names, English full names. Matching
    /// trims and ignores case; unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Weekday> {
        Self::lookup(token).map(|(day, _)| day)
    }

    /// Same table restricted to the Swedish and English tokens, for the
    /// strict line grammar.
    pub fn from_sv_en_token(token: &str) -> Option<Weekday> {
        Self::lookup(token).and_then(|(day, sv_en)| sv_en.then_some(day))
    }

    fn lookup(token: &str) -> Option<(Weekday, bool)> {
        let token = token.trim().to_lowercase();
        DAY_TOKENS
            .iter()
            .find(|(t, _, _)| *t == token)
            .map(|(_, day, sv_en)| (*day, *sv_en))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Lunch,
    Dinner,
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
        })
    }
}

/// A menu slot within a meal: one of several simultaneously offered
/// dish choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Main,
    Alt1,
    Alt2,
    Dessert,
    Evening,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Main => "main",
            Variant::Alt1 => "alt1",
            Variant::Alt2 => "alt2",
            Variant::Dessert => "dessert",
            Variant::Evening => "evening",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedMenuItem {
    pub day: Weekday,
    pub meal: Meal,
    pub variant: Variant,
    pub dish_name: String,
    pub category: Option<String>,
    /// Raw markers that produced this item, kept for diagnostics.
    pub source_labels: Vec<String>,
}

impl ImportedMenuItem {
    /// Returns `None` when the dish text trims to nothing; empty lines
    /// never produce an item.
    pub fn new(day: Weekday, meal: Meal, variant: Variant, dish_name: &str) -> Option<Self> {
        let dish_name = dish_name.trim();
        if dish_name.is_empty() {
            return None;
        }
        Some(Self {
            day,
            meal,
            variant,
            dish_name: dish_name.to_string(),
            category: None,
            source_labels: Vec::new(),
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_labels.push(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekImport {
    pub year: i32,
    pub week: u32,
    pub items: Vec<ImportedMenuItem>,
}

impl WeekImport {
    /// Callers only open weeks from recognized headers, validated to the
    /// 1..=53 range beforehand.
    pub fn new(year: i32, week: u32) -> Self {
        debug_assert!((1..=53).contains(&week));
        Self {
            year,
            week,
            items: Vec::new(),
        }
    }
}

/// The sole output of the import pipeline. Constructed fresh for every
/// parse call and owned by the caller afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuImportResult {
    pub weeks: Vec<WeekImport>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl MenuImportResult {
    /// Result shape for a failed import: one error, nothing else.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Self::default()
        }
    }
}
