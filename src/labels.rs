//! Shared line grammar: day headers and labeled meal lines, with the
//! lenient/strict divergence made an explicit policy instead of being
//! hardcoded per parser.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{Meal, Variant, Weekday};

/// How a line that matches no label is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlabeledPolicy {
    /// Bucket into lunch/alt1 with the `unlabeled` source label.
    Lenient,
    /// Drop the line.
    Strict,
}

/// A labeled-line rule: prefix pattern plus the bucket it selects.
pub struct LabelRule {
    pattern: Regex,
    meal: Meal,
    variant: Variant,
    category: &'static str,
    source_label: &'static str,
}

impl LabelRule {
    fn new(
        pattern: &str,
        meal: Meal,
        variant: Variant,
        category: &'static str,
        source_label: &'static str,
    ) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("label pattern to compile"),
            meal,
            variant,
            category,
            source_label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMatch<'a> {
    pub meal: Meal,
    pub variant: Variant,
    pub category: &'static str,
    pub source_label: &'static str,
    /// Dish text left after the label.
    pub text: &'a str,
}

lazy_static! {
    /// The strict grammar's six labels, tested in this order.
    static ref STRICT_RULES: Vec<LabelRule> = vec![
        LabelRule::new(r"(?i)^lunch\b\s*:?\s*(.*)$", Meal::Lunch, Variant::Alt1, "main", "lunch"),
        LabelRule::new(r"(?i)^middag\b\s*:?\s*(.*)$", Meal::Dinner, Variant::Evening, "evening", "middag"),
        LabelRule::new(r"(?i)^kväll(?:smat)?\b\s*:?\s*(.*)$", Meal::Dinner, Variant::Evening, "evening", "kväll"),
        LabelRule::new(r"(?i)^alt(?:ernativ)?\s*\.?\s*1\b\s*:?\s*(.*)$", Meal::Lunch, Variant::Alt1, "main", "alt1"),
        LabelRule::new(r"(?i)^alt(?:ernativ)?\s*\.?\s*2\b\s*:?\s*(.*)$", Meal::Lunch, Variant::Alt2, "main", "alt2"),
        LabelRule::new(r"(?i)^dessert\b\s*:?\s*(.*)$", Meal::Lunch, Variant::Dessert, "dessert", "dessert"),
    ];

    /// Labels understood by the lenient word-processor grammar.
    static ref LENIENT_RULES: Vec<LabelRule> = vec![
        LabelRule::new(r"(?i)^(?:alt\s*\.?\s*1|alternativ\s*1|lunch)\b\s*:?\s*(.*)$", Meal::Lunch, Variant::Alt1, "main", "alt1"),
        LabelRule::new(r"(?i)^(?:alt\s*\.?\s*2|alternativ\s*2)\b\s*:?\s*(.*)$", Meal::Lunch, Variant::Alt2, "main", "alt2"),
        LabelRule::new(r"(?i)^dessert\s*:\s*(.*)$", Meal::Lunch, Variant::Dessert, "dessert", "dessert"),
        LabelRule::new(r"(?i)^kväll\s*:\s*(.*)$", Meal::Dinner, Variant::Main, "evening", "kväll"),
    ];
}

pub fn strict_rules() -> &'static [LabelRule] {
    &STRICT_RULES
}

pub fn lenient_rules() -> &'static [LabelRule] {
    &LENIENT_RULES
}

/// Tests a line against the given rules in order. With the lenient
/// policy an unlabeled line still lands in the default lunch/alt1
/// bucket; with the strict policy it yields `None`.
pub fn match_label<'a>(
    line: &'a str,
    rules: &'static [LabelRule],
    policy: UnlabeledPolicy,
) -> Option<LabelMatch<'a>> {
    for rule in rules {
        if let Some(caps) = rule.pattern.captures(line) {
            let text = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            return Some(LabelMatch {
                meal: rule.meal,
                variant: rule.variant,
                category: rule.category,
                source_label: rule.source_label,
                text,
            });
        }
    }
    match policy {
        UnlabeledPolicy::Lenient => Some(LabelMatch {
            meal: Meal::Lunch,
            variant: Variant::Alt1,
            category: "main",
            source_label: "unlabeled",
            text: line.trim(),
        }),
        UnlabeledPolicy::Strict => None,
    }
}

/// Matches a day token at the start of a line, either as the text before
/// the first colon or as the first word, and returns the canonical day
/// plus the remainder of the line.
pub fn match_day(line: &str, sv_en_only: bool) -> Option<(Weekday, &str)> {
    let parse = |token: &str| {
        if sv_en_only {
            Weekday::from_sv_en_token(token)
        } else {
            Weekday::from_token(token)
        }
    };

    if let Some((head, tail)) = line.split_once(':') {
        if let Some(day) = parse(head) {
            return Some((day, tail.trim()));
        }
        // day token at line start with trailing text before the colon,
        // e.g. "Måndag 3/2: ..."
        if let Some(day) = head.split_whitespace().next().and_then(parse) {
            return Some((day, tail.trim()));
        }
        return None;
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    let day = parse(parts.next()?)?;
    Some((day, parts.next().unwrap_or("").trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_labels_match_in_declared_order() {
        let m = match_label("Lunch: Köttbullar", strict_rules(), UnlabeledPolicy::Strict).unwrap();
        assert_eq!((m.meal, m.variant, m.text), (Meal::Lunch, Variant::Alt1, "Köttbullar"));
        assert_eq!(m.source_label, "lunch");

        let m = match_label("Middag: Lasagne", strict_rules(), UnlabeledPolicy::Strict).unwrap();
        assert_eq!((m.meal, m.variant), (Meal::Dinner, Variant::Evening));
        assert_eq!(m.source_label, "middag");

        let m = match_label("Kväll: Smörgåsar", strict_rules(), UnlabeledPolicy::Strict).unwrap();
        assert_eq!((m.meal, m.variant), (Meal::Dinner, Variant::Evening));
        assert_eq!(m.source_label, "kväll");

        let m = match_label("Alternativ 2 Fiskgratäng", strict_rules(), UnlabeledPolicy::Strict)
            .unwrap();
        assert_eq!(m.variant, Variant::Alt2);

        let m = match_label("Dessert: Pannacotta", strict_rules(), UnlabeledPolicy::Strict).unwrap();
        assert_eq!((m.variant, m.category), (Variant::Dessert, "dessert"));
    }

    #[test]
    fn strict_policy_drops_unlabeled_lines() {
        assert_eq!(
            match_label("Pannbiff med lök", strict_rules(), UnlabeledPolicy::Strict),
            None
        );
    }

    #[test]
    fn lenient_policy_buckets_unlabeled_lines() {
        let m = match_label("Pannbiff med lök", lenient_rules(), UnlabeledPolicy::Lenient).unwrap();
        assert_eq!((m.meal, m.variant), (Meal::Lunch, Variant::Alt1));
        assert_eq!((m.category, m.source_label), ("main", "unlabeled"));
        assert_eq!(m.text, "Pannbiff med lök");
    }

    #[test]
    fn label_prefixes_respect_word_boundaries() {
        // "Lunchrätt..." is not the label "Lunch"
        assert_eq!(
            match_label("Lunchrätter serveras 11-13", strict_rules(), UnlabeledPolicy::Strict),
            None
        );
        let m = match_label("lunch Pytt i panna", strict_rules(), UnlabeledPolicy::Strict).unwrap();
        assert_eq!(m.text, "Pytt i panna");
    }

    #[test]
    fn lenient_kvall_maps_to_dinner_main() {
        let m = match_label("Kväll: Gröt", lenient_rules(), UnlabeledPolicy::Lenient).unwrap();
        assert_eq!((m.meal, m.variant, m.category), (Meal::Dinner, Variant::Main, "evening"));
    }

    #[test]
    fn day_matching_splits_on_colon_or_first_word() {
        assert_eq!(
            match_day("Söndag: Lunch: Biff", false),
            Some((Weekday::Sunday, "Lunch: Biff"))
        );
        assert_eq!(
            match_day("Måndag 3/2: Alt 1 Soppa", false),
            Some((Weekday::Monday, "Alt 1 Soppa"))
        );
        assert_eq!(match_day("tisdag", false), Some((Weekday::Tuesday, "")));
        assert_eq!(
            match_day("Onsdag Fiskpinnar", false),
            Some((Weekday::Wednesday, "Fiskpinnar"))
        );
        assert_eq!(match_day("Lunch: Biff", false), None);
    }

    #[test]
    fn day_matching_can_be_restricted_to_swedish_and_english() {
        assert_eq!(match_day("Søndag: x", true), None);
        assert_eq!(match_day("Søndag: x", false), Some((Weekday::Sunday, "x")));
    }
}
