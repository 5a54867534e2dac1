use veckomeny::model::{Meal, Variant, Weekday};
use veckomeny::{Registry, Upload};

const CSV_UPLOAD: &str = "Year,Week,Weekday,Meal,Alt,Text\n\
                          2025,49,Monday,Lunch,Alt1,Köttbullar med potatis\n\
                          2025,49,Monday,Lunch,Alt2,Fiskgratäng\n\
                          2025,49,Monday,Kvällsmat,,Smörgåsar\n";

#[test]
fn csv_uploads_import_end_to_end() {
    let registry = Registry::standard(2025, false).unwrap();
    let upload = Upload::new(CSV_UPLOAD.as_bytes(), "matsedel.csv", Some("text/csv"));
    let result = registry.import(&upload);

    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    assert_eq!(result.weeks.len(), 1);
    let week = &result.weeks[0];
    assert_eq!((week.year, week.week), (2025, 49));
    assert_eq!(week.items.len(), 3);
    assert!(week.items.iter().all(|item| item.day == Weekday::Monday));
    assert_eq!(
        (week.items[0].meal, week.items[0].variant),
        (Meal::Lunch, Variant::Alt1)
    );
    assert_eq!(
        (week.items[1].meal, week.items[1].variant),
        (Meal::Lunch, Variant::Alt2)
    );
    assert_eq!(
        (week.items[2].meal, week.items[2].variant),
        (Meal::Dinner, Variant::Evening)
    );
}

#[test]
fn invalid_csv_rows_surface_as_a_single_import_error() {
    let registry = Registry::standard(2025, false).unwrap();
    let bytes = "Year,Week,Weekday,Meal,Alt,Text\n2025,54,Monday,Lunch,,X\n";
    let result = registry.import(&Upload::new(bytes.as_bytes(), "matsedel.csv", None));

    assert!(result.weeks.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("importer 'csv' failed"));
    assert!(result.errors[0].contains("1 och 53"));
}

#[test]
fn unrecognized_uploads_yield_the_canonical_error() {
    let registry = Registry::standard(2025, false).unwrap();
    let result = registry.import(&Upload::new(
        b"just some plain text without delimiters",
        "notes.pdf",
        None,
    ));

    assert_eq!(result.errors, ["No importer accepted file"]);
    assert!(result.weeks.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn imports_are_deterministic() {
    let registry = Registry::standard(2025, false).unwrap();
    let upload = Upload::new(CSV_UPLOAD.as_bytes(), "matsedel.csv", None);
    assert_eq!(registry.import(&upload), registry.import(&upload));
}
