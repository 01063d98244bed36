// End-to-end extraction behavior across recognizer families
// WHY: The sorted single-threaded extract and the unsorted parallel
// concatenation are both load-bearing contracts for callers

use flowtext::{extract_all_parallel, Entity, EntityExtractor, EntityType, Match};

/// Structured JSON logs during tests, matching how the engine is observed
/// in production. Safe to call from every test; only the first init wins.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().json().try_init();
}

#[test]
fn invoice_example_yields_date_amount_email_sorted_by_start() {
    init_tracing();
    let mut extractor = EntityExtractor::new();
    extractor.add_date_patterns();
    extractor.add_amount_patterns();

    let text = "Invoice dated 03/15/2024 for $1,250.00 sent to billing@acme.com";
    let entities = extractor.extract(text);

    assert_eq!(entities.len(), 3);
    assert_eq!(entities[0].value, "03/15/2024");
    assert_eq!(entities[0].entity_type, EntityType::Date);
    assert_eq!(entities[1].value, "$1,250.00");
    assert_eq!(entities[1].entity_type, EntityType::Amount);
    assert_eq!(entities[2].value, "billing@acme.com");
    assert_eq!(entities[2].entity_type, EntityType::Email);

    for e in &entities {
        assert_eq!(e.value, &text[e.start..e.end], "value must equal its span");
    }
    for window in entities.windows(2) {
        assert!(window[0].start <= window[1].start);
    }
}

#[test]
fn parallel_results_keep_pass_order() {
    // The email sits first in the text; a start-sorted result would lead
    // with it. The parallel path must instead group by pass.
    let text = "billing@acme.com was invoiced $1,250.00 on 03/15/2024";
    let entities = extract_all_parallel(text);

    let types: Vec<EntityType> = entities.iter().map(|e| e.entity_type).collect();
    assert_eq!(
        types,
        vec![EntityType::Date, EntityType::Amount, EntityType::Email],
        "parallel output is concatenation-ordered, never start-sorted"
    );

    let mut sequential = EntityExtractor::new();
    sequential.add_date_patterns();
    sequential.add_amount_patterns();
    let sorted = sequential.extract(text);
    assert_eq!(sorted[0].entity_type, EntityType::Email, "extract() sorts by start");
}

#[test]
fn parallel_and_sequential_agree_on_the_entity_set() {
    let text = "Refund of $42.00 issued 01/02/2023, receipt to ops@example.org";

    let mut sequential = EntityExtractor::new();
    sequential.add_date_patterns();
    sequential.add_amount_patterns();
    let mut expected: Vec<Entity> = sequential.extract(text);
    let mut parallel = extract_all_parallel(text);

    let key = |e: &Entity| (e.start, e.end, e.entity_type);
    expected.sort_by_key(key);
    parallel.sort_by_key(key);
    assert_eq!(expected.len(), parallel.len());
    for (a, b) in expected.iter().zip(parallel.iter()) {
        assert_eq!(key(a), key(b));
        assert_eq!(a.value, b.value);
    }
}

#[test]
fn keyword_entities_carry_type_and_uniform_confidence() {
    let mut extractor = EntityExtractor::new();
    extractor.add_keywords(EntityType::Organization, &["Acme Corp"]);
    extractor.add_keywords(EntityType::Person, &["Jane Doe"]);

    let text = "Jane Doe signed for Acme Corp";
    let entities = extractor.extract(text);

    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].value, "Jane Doe");
    assert_eq!(entities[0].entity_type, EntityType::Person);
    assert_eq!(entities[1].value, "Acme Corp");
    assert_eq!(entities[1].entity_type, EntityType::Organization);
    for e in &entities {
        assert_eq!(e.confidence, 0.9);
        assert!(e.metadata.is_empty());
    }
}

#[test]
fn extract_type_for_keyword_type_equals_filtered_extract() {
    let text = "Jane Doe paid $10.00 on 01/02/2023";

    let mut a = EntityExtractor::new();
    a.add_date_patterns();
    a.add_amount_patterns();
    a.add_keywords(EntityType::Person, &["Jane Doe"]);
    let fast = a.extract_type(text, EntityType::Person);

    let mut b = EntityExtractor::new();
    b.add_date_patterns();
    b.add_amount_patterns();
    b.add_keywords(EntityType::Person, &["Jane Doe"]);
    let filtered: Vec<Entity> = b
        .extract(text)
        .into_iter()
        .filter(|e| e.entity_type == EntityType::Person)
        .collect();

    assert_eq!(fast, filtered);
    assert_eq!(fast.len(), 1);
}

#[test]
fn result_records_round_trip_through_json() -> anyhow::Result<()> {
    let mut extractor = EntityExtractor::new();
    extractor.add_date_patterns();
    let entities = extractor.extract("due 03/15/2024");
    assert_eq!(entities.len(), 1);

    let json = serde_json::to_string(&entities)?;
    let back: Vec<Entity> = serde_json::from_str(&json)?;
    assert_eq!(entities, back);

    let m = Match {
        start: 4,
        end: 14,
        pattern_id: 9,
        confidence: 0.85,
    };
    let json = serde_json::to_string(&m)?;
    let back: Match = serde_json::from_str(&json)?;
    assert_eq!(m, back);
    Ok(())
}

#[test]
fn month_name_dates_and_currency_words_extract() {
    let mut extractor = EntityExtractor::new();
    extractor.add_date_patterns();
    extractor.add_amount_patterns();

    let text = "On January 5, 2024 we wired 500 EUR and later 3 million more";
    let entities = extractor.extract(text);

    assert!(entities.iter().any(|e| e.value == "January 5, 2024" && e.entity_type == EntityType::Date));
    assert!(entities.iter().any(|e| e.value == "500 EUR" && e.entity_type == EntityType::Amount));
    assert!(entities.iter().any(|e| e.value == "3 million" && e.entity_type == EntityType::Amount));
}
