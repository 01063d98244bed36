// WHY: The three extraction passes are independent reads over the same
// immutable buffer; each task owns its own extractor instance so there is
// no shared matcher state and no locking

use rayon::join;
use tracing::debug;

use crate::extractor::{Entity, EntityExtractor, EntityType};

/// Run the date, amount, and email extraction passes concurrently over
/// `text` and return date-results, then amount-results, then email-results
/// in that fixed pass order.
///
/// The output is deliberately NOT re-sorted by start offset: concatenation
/// order is the contract here, unlike [`EntityExtractor::extract`], and
/// callers may depend on the pass-grouped shape. The call blocks until all
/// three passes complete.
pub fn extract_all_parallel(text: &str) -> Vec<Entity> {
    let (dates, (amounts, emails)) = join(
        || {
            let mut extractor = EntityExtractor::new();
            extractor.add_date_patterns();
            extractor.extract_type(text, EntityType::Date)
        },
        || {
            join(
                || {
                    let mut extractor = EntityExtractor::new();
                    extractor.add_amount_patterns();
                    extractor.extract_type(text, EntityType::Amount)
                },
                || {
                    let mut extractor = EntityExtractor::new();
                    extractor.extract_type(text, EntityType::Email)
                },
            )
        },
    );

    let mut all = Vec::with_capacity(dates.len() + amounts.len() + emails.len());
    all.extend(dates);
    all.extend(amounts);
    all.extend(emails);

    debug!(entities = all.len(), "parallel extraction complete");

    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_follow_pass_order_not_text_order() {
        // Email appears first in the text but last in the result.
        let text = "billing@acme.com invoiced $1,250.00 on 03/15/2024";
        let entities = extract_all_parallel(text);

        let types: Vec<EntityType> = entities.iter().map(|e| e.entity_type).collect();
        assert_eq!(
            types,
            vec![EntityType::Date, EntityType::Amount, EntityType::Email]
        );
        assert_eq!(entities[2].start, 0);
    }

    #[test]
    fn passes_see_only_their_own_family() {
        let text = "03/15/2024 and $5.00 and a@b.co";
        let entities = extract_all_parallel(text);
        assert_eq!(entities.len(), 3);
        assert!(entities.iter().any(|e| e.value == "03/15/2024"));
        assert!(entities.iter().any(|e| e.value == "$5.00"));
        assert!(entities.iter().any(|e| e.value == "a@b.co"));
    }

    #[test]
    fn empty_text_yields_no_entities() {
        assert!(extract_all_parallel("").is_empty());
    }
}
