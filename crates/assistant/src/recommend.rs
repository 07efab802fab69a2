use serde::{Deserialize, Serialize};

use farmacontrol_core::ProductId;
use farmacontrol_inventory::{Product, ProductStatus, fold};

/// Words shorter than this never match on their own.
const MIN_KEYWORD_LEN: usize = 4;

/// A product recommended for a query, with the uses that matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub product_id: ProductId,
    pub score: u32,
    pub matched_uses: Vec<String>,
}

/// Rank sellable products by how well their declared uses match `query`.
///
/// Scoring per use:
/// - the whole use phrase appears in the query: 2 points per word of the use;
/// - otherwise: 1 point per keyword of the use (at least four letters) that
///   appears as a word of the query.
///
/// Products out of stock or expired are skipped. Ties keep catalog order.
/// At most `limit` matches are returned.
pub fn recommend(query: &str, products: &[Product], limit: usize) -> Vec<ProductMatch> {
    let query = fold(query);
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }
    let query_words: Vec<&str> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut matches: Vec<ProductMatch> = products
        .iter()
        .filter(|p| p.in_stock() && p.status() != ProductStatus::Expired)
        .filter_map(|p| {
            let mut score = 0;
            let mut matched_uses = Vec::new();
            for use_ in p.uses() {
                let s = score_use(&query, &query_words, &fold(use_));
                if s > 0 {
                    score += s;
                    matched_uses.push(use_.clone());
                }
            }
            (score > 0).then(|| ProductMatch {
                product_id: p.id_typed().clone(),
                score,
                matched_uses,
            })
        })
        .collect();

    // Stable sort keeps catalog order among equal scores.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);
    matches
}

fn score_use(query: &str, query_words: &[&str], use_: &str) -> u32 {
    let words: Vec<&str> = use_.split_whitespace().collect();
    if words.is_empty() {
        return 0;
    }
    if contains_phrase(query, use_) {
        return 2 * words.len() as u32;
    }
    words
        .iter()
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN && query_words.contains(*w))
        .count() as u32
}

/// Phrase match on word boundaries, so "dolor" does not match "dolores".
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use farmacontrol_core::{BranchId, Money};
    use farmacontrol_inventory::ProductSeed;

    use super::*;

    pub fn today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap()
    }

    pub fn seed(id: &str, name: &str, stock: i64, uses: &[&str]) -> ProductSeed {
        ProductSeed {
            id: ProductId::new(id).unwrap(),
            name: name.to_string(),
            generic_name: name.to_string(),
            category: "Analgesico".to_string(),
            manufacturer: "Bayer".to_string(),
            barcode: "0".to_string(),
            price: Money::from_cents(1250),
            cost_price: Money::from_cents(800),
            stock,
            min_stock: 10,
            max_stock: 1000,
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            batch_number: "LOT".to_string(),
            branch_id: BranchId::new("f1").unwrap(),
            requires_prescription: false,
            uses: uses.iter().map(|u| u.to_string()).collect(),
            dosage: "1 comprimido cada 8 horas".to_string(),
        }
    }

    pub fn product(id: &str, name: &str, stock: i64, uses: &[&str]) -> Product {
        Product::from_seed(seed(id, name, stock, uses), today())
    }

    pub fn catalog() -> Vec<Product> {
        vec![
            product("p1", "Paracetamol 500mg", 450, &["dolor de cabeza", "fiebre", "dolor muscular"]),
            product("p2", "Ibuprofeno 400mg", 85, &["inflamacion", "dolor", "fiebre"]),
            product("p4", "Omeprazol 20mg", 320, &["acidez", "gastritis", "reflujo"]),
            product("p10", "Dipirona 500mg", 520, &["dolor", "fiebre", "colico"]),
            product("p12", "Dimenhidrinato 50mg", 0, &["nauseas", "vomitos", "mareos"]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn ids(found: &[ProductMatch]) -> Vec<&str> {
        found.iter().map(|m| m.product_id.as_str()).collect()
    }

    #[test]
    fn headache_and_fever_ranks_paracetamol_first() {
        let found = recommend("Tengo dolor de cabeza y fiebre", &catalog(), 3);
        assert_eq!(ids(&found), vec!["p1", "p2", "p10"]);
        assert_eq!(found[0].score, 6 + 2 + 1);
        assert_eq!(found[0].matched_uses, vec!["dolor de cabeza", "fiebre", "dolor muscular"]);
    }

    #[test]
    fn accents_and_case_are_ignored() {
        let found = recommend("¿Algo para la INFLAMACIÓN?", &catalog(), 3);
        assert_eq!(ids(&found), vec!["p2"]);
    }

    #[test]
    fn out_of_stock_products_are_not_recommended() {
        let found = recommend("tengo nauseas y mareos", &catalog(), 3);
        assert!(found.is_empty());
    }

    #[test]
    fn unmatched_and_blank_queries_return_nothing() {
        assert!(recommend("hola, buenos dias", &catalog(), 3).is_empty());
        assert!(recommend("   ", &catalog(), 3).is_empty());
        assert!(recommend("fiebre", &catalog(), 0).is_empty());
    }

    #[test]
    fn phrase_match_respects_word_boundaries() {
        assert!(contains_phrase("tengo dolor fuerte", "dolor"));
        assert!(!contains_phrase("tengo dolores", "dolor"));
        assert!(contains_phrase("dolor", "dolor"));
    }

    #[test]
    fn expired_products_are_not_recommended() {
        let mut expired = seed("p7", "Loratadina 10mg", 150, &["alergia"]);
        expired.expiry_date = chrono::NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let catalog = vec![Product::from_seed(expired, today())];
        assert!(recommend("tengo alergia", &catalog, 3).is_empty());
    }

    #[test]
    fn short_words_do_not_match_alone() {
        // "de" from "dolor de cabeza" must not match by itself.
        let found = recommend("dos de mayo", &catalog(), 3);
        assert!(found.is_empty());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: results are sorted by score and never exceed the limit.
            #[test]
            fn ranked_and_bounded(query in "[a-z ]{0,60}", limit in 0usize..6) {
                let found = recommend(&query, &catalog(), limit);
                prop_assert!(found.len() <= limit);
                for pair in found.windows(2) {
                    prop_assert!(pair[0].score >= pair[1].score);
                }
                prop_assert!(found.iter().all(|m| m.product_id.as_str() != "p12"));
            }
        }
    }
}
