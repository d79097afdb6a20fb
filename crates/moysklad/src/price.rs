//! Price resolution against loosely named price-type groups.
//!
//! Price-type names on the ERP side are entered by hand and drift
//! (`Прайс основной`, `прайс ОСНОВНОЙ`, `Цены: 1-й уровень`, ...). The
//! resolver walks an ordered cascade so a tighter match is never shadowed
//! by a looser one: exact, then case-insensitive, then keyword rules.

use crate::dto::SalePrice;

/// Keyword rules, evaluated top-down.
///
/// Each entry: a fragment that identifies the requested group in the
/// target label, and the synonym fragments that may stand for that group
/// in a remote price-type name. All comparisons are lowercase.
const KEYWORD_RULES: &[(&str, &[&str])] = &[
    ("основной", &["основной"]),
    ("1 уровень", &["1 уровень", "1-й уровень", "первый уровень"]),
];

/// Resolve the price for `target_label` out of a product's price list.
///
/// Returns the price in major currency units (the remote stores integer
/// minor units), or `None` when no cascade rule matches.
pub fn resolve_price(sale_prices: &[SalePrice], target_label: &str) -> Option<f64> {
    if let Some(price) = sale_prices
        .iter()
        .find(|p| p.price_type.name == target_label)
    {
        return Some(to_major_units(price.value));
    }

    let target_lower = target_label.to_lowercase();
    if let Some(price) = sale_prices
        .iter()
        .find(|p| p.price_type.name.to_lowercase() == target_lower)
    {
        return Some(to_major_units(price.value));
    }

    if let Some(price) = sale_prices
        .iter()
        .find(|p| keyword_match(&target_lower, &p.price_type.name.to_lowercase()))
    {
        return Some(to_major_units(price.value));
    }

    None
}

fn keyword_match(target_lower: &str, name_lower: &str) -> bool {
    KEYWORD_RULES.iter().any(|(trigger, fragments)| {
        target_lower.contains(trigger) && fragments.iter().any(|f| name_lower.contains(f))
    })
}

fn to_major_units(minor: i64) -> f64 {
    minor as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::PriceType;

    fn price(name: &str, value: i64) -> SalePrice {
        SalePrice {
            price_type: PriceType { name: name.into() },
            value,
        }
    }

    #[test]
    fn exact_match_wins_over_every_looser_rule() {
        // A keyword-matching entry listed first must not shadow the exact one.
        let prices = vec![
            price("Старый прайс основной", 999_00),
            price("Прайс основной", 150000),
        ];
        assert_eq!(resolve_price(&prices, "Прайс основной"), Some(1500.0));
    }

    #[test]
    fn case_insensitive_match_is_second_in_line() {
        let prices = vec![price("прайс ОСНОВНОЙ", 120000)];
        assert_eq!(resolve_price(&prices, "Прайс основной"), Some(1200.0));
    }

    #[test]
    fn keyword_rules_catch_renamed_groups() {
        let prices = vec![price("Цены: основной склад", 80000)];
        assert_eq!(resolve_price(&prices, "Прайс основной"), Some(800.0));
    }

    #[test]
    fn level_one_synonyms_are_recognized() {
        for name in ["Прайс 1-й уровень", "Первый уровень", "опт, 1 уровень"] {
            let prices = vec![price(name, 90000)];
            assert_eq!(
                resolve_price(&prices, "Прайс 1 уровень"),
                Some(900.0),
                "expected {name} to resolve for the level-1 label"
            );
        }
    }

    #[test]
    fn level_one_label_never_matches_the_basic_group() {
        let prices = vec![price("Прайс основной", 150000)];
        assert_eq!(resolve_price(&prices, "Прайс 1 уровень"), None);
    }

    #[test]
    fn no_match_returns_none() {
        let prices = vec![price("Розница", 100), price("Закупка", 200)];
        assert_eq!(resolve_price(&prices, "Прайс основной"), None);
        assert_eq!(resolve_price(&[], "Прайс основной"), None);
    }

    #[test]
    fn minor_units_convert_to_major_units() {
        let prices = vec![price("Прайс основной", 150001)];
        assert_eq!(resolve_price(&prices, "Прайс основной"), Some(1500.01));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arbitrary_name() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("Прайс основной".to_string()),
                Just("Прайс 1 уровень".to_string()),
                Just("Розница".to_string()),
                "[a-zA-Z ]{0,12}",
            ]
        }

        proptest! {
            /// An exact entry always resolves to its own value, no matter
            /// what else the list contains or where the entry sits.
            #[test]
            fn exact_entry_always_wins(
                mut names in proptest::collection::vec(arbitrary_name(), 0..6),
                position in 0usize..6,
                value in 0i64..10_000_000,
            ) {
                let target = "Прайс основной";
                let position = position.min(names.len());
                names.insert(position, target.to_string());

                let prices: Vec<SalePrice> = names
                    .iter()
                    .enumerate()
                    .map(|(index, name)| SalePrice {
                        price_type: PriceType { name: name.clone() },
                        // Give the exact entry a distinctive value.
                        value: if index == position { value } else { value + 1 },
                    })
                    .collect();

                // The first exact occurrence wins; it either sits at
                // `position` or earlier (when a generated name collides).
                let resolved = resolve_price(&prices, target).unwrap();
                let first_exact = prices.iter().find(|p| p.price_type.name == target).unwrap();
                prop_assert_eq!(resolved, first_exact.value as f64 / 100.0);
            }
        }
    }
}
