//! Product ranking: unit value descending, stable on ties.

use crate::snapshot::Product;

/// Order products by unit value, highest first.
///
/// The sort is stable, so products with equal unit values keep their snapshot
/// order. No filtering happens here.
pub fn rank(products: &[Product]) -> Vec<&Product> {
    let mut ranked: Vec<&Product> = products.iter().collect();
    ranked.sort_by(|a, b| rank_key(b.unit_value).total_cmp(&rank_key(a.unit_value)));
    ranked
}

// total_cmp separates -0.0 from 0.0; both mean "free".
fn rank_key(unit_value: f64) -> f64 {
    if unit_value == 0.0 { 0.0 } else { unit_value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodplan_core::ProductId;

    fn product(id: u64, name: &str, unit_value: f64) -> Product {
        Product::new(ProductId::new(id), name, unit_value)
    }

    fn names<'a>(ranked: &[&'a Product]) -> Vec<&'a str> {
        ranked.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn highest_value_first() {
        let products = vec![
            product(1, "Chair", 20.0),
            product(2, "Table", 50.0),
            product(3, "Stool", 5.5),
        ];
        assert_eq!(names(&rank(&products)), vec!["Table", "Chair", "Stool"]);
    }

    #[test]
    fn ties_keep_snapshot_order() {
        let products = vec![
            product(1, "B", 10.0),
            product(2, "A", 10.0),
            product(3, "Top", 11.0),
            product(4, "C", 10.0),
        ];
        assert_eq!(names(&rank(&products)), vec!["Top", "B", "A", "C"]);
    }

    #[test]
    fn signed_zero_is_a_tie() {
        let products = vec![product(1, "first", 0.0), product(2, "second", -0.0)];
        assert_eq!(names(&rank(&products)), vec!["first", "second"]);

        let products = vec![product(1, "first", -0.0), product(2, "second", 0.0)];
        assert_eq!(names(&rank(&products)), vec!["first", "second"]);
    }

    #[test]
    fn does_not_filter_unproducible_products() {
        let products = vec![product(1, "No recipe", 99.0)];
        assert_eq!(rank(&products).len(), 1);
    }
}
