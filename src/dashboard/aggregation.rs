//! Turns the per-category sums into the rows shown on the dashboard.

use crate::dashboard::stats::CategorySum;

/// A labelled value for a chart or table row.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct LabelledValue {
    pub label: String,
    pub value: f64,
}

/// Total each top-level category together with its direct children.
///
/// `sums` must only contain categories shown on the dashboard, so hidden
/// children are left out of their parent's total. Zero totals are omitted.
pub(super) fn roll_up_category_totals(sums: &[CategorySum]) -> Vec<LabelledValue> {
    sums.iter()
        .filter(|sum| sum.parent_id.is_none())
        .map(|parent| {
            let children_total: f64 = sums
                .iter()
                .filter(|child| child.parent_id == Some(parent.id))
                .map(|child| child.total)
                .sum();

            LabelledValue {
                label: parent.name.clone(),
                value: parent.total + children_total,
            }
        })
        .filter(|row| row.value != 0.0)
        .collect()
}

/// List every category on its own, omitting zero totals.
pub(super) fn flat_category_totals(sums: &[CategorySum]) -> Vec<LabelledValue> {
    sums.iter()
        .filter(|sum| sum.total != 0.0)
        .map(|sum| LabelledValue {
            label: sum.name.clone(),
            value: sum.total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::dashboard::stats::CategorySum;

    use super::{LabelledValue, flat_category_totals, roll_up_category_totals};

    fn sum(id: i64, name: &str, parent_id: Option<i64>, total: f64) -> CategorySum {
        CategorySum {
            id,
            name: name.to_owned(),
            parent_id,
            total,
        }
    }

    fn row(label: &str, value: f64) -> LabelledValue {
        LabelledValue {
            label: label.to_owned(),
            value,
        }
    }

    #[test]
    fn children_roll_up_into_parent() {
        let sums = vec![
            sum(1, "Food", None, 10.0),
            sum(2, "Snacks", Some(1), 2.5),
            sum(3, "Groceries", Some(1), 7.5),
            sum(4, "Rent", None, 100.0),
        ];

        let totals = roll_up_category_totals(&sums);

        assert_eq!(totals, vec![row("Food", 20.0), row("Rent", 100.0)]);
    }

    #[test]
    fn parent_without_own_transactions_uses_children() {
        let sums = vec![sum(1, "Food", None, 0.0), sum(2, "Snacks", Some(1), 3.0)];

        let totals = roll_up_category_totals(&sums);

        assert_eq!(totals, vec![row("Food", 3.0)]);
    }

    #[test]
    fn zero_totals_are_omitted() {
        let sums = vec![sum(1, "Food", None, 0.0), sum(2, "Rent", None, 5.0)];

        assert_eq!(roll_up_category_totals(&sums), vec![row("Rent", 5.0)]);
        assert_eq!(flat_category_totals(&sums), vec![row("Rent", 5.0)]);
    }

    #[test]
    fn flat_totals_do_not_roll_up() {
        let sums = vec![sum(1, "Food", None, 10.0), sum(2, "Snacks", Some(1), 2.5)];

        let totals = flat_category_totals(&sums);

        assert_eq!(totals, vec![row("Food", 10.0), row("Snacks", 2.5)]);
    }
}
