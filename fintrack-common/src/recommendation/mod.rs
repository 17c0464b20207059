//! Budget recommendation engine: compares a category budget against what
//! has been spent and says whether the user should slow down.

use crate::types::Category;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Recommendation {
    OverBudget,
    Remaining(i64),
    NoChangeNeeded,
}

/// Over budget when spending exceeds the budget. Below the budget, the
/// remaining headroom is reported; spending exactly the budget needs no
/// change.
pub fn recommend(budget_amount_cents: i64, spent_amount_cents: i64) -> Recommendation {
    if spent_amount_cents > budget_amount_cents {
        return Recommendation::OverBudget;
    }

    if spent_amount_cents < budget_amount_cents {
        return Recommendation::Remaining(budget_amount_cents - spent_amount_cents);
    }

    Recommendation::NoChangeNeeded
}

impl Recommendation {
    pub fn message(&self, category: Option<Category>) -> String {
        match self {
            Recommendation::OverBudget => String::from("You are over the budget allocated"),
            Recommendation::Remaining(remaining_cents) => {
                let category_label = match category {
                    Some(c) => c.as_str(),
                    None => "all categories",
                };

                format!(
                    "Remaining amount left for this month is {} for {}",
                    remaining_cents, category_label
                )
            }
            Recommendation::NoChangeNeeded => String::from("No change needed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_budget_when_spending_exceeds_budget() {
        assert_eq!(recommend(10_000, 10_001), Recommendation::OverBudget);
        assert_eq!(recommend(10_000, 15_000), Recommendation::OverBudget);
        assert_eq!(recommend(0, 5_000), Recommendation::OverBudget);
    }

    #[test]
    fn test_remaining_amount_below_budget() {
        assert_eq!(recommend(10_000, 4_000), Recommendation::Remaining(6_000));
        assert_eq!(recommend(10_000, 0), Recommendation::Remaining(10_000));
    }

    #[test]
    fn test_no_change_needed_when_spending_matches_budget() {
        assert_eq!(recommend(10_000, 10_000), Recommendation::NoChangeNeeded);
        assert_eq!(recommend(0, 0), Recommendation::NoChangeNeeded);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            recommend(10_000, 12_000).message(Some(Category::Food)),
            "You are over the budget allocated"
        );
        assert_eq!(
            recommend(10_000, 4_000).message(Some(Category::Food)),
            "Remaining amount left for this month is 6000 for Food"
        );
        assert_eq!(
            recommend(10_000, 4_000).message(None),
            "Remaining amount left for this month is 6000 for all categories"
        );
        assert_eq!(
            recommend(4_000, 4_000).message(Some(Category::Food)),
            "No change needed"
        );
    }
}
