//! Keyword classification of receipt text and the ledger folders built on it.

use serde::{Deserialize, Serialize};

use crate::receipt::ExpenseCategory;

/// Keyword rules in tie-break order.
const RULES: &[(ExpenseCategory, &[&str])] = &[
    (
        ExpenseCategory::Meals,
        &[
            "lunch", "dinner", "breakfast", "meal", "restaurant", "cafe", "coffee", "food",
            "snack", "catering", "jollibee", "mcdo",
        ],
    ),
    (
        ExpenseCategory::Travel,
        &[
            "flight", "airline", "airfare", "taxi", "grab", "bus", "train", "fare", "toll",
            "parking", "booking", "ticket",
        ],
    ),
    (
        ExpenseCategory::Fuel,
        &[
            "fuel", "gasoline", "diesel", "petron", "shell", "caltex", "unleaded", "liters",
        ],
    ),
    (
        ExpenseCategory::Accommodation,
        &[
            "hotel", "inn", "lodging", "resort", "room", "accommodation", "airbnb", "hostel",
        ],
    ),
    (
        ExpenseCategory::OfficeSupplies,
        &[
            "ink", "paper", "printer", "toner", "pen", "stapler", "folder", "notebook",
            "office", "supplies", "bond",
        ],
    ),
    (
        ExpenseCategory::Utilities,
        &[
            "internet", "electric", "electricity", "water", "meralco", "pldt", "globe",
            "subscription", "bill", "utility",
        ],
    ),
];

/// Keywords this short must match a whole word; longer ones match anywhere.
const WHOLE_WORD_MAX_LEN: usize = 3;

/// Pick the expense category whose keywords appear most often in `text`.
///
/// Each keyword counts once. Ties go to the earlier rule; no hits gives
/// [`ExpenseCategory::Other`].
pub fn classify(text: &str) -> ExpenseCategory {
    let haystack = text.to_lowercase();
    let words: Vec<&str> = haystack
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut best = (ExpenseCategory::Other, 0usize);
    for (category, keywords) in RULES {
        let hits = keywords
            .iter()
            .filter(|kw| {
                if kw.len() <= WHOLE_WORD_MAX_LEN {
                    words.contains(*kw)
                } else {
                    haystack.contains(**kw)
                }
            })
            .count();
        if hits > best.1 {
            best = (*category, hits);
        }
    }
    best.0
}

/// Ledger tab grouping expense categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Folder {
    #[default]
    All,
    TravelMeals,
    OfficeOther,
}

impl Folder {
    pub const ALL: [Folder; 3] = [Folder::All, Folder::TravelMeals, Folder::OfficeOther];

    /// URL segment for the folder.
    pub fn slug(&self) -> &'static str {
        match self {
            Folder::All => "all",
            Folder::TravelMeals => "travel-meals",
            Folder::OfficeOther => "office-other",
        }
    }

    /// Unknown slugs fall back to [`Folder::All`].
    pub fn from_slug(slug: &str) -> Self {
        Folder::ALL
            .into_iter()
            .find(|f| f.slug().eq_ignore_ascii_case(slug.trim()))
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Folder::All => "All Types",
            Folder::TravelMeals => "Travel & Meals",
            Folder::OfficeOther => "Office & Other",
        }
    }

    pub fn categories(&self) -> &'static [ExpenseCategory] {
        match self {
            Folder::All => &ExpenseCategory::ALL,
            Folder::TravelMeals => &[
                ExpenseCategory::Meals,
                ExpenseCategory::Travel,
                ExpenseCategory::Fuel,
                ExpenseCategory::Accommodation,
            ],
            Folder::OfficeOther => &[
                ExpenseCategory::OfficeSupplies,
                ExpenseCategory::Utilities,
                ExpenseCategory::Other,
            ],
        }
    }

    pub fn contains(&self, category: ExpenseCategory) -> bool {
        self.categories().contains(&category)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn classifies_seed_descriptions() {
        assert_eq!(classify("Lunch receipt"), ExpenseCategory::Meals);
        assert_eq!(classify("Flight booking"), ExpenseCategory::Travel);
        assert_eq!(classify("Printer ink and paper"), ExpenseCategory::OfficeSupplies);
        assert_eq!(classify("Internet subscription"), ExpenseCategory::Utilities);
        assert_eq!(classify("Hotel stay"), ExpenseCategory::Accommodation);
    }

    #[test]
    fn unknown_text_is_other() {
        assert_eq!(classify(""), ExpenseCategory::Other);
        assert_eq!(classify("Miscellaneous hardware"), ExpenseCategory::Other);
    }

    #[test]
    fn short_keywords_need_whole_words() {
        // "pen" inside "expense" and "inn" inside "dinner" must not count.
        assert_eq!(classify("expense report"), ExpenseCategory::Other);
        assert_eq!(classify("PETRON 12.5 liters UNLEADED"), ExpenseCategory::Fuel);
        assert_eq!(classify("Bus fare"), ExpenseCategory::Travel);
    }

    #[test]
    fn most_hits_wins_and_ties_use_rule_order() {
        // Two office hits beat one meal hit.
        assert_eq!(classify("coffee, bond paper, toner"), ExpenseCategory::OfficeSupplies);
        // One hit each: Meals comes first.
        assert_eq!(classify("coffee at the hotel"), ExpenseCategory::Meals);
    }

    #[test]
    fn folders_partition_categories() {
        for category in ExpenseCategory::ALL {
            assert!(Folder::All.contains(category));
            assert_ne!(
                Folder::TravelMeals.contains(category),
                Folder::OfficeOther.contains(category)
            );
        }
    }

    #[test]
    fn folder_slugs() {
        assert_eq!(Folder::from_slug("travel-meals"), Folder::TravelMeals);
        assert_eq!(Folder::from_slug("OFFICE-OTHER"), Folder::OfficeOther);
        assert_eq!(Folder::from_slug("nope"), Folder::All);
        assert_eq!(Folder::OfficeOther.label(), "Office & Other");
    }
}
