//! Rule-based transaction categorization.
//!
//! A description is matched against an ordered keyword table; the first
//! rule whose keyword occurs in the description (case-insensitively)
//! decides the category. Rule order is part of the contract: a
//! description mentioning both "Uber" and "Fuel" is Transport because
//! the Uber rule comes first.

/// Category assigned when no rule matches or the description is blank.
pub const OTHER_CATEGORY: &str = "Other";

/// Ordered (keyword, category) rules, scanned linearly, first match wins.
///
/// Keywords are stored lowercase; [`categorize`] lowercases the input
/// before matching.
const RULES: &[(&str, &str)] = &[
    ("pick n pay", "Groceries"),
    ("checkers", "Groceries"),
    ("spar", "Groceries"),
    ("uber", "Transport"),
    ("bolt", "Transport"),
    ("fuel", "Fuel"),
    ("petroport", "Fuel"),
    ("airtime", "Airtime"),
    ("mtn", "Airtime"),
    ("vodacom", "Airtime"),
    ("salary", "Income"),
    ("payroll", "Income"),
];

/// Maps a free-text description to a category label.
///
/// Pure and deterministic: no I/O, no side effects. Blank input and
/// unmatched descriptions both map to [`OTHER_CATEGORY`].
pub fn categorize(description: &str) -> &'static str {
    if description.trim().is_empty() {
        return OTHER_CATEGORY;
    }

    let haystack = description.to_lowercase();
    for &(keyword, category) in RULES {
        if haystack.contains(keyword) {
            return category;
        }
    }

    OTHER_CATEGORY
}
