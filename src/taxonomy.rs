//! Value lists offered by the filter UI.
//!
//! These are presentation hints only. The filter engine compares by exact
//! string equality and accepts values outside these lists.

pub const CUISINES: &[&str] = &[
    "Italian",
    "Mexican",
    "Japanese",
    "Chinese",
    "Indian",
    "Thai",
    "Mediterranean",
    "French",
    "American",
    "Korean",
    "Vietnamese",
    "Turkish",
    "Greek",
    "Lebanese",
    "Moroccan",
];

pub const DIETARY_OPTIONS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten-free",
    "Dairy-free",
    "Nut-free",
    "Halal",
    "Kosher",
];

pub const FOOD_TYPES: &[&str] = &["Meals", "Bakery", "Groceries", "Flowers", "Pet food", "Other"];

pub const PICKUP_DAYS: &[&str] = &["Today", "Tomorrow"];

pub const PICKUP_WINDOWS: &[&str] = &["Morning", "Lunch", "Evening", "Late Night"];

/// Ordered cheapest first.
pub const PRICE_BUCKETS: &[&str] = &["$", "$$", "$$$"];

/// Distance ceilings offered by the slider, in miles.
pub const DISTANCES: &[f64] = &[0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];

/// Every text list with a heading, for listing.
pub fn text_lists() -> [(&'static str, &'static [&'static str]); 6] {
    [
        ("cuisines", CUISINES),
        ("diet", DIETARY_OPTIONS),
        ("foodTypes", FOOD_TYPES),
        ("pickupDay", PICKUP_DAYS),
        ("pickupWindow", PICKUP_WINDOWS),
        ("price", PRICE_BUCKETS),
    ]
}
