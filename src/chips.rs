//! Removable "active filter" chips shown above the result list.

use crate::filter::{Field, FilterState, SetField};

pub const DEFAULT_QUERY_MAX_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterChip {
    pub field: Field,
    pub label: String,
}

/// One chip per active field, in `Field::ALL` order. The number of chips
/// always equals `state.active_filter_count()`.
pub fn active_chips(state: &FilterState, query_max_len: usize) -> Vec<FilterChip> {
    Field::ALL
        .iter()
        .filter(|field| state.is_active(**field))
        .filter_map(|field| {
            chip_label(state, *field, query_max_len).map(|label| FilterChip {
                field: *field,
                label,
            })
        })
        .collect()
}

fn chip_label(state: &FilterState, field: Field, query_max_len: usize) -> Option<String> {
    let label = match field {
        Field::Query => format!("\"{}\"", truncate(state.query()?, query_max_len)),
        Field::PickupDay => state.pickup_day()?.to_string(),
        Field::PickupWindow => state.pickup_window()?.to_string(),
        Field::FoodTypes => set_label(state, SetField::FoodTypes, "food types")?,
        Field::Diet => set_label(state, SetField::Diet, "dietary")?,
        Field::Cuisines => set_label(state, SetField::Cuisines, "cuisines")?,
        Field::Distance => format!("Within {} mi", state.distance()?),
        Field::Price => format!("Price {}", state.price()?),
    };
    Some(label)
}

fn set_label(state: &FilterState, field: SetField, plural: &str) -> Option<String> {
    let set = state.set(field);
    match set.len() {
        0 => None,
        1 => set.iter().next().cloned(),
        n => Some(format!("{n} {plural}")),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Header line above the chips, e.g. "3 active filters".
pub fn summary(count: usize) -> String {
    format!(
        "{} active filter{}",
        count,
        if count == 1 { "" } else { "s" }
    )
}
