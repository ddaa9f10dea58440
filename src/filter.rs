//! Filter state and the engine that evaluates it against a catalog.
//!
//! Every field has an explicit "unset" value (`None` or an empty set). A field
//! is active when it differs from that value, and the active-filter count is
//! always recomputed from the current state.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::catalog::Record;
use crate::error::Error;
use crate::search::{is_loose_match, normalize};

/// Every filter field, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Query,
    PickupDay,
    PickupWindow,
    FoodTypes,
    Diet,
    Cuisines,
    Distance,
    Price,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Query,
        Field::PickupDay,
        Field::PickupWindow,
        Field::FoodTypes,
        Field::Diet,
        Field::Cuisines,
        Field::Distance,
        Field::Price,
    ];

    /// Wire name, as used by the browser UI
    pub fn name(&self) -> &'static str {
        match self {
            Field::Query => "query",
            Field::PickupDay => "pickupDay",
            Field::PickupWindow => "pickupWindow",
            Field::FoodTypes => "foodTypes",
            Field::Diet => "diet",
            Field::Cuisines => "cuisines",
            Field::Distance => "distance",
            Field::Price => "price",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = Error;

    /// Accepts camelCase wire names as well as snake_case or kebab-case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "query" => Ok(Field::Query),
            "pickupday" => Ok(Field::PickupDay),
            "pickupwindow" => Ok(Field::PickupWindow),
            "foodtypes" => Ok(Field::FoodTypes),
            "diet" => Ok(Field::Diet),
            "cuisines" => Ok(Field::Cuisines),
            "distance" => Ok(Field::Distance),
            "price" => Ok(Field::Price),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

/// The multi-select ("any of") fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetField {
    FoodTypes,
    Diet,
    Cuisines,
}

impl From<SetField> for Field {
    fn from(field: SetField) -> Self {
        match field {
            SetField::FoodTypes => Field::FoodTypes,
            SetField::Diet => Field::Diet,
            SetField::Cuisines => Field::Cuisines,
        }
    }
}

impl TryFrom<Field> for SetField {
    type Error = Error;

    fn try_from(field: Field) -> Result<Self, Self::Error> {
        match field {
            Field::FoodTypes => Ok(SetField::FoodTypes),
            Field::Diet => Ok(SetField::Diet),
            Field::Cuisines => Ok(SetField::Cuisines),
            other => Err(Error::NotASetField(other.name().to_string())),
        }
    }
}

impl FromStr for SetField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SetField::try_from(s.parse::<Field>()?)
    }
}

/// Replacement value for one scalar field.
///
/// An empty string in any text variant means "unset".
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Query(String),
    PickupDay(String),
    PickupWindow(String),
    Distance(Option<f64>),
    Price(Option<String>),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Query(_) => Field::Query,
            FieldUpdate::PickupDay(_) => Field::PickupDay,
            FieldUpdate::PickupWindow(_) => Field::PickupWindow,
            FieldUpdate::Distance(_) => Field::Distance,
            FieldUpdate::Price(_) => Field::Price,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// The current query. Start from `FilterState::default()` (nothing active)
/// and change it through [`FilterEngine`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    query: Option<String>,
    pickup_day: Option<String>,
    pickup_window: Option<String>,
    food_types: BTreeSet<String>,
    diet: BTreeSet<String>,
    cuisines: BTreeSet<String>,
    distance: Option<f64>,
    price: Option<String>,
}

impl FilterState {
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn pickup_day(&self) -> Option<&str> {
        self.pickup_day.as_deref()
    }

    pub fn pickup_window(&self) -> Option<&str> {
        self.pickup_window.as_deref()
    }

    pub fn food_types(&self) -> &BTreeSet<String> {
        &self.food_types
    }

    pub fn diet(&self) -> &BTreeSet<String> {
        &self.diet
    }

    pub fn cuisines(&self) -> &BTreeSet<String> {
        &self.cuisines
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    pub fn price(&self) -> Option<&str> {
        self.price.as_deref()
    }

    pub fn set(&self, field: SetField) -> &BTreeSet<String> {
        match field {
            SetField::FoodTypes => &self.food_types,
            SetField::Diet => &self.diet,
            SetField::Cuisines => &self.cuisines,
        }
    }

    fn set_mut(&mut self, field: SetField) -> &mut BTreeSet<String> {
        match field {
            SetField::FoodTypes => &mut self.food_types,
            SetField::Diet => &mut self.diet,
            SetField::Cuisines => &mut self.cuisines,
        }
    }

    pub fn is_active(&self, field: Field) -> bool {
        match field {
            Field::Query => self.query.is_some(),
            Field::PickupDay => self.pickup_day.is_some(),
            Field::PickupWindow => self.pickup_window.is_some(),
            Field::FoodTypes => !self.food_types.is_empty(),
            Field::Diet => !self.diet.is_empty(),
            Field::Cuisines => !self.cuisines.is_empty(),
            Field::Distance => self.distance.is_some(),
            Field::Price => self.price.is_some(),
        }
    }

    pub fn active_filter_count(&self) -> usize {
        Field::ALL.iter().filter(|f| self.is_active(**f)).count()
    }

    /// Whether `update` would leave this field exactly as it is now
    fn holds(&self, update: &FieldUpdate) -> bool {
        match update {
            FieldUpdate::Query(v) => self.query.as_deref() == Some(v.as_str()),
            FieldUpdate::PickupDay(v) => self.pickup_day.as_deref() == Some(v.as_str()),
            FieldUpdate::PickupWindow(v) => self.pickup_window.as_deref() == Some(v.as_str()),
            FieldUpdate::Distance(v) => v.is_some() && self.distance == *v,
            FieldUpdate::Price(v) => v.is_some() && self.price == *v,
        }
    }

    fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Query(v) => self.query = non_empty(v),
            FieldUpdate::PickupDay(v) => self.pickup_day = non_empty(v),
            FieldUpdate::PickupWindow(v) => self.pickup_window = non_empty(v),
            FieldUpdate::Distance(v) => self.distance = v,
            FieldUpdate::Price(v) => self.price = v.and_then(non_empty),
        }
    }

    fn clear(&mut self, field: Field) {
        match field {
            Field::Query => self.query = None,
            Field::PickupDay => self.pickup_day = None,
            Field::PickupWindow => self.pickup_window = None,
            Field::FoodTypes => self.food_types.clear(),
            Field::Diet => self.diet.clear(),
            Field::Cuisines => self.cuisines.clear(),
            Field::Distance => self.distance = None,
            Field::Price => self.price = None,
        }
    }

    /// Exact-match predicates first, then the loose text match.
    /// `query` must already be normalized.
    fn passes(&self, record: &Record, query: Option<&str>) -> bool {
        if let Some(day) = &self.pickup_day {
            if record.pickup_day != *day {
                return false;
            }
        }

        if let Some(window) = &self.pickup_window {
            if record.pickup_window != *window {
                return false;
            }
        }

        if !self.food_types.is_empty() && !self.food_types.contains(&record.food_type) {
            return false;
        }

        if !self.diet.is_empty() && !record.dietary.iter().any(|tag| self.diet.contains(tag)) {
            return false;
        }

        if !self.cuisines.is_empty() && !self.cuisines.contains(&record.cuisine) {
            return false;
        }

        if let Some(ceiling) = self.distance {
            if record.distance_mi > ceiling {
                return false;
            }
        }

        if let Some(price) = &self.price {
            if record.price_bucket != *price {
                return false;
            }
        }

        match query {
            Some(q) => [&record.name, &record.cuisine, &record.food_type]
                .iter()
                .any(|text| is_loose_match(q, &normalize(text))),
            None => true,
        }
    }
}

/// Owns the filter state and evaluates it against catalogs.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    state: FilterState,
}

impl FilterEngine {
    pub fn new() -> Self {
        let engine = Self::default();
        debug_assert_eq!(engine.active_filter_count(), 0);
        engine
    }

    pub fn filters(&self) -> &FilterState {
        &self.state
    }

    pub fn set_field(&mut self, update: FieldUpdate) {
        tracing::trace!(field = %update.field(), "set filter");
        self.state.apply(update);
    }

    /// Quick-filter behaviour: select `update`'s value, or deselect the field
    /// if it already holds that value.
    pub fn toggle_selector(&mut self, update: FieldUpdate) {
        if self.state.holds(&update) {
            self.clear_field(update.field());
        } else {
            self.set_field(update);
        }
    }

    pub fn toggle_set_member(&mut self, field: SetField, value: &str) {
        let set = self.state.set_mut(field);
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        tracing::trace!(field = %Field::from(field), value, "toggled filter member");
    }

    pub fn clear_field(&mut self, field: Field) {
        tracing::trace!(%field, "cleared filter");
        self.state.clear(field);
    }

    pub fn clear_all(&mut self) {
        tracing::trace!("cleared all filters");
        self.state = FilterState::default();
    }

    pub fn is_active(&self, field: Field) -> bool {
        self.state.is_active(field)
    }

    pub fn active_filter_count(&self) -> usize {
        self.state.active_filter_count()
    }

    /// Test a single record against the current state.
    pub fn matches(&self, record: &Record) -> bool {
        let query = self.state.query.as_deref().map(normalize);
        self.state.passes(record, query.as_deref())
    }

    /// Return the records passing every active filter, in catalog order.
    pub fn evaluate<'a>(&self, catalog: &'a [Record]) -> Vec<&'a Record> {
        let query = self.state.query.as_deref().map(normalize);
        let matched: Vec<&Record> = catalog
            .iter()
            .filter(|record| self.state.passes(record, query.as_deref()))
            .collect();
        tracing::debug!(
            catalog = catalog.len(),
            matched = matched.len(),
            active = self.active_filter_count(),
            "evaluated filters"
        );
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, cuisine: &str, food_type: &str) -> Record {
        Record {
            id: id.to_string(),
            name: name.to_string(),
            cuisine: cuisine.to_string(),
            dietary: Vec::new(),
            food_type: food_type.to_string(),
            price_bucket: "$".to_string(),
            distance_mi: 1.0,
            pickup_day: "Today".to_string(),
            pickup_window: "Lunch".to_string(),
            rating: None,
            original_price: None,
            discounted_price: None,
            items_left: None,
            is_favorite: false,
        }
    }

    fn golden_dragon() -> Record {
        Record {
            dietary: vec!["Vegan".to_string()],
            distance_mi: 1.2,
            ..record("2", "Golden Dragon", "Chinese", "Meals")
        }
    }

    fn sample_catalog() -> Vec<Record> {
        vec![
            Record {
                dietary: vec!["Vegetarian".to_string()],
                price_bucket: "$$".to_string(),
                distance_mi: 0.8,
                pickup_window: "Evening".to_string(),
                ..record("1", "Bella Vista Italian", "Italian", "Meals")
            },
            Record {
                dietary: vec!["Vegan".to_string(), "Gluten-free".to_string()],
                ..golden_dragon()
            },
            Record {
                dietary: vec!["Vegetarian".to_string()],
                distance_mi: 0.5,
                pickup_day: "Tomorrow".to_string(),
                pickup_window: "Morning".to_string(),
                ..record("3", "Fresh Bakehouse", "French", "Bakery")
            },
            Record {
                price_bucket: "$$$".to_string(),
                distance_mi: 1.8,
                pickup_day: "Tomorrow".to_string(),
                ..record("5", "Tokyo Sushi Bar", "Japanese", "Meals")
            },
            Record {
                dietary: vec!["Vegetarian".to_string()],
                price_bucket: "$$".to_string(),
                distance_mi: 1.4,
                ..record("12", "Café François", "French", "Bakery")
            },
        ]
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_new_engine_is_empty() {
        let engine = FilterEngine::new();
        assert_eq!(engine.active_filter_count(), 0);
        assert_eq!(engine.filters(), &FilterState::default());
        for field in Field::ALL {
            assert!(!engine.is_active(field));
        }
    }

    #[test]
    fn test_empty_state_passes_everything_in_order() {
        let catalog = sample_catalog();
        let engine = FilterEngine::new();
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["1", "2", "3", "5", "12"]);
    }

    #[test]
    fn test_golden_dragon_scenario() {
        let catalog = vec![golden_dragon()];
        let mut engine = FilterEngine::new();
        engine.set_field(FieldUpdate::Query("golden".into()));
        engine.set_field(FieldUpdate::Distance(Some(2.0)));
        assert_eq!(engine.evaluate(&catalog).len(), 1);

        engine.set_field(FieldUpdate::Distance(Some(1.0)));
        assert!(engine.evaluate(&catalog).is_empty());

        engine.set_field(FieldUpdate::Distance(Some(2.0)));
        engine.toggle_set_member(SetField::Diet, "Halal");
        assert!(engine.evaluate(&catalog).is_empty());

        engine.clear_field(Field::Diet);
        assert_eq!(engine.evaluate(&catalog).len(), 1);
    }

    #[test]
    fn test_clear_all_resets_count() {
        let mut engine = FilterEngine::new();
        engine.set_field(FieldUpdate::Query("thai".into()));
        engine.set_field(FieldUpdate::PickupDay("Today".into()));
        engine.set_field(FieldUpdate::PickupWindow("Lunch".into()));
        engine.toggle_set_member(SetField::FoodTypes, "Meals");
        engine.toggle_set_member(SetField::Diet, "Vegan");
        engine.toggle_set_member(SetField::Cuisines, "Thai");
        engine.set_field(FieldUpdate::Distance(Some(1.5)));
        engine.set_field(FieldUpdate::Price(Some("$".into())));
        assert_eq!(engine.active_filter_count(), 8);

        engine.clear_all();
        assert_eq!(engine.active_filter_count(), 0);
        assert_eq!(engine.filters(), &FilterState::default());
    }

    #[test]
    fn test_cuisines_counted_as_active() {
        let mut engine = FilterEngine::new();
        engine.toggle_set_member(SetField::Cuisines, "Italian");
        assert_eq!(engine.active_filter_count(), 1);
        assert!(engine.is_active(Field::Cuisines));
    }

    #[test]
    fn test_toggle_set_member_twice_restores() {
        let mut engine = FilterEngine::new();
        engine.toggle_set_member(SetField::Diet, "Halal");
        let before = engine.filters().diet().clone();

        engine.toggle_set_member(SetField::Diet, "Vegan");
        assert!(engine.filters().diet().contains("Vegan"));
        engine.toggle_set_member(SetField::Diet, "Vegan");
        assert_eq!(engine.filters().diet(), &before);
    }

    #[test]
    fn test_empty_string_unsets_scalar() {
        let mut engine = FilterEngine::new();
        engine.set_field(FieldUpdate::PickupDay("Today".into()));
        engine.set_field(FieldUpdate::PickupDay(String::new()));
        engine.set_field(FieldUpdate::Query(String::new()));
        engine.set_field(FieldUpdate::Price(Some(String::new())));
        assert_eq!(engine.filters().pickup_day(), None);
        assert_eq!(engine.active_filter_count(), 0);
    }

    #[test]
    fn test_toggle_selector() {
        let mut engine = FilterEngine::new();
        engine.toggle_selector(FieldUpdate::PickupDay("Today".into()));
        assert_eq!(engine.filters().pickup_day(), Some("Today"));

        engine.toggle_selector(FieldUpdate::PickupDay("Tomorrow".into()));
        assert_eq!(engine.filters().pickup_day(), Some("Tomorrow"));

        engine.toggle_selector(FieldUpdate::PickupDay("Tomorrow".into()));
        assert_eq!(engine.filters().pickup_day(), None);

        engine.toggle_selector(FieldUpdate::Price(Some("$$".into())));
        engine.toggle_selector(FieldUpdate::Price(Some("$$".into())));
        assert!(!engine.is_active(Field::Price));
    }

    #[test]
    fn test_query_searches_name_cuisine_and_food_type() {
        let catalog = sample_catalog();
        let mut engine = FilterEngine::new();

        engine.set_field(FieldUpdate::Query("sushi".into()));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["5"]);

        engine.set_field(FieldUpdate::Query("japanese".into()));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["5"]);

        engine.set_field(FieldUpdate::Query("bakery".into()));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["3", "12"]);
    }

    #[test]
    fn test_query_is_typo_and_accent_tolerant() {
        let catalog = sample_catalog();
        let mut engine = FilterEngine::new();

        engine.set_field(FieldUpdate::Query("Itlian".into()));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["1"]);

        engine.set_field(FieldUpdate::Query("cafe francois".into()));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["12"]);
    }

    #[test]
    fn test_query_without_alphanumerics_matches_everything() {
        let catalog = sample_catalog();
        let mut engine = FilterEngine::new();
        engine.set_field(FieldUpdate::Query("!!".into()));
        assert!(engine.is_active(Field::Query));
        assert_eq!(engine.evaluate(&catalog).len(), catalog.len());
    }

    #[test]
    fn test_exact_selectors() {
        let catalog = sample_catalog();
        let mut engine = FilterEngine::new();

        engine.set_field(FieldUpdate::PickupDay("Tomorrow".into()));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["3", "5"]);

        engine.set_field(FieldUpdate::PickupWindow("Morning".into()));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["3"]);

        engine.set_field(FieldUpdate::PickupDay("today".into()));
        assert!(engine.evaluate(&catalog).is_empty());
    }

    #[test]
    fn test_set_filters_are_any_of() {
        let catalog = sample_catalog();
        let mut engine = FilterEngine::new();

        engine.toggle_set_member(SetField::FoodTypes, "Bakery");
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["3", "12"]);

        engine.toggle_set_member(SetField::FoodTypes, "Meals");
        assert_eq!(engine.evaluate(&catalog).len(), 5);

        engine.clear_field(Field::FoodTypes);
        engine.toggle_set_member(SetField::Cuisines, "French");
        engine.toggle_set_member(SetField::Cuisines, "Japanese");
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["3", "5", "12"]);
    }

    #[test]
    fn test_diet_requires_intersection() {
        let catalog = sample_catalog();
        let mut engine = FilterEngine::new();

        engine.toggle_set_member(SetField::Diet, "Gluten-free");
        engine.toggle_set_member(SetField::Diet, "Halal");
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["2"]);

        engine.toggle_set_member(SetField::Diet, "Vegetarian");
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["1", "2", "3", "12"]);
    }

    #[test]
    fn test_distance_ceiling_is_inclusive() {
        let catalog = sample_catalog();
        let mut engine = FilterEngine::new();

        engine.set_field(FieldUpdate::Distance(Some(0.8)));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["1", "3"]);

        engine.set_field(FieldUpdate::Distance(None));
        assert!(!engine.is_active(Field::Distance));
        assert_eq!(engine.evaluate(&catalog).len(), 5);
    }

    #[test]
    fn test_price_is_string_equality() {
        let catalog = sample_catalog();
        let mut engine = FilterEngine::new();

        engine.set_field(FieldUpdate::Price(Some("$$".into())));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["1", "12"]);

        engine.set_field(FieldUpdate::Price(Some("$$$$".into())));
        assert!(engine.evaluate(&catalog).is_empty());
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let catalog = sample_catalog();
        let mut engine = FilterEngine::new();
        engine.set_field(FieldUpdate::Query("french".into()));
        engine.set_field(FieldUpdate::PickupDay("Today".into()));
        assert_eq!(ids(&engine.evaluate(&catalog)), vec!["12"]);
        assert!(engine.matches(&catalog[4]));
        assert!(!engine.matches(&catalog[2]));
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("pickupDay".parse::<Field>().unwrap(), Field::PickupDay);
        assert_eq!("pickup_window".parse::<Field>().unwrap(), Field::PickupWindow);
        assert_eq!("food-types".parse::<Field>().unwrap(), Field::FoodTypes);
        assert!(matches!(
            "rating".parse::<Field>(),
            Err(Error::UnknownField(name)) if name == "rating"
        ));

        assert_eq!("diet".parse::<SetField>().unwrap(), SetField::Diet);
        assert!(matches!("price".parse::<SetField>(), Err(Error::NotASetField(_))));
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), field);
        }
    }
}
