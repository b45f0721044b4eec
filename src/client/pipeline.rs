//! Client-side list transformation: prep-time bound and sort order applied
//! to whatever the server returned for the current search.

use crate::models::Recipe;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MAX_MINUTES: i64 = 180;
pub const MAX_MINUTES_LIMIT: i64 = 9999;

/// Order of the rendered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Server order (the API returns newest first)
    #[default]
    Newest,
    /// Shortest prep time first
    Fastest,
    /// Title, alphabetically
    Az,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortMode::Newest => "newest",
            SortMode::Fastest => "fastest",
            SortMode::Az => "az",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown sort mode: {0}")]
pub struct UnknownSortMode(String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortMode::Newest),
            "fastest" => Ok(SortMode::Fastest),
            "az" => Ok(SortMode::Az),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

/// Filters that never reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    pub max_minutes: i64,
    pub sort: SortMode,
}

impl Default for ListFilters {
    fn default() -> Self {
        Self {
            max_minutes: DEFAULT_MAX_MINUTES,
            sort: SortMode::Newest,
        }
    }
}

impl ListFilters {
    /// Recipes to render, in order. The input is left untouched.
    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        let mut visible = filter_by_max_minutes(recipes, self.max_minutes);
        sort_recipes(&mut visible, self.sort);
        visible
    }

    /// Whether anything differs from the defaults (drives the "reset" button).
    pub fn has_active_extra_filters(&self) -> bool {
        *self != Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn clamp_minutes(max_minutes: i64) -> i64 {
    max_minutes.clamp(0, MAX_MINUTES_LIMIT)
}

/// Recipes whose prep time is within `max_minutes` (clamped to `[0, 9999]`).
pub fn filter_by_max_minutes(recipes: &[Recipe], max_minutes: i64) -> Vec<&Recipe> {
    let bound = clamp_minutes(max_minutes);
    recipes
        .iter()
        .filter(|r| i64::from(r.prep_minutes) <= bound)
        .collect()
}

/// Stable in-place sort.
pub fn sort_recipes(recipes: &mut [&Recipe], mode: SortMode) {
    match mode {
        SortMode::Newest => {}
        SortMode::Fastest => recipes.sort_by_key(|r| r.prep_minutes),
        SortMode::Az => recipes.sort_by_cached_key(|r| title_collation_key(&r.title)),
    }
}

/// Case-insensitive first, exact text as the tiebreak.
fn title_collation_key(title: &str) -> (String, String) {
    (title.to_lowercase(), title.to_string())
}

/// Distinct non-empty categories, sorted, for the category picker.
pub fn categories(recipes: &[Recipe]) -> Vec<String> {
    recipes
        .iter()
        .map(|r| r.category.as_str())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Recipes that are in `favorite_ids`, in list order. IDs with no matching
/// recipe are ignored.
pub fn favorite_recipes<'a>(recipes: &'a [Recipe], favorite_ids: &[String]) -> Vec<&'a Recipe> {
    let favorites: HashSet<&str> = favorite_ids.iter().map(String::as_str).collect();
    recipes
        .iter()
        .filter(|r| favorites.contains(r.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, title: &str, category: &str, prep_minutes: u32) -> Recipe {
        Recipe {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            prep_minutes,
            image_url: String::new(),
            ingredients: vec![],
            instructions: vec![],
            owner_id: None,
            owner_name: None,
            owner_email: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn titles(list: &[&Recipe]) -> Vec<String> {
        list.iter().map(|r| r.title.clone()).collect()
    }

    fn sample() -> Vec<Recipe> {
        vec![
            recipe("1", "Tomato Soup", "Soups", 40),
            recipe("2", "banana bread", "Baking", 75),
            recipe("3", "Toast", "Breakfast", 5),
            recipe("4", "Apple Pie", "Baking", 240),
            recipe("5", "Omelette", "Breakfast", 5),
        ]
    }

    #[test]
    fn test_filter_contains_exactly_within_bound() {
        let list = sample();
        for bound in [-10, 0, 5, 40, 180, 10_000] {
            let kept = filter_by_max_minutes(&list, bound);
            let expected: Vec<&Recipe> = list
                .iter()
                .filter(|r| i64::from(r.prep_minutes) <= clamp_minutes(bound))
                .collect();
            assert_eq!(kept, expected, "bound {bound}");
        }
    }

    #[test]
    fn test_filter_edges() {
        let list = sample();
        assert!(filter_by_max_minutes(&list, -1).is_empty());
        assert_eq!(filter_by_max_minutes(&list, 5).len(), 2);
        assert_eq!(filter_by_max_minutes(&list, i64::MAX).len(), 5);
    }

    #[test]
    fn test_sort_az() {
        let list = vec![
            recipe("1", "Banana Bread", "Baking", 60),
            recipe("2", "Apple Pie", "Baking", 90),
        ];
        let filters = ListFilters {
            max_minutes: 180,
            sort: SortMode::Az,
        };
        assert_eq!(titles(&filters.apply(&list)), vec!["Apple Pie", "Banana Bread"]);
    }

    #[test]
    fn test_sort_az_ignores_case() {
        let filters = ListFilters {
            max_minutes: MAX_MINUTES_LIMIT,
            sort: SortMode::Az,
        };
        assert_eq!(
            titles(&filters.apply(&sample())),
            vec!["Apple Pie", "banana bread", "Omelette", "Toast", "Tomato Soup"]
        );
    }

    #[test]
    fn test_sort_fastest_is_stable() {
        let filters = ListFilters {
            max_minutes: 180,
            sort: SortMode::Fastest,
        };
        assert_eq!(
            titles(&filters.apply(&sample())),
            vec!["Toast", "Omelette", "Tomato Soup", "banana bread"]
        );
    }

    #[test]
    fn test_newest_keeps_server_order_and_input_untouched() {
        let list = sample();
        let before = list.clone();
        let visible = ListFilters::default().apply(&list);
        assert_eq!(
            titles(&visible),
            vec!["Tomato Soup", "banana bread", "Toast", "Omelette"]
        );
        assert_eq!(list, before);
    }

    #[test]
    fn test_active_filters_and_reset() {
        let mut filters = ListFilters::default();
        assert!(!filters.has_active_extra_filters());

        filters.sort = SortMode::Az;
        assert!(filters.has_active_extra_filters());
        filters.reset();
        filters.max_minutes = 60;
        assert!(filters.has_active_extra_filters());
        filters.reset();
        assert_eq!(filters, ListFilters::default());
    }

    #[test]
    fn test_sort_mode_parse_and_display() {
        for mode in [SortMode::Newest, SortMode::Fastest, SortMode::Az] {
            assert_eq!(mode.to_string().parse::<SortMode>().unwrap(), mode);
        }
        assert!("slowest".parse::<SortMode>().is_err());
        assert_eq!(serde_json::to_string(&SortMode::Az).unwrap(), "\"az\"");
    }

    #[test]
    fn test_categories_distinct_sorted() {
        let mut list = sample();
        list.push(recipe("6", "Mystery", "", 1));
        assert_eq!(categories(&list), vec!["Baking", "Breakfast", "Soups"]);
    }

    #[test]
    fn test_favorite_recipes_ignores_dangling_ids() {
        let list = sample();
        let favorites = vec!["4".to_string(), "gone".to_string(), "1".to_string()];
        assert_eq!(
            titles(&favorite_recipes(&list, &favorites)),
            vec!["Tomato Soup", "Apple Pie"]
        );
    }
}
