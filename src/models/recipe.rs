// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Recipe model for storage and API.

use crate::models::AuthenticatedUser;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Recipe as returned by the API (document ID flattened into `id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub prep_minutes: u32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Firebase UID of the creator. Absent on legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    /// Creation time (RFC3339)
    #[serde(default)]
    pub created_at: String,
    /// Last modification time (RFC3339)
    #[serde(default)]
    pub updated_at: String,
}

impl Recipe {
    /// Build a new recipe owned by `owner`.
    pub fn new(id: String, fields: RecipeFields, owner: &AuthenticatedUser, now: &str) -> Self {
        let mut recipe = Self {
            id,
            title: String::new(),
            category: String::new(),
            prep_minutes: 0,
            image_url: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            owner_id: Some(owner.uid.clone()),
            owner_name: owner.name.clone(),
            owner_email: owner.email.clone(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        };
        recipe.apply(fields, now);
        recipe
    }

    /// Overwrite the editable fields. Identity, ownership and `created_at` are kept.
    pub fn apply(&mut self, fields: RecipeFields, now: &str) {
        self.title = fields.title;
        self.category = fields.category;
        self.prep_minutes = fields.prep_minutes;
        self.image_url = fields.image_url;
        self.ingredients = fields.ingredients;
        self.instructions = fields.instructions;
        self.updated_at = now.to_string();
    }

    /// Owner UID, treating an empty string the same as a missing owner.
    pub fn owner(&self) -> Option<&str> {
        self.owner_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Recipe document as stored in Firestore.
///
/// The document ID is not a stored field; Firestore hands it back through
/// the `_firestore_id` pseudo-field when reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub prep_minutes: u32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl RecipeDocument {
    /// Convert to the API shape. `fallback_id` is used when the read did not
    /// carry the document ID.
    pub fn into_recipe(self, fallback_id: &str) -> Recipe {
        Recipe {
            id: self.doc_id.unwrap_or_else(|| fallback_id.to_string()),
            title: self.title,
            category: self.category,
            prep_minutes: self.prep_minutes,
            image_url: self.image_url,
            ingredients: self.ingredients,
            instructions: self.instructions,
            owner_id: self.owner_id,
            owner_name: self.owner_name,
            owner_email: self.owner_email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<&Recipe> for RecipeDocument {
    fn from(recipe: &Recipe) -> Self {
        Self {
            doc_id: None,
            title: recipe.title.clone(),
            category: recipe.category.clone(),
            prep_minutes: recipe.prep_minutes,
            image_url: recipe.image_url.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            owner_id: recipe.owner_id.clone(),
            owner_name: recipe.owner_name.clone(),
            owner_email: recipe.owner_email.clone(),
            created_at: recipe.created_at.clone(),
            updated_at: recipe.updated_at.clone(),
        }
    }
}

/// Raw create/update body.
///
/// Every field is taken as loose JSON so that a sloppy client gets the
/// same 400 as a missing field instead of a deserialization error.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub prep_minutes: Option<Value>,
    #[serde(default)]
    pub image_url: Option<Value>,
    #[serde(default)]
    pub ingredients: Option<Value>,
    #[serde(default)]
    pub instructions: Option<Value>,
}

/// Validated, normalized editable fields of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFields {
    pub title: String,
    pub category: String,
    pub prep_minutes: u32,
    pub image_url: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl RecipeInput {
    /// Normalize the body. Returns `None` when title or category is missing
    /// or blank.
    pub fn normalize(&self) -> Option<RecipeFields> {
        Some(RecipeFields {
            title: required_text(self.title.as_ref())?,
            category: required_text(self.category.as_ref())?,
            prep_minutes: minutes(self.prep_minutes.as_ref()),
            image_url: self
                .image_url
                .as_ref()
                .and_then(Value::as_str)
                .map(|url| url.trim().to_string())
                .unwrap_or_default(),
            ingredients: string_list(self.ingredients.as_ref()),
            instructions: string_list(self.instructions.as_ref()),
        })
    }
}

fn required_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Numbers and numeric strings are accepted; anything else is 0.
fn minutes(value: Option<&Value>) -> u32 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    raw.filter(|m| m.is_finite() && *m > 0.0)
        .map(|m| m.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// Stored minutes go through the same coercion as request bodies, so one
/// odd document cannot fail a whole listing.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(minutes(value.as_ref()))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// `GET /recipes` query parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeQuery {
    /// Case-insensitive substring, matched against title or category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact category match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl RecipeQuery {
    pub fn new(search: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            category: Some(category.into()),
        }
        .normalized()
    }

    /// Trim both parameters and drop the empty ones.
    pub fn normalized(self) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        Self {
            search: clean(self.search),
            category: clean(self.category),
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(category) = &self.category {
            if recipe.category != *category {
                return false;
            }
        }

        match &self.search {
            Some(search) => {
                let needle = search.to_lowercase();
                recipe.title.to_lowercase().contains(&needle)
                    || recipe.category.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}
