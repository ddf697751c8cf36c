//! Core types for the recipe store.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a recipe.
///
/// Generated by the store on creation and never changed afterwards.
/// Lookups compare the text exactly.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl RecipeId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        RecipeId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecipeId({})", self.0)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        RecipeId(s.to_string())
    }
}

impl From<String> for RecipeId {
    fn from(s: String) -> Self {
        RecipeId(s)
    }
}

/// A single recipe in the collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier (assigned by store).
    pub id: RecipeId,

    pub name: String,

    #[serde(default)]
    pub ingredients: String,

    #[serde(default)]
    pub instructions: String,

    /// Cooking time in minutes.
    #[serde(
        rename = "cookingTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cooking_time: Option<i64>,
}

impl Recipe {
    /// Build a recipe from an id and its content fields.
    pub fn new(id: RecipeId, fields: RecipeFields) -> Self {
        Self {
            id,
            name: fields.name,
            ingredients: fields.ingredients,
            instructions: fields.instructions,
            cooking_time: fields.cooking_time,
        }
    }

    /// The content fields of this recipe, without its id.
    pub fn fields(&self) -> RecipeFields {
        RecipeFields {
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Input for creating or replacing a recipe (before id assigned).
///
/// Every field defaults when absent so that a missing `name` is reported by
/// [`RecipeFields::validate`] rather than as a decoding failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFields {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub ingredients: String,

    #[serde(default)]
    pub instructions: String,

    #[serde(
        rename = "cookingTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cooking_time: Option<i64>,
}

impl RecipeFields {
    /// Create fields with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients = ingredients.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_cooking_time(mut self, minutes: i64) -> Self {
        self.cooking_time = Some(minutes);
        self
    }

    /// Check the fields before they reach storage.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Validation("name is required".into()));
        }
        Ok(())
    }
}
