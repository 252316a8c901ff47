use crate::domain::{Difficulty, RatingId, RecipeId, RecipeStatus, UserId};
use serde::{Deserialize, Serialize};

/// A submission as received from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub difficulty: Difficulty,
    pub prep_minutes: i32,
    #[serde(default)]
    pub cook_minutes: Option<i32>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub calories: Option<i32>,
    /// Path handed back by the blob store after upload
    #[serde(default)]
    pub image_path: Option<String>,
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewRecipe {
    /// Trimmed, lowercased, de-duplicated tags in first-seen order.
    #[must_use]
    pub fn normalized_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

/// Card-sized view used by the feed, search and profile lists.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub prep_minutes: i32,
    pub image_path: Option<String>,
    pub author_id: UserId,
    pub author_name: String,
    pub rating_avg: Option<f64>,
    pub rating_count: i32,
    pub status: RecipeStatus,
    pub published_at: String,
    /// Whether the viewer has liked this recipe
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub difficulty: Difficulty,
    pub prep_minutes: i32,
    pub cook_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub calories: Option<i32>,
    pub image_path: Option<String>,
    pub author_id: UserId,
    pub author_name: String,
    pub status: RecipeStatus,
    pub rating_avg: Option<f64>,
    pub rating_count: i32,
    pub published_at: String,
    pub ingredients: Vec<IngredientLine>,
    pub tags: Vec<String>,
    pub likes: u64,
    pub liked: bool,
    pub reviews: Vec<Review>,
}

/// A rating row as shown under a recipe, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: RatingId,
    pub user_id: UserId,
    pub user_name: String,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: String,
}

/// Search-box suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSuggestion {
    pub id: RecipeId,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_normalized_and_deduplicated() {
        let recipe = NewRecipe {
            title: "Soup".to_string(),
            description: None,
            category: "Dinner".to_string(),
            difficulty: Difficulty::Easy,
            prep_minutes: 10,
            cook_minutes: None,
            servings: None,
            calories: None,
            image_path: None,
            ingredients: vec![],
            tags: vec![
                " Vegan".to_string(),
                "vegan".to_string(),
                String::new(),
                "Quick ".to_string(),
            ],
        };

        assert_eq!(recipe.normalized_tags(), vec!["vegan", "quick"]);
    }
}
