use crate::entities::{ingredients, prelude::*, ratings, recipes};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const FEED_INDEX: &str = "idx_recipes_status_published";
const AUTHOR_INDEX: &str = "idx_recipes_author_status";
const RATING_INDEX: &str = "idx_ratings_recipe";
const INGREDIENT_INDEX: &str = "idx_ingredients_recipe";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(FEED_INDEX)
                    .table(Recipes)
                    .col(recipes::Column::Status)
                    .col(recipes::Column::PublishedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(AUTHOR_INDEX)
                    .table(Recipes)
                    .col(recipes::Column::AuthorId)
                    .col(recipes::Column::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(RATING_INDEX)
                    .table(Ratings)
                    .col(ratings::Column::RecipeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INGREDIENT_INDEX)
                    .table(Ingredients)
                    .col(ingredients::Column::RecipeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INGREDIENT_INDEX).table(Ingredients).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(RATING_INDEX).table(Ratings).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(AUTHOR_INDEX).table(Recipes).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(FEED_INDEX).table(Recipes).to_owned())
            .await?;

        Ok(())
    }
}
