pub use super::followers::Entity as Followers;
pub use super::ingredients::Entity as Ingredients;
pub use super::likes::Entity as Likes;
pub use super::ratings::Entity as Ratings;
pub use super::recipes::Entity as Recipes;
pub use super::tags::Entity as Tags;
pub use super::users::Entity as Users;
