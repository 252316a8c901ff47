pub mod prelude;

pub mod followers;
pub mod ingredients;
pub mod likes;
pub mod ratings;
pub mod recipes;
pub mod tags;
pub mod users;
