pub mod aggregate;
pub mod rating;
pub mod recipe;
pub mod social;
pub mod user;
