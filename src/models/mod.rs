pub mod feed;
pub mod recipe;
pub mod social;
pub mod user;
