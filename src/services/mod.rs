pub mod error;
pub use error::ContentError;

pub mod credentials;
pub use credentials::{Argon2Credentials, Credentials};

pub mod account_service;
pub use account_service::{AccountService, AuthError};

pub mod account_service_impl;
pub use account_service_impl::SeaOrmAccountService;

pub mod feed_service;
pub use feed_service::FeedService;

pub mod feed_service_impl;
pub use feed_service_impl::SeaOrmFeedService;

pub mod moderation_service;
pub use moderation_service::ModerationService;

pub mod moderation_service_impl;
pub use moderation_service_impl::SeaOrmModerationService;

pub mod rating_service;
pub use rating_service::RatingService;

pub mod rating_service_impl;
pub use rating_service_impl::SeaOrmRatingService;

pub mod social_service;
pub use social_service::SocialService;

pub mod social_service_impl;
pub use social_service_impl::SeaOrmSocialService;
