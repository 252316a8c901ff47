use crate::domain::{Page, Role, UserId};
use crate::models::recipe::RecipeSummary;
use serde::{Deserialize, Serialize};

/// User data without the credential hash.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub surname: Option<String>,
    pub about_me: Option<String>,
    pub profile_img_path: Option<String>,
    pub role: Role,
    pub rating_avg: Option<f64>,
    pub date_registered: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Editable profile fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub about_me: Option<String>,
    pub profile_img_path: Option<String>,
}

/// Public profile page, as seen by a particular viewer.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub surname: Option<String>,
    pub about_me: Option<String>,
    pub profile_img_path: Option<String>,
    pub role: Role,
    pub rating_avg: Option<f64>,
    pub date_registered: String,
    pub followers: u64,
    pub following: u64,
    pub viewer_follows: bool,
    pub is_self: bool,
    pub recipes: Page<RecipeSummary>,
}
