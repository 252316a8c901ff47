use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, SqlErr,
};

use crate::domain::{Role, UserId, timestamp_now};
use crate::entities::users;
use crate::models::user::{ProfileUpdate, User};

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::new(model.id),
            email: model.email,
            name: model.name,
            surname: model.surname,
            about_me: model.about_me,
            profile_img_path: model.profile_img_path,
            role: model.role,
            rating_avg: model.rating_avg,
            date_registered: model.date_registered,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a new account. Returns `None` when the email is already taken.
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<User>> {
        let model = users::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            name: Set(name.to_string()),
            role: Set(role),
            date_registered: Set(timestamp_now()),
            ..Default::default()
        };

        match model.insert(&self.conn).await {
            Ok(user) => Ok(Some(User::from(user))),
            Err(err) if is_unique_violation(&err) => Ok(None),
            Err(err) => Err(err).context("Failed to insert user"),
        }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Get user by email together with the stored credential hash
    pub async fn get_by_email_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn get_role(&self, id: i32) -> Result<Option<Role>> {
        let role: Option<Role> = users::Entity::find_by_id(id)
            .select_only()
            .column(users::Column::Role)
            .into_tuple()
            .one(&self.conn)
            .await
            .context("Failed to query user role")?;

        Ok(role)
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        Ok(self.get_role(id).await?.is_some())
    }

    pub async fn set_role(&self, id: i32, role: Role) -> Result<bool> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Role, sea_orm::sea_query::Expr::value(role))
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update user role")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn update_profile(&self, id: i32, update: &ProfileUpdate) -> Result<Option<User>> {
        let Some(user) = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for profile update")?
        else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.clone().into();
        if let Some(name) = &update.name {
            active.name = Set(name.clone());
        }
        if let Some(surname) = &update.surname {
            active.surname = Set(non_blank(surname));
        }
        if let Some(about_me) = &update.about_me {
            active.about_me = Set(non_blank(about_me));
        }
        if let Some(path) = &update.profile_img_path {
            active.profile_img_path = Set(non_blank(path));
        }

        if !active.is_changed() {
            return Ok(Some(User::from(user)));
        }

        let updated = active.update(&self.conn).await?;
        Ok(Some(User::from(updated)))
    }
}

/// Empty strings clear optional profile fields.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
