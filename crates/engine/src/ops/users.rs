use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Action, EngineError, KycStatus, NewUser, Principal, ResultEngine, User, UserUpdate, users,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{Engine, convert_all, find_required, with_tx};

const BAD_CREDENTIALS: &str = "Incorrect email or password";

impl Engine {
    /// Create an account and return it.
    ///
    /// Email and username are unique; the password is stored as a bcrypt hash
    /// with the engine's configured cost.
    pub async fn register(&self, cmd: NewUser) -> ResultEngine<User> {
        let email = normalize_required_text(&cmd.email, "email")?;
        if !email.contains('@') {
            return Err(EngineError::InvalidInput(
                "invalid email address".to_string(),
            ));
        }
        let username = normalize_required_text(&cmd.username, "username")?;
        if cmd.password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        let cmd = NewUser {
            email,
            username,
            full_name: normalize_required_text(&cmd.full_name, "full_name")?,
            phone: normalize_optional_text(cmd.phone),
            business_name: normalize_optional_text(cmd.business_name),
            business_address: normalize_optional_text(cmd.business_address),
            business_registration: normalize_optional_text(cmd.business_registration),
            ..cmd
        };
        let hashed = bcrypt::hash(&cmd.password, self.password_cost)?;

        with_tx!(self, |db_tx| {
            let email_taken = users::Entity::find()
                .filter(users::Column::Email.eq(cmd.email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if email_taken {
                return Err(EngineError::ExistingKey(
                    "Email already registered".to_string(),
                ));
            }
            let username_taken = users::Entity::find()
                .filter(users::Column::Username.eq(cmd.username.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if username_taken {
                return Err(EngineError::ExistingKey(
                    "Username already taken".to_string(),
                ));
            }

            let model = users::ActiveModel::new_account(&cmd, hashed, Utc::now())
                .insert(&db_tx)
                .await
                .map_err(|err| EngineError::conflict_on_unique(err, "Account already exists"))?;
            tracing::info!(user_id = %model.id, role = %cmd.role, "account registered");
            User::try_from(model)
        })
    }

    /// Check credentials and return the account they belong to.
    pub async fn login(&self, email: &str, password: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = users::Entity::find()
                .filter(users::Column::Email.eq(email.trim()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

            if !bcrypt::verify(password, &model.hashed_password)? {
                return Err(EngineError::Unauthorized(BAD_CREDENTIALS.to_string()));
            }
            if !model.is_active {
                return Err(EngineError::Unauthorized(
                    "Inactive user account".to_string(),
                ));
            }
            User::try_from(model)
        })
    }

    /// Resolve the account behind an authenticated request.
    ///
    /// Fails with `KeyNotFound` when the account was removed after the
    /// credential was issued and with `Unauthorized` when it is inactive.
    pub async fn authenticate(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = find_required::<users::Entity>(&db_tx, user_id, "User not found").await?;
            if !model.is_active {
                return Err(EngineError::Unauthorized(
                    "Inactive user account".to_string(),
                ));
            }
            User::try_from(model)
        })
    }

    pub async fn user(&self, principal: &Principal, user_id: Uuid) -> ResultEngine<User> {
        principal.authorize(Action::ViewUser { user: user_id })?;
        with_tx!(self, |db_tx| {
            let model = find_required::<users::Entity>(&db_tx, user_id, "User not found").await?;
            User::try_from(model)
        })
    }

    /// Every account, oldest first. Admin only.
    pub async fn users(&self, principal: &Principal) -> ResultEngine<Vec<User>> {
        principal.authorize(Action::ListUsers)?;
        with_tx!(self, |db_tx| {
            let models = users::Entity::find()
                .order_by_asc(users::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            convert_all(models)
        })
    }

    /// Merge profile fields into an account. The role never changes.
    pub async fn update_user(
        &self,
        principal: &Principal,
        user_id: Uuid,
        update: UserUpdate,
    ) -> ResultEngine<User> {
        principal.authorize(Action::UpdateUser { user: user_id })?;
        with_tx!(self, |db_tx| {
            let model = find_required::<users::Entity>(&db_tx, user_id, "User not found").await?;
            let mut active: users::ActiveModel = model.into();
            if let Some(full_name) = update.full_name {
                active.full_name = ActiveValue::Set(normalize_required_text(&full_name, "full_name")?);
            }
            if update.phone.is_some() {
                active.phone = ActiveValue::Set(normalize_optional_text(update.phone));
            }
            if update.business_name.is_some() {
                active.business_name = ActiveValue::Set(normalize_optional_text(update.business_name));
            }
            if update.business_address.is_some() {
                active.business_address =
                    ActiveValue::Set(normalize_optional_text(update.business_address));
            }
            if update.business_registration.is_some() {
                active.business_registration =
                    ActiveValue::Set(normalize_optional_text(update.business_registration));
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }

    /// Mark an account as verified without a KYC review. Used by the admin
    /// tooling to bootstrap accounts.
    pub async fn verify_user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = find_required::<users::Entity>(&db_tx, user_id, "User not found").await?;
            let mut active: users::ActiveModel = model.into();
            active.is_verified = ActiveValue::Set(true);
            active.kyc_status = ActiveValue::Set(KycStatus::Approved.as_str().to_string());
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }

    /// Look up an account by email or username.
    pub async fn find_user(&self, login: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let login = login.trim();
            let model = users::Entity::find()
                .filter(
                    users::Column::Email
                        .eq(login)
                        .or(users::Column::Username.eq(login)),
                )
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("User not found".to_string()))?;
            User::try_from(model)
        })
    }
}
