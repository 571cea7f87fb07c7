use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use lms_domain::subscription::SubscriptionRef;
use lms_domain::user::Role;

use crate::access::authorize_owner;
use crate::domain::password::{
    RESET_TOKEN_TTL_MINUTES, generate_reset_token, hash_password, hash_reset_token,
    verify_dummy_password, verify_password,
};
use crate::domain::ports::{AVATAR_TARGET, AssetKind, AssetStore, MailMessage, Mailer, UploadFile};
use crate::domain::repository::UserRepository;
use crate::domain::types::{
    FULL_NAME_MAX, FULL_NAME_MIN, PASSWORD_MIN, User, normalize_email, validate_email,
    validate_full_name, validate_password,
};
use crate::error::ApiError;
use crate::usecase::auth::issue_user_token;
use crate::usecase::release_asset;

/// A user together with a freshly issued session token.
#[derive(Debug)]
pub struct AuthOutput {
    pub user: User,
    pub token: String,
    pub token_exp: u64,
}

fn check_full_name(full_name: &str) -> Result<(), ApiError> {
    if validate_full_name(full_name) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "full name must be between {FULL_NAME_MIN} and {FULL_NAME_MAX} characters"
        )))
    }
}

fn check_password(password: &str) -> Result<(), ApiError> {
    if validate_password(password) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )))
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<UploadFile>,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub repo: R,
    pub assets: Arc<dyn AssetStore>,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<AuthOutput, ApiError> {
        let full_name = input.full_name.trim().to_owned();
        let email = normalize_email(&input.email);
        if full_name.is_empty() || email.is_empty() || input.password.is_empty() {
            return Err(ApiError::validation("all fields are required"));
        }
        check_full_name(&full_name)?;
        if !validate_email(&email) {
            return Err(ApiError::validation("please provide a valid email address"));
        }
        check_password(&input.password)?;
        let avatar_file = input
            .avatar
            .ok_or_else(|| ApiError::validation("avatar file is required"))?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict("email already exists".into()));
        }

        let password_hash = hash_password(&input.password)?;
        let avatar = self
            .assets
            .upload(AVATAR_TARGET, avatar_file)
            .await
            .map_err(ApiError::AssetUpload)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            full_name,
            email,
            password_hash,
            role: Role::User,
            avatar,
            forget_password_token: None,
            forget_password_expiry: None,
            subscription: SubscriptionRef::default(),
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = self.repo.create(&user).await {
            release_asset(self.assets.as_ref(), AssetKind::Image, &user.avatar.public_id).await;
            return Err(e);
        }

        let (token, token_exp) = issue_user_token(&user, &self.jwt_secret, self.token_ttl_secs)?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(AuthOutput {
            user,
            token,
            token_exp,
        })
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutput, ApiError> {
        let email = normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return Err(ApiError::validation("all fields are required"));
        }
        let Some(user) = self.repo.find_by_email(&email).await? else {
            tracing::debug!("login for unknown email");
            verify_dummy_password(&input.password);
            return Err(ApiError::InvalidCredentials);
        };
        if !verify_password(&input.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "login with wrong password");
            return Err(ApiError::InvalidCredentials);
        }
        let (token, token_exp) = issue_user_token(&user, &self.jwt_secret, self.token_ttl_secs)?;
        Ok(AuthOutput {
            user,
            token,
            token_exp,
        })
    }
}

// ── ChangePassword ───────────────────────────────────────────────────────────

pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ChangePasswordUseCase<R> {
    pub async fn execute(&self, user: &User, input: ChangePasswordInput) -> Result<(), ApiError> {
        if input.old_password.is_empty() || input.new_password.is_empty() {
            return Err(ApiError::validation("all fields are mandatory"));
        }
        if input.old_password == input.new_password {
            return Err(ApiError::validation(
                "new password must differ from the old password",
            ));
        }
        check_password(&input.new_password)?;
        if !verify_password(&input.old_password, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }
        let password_hash = hash_password(&input.new_password)?;
        self.repo.update_password(user.id, &password_hash).await
    }
}

// ── ForgetPassword ───────────────────────────────────────────────────────────

pub struct ForgetPasswordUseCase<R: UserRepository> {
    pub repo: R,
    pub mailer: Arc<dyn Mailer>,
    pub frontend_url: String,
}

impl<R: UserRepository> ForgetPasswordUseCase<R> {
    /// Always succeeds for a well-formed email, registered or not.
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(ApiError::validation("email is required"));
        }
        let Some(user) = self.repo.find_by_email(&email).await? else {
            tracing::debug!("reset requested for unknown email");
            return Ok(());
        };

        let raw_token = generate_reset_token();
        let expiry = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.repo
            .set_reset_token(user.id, Some((&hash_reset_token(&raw_token), expiry)))
            .await?;

        let reset_url = format!(
            "{}/reset-password/{raw_token}",
            self.frontend_url.trim_end_matches('/')
        );
        let message = MailMessage {
            to: user.email.clone(),
            subject: "Password Reset Request".to_owned(),
            body: format!(
                "Click the link to reset your password: {reset_url}\n\n\
                 The link expires in {RESET_TOKEN_TTL_MINUTES} minutes."
            ),
            reply_to: None,
        };
        if let Err(e) = self.mailer.send(message).await {
            tracing::error!(error = %format!("{e:#}"), user_id = %user.id, "reset mail not delivered");
            self.repo.set_reset_token(user.id, None).await?;
        }
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ResetPasswordUseCase<R> {
    pub async fn execute(&self, raw_token: &str, password: &str) -> Result<(), ApiError> {
        if password.is_empty() {
            return Err(ApiError::validation("password is required"));
        }
        check_password(password)?;
        let token_hash = hash_reset_token(raw_token);
        let user = self
            .repo
            .find_by_reset_token(&token_hash, Utc::now())
            .await?
            .ok_or(ApiError::InvalidOrExpiredToken)?;
        let password_hash = hash_password(password)?;
        self.repo.update_password(user.id, &password_hash).await?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub avatar: Option<UploadFile>,
}

pub struct UpdateProfileUseCase<R: UserRepository> {
    pub repo: R,
    pub assets: Arc<dyn AssetStore>,
}

impl<R: UserRepository> UpdateProfileUseCase<R> {
    pub async fn execute(
        &self,
        user: &User,
        target_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<User, ApiError> {
        authorize_owner(user, target_id)?;
        let full_name = input
            .full_name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());
        if full_name.is_none() && input.avatar.is_none() {
            return Err(ApiError::validation("nothing to update"));
        }
        if let Some(ref full_name) = full_name {
            check_full_name(full_name)?;
        }

        let new_avatar = match input.avatar {
            Some(file) => Some(
                self.assets
                    .upload(AVATAR_TARGET, file)
                    .await
                    .map_err(ApiError::AssetUpload)?,
            ),
            None => None,
        };

        if let Err(e) = self
            .repo
            .update_profile(user.id, full_name.as_deref(), new_avatar.as_ref())
            .await
        {
            if let Some(ref avatar) = new_avatar {
                release_asset(self.assets.as_ref(), AssetKind::Image, &avatar.public_id).await;
            }
            return Err(e);
        }
        if new_avatar.is_some() {
            release_asset(self.assets.as_ref(), AssetKind::Image, &user.avatar.public_id).await;
        }

        self.repo
            .find_by_id(user.id)
            .await?
            .ok_or(ApiError::NotFound("user"))
    }
}
