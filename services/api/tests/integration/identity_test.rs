use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use lms_api::domain::password::{hash_reset_token, verify_password};
use lms_api::domain::ports::AssetKind;
use lms_api::error::ApiError;
use lms_api::usecase::auth::{AuthenticateUseCase, issue_user_token};
use lms_api::usecase::user::{
    ChangePasswordInput, ChangePasswordUseCase, ForgetPasswordUseCase, LoginInput, LoginUseCase,
    RegisterInput, RegisterUseCase, ResetPasswordUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};
use lms_auth_types::token::validate_token;
use lms_domain::user::Role;

use crate::helpers::{
    FakeAssetStore, FakeMailer, MockUserRepo, TEST_JWT_SECRET, TEST_PASSWORD,
    reset_token_from_mail, test_user, upload,
};

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        full_name: "Ada Lovelace".to_owned(),
        email: email.to_owned(),
        password: TEST_PASSWORD.to_owned(),
        avatar: Some(upload("ada.png")),
    }
}

fn register_usecase(repo: MockUserRepo, assets: Arc<FakeAssetStore>) -> RegisterUseCase<MockUserRepo> {
    RegisterUseCase {
        repo,
        assets,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        token_ttl_secs: 3600,
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_user_with_normalized_email() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();
    let assets = Arc::new(FakeAssetStore::default());

    let output = register_usecase(repo, assets.clone())
        .execute(register_input("  Ada@Example.COM "))
        .await
        .unwrap();

    assert_eq!(output.user.email, "ada@example.com");
    assert_eq!(output.user.role, Role::User);
    assert_eq!(output.user.avatar.public_id, "lms/1-ada.png");
    assert!(output.user.subscription.id.is_none());
    assert_eq!(users.lock().unwrap().len(), 1);

    let info = validate_token(&output.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, output.user.id);
    assert_eq!(info.role, Role::User);
    assert_eq!(info.exp, output.token_exp);
}

#[tokio::test]
async fn should_store_password_as_hash() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();

    register_usecase(repo, Arc::new(FakeAssetStore::default()))
        .execute(register_input("ada@example.com"))
        .await
        .unwrap();

    let stored = users.lock().unwrap()[0].password_hash.clone();
    assert_ne!(stored, TEST_PASSWORD);
    assert!(verify_password(TEST_PASSWORD, &stored).unwrap());
}

#[tokio::test]
async fn should_reject_duplicate_email_case_insensitively() {
    let mut existing = test_user(Role::User);
    existing.email = "ada@example.com".to_owned();
    let repo = MockUserRepo::new(vec![existing]);
    let users = repo.users_handle();
    let assets = Arc::new(FakeAssetStore::default());

    let result = register_usecase(repo, assets.clone())
        .execute(register_input("ADA@example.com"))
        .await;

    assert!(
        matches!(result, Err(ApiError::Conflict(_))),
        "expected Conflict, got {result:?}"
    );
    assert_eq!(users.lock().unwrap().len(), 1);
    assert!(assets.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_registration_without_avatar() {
    let mut input = register_input("ada@example.com");
    input.avatar = None;

    let result = register_usecase(MockUserRepo::empty(), Arc::new(FakeAssetStore::default()))
        .execute(input)
        .await;

    assert!(matches!(result, Err(ApiError::Validation(ref m)) if m == "avatar file is required"));
}

#[tokio::test]
async fn should_reject_short_full_name_and_password() {
    let usecase = register_usecase(MockUserRepo::empty(), Arc::new(FakeAssetStore::default()));

    let mut short_name = register_input("ada@example.com");
    short_name.full_name = "Ada".to_owned();
    assert!(matches!(
        usecase.execute(short_name).await,
        Err(ApiError::Validation(_))
    ));

    let mut short_password = register_input("ada@example.com");
    short_password.password = "short".to_owned();
    assert!(matches!(
        usecase.execute(short_password).await,
        Err(ApiError::Validation(_))
    ));
}

#[tokio::test]
async fn should_reject_malformed_email() {
    let result = register_usecase(MockUserRepo::empty(), Arc::new(FakeAssetStore::default()))
        .execute(register_input("not an email"))
        .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_not_create_user_when_avatar_upload_fails() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();

    let result = register_usecase(repo, Arc::new(FakeAssetStore::failing()))
        .execute(register_input("ada@example.com"))
        .await;

    assert!(matches!(result, Err(ApiError::AssetUpload(_))));
    assert!(users.lock().unwrap().is_empty());
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_with_registered_credentials() {
    let repo = MockUserRepo::empty();
    let registered = register_usecase(repo.clone(), Arc::new(FakeAssetStore::default()))
        .execute(register_input("ada@example.com"))
        .await
        .unwrap();

    let usecase = LoginUseCase {
        repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        token_ttl_secs: 3600,
    };
    let output = usecase
        .execute(LoginInput {
            email: "ADA@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(output.user.id, registered.user.id);
    let info = validate_token(&output.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.role, output.user.role);
}

#[tokio::test]
async fn should_return_same_error_for_unknown_email_and_wrong_password() {
    let user = test_user(Role::User);
    let email = user.email.clone();
    let usecase = LoginUseCase {
        repo: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        token_ttl_secs: 3600,
    };

    let unknown = usecase
        .execute(LoginInput {
            email: "nobody@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap_err();
    let wrong = usecase
        .execute(LoginInput {
            email,
            password: "wrong-password".to_owned(),
        })
        .await
        .unwrap_err();

    assert!(matches!(unknown, ApiError::InvalidCredentials));
    assert!(matches!(wrong, ApiError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn should_require_email_and_password_on_login() {
    let usecase = LoginUseCase {
        repo: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        token_ttl_secs: 3600,
    };
    let result = usecase
        .execute(LoginInput {
            email: String::new(),
            password: String::new(),
        })
        .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
}

// ── Authenticate ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_resolve_user_from_token() {
    let user = test_user(Role::Admin);
    let (token, _) = issue_user_token(&user, TEST_JWT_SECRET, 3600).unwrap();
    let usecase = AuthenticateUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let resolved = usecase.execute(Some(&token)).await.unwrap();
    assert_eq!(resolved.id, user.id);
    assert_eq!(resolved.role, Role::Admin);
}

#[tokio::test]
async fn should_reject_missing_bad_and_orphaned_tokens_alike() {
    let user = test_user(Role::User);
    let (orphan_token, _) = issue_user_token(&user, TEST_JWT_SECRET, 3600).unwrap();
    let (foreign_token, _) = issue_user_token(&user, "another-secret", 3600).unwrap();
    let usecase = AuthenticateUseCase {
        repo: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    for token in [None, Some("garbage"), Some(foreign_token.as_str()), Some(orphan_token.as_str())] {
        let result = usecase.execute(token).await;
        assert!(
            matches!(result, Err(ApiError::Unauthenticated)),
            "expected Unauthenticated, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_use_current_role_not_token_role() {
    let mut user = test_user(Role::User);
    let (token, _) = issue_user_token(&user, TEST_JWT_SECRET, 3600).unwrap();
    user.role = Role::Admin;
    let usecase = AuthenticateUseCase {
        repo: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let resolved = usecase.execute(Some(&token)).await.unwrap();
    assert_eq!(resolved.role, Role::Admin);
}

// ── ChangePassword ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_change_password() {
    let user = test_user(Role::User);
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();

    ChangePasswordUseCase { repo }
        .execute(
            &user,
            ChangePasswordInput {
                old_password: TEST_PASSWORD.to_owned(),
                new_password: "brand-new-secret".to_owned(),
            },
        )
        .await
        .unwrap();

    let stored = users.lock().unwrap()[0].password_hash.clone();
    assert!(verify_password("brand-new-secret", &stored).unwrap());
    assert!(!verify_password(TEST_PASSWORD, &stored).unwrap());
}

#[tokio::test]
async fn should_reject_wrong_old_password() {
    let user = test_user(Role::User);
    let result = ChangePasswordUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    }
    .execute(
        &user,
        ChangePasswordInput {
            old_password: "not-the-password".to_owned(),
            new_password: "brand-new-secret".to_owned(),
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_unchanged_password() {
    let user = test_user(Role::User);
    let result = ChangePasswordUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    }
    .execute(
        &user,
        ChangePasswordInput {
            old_password: TEST_PASSWORD.to_owned(),
            new_password: TEST_PASSWORD.to_owned(),
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
}

// ── ForgetPassword / ResetPassword ───────────────────────────────────────────

fn forget_usecase(repo: MockUserRepo, mailer: Arc<FakeMailer>) -> ForgetPasswordUseCase<MockUserRepo> {
    ForgetPasswordUseCase {
        repo,
        mailer,
        frontend_url: "http://localhost:5173/".to_owned(),
    }
}

#[tokio::test]
async fn should_mail_reset_link_and_store_only_token_hash() {
    let user = test_user(Role::User);
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();
    let mailer = Arc::new(FakeMailer::default());

    forget_usecase(repo, mailer.clone())
        .execute(&user.email.to_uppercase())
        .await
        .unwrap();

    let message = mailer.last().unwrap();
    assert_eq!(message.to, user.email);
    assert_eq!(message.subject, "Password Reset Request");
    assert!(message.body.contains("http://localhost:5173/reset-password/"));

    let raw = reset_token_from_mail(&message);
    let stored = users.lock().unwrap()[0].clone();
    assert_eq!(stored.forget_password_token, Some(hash_reset_token(&raw)));
    assert!(stored.forget_password_expiry.unwrap() > Utc::now());
}

#[tokio::test]
async fn should_succeed_silently_for_unknown_email() {
    let mailer = Arc::new(FakeMailer::default());

    forget_usecase(MockUserRepo::empty(), mailer.clone())
        .execute("nobody@example.com")
        .await
        .unwrap();

    assert!(mailer.last().is_none());
}

#[tokio::test]
async fn should_clear_reset_token_when_mail_fails() {
    let user = test_user(Role::User);
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();

    forget_usecase(repo, Arc::new(FakeMailer::failing()))
        .execute(&user.email)
        .await
        .unwrap();

    let stored = users.lock().unwrap()[0].clone();
    assert!(stored.forget_password_token.is_none());
    assert!(stored.forget_password_expiry.is_none());
}

#[tokio::test]
async fn should_reset_password_with_mailed_token() {
    let user = test_user(Role::User);
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();
    let mailer = Arc::new(FakeMailer::default());
    forget_usecase(repo.clone(), mailer.clone())
        .execute(&user.email)
        .await
        .unwrap();
    let raw = reset_token_from_mail(&mailer.last().unwrap());

    ResetPasswordUseCase { repo: repo.clone() }
        .execute(&raw, "after-reset-secret")
        .await
        .unwrap();

    let stored = users.lock().unwrap()[0].clone();
    assert!(verify_password("after-reset-secret", &stored.password_hash).unwrap());
    assert!(stored.forget_password_token.is_none());

    let login = LoginUseCase {
        repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        token_ttl_secs: 3600,
    }
    .execute(LoginInput {
        email: user.email.clone(),
        password: "after-reset-secret".to_owned(),
    })
    .await;
    assert!(login.is_ok());
}

#[tokio::test]
async fn should_reject_wrong_reused_and_expired_reset_tokens() {
    let user = test_user(Role::User);
    let repo = MockUserRepo::new(vec![user.clone()]);
    let mailer = Arc::new(FakeMailer::default());
    forget_usecase(repo.clone(), mailer.clone())
        .execute(&user.email)
        .await
        .unwrap();
    let raw = reset_token_from_mail(&mailer.last().unwrap());
    let usecase = ResetPasswordUseCase { repo: repo.clone() };

    // The literal parameter name must not unlock anything.
    for wrong in ["resetToken", "0000"] {
        let result = usecase.execute(wrong, "after-reset-secret").await;
        assert!(matches!(result, Err(ApiError::InvalidOrExpiredToken)));
    }

    usecase.execute(&raw, "after-reset-secret").await.unwrap();
    let reused = usecase.execute(&raw, "another-secret-1").await;
    assert!(matches!(reused, Err(ApiError::InvalidOrExpiredToken)));

    let mut expired = test_user(Role::User);
    expired.forget_password_token = Some(hash_reset_token("stale-token"));
    expired.forget_password_expiry = Some(Utc::now() - Duration::minutes(1));
    let usecase = ResetPasswordUseCase {
        repo: MockUserRepo::new(vec![expired]),
    };
    let result = usecase.execute("stale-token", "after-reset-secret").await;
    assert!(matches!(result, Err(ApiError::InvalidOrExpiredToken)));
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_name_and_replace_avatar() {
    let user = test_user(Role::User);
    let old_avatar = user.avatar.public_id.clone();
    let assets = Arc::new(FakeAssetStore::default());
    let usecase = UpdateProfileUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
        assets: assets.clone(),
    };

    let updated = usecase
        .execute(
            &user,
            user.id,
            UpdateProfileInput {
                full_name: Some("  Grace Hopper ".to_owned()),
                avatar: Some(upload("grace.png")),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.full_name, "Grace Hopper");
    assert_eq!(updated.avatar.public_id, "lms/1-grace.png");
    let released = assets.released.lock().unwrap().clone();
    assert_eq!(released, vec![(AssetKind::Image, old_avatar)]);
}

#[tokio::test]
async fn should_forbid_updating_another_profile() {
    let user = test_user(Role::User);
    let result = UpdateProfileUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
        assets: Arc::new(FakeAssetStore::default()),
    }
    .execute(
        &user,
        Uuid::now_v7(),
        UpdateProfileInput {
            full_name: Some("Grace Hopper".to_owned()),
            avatar: None,
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[tokio::test]
async fn should_reject_empty_profile_update() {
    let user = test_user(Role::User);
    let result = UpdateProfileUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
        assets: Arc::new(FakeAssetStore::default()),
    }
    .execute(
        &user,
        user.id,
        UpdateProfileInput {
            full_name: Some("   ".to_owned()),
            avatar: None,
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::Validation(ref m)) if m == "nothing to update"));
}
