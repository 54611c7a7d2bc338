//! Account service: email-verified registration, captcha-gated login,
//! token refresh and revocation, profile management.

use std::sync::Arc;

use tracing::info;

use gallery_auth::captcha::CaptchaService;
use gallery_auth::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use gallery_auth::password::PasswordHasher;
use gallery_auth::verification::generate_verification_code;
use gallery_core::config::auth::AuthConfig;
use gallery_core::config::email::EmailConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::clock::Clock;
use gallery_core::traits::mailer::Mailer;
use gallery_database::store::{UserStore, VerificationStore};
use gallery_entity::user::{CreateUser, User, UserType};

use crate::context::RequestContext;

/// Registration request.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Emailed verification code.
    pub code: String,
}

/// Login request.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Key returned alongside the captcha image.
    pub captcha_key: String,
    /// The user's answer to the captcha.
    pub captcha_value: String,
}

/// Successful login payload.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub tokens: TokenPair,
}

/// Manages accounts and credentials.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    verifications: Arc<dyn VerificationStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    captcha: CaptchaService,
    hasher: PasswordHasher,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    password_min_length: usize,
    code_expire_minutes: i64,
    resend_interval_seconds: i64,
    from_address: String,
}

impl UserService {
    /// Creates a new user service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        verifications: Arc<dyn VerificationStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        captcha: CaptchaService,
        encoder: JwtEncoder,
        decoder: JwtDecoder,
        auth: &AuthConfig,
        email: &EmailConfig,
    ) -> Self {
        Self {
            users,
            verifications,
            mailer,
            clock,
            captcha,
            hasher: PasswordHasher::new(),
            encoder,
            decoder,
            password_min_length: auth.password_min_length,
            code_expire_minutes: email.code_expire_minutes as i64,
            resend_interval_seconds: email.resend_interval_seconds as i64,
            from_address: email.from_address.clone(),
        }
    }

    /// Emails a registration code to an address not yet on an account.
    ///
    /// Resends are throttled per address.
    pub async fn send_verification_code(&self, email: &str) -> AppResult<()> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::validation("Email already registered"));
        }

        let now = self.clock.now();
        if let Some(latest) = self.verifications.latest_for_email(email).await? {
            let next_allowed =
                latest.created_at + chrono::Duration::seconds(self.resend_interval_seconds);
            if now < next_allowed {
                return Err(AppError::validation(
                    "Please wait before requesting another code",
                ));
            }
        }

        let code = generate_verification_code();
        let expires_at = now + chrono::Duration::minutes(self.code_expire_minutes);
        self.verifications.insert(email, &code, expires_at).await?;

        self.mailer
            .send(
                email,
                "Your SuGallery verification code",
                &format!(
                    "Your verification code is {code}. It expires in {} minutes.\n\n-- {}",
                    self.code_expire_minutes, self.from_address
                ),
            )
            .await?;

        info!(email, "Sent verification code");
        Ok(())
    }

    /// Registers a new business account against a valid emailed code.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<User> {
        if req.password.len() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }
        if req.password != req.confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }

        let now = self.clock.now();
        let verification = self
            .verifications
            .latest_for_email(&req.email)
            .await?
            .filter(|v| !v.is_verified && !v.is_expired_at(now) && v.code == req.code)
            .ok_or_else(|| AppError::validation("Invalid or expired verification code"))?;

        let user = self
            .users
            .insert(&CreateUser {
                username: req.username,
                email: req.email,
                password_hash: self.hasher.hash_password(&req.password)?,
                user_type: UserType::Business,
            })
            .await?;

        self.verifications.mark_verified(verification.id).await?;

        info!(user_id = %user.id, username = %user.username, "Registered user");
        Ok(user)
    }

    /// Issues a captcha challenge for the login form.
    pub async fn issue_captcha(&self) -> AppResult<gallery_auth::captcha::CaptchaChallenge> {
        self.captcha.issue().await
    }

    /// Authenticates a user. The captcha is checked before the credentials
    /// and consumed either way.
    pub async fn login(&self, req: LoginRequest) -> AppResult<LoginResponse> {
        self.captcha.verify(&req.captcha_key, &req.captcha_value).await?;

        let user = self
            .users
            .find_by_username(&req.username)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid username or password"))?;

        if !self.hasher.verify_password(&req.password, &user.password_hash)? {
            return Err(AppError::authentication("Invalid username or password"));
        }

        let now = self.clock.now();
        self.users.update_last_login(user.id, now).await?;
        // The row was fetched before the update; reflect it in the response.
        let mut user = user;
        user.last_login_at = Some(now);

        let tokens =
            self.encoder
                .generate_token_pair(user.id, &user.user_type, &user.username)?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse { user, tokens })
    }

    /// Exchanges a refresh token for a new access token.
    pub async fn refresh(
        &self,
        refresh_token: &str,
    ) -> AppResult<(String, chrono::DateTime<chrono::Utc>)> {
        let claims = self.decoder.decode_refresh_token(refresh_token).await?;
        self.encoder
            .generate_access_token(claims.sub, &claims.user_type, &claims.username)
    }

    /// Revokes a refresh token by blocklisting its id for its remaining
    /// lifetime.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let claims = self.decoder.decode_refresh_token(refresh_token).await?;
        self.decoder
            .blocklist_token(claims.jti, claims.remaining_ttl_seconds())
            .await?;
        info!(user_id = %claims.sub, "User logged out");
        Ok(())
    }

    /// Fetches the requester's profile.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the requester's profile fields.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        store_name: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<User> {
        self.users
            .update_profile(ctx.user_id, store_name, email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use chrono::{TimeZone, Utc};

    use gallery_auth::captcha::PlainTextRenderer;
    use gallery_auth::verification::LogMailer;
    use gallery_cache::CacheManager;
    use gallery_core::config::cache::CacheConfig;
    use gallery_core::error::ErrorKind;
    use crate::testing::{FixedClock, InMemoryUsers, InMemoryVerifications, ctx};

    struct Harness {
        clock: Arc<FixedClock>,
        verifications: Arc<InMemoryVerifications>,
        service: UserService,
    }

    fn setup() -> Harness {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let users = InMemoryUsers::new();
        let verifications = InMemoryVerifications::new(clock.clone());
        let cache = Arc::new(CacheManager::new(&CacheConfig::default()).unwrap());
        let auth: AuthConfig = serde_json::from_str("{}").unwrap();
        let email = EmailConfig::default();

        let service = UserService::new(
            users,
            verifications.clone(),
            Arc::new(LogMailer),
            clock.clone(),
            CaptchaService::new(&auth, cache.clone(), Arc::new(PlainTextRenderer)),
            JwtEncoder::new(&auth),
            JwtDecoder::new(&auth, cache),
            &auth,
            &email,
        );

        Harness {
            clock,
            verifications,
            service,
        }
    }

    async fn issued_code(h: &Harness, email: &str) -> String {
        h.service.send_verification_code(email).await.unwrap();
        h.verifications
            .latest_for_email(email)
            .await
            .unwrap()
            .unwrap()
            .code
    }

    async fn register(h: &Harness, username: &str, email: &str) -> User {
        let code = issued_code(h, email).await;
        h.service
            .register(RegisterRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: "long-enough".to_string(),
                confirm_password: "long-enough".to_string(),
                code,
            })
            .await
            .unwrap()
    }

    async fn solve_captcha(h: &Harness) -> (String, String) {
        let challenge = h.service.issue_captcha().await.unwrap();
        let b64 = challenge.image.rsplit(',').next().unwrap();
        let answer = String::from_utf8(STANDARD.decode(b64).unwrap()).unwrap();
        (challenge.captcha_key, answer)
    }

    #[tokio::test]
    async fn test_resend_is_throttled() {
        let h = setup();
        h.service.send_verification_code("a@example.com").await.unwrap();

        let err = h
            .service
            .send_verification_code("a@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        h.clock.advance(chrono::Duration::seconds(61));
        assert!(h.service.send_verification_code("a@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_requires_matching_valid_code() {
        let h = setup();
        let code = issued_code(&h, "a@example.com").await;

        let mut req = RegisterRequest {
            username: "alice".to_string(),
            email: "a@example.com".to_string(),
            password: "long-enough".to_string(),
            confirm_password: "long-enough".to_string(),
            code: "000000".to_string(),
        };
        if req.code == code {
            req.code = "000001".to_string();
        }
        assert!(h.service.register(req.clone()).await.is_err());

        req.code = code;
        assert!(h.service.register(req).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_rejects_expired_code() {
        let h = setup();
        let code = issued_code(&h, "a@example.com").await;

        h.clock.advance(chrono::Duration::minutes(11));

        let err = h
            .service
            .register(RegisterRequest {
                username: "alice".to_string(),
                email: "a@example.com".to_string(),
                password: "long-enough".to_string(),
                confirm_password: "long-enough".to_string(),
                code,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_register_validates_password() {
        let h = setup();
        let code = issued_code(&h, "a@example.com").await;

        let short = RegisterRequest {
            username: "alice".to_string(),
            email: "a@example.com".to_string(),
            password: "short".to_string(),
            confirm_password: "short".to_string(),
            code: code.clone(),
        };
        assert!(h.service.register(short).await.is_err());

        let mismatch = RegisterRequest {
            username: "alice".to_string(),
            email: "a@example.com".to_string(),
            password: "long-enough".to_string(),
            confirm_password: "different-pw".to_string(),
            code,
        };
        assert!(h.service.register(mismatch).await.is_err());
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let h = setup();
        let user = register(&h, "alice", "a@example.com").await;
        assert_eq!(user.username, "alice");

        let stale = h
            .verifications
            .latest_for_email("a@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(stale.is_verified);
    }

    #[tokio::test]
    async fn test_login_requires_captcha() {
        let h = setup();
        register(&h, "alice", "a@example.com").await;

        let err = h
            .service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "long-enough".to_string(),
                captcha_key: "bogus".to_string(),
                captcha_value: "XXXX".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_login_and_refresh_roundtrip() {
        let h = setup();
        register(&h, "alice", "a@example.com").await;
        let (key, answer) = solve_captcha(&h).await;

        let login = h
            .service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "long-enough".to_string(),
                captcha_key: key,
                captcha_value: answer,
            })
            .await
            .unwrap();

        assert!(login.user.last_login_at.is_some());
        assert!(h.service.refresh(&login.tokens.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_is_authentication_error() {
        let h = setup();
        register(&h, "alice", "a@example.com").await;
        let (key, answer) = solve_captcha(&h).await;

        let err = h
            .service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "wrong-password".to_string(),
                captcha_key: key,
                captcha_value: answer,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_logout_revokes_refresh_token() {
        let h = setup();
        register(&h, "alice", "a@example.com").await;
        let (key, answer) = solve_captcha(&h).await;
        let login = h
            .service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "long-enough".to_string(),
                captcha_key: key,
                captcha_value: answer,
            })
            .await
            .unwrap();

        h.service.logout(&login.tokens.refresh_token).await.unwrap();

        let err = h
            .service
            .refresh(&login.tokens.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_profile_update() {
        let h = setup();
        let user = register(&h, "alice", "a@example.com").await;

        let updated = h
            .service
            .update_profile(&ctx(user.id), Some("Alice's Shop"), None)
            .await
            .unwrap();
        assert_eq!(updated.store_name.as_deref(), Some("Alice's Shop"));
        assert_eq!(updated.email, "a@example.com");
    }
}
