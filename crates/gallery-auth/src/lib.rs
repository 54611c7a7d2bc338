//! # gallery-auth
//!
//! Credential handling for SuGallery: JWT access/refresh tokens with a
//! cache-backed blocklist, Argon2id password hashing, captcha challenges for
//! login, and email verification codes for registration.

pub mod captcha;
pub mod jwt;
pub mod password;
pub mod verification;

pub use captcha::{CaptchaChallenge, CaptchaService, PlainTextRenderer};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair, TokenType};
pub use password::PasswordHasher;
pub use verification::{LogMailer, generate_verification_code};
