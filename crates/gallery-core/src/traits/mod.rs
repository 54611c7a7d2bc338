//! Collaborator traits defined in `gallery-core` and implemented by other
//! crates (or by test fakes).

pub mod cache;
pub mod captcha;
pub mod clock;
pub mod mailer;
pub mod storage;

pub use cache::CacheProvider;
pub use captcha::CaptchaRenderer;
pub use clock::{Clock, SystemClock};
pub use mailer::Mailer;
pub use storage::FileStore;
