pub mod config;
pub mod cookie;
pub mod error;
pub mod module;
pub mod session;
pub mod token;
pub mod types;

pub use config::{ConfigError, DashboardConfig};
pub use cookie::{AUTH_COOKIE, SessionCookie};
pub use error::ServiceError;
pub use module::Module;
pub use session::{FileStorage, MemoryStorage, SessionError, SessionStorage, User, UserSession};
pub use token::{TokenHint, decode_hint, is_expired, is_expired_at};
pub use types::now_rfc3339;
