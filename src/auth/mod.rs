mod jwt;
mod middleware;
mod password;
mod verification;

pub use jwt::{Claims, TokenError, TokenIssuer, TokenKind};
pub use middleware::{AuthError, OptionalUser, RequireUser};
pub use password::PasswordHasher;
pub use verification::{LogNotifier, VerificationNotifier, generate_code};
