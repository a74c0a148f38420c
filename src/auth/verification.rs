use rand::Rng;

use crate::error::{Error, Result};
use crate::store::Store;

const CODE_MIN: i64 = 100_000;
const CODE_MAX: i64 = 1_000_000;
const MAX_ATTEMPTS: u32 = 32;

/// Delivers verification codes to users.
pub trait VerificationNotifier: Send + Sync {
    fn send_code(&self, email: &str, code: i64) -> Result<()>;
}

/// Writes codes to the log instead of sending mail.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl VerificationNotifier for LogNotifier {
    fn send_code(&self, email: &str, code: i64) -> Result<()> {
        tracing::info!(email, code, "Verification code issued");
        Ok(())
    }
}

/// Picks a six digit code not currently assigned to any user.
pub fn generate_code(store: &dyn Store) -> Result<i64> {
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_ATTEMPTS {
        let code = rng.gen_range(CODE_MIN..CODE_MAX);
        if !store.verification_code_exists(code)? {
            return Ok(code);
        }
    }
    Err(Error::DuplicateKey)
}
