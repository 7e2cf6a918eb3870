//! Password hashing port.

use crate::domain::foundation::DomainError;

/// One-way password hashing.
///
/// Hashes are self-describing strings (algorithm, parameters and salt
/// included), so verification needs nothing but the stored value.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Returns false for a mismatch. Errors only for unreadable hashes.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
