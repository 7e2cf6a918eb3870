//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Entitlement Store
//!
//! - `UserRepository` - Accounts and subscription status
//! - `ContentReader` - Courses, vlogs and lessons
//! - `PurchaseRepository` - Individual purchases, unique per (user, content)
//! - `VerificationTokenRepository` - Email verification tokens
//!
//! ## Identity and Delivery
//!
//! - `SessionValidator` / `SessionIssuer` - Session tokens
//! - `PasswordHasher` - One-way password hashing
//! - `EmailSender` - Transactional email

mod content_reader;
mod email_sender;
mod password_hasher;
mod purchase_repository;
mod session_issuer;
mod session_validator;
mod user_repository;
mod verification_token_repository;

pub use content_reader::ContentReader;
pub use email_sender::{EmailSender, OutgoingEmail};
pub use password_hasher::PasswordHasher;
pub use purchase_repository::PurchaseRepository;
pub use session_issuer::{IssuedSession, SessionIssuer};
pub use session_validator::SessionValidator;
pub use user_repository::UserRepository;
pub use verification_token_repository::VerificationTokenRepository;
