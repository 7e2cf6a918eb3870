//! Account handlers.
//!
//! ## Commands
//! - Register an account and send its verification email
//! - Verify an email address
//! - Log in with a password

mod login;
mod register_user;
mod verify_email;

pub use login::{LoginCommand, LoginHandler, LoginResult};
pub use register_user::{
    RegisterUserCommand, RegisterUserHandler, RegisterUserResult, MIN_PASSWORD_LEN,
};
pub use verify_email::{VerifyEmailCommand, VerifyEmailHandler, VerifyEmailResult};
