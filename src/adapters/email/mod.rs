//! Outbound email adapters.
//!
//! - `resend` - Resend HTTP API
//! - `logging` - Logs instead of sending (no API key configured)

mod logging;
mod resend;

pub use logging::LoggingEmailSender;
pub use resend::{ResendConfig, ResendEmailSender};
