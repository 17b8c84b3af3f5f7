// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod health;
mod login;
mod metrics;
mod password_reset;
mod root;
mod shared_types;
mod signup;
mod verify_email;

// Core handlers
pub use health::health_check;
pub use metrics::metrics_handler;
pub use root::root_handler;

// Signup handler
pub use signup::signup;

// Email verification handlers
pub use verify_email::{confirm_email, resend_code};

// Password reset handlers
pub use password_reset::{forgot_password, reset_password};

// Login handler
pub use login::login;
