pub mod checker;
pub mod outcome;
pub mod range;
pub mod transport;

pub use checker::BreachChecker;
pub use common::{Config, ValidationError};
pub use outcome::{FailurePolicy, LookupOutcome, Resolution};
pub use transport::{HttpTransport, Transport};

/// What a form or model layer knows about the user whose password is being checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAttributes {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// The seam between a validation framework and a password check.
///
/// The framework calls `validate` and shows the error's message to the end user as is.
pub trait PasswordValidator: Send + Sync {
    fn validate(&self, password: &str, user: Option<&UserAttributes>) -> Result<(), ValidationError>;
    fn help_text(&self) -> &str;
}
