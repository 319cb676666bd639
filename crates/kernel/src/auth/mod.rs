//! Account authentication helpers: password hashes and bearer tokens.

mod password;
mod token;

use thiserror::Error;

pub use password::{hash_password, verify_password};
pub use token::{AccountKind, Claims, TokenService, bearer_token};

/// Token authentication failures.
///
/// Each variant carries the account kind the caller required, if any, so
/// the message can point the client at the right login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", missing_message(*.0))]
    Missing(Option<AccountKind>),

    #[error("{}", expired_message(*.0))]
    Expired(Option<AccountKind>),

    #[error("{}", invalid_message(*.0))]
    Invalid(Option<AccountKind>),

    #[error("Only {} functionality", .0.singular())]
    WrongAccount(AccountKind),
}

fn missing_message(kind: Option<AccountKind>) -> String {
    match kind {
        Some(k) => format!(
            "Missing {0} token. Please login or register as {0}.",
            k.singular()
        ),
        None => "Missing token. Please login or register.".to_string(),
    }
}

fn expired_message(kind: Option<AccountKind>) -> String {
    match kind {
        Some(k) => format!(
            "Expired token. Please login as {} to get new token.",
            k.singular()
        ),
        None => "Expired token. Please login to get new token.".to_string(),
    }
}

fn invalid_message(kind: Option<AccountKind>) -> String {
    match kind {
        Some(k) => format!(
            "Invalid token. Please login or register as {}.",
            k.singular()
        ),
        None => "Invalid token. Please login or register.".to_string(),
    }
}
