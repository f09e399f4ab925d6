use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UserError {
    #[error("Username {0:?} is already registered")]
    UsernameTaken(String),
    #[error("Email {0:?} is already registered")]
    EmailTaken(String),
}
