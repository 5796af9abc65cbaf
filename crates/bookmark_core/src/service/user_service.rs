//! User profile service.
//!
//! # Responsibility
//! - Register profile rows for newly signed-up identities.
//! - Read and edit the caller's own profile.
//!
//! # Invariants
//! - Emails are normalized (trimmed, lowercased) before persistence.
//! - A caller can only read or edit the profile keyed by its own id.

use crate::model::bookmark::UserId;
use crate::model::user::{normalize_email, User, UserPatch};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for profile use-cases.
#[derive(Debug)]
pub enum UserServiceError {
    /// Email input is blank.
    InvalidEmail,
    /// Another profile already uses this email.
    EmailTaken(String),
    /// No profile exists for the caller id.
    UserNotFound(UserId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl UserServiceError {
    /// HTTP status a transport layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidEmail => 400,
            Self::EmailTaken(_) => 403,
            Self::UserNotFound(_) => 404,
            Self::Repo(_) => 500,
        }
    }
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email cannot be empty"),
            Self::EmailTaken(email) => write!(f, "email already registered: {email}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "user",
                id,
            } => Self::UserNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Profile service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a profile for a newly registered identity.
    pub fn register_user(&self, email: &str) -> Result<User, UserServiceError> {
        let email = normalize_email(email).ok_or(UserServiceError::InvalidEmail)?;
        self.repo
            .create_user(email.as_str())
            .map_err(|err| email_conflict(err, email.as_str()))
    }

    /// Returns the caller's own profile.
    pub fn get_me(&self, user_id: UserId) -> Result<User, UserServiceError> {
        self.repo
            .get_user(user_id)?
            .ok_or(UserServiceError::UserNotFound(user_id))
    }

    /// Applies a partial update to the caller's own profile.
    pub fn edit_user(&self, user_id: UserId, patch: &UserPatch) -> Result<User, UserServiceError> {
        let mut normalized = patch.clone();
        if let Some(email) = patch.email.as_deref() {
            normalized.email = Some(normalize_email(email).ok_or(UserServiceError::InvalidEmail)?);
        }

        match self.repo.update_user(user_id, &normalized) {
            Ok(user) => Ok(user),
            Err(err) => Err(match normalized.email.as_deref() {
                Some(email) => email_conflict(err, email),
                None => err.into(),
            }),
        }
    }
}

fn email_conflict(err: RepoError, email: &str) -> UserServiceError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        UserServiceError::EmailTaken(email.to_string())
    } else {
        err.into()
    }
}
