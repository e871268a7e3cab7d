//! User profile.

use shopfront_core::{DomainError, DomainResult, Entity, UserId};

use crate::Role;

/// A registered user.
///
/// # Invariants
/// - `email` is trimmed, lowercased and contains exactly one `@` with text on both sides.
/// - `display_name` is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: String,
    display_name: String,
    roles: Vec<Role>,
}

impl User {
    pub fn new(id: UserId, email: &str, display_name: &str) -> DomainResult<Self> {
        let email = email.trim().to_lowercase();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
            _ => return Err(DomainError::validation(format!("invalid email '{email}'"))),
        }

        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(DomainError::validation("display name must not be empty"));
        }

        Ok(Self {
            id,
            email,
            display_name: display_name.to_string(),
            roles: Vec::new(),
        })
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
