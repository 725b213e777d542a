//! Type-safe wrapper for dataset slugs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slugs appear inside derived physical table names, so the bound here
/// keeps the derived identifiers inside the datastore's 63-byte limit.
pub const MAX_SLUG_LENGTH: usize = 50;

/// Error returned when a slug fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugValidationError {
    pub slug: String,
    pub reason: String,
}

impl fmt::Display for SlugValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid slug '{}': {}", self.slug, self.reason)
    }
}

impl std::error::Error for SlugValidationError {}

/// URL-safe dataset slug.
///
/// Slugs are unique per dataset, appear in public URLs and in derived
/// physical table names. Only lowercase ASCII alphanumerics and dashes are
/// accepted; uppercase input is normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct Slug(String);

impl Slug {
    fn validate(slug: &str) -> Result<(), SlugValidationError> {
        if slug.is_empty() {
            return Err(SlugValidationError {
                slug: slug.to_string(),
                reason: "Slug cannot be empty".to_string(),
            });
        }

        if slug.len() > MAX_SLUG_LENGTH {
            return Err(SlugValidationError {
                slug: slug.to_string(),
                reason: format!("Slug cannot exceed {} bytes", MAX_SLUG_LENGTH),
            });
        }

        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugValidationError {
                slug: slug.to_string(),
                reason: "Slug may only contain lowercase letters, digits and dashes".to_string(),
            });
        }

        Ok(())
    }

    /// Creates a new slug from a string, with validation.
    ///
    /// Input is lowercased before validation, so `"Covid19"` and `"covid19"`
    /// produce equal slugs.
    pub fn try_new(slug: impl Into<String>) -> Result<Self, SlugValidationError> {
        let slug = slug.into().to_lowercase();
        Self::validate(&slug)?;
        Ok(Self(slug))
    }

    /// Creates a new slug from a string.
    ///
    /// # Panics
    ///
    /// Panics if the slug fails validation. Use `try_new` for fallible
    /// creation.
    #[inline]
    pub fn new(slug: impl Into<String>) -> Self {
        let slug = slug.into().to_lowercase();
        Self::validate(&slug).expect("Invalid slug");
        Self(slug)
    }

    /// Returns the slug as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
