//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures raised at the
/// catalog write boundary. The planner itself never produces one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty name, negative stock).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced product or raw material does not exist.
    #[error("{entity} {id} not found")]
    EntityNotFound { entity: &'static str, id: String },

    /// A conflicting write (id already taken, entity still referenced, ...).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The product already has a recipe item for this material.
    #[error("product {product_id} already has a recipe item for material {material_id}")]
    DuplicateRecipeLink { product_id: String, material_id: String },

    /// Recipe items must require a strictly positive quantity.
    #[error("required quantity must be positive, got {0}")]
    InvalidRequiredQuantity(i64),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl core::fmt::Display) -> Self {
        Self::EntityNotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn duplicate_recipe_link(
        product_id: impl core::fmt::Display,
        material_id: impl core::fmt::Display,
    ) -> Self {
        Self::DuplicateRecipeLink {
            product_id: product_id.to_string(),
            material_id: material_id.to_string(),
        }
    }
}
