//! REST API shared utilities (response types, pagination)

pub mod auth;
pub mod category;
pub mod complaint;
pub mod health;
pub mod help;

use serde::{Deserialize, Serialize};

/// Maximum allowed limit value for list queries
pub(crate) const MAX_LIMIT: i64 = 100;

pub(crate) fn default_limit() -> i64 {
    20
}

/// Reject limit values less than 1, clamp to MAX_LIMIT
pub(crate) fn deserialize_limit<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if value < 1 {
        return Err(serde::de::Error::custom(
            "limit must be a positive integer (>= 1)",
        ));
    }
    Ok(value.min(MAX_LIMIT))
}

/// Reject negative offsets
pub(crate) fn deserialize_offset<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if value < 0 {
        return Err(serde::de::Error::custom("offset must not be negative"));
    }
    Ok(value)
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, limit: i64, offset: i64, total: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                limit,
                offset,
                total,
            },
        }
    }
}

/// Success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Message response (for logout, delete, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
