use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;

/// Request DTO for creating a category
///
/// `name` is bounded by the `VARCHAR(30)` column.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 30, message = "Name must be 1-30 characters"))]
    pub name: String,

    /// Display ordering hint, duplicates allowed
    pub seq: i32,
}

/// Request DTO for replacing a category's name and seq
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 30, message = "Name must be 1-30 characters"))]
    pub name: String,

    pub seq: i32,
}

/// Response DTO for category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub seq: i32,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            seq: c.seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_bounds() {
        let ok = CreateCategoryDto {
            name: "a".repeat(30),
            seq: 1,
        };
        assert!(ok.validate().is_ok());

        let too_long = CreateCategoryDto {
            name: "a".repeat(31),
            seq: 1,
        };
        assert!(too_long.validate().is_err());

        let empty = UpdateCategoryDto {
            name: String::new(),
            seq: 1,
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_name_length_counts_characters() {
        // 30 multi-byte characters, 90 bytes
        let dto = CreateCategoryDto {
            name: "本".repeat(30),
            seq: 0,
        };
        assert!(dto.validate().is_ok());
    }
}
