pub mod category_repository;
#[cfg(test)]
pub mod memory;
pub mod pg;

pub use category_repository::{CategoryStore, CategoryTransaction};
pub use pg::PgCategoryStore;
