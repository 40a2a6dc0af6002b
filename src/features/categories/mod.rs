//! Category resource.
//!
//! A category is a named entry with an ordering hint (`seq`). Ids are UUIDs
//! generated by the server at creation and never change afterwards.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Success | Description |
//! |--------|----------|---------|-------------|
//! | GET | `/categories` | 200 | List all categories |
//! | GET | `/categories/{id}` | 200 | Get category by id |
//! | POST | `/categories` | 201 | Create category |
//! | PUT | `/categories/{id}` | 200 | Replace name and seq |
//! | DELETE | `/categories/{id}` | 204 | Delete category |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgCategoryStore;
pub use services::CategoryService;
