#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use axum_test::TestServer;

#[cfg(test)]
use crate::features::categories::{
    repositories::memory::InMemoryCategoryStore, routes, CategoryService,
};

/// Serve the category routes over an in-memory store.
#[cfg(test)]
pub fn category_server(store: InMemoryCategoryStore) -> TestServer {
    let service = Arc::new(CategoryService::new(Arc::new(store)));
    TestServer::new(routes::routes(service)).unwrap()
}
