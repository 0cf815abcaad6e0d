/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 * - held by Clone (repo handle behind Arc, storage is cheap to clone)
 */
use std::sync::Arc;

use crate::repos::post_repo::PostsRepo;
use crate::services::uploads::UploadStorage;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostsRepo>,
    pub uploads: UploadStorage,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostsRepo>, uploads: UploadStorage) -> Self {
        Self { posts, uploads }
    }
}
