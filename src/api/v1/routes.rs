/*
 * Responsibility
 * - v1 URL structure
 * - update and delete address the record in the request body, so they hang
 *   off the collection route rather than a /{id} path
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    posts::{create_post, delete_post, list_posts, search_posts, update_post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/posts",
            get(list_posts)
                .post(create_post)
                .put(update_post)
                .delete(delete_post),
        )
        .route("/posts/search", get(search_posts))
}
