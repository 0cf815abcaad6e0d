/*
 * Responsibility
 * - /posts handler set: multipart create, partial update, paged list,
 *   title search, delete
 * - each handler: extract + validate input → one repo call → envelope
 * - every failure funnels through error::fail with this operation's envelope
 */
use axum::{
    Json,
    extract::{Multipart, Query, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    api::v1::dto::posts::{
        CreatePostFailure, CreatePostForm, CreatePostSuccess, DeletePostRequest,
        DeletePostSuccess, ImagePart, ListPostsFailure, ListPostsQuery, ListPostsSuccess,
        ResultFailure, SearchPostsFailure, SearchPostsQuery, SearchPostsSuccess,
        UpdatePostRequest, UpdatePostSuccess,
    },
    error::fail,
    repos::post_repo::{NewPost, PostChanges},
    state::AppState,
};

pub async fn create_post(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let form = match read_create_form(&mut multipart).await {
        Ok(form) => form,
        Err(err) => return fail("create_post", &err, CreatePostFailure::new(&err)),
    };

    if let Err(err) = form.validate() {
        return fail("create_post", &err, CreatePostFailure::new(&err));
    }

    // Store the upload first; its path is what the record carries.
    let image = match form.image {
        Some(part) => match state.uploads.store(&part.filename, &part.data).await {
            Ok(path) => Some(path),
            Err(err) => return fail("create_post", &err, CreatePostFailure::new(&err)),
        },
        None => None,
    };

    let input = NewPost {
        title: form.title.unwrap_or_default(),
        content: form.content.unwrap_or_default(),
        author_id: form.user_id.unwrap_or_default(),
        image,
    };

    match state.posts.create(input).await {
        Ok(post) => (StatusCode::OK, Json(CreatePostSuccess::new(post))).into_response(),
        Err(err) => fail("create_post", &err, CreatePostFailure::new(&err)),
    }
}

pub async fn update_post(
    State(state): State<AppState>,
    Json(req): Json<UpdatePostRequest>,
) -> Response {
    if let Err(err) = req.validate() {
        return fail("update_post", &err, ResultFailure::new(&err));
    }

    let post_id = req.post_id.clone().unwrap_or_default();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        image: req.image,
    };

    match state.posts.update(&post_id, changes).await {
        Ok(post) => (StatusCode::OK, Json(UpdatePostSuccess::new(post))).into_response(),
        Err(err) => fail("update_post", &err, ResultFailure::new(&err)),
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Response {
    let (page, per_page) = match query.window() {
        Ok(window) => window,
        Err(err) => return fail("list_posts", &err, ListPostsFailure::new(&err)),
    };

    match state.posts.list(page, per_page).await {
        Ok(posts) => (StatusCode::OK, Json(ListPostsSuccess::new(posts))).into_response(),
        Err(err) => fail("list_posts", &err, ListPostsFailure::new(&err)),
    }
}

pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchPostsQuery>,
) -> Response {
    let (keyword, limit) = match query.params() {
        Ok(params) => params,
        Err(err) => return fail("search_posts", &err, SearchPostsFailure::new(&err)),
    };

    match state.posts.search(keyword, limit).await {
        Ok(hits) => (StatusCode::OK, Json(SearchPostsSuccess::new(hits))).into_response(),
        Err(err) => fail("search_posts", &err, SearchPostsFailure::new(&err)),
    }
}

pub async fn delete_post(
    State(state): State<AppState>,
    Json(req): Json<DeletePostRequest>,
) -> Response {
    if let Err(err) = req.validate() {
        return fail("delete_post", &err, ResultFailure::new(&err));
    }

    let post_id = req.post_id.unwrap_or_default();

    match state.posts.delete(&post_id).await {
        // A well-formed id that matched nothing still answers success, with
        // a null result; only query failures take the error path.
        Ok(post) => {
            (StatusCode::OK, Json(DeletePostSuccess::new(post, &post_id))).into_response()
        }
        Err(err) => fail("delete_post", &err, ResultFailure::new(&err)),
    }
}

async fn read_create_form(multipart: &mut Multipart) -> Result<CreatePostForm, MultipartError> {
    let mut form = CreatePostForm::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("title") => form.title = Some(field.text().await?),
            Some("content") => form.content = Some(field.text().await?),
            Some("user_id") => form.user_id = Some(field.text().await?),
            Some("image") => {
                let filename = field
                    .file_name()
                    .map(|v| v.to_string())
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| "upload.bin".to_string());
                let data = field.bytes().await?.to_vec();
                form.image = Some(ImagePart { filename, data });
            }
            // unknown parts are skipped, not an error
            _ => continue,
        }
    }

    Ok(form)
}
