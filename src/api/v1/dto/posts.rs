/*
 * Responsibility
 * - Posts request DTOs: one explicit input schema per operation, with validate()
 * - per-operation response envelopes; the shapes clients already rely on are
 *   kept verbatim (`data` vs `result`, error array vs message string)
 */
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{Empty, error_message};
use crate::repos::post_repo::{PostRecord, PostView, SearchHit};

// ---- inputs ----

/// Collected multipart fields for a create request. The image part is raw
/// bytes here; storage happens after validation.
#[derive(Debug, Default)]
pub struct CreatePostForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub user_id: Option<String>,
    pub image: Option<ImagePart>,
}

#[derive(Debug)]
pub struct ImagePart {
    pub filename: String,
    pub data: Vec<u8>,
}

impl CreatePostForm {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err("title is required");
        }
        if self.content.as_deref().is_none_or(|c| c.trim().is_empty()) {
            return Err("content is required");
        }
        if self.user_id.as_deref().is_none_or(|u| u.trim().is_empty()) {
            return Err("user_id is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub post_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.post_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            return Err("post_id is required");
        }
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        if let Some(content) = &self.content
            && content.trim().is_empty()
        {
            return Err("content cannot be empty");
        }
        Ok(())
    }
}

/// Delete addresses the record as `postId`, unlike update's `post_id`.
/// Existing clients send both spellings; they stay as-is.
#[derive(Debug, Deserialize)]
pub struct DeletePostRequest {
    #[serde(rename = "postId")]
    pub post_id: Option<String>,
}

impl DeletePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.post_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            return Err("postId is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
}

impl ListPostsQuery {
    /// Both values arrive as numeric strings. Absent or non-positive input
    /// is rejected up front instead of coercing to a do-nothing query.
    pub fn window(&self) -> Result<(u64, u64), &'static str> {
        let page = parse_positive(self.page.as_deref(), "page must be a positive integer")?;
        let per_page = parse_positive(
            self.per_page.as_deref(),
            "perPage must be a positive integer",
        )?;
        Ok((page, per_page))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchPostsQuery {
    pub keyword: Option<String>,
    pub perpage: Option<String>,
}

impl SearchPostsQuery {
    pub fn params(&self) -> Result<(&str, u64), &'static str> {
        let keyword = self
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or("keyword is required")?;
        let limit = parse_positive(
            self.perpage.as_deref(),
            "perpage must be a positive integer",
        )?;
        Ok((keyword, limit))
    }
}

fn parse_positive(value: Option<&str>, err: &'static str) -> Result<u64, &'static str> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|n| *n >= 1)
        .ok_or(err)
}

// ---- envelopes ----

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatePostSuccess {
    pub success: bool,
    pub data: PostRecord,
    pub error: Vec<ErrorMessage>,
}

impl CreatePostSuccess {
    pub fn new(post: PostRecord) -> Self {
        Self {
            success: true,
            data: post,
            error: Vec::new(),
        }
    }
}

/// Create failures carry an empty `post` slot and an error array; the other
/// operations carry `result` and a message string instead.
#[derive(Debug, Serialize)]
pub struct CreatePostFailure {
    pub success: bool,
    pub post: Empty,
    pub error: Vec<ErrorMessage>,
}

impl CreatePostFailure {
    pub fn new(err: &dyn Display) -> Self {
        Self {
            success: false,
            post: Empty {},
            error: vec![ErrorMessage {
                message: error_message(err),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatePostSuccess {
    pub success: bool,
    pub result: PostRecord,
    pub message: String,
}

impl UpdatePostSuccess {
    pub fn new(post: PostRecord) -> Self {
        Self {
            success: true,
            result: post,
            message: "Update post successfully!".to_string(),
        }
    }
}

/// Shared by update and delete failures: `{success, result: {}, message}`.
#[derive(Debug, Serialize)]
pub struct ResultFailure {
    pub success: bool,
    pub result: Empty,
    pub message: String,
}

impl ResultFailure {
    pub fn new(err: &dyn Display) -> Self {
        Self {
            success: false,
            result: Empty {},
            message: error_message(err),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListPostsSuccess {
    pub success: bool,
    pub data: Vec<PostView>,
    pub total: usize,
    pub message: String,
}

impl ListPostsSuccess {
    pub fn new(data: Vec<PostView>) -> Self {
        Self {
            success: true,
            // counts this page's records, not the whole collection
            total: data.len(),
            data,
            message: "Logs all posts successfully!".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListPostsFailure {
    pub success: bool,
    pub data: Vec<PostView>,
    pub message: String,
}

impl ListPostsFailure {
    pub fn new(err: &dyn Display) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            message: error_message(err),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchPostsSuccess {
    pub success: bool,
    pub result: Vec<SearchHit>,
    pub total: usize,
    pub message: String,
}

impl SearchPostsSuccess {
    pub fn new(result: Vec<SearchHit>) -> Self {
        let message = if result.is_empty() {
            "No results".to_string()
        } else {
            "Search ok!".to_string()
        };
        Self {
            success: true,
            total: result.len(),
            result,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchPostsFailure {
    pub success: bool,
    pub result: Vec<SearchHit>,
    pub message: String,
}

impl SearchPostsFailure {
    pub fn new(err: &dyn Display) -> Self {
        Self {
            success: false,
            result: Vec::new(),
            message: error_message(err),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletePostSuccess {
    pub success: bool,
    /// `None` when a well-formed id matched nothing; still a success.
    pub result: Option<PostRecord>,
    pub message: String,
}

impl DeletePostSuccess {
    pub fn new(post: Option<PostRecord>, post_id: &str) -> Self {
        Self {
            success: true,
            result: post,
            message: format!("Delete post successfully {post_id}"),
        }
    }
}
