/*
 * Responsibility
 * - posts collection access (create / partial update / paged list / title search / delete)
 * - owns the stored document shape and the read-side projections
 * - author and comment references resolve against "users" / "comments" at read time
 */
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, Document, doc, oid::ObjectId},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};

use crate::repos::error::RepoError;

/// Stored shape of a post. Doubles as the payload returned to clients, so
/// the serde renames define both the collection fields and the JSON keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub image: Option<String>,
    pub content: String,
    pub author: ObjectId,
    pub comments: Vec<CommentRef>,
    #[serde(
        rename = "createdAt",
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRef {
    pub user: ObjectId,
    pub comment: ObjectId,
}

/// Creation input. `author_id` stays a string until the insert; a malformed
/// value surfaces as a persistence failure, not an input-parsing one.
#[derive(Debug)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub image: Option<String>,
}

/// Fields an update may overwrite. Absent fields are left untouched.
#[derive(Debug, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.image.is_none()
    }

    fn into_set_document(self) -> Document {
        let mut set = Document::new();
        if let Some(title) = self.title {
            set.insert("title", title);
        }
        if let Some(content) = self.content {
            set.insert("content", content);
        }
        if let Some(image) = self.image {
            set.insert("image", image);
        }
        set
    }
}

/// A post as the list endpoint returns it: author and comments swapped out
/// for their projected sub-documents.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub image: Option<String>,
    pub content: String,
    pub author: Option<AuthorView>,
    pub comments: Vec<ResolvedComment>,
    #[serde(
        rename = "createdAt",
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorView {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedComment {
    pub user: Option<CommentUserView>,
    pub comment: Option<CommentBodyView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentUserView {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentBodyView {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<bson::DateTime>,
}

/// Title-search projection (`_id` rides along, as projections do).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn create(&self, input: NewPost) -> Result<PostRecord, RepoError>;

    /// Overwrites only the named fields; yields the post-update record.
    /// A `post_id` matching nothing is `RepoError::NotFound`.
    async fn update(&self, post_id: &str, changes: PostChanges) -> Result<PostRecord, RepoError>;

    /// Newest first, windowed to `per_page` records starting at
    /// `(page - 1) * per_page`. Both arguments are >= 1.
    async fn list(&self, page: u64, per_page: u64) -> Result<Vec<PostView>, RepoError>;

    /// Case-insensitive pattern match against `title`, capped at `limit`.
    async fn search(&self, keyword: &str, limit: u64) -> Result<Vec<SearchHit>, RepoError>;

    /// Removes the matching record, yielding its prior state. `Ok(None)`
    /// means a well-formed id matched nothing (nothing was deleted).
    async fn delete(&self, post_id: &str) -> Result<Option<PostRecord>, RepoError>;
}

pub struct MongoPostsRepo {
    posts: Collection<PostRecord>,
}

impl MongoPostsRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            posts: db.collection::<PostRecord>("posts"),
        }
    }
}

#[async_trait]
impl PostsRepo for MongoPostsRepo {
    async fn create(&self, input: NewPost) -> Result<PostRecord, RepoError> {
        let author = ObjectId::parse_str(&input.author_id)?;

        let record = PostRecord {
            id: ObjectId::new(),
            title: input.title,
            image: input.image,
            content: input.content,
            author,
            comments: Vec::new(),
            created_at: Utc::now(),
        };

        self.posts.insert_one(&record).await?;
        Ok(record)
    }

    async fn update(&self, post_id: &str, changes: PostChanges) -> Result<PostRecord, RepoError> {
        let id = ObjectId::parse_str(post_id)?;

        // `$set: {}` is rejected by the server; an update naming no fields
        // degenerates to a lookup of the current record.
        if changes.is_empty() {
            return self
                .posts
                .find_one(doc! { "_id": id })
                .await?
                .ok_or(RepoError::NotFound);
        }

        self.posts
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": changes.into_set_document() })
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(RepoError::NotFound)
    }

    async fn list(&self, page: u64, per_page: u64) -> Result<Vec<PostView>, RepoError> {
        let skip = (page - 1) * per_page;

        // $lookup with localField + sub-pipeline projections needs server 5.0+.
        let pipeline = [
            doc! { "$sort": { "createdAt": -1 } },
            doc! { "$skip": skip as i64 },
            doc! { "$limit": per_page as i64 },
            doc! { "$lookup": {
                "from": "users",
                "localField": "author",
                "foreignField": "_id",
                "pipeline": [ { "$project": { "username": 1, "email": 1 } } ],
                "as": "author",
            }},
            doc! { "$unwind": { "path": "$author", "preserveNullAndEmptyArrays": true } },
            doc! { "$lookup": {
                "from": "users",
                "localField": "comments.user",
                "foreignField": "_id",
                "pipeline": [ { "$project": { "_id": 1, "username": 1 } } ],
                "as": "comment_users",
            }},
            doc! { "$lookup": {
                "from": "comments",
                "localField": "comments.comment",
                "foreignField": "_id",
                "pipeline": [
                    { "$project": { "_id": 1, "content": 1, "createdAt": 1 } },
                    { "$limit": 10 },
                ],
                "as": "comment_bodies",
            }},
        ];

        let mut cursor = self.posts.aggregate(pipeline).await?;

        let mut views = Vec::new();
        while let Some(row) = cursor.try_next().await? {
            let row: ListRow = bson::from_document(row)?;
            views.push(row.resolve());
        }
        Ok(views)
    }

    async fn search(&self, keyword: &str, limit: u64) -> Result<Vec<SearchHit>, RepoError> {
        // The keyword is a pattern, not a literal; metacharacters are live.
        let filter = doc! { "title": { "$regex": keyword, "$options": "i" } };

        let mut cursor = self
            .posts
            .clone_with_type::<SearchHit>()
            .find(filter)
            .projection(doc! { "title": 1, "content": 1, "image": 1 })
            .limit(limit as i64)
            .await?;

        let mut hits = Vec::new();
        while let Some(hit) = cursor.try_next().await? {
            hits.push(hit);
        }
        Ok(hits)
    }

    async fn delete(&self, post_id: &str) -> Result<Option<PostRecord>, RepoError> {
        let id = ObjectId::parse_str(post_id)?;
        Ok(self.posts.find_one_and_delete(doc! { "_id": id }).await?)
    }
}

/// Raw aggregation row: the two reference lookups land in flat side arrays
/// and are zipped back onto `comments` in order.
#[derive(Debug, Deserialize)]
struct ListRow {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    #[serde(default)]
    image: Option<String>,
    content: String,
    #[serde(default)]
    comments: Vec<CommentRef>,
    #[serde(default)]
    author: Option<AuthorView>,
    #[serde(default)]
    comment_users: Vec<CommentUserView>,
    #[serde(default)]
    comment_bodies: Vec<CommentBodyView>,
    #[serde(
        rename = "createdAt",
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    created_at: DateTime<Utc>,
}

impl ListRow {
    fn resolve(self) -> PostView {
        let users: HashMap<ObjectId, CommentUserView> =
            self.comment_users.into_iter().map(|u| (u.id, u)).collect();
        let bodies: HashMap<ObjectId, CommentBodyView> =
            self.comment_bodies.into_iter().map(|b| (b.id, b)).collect();

        let comments = self
            .comments
            .into_iter()
            .map(|c| ResolvedComment {
                user: users.get(&c.user).cloned(),
                comment: bodies.get(&c.comment).cloned(),
            })
            .collect();

        PostView {
            id: self.id,
            title: self.title,
            image: self.image,
            content: self.content,
            author: self.author,
            comments,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_document_only_names_present_fields() {
        let set = PostChanges {
            title: Some("new".into()),
            content: None,
            image: None,
        }
        .into_set_document();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get_str("title").unwrap(), "new");
    }

    #[test]
    fn empty_changes_are_detected() {
        assert!(PostChanges::default().is_empty());
        assert!(
            !PostChanges {
                image: Some("a.png".into()),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn resolve_zips_lookups_onto_comment_refs() {
        let user_id = ObjectId::new();
        let comment_id = ObjectId::new();
        let orphan_user = ObjectId::new();

        let row = ListRow {
            id: ObjectId::new(),
            title: "t".into(),
            image: None,
            content: "c".into(),
            comments: vec![
                CommentRef {
                    user: user_id,
                    comment: comment_id,
                },
                // Dangling refs resolve to nothing rather than dropping the entry.
                CommentRef {
                    user: orphan_user,
                    comment: ObjectId::new(),
                },
            ],
            author: None,
            comment_users: vec![CommentUserView {
                id: user_id,
                username: Some("ann".into()),
            }],
            comment_bodies: vec![CommentBodyView {
                id: comment_id,
                content: Some("hi".into()),
                created_at: None,
            }],
            created_at: Utc::now(),
        };

        let view = row.resolve();
        assert_eq!(view.comments.len(), 2);
        assert_eq!(
            view.comments[0].user.as_ref().unwrap().username.as_deref(),
            Some("ann")
        );
        assert_eq!(
            view.comments[0].comment.as_ref().unwrap().content.as_deref(),
            Some("hi")
        );
        assert!(view.comments[1].user.is_none());
        assert!(view.comments[1].comment.is_none());
    }
}
