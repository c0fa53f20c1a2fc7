//! Blog posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::lenient;
use crate::resource::{collect_media, Draft, Patch, Resource, UniqueKey};
use crate::slug::slug_or_derive;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: PostStatus,
    /// Set the first time the post is published; never cleared.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    fn stamp_publication(&mut self, now: DateTime<Utc>) {
        if self.status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
    }
}

impl Resource for BlogPost {
    const COLLECTION: &'static str = "blogs";
    const LABEL: &'static str = "Blog post";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "excerpt", "content"];
    const NAME_FIELD: Option<&'static str> = Some("title");

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.stamp_publication(now);
    }

    fn unique_key(&self) -> Option<UniqueKey> {
        Some(UniqueKey::new("slug", &self.slug))
    }

    fn media(&self) -> Vec<String> {
        collect_media([self.cover_image.as_ref()])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tags: Vec<String>,
    pub status: Option<PostStatus>,
}

impl Draft for NewBlogPost {
    type Target = BlogPost;

    fn into_resource(self, id: Uuid, now: DateTime<Utc>) -> BlogPost {
        let slug = slug_or_derive(self.slug.as_deref(), &self.title);
        let mut post = BlogPost {
            id,
            title: self.title,
            slug,
            excerpt: self.excerpt,
            content: self.content,
            cover_image: self.cover_image,
            author: self.author,
            tags: self.tags,
            status: self.status.unwrap_or_default(),
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        post.stamp_publication(now);
        post
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BlogPostChanges {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_strings")]
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
}

impl Patch for BlogPostChanges {
    type Target = BlogPost;

    fn apply(self, post: &mut BlogPost) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(slug) = self.slug {
            post.slug = slug_or_derive(Some(&slug), &post.title);
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(cover_image) = self.cover_image {
            post.cover_image = Some(cover_image);
        }
        if let Some(author) = self.author {
            post.author = Some(author);
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(status) = self.status {
            post.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_at_set_on_first_publish_only() {
        let created = Utc::now();
        let mut post = NewBlogPost {
            title: "Hello".into(),
            content: "World".into(),
            ..Default::default()
        }
        .into_resource(Uuid::new_v4(), created);
        assert_eq!(post.published_at, None);

        BlogPostChanges {
            status: Some(PostStatus::Published),
            ..Default::default()
        }
        .apply(&mut post);
        let first = created + chrono::Duration::seconds(5);
        post.touch(first);
        assert_eq!(post.published_at, Some(first));

        post.status = PostStatus::Draft;
        post.touch(first + chrono::Duration::seconds(5));
        post.status = PostStatus::Published;
        post.touch(first + chrono::Duration::seconds(10));
        assert_eq!(post.published_at, Some(first));
    }
}
