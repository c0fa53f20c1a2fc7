//! Blog post handlers.

use axum::{
    extract::State,
    routing::get,
    Router,
};
use uuid::Uuid;

use common::{ApiResponse, AppError, AppResult, Created, ListResponse, OptionExt};
use domain::{BlogPost, BlogPostChanges, NewBlogPost, PostStatus, Resource, Role};

use super::crud::{self, ListParams};
use crate::extractors::{Admin, Authorized, JsonOrMultipart, Path, Query, RequestContext, Staff};
use crate::state::AppState;

pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog_post))
        .route("/slug/:slug", get(get_blog_post_by_slug))
        .route("/:id", get(get_blog_post).put(update_blog_post).delete(delete_blog_post))
}

/// Drafts are visible to staff only.
fn sees_drafts(context: &RequestContext) -> bool {
    context
        .principal()
        .is_some_and(|principal| principal.has_any_role(Role::STAFF))
}

fn visible(context: &RequestContext, post: BlogPost) -> AppResult<ApiResponse<BlogPost>> {
    if post.status != PostStatus::Published && !sees_drafts(context) {
        return Err(AppError::NotFound(BlogPost::LABEL.to_string()));
    }
    Ok(ApiResponse::success(post))
}

/// List blog posts; anonymous and non-staff callers only see published ones
#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "Blogs",
    params(ListParams),
    responses((status = 200, description = "Page of blog posts", body = [BlogPost]))
)]
pub async fn list_blogs(
    context: RequestContext,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ListResponse<BlogPost>> {
    let mut query = params.to_query();
    if !sees_drafts(&context) {
        query = query.filter("status", PostStatus::Published.as_str());
    }
    crud::list(&state.catalog.blogs, query).await
}

/// Get a blog post
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    tag = "Blogs",
    params(("id" = Uuid, Path, description = "Blog post ID")),
    responses(
        (status = 200, description = "Blog post", body = BlogPost),
        (status = 404, description = "Blog post not found")
    )
)]
pub async fn get_blog_post(
    context: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<BlogPost>> {
    visible(&context, state.catalog.blogs.get(id).await?)
}

/// Get a blog post by slug
#[utoipa::path(
    get,
    path = "/api/blogs/slug/{slug}",
    tag = "Blogs",
    params(("slug" = String, Path, description = "URL slug")),
    responses(
        (status = 200, description = "Blog post", body = BlogPost),
        (status = 404, description = "Blog post not found")
    )
)]
pub async fn get_blog_post_by_slug(
    context: RequestContext,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<BlogPost>> {
    let post = state
        .catalog
        .blogs
        .find_one("slug", slug.trim().to_lowercase())
        .await?
        .ok_or_not_found(BlogPost::LABEL)?;
    visible(&context, post)
}

/// Create a blog post
#[utoipa::path(
    post,
    path = "/api/blogs",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    request_body = NewBlogPost,
    responses(
        (status = 201, description = "Blog post created", body = BlogPost),
        (status = 400, description = "Missing field or name already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_blog_post(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    body: JsonOrMultipart<NewBlogPost>,
) -> AppResult<Created<BlogPost>> {
    crud::create(&state.catalog.blogs, state.catalog.media.as_ref(), body).await
}

/// Update a blog post
#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Blog post ID")),
    request_body = BlogPostChanges,
    responses(
        (status = 200, description = "Blog post updated", body = BlogPost),
        (status = 404, description = "Blog post not found")
    )
)]
pub async fn update_blog_post(
    _auth: Authorized<Staff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: JsonOrMultipart<BlogPostChanges>,
) -> AppResult<ApiResponse<BlogPost>> {
    crud::update(&state.catalog.blogs, state.catalog.media.as_ref(), id, body).await
}

/// Delete a blog post
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Blog post ID")),
    responses(
        (status = 200, description = "Blog post deleted", body = BlogPost),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Blog post not found")
    )
)]
pub async fn delete_blog_post(
    _auth: Authorized<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<BlogPost>> {
    crud::delete(&state.catalog.blogs, id).await
}
