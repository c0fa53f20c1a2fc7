//! Shared plumbing for the resource handlers.

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use catalog_service::{ListQuery, MediaStore, Repository, SortKey};
use common::{
    ApiResponse, AppResult, Created, ListResponse, OptionExt, PaginationParams, Window,
};
use domain::{Draft, Patch, Resource};

use crate::extractors::JsonOrMultipart;

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive substring matched against the resource's text fields
    pub search: Option<String>,
    /// Exact status value
    pub status: Option<String>,
    pub is_available: Option<bool>,
    /// name_asc, name_desc, price_asc, price_desc, createdAt_asc or createdAt_desc
    pub sort: Option<String>,
    /// Page size (default 10, max 100)
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// 1-based page, used when no offset is given
    pub page: Option<u64>,
}

impl ListParams {
    pub fn window(&self) -> Window {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
            page: self.page,
        }
        .window()
    }

    pub fn to_query(&self) -> ListQuery {
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        ListQuery::new()
            .search(self.search.as_deref())
            .filter_opt("status", status)
            .filter_opt("isAvailable", self.is_available)
            .sort(SortKey::parse(self.sort.as_deref()))
            .window(self.window())
    }
}

pub async fn list<T: Resource>(repo: &Repository<T>, query: ListQuery) -> AppResult<ListResponse<T>> {
    let page = repo.list(&query).await?;
    let meta = page.meta();
    Ok(ListResponse::new(page.items, meta))
}

pub async fn get<T: Resource>(repo: &Repository<T>, id: Uuid) -> AppResult<ApiResponse<T>> {
    Ok(ApiResponse::success(repo.get(id).await?))
}

/// Look a resource up by its slug.
pub async fn by_slug<T: Resource>(repo: &Repository<T>, slug: &str) -> AppResult<ApiResponse<T>> {
    let resource = repo
        .find_one("slug", slug.trim().to_lowercase())
        .await?
        .ok_or_not_found(T::LABEL)?;
    Ok(ApiResponse::success(resource))
}

pub async fn create<D: Draft>(
    repo: &Repository<D::Target>,
    media: &dyn MediaStore,
    body: JsonOrMultipart<D>,
) -> AppResult<Created<D::Target>> {
    let resource = body.commit(media, |draft| repo.create(draft)).await?;
    Ok(Created(resource))
}

pub async fn update<P: Patch>(
    repo: &Repository<P::Target>,
    media: &dyn MediaStore,
    id: Uuid,
    body: JsonOrMultipart<P>,
) -> AppResult<ApiResponse<P::Target>> {
    let resource = body.commit(media, |patch| repo.update(id, patch)).await?;
    Ok(ApiResponse::success(resource))
}

pub async fn delete<T: Resource>(repo: &Repository<T>, id: Uuid) -> AppResult<ApiResponse<T>> {
    let resource = repo.delete(id).await?;
    Ok(ApiResponse::with_message(
        resource,
        format!("{} deleted successfully", T::LABEL),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_status_is_ignored() {
        let params = ListParams {
            status: Some("  ".into()),
            is_available: Some(true),
            ..Default::default()
        };
        let query = params.to_query();
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[0].field, "isAvailable");
    }

    #[test]
    fn test_page_param_sets_window() {
        let params = ListParams {
            limit: Some(3),
            page: Some(2),
            sort: Some("price_desc".into()),
            ..Default::default()
        };
        let query = params.to_query();
        assert_eq!(query.window, Window::new(3, 3));
        assert_eq!(query.sort, SortKey::PriceDesc);
    }
}
