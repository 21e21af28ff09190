//! Pagination and search parameters shared by every entity.

use ideaverse_core::domain::User;
use ideaverse_core::vocab::SortOrder;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::registry::{SearchSchema, derived_schema};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

pub(crate) fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

pub(crate) fn default_page() -> u64 {
    1
}

pub(crate) fn default_sort_by() -> String {
    "created_at".to_string()
}

fn default_sort_by_opt() -> Option<String> {
    Some(default_sort_by())
}

fn default_sort_order_opt() -> Option<SortOrder> {
    Some(SortOrder::Desc)
}

/// Normalized pagination: every params shape reduces to this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u32,
    pub skip: u64,
}

impl PageWindow {
    /// Window for a 1-based page number.
    pub fn from_page(page: u64, limit: u32) -> Self {
        Self {
            limit,
            skip: page.saturating_sub(1).saturating_mul(u64::from(limit)),
        }
    }

    /// 1-based page the window starts on.
    pub fn page(&self) -> u64 {
        if self.limit == 0 {
            return 1;
        }
        self.skip / u64::from(self.limit) + 1
    }
}

/// Denormalized author fields joined into `*WithUser` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub username: String,
    pub profile_picture: Option<String>,
}

impl From<&User> for AuthorInfo {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}

/// Page-based pagination parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page: u64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: u32,
    pub sort_by: Option<String>,
    #[serde(default = "default_sort_order_opt")]
    pub sort_order: Option<SortOrder>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: DEFAULT_LIMIT,
            sort_by: None,
            sort_order: default_sort_order_opt(),
        }
    }
}

/// Free-text search with tag filter and page-based pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SearchParams {
    pub query: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default = "default_sort_by_opt")]
    pub sort_by: Option<String>,
    #[serde(default = "default_sort_order_opt")]
    pub sort_order: Option<SortOrder>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: u32,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page: u64,
}

derived_schema! {
    PaginationParams => "common.pagination",
    SearchParams => "common.search",
}

impl SearchSchema for PaginationParams {
    fn window(&self) -> PageWindow {
        PageWindow::from_page(self.page, self.limit)
    }
}

impl SearchSchema for SearchParams {
    fn window(&self) -> PageWindow {
        PageWindow::from_page(self.page, self.limit)
    }
}

/// Declares an entity search-params struct: the given filters plus the
/// `sort_by` / `sort_order` / `limit` / `skip` block every entity shares.
///
/// Entities keep `skip` on the wire; [`PageWindow`] is the normalized view.
macro_rules! entity_search_params {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, validator::Validate)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )*
            #[serde(default = "crate::dto::common::default_sort_by")]
            pub sort_by: String,
            #[serde(default)]
            pub sort_order: ideaverse_core::vocab::SortOrder,
            #[serde(default = "crate::dto::common::default_limit")]
            #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
            pub limit: u32,
            #[serde(default)]
            pub skip: u64,
        }

        impl crate::registry::SearchSchema for $name {
            fn window(&self) -> crate::dto::common::PageWindow {
                crate::dto::common::PageWindow {
                    limit: self.limit,
                    skip: self.skip,
                }
            }
        }
    };
}

pub(crate) use entity_search_params;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::validate_search_params;
    use serde_json::json;

    #[test]
    fn pagination_defaults() {
        let params: PaginationParams = validate_search_params(json!({})).unwrap();
        assert_eq!(params, PaginationParams::default());
        assert_eq!(params.window(), PageWindow { limit: 10, skip: 0 });
    }

    #[test]
    fn pagination_bounds_are_enforced() {
        let err = validate_search_params::<PaginationParams>(json!({"limit": 101, "page": 0}))
            .unwrap_err();
        let fields: Vec<_> = err.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["limit", "page"]);

        assert!(validate_search_params::<PaginationParams>(json!({"limit": 0})).is_err());
        assert!(validate_search_params::<PaginationParams>(json!({"limit": 100})).is_ok());
    }

    #[test]
    fn search_params_default_sort() {
        let params: SearchParams =
            validate_search_params(json!({"query": "graph", "page": 3, "limit": 20})).unwrap();
        assert_eq!(params.sort_by.as_deref(), Some("created_at"));
        assert_eq!(params.sort_order, Some(SortOrder::Desc));
        assert_eq!(params.window(), PageWindow { limit: 20, skip: 40 });
    }

    #[test]
    fn invalid_sort_order_is_rejected() {
        assert!(validate_search_params::<SearchParams>(json!({"sort_order": "sideways"})).is_err());
    }

    #[test]
    fn window_page_round_trip() {
        let window = PageWindow::from_page(4, 25);
        assert_eq!(window.skip, 75);
        assert_eq!(window.page(), 4);
    }
}
