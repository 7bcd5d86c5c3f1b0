use serde::Serialize;

use crate::query::QueryParams;

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Raw `?page=&pageSize=` query values, kept as strings so that garbage
/// falls back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageParams {
    pub fn from_query(mut query: QueryParams) -> Self {
        Self {
            page: query.take("page"),
            page_size: query.take("pageSize"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn from_params(params: &PageParams, config: &PaginationConfig) -> Self {
        Self::new(params.page.as_deref(), params.page_size.as_deref(), config)
    }

    pub fn new(page: Option<&str>, page_size: Option<&str>, config: &PaginationConfig) -> Self {
        let page = to_int(page, 1).max(1);

        let requested = to_int(page_size, config.default_page_size);
        let page_size = if requested < 1 {
            config.default_page_size
        } else {
            requested
        };

        Self {
            page,
            page_size: page_size.min(config.max_page_size).max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            data,
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: total_pages(total, request.page_size),
        }
    }
}

/// `ceil(total / page_size)`, never below 1.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    let page_size = page_size.max(1);
    let total = total.max(0);
    (total / page_size + i64::from(total % page_size != 0)).max(1)
}

fn to_int(raw: Option<&str>, fallback: i64) -> i64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(|n| n.floor() as i64)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: Option<&str>, page_size: Option<&str>) -> PageRequest {
        PageRequest::new(page, page_size, &PaginationConfig::default())
    }

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(
            request(None, None),
            PageRequest {
                page: 1,
                page_size: 6
            }
        );
    }

    #[test]
    fn garbage_values_use_defaults() {
        assert_eq!(request(Some("abc"), Some("NaN")), request(None, None));
        assert_eq!(request(Some("inf"), Some("")), request(None, None));
    }

    #[test]
    fn page_below_one_is_clamped() {
        assert_eq!(request(Some("0"), None).page, 1);
        assert_eq!(request(Some("-4"), None).page, 1);
    }

    #[test]
    fn page_has_no_upper_bound() {
        assert_eq!(request(Some("500"), None).page, 500);
    }

    #[test]
    fn fractional_values_are_floored() {
        let req = request(Some(" 2.9 "), Some("4.5"));
        assert_eq!(req.page, 2);
        assert_eq!(req.page_size, 4);
    }

    #[test]
    fn page_size_is_clamped_to_maximum() {
        assert_eq!(request(None, Some("50")).page_size, 9);
    }

    #[test]
    fn page_size_below_one_falls_back_to_default() {
        assert_eq!(request(None, Some("0")).page_size, 6);
        assert_eq!(request(None, Some("-3")).page_size, 6);
    }

    #[test]
    fn custom_config_is_respected() {
        let config = PaginationConfig {
            default_page_size: 3,
            max_page_size: 4,
        };
        assert_eq!(PageRequest::new(None, None, &config).page_size, 3);
        assert_eq!(PageRequest::new(None, Some("10"), &config).page_size, 4);
    }

    #[test]
    fn offset_follows_page() {
        let req = request(Some("3"), Some("5"));
        assert_eq!(req.offset(), 10);
        assert_eq!(request(None, None).offset(), 0);
    }

    #[test]
    fn total_pages_is_never_zero() {
        assert_eq!(total_pages(0, 6), 1);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(18, 9), 2);
        assert_eq!(total_pages(19, 9), 3);
    }

    #[test]
    fn page_serializes_camel_case() {
        let page = Page::new(vec![1, 2], request(Some("2"), Some("2")), 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageSize"], 2);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
