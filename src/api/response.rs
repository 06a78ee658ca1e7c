use axum::Json;
use serde::Serialize;

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64)
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// Uniform success envelope. Failures go through `AppError::into_response`,
/// which emits the matching `{success: false, error, [details]}` shape.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            pagination: None,
        })
    }

    pub fn paginated(data: T, pagination: Pagination) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            pagination: Some(pagination),
        })
    }
}
