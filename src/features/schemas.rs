use serde::Serialize;

/// Common envelope for paginated list responses. `total` always counts the
/// distinct matched rows, not the page size.
#[derive(Serialize, Debug)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
}
