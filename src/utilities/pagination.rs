//! Lenient limit/offset/sort parsing shared by the list endpoints. Invalid
//! values silently fall back to defaults; public lists should never 4xx on
//! a sloppy query string. The search endpoint keeps its own schema with a
//! different default limit.

use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct RawPagination {
    pub limit: Option<String>,
    pub offset: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(alias = "sortDir")]
    pub sort_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    pub sort_by: Option<String>,
    pub sort_dir: SortDir,
}

impl Pagination {
    pub fn parse(raw: &RawPagination) -> Self {
        let limit = raw
            .limit
            .as_deref()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|limit| (1..=MAX_LIMIT).contains(limit))
            .unwrap_or(DEFAULT_LIMIT);

        let offset = raw
            .offset
            .as_deref()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|offset| *offset >= 0)
            .unwrap_or(0);

        let sort_dir = match raw.sort_dir.as_deref() {
            Some("desc") => SortDir::Desc,
            _ => SortDir::Asc,
        };

        Self {
            limit,
            offset,
            sort_by: raw.sort_by.clone(),
            sort_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        limit: Option<&str>,
        offset: Option<&str>,
        sort_by: Option<&str>,
        sort_dir: Option<&str>,
    ) -> RawPagination {
        RawPagination {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
            sort_by: sort_by.map(str::to_string),
            sort_dir: sort_dir.map(str::to_string),
        }
    }

    #[test]
    fn defaults_when_absent() {
        let parsed = Pagination::parse(&RawPagination::default());
        assert_eq!(parsed.limit, 50);
        assert_eq!(parsed.offset, 0);
        assert_eq!(parsed.sort_by, None);
        assert_eq!(parsed.sort_dir, SortDir::Asc);
    }

    #[test]
    fn out_of_range_limit_falls_back() {
        assert_eq!(
            Pagination::parse(&raw(Some("0"), None, None, None)).limit,
            50
        );
        assert_eq!(
            Pagination::parse(&raw(Some("1000"), None, None, None)).limit,
            50
        );
        assert_eq!(
            Pagination::parse(&raw(Some("100"), None, None, None)).limit,
            100
        );
    }

    #[test]
    fn garbage_is_ignored() {
        let parsed = Pagination::parse(&raw(
            Some("abc"),
            Some("-3"),
            Some("price_per_month"),
            Some("sideways"),
        ));
        assert_eq!(parsed.limit, 50);
        assert_eq!(parsed.offset, 0);
        assert_eq!(parsed.sort_by.as_deref(), Some("price_per_month"));
        assert_eq!(parsed.sort_dir, SortDir::Asc);
    }

    #[test]
    fn valid_values_pass_through() {
        let parsed = Pagination::parse(&raw(Some("25"), Some("75"), None, Some("desc")));
        assert_eq!(parsed.limit, 25);
        assert_eq!(parsed.offset, 75);
        assert_eq!(parsed.sort_dir, SortDir::Desc);
    }
}
