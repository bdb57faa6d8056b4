use serde::Serialize;

use crate::config::FilterConfig;

/// Resolved `page`/`limit` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Missing, non-numeric or non-positive values fall back to page 1 and the
    /// configured default limit; the limit is capped at the configured maximum.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, config: &FilterConfig) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);

        let mut limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(config.default_limit);

        if let Some(max) = config.max_limit {
            if limit > max {
                if config.debug_logging {
                    tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max);
                }
                limit = max;
            }
        }

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: i64,
    pub limit: i64,
}

/// Neighbouring page descriptors; each is present only if that page exists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl Pagination {
    pub fn compute(request: PageRequest, total: i64) -> Self {
        let start = request.offset();
        let end = request.page.saturating_mul(request.limit);

        Self {
            next: (end < total).then_some(PageLink { page: request.page + 1, limit: request.limit }),
            prev: (start > 0).then_some(PageLink { page: request.page - 1, limit: request.limit }),
        }
    }
}
