use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;

/// Raw query string of `GET /api/games`.
///
/// Numbers are signed so that `page=0` or `per_page=-5` still parse and get
/// clamped instead of being rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GamesQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: Option<String>,
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// Applies defaults and bounds from the catalog configuration.
    ///
    /// Only an empty `q` counts as no filter; anything else, whitespace
    /// included, is matched as given.
    pub fn from_query(raw: GamesQuery, cfg: &CatalogConfig) -> Self {
        let query = raw.q.filter(|q| !q.is_empty());
        let page = raw.page.map(to_positive).unwrap_or(1);
        let per_page = raw
            .per_page
            .map(to_positive)
            .unwrap_or(cfg.default_per_page)
            .min(cfg.max_per_page)
            .max(1);
        Self { query, page, per_page }
    }
}

/// Values below 1 become 1; values beyond `usize` saturate.
fn to_positive(v: i64) -> usize {
    usize::try_from(v.max(1)).unwrap_or(usize::MAX)
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { query: None, page: 1, per_page: CatalogConfig::default().default_per_page }
    }
}

/// One page of the catalog, serialized as the `/api/games` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub games: Vec<String>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub pages: usize,
}
