use std::path::PathBuf;

/// Maximum records returned by the list endpoints. There is no pagination.
pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// Maximum members and maximum families returned by one search.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct KinshipConfig {
    pub db_path: PathBuf,
    pub list_limit: usize,
    pub search_limit: usize,
}

impl Default for KinshipConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("kinship.db"),
            list_limit: DEFAULT_LIST_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}
