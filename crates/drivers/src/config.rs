use bag_config_adapters::DEFAULT_CATALOG_PATH;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Local directory or `http(s)://` base the catalog and models are served from.
    pub asset_root: String,
    pub catalog_path: String,
    pub asset_cache_capacity: usize,
    pub window_width: usize,
    pub window_height: usize,
    pub snapshot_width: u32,
    pub snapshot_height: u32,
}

impl AppConfig {
    pub fn with_root(mut self, root: Option<String>) -> Self {
        if let Some(root) = root {
            self.asset_root = root;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            asset_root: "public".to_string(),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            asset_cache_capacity: 8,
            window_width: 1280,
            window_height: 800,
            snapshot_width: 960,
            snapshot_height: 720,
        }
    }
}
