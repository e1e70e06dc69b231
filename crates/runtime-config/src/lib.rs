//! Runtime configuration for the gallery server.
//!
//! `allpi.toml` is read once at startup, environment overrides are applied on
//! top, and the result is turned into the immutable structs each pipeline
//! stage takes (`SourceConfig`, `ClassifyOptions`, the layout settings).
//! Every field has a serde default, so an empty or missing file is valid.

use std::path::{Path, PathBuf};

use allpi_core::config::{DEFAULT_IMAGE_EXTENSIONS, DEFAULT_RAW_BASE_URL, DEFAULT_ROOT};
use allpi_core::{
    ClassifyOptions, DelegationMode, EmptyFolderPolicy, FolderGrouping, ItemOrder, RepoRef,
    SourceConfig,
};
use serde::{Deserialize, Serialize};

/// Canonical config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "allpi.toml";

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "ALLPI_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration (persisted as `allpi.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GalleryConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub gallery: GallerySettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_repo")]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,
    /// Name of the environment variable holding an optional API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            branch: default_branch(),
            root: default_root(),
            image_extensions: default_image_extensions(),
            api_base_url: default_api_base_url(),
            raw_base_url: default_raw_base_url(),
            token_env: default_token_env(),
            timeout_secs: default_source_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GallerySettings {
    #[serde(default)]
    pub folder_grouping: FolderGrouping,
    #[serde(default)]
    pub empty_folders: EmptyFolderPolicy,
    #[serde(default)]
    pub order: ItemOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSettings {
    #[serde(default)]
    pub strategy: LayoutStrategy,
    #[serde(default)]
    pub mode: DelegationMode,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_layout_endpoint")]
    pub endpoint: String,
    /// Name of the environment variable holding the classifier API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_layout_timeout")]
    pub timeout_secs: u64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            strategy: LayoutStrategy::Rule,
            mode: DelegationMode::Batch,
            model: default_model(),
            endpoint: default_layout_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_layout_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    /// Images vertical, folders horizontal.
    #[default]
    #[serde(alias = "fixed", alias = "default")]
    Rule,
    /// Ask the external classifier, falling back to the rule on failure.
    #[serde(alias = "ai", alias = "model")]
    Delegated,
    /// Unknown values are normalized by [`apply_compat_fallbacks`].
    #[serde(other)]
    Unknown,
}

impl LayoutStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rule" | "fixed" | "default" => Some(Self::Rule),
            "delegated" | "ai" | "model" => Some(Self::Delegated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Static frontend build served as the fallback route, if it exists.
    #[serde(default = "default_web_dir")]
    pub web_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            web_dir: default_web_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheSettings {
    /// How long a successful tree listing may be reused. 0 disables caching.
    #[serde(default)]
    pub tree_ttl_secs: u64,
}

impl GalleryConfig {
    pub fn repo(&self) -> RepoRef {
        RepoRef::new(&self.source.owner, &self.source.repo, &self.source.branch)
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig::new(self.repo())
            .with_root(&self.source.root)
            .with_image_extensions(&self.source.image_extensions)
            .with_raw_base_url(&self.source.raw_base_url)
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            grouping: self.gallery.folder_grouping,
            empty_folders: self.gallery.empty_folders,
            order: self.gallery.order,
        }
    }

    /// Token for the tree API, read from the variable named by `token_env`.
    pub fn source_token(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        non_empty(lookup(&self.source.token_env))
    }

    /// Classifier API key, read from the variable named by `api_key_env`.
    pub fn layout_api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        non_empty(lookup(&self.layout.api_key_env))
    }

    /// Apply environment overrides. Returns the names of the variables used.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Vec<&'static str> {
        let mut applied = Vec::new();

        if let Some(port) = non_empty(lookup("PORT")) {
            match port.parse() {
                Ok(port) => {
                    self.server.port = port;
                    applied.push("PORT");
                }
                Err(_) => tracing::warn!("ignoring invalid PORT value: {port}"),
            }
        }
        if let Some(owner) = non_empty(lookup("ALLPI_REPO_OWNER")) {
            self.source.owner = owner;
            applied.push("ALLPI_REPO_OWNER");
        }
        if let Some(repo) = non_empty(lookup("ALLPI_REPO_NAME")) {
            self.source.repo = repo;
            applied.push("ALLPI_REPO_NAME");
        }
        if let Some(branch) = non_empty(lookup("ALLPI_REPO_BRANCH")) {
            self.source.branch = branch;
            applied.push("ALLPI_REPO_BRANCH");
        }
        if let Some(strategy) = non_empty(lookup("ALLPI_LAYOUT_STRATEGY")) {
            match LayoutStrategy::parse(&strategy) {
                Some(strategy) => {
                    self.layout.strategy = strategy;
                    applied.push("ALLPI_LAYOUT_STRATEGY");
                }
                None => tracing::warn!("ignoring unknown ALLPI_LAYOUT_STRATEGY: {strategy}"),
            }
        }

        applied
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("source.owner", &self.source.owner),
            ("source.repo", &self.source.repo),
            ("source.branch", &self.source.branch),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must not be empty")));
            }
        }
        if self
            .source
            .image_extensions
            .iter()
            .all(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(ConfigError::Invalid(
                "source.image_extensions must list at least one extension".to_string(),
            ));
        }
        for (field, secs) in [
            ("source.timeout_secs", self.source.timeout_secs),
            ("layout.timeout_secs", self.layout.timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("{field} must be at least 1")));
            }
        }
        Ok(())
    }
}

/// Apply compatibility fallbacks after loading raw TOML.
/// Returns true when any field was updated.
pub fn apply_compat_fallbacks(config: &mut GalleryConfig) -> bool {
    let mut changed = false;

    if config.layout.strategy == LayoutStrategy::Unknown {
        config.layout.strategy = LayoutStrategy::Rule;
        changed = true;
    }

    if config.source.image_extensions.is_empty() {
        config.source.image_extensions = default_image_extensions();
        changed = true;
    }

    changed
}

/// Parse config text, then apply compatibility fallbacks and validation.
pub fn parse_config(content: &str, path: &Path) -> Result<GalleryConfig, ConfigError> {
    let mut config: GalleryConfig =
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if apply_compat_fallbacks(&mut config) {
        tracing::warn!("config at {} uses unknown values; defaults applied", path.display());
    }
    config.validate()?;
    Ok(config)
}

/// Load config from `path`. A missing file yields the defaults.
pub fn load_from_path(path: &Path) -> Result<GalleryConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(GalleryConfig::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, path)
}

/// Resolve the config path from `ALLPI_CONFIG`, defaulting to `./allpi.toml`.
pub fn config_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    non_empty(lookup(CONFIG_PATH_ENV))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Load config the way the server does: file first, then the process
/// environment on top.
pub fn load() -> Result<GalleryConfig, ConfigError> {
    let env = |name: &str| std::env::var(name).ok();
    let path = config_path(env);
    let mut config = load_from_path(&path)?;
    let applied = config.apply_env_overrides(env);
    if !applied.is_empty() {
        tracing::info!("config overridden from environment: {}", applied.join(", "));
    }
    config.validate()?;
    Ok(config)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Serde default functions ─────────────────────────────────────────────

fn default_owner() -> String {
    "studio-prototyping".to_string()
}
fn default_repo() -> String {
    "allpi-gallery".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}
fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}
fn default_image_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS
        .iter()
        .map(|ext| (*ext).to_string())
        .collect()
}
fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}
fn default_raw_base_url() -> String {
    DEFAULT_RAW_BASE_URL.to_string()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}
fn default_source_timeout() -> u64 {
    30
}
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_layout_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_layout_timeout() -> u64 {
    60
}
fn default_port() -> u16 {
    3000
}
fn default_web_dir() -> String {
    "web/build".to_string()
}
