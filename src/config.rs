//! Configuration management for noticewatch using the prefer crate.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::{CatalogEntry, SourceKind};
use crate::notify::MessageLimits;
use crate::repository::DbContext;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "noticewatch.db";

/// Seen entries older than this many days are purged.
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Workflow file dispatched by the `/check` admin command.
pub const DEFAULT_WORKFLOW: &str = "check_announcements.yml";

/// Telegram bot settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramSettings {
    pub bot_token: Option<String>,
    /// Chat that receives announcements.
    pub chat_id: Option<String>,
    /// User or chat allowed to run admin commands and receive error alerts.
    pub admin_chat_id: Option<String>,
    pub api_base: String,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            admin_chat_id: None,
            api_base: TELEGRAM_API_BASE.to_string(),
        }
    }
}

impl TelegramSettings {
    /// Admin chat, falling back to the announcement chat.
    pub fn admin_chat(&self) -> Option<&str> {
        self.admin_chat_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.chat_id.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.as_deref().is_some_and(|t| !t.is_empty())
            && self.chat_id.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// GitHub Actions settings for manually triggered runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubSettings {
    pub token: Option<String>,
    /// Repository as `owner/name`.
    pub repo: Option<String>,
    pub workflow: String,
    pub git_ref: String,
    pub api_base: String,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            token: None,
            repo: None,
            workflow: DEFAULT_WORKFLOW.to_string(),
            git_ref: "main".to_string(),
            api_base: GITHUB_API_BASE.to_string(),
        }
    }
}

impl GithubSettings {
    pub fn is_configured(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
            && self.repo.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename.
    pub database_filename: String,
    /// Database URL (overrides data_dir/database_filename if set).
    pub database_url: Option<String>,
    /// User agent config for page fetches (`None`, `"impersonate"` or a literal).
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Age in days after which seen entries are purged.
    pub retention_days: u32,
    pub message_body_chars: usize,
    pub message_attachments: usize,
    pub telegram: TelegramSettings,
    pub github: GithubSettings,
    /// Known sources, in display order.
    pub catalog: Vec<CatalogEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("noticewatch");
        let limits = MessageLimits::default();

        Self {
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_url: None,
            user_agent: None,
            request_timeout: 30,
            retention_days: DEFAULT_RETENTION_DAYS,
            message_body_chars: limits.body_chars,
            message_attachments: limits.max_attachments,
            telegram: TelegramSettings::default(),
            github: GithubSettings::default(),
            catalog: default_catalog(),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Get the database URL, constructing from path if not explicitly set.
    pub fn database_url(&self) -> String {
        if let Some(ref url) = self.database_url {
            url.clone()
        } else {
            format!("sqlite:{}", self.database_path().display())
        }
    }

    /// Get the full path to the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create data directory '{}': {}",
                    self.data_dir.display(),
                    e
                ),
            )
        })
    }

    pub fn message_limits(&self) -> MessageLimits {
        MessageLimits {
            body_chars: self.message_body_chars,
            max_attachments: self.message_attachments,
        }
    }

    pub fn create_db_context(&self) -> DbContext {
        DbContext::from_url(&self.database_url())
    }

    /// Apply environment overrides. `lookup` returns a variable's value.
    ///
    /// `ADMIN_CHAT_ID` falls back to `TELEGRAM_CHAT_ID` through
    /// [`TelegramSettings::admin_chat`], so it is only set when present.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(token);
        }
        if let Some(chat) = var("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = Some(chat);
        }
        if let Some(admin) = var("ADMIN_CHAT_ID") {
            self.telegram.admin_chat_id = Some(admin);
        }
        if let Some(token) = var("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(repo) = var("GITHUB_REPO") {
            self.github.repo = Some(repo);
        }
        if let Some(url) = var("DATABASE_URL") {
            tracing::debug!("Using DATABASE_URL from environment: {}", url);
            self.database_url = Some(url);
        }
    }
}

/// Telegram section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// GitHub section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "target")]
    pub data_dir: Option<String>,
    /// Database filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_body_chars: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_attachments: Option<usize>,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub github: GithubConfig,
    /// Source catalog. Empty means the built-in catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<CatalogEntry>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer for discovery.
    /// Falls back to defaults when no file is found or it does not parse.
    pub async fn load() -> Self {
        match prefer::load("noticewatch").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("{}", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Format is chosen by extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        match ext {
            "toml" => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e)),
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(days) = self.retention_days {
            settings.retention_days = days;
        }
        if let Some(chars) = self.message_body_chars {
            settings.message_body_chars = chars;
        }
        if let Some(count) = self.message_attachments {
            settings.message_attachments = count;
        }

        let telegram = &self.telegram;
        if telegram.bot_token.is_some() {
            settings.telegram.bot_token = telegram.bot_token.clone();
        }
        if telegram.chat_id.is_some() {
            settings.telegram.chat_id = telegram.chat_id.clone();
        }
        if telegram.admin_chat_id.is_some() {
            settings.telegram.admin_chat_id = telegram.admin_chat_id.clone();
        }
        if let Some(ref base) = telegram.api_base {
            settings.telegram.api_base = base.clone();
        }

        let github = &self.github;
        if github.token.is_some() {
            settings.github.token = github.token.clone();
        }
        if github.repo.is_some() {
            settings.github.repo = github.repo.clone();
        }
        if let Some(ref workflow) = github.workflow {
            settings.github.workflow = workflow.clone();
        }
        if let Some(ref git_ref) = github.git_ref {
            settings.github.git_ref = git_ref.clone();
        }
        if let Some(ref base) = github.api_base {
            settings.github.api_base = base.clone();
        }

        if !self.sources.is_empty() {
            settings.catalog = self.sources.clone();
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Use CWD for relative paths instead of config file directory.
    pub use_cwd: bool,
    /// Data directory (--target flag).
    pub target: Option<PathBuf>,
}

/// Load settings with explicit options.
///
/// Precedence, lowest first: defaults, config file, `--target`, environment.
pub async fn load_settings_with_options(options: LoadOptions) -> Result<(Settings, Config), String> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let base_dir = if options.use_cwd {
        cwd.clone()
    } else {
        config.base_dir().unwrap_or_else(|| cwd.clone())
    };

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir);

    if let Some(target) = options.target {
        settings.data_dir = if target.is_absolute() {
            target
        } else {
            cwd.join(target)
        };
    }

    settings.apply_env(|name| std::env::var(name).ok());

    Ok((settings, config))
}

/// Sources tracked when the config file names none.
pub fn default_catalog() -> Vec<CatalogEntry> {
    const AKBIS: &str = "https://akbis.gaziantep.edu.tr/detay/?A_ID=";
    let profiles: [(&str, &str, &str); 20] = [
        ("veysel-turan", "Araştırma Görevlisi Veysel TURAN", "423728_arastirma-gorevlisi_veysel-turan"),
        ("sule-ozturk", "Araştırma Görevlisi Şule ÖZTÜRK", "365257_arastirma-gorevlisi_sule-ozturk"),
        ("muhterem-alper-kaplan", "Araştırma Görevlisi Muhterem Alper KAPLAN", "424279_arastirma-gorevlisi_muhterem-alper-kaplan"),
        ("ali-hazar", "Araştırma Görevlisi Ali HAZAR", "424280_arastirma-gorevlisi_ali-hazar"),
        ("ahmet-said-dedeoglu", "Araştırma Görevlisi Ahmet Said DEDEOĞLU", "317884_arastirma-gorevlisi_ahmet-said-dedeoglu"),
        ("isa-akkaya", "Araştırma Görevlisi İsa AKKAYA", "382968_arastirma-gorevlisi_isa-akkaya"),
        ("seydi-kacmaz", "Dr. Öğr. Üyesi Seydi KAÇMAZ", "149283_doktor-ogretim-uyesi_seydi-kacmaz"),
        ("mehmet-demir", "Dr. Öğr. Üyesi Mehmet DEMİR", "107423_doktor-ogretim-uyesi_mehmet-demir"),
        ("musa-bute", "Dr. Öğr. Üyesi Musa BUTE", "183330_doktor-ogretim-uyesi_musa-bute"),
        ("mahmut-aykac", "Dr. Öğr. Üyesi Mahmut AYKAÇ", "148024_doktor-ogretim-uyesi_mahmut-aykac"),
        ("ali-osman-arslan", "Dr. Öğr. Üyesi Ali Osman ARSLAN", "51709_doktor-ogretim-uyesi_ali-osman-arslan"),
        ("serkan-ozbay", "Doç. Dr. Serkan ÖZBAY", "149310_docent_serkan-ozbay"),
        ("taner-ince", "Doç. Dr. Taner İNCE", "149286_docent_taner-ince"),
        ("ahmet-mete-vural", "Prof. Dr. Ahmet Mete VURAL", "160452_profesor_ahmet-mete-vural"),
        ("golge-ogucu-yetkin", "Prof. Dr. Gölge ÖĞÜCÜ YETKİN", "148038_profesor_golge-ogucu-yetkin"),
        ("sema-kayhan", "Prof. Dr. Sema KAYHAN", "191951_profesor_sema-kayhan"),
        ("tolgay-kara", "Prof. Dr. Tolgay KARA", "19932_profesor_tolgay-kara"),
        ("ugur-cem-hasar", "Prof. Dr. Uğur Cem HASAR", "182085_profesor_ugur-cem-hasar"),
        ("ergun-ercelebi", "Prof. Dr. Ergün ERÇELEBİ", "9132_profesor_ergun-ercelebi"),
        ("nuran-dogru", "Prof. Dr. Nuran DOĞRU", "148036_profesor_nuran-dogru"),
    ];

    let mut catalog: Vec<CatalogEntry> = profiles
        .iter()
        .map(|(id, name, page)| {
            CatalogEntry::new(id, name, &format!("{}{}", AKBIS, page), SourceKind::Profile)
        })
        .collect();
    catalog.push(CatalogEntry::new(
        "eee",
        "EEE Bölümü",
        "https://eee.gaziantep.edu.tr",
        SourceKind::Department,
    ));
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_default_catalog() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 21);
        let ids: HashSet<_> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 21);
        assert_eq!(catalog[20].kind, SourceKind::Department);
        assert!(catalog[..20].iter().all(|e| e.kind == SourceKind::Profile));
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
data_dir = "state"
retention_days = 30

[telegram]
chat_id = "-1001"

[github]
repo = "owner/watch"
ref = "release"

[[sources]]
id = "prof-a"
name = "Prof. A"
url = "https://example.edu/a"
kind = "profile"
"#;
        let config = Config::parse(toml, "toml").unwrap();
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/srv/watch"));

        assert_eq!(settings.data_dir, PathBuf::from("/srv/watch/state"));
        assert_eq!(settings.retention_days, 30);
        assert_eq!(settings.telegram.chat_id.as_deref(), Some("-1001"));
        assert_eq!(settings.github.git_ref, "release");
        assert_eq!(settings.github.workflow, DEFAULT_WORKFLOW);
        assert_eq!(settings.catalog.len(), 1);
        assert_eq!(settings.catalog[0].id, "prof-a");
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = "request_timeout: 10\nsources:\n  - id: eee\n    name: EEE\n    url: https://eee.example.edu\n    kind: department\n";
        let config = Config::parse(yaml, "yml").unwrap();
        assert_eq!(config.request_timeout, Some(10));
        assert_eq!(config.sources[0].kind, SourceKind::Department);

        let config = Config::parse(r#"{"database": "other.db"}"#, "json").unwrap();
        assert_eq!(config.database.as_deref(), Some("other.db"));

        assert!(Config::parse("not = [valid", "toml").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut settings = Settings::default();
        settings.telegram.chat_id = Some("from-file".to_string());

        let env: HashMap<&str, &str> = [
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "-100"),
            ("GITHUB_REPO", "owner/repo"),
            ("GITHUB_TOKEN", "  "),
        ]
        .into_iter()
        .collect();
        settings.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(settings.telegram.chat_id.as_deref(), Some("-100"));
        assert_eq!(settings.telegram.admin_chat(), Some("-100"));
        assert_eq!(settings.github.repo.as_deref(), Some("owner/repo"));
        assert!(settings.github.token.is_none());
        assert!(!settings.github.is_configured());
    }

    #[test]
    fn test_database_url_from_data_dir() {
        let settings = Settings::with_data_dir(PathBuf::from("/var/lib/nw"));
        assert_eq!(settings.database_url(), "sqlite:/var/lib/nw/noticewatch.db");
    }

    #[tokio::test]
    async fn test_load_from_path_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noticewatch.toml");
        std::fs::write(&path, "retention_days = 7\n").unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.retention_days, Some(7));
        assert_eq!(config.base_dir(), Some(dir.path().to_path_buf()));
    }
}
