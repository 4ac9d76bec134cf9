//! i18n 配置：语言列表与标签文件列表
//!
//! 配置文件格式与既有项目一致：
//!
//! ```json
//! { "i18nConfig": { "cultures": [{ "name": "fr", "isoCode": "fr" }], "files": ["common"] } }
//! ```
//!
//! 也接受去掉 `i18nConfig` 外层的对象。

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SyncError;
use crate::utils::fs::read_json_file;

pub const DEFAULT_I18N_ROOT: &str = "i18n";
pub const DEFAULT_SOURCE_LOCALE: &str = "default";

/// 目标语言：目录名 + 翻译服务使用的 ISO 代码
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    pub name: String,
    pub iso_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(rename = "cultures")]
    pub locales: Vec<Locale>,
    /// 标签文件基名（不含 `.json`）
    pub files: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Wrapped {
        #[serde(rename = "i18nConfig")]
        i18n_config: Config,
    },
    Bare(Config),
}

impl Config {
    pub fn load(p: &Path) -> Result<Self, SyncError> {
        let value = read_json_file(p)?;
        let file: ConfigFile = serde_json::from_value(value).map_err(|e| SyncError::Parse {
            path: p.to_path_buf(),
            source: e,
        })?;
        let config = match file {
            ConfigFile::Wrapped { i18n_config } => i18n_config,
            ConfigFile::Bare(c) => c,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if self.locales.is_empty() {
            return Err(SyncError::Config("cultures 不能为空".into()));
        }
        if self.files.is_empty() {
            return Err(SyncError::Config("files 不能为空".into()));
        }
        let mut seen = HashSet::new();
        for locale in &self.locales {
            if !is_plain_name(&locale.name) {
                return Err(SyncError::Config(format!("非法的语言目录名: {:?}", locale.name)));
            }
            if locale.iso_code.trim().is_empty() {
                return Err(SyncError::Config(format!("语言 {} 缺少 isoCode", locale.name)));
            }
            if !seen.insert(locale.name.as_str()) {
                return Err(SyncError::Config(format!("语言目录名重复: {}", locale.name)));
            }
        }
        for file in &self.files {
            if !is_plain_name(file) {
                return Err(SyncError::Config(format!("非法的标签文件名: {:?}", file)));
            }
        }
        Ok(())
    }
}

/// 非空、且不含路径分隔符或 `..`
fn is_plain_name(s: &str) -> bool {
    !s.trim().is_empty() && !s.contains(['/', '\\']) && s != "." && s != ".."
}

/// 单次运行的选项（来自命令行）
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// i18n 根目录，其下每个语言一个子目录
    pub root: PathBuf,
    /// 源语言目录名
    pub source_locale: String,
    /// 只计算差异，不翻译、不写文件
    pub dry_run: bool,
    /// 只处理这些语言目录（为空表示全部）
    pub only_locales: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_I18N_ROOT),
            source_locale: DEFAULT_SOURCE_LOCALE.to_string(),
            dry_run: false,
            only_locales: Vec::new(),
        }
    }
}

impl RunOptions {
    /// 按过滤条件选出要处理的语言；源语言目录本身永远跳过
    pub fn select<'a>(&self, config: &'a Config) -> Result<Vec<&'a Locale>, SyncError> {
        for name in &self.only_locales {
            if !config.locales.iter().any(|l| &l.name == name) {
                return Err(SyncError::Config(format!("未配置的语言: {}", name)));
            }
        }
        Ok(config
            .locales
            .iter()
            .filter(|l| l.name != self.source_locale)
            .filter(|l| self.only_locales.is_empty() || self.only_locales.contains(&l.name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(content.as_bytes()).expect("写入临时文件失败");
        file
    }

    fn locale(name: &str, iso: &str) -> Locale {
        Locale { name: name.into(), iso_code: iso.into() }
    }

    #[test]
    fn test_load_wrapped_config() {
        let f = create_config_file(
            r#"{"i18nConfig": {"cultures": [{"name": "fr-FR", "isoCode": "fr"}, {"name": "es", "isoCode": "es"}], "files": ["common", "home"]}}"#,
        );
        let config = Config::load(f.path()).unwrap();

        assert_eq!(config.locales, vec![locale("fr-FR", "fr"), locale("es", "es")]);
        assert_eq!(config.files, vec!["common", "home"]);
    }

    #[test]
    fn test_load_bare_config() {
        let f = create_config_file(r#"{"cultures": [{"name": "de", "isoCode": "de"}], "files": ["common"]}"#);
        let config = Config::load(f.path()).unwrap();
        assert_eq!(config.locales.len(), 1);
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let f = create_config_file(r#"{"cultures": [{"name": "de"}], "files": ["common"]}"#);
        assert!(matches!(Config::load(f.path()), Err(SyncError::Parse { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let base = Config { locales: vec![locale("fr", "fr")], files: vec!["common".into()] };
        assert!(base.validate().is_ok());

        let mut c = base.clone();
        c.locales.push(locale("fr", "fr"));
        assert!(matches!(c.validate(), Err(SyncError::Config(_))));

        let mut c = base.clone();
        c.locales[0].iso_code = " ".into();
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.files = vec!["../secrets".into()];
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.files.clear();
        assert!(c.validate().is_err());

        let c = Config { locales: vec![], files: base.files.clone() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_select_filters_and_skips_source() {
        let config = Config {
            locales: vec![locale("default", "en"), locale("fr", "fr"), locale("es", "es")],
            files: vec!["common".into()],
        };
        let opts = RunOptions::default();
        let names: Vec<&str> = opts.select(&config).unwrap().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["fr", "es"]);

        let opts = RunOptions { only_locales: vec!["es".into()], ..RunOptions::default() };
        assert_eq!(opts.select(&config).unwrap(), vec![&config.locales[2]]);

        let opts = RunOptions { only_locales: vec!["ja".into()], ..RunOptions::default() };
        assert!(opts.select(&config).is_err());
    }
}
