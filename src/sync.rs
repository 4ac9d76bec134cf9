//! 同步驱动：逐语言、逐文件执行 加载 → 差异 → 回填 → 落盘
//!
//! 文件之间严格串行，一个文件完整落盘后才开始下一个。
//! 任一步骤出错即返回，后续语言/文件不再处理。

use std::path::{Path, PathBuf};

use crate::config::{Config, Locale, RunOptions};
use crate::error::SyncError;
use crate::model::reconciler::{MismatchPolicy, ReconcileStats, Reconciler};
use crate::model::tree_diff::{diff, ChangeRecord};
use crate::translate::Translator;
use crate::utils::fs::{ensure_locale_dir, label_file_path, read_label_file, write_label_file};

/// 单个 (语言, 文件) 的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub locale: String,
    pub file: String,
    pub path: PathBuf,
    /// 目标文件在处理前是否存在
    pub existed: bool,
    /// 差异记录（dry-run 时即待回填清单）
    pub pending: Vec<String>,
    pub stats: ReconcileStats,
    /// 是否写入了文件
    pub written: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn translated(&self) -> usize {
        self.files.iter().map(|f| f.stats.translated).sum()
    }

    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.written).count()
    }

    pub fn pending(&self) -> usize {
        self.files.iter().map(|f| f.pending.len()).sum()
    }

    pub fn mismatches(&self) -> usize {
        self.files.iter().map(|f| f.stats.mismatches.len()).sum()
    }
}

pub struct Synchronizer<T: Translator> {
    reconciler: Reconciler<T>,
}

impl<T: Translator> Synchronizer<T> {
    pub fn new(translator: T) -> Self {
        Self { reconciler: Reconciler::new(translator) }
    }

    pub fn with_policy(translator: T, policy: MismatchPolicy) -> Self {
        Self { reconciler: Reconciler::new(translator).with_policy(policy) }
    }

    /// 处理配置中的全部语言与文件；错误原样返回，由调用方负责报告
    pub fn run(&self, config: &Config, opts: &RunOptions) -> Result<RunReport, SyncError> {
        tracing::info!(
            "开始同步（{}），可能需要一些时间...",
            self.reconciler.translator().provider_name()
        );
        let report = self.run_inner(config, opts)?;
        tracing::info!(
            "完成: {} 个文件写入，{} 条译文，{} 处结构冲突",
            report.written(),
            report.translated(),
            report.mismatches()
        );
        Ok(report)
    }

    fn run_inner(&self, config: &Config, opts: &RunOptions) -> Result<RunReport, SyncError> {
        let mut report = RunReport::default();
        for locale in opts.select(config)? {
            if !opts.dry_run {
                ensure_locale_dir(&opts.root, &locale.name)?;
            }
            for file in &config.files {
                report.files.push(self.sync_file(locale, file, opts)?);
            }
            for extra in unlisted_files(&opts.root, &locale.name, config)? {
                tracing::warn!("{}/{}.json 未在配置中列出，已跳过", locale.name, extra);
            }
        }
        Ok(report)
    }

    /// 处理单个 (语言, 文件)；翻译失败时不写文件
    pub fn sync_file(&self, locale: &Locale, file: &str, opts: &RunOptions) -> Result<FileReport, SyncError> {
        let source_path = label_file_path(&opts.root, &opts.source_locale, file);
        let source = read_label_file(&source_path)?.ok_or(SyncError::MissingSource(source_path))?;

        let target_path = label_file_path(&opts.root, &locale.name, file);
        let existing = read_label_file(&target_path)?;
        let existed = existing.is_some();
        let target = existing.unwrap_or_default();

        let records = diff(&source, &target);
        let pending: Vec<String> = records.iter().map(ChangeRecord::display_path).collect();
        tracing::debug!("{}: {} 条差异", target_path.display(), records.len());

        let mut report = FileReport {
            locale: locale.name.clone(),
            file: file.to_string(),
            path: target_path.clone(),
            existed,
            pending,
            stats: ReconcileStats::default(),
            written: false,
        };

        if opts.dry_run {
            for path in &report.pending {
                tracing::info!("[dry-run] {} 缺少 {}", target_path.display(), path);
            }
            return Ok(report);
        }
        // 已存在且无差异的文件保持原样
        if existed && records.is_empty() {
            return Ok(report);
        }

        let (reconciled, stats) = self
            .reconciler
            .reconcile(&records, target, &locale.iso_code)
            .map_err(|source| SyncError::Translation { file: target_path.clone(), source })?;
        // 全部记录都因冲突被跳过时，内容没有变化
        if existed && stats.records == 0 {
            report.stats = stats;
            return Ok(report);
        }
        write_label_file(&target_path, &reconciled)?;
        tracing::info!(" > {}", target_path.display());

        report.stats = stats;
        report.written = true;
        Ok(report)
    }
}

/// 列出某语言目录下已存在、但未在配置中列出的标签文件（仅用于提示）
pub fn unlisted_files(root: &Path, locale: &str, config: &Config) -> Result<Vec<String>, SyncError> {
    let dir = root.join(locale);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if !config.files.iter().any(|f| f == stem) {
                out.push(stem.to_string());
            }
        }
    }
    out.sort();
    Ok(out)
}
