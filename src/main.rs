//! 程序入口：解析参数、初始化日志，按配置为每个语言补齐缺失标签

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use amulet::translate::google::DEFAULT_ENDPOINT;
use amulet::{Config, GoogleTranslator, MismatchPolicy, RunOptions, RunReport, Synchronizer};

#[derive(Parser)]
#[command(name = "amulet")]
#[command(about = "为各语言补齐缺失的 i18n 标签（已有译文保持不变）")]
#[command(version)]
struct Cli {
    /// i18n 配置文件（cultures + files）
    #[arg(short, long, env = "I18N_CONFIG")]
    config: PathBuf,

    /// i18n 根目录，其下每个语言一个子目录
    #[arg(long, default_value = amulet::config::DEFAULT_I18N_ROOT)]
    root: PathBuf,

    /// 源语言目录名
    #[arg(long, default_value = amulet::config::DEFAULT_SOURCE_LOCALE)]
    source: String,

    /// 只处理指定语言目录（可重复）
    #[arg(short, long = "locale")]
    locales: Vec<String>,

    /// 只列出缺失的标签，不翻译、不写文件
    #[arg(long)]
    dry_run: bool,

    /// 目标中节点类型与源不一致时保留目标节点（默认按源结构覆盖）
    #[arg(long)]
    keep_conflicts: bool,

    /// Google Cloud Translation API key
    #[arg(long, env = "GOOGLE_TRANSLATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// 翻译服务地址
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,

    /// 静默模式(仅输出警告和错误)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    let _ = SubscriberBuilder::default().with_max_level(level).with_target(false).try_init();

    let dry_run = cli.dry_run;
    match run(cli) {
        Ok(report) => {
            if dry_run {
                println!("{} 个文件共 {} 处缺失标签待翻译", report.files.len(), report.pending());
            }
            ExitCode::SUCCESS
        }
        // 库内只返回错误不记录，这里是唯一的报告点
        Err(e) => {
            tracing::error!("同步中止: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<RunReport> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("无法加载配置 {}", cli.config.display()))?;
    let opts = RunOptions {
        root: cli.root,
        source_locale: cli.source,
        dry_run: cli.dry_run,
        only_locales: cli.locales,
    };

    let policy = if cli.keep_conflicts { MismatchPolicy::Keep } else { MismatchPolicy::Overwrite };

    let translator = GoogleTranslator::with_endpoint(cli.api_key.unwrap_or_default(), cli.endpoint);
    let report = match translator {
        Ok(t) => Synchronizer::with_policy(t, policy).run(&config, &opts)?,
        // dry-run 不调用翻译服务，不需要凭据
        Err(_) if opts.dry_run => Synchronizer::new(DryRun).run(&config, &opts)?,
        Err(e) => return Err(e).context("请通过 --api-key 或 GOOGLE_TRANSLATE_API_KEY 提供凭据"),
    };
    Ok(report)
}

/// dry-run 占位：从不会被调用
struct DryRun;

impl amulet::Translator for DryRun {
    fn translate(&self, _text: &str, _target: &str) -> Result<String, amulet::TranslateError> {
        Err(amulet::TranslateError::Other("dry-run 模式不执行翻译".into()))
    }

    fn provider_name(&self) -> &str {
        "dry-run"
    }
}
