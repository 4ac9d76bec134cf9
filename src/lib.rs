//! i18n 标签补齐工具库
//!
//! 以源语言标签树为准，找出各语言标签树中缺失的键，只翻译并写入这些键，
//! 已有译文（包括人工翻译）不会被改动。

pub mod config;
pub mod error;
pub mod model;
pub mod sync;
pub mod translate;
pub mod utils;

// 重新导出主要类型
pub use config::{Config, Locale, RunOptions};
pub use error::SyncError;
pub use model::label_tree::{ChangePath, LabelError, LabelNode, LabelTree, NodeKind};
pub use model::reconciler::{MismatchPolicy, ReconcileError, ReconcileStats, Reconciler};
pub use model::tree_diff::{diff, ChangeKind, ChangeRecord};
pub use sync::{FileReport, RunReport, Synchronizer};
pub use translate::{GoogleTranslator, TranslateError, Translator};
