//! 运行级错误

use std::path::PathBuf;

use thiserror::Error;

use crate::model::label_tree::LabelError;
use crate::model::reconciler::ReconcileError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败 {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("标签文件格式错误 {}: {source}", .path.display())]
    Label {
        path: PathBuf,
        #[source]
        source: LabelError,
    },
    #[error("配置错误: {0}")]
    Config(String),
    #[error("源语言文件不存在: {}", .0.display())]
    MissingSource(PathBuf),
    /// 回填某个语言文件时翻译失败；叶子路径与语言在 `source` 中
    #[error("{}: {source}", .file.display())]
    Translation {
        file: PathBuf,
        #[source]
        source: ReconcileError,
    },
}
