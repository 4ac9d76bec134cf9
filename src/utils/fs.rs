//! IO helper: safe file read/write for label JSON

use std::{
    fs::File,
    io::{BufReader, ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use tempfile::NamedTempFile;

use crate::error::SyncError;
use crate::model::label_tree::LabelTree;

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path) -> Result<Value, SyncError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Value = serde_json::from_reader(rdr).map_err(|e| SyncError::Parse {
        path: p.to_path_buf(),
        source: e,
    })?;
    Ok(v)
}

/// 读取标签文件；文件不存在时返回 `None`
pub fn read_label_file(p: &Path) -> Result<Option<LabelTree>, SyncError> {
    let value = match read_json_file(p) {
        Ok(v) => v,
        Err(SyncError::Io(e)) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let tree = LabelTree::from_value(&value).map_err(|e| SyncError::Label {
        path: p.to_path_buf(),
        source: e,
    })?;
    Ok(Some(tree))
}

/// 序列化为 4 空格缩进的 JSON 文本
pub fn to_pretty_json(tree: &LabelTree) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    tree.to_value().serialize(&mut ser)?;
    Ok(buf)
}

/// 将标签树写入文件：先写同目录临时文件再原子替换，不会留下半写入的文件
pub fn write_label_file(p: &Path, tree: &LabelTree) -> Result<(), SyncError> {
    let bytes = to_pretty_json(tree).map_err(|e| SyncError::Parse {
        path: p.to_path_buf(),
        source: e,
    })?;
    let dir = p.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(p).map_err(|e| SyncError::Io(e.error))?;
    Ok(())
}

/// 确保语言目录存在，返回目录路径
pub fn ensure_locale_dir(root: &Path, locale: &str) -> Result<PathBuf, SyncError> {
    let dir = root.join(locale);
    if !dir.is_dir() {
        std::fs::create_dir_all(&dir)?;
        tracing::info!("已创建语言目录: {}", dir.display());
    }
    Ok(dir)
}

/// `<root>/<locale>/<file>.json`
pub fn label_file_path(root: &Path, locale: &str, file: &str) -> PathBuf {
    root.join(locale).join(format!("{}.json", file))
}
