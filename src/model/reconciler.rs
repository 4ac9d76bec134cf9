//! 回填器：按变更记录逐条翻译并写入目标树
//!
//! 每条记录先展开成叶子翻译任务队列（子树按深度优先展开），
//! 再由单个循环依次处理：一次只有一个翻译调用在进行。
//! 任一叶子翻译失败时整棵目标树被丢弃，调用方不会看到部分写入的结果。

use std::collections::VecDeque;

use thiserror::Error;

use crate::model::label_tree::{display_path, ChangePath, LabelNode, LabelTree, NodeKind};
use crate::model::tree_diff::ChangeRecord;
use crate::translate::{TranslateError, Translator};

/// 叶子翻译失败；携带失败叶子的路径与目标语言
#[derive(Error, Debug)]
#[error("翻译 {path} -> {locale} 失败: {source}")]
pub struct ReconcileError {
    pub path: String,
    pub locale: String,
    #[source]
    pub source: TranslateError,
}

/// 单个文件的回填统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// 已处理的变更记录数
    pub records: usize,
    /// 翻译并写入的叶子数
    pub translated: usize,
    /// 新建的容器节点数
    pub containers_created: usize,
    /// 结构冲突路径（覆盖或保留，取决于 `MismatchPolicy`）
    pub mismatches: Vec<String>,
    /// 因 `MismatchPolicy::Keep` 而跳过的记录数
    pub skipped: usize,
}

/// 目标节点类型与源不一致（叶子 vs 容器）时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// 按源结构覆盖目标节点
    #[default]
    Overwrite,
    /// 保留目标节点，跳过该记录
    Keep,
}

/// 待执行的写入任务
#[derive(Debug)]
enum Job {
    /// 确保该路径上存在容器（源树中的空容器也需要镜像）
    Container(ChangePath),
    /// 翻译文本并写入该路径
    Leaf(ChangePath, String),
}

pub struct Reconciler<T: Translator> {
    translator: T,
    policy: MismatchPolicy,
}

impl<T: Translator> Reconciler<T> {
    pub fn new(translator: T) -> Self {
        Self { translator, policy: MismatchPolicy::default() }
    }

    pub fn with_policy(mut self, policy: MismatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// 按顺序执行 `records`，返回回填后的目标树。
    ///
    /// 出错时 `target` 随之丢弃；已落盘的文件不受影响。
    pub fn reconcile(
        &self,
        records: &[ChangeRecord],
        mut target: LabelTree,
        locale_code: &str,
    ) -> Result<(LabelTree, ReconcileStats), ReconcileError> {
        let mut stats = ReconcileStats::default();

        for record in records {
            if let Some(previous) = record.replaces {
                let path = record.display_path();
                let keep = self.policy == MismatchPolicy::Keep;
                tracing::warn!(
                    "结构冲突: {} 在目标中为{}，{}",
                    path,
                    kind_label(previous),
                    if keep { "保留目标节点" } else { "将按源结构覆盖" }
                );
                stats.mismatches.push(path);
                if keep {
                    stats.skipped += 1;
                    continue;
                }
            }
            tracing::debug!("回填 {:?} {}", record.kind, record.display_path());

            for job in expand(record) {
                match job {
                    Job::Container(path) => {
                        target.materialize(&path, &mut stats.containers_created);
                    }
                    Job::Leaf(path, text) => {
                        let translated = self.translate_leaf(&path, &text, locale_code)?;
                        target.insert_path(&path, LabelNode::Leaf(translated), &mut stats.containers_created);
                        stats.translated += 1;
                    }
                }
            }
            stats.records += 1;
        }

        Ok((target, stats))
    }

    fn translate_leaf(&self, path: &[String], text: &str, locale_code: &str) -> Result<String, ReconcileError> {
        self.translator.translate(text, locale_code).map_err(|source| {
            let path = display_path(path);
            tracing::debug!("翻译失败 {} ({}): {}", path, locale_code, source);
            ReconcileError { path, locale: locale_code.to_string(), source }
        })
    }
}

/// 将一条记录展开为深度优先的任务队列
fn expand(record: &ChangeRecord) -> VecDeque<Job> {
    fn push_node(path: ChangePath, node: &LabelNode, jobs: &mut VecDeque<Job>) {
        match node {
            LabelNode::Leaf(text) => jobs.push_back(Job::Leaf(path, text.clone())),
            LabelNode::Container(tree) => {
                jobs.push_back(Job::Container(path.clone()));
                for (k, child) in tree.iter() {
                    let mut child_path = path.clone();
                    child_path.push(k.clone());
                    push_node(child_path, child, jobs);
                }
            }
        }
    }

    let mut jobs = VecDeque::new();
    push_node(record.path.clone(), &record.source_value, &mut jobs);
    jobs
}

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Leaf => "叶子",
        NodeKind::Container => "容器",
    }
}
