//! 结构差异：找出源标签树中存在、目标树中缺失（或节点类型不一致）的键
//!
//! 只按源树的键集合比较；目标树独有的键被忽略，目标树只会被扩展，不会被裁剪。
//! 两侧都是叶子时只检查存在性，不比较内容，已有译文永远不会出现在变更记录中。

use crate::model::label_tree::{display_path, ChangePath, LabelNode, LabelTree, NodeKind};

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    LeafMissing,
    SubtreeMissing,
}

/// 一条变更记录：源树中有、目标树中没有（或类型不符）的节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: ChangePath,
    pub kind: ChangeKind,
    /// 源树在该路径上的完整值（叶子或整棵子树）
    pub source_value: LabelNode,
    /// 目标树在该路径上原有的节点类型；`Some` 表示结构冲突，回填会覆盖它
    pub replaces: Option<NodeKind>,
}

impl ChangeRecord {
    pub fn is_mismatch(&self) -> bool {
        self.replaces.is_some()
    }

    pub fn display_path(&self) -> String {
        display_path(&self.path)
    }
}

/// 计算从 `target` 到 `source` 需要回填的变更记录。
///
/// 深度优先，按源树键顺序输出；该顺序即回填与日志顺序。
pub fn diff(source: &LabelTree, target: &LabelTree) -> Vec<ChangeRecord> {
    let mut out = Vec::new();
    let mut prefix = ChangePath::new();
    walk(source, target, &mut prefix, &mut out);
    out
}

fn walk(source: &LabelTree, target: &LabelTree, prefix: &mut ChangePath, out: &mut Vec<ChangeRecord>) {
    for (key, src_node) in source.iter() {
        prefix.push(key.clone());
        let tgt_node = target.get(key);
        match (src_node, tgt_node) {
            (LabelNode::Container(src_child), Some(LabelNode::Container(tgt_child))) => {
                walk(src_child, tgt_child, prefix, out);
            }
            (LabelNode::Leaf(_), Some(LabelNode::Leaf(_))) => {}
            (src, tgt) => {
                let kind = match src {
                    LabelNode::Leaf(_) => ChangeKind::LeafMissing,
                    LabelNode::Container(_) => ChangeKind::SubtreeMissing,
                };
                out.push(ChangeRecord {
                    path: prefix.clone(),
                    kind,
                    source_value: src.clone(),
                    replaces: tgt.map(LabelNode::kind),
                });
            }
        }
        prefix.pop();
    }
}
