//! 标签树（LabelTree）：字符串叶子与嵌套容器组成的有序键值树
//!
//! JSON 文档在加载时转换为强类型的 `LabelNode`，之后的差异计算与回填
//! 不再需要在每一层做动态类型判断。

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

/// 从根到某节点的键序列
pub type ChangePath = Vec<String>;

/// 节点类型（叶子 / 容器）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Container,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LabelError {
    #[error("根节点必须是JSON对象，实际为 {0}")]
    RootNotObject(&'static str),
    #[error("不支持的节点 {path}: {found}（只允许字符串或对象）")]
    UnsupportedNode { path: String, found: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelNode {
    Leaf(String),
    Container(LabelTree),
}

impl LabelNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            LabelNode::Leaf(_) => NodeKind::Leaf,
            LabelNode::Container(_) => NodeKind::Container,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            LabelNode::Leaf(s) => Value::String(s.clone()),
            LabelNode::Container(tree) => tree.to_value(),
        }
    }
}

/// 有序标签树；键顺序即源文件中的顺序，序列化时保持不变
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTree {
    nodes: IndexMap<String, LabelNode>,
}

impl LabelTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 值构建标签树，遇到非字符串/非对象的值时报告其 JSONPath
    pub fn from_value(root: &Value) -> Result<Self, LabelError> {
        match root {
            Value::Object(map) => Self::from_map(map, "$"),
            other => Err(LabelError::RootNotObject(json_type_name(other))),
        }
    }

    fn from_map(map: &Map<String, Value>, path: &str) -> Result<Self, LabelError> {
        let mut tree = LabelTree::new();
        for (k, v) in map {
            // 与影子树一致：特殊字符的键使用 bracket-notation
            let field_path = if k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                format!("{}.{}", path, k)
            } else {
                format!("{}['{}']", path, k.replace('\'', "\\'"))
            };
            let node = match v {
                Value::String(s) => LabelNode::Leaf(s.clone()),
                Value::Object(child) => LabelNode::Container(Self::from_map(child, &field_path)?),
                other => {
                    return Err(LabelError::UnsupportedNode {
                        path: field_path,
                        found: json_type_name(other),
                    })
                }
            };
            tree.nodes.insert(k.clone(), node);
        }
        Ok(tree)
    }

    /// 转换回 JSON 值（依赖 serde_json 的 preserve_order 保持键顺序）
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .nodes
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect();
        Value::Object(map)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&LabelNode> {
        self.nodes.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LabelNode)> {
        self.nodes.iter()
    }

    /// 插入或替换直接子节点，返回被替换的旧节点
    pub fn insert(&mut self, key: impl Into<String>, node: LabelNode) -> Option<LabelNode> {
        self.nodes.insert(key.into(), node)
    }

    /// 按路径查找节点；空路径不指向任何节点
    pub fn get_path(&self, path: &[String]) -> Option<&LabelNode> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for key in parents {
            match current.nodes.get(key)? {
                LabelNode::Container(child) => current = child,
                LabelNode::Leaf(_) => return None,
            }
        }
        current.nodes.get(last)
    }

    /// 确保路径上的每一级容器都存在。
    ///
    /// 挡在路径上的叶子会被替换为空容器；`created` 累加新建容器的数量。
    pub fn materialize(&mut self, path: &[String], created: &mut usize) {
        let Some((first, rest)) = path.split_first() else {
            return;
        };
        let slot = self.nodes.entry(first.clone()).or_insert_with(|| {
            *created += 1;
            LabelNode::Container(LabelTree::new())
        });
        match slot {
            LabelNode::Container(child) => child.materialize(rest, created),
            LabelNode::Leaf(_) => {
                *created += 1;
                let mut child = LabelTree::new();
                child.materialize(rest, created);
                *slot = LabelNode::Container(child);
            }
        }
    }

    /// 在路径处写入节点并返回被替换的旧节点，自动创建中间容器；空路径时什么也不做
    pub fn insert_path(&mut self, path: &[String], node: LabelNode, created: &mut usize) -> Option<LabelNode> {
        let (first, rest) = path.split_first()?;
        if rest.is_empty() {
            return self.nodes.insert(first.clone(), node);
        }
        let slot = self.nodes.entry(first.clone()).or_insert_with(|| {
            *created += 1;
            LabelNode::Container(LabelTree::new())
        });
        match slot {
            LabelNode::Container(child) => child.insert_path(rest, node, created),
            LabelNode::Leaf(_) => {
                *created += 1;
                let mut child = LabelTree::new();
                child.insert_path(rest, node, created);
                Some(std::mem::replace(slot, LabelNode::Container(child)))
            }
        }
    }

    /// 叶子总数（递归）
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .values()
            .map(|n| match n {
                LabelNode::Leaf(_) => 1,
                LabelNode::Container(child) => child.leaf_count(),
            })
            .sum()
    }

    /// 深度优先枚举所有叶子及其路径
    pub fn leaves(&self) -> Vec<(ChangePath, &str)> {
        fn walk<'a>(tree: &'a LabelTree, prefix: &mut ChangePath, out: &mut Vec<(ChangePath, &'a str)>) {
            for (k, node) in &tree.nodes {
                prefix.push(k.clone());
                match node {
                    LabelNode::Leaf(s) => out.push((prefix.clone(), s.as_str())),
                    LabelNode::Container(child) => walk(child, prefix, out),
                }
                prefix.pop();
            }
        }
        let mut out = Vec::new();
        walk(self, &mut Vec::new(), &mut out);
        out
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "bool",
        Value::Null => "null",
    }
}

/// 将路径格式化为 `a.b.c` 形式，用于日志
pub fn display_path(path: &[String]) -> String {
    path.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(keys: &[&str]) -> ChangePath {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_from_value_nested() {
        let v = json!({"menu": {"file": {"open": "Open", "save": "Save"}}, "title": "App"});
        let tree = LabelTree::from_value(&v).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(
            tree.get_path(&p(&["menu", "file", "save"])),
            Some(&LabelNode::Leaf("Save".into()))
        );
        assert_eq!(tree.get("title").map(LabelNode::kind), Some(NodeKind::Leaf));
    }

    #[test]
    fn test_round_trip_keeps_key_order() {
        let text = r#"{"zeta":"z","alpha":{"m":"m","b":"b"},"mid":"x"}"#;
        let v: Value = serde_json::from_str(text).unwrap();
        let tree = LabelTree::from_value(&v).unwrap();

        assert_eq!(serde_json::to_string(&tree.to_value()).unwrap(), text);
    }

    #[test]
    fn test_rejects_non_object_root() {
        let err = LabelTree::from_value(&json!(["a", "b"])).unwrap_err();
        assert_eq!(err, LabelError::RootNotObject("array"));
    }

    #[test]
    fn test_rejects_unsupported_node_with_path() {
        let v = json!({"form": {"max length": 42}});
        let err = LabelTree::from_value(&v).unwrap_err();
        assert_eq!(
            err,
            LabelError::UnsupportedNode { path: "$.form['max length']".into(), found: "number" }
        );
    }

    #[test]
    fn test_insert_path_creates_containers() {
        let mut tree = LabelTree::new();
        let mut created = 0;
        tree.insert_path(&p(&["a", "b", "c"]), LabelNode::Leaf("x".into()), &mut created);

        assert_eq!(created, 2);
        assert_eq!(tree.to_value(), json!({"a": {"b": {"c": "x"}}}));
    }

    #[test]
    fn test_insert_path_through_leaf_keeps_key_position() {
        let mut tree = LabelTree::from_value(&json!({"first": "1", "a": "leaf", "last": "2"})).unwrap();
        let mut created = 0;
        let old = tree.insert_path(&p(&["a", "b", "c"]), LabelNode::Leaf("x".into()), &mut created);

        assert_eq!(old, Some(LabelNode::Leaf("leaf".into())));
        assert_eq!(created, 2);
        assert_eq!(
            serde_json::to_string(&tree.to_value()).unwrap(),
            r#"{"first":"1","a":{"b":{"c":"x"}},"last":"2"}"#
        );
    }

    #[test]
    fn test_materialize_replaces_leaf_in_the_way() {
        let mut tree = LabelTree::from_value(&json!({"a": "leaf", "keep": "me"})).unwrap();
        let mut created = 0;
        tree.materialize(&p(&["a", "b"]), &mut created);

        assert_eq!(created, 2);
        assert_eq!(tree.to_value(), json!({"a": {"b": {}}, "keep": "me"}));
    }

    #[test]
    fn test_get_path_through_leaf_is_none() {
        let tree = LabelTree::from_value(&json!({"a": "leaf"})).unwrap();
        assert!(tree.get_path(&p(&["a", "b"])).is_none());
        assert!(tree.get_path(&[]).is_none());
    }

    #[test]
    fn test_leaves_depth_first_order() {
        let tree = LabelTree::from_value(&json!({"b": {"y": "1", "x": "2"}, "a": "3"})).unwrap();
        let leaves = tree.leaves();

        assert_eq!(
            leaves,
            vec![(p(&["b", "y"]), "1"), (p(&["b", "x"]), "2"), (p(&["a"]), "3")]
        );
    }
}
