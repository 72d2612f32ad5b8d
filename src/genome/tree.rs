//! Tree genomes for genetic programming
//!
//! This module provides the binary expression tree evolved by the engine.
//! Every node caches the size of its subtree, and nodes are addressed by
//! their pre-order index: the root is 0, the left subtree follows the root
//! immediately, and the right child of a node at index `i` sits at
//! `i + left.size() + 1`.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::mem;

use crate::error::GenomeError;

/// Trait for terminal (leaf) payloads
pub trait Terminal:
    Clone
    + Send
    + Sync
    + PartialEq
    + fmt::Debug
    + fmt::Display
    + Serialize
    + for<'de> Deserialize<'de>
    + 'static
{
    /// Evaluate this terminal with the given variable bindings
    fn evaluate(&self, variables: &[f64]) -> f64;
}

/// Trait for binary operator payloads
pub trait Operator:
    Clone + Send + Sync + PartialEq + fmt::Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Symbol used by the infix rendering
    fn symbol(&self) -> &'static str;

    /// Name used by the function-call rendering
    fn name(&self) -> &'static str;

    /// Apply this operator to its two operands
    fn apply(&self, left: f64, right: f64) -> f64;
}

/// Standard arithmetic terminals for symbolic regression
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ArithmeticTerminal {
    /// Variable x_i
    Variable(usize),
    /// Constant value
    Constant(f64),
}

impl Terminal for ArithmeticTerminal {
    fn evaluate(&self, variables: &[f64]) -> f64 {
        match self {
            Self::Variable(i) => variables.get(*i).copied().unwrap_or(0.0),
            Self::Constant(c) => *c,
        }
    }
}

impl fmt::Display for ArithmeticTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(i) => write!(f, "x{}", i),
            Self::Constant(c) => write!(f, "{}", c),
        }
    }
}

/// Standard binary arithmetic operators for symbolic regression
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOperator {
    /// Addition
    Add,
    /// Subtraction
    Sub,
    /// Multiplication
    Mul,
    /// Protected division (returns 1.0 for division by zero)
    Div,
}

impl ArithmeticOperator {
    /// All arithmetic operators
    pub fn all() -> Vec<Self> {
        vec![Self::Add, Self::Sub, Self::Mul, Self::Div]
    }
}

impl Operator for ArithmeticOperator {
    fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
        }
    }

    fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            Self::Div => {
                if right.abs() < 1e-10 {
                    1.0
                } else {
                    left / right
                }
            }
        }
    }
}

/// Shape of a single node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
enum Node<T: Terminal, O: Operator> {
    /// Leaf node
    Leaf(T),
    /// Internal node with exactly two children
    Branch {
        op: O,
        left: Box<Tree<T, O>>,
        right: Box<Tree<T, O>>,
    },
}

/// A binary expression tree
///
/// Each node exclusively owns its children, so `clone()` is a deep copy
/// that shares nothing with the source. Deserialization rejects input whose
/// stored sizes disagree with its structure.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(bound = "")]
pub struct Tree<T: Terminal = ArithmeticTerminal, O: Operator = ArithmeticOperator> {
    node: Node<T, O>,
    size: usize,
}

/// Wire form of [`Tree`], checked before it becomes one
#[derive(Deserialize)]
#[serde(bound = "")]
struct TreeRepr<T: Terminal, O: Operator> {
    node: Node<T, O>,
    size: usize,
}

impl<'de, T: Terminal, O: Operator> Deserialize<'de> for Tree<T, O> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Children come through this impl too, so only this level is checked.
        let TreeRepr { node, size } = TreeRepr::<T, O>::deserialize(deserializer)?;
        let expected = match &node {
            Node::Leaf(_) => 1,
            Node::Branch { left, right, .. } => left.size + right.size + 1,
        };
        if size != expected {
            return Err(de::Error::custom(GenomeError::InvalidStructure(format!(
                "stored size {} but structure has {} nodes",
                size, expected
            ))));
        }
        Ok(Self { node, size })
    }
}

impl<T: Terminal, O: Operator> Tree<T, O> {
    /// Create a leaf
    pub fn leaf(value: T) -> Self {
        Self {
            node: Node::Leaf(value),
            size: 1,
        }
    }

    /// Create an internal node over two subtrees
    pub fn node(op: O, left: Self, right: Self) -> Self {
        let size = left.size + right.size + 1;
        Self {
            node: Node::Branch {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            size,
        }
    }

    /// Number of nodes in this subtree, including the root
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if this node has no children
    pub fn is_leaf(&self) -> bool {
        matches!(self.node, Node::Leaf(_))
    }

    /// Left child, if any
    pub fn left(&self) -> Option<&Self> {
        match &self.node {
            Node::Leaf(_) => None,
            Node::Branch { left, .. } => Some(&**left),
        }
    }

    /// Right child, if any
    pub fn right(&self) -> Option<&Self> {
        match &self.node {
            Node::Leaf(_) => None,
            Node::Branch { right, .. } => Some(&**right),
        }
    }

    /// Level of the deepest node (a single leaf has depth 0)
    pub fn depth(&self) -> usize {
        match &self.node {
            Node::Leaf(_) => 0,
            Node::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Deep copy of this subtree
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Locate the subtree at `desired_index`
    ///
    /// Returns the level of that node (the root is level 0) together with
    /// the subtree rooted there.
    pub fn get_sub_tree(&self, desired_index: usize) -> Result<(usize, &Self), GenomeError> {
        if desired_index >= self.size {
            return Err(GenomeError::IndexOutOfRange {
                index: desired_index,
                size: self.size,
            });
        }

        let mut current = self;
        let mut index = 0;
        let mut level = 0;
        loop {
            if index == desired_index {
                return Ok((level, current));
            }
            match &current.node {
                Node::Leaf(_) => {
                    return Err(GenomeError::InvalidStructure(format!(
                        "size counter disagrees with structure at index {}",
                        index
                    )))
                }
                Node::Branch { left, right, .. } => {
                    let right_index = index + 1 + left.size;
                    level += 1;
                    if desired_index < right_index {
                        index += 1;
                        current = &**left;
                    } else {
                        index = right_index;
                        current = &**right;
                    }
                }
            }
        }
    }

    /// Collect the subtrees that can be grafted within a depth budget
    ///
    /// A node qualifies when `max_allowed_depth - level <= available_depth`
    /// or when its size bound `size / 2` is at most `available_depth`. A
    /// qualifying node is returned once and its descendants are skipped;
    /// other nodes recurse left then right. Every leaf qualifies, so the
    /// result is never empty.
    pub fn get_sub_trees_by_level(
        &self,
        available_depth: usize,
        max_allowed_depth: usize,
    ) -> Vec<(usize, &Self)> {
        let mut out = Vec::new();
        self.collect_by_level(0, 0, available_depth, max_allowed_depth, &mut out);
        out
    }

    fn collect_by_level<'a>(
        &'a self,
        level: usize,
        index: usize,
        available_depth: usize,
        max_allowed_depth: usize,
        out: &mut Vec<(usize, &'a Self)>,
    ) {
        if max_allowed_depth.saturating_sub(level) <= available_depth
            || self.size / 2 <= available_depth
        {
            out.push((index, self));
            return;
        }
        if let Node::Branch { left, right, .. } = &self.node {
            let right_index = index + 1 + left.size;
            left.collect_by_level(
                level + 1,
                index + 1,
                available_depth,
                max_allowed_depth,
                out,
            );
            right.collect_by_level(
                level + 1,
                right_index,
                available_depth,
                max_allowed_depth,
                out,
            );
        }
    }

    /// Replace the subtree at `target_index`, returning the detached one
    ///
    /// Index 0 is left untouched and yields `Ok(None)`: swapping the whole
    /// tree is up to the caller (see [`Tree::graft`]).
    pub fn update_sub_tree(
        &mut self,
        target_index: usize,
        replacement: Self,
    ) -> Result<Option<Self>, GenomeError> {
        if target_index >= self.size {
            return Err(GenomeError::IndexOutOfRange {
                index: target_index,
                size: self.size,
            });
        }
        if target_index == 0 {
            return Ok(None);
        }
        self.replace_below(0, target_index, replacement).map(Some)
    }

    fn replace_below(
        &mut self,
        current_index: usize,
        target_index: usize,
        replacement: Self,
    ) -> Result<Self, GenomeError> {
        let Node::Branch { left, right, .. } = &mut self.node else {
            return Err(GenomeError::InvalidStructure(format!(
                "index {} lies below a leaf",
                target_index
            )));
        };

        let right_index = current_index + left.size + 1;
        let detached = if current_index + 1 == target_index {
            mem::replace(left.as_mut(), replacement)
        } else if right_index == target_index {
            mem::replace(right.as_mut(), replacement)
        } else if target_index < right_index {
            left.replace_below(current_index + 1, target_index, replacement)?
        } else {
            right.replace_below(right_index, target_index, replacement)?
        };

        self.size = left.size + right.size + 1;
        Ok(detached)
    }

    /// Put `replacement` at `target_index`, replacing the whole tree at 0
    ///
    /// Returns the resulting tree and the subtree that was cut out.
    pub fn graft(
        mut self,
        target_index: usize,
        replacement: Self,
    ) -> Result<(Self, Self), GenomeError> {
        if target_index >= self.size {
            return Err(GenomeError::IndexOutOfRange {
                index: target_index,
                size: self.size,
            });
        }
        if target_index == 0 {
            return Ok((replacement, self));
        }
        let detached = self.replace_below(0, target_index, replacement)?;
        Ok((self, detached))
    }

    /// Check the size invariant on every node
    pub fn validate(&self) -> Result<(), GenomeError> {
        match &self.node {
            Node::Leaf(_) if self.size == 1 => Ok(()),
            Node::Leaf(_) => Err(GenomeError::InvalidStructure(format!(
                "leaf with size {}",
                self.size
            ))),
            Node::Branch { left, right, .. } => {
                left.validate()?;
                right.validate()?;
                let expected = left.size + right.size + 1;
                if self.size == expected {
                    Ok(())
                } else {
                    Err(GenomeError::InvalidStructure(format!(
                        "node size {} but children account for {}",
                        self.size, expected
                    )))
                }
            }
        }
    }

    /// Evaluate the tree with given variable bindings
    pub fn evaluate(&self, variables: &[f64]) -> f64 {
        match &self.node {
            Node::Leaf(t) => t.evaluate(variables),
            Node::Branch { op, left, right } => {
                op.apply(left.evaluate(variables), right.evaluate(variables))
            }
        }
    }

    /// Infix rendering, e.g. `(x0 + 2)`
    pub fn eval_in_order(&self) -> String {
        match &self.node {
            Node::Leaf(t) => t.to_string(),
            Node::Branch { op, left, right } => format!(
                "({} {} {})",
                left.eval_in_order(),
                op.symbol(),
                right.eval_in_order()
            ),
        }
    }

    /// Function-call rendering, e.g. `add(x0, 2)`
    pub fn eval_post_order(&self) -> String {
        match &self.node {
            Node::Leaf(t) => t.to_string(),
            Node::Branch { op, left, right } => format!(
                "{}({}, {})",
                op.name(),
                left.eval_post_order(),
                right.eval_post_order()
            ),
        }
    }

    /// Node labels in pre-order (terminal value or operator symbol)
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.size);
        self.collect_labels(&mut labels);
        labels
    }

    fn collect_labels(&self, labels: &mut Vec<String>) {
        match &self.node {
            Node::Leaf(t) => labels.push(t.to_string()),
            Node::Branch { op, left, right } => {
                labels.push(op.symbol().to_string());
                left.collect_labels(labels);
                right.collect_labels(labels);
            }
        }
    }
}

impl<T: Terminal, O: Operator> fmt::Display for Tree<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.eval_in_order())
    }
}
