//! Exception trees
//!
//! An [`ExceptionTree<K>`] mirrors the shape of a loaded record, but only
//! where loading failed. Each node optionally holds its own
//! [`SupplyError`] and maps keys of type `K` (attribute enum, list index or
//! map key) to child trees of arbitrary key type.
//!
//! # Invariants
//! - `children` never contains a child without exceptions (sparse)
//! - `has_exceptions() == supply_exception().is_some() || !children.is_empty()`

use std::any::Any;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::error::SupplyError;
use crate::path::LoadPath;

/// Key addressing a child of an exception tree
pub trait TreeKey: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

impl<T> TreeKey for T where T: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

/// Type-erased view over any exception tree node
///
/// Lets a parent hold children with different key types.
pub trait LoadExceptionTree: Debug + Send + Sync + 'static {
    /// Failure recorded at this node itself
    fn supply_exception(&self) -> Option<&SupplyError>;

    /// True if this node or any descendant holds a failure
    fn has_exceptions(&self) -> bool;

    /// Number of children with exceptions
    fn exceptional_child_count(&self) -> usize;

    /// Pre-order walk: own failure first, then children in insertion order
    fn visit(&self, path: &mut LoadPath, visitor: &mut dyn FnMut(&LoadPath, &SupplyError));

    /// Upcast for downcasting to the concrete tree type
    fn as_any(&self) -> &dyn Any;

    /// All failures of this subtree, in pre-order
    fn flattened_load_exceptions(&self) -> Vec<SupplyError> {
        let mut out = Vec::new();
        self.visit(&mut LoadPath::root(), &mut |_, e| out.push(e.clone()));
        out
    }

    /// All failures of this subtree with their path relative to this node
    fn flattened_with_paths(&self) -> Vec<(LoadPath, SupplyError)> {
        let mut out = Vec::new();
        self.visit(&mut LoadPath::root(), &mut |p, e| out.push((p.clone(), e.clone())));
        out
    }
}

impl dyn LoadExceptionTree {
    /// View as a concrete tree keyed by `K`
    #[must_use]
    pub fn downcast_ref<K: TreeKey>(&self) -> Option<&ExceptionTree<K>> {
        self.as_any().downcast_ref::<ExceptionTree<K>>()
    }
}

/// Values that may carry their own exception tree
///
/// Records return their tree; leaf values (numbers, strings, arrays of
/// leaves) keep the default and return `None`.
pub trait HasLoadExceptionTree {
    /// This value's tree, if it is a composite that tracks one
    fn as_load_exception_tree(&self) -> Option<Arc<dyn LoadExceptionTree>> {
        None
    }
}

macro_rules! leaf_values {
    ($($t:ty),* $(,)?) => {
        $(impl HasLoadExceptionTree for $t {})*
    };
}

leaf_values!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);

impl<T> HasLoadExceptionTree for Vec<T> {}

impl<T: HasLoadExceptionTree> HasLoadExceptionTree for Option<T> {
    fn as_load_exception_tree(&self) -> Option<Arc<dyn LoadExceptionTree>> {
        self.as_ref().and_then(|value| value.as_load_exception_tree())
    }
}

impl<T: HasLoadExceptionTree + ?Sized> HasLoadExceptionTree for Box<T> {
    fn as_load_exception_tree(&self) -> Option<Arc<dyn LoadExceptionTree>> {
        (**self).as_load_exception_tree()
    }
}

impl<T: HasLoadExceptionTree + ?Sized> HasLoadExceptionTree for Arc<T> {
    fn as_load_exception_tree(&self) -> Option<Arc<dyn LoadExceptionTree>> {
        (**self).as_load_exception_tree()
    }
}

#[derive(Debug)]
struct EmptyLoadExceptionTree;

impl LoadExceptionTree for EmptyLoadExceptionTree {
    fn supply_exception(&self) -> Option<&SupplyError> {
        None
    }

    fn has_exceptions(&self) -> bool {
        false
    }

    fn exceptional_child_count(&self) -> usize {
        0
    }

    fn visit(&self, _path: &mut LoadPath, _visitor: &mut dyn FnMut(&LoadPath, &SupplyError)) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

static EMPTY: Lazy<Arc<dyn LoadExceptionTree>> = Lazy::new(|| Arc::new(EmptyLoadExceptionTree));

/// The shared tree without any exceptions
#[must_use]
pub fn empty_tree() -> Arc<dyn LoadExceptionTree> {
    Arc::clone(&EMPTY)
}

/// True if `tree` is the shared empty singleton
#[must_use]
pub fn is_empty_singleton(tree: &Arc<dyn LoadExceptionTree>) -> bool {
    Arc::ptr_eq(tree, &EMPTY)
}

/// Tree node for a value without children (a scalar field, a list element)
#[derive(Debug, Clone)]
pub struct LeafExceptionTree {
    error: SupplyError,
}

impl LeafExceptionTree {
    /// Leaf holding `error`
    #[inline]
    #[must_use]
    pub fn new(error: SupplyError) -> Self {
        Self { error }
    }

    /// The recorded failure
    #[inline]
    #[must_use]
    pub fn error(&self) -> &SupplyError {
        &self.error
    }
}

impl LoadExceptionTree for LeafExceptionTree {
    fn supply_exception(&self) -> Option<&SupplyError> {
        Some(&self.error)
    }

    fn has_exceptions(&self) -> bool {
        true
    }

    fn exceptional_child_count(&self) -> usize {
        0
    }

    fn visit(&self, path: &mut LoadPath, visitor: &mut dyn FnMut(&LoadPath, &SupplyError)) {
        visitor(path, &self.error);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Exception tree node keyed by `K`
#[derive(Debug, Clone)]
pub struct ExceptionTree<K: TreeKey> {
    supply_error: Option<SupplyError>,
    children: IndexMap<K, Arc<dyn LoadExceptionTree>>,
}

impl<K: TreeKey> ExceptionTree<K> {
    /// Tree without exceptions
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            supply_error: None,
            children: IndexMap::new(),
        }
    }

    /// Start assembling a tree
    #[inline]
    #[must_use]
    pub fn builder() -> ExceptionTreeBuilder<K> {
        ExceptionTreeBuilder::new()
    }

    /// Failure recorded at this node itself
    #[inline]
    #[must_use]
    pub fn supply_exception(&self) -> Option<&SupplyError> {
        self.supply_error.as_ref()
    }

    /// True if this node or any descendant holds a failure
    #[inline]
    #[must_use]
    pub fn has_exceptions(&self) -> bool {
        self.supply_error.is_some() || !self.children.is_empty()
    }

    /// True if the child at `key` (or anything below it) failed
    #[inline]
    #[must_use]
    pub fn has_exceptions_at(&self, key: &K) -> bool {
        // sparse: presence implies exceptions
        self.children.contains_key(key)
    }

    /// Child tree at `key`, present only if it has exceptions
    #[inline]
    #[must_use]
    pub fn exception_tree(&self, key: &K) -> Option<&dyn LoadExceptionTree> {
        self.children.get(key).map(|child| &**child)
    }

    /// Child tree at `key`, or the shared empty tree
    #[must_use]
    pub fn shared_exception_tree(&self, key: &K) -> Arc<dyn LoadExceptionTree> {
        self.children.get(key).map_or_else(empty_tree, Arc::clone)
    }

    /// Child tree at `key` viewed with its concrete key type
    #[must_use]
    pub fn exception_tree_as<C: TreeKey>(&self, key: &K) -> Option<&ExceptionTree<C>> {
        self.exception_tree(key)
            .and_then(|child| child.downcast_ref::<C>())
    }

    /// Failure recorded at the child `key` itself
    #[must_use]
    pub fn supply_exception_at(&self, key: &K) -> Option<&SupplyError> {
        self.exception_tree(key)
            .and_then(|child| child.supply_exception())
    }

    /// Children with exceptions, in insertion order
    #[inline]
    #[must_use]
    pub fn exceptional_children(&self) -> &IndexMap<K, Arc<dyn LoadExceptionTree>> {
        &self.children
    }

    /// All failures of this tree, in pre-order
    #[must_use]
    pub fn flattened_load_exceptions(&self) -> Vec<SupplyError> {
        LoadExceptionTree::flattened_load_exceptions(self)
    }

    /// All failures with their path from this node
    #[must_use]
    pub fn flattened_with_paths(&self) -> Vec<(LoadPath, SupplyError)> {
        LoadExceptionTree::flattened_with_paths(self)
    }
}

impl<K: TreeKey> Default for ExceptionTree<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: TreeKey> LoadExceptionTree for ExceptionTree<K> {
    fn supply_exception(&self) -> Option<&SupplyError> {
        self.supply_error.as_ref()
    }

    fn has_exceptions(&self) -> bool {
        ExceptionTree::has_exceptions(self)
    }

    fn exceptional_child_count(&self) -> usize {
        self.children.len()
    }

    fn visit(&self, path: &mut LoadPath, visitor: &mut dyn FnMut(&LoadPath, &SupplyError)) {
        if let Some(e) = &self.supply_error {
            visitor(path, e);
        }
        for (key, child) in &self.children {
            path.push(key.to_string());
            child.visit(path, visitor);
            path.pop();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Mutable assembly of an [`ExceptionTree`]
///
/// Enforces sparseness: attaching a child without exceptions removes any
/// previous child at that key instead of inserting.
#[derive(Debug, Clone)]
pub struct ExceptionTreeBuilder<K: TreeKey> {
    supply_error: Option<SupplyError>,
    children: IndexMap<K, Arc<dyn LoadExceptionTree>>,
}

impl<K: TreeKey> ExceptionTreeBuilder<K> {
    /// Empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            supply_error: None,
            children: IndexMap::new(),
        }
    }

    /// Set or clear this node's own failure
    #[inline]
    pub fn set_supply_error(&mut self, error: Option<SupplyError>) -> &mut Self {
        self.supply_error = error;
        self
    }

    /// Attach `child` under `key` if it has exceptions
    pub fn attach(&mut self, key: K, child: Arc<dyn LoadExceptionTree>) -> &mut Self {
        if child.has_exceptions() {
            self.children.insert(key, child);
        } else {
            self.children.shift_remove(&key);
        }
        self
    }

    /// Attach a concrete subtree under `key` if it has exceptions
    pub fn attach_tree<C: TreeKey>(&mut self, key: K, child: ExceptionTree<C>) -> &mut Self {
        if child.has_exceptions() {
            self.children.insert(key, Arc::new(child));
        } else {
            self.children.shift_remove(&key);
        }
        self
    }

    /// Record a leaf failure under `key`
    pub fn attach_error(&mut self, key: K, error: SupplyError) -> &mut Self {
        self.children.insert(key, Arc::new(LeafExceptionTree::new(error)));
        self
    }

    /// Drop whatever is recorded under `key`
    pub fn clear(&mut self, key: &K) -> &mut Self {
        self.children.shift_remove(key);
        self
    }

    /// True if anything has been recorded so far
    #[inline]
    #[must_use]
    pub fn has_exceptions(&self) -> bool {
        self.supply_error.is_some() || !self.children.is_empty()
    }

    /// Finish the tree
    #[must_use]
    pub fn build(self) -> ExceptionTree<K> {
        ExceptionTree {
            supply_error: self.supply_error,
            children: self.children,
        }
    }

    /// Finish as a type-erased tree; the shared singleton when empty
    #[must_use]
    pub fn build_shared(self) -> Arc<dyn LoadExceptionTree> {
        if self.has_exceptions() {
            Arc::new(self.build())
        } else {
            empty_tree()
        }
    }
}

impl<K: TreeKey> Default for ExceptionTreeBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn err(msg: &'static str) -> SupplyError {
        SupplyError::msg(msg)
    }

    fn messages(errors: &[SupplyError]) -> Vec<String> {
        errors.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_singleton_is_idempotent() {
        let a = empty_tree();
        let b = empty_tree();
        assert!(is_empty_singleton(&a));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!a.has_exceptions());
        assert!(a.supply_exception().is_none());
        assert!(a.flattened_load_exceptions().is_empty());
        assert_eq!(a.exceptional_child_count(), 0);
    }

    #[test]
    fn empty_tree_has_no_child_for_any_key() {
        let tree = ExceptionTree::<&'static str>::empty();
        assert!(!tree.has_exceptions());
        assert!(!tree.has_exceptions_at(&"anything"));
        assert!(tree.exception_tree(&"anything").is_none());
        assert!(is_empty_singleton(&tree.shared_exception_tree(&"anything")));
    }

    #[test]
    fn attach_skips_children_without_exceptions() {
        let mut b = ExceptionTree::<u32>::builder();
        b.attach(1, empty_tree());
        b.attach_tree(2, ExceptionTree::<u32>::empty());
        let tree = b.build();
        assert!(!tree.has_exceptions());
        assert!(tree.exceptional_children().is_empty());
    }

    #[test]
    fn attaching_empty_replaces_previous_child() {
        let mut b = ExceptionTree::<u32>::builder();
        b.attach_error(1, err("x"));
        b.attach(1, empty_tree());
        assert!(!b.has_exceptions());
    }

    #[test]
    fn point_queries() {
        let mut b = ExceptionTree::<&'static str>::builder();
        b.attach_error("width", err("not an int"));
        let tree = b.build();
        assert!(tree.has_exceptions());
        assert!(tree.has_exceptions_at(&"width"));
        assert!(!tree.has_exceptions_at(&"height"));
        assert_eq!(
            tree.supply_exception_at(&"width").map(ToString::to_string),
            Some("not an int".to_string())
        );
        assert!(tree.supply_exception().is_none());
    }

    #[test]
    fn flattening_is_pre_order() {
        let mut inner = ExceptionTree::<usize>::builder();
        inner.set_supply_error(Some(err("list")));
        inner.attach_error(0, err("elem 0"));
        inner.attach_error(2, err("elem 2"));

        let mut root = ExceptionTree::<&'static str>::builder();
        root.set_supply_error(Some(err("root")));
        root.attach_error("a", err("a"));
        root.attach_tree("list", inner.build());
        root.attach_error("z", err("z"));
        let tree = root.build();

        assert_eq!(
            messages(&tree.flattened_load_exceptions()),
            vec!["root", "a", "list", "elem 0", "elem 2", "z"]
        );
        let paths: Vec<String> = tree
            .flattened_with_paths()
            .iter()
            .map(|(p, _)| p.to_string())
            .collect();
        assert_eq!(paths, vec!["<root>", "a", "list", "list.0", "list.2", "z"]);
    }

    #[test]
    fn downcast_to_concrete_child() {
        let mut inner = ExceptionTree::<String>::builder();
        inner.attach_error("id2".to_string(), err("bad"));
        let mut root = ExceptionTree::<u8>::builder();
        root.attach_tree(7, inner.build());
        let tree = root.build();

        let child = tree.exception_tree_as::<String>(&7).unwrap();
        assert!(child.has_exceptions_at(&"id2".to_string()));
        assert!(tree.exception_tree_as::<usize>(&7).is_none());
    }

    #[test]
    fn build_shared_returns_singleton_when_empty() {
        let shared = ExceptionTree::<u8>::builder().build_shared();
        assert!(is_empty_singleton(&shared));

        let mut b = ExceptionTree::<u8>::builder();
        b.attach_error(0, err("e"));
        assert!(!is_empty_singleton(&b.build_shared()));
    }

    #[test]
    fn leaf_values_have_no_tree() {
        assert!(5_i32.as_load_exception_tree().is_none());
        assert!(String::from("x").as_load_exception_tree().is_none());
        assert!(Some(vec![1, 2]).as_load_exception_tree().is_none());
    }
}
