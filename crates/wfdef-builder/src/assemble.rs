//! Record assembly
//!
//! [`RecordAssembler`] is the shared `build()` engine behind every per-shape
//! builder: it turns slots into final field values and assembles the
//! record's exception tree as it goes.

use std::collections::HashSet;
use std::marker::PhantomData;

use indexmap::IndexMap;
use wfdef_tree::{
    ExceptionTree, ExceptionTreeBuilder, HasLoadExceptionTree, SupplyError, TreeKey,
};

use crate::error::{BuildError, IllegalArgumentError};
use crate::list::ListSlot;
use crate::map::MapSlot;
use crate::shape::{BuildMode, Shape};
use crate::slot::FieldSlot;

/// Resolves the slots of one record of shape `S`
#[derive(Debug)]
pub struct RecordAssembler<S: Shape> {
    mode: BuildMode,
    tree: ExceptionTreeBuilder<S::Attribute>,
    resolved: HashSet<S::Attribute>,
    _shape: PhantomData<S>,
}

impl<S: Shape> RecordAssembler<S> {
    /// Start assembling in `mode`
    #[must_use]
    pub fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            tree: ExceptionTreeBuilder::new(),
            resolved: HashSet::new(),
            _shape: PhantomData,
        }
    }

    /// Resolve a required field, substituting `placeholder` when unset
    ///
    /// In lenient mode an unset field is recorded under its attribute as an
    /// [`IllegalArgumentError`] naming it. Strict mode reports it from
    /// [`finish`](Self::finish) instead.
    pub fn required<T, P>(
        &mut self,
        attribute: S::Attribute,
        slot: FieldSlot<T>,
        placeholder: P,
    ) -> T
    where
        T: HasLoadExceptionTree,
        P: FnOnce() -> T,
    {
        if !self.mode.is_strict() && !slot.is_resolved() && slot.error().is_none() {
            let e = SupplyError::new(IllegalArgumentError::required(&attribute));
            log_failure(S::NAME, &attribute, None::<&usize>, &e);
            self.tree.attach_error(attribute, e);
            return placeholder();
        }
        self.resolve(attribute, slot).unwrap_or_else(placeholder)
    }

    /// Resolve an optional field
    pub fn optional<T>(&mut self, attribute: S::Attribute, slot: FieldSlot<T>) -> Option<T>
    where
        T: HasLoadExceptionTree,
    {
        self.resolve(attribute, slot)
    }

    fn resolve<T>(&mut self, attribute: S::Attribute, slot: FieldSlot<T>) -> Option<T>
    where
        T: HasLoadExceptionTree,
    {
        let (value, error) = slot.into_parts();
        if let Some(e) = error {
            log_failure(S::NAME, &attribute, None::<&usize>, &e);
            self.tree.attach_error(attribute, e);
        } else if let Some(child) = value.as_ref().and_then(|v| v.as_load_exception_tree()) {
            self.tree.attach(attribute, child);
        }
        if value.is_some() {
            self.resolved.insert(attribute);
        }
        value
    }

    /// Resolve a list field
    ///
    /// The list's node holds the bulk failure and one child per failed index,
    /// or per element whose own tree has exceptions.
    pub fn list<T>(&mut self, attribute: S::Attribute, slot: ListSlot<T>) -> Vec<T>
    where
        T: HasLoadExceptionTree,
    {
        let (items, bulk_error, element_errors) = slot.into_parts();
        let node = element_tree(
            S::NAME,
            &attribute,
            bulk_error,
            element_errors,
            items.iter().enumerate(),
        );
        self.tree.attach_tree(attribute, node);
        self.resolved.insert(attribute);
        items
    }

    /// Resolve a map field; children are keyed by map key
    pub fn map<K, V>(&mut self, attribute: S::Attribute, slot: MapSlot<K, V>) -> IndexMap<K, V>
    where
        K: TreeKey,
        V: HasLoadExceptionTree,
    {
        let (entries, bulk_error, entry_errors) = slot.into_parts();
        let node = element_tree(
            S::NAME,
            &attribute,
            bulk_error,
            entry_errors,
            entries.iter().map(|(k, v)| (k.clone(), v)),
        );
        self.tree.attach_tree(attribute, node);
        self.resolved.insert(attribute);
        entries
    }

    /// Finish the tree
    ///
    /// # Errors
    /// In strict mode, [`BuildError::IllegalState`] naming every required
    /// field that did not receive a real value.
    pub fn finish(self) -> Result<ExceptionTree<S::Attribute>, BuildError> {
        if self.mode.is_strict() {
            let missing: Vec<String> = S::required_fields()
                .filter(|a| !self.resolved.contains(a))
                .map(|a| a.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::missing_required(S::NAME, missing));
            }
        }
        Ok(self.tree.build())
    }
}

fn element_tree<'a, K, V, I>(
    shape: &'static str,
    attribute: &impl TreeKey,
    bulk_error: Option<SupplyError>,
    mut element_errors: IndexMap<K, SupplyError>,
    elements: I,
) -> ExceptionTree<K>
where
    K: TreeKey,
    V: HasLoadExceptionTree + 'a,
    I: Iterator<Item = (K, &'a V)>,
{
    let mut node = ExceptionTreeBuilder::new();
    if let Some(e) = &bulk_error {
        log_failure(shape, attribute, None::<&usize>, e);
    }
    node.set_supply_error(bulk_error);
    for (key, value) in elements {
        if let Some(e) = element_errors.shift_remove(&key) {
            log_failure(shape, attribute, Some(&key), &e);
            node.attach_error(key, e);
        } else if let Some(child) = value.as_load_exception_tree() {
            node.attach(key, child);
        }
    }
    node.build()
}

fn log_failure(
    shape: &'static str,
    attribute: &impl TreeKey,
    element: Option<&impl TreeKey>,
    error: &SupplyError,
) {
    match element {
        Some(key) => tracing::debug!(
            shape,
            field = %attribute,
            element = %key,
            error = %error,
            "element could not be loaded, using fallback"
        ),
        None => tracing::debug!(
            shape,
            field = %attribute,
            error = %error,
            "value could not be loaded, using default"
        ),
    }
}
