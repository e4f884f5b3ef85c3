use std::collections::{BTreeMap, BTreeSet};

use crate::form::{FormComponent, FormSchema};

/// Visits every component in `components` depth-first, parents before
/// children, descending through direct children, columns and grid cells.
///
/// Uses an explicit stack, so nesting depth is bounded by memory rather
/// than by the call stack.
pub fn for_each_component<'a>(
    components: &'a [FormComponent],
    mut visitor: impl FnMut(&'a FormComponent),
) {
    let mut pending = vec![components.iter()];

    while let Some(siblings) = pending.last_mut() {
        let Some(component) = siblings.next() else {
            pending.pop();
            continue;
        };

        visitor(component);

        let children = component.child_sequences().collect::<Vec<_>>();
        pending.extend(children.into_iter().rev().map(<[FormComponent]>::iter));
    }
}

/// Counts every component in `components`, including all nested ones.
#[must_use]
pub fn component_complexity(components: &[FormComponent]) -> usize {
    let mut count = 0;
    for_each_component(components, |_| count += 1);
    count
}

/// Collects component keys in traversal order, duplicates included.
///
/// Components without a key, or with a blank one, are skipped.
#[must_use]
pub fn component_keys(components: &[FormComponent]) -> Vec<&str> {
    let mut keys = Vec::new();
    for_each_component(components, |component| {
        if let Some(key) = component.key().filter(|key| !key.trim().is_empty()) {
            keys.push(key);
        }
    });
    keys
}

impl FormSchema {
    /// Returns the total number of components at any depth.
    #[must_use]
    pub fn complexity(&self) -> usize {
        component_complexity(self.components())
    }

    /// Returns every component key in traversal order, duplicates included.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        component_keys(self.components())
    }

    /// Returns the distinct set of component keys.
    #[must_use]
    pub fn key_set(&self) -> BTreeSet<&str> {
        self.keys().into_iter().collect()
    }

    /// Returns keys used by more than one component, sorted.
    #[must_use]
    pub fn duplicate_keys(&self) -> Vec<String> {
        let mut occurrences = BTreeMap::<&str, usize>::new();
        for key in self.keys() {
            *occurrences.entry(key).or_default() += 1;
        }

        occurrences
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(key, _)| key.to_owned())
            .collect()
    }
}
