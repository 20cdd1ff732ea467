// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Occurrence counting
//!
//! Counts, for every node reachable from a root, the number of distinct parent
//! positions that reference it. Each distinct node is expanded exactly once, so
//! the pass is linear in the number of distinct nodes rather than in the size of
//! the term when unfolded to a tree.
//!
//! Nodes referenced from more than one position are "shared"; the shared nodes
//! worth naming drive let-lifting in the translator and memoization in the
//! evaluator.

use crate::{TermF, TermId, TermStore};
use std::collections::BTreeMap;

/// Occurrence count of every node reachable from `root` (the root counts once)
pub fn count_occurrences(store: &TermStore, root: TermId) -> BTreeMap<TermId, usize> {
    count_occurrences_by(store, root, |node| node.children().collect())
}

/// Like `count_occurrences`, but only follows the child positions selected by
/// `children`. Consumers that never look inside some positions (e.g., the type
/// of a free variable) use this so those positions do not count as uses.
pub fn count_occurrences_by<C>(store: &TermStore, root: TermId, children: C) -> BTreeMap<TermId, usize>
where
    C: Fn(&TermF) -> Vec<TermId>,
{
    let mut counts = BTreeMap::new();
    counts.insert(root, 1);
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        for child in children(store.get(id)) {
            let count = counts.entry(child).or_insert(0);
            *count += 1;
            // First reference: expand the child once
            if *count == 1 {
                stack.push(child);
            }
        }
    }

    counts
}

/// Whether a node is worth binding to a name when shared.
///
/// Trivial leaves are cheaper to repeat than to name, and nodes with loose bound
/// variables cannot be hoisted out of their binders.
pub fn is_memoizable(store: &TermStore, id: TermId) -> bool {
    !store.get(id).is_trivial() && store.is_closed(id)
}

/// Shared nodes under `root` accepted by `should_memoize`, in ascending ID order.
///
/// Ascending ID order is a dependency order: a node only refers to older nodes.
pub fn shared_terms<F>(store: &TermStore, root: TermId, should_memoize: F) -> Vec<TermId>
where
    F: Fn(&TermStore, TermId) -> bool,
{
    select_shared(store, root, count_occurrences(store, root), should_memoize)
}

/// `shared_terms` over the child positions selected by `children`
pub fn shared_terms_by<C, F>(store: &TermStore, root: TermId, children: C, should_memoize: F) -> Vec<TermId>
where
    C: Fn(&TermF) -> Vec<TermId>,
    F: Fn(&TermStore, TermId) -> bool,
{
    select_shared(store, root, count_occurrences_by(store, root, children), should_memoize)
}

fn select_shared<F>(store: &TermStore, root: TermId, counts: BTreeMap<TermId, usize>, should_memoize: F) -> Vec<TermId>
where
    F: Fn(&TermStore, TermId) -> bool,
{
    let shared: Vec<TermId> = counts
        .into_iter()
        .filter(|&(id, count)| count > 1 && should_memoize(store, id))
        .map(|(id, _)| id)
        .collect();
    log::debug!("{} shared terms under {}", shared.len(), root);
    shared
}
