//! Record-level reference graph
//!
//! Before items are emitted, every relationship is resolved once without emitting
//! anything. The resulting edges between top-level records are grouped into strongly
//! connected components: records in the same component reference each other, directly or
//! through other records.
//!
//! Plain `static` items can close a cycle with `&'static` references, so in the static style
//! only copies and boxes inside a component are blocked. A `LazyLock` item forces its targets
//! while initializing, so a lazy cycle would deadlock on first access. In the lazy style only
//! edges inside a component that point back to a record emitted earlier are blocked: the
//! remaining edges all point forward in emission order, and cannot form a cycle.

use crate::dataset::Dataset;
use crate::reference::{
    EdgeFilter, LinkKind, RecordId, ReferenceBinding, SourceIds, find_match, target_dataset,
};
use structgen_core::{DeclarationStyle, StructValue, Value};

/// A resolved relationship between two top-level records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: RecordId,
    pub to: RecordId,
    pub link: LinkKind,
}

/// Every relationship edge of a run
pub fn collect_edges(datasets: &[Dataset]) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (d, dataset) in datasets.iter().enumerate() {
        for (r, record) in dataset.records.iter().enumerate() {
            walk_struct(datasets, (d, r), record, &mut edges);
        }
    }
    edges
}

fn walk_struct(datasets: &[Dataset], from: RecordId, owner: &StructValue, out: &mut Vec<Edge>) {
    for field in &owner.fields {
        if !field.public {
            continue;
        }

        if let Ok(Some(binding)) = ReferenceBinding::analyze(owner, field) {
            // A bound field is replaced by references or a placeholder, never its own value
            let (Some(target), Some(ids)) = (
                target_dataset(datasets, &binding.target),
                binding.source_ids(owner),
            ) else {
                continue;
            };
            let ids = match ids {
                SourceIds::One(id) => vec![id],
                SourceIds::Many(ids) => ids,
            };
            for id in ids.into_iter().filter(|id| !id.is_empty()) {
                if let Some(index) = find_match(datasets, target, id, Some(from)) {
                    out.push(Edge {
                        from,
                        to: (target, index),
                        link: binding.link,
                    });
                }
            }
            continue;
        }

        walk_value(datasets, from, &field.value, out);
    }
}

fn walk_value(datasets: &[Dataset], from: RecordId, value: &Value, out: &mut Vec<Edge>) {
    match value {
        Value::Struct(s) => walk_struct(datasets, from, s, out),
        Value::Sequence { items, .. } => {
            for item in items {
                walk_value(datasets, from, item, out);
            }
        }
        Value::Map { entries, .. } => {
            for (k, v) in entries {
                walk_value(datasets, from, k, out);
                walk_value(datasets, from, v, out);
            }
        }
        Value::Pointer { pointee, .. } => walk_value(datasets, from, pointee, out),
        Value::Optional {
            value: Some(inner), ..
        }
        | Value::Dynamic(Some(inner)) => walk_value(datasets, from, inner, out),
        _ => {}
    }
}

/// Strongly connected components of the record graph
#[derive(Debug, Clone)]
pub struct LinkGraph {
    offsets: Vec<usize>,
    component: Vec<usize>,
    edges: Vec<Edge>,
    cyclic: bool,
}

impl LinkGraph {
    pub fn build(datasets: &[Dataset]) -> Self {
        let mut offsets = Vec::with_capacity(datasets.len());
        let mut total = 0;
        for dataset in datasets {
            offsets.push(total);
            total += dataset.len();
        }

        let edges = collect_edges(datasets);
        let node = |(d, r): RecordId| offsets[d] + r;

        let mut adjacency = vec![Vec::new(); total];
        let mut reverse = vec![Vec::new(); total];
        for edge in &edges {
            adjacency[node(edge.from)].push(node(edge.to));
            reverse[node(edge.to)].push(node(edge.from));
        }

        let component = components(&adjacency, &reverse);

        let mut sizes = vec![0usize; total];
        for &c in &component {
            sizes[c] += 1;
        }
        let cyclic = sizes.iter().any(|&n| n > 1) || edges.iter().any(|e| e.from == e.to);

        Self {
            offsets,
            component,
            edges,
            cyclic,
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether any record references itself, directly or transitively
    pub fn has_cycle(&self) -> bool {
        self.cyclic
    }

    pub fn same_component(&self, a: RecordId, b: RecordId) -> bool {
        match (self.component_of(a), self.component_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Whether `from -> to` stays in a cycle and points at a record emitted no later than `from`
    pub fn is_back_edge(&self, from: RecordId, to: RecordId) -> bool {
        match (self.node(from), self.node(to)) {
            (Some(a), Some(b)) => b <= a && self.same_component(from, to),
            _ => false,
        }
    }

    fn node(&self, (d, r): RecordId) -> Option<usize> {
        self.offsets.get(d).map(|offset| offset + r)
    }

    fn component_of(&self, id: RecordId) -> Option<usize> {
        self.component.get(self.node(id)?).copied()
    }

    /// Edge filter for emitting with `style`
    pub fn filter(&self, style: DeclarationStyle) -> CycleFilter<'_> {
        CycleFilter {
            graph: self,
            lazy: style != DeclarationStyle::Static,
        }
    }
}

/// Blocks edges that would close a cycle the declaration style cannot express
pub struct CycleFilter<'g> {
    graph: &'g LinkGraph,
    lazy: bool,
}

impl EdgeFilter for CycleFilter<'_> {
    fn is_blocked(&self, from: RecordId, to: RecordId, link: LinkKind) -> bool {
        if self.lazy {
            self.graph.is_back_edge(from, to)
        } else {
            link != LinkKind::Ref && self.graph.same_component(from, to)
        }
    }
}

/// Kosaraju's algorithm, iterative; returns the component index of every node
fn components(adjacency: &[Vec<usize>], reverse: &[Vec<usize>]) -> Vec<usize> {
    let n = adjacency.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut stack = vec![(start, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (v, i) = *top;
            if let Some(&w) = adjacency[v].get(i) {
                top.1 += 1;
                if !visited[w] {
                    visited[w] = true;
                    stack.push((w, 0));
                }
            } else {
                order.push(v);
                stack.pop();
            }
        }
    }

    let mut component = vec![usize::MAX; n];
    let mut next = 0;
    for &start in order.iter().rev() {
        if component[start] != usize::MAX {
            continue;
        }
        component[start] = next;
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            for &w in &reverse[v] {
                if component[w] == usize::MAX {
                    component[w] = next;
                    stack.push(w);
                }
            }
        }
        next += 1;
    }

    component
}

#[cfg(test)]
#[path = "link/link_tests.rs"]
mod link_tests;
