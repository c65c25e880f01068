//! Directed graph with change notification

use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Update,
    Remove,
}

/// One mutation, as delivered to change listeners
#[derive(Debug, Clone, PartialEq)]
pub enum Change<N, L, Id> {
    Node { id: Id, data: N, kind: ChangeKind },
    Link { from: Id, to: Id, data: L, kind: ChangeKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef<'g, N, Id> {
    pub id: &'g Id,
    pub data: &'g N,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRef<'g, L, Id> {
    pub from: &'g Id,
    pub to: &'g Id,
    pub data: &'g L,
}

#[derive(Debug, Clone)]
struct NodeEntry<N, L, Id> {
    data: N,
    outgoing: IndexMap<Id, L>,
    incoming: IndexSet<Id>,
}

type Listener<N, L, Id> = Box<dyn FnMut(&[Change<N, L, Id>])>;

/// Directed graph keyed by node id, with at most one link per ordered pair.
///
/// Nodes keep insertion order; links are ordered by source node, then by
/// insertion. Listeners registered with [`Graph::on_change`] receive every
/// mutation, batched per call or per [`Graph::begin_update`] /
/// [`Graph::end_update`] bracket.
///
/// ```
/// use aoc_2023::utils::graph::Graph;
///
/// let mut g: Graph<&str, u32, char> = Graph::new();
/// g.add_node('a', "start");
/// g.add_link('a', 'b', 7);
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.link(&'a', &'b').map(|l| *l.data), Some(7));
/// assert!(g.link(&'b', &'a').is_none());
/// ```
pub struct Graph<N, L = (), Id = String> {
    nodes: IndexMap<Id, NodeEntry<N, L, Id>>,
    link_count: usize,
    listeners: Vec<Listener<N, L, Id>>,
    pending: Vec<Change<N, L, Id>>,
    update_depth: usize,
}

impl<N, L, Id> Graph<N, L, Id>
where
    N: Clone,
    L: Clone,
    Id: Clone + Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            link_count: 0,
            listeners: Vec::new(),
            pending: Vec::new(),
            update_depth: 0,
        }
    }

    /// Register a listener for batches of changes
    pub fn on_change(&mut self, listener: impl FnMut(&[Change<N, L, Id>]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Hold change notifications until the matching [`Graph::end_update`]
    pub fn begin_update(&mut self) {
        self.update_depth += 1;
    }

    pub fn end_update(&mut self) {
        self.update_depth = self.update_depth.saturating_sub(1);
        self.flush();
    }

    fn notifying(&self) -> bool {
        !self.listeners.is_empty()
    }

    fn flush(&mut self) {
        if self.update_depth > 0 || self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        for listener in &mut self.listeners {
            listener(&batch);
        }
    }

    /// Insert a node, or replace the data of an existing one
    pub fn add_node(&mut self, id: Id, data: N) -> ChangeKind {
        let kind = match self.nodes.get_mut(&id) {
            Some(entry) => {
                entry.data = data.clone();
                ChangeKind::Update
            }
            None => {
                self.nodes.insert(
                    id.clone(),
                    NodeEntry {
                        data: data.clone(),
                        outgoing: IndexMap::new(),
                        incoming: IndexSet::new(),
                    },
                );
                ChangeKind::Add
            }
        };
        if self.notifying() {
            self.pending.push(Change::Node { id, data, kind });
        }
        self.flush();
        kind
    }

    pub fn node(&self, id: &Id) -> Option<NodeRef<'_, N, Id>> {
        self.nodes
            .get_key_value(id)
            .map(|(id, entry)| NodeRef {
                id,
                data: &entry.data,
            })
    }

    pub fn contains_node(&self, id: &Id) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn link(&self, from: &Id, to: &Id) -> Option<LinkRef<'_, L, Id>> {
        let (from, entry) = self.nodes.get_key_value(from)?;
        let (to, data) = entry.outgoing.get_key_value(to)?;
        Some(LinkRef { from, to, data })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_count
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_, N, Id>> + '_ {
        self.nodes.iter().map(|(id, entry)| NodeRef {
            id,
            data: &entry.data,
        })
    }

    pub fn links(&self) -> impl Iterator<Item = LinkRef<'_, L, Id>> + '_ {
        self.nodes.iter().flat_map(|(from, entry)| {
            entry
                .outgoing
                .iter()
                .map(move |(to, data)| LinkRef { from, to, data })
        })
    }

    /// Neighbours of `id` with the data of the connecting link.
    ///
    /// With `oriented` only outgoing links count; otherwise incoming links
    /// are included too.
    pub fn linked_nodes<'g>(
        &'g self,
        id: &Id,
        oriented: bool,
    ) -> impl Iterator<Item = (&'g Id, &'g L)> + use<'g, N, L, Id> {
        let found = self.nodes.get_key_value(id);
        let outgoing = found.into_iter().flat_map(|(_, entry)| entry.outgoing.iter());
        let incoming = found
            .into_iter()
            .filter(move |_| !oriented)
            .flat_map(move |(key, entry)| {
                entry.incoming.iter().filter_map(move |from| {
                    self.nodes
                        .get(from)
                        .and_then(|source| source.outgoing.get(key))
                        .map(|data| (from, data))
                })
            });
        outgoing.chain(incoming)
    }

    /// Remove one link, returning its data
    pub fn remove_link(&mut self, from: &Id, to: &Id) -> Option<L> {
        let data = self.nodes.get_mut(from)?.outgoing.shift_remove(to)?;
        if let Some(target) = self.nodes.get_mut(to) {
            target.incoming.shift_remove(from);
        }
        self.link_count -= 1;
        if self.notifying() {
            self.pending.push(Change::Link {
                from: from.clone(),
                to: to.clone(),
                data: data.clone(),
                kind: ChangeKind::Remove,
            });
        }
        self.flush();
        Some(data)
    }

    /// Remove a node and every link touching it
    pub fn remove_node(&mut self, id: &Id) -> Option<N> {
        let entry = self.nodes.get(id)?;
        let outgoing: Vec<Id> = entry.outgoing.keys().cloned().collect();
        let incoming: Vec<Id> = entry.incoming.iter().cloned().collect();

        self.begin_update();
        for to in &outgoing {
            self.remove_link(id, to);
        }
        for from in &incoming {
            self.remove_link(from, id);
        }
        let removed = self.nodes.shift_remove(id).map(|entry| entry.data);
        if let Some(data) = &removed {
            if self.notifying() {
                self.pending.push(Change::Node {
                    id: id.clone(),
                    data: data.clone(),
                    kind: ChangeKind::Remove,
                });
            }
        }
        self.end_update();
        removed
    }

    pub fn clear(&mut self) {
        let ids: Vec<Id> = self.nodes.keys().cloned().collect();
        self.begin_update();
        for id in &ids {
            self.remove_node(id);
        }
        self.end_update();
    }

    /// Mutable access to node data; does not notify listeners
    pub fn node_data_mut(&mut self, id: &Id) -> Option<&mut N> {
        self.nodes.get_mut(id).map(|entry| &mut entry.data)
    }
}

impl<N, L, Id> Graph<N, L, Id>
where
    N: Clone + Default,
    L: Clone,
    Id: Clone + Hash + Eq,
{
    /// Insert or replace the link `from -> to`.
    ///
    /// Missing endpoints are created with default data.
    pub fn add_link(&mut self, from: Id, to: Id, data: L) -> ChangeKind {
        self.begin_update();
        for id in [&from, &to] {
            if !self.nodes.contains_key(id) {
                self.add_node(id.clone(), N::default());
            }
        }

        let previous = self
            .nodes
            .get_mut(&from)
            .and_then(|source| source.outgoing.insert(to.clone(), data.clone()));
        let kind = match previous {
            Some(_) => ChangeKind::Update,
            None => ChangeKind::Add,
        };
        if kind == ChangeKind::Add {
            self.link_count += 1;
            if let Some(target) = self.nodes.get_mut(&to) {
                target.incoming.insert(from.clone());
            }
        }
        if self.notifying() {
            self.pending.push(Change::Link {
                from,
                to,
                data,
                kind,
            });
        }
        self.end_update();
        kind
    }
}

impl<N, L, Id> Default for Graph<N, L, Id>
where
    N: Clone,
    L: Clone,
    Id: Clone + Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, L, Id> fmt::Debug for Graph<N, L, Id>
where
    N: fmt::Debug,
    Id: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes.iter().map(|(id, e)| (id, &e.data)).collect::<Vec<_>>())
            .field("link_count", &self.link_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<Vec<Change<String, u32, &'static str>>>>>;

    fn recorded() -> (Graph<String, u32, &'static str>, Log) {
        let log: Log = Rc::default();
        let mut graph = Graph::new();
        let sink = Rc::clone(&log);
        graph.on_change(move |batch| sink.borrow_mut().push(batch.to_vec()));
        (graph, log)
    }

    #[test]
    fn add_node_then_update() {
        let mut g: Graph<String, u32, &str> = Graph::new();
        assert_eq!(g.add_node("hello", "there".to_string()), ChangeKind::Add);
        assert_eq!(g.add_node("hello", "world".to_string()), ChangeKind::Update);
        let node = g.node(&"hello").unwrap();
        assert_eq!(*node.id, "hello");
        assert_eq!(node.data, "world");
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.node(&"hello").map(|n| n.data.as_str()), Some("world"));
        assert!(g.node(&"nope").is_none());
    }

    #[test]
    fn links_create_nodes_and_are_directed() {
        let mut g: Graph<String, u32, &str> = Graph::new();
        g.add_link("a", "b", 1);
        g.add_link("b", "c", 2);
        assert_eq!((g.node_count(), g.link_count()), (3, 2));
        assert_eq!(g.node(&"b").map(|n| n.data.clone()), Some(String::new()));
        assert!(g.link(&"b", &"a").is_none());

        assert_eq!(g.add_link("a", "b", 5), ChangeKind::Update);
        assert_eq!(g.link_count(), 2);
        assert_eq!(g.link(&"a", &"b").map(|l| *l.data), Some(5));

        let out: Vec<_> = g.linked_nodes(&"b", true).map(|(id, l)| (*id, *l)).collect();
        assert_eq!(out, vec![("c", 2)]);
        let both: Vec<_> = g.linked_nodes(&"b", false).map(|(id, l)| (*id, *l)).collect();
        assert_eq!(both, vec![("c", 2), ("a", 5)]);
        assert_eq!(g.linked_nodes(&"zz", false).count(), 0);

        let all: Vec<_> = g.links().map(|l| (*l.from, *l.to)).collect();
        assert_eq!(all, vec![("a", "b"), ("b", "c")]);
    }

    #[test]
    fn change_events_for_nodes() {
        let (mut g, log) = recorded();
        g.add_node("hello", "world".into());
        g.add_node("hello", "there".into());
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(
            log[0],
            vec![Change::Node {
                id: "hello",
                data: "world".into(),
                kind: ChangeKind::Add
            }]
        );
        assert!(matches!(
            &log[1][0],
            Change::Node { kind: ChangeKind::Update, data, .. } if data == "there"
        ));
    }

    #[test]
    fn add_link_batches_endpoint_creation() {
        let (mut g, log) = recorded();
        g.add_link("x", "y", 3);
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        let kinds: Vec<_> = log[0]
            .iter()
            .map(|c| match c {
                Change::Node { id, kind, .. } => format!("node {id} {kind:?}"),
                Change::Link { from, to, kind, .. } => format!("link {from}->{to} {kind:?}"),
            })
            .collect();
        assert_eq!(kinds, vec!["node x Add", "node y Add", "link x->y Add"]);
    }

    #[test]
    fn removal_and_bracketed_updates() {
        let (mut g, log) = recorded();
        g.begin_update();
        g.add_link("a", "b", 1);
        g.add_link("c", "a", 2);
        g.add_node("d", "alone".into());
        assert!(log.borrow().is_empty());
        g.end_update();
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0].len(), 6);

        assert_eq!(g.remove_node(&"a"), Some(String::new()));
        assert_eq!((g.node_count(), g.link_count()), (3, 0));
        assert_eq!(log.borrow()[1].len(), 3);
        assert_eq!(g.remove_link(&"a", &"b"), None);

        g.clear();
        assert_eq!(g.node_count(), 0);
        assert_eq!(log.borrow().len(), 3);
        assert!(log.borrow()[2]
            .iter()
            .all(|c| matches!(c, Change::Node { kind: ChangeKind::Remove, .. })));
    }
}
