//! Static cycle detection
//!
//! Walks required constructor dependencies only. Factory and instance
//! bindings are opaque and contribute no edges.

use crate::introspection::required_dependencies;
use std::collections::{HashMap, HashSet, VecDeque};
use wirebox_domain::{Error, RegistryView, Result, ServiceKey};

fn successors(key: &ServiceKey, registry: &dyn RegistryView) -> Vec<ServiceKey> {
    registry
        .get_service_implementation(key)
        .map(|implementation| {
            let mut keys: Vec<ServiceKey> = Vec::new();
            for dependency in required_dependencies(&implementation) {
                if !keys.contains(&dependency.key) {
                    keys.push(dependency.key);
                }
            }
            keys
        })
        .unwrap_or_default()
}

/// Fail if any cycle is reachable from `start`
///
/// The error path starts at the first repeated key and ends with it again,
/// e.g. `[A, B, A]`.
pub fn detect_circular_dependencies(start: &ServiceKey, registry: &dyn RegistryView) -> Result<()> {
    let mut path = Vec::new();
    let mut finished = HashSet::new();
    visit(start, registry, &mut path, &mut finished)
}

fn visit(
    key: &ServiceKey,
    registry: &dyn RegistryView,
    path: &mut Vec<ServiceKey>,
    finished: &mut HashSet<ServiceKey>,
) -> Result<()> {
    if let Some(position) = path.iter().position(|entry| entry == key) {
        let mut cycle = path[position..].to_vec();
        cycle.push(key.clone());
        return Err(Error::circular(cycle));
    }
    if finished.contains(key) {
        return Ok(());
    }

    path.push(key.clone());
    for next in successors(key, registry) {
        visit(&next, registry, path, finished)?;
    }
    path.pop();
    finished.insert(key.clone());
    Ok(())
}

/// Dependency graph of the implementation bindings, indexed by position
///
/// Keys are kept in registry order, so a smaller index means a smaller key.
struct Graph {
    keys: Vec<ServiceKey>,
    edges: Vec<Vec<usize>>,
}

impl Graph {
    fn snapshot(registry: &dyn RegistryView) -> Self {
        let registrations = registry.get_all_registrations();
        let keys: Vec<ServiceKey> = registrations.keys().cloned().collect();
        let positions: HashMap<&ServiceKey, usize> =
            keys.iter().enumerate().map(|(index, key)| (key, index)).collect();

        let edges = registrations
            .values()
            .map(|implementation| {
                let mut targets = Vec::new();
                for dependency in required_dependencies(implementation) {
                    if let Some(&target) = positions.get(&dependency.key) {
                        if !targets.contains(&target) {
                            targets.push(target);
                        }
                    }
                }
                targets
            })
            .collect();

        Self { keys, edges }
    }

    fn keys_of(&self, nodes: &[usize]) -> Vec<ServiceKey> {
        nodes.iter().map(|&node| self.keys[node].clone()).collect()
    }

    fn has_self_loop(&self, node: usize) -> bool {
        self.edges[node].contains(&node)
    }
}

/// Tarjan's strongly connected components
struct Components<'g> {
    graph: &'g Graph,
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    found: Vec<Vec<usize>>,
}

impl<'g> Components<'g> {
    fn of(graph: &'g Graph) -> Vec<Vec<usize>> {
        let size = graph.keys.len();
        let mut components = Self {
            graph,
            index: vec![None; size],
            lowlink: vec![0; size],
            on_stack: vec![false; size],
            stack: Vec::new(),
            next_index: 0,
            found: Vec::new(),
        };
        for node in 0..size {
            if components.index[node].is_none() {
                components.connect(node);
            }
        }
        components.found
    }

    fn connect(&mut self, node: usize) {
        let graph = self.graph;
        self.index[node] = Some(self.next_index);
        self.lowlink[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;

        for &next in &graph.edges[node] {
            match self.index[next] {
                None => {
                    self.connect(next);
                    self.lowlink[node] = self.lowlink[node].min(self.lowlink[next]);
                }
                Some(index) if self.on_stack[next] => {
                    self.lowlink[node] = self.lowlink[node].min(index);
                }
                Some(_) => {}
            }
        }

        if self.index[node] == Some(self.lowlink[node]) {
            let mut component = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack[member] = false;
                component.push(member);
                if member == node {
                    break;
                }
            }
            component.sort_unstable();
            self.found.push(component);
        }
    }
}

/// Shortest cycle through the smallest member of a component
fn shortest_cycle(graph: &Graph, members: &[usize]) -> Vec<usize> {
    let Some(&start) = members.first() else {
        return Vec::new();
    };
    if graph.has_self_loop(start) {
        return vec![start, start];
    }

    let inside: HashSet<usize> = members.iter().copied().collect();
    let mut parent: HashMap<usize, usize> = HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        for &next in &graph.edges[node] {
            if next == start {
                let mut tail = vec![start];
                let mut cursor = node;
                while cursor != start {
                    tail.push(cursor);
                    match parent.get(&cursor) {
                        Some(&previous) => cursor = previous,
                        None => break,
                    }
                }
                tail.push(start);
                tail.reverse();
                return tail;
            }
            if inside.contains(&next) && !parent.contains_key(&next) {
                parent.insert(next, node);
                queue.push_back(next);
            }
        }
    }
    vec![start, start]
}

/// Cyclic strongly connected components and one cycle through each
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleAnalysis {
    /// Members of every component that contains a cycle, sorted
    pub components: Vec<Vec<ServiceKey>>,
    /// One shortest cycle per component, in the same order
    pub cycles: Vec<Vec<ServiceKey>>,
}

impl CycleAnalysis {
    /// True when no component contains a cycle
    pub fn is_acyclic(&self) -> bool {
        self.components.is_empty()
    }
}

/// Split the implementation graph into components and keep the cyclic ones
///
/// Runs in time linear in the number of bindings and edges. A component is
/// cyclic when it has more than one member or a member that depends on
/// itself.
pub fn analyze_cycles(registry: &dyn RegistryView) -> CycleAnalysis {
    let graph = Graph::snapshot(registry);
    let mut cyclic: Vec<Vec<usize>> = Components::of(&graph)
        .into_iter()
        .filter(|members| {
            members.len() > 1 || members.first().is_some_and(|&node| graph.has_self_loop(node))
        })
        .collect();
    cyclic.sort_unstable_by_key(|members| members.first().copied());

    CycleAnalysis {
        cycles: cyclic
            .iter()
            .map(|members| graph.keys_of(&shortest_cycle(&graph, members)))
            .collect(),
        components: cyclic.iter().map(|members| graph.keys_of(members)).collect(),
    }
}

/// One cycle for every cyclic component among the registered implementations
///
/// Each cycle starts at the smallest key of its component and is closed with
/// that key again. Components are disjoint, so no cycle is reported twice.
pub fn find_cycles(registry: &dyn RegistryView) -> Vec<Vec<ServiceKey>> {
    analyze_cycles(registry).cycles
}
