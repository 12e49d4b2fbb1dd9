//! Dependency graph rendering

use crate::registry::ServiceRegistry;
use serde::Serialize;
use std::fmt::Write as _;
use wirebox_domain::{BindingKind, DependencyEdge, Scope, ServiceKey};
use wirebox_validate::dependency_edges;

/// One registered key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Registered key
    pub key: ServiceKey,
    /// How the key is bound
    pub binding: BindingKind,
    /// Lifetime of its instances
    pub scope: Scope,
    /// Skipped by warm-up
    pub lazy: bool,
    /// A singleton has been built
    pub cached: bool,
    /// Concrete type, for constructor bindings
    pub implementation: Option<String>,
}

/// Registered keys and the constructor edges between them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    /// Registered keys, sorted
    pub nodes: Vec<GraphNode>,
    /// Constructor dependencies, in node order then parameter order
    pub edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Snapshot the registry
    ///
    /// Factory and instance bindings appear as nodes without outgoing edges.
    pub fn from_registry(registry: &ServiceRegistry) -> Self {
        let mut graph = Self::default();
        for descriptor in registry.descriptors() {
            let key = descriptor.key().clone();
            let implementation = descriptor.implementation();
            if let Some(implementation) = implementation {
                graph.edges.extend(dependency_edges(&key, implementation));
            }
            graph.nodes.push(GraphNode {
                cached: registry.has_singleton(&key),
                key,
                binding: descriptor.binding_kind(),
                scope: descriptor.scope(),
                lazy: descriptor.is_lazy(),
                implementation: implementation.map(|imp| imp.type_name().to_string()),
            });
        }
        graph
    }

    /// Edges leaving `key`
    pub fn dependencies_of<'a>(&'a self, key: &'a ServiceKey) -> impl Iterator<Item = &'a DependencyEdge> + 'a {
        self.edges.iter().filter(move |edge| &edge.from == key)
    }

    /// Edges arriving at `key`
    pub fn dependents_of<'a>(&'a self, key: &'a ServiceKey) -> impl Iterator<Item = &'a DependencyEdge> + 'a {
        self.edges.iter().filter(move |edge| &edge.to == key)
    }

    /// Dependency targets with no registration
    pub fn missing(&self) -> Vec<&ServiceKey> {
        let mut missing: Vec<&ServiceKey> = self
            .edges
            .iter()
            .map(|edge| &edge.to)
            .filter(|to| !self.nodes.iter().any(|node| &node.key == *to))
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    /// Graphviz DOT rendering
    ///
    /// Optional dependencies are dashed; missing targets are drawn red.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph wirebox {\n    rankdir=LR;\n    node [shape=box];\n");
        for node in &self.nodes {
            let _ = writeln!(
                dot,
                "    \"{}\" [label=\"{}\\n{} {}\"];",
                escape(&node.key),
                escape(&node.key),
                node.scope,
                node.binding
            );
        }
        for key in self.missing() {
            let _ = writeln!(dot, "    \"{}\" [color=red, style=dashed];", escape(key));
        }
        for edge in &self.edges {
            let style = if edge.required { "" } else { ", style=dashed" };
            let _ = writeln!(
                dot,
                "    \"{}\" -> \"{}\" [label=\"{}\"{style}];",
                escape(&edge.from),
                escape(&edge.to),
                edge.parameter
            );
        }
        dot.push_str("}\n");
        dot
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn escape(key: &ServiceKey) -> String {
    key.to_string().replace('"', "\\\"")
}
