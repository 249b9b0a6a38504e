//! CFG ordering with petgraph
//!
//! Validates a `Function`'s block structure and lays it out as a `DiGraph`
//! so the propagator can visit blocks in reverse post-order and walk
//! incoming edges together with their branch direction.

use crate::errors::{AnalysisError, Result};
use crate::shared::models::{BlockId, Function, Terminator};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{DfsPostOrder, EdgeRef};
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};

/// Kind of a CFG edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// `Goto`
    Jump,
    /// Branch taken when the condition holds
    TrueBranch,
    /// Branch taken when the condition fails
    FalseBranch,
}

/// Block graph of one function
#[derive(Debug)]
pub struct CfgOrder {
    /// Graph (block ids + typed edges)
    graph: DiGraph<BlockId, EdgeKind>,

    /// Block ID → Node index mapping
    block_to_node: FxHashMap<BlockId, NodeIndex>,

    /// Block ID → position in `function.blocks`
    block_to_slot: FxHashMap<BlockId, usize>,

    /// Reachable blocks in reverse post-order
    rpo: Vec<BlockId>,

    /// Block ID → RPO position
    rpo_index: FxHashMap<BlockId, usize>,

    /// Targets of retreating edges (predecessor at or after the target in RPO)
    loop_headers: FxHashSet<BlockId>,
}

impl CfgOrder {
    /// Build the block graph, rejecting structurally invalid CFGs:
    /// duplicate block ids, a missing entry block, or a successor that
    /// names no block.
    pub fn build(function: &Function) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(function.blocks.len(), function.blocks.len() * 2);
        let mut block_to_node = FxHashMap::default();
        let mut block_to_slot = FxHashMap::default();

        for (slot, block) in function.blocks.iter().enumerate() {
            if block_to_node.contains_key(&block.id) {
                return Err(AnalysisError::invalid_cfg(format!(
                    "function '{}': duplicate block id '{}'",
                    function.name, block.id
                )));
            }
            let node = graph.add_node(block.id.clone());
            block_to_node.insert(block.id.clone(), node);
            block_to_slot.insert(block.id.clone(), slot);
        }

        let entry = *block_to_node.get(&function.entry).ok_or_else(|| {
            AnalysisError::invalid_cfg(format!(
                "function '{}': entry block '{}' not found",
                function.name, function.entry
            ))
        })?;

        for block in &function.blocks {
            let from = block_to_node[&block.id];
            let edges: Vec<(&BlockId, EdgeKind)> = match &block.terminator {
                Terminator::Goto { target } => vec![(target, EdgeKind::Jump)],
                Terminator::Branch {
                    then_block,
                    else_block,
                    ..
                } => vec![
                    (then_block, EdgeKind::TrueBranch),
                    (else_block, EdgeKind::FalseBranch),
                ],
                Terminator::Return => Vec::new(),
            };

            for (target, kind) in edges {
                let to = *block_to_node.get(target).ok_or_else(|| {
                    AnalysisError::invalid_cfg(format!(
                        "function '{}': block '{}' jumps to unknown block '{}'",
                        function.name, block.id, target
                    ))
                })?;
                graph.add_edge(from, to, kind);
            }
        }

        let mut post_order = Vec::with_capacity(function.blocks.len());
        let mut dfs = DfsPostOrder::new(&graph, entry);
        while let Some(node) = dfs.next(&graph) {
            post_order.push(graph[node].clone());
        }
        post_order.reverse();

        let rpo_index: FxHashMap<BlockId, usize> = post_order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut loop_headers = FxHashSet::default();
        for edge in graph.edge_references() {
            let (source, target) = (&graph[edge.source()], &graph[edge.target()]);
            if let (Some(from), Some(to)) = (rpo_index.get(source), rpo_index.get(target)) {
                if from >= to {
                    loop_headers.insert(target.clone());
                }
            }
        }

        Ok(Self {
            graph,
            block_to_node,
            block_to_slot,
            rpo: post_order,
            rpo_index,
            loop_headers,
        })
    }

    /// Reachable blocks, entry first, in reverse post-order
    pub fn reverse_post_order(&self) -> &[BlockId] {
        &self.rpo
    }

    /// RPO position of a reachable block
    pub fn rpo_position(&self, block: &str) -> Option<usize> {
        self.rpo_index.get(block).copied()
    }

    /// Reachable block entered by a retreating edge
    pub fn is_loop_header(&self, block: &str) -> bool {
        self.loop_headers.contains(block)
    }

    pub fn is_reachable(&self, block: &str) -> bool {
        self.rpo_index.contains_key(block)
    }

    /// Index of the block inside `function.blocks`
    pub fn slot(&self, block: &str) -> Option<usize> {
        self.block_to_slot.get(block).copied()
    }

    /// Incoming edges `(predecessor, kind)`. A branch whose arms both reach
    /// `block` contributes two edges.
    pub fn incoming(&self, block: &str) -> Vec<(&BlockId, EdgeKind)> {
        let Some(&node) = self.block_to_node.get(block) else {
            return Vec::new();
        };
        let mut edges: Vec<(&BlockId, EdgeKind)> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| (&self.graph[edge.source()], *edge.weight()))
            .collect();
        // petgraph yields edges newest first
        edges.reverse();
        edges
    }

    /// Successor block ids
    pub fn successors(&self, block: &str) -> Vec<&BlockId> {
        let Some(&node) = self.block_to_node.get(block) else {
            return Vec::new();
        };
        let mut succs: Vec<&BlockId> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|n| &self.graph[n])
            .collect();
        succs.reverse();
        succs.dedup();
        succs
    }

    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }
}
