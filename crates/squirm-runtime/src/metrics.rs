//! Census metrics computed from a population.
//!
//! Polymers are the connected components of the bond graph. The graph is
//! rebuilt with `petgraph` on every census, which is fine for occasional
//! reporting but not meant to run every tick.

use crate::population::Population;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{Dfs, VisitMap};
use serde::Serialize;
use squirm_core::types::{CellId, Species, Tick};
use std::collections::{BTreeMap, HashMap};

/// A snapshot of what the world contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Census {
    pub tick: Tick,
    pub cells: usize,
    /// Live cells per species. Every species is present, possibly at zero.
    pub species: BTreeMap<Species, usize>,
    pub bonds: usize,
    /// Cells with at least one bond.
    pub bonded_cells: usize,
    /// Connected groups of two or more bonded cells.
    pub polymers: usize,
    /// Size of the largest polymer, zero when nothing is bonded.
    pub longest_polymer: usize,
}

impl Census {
    pub fn take(population: &Population, tick: Tick) -> Self {
        let mut species: BTreeMap<Species, usize> =
            Species::ALL.iter().map(|&s| (s, 0)).collect();
        for (_, cell) in population.iter() {
            *species.entry(cell.species()).or_default() += 1;
        }

        let graph = bond_graph(population);
        let sizes = component_sizes(&graph);

        Census {
            tick,
            cells: population.len(),
            species,
            bonds: graph.edge_count(),
            bonded_cells: graph.node_count(),
            polymers: sizes.len(),
            longest_polymer: sizes.into_iter().max().unwrap_or(0),
        }
    }
}

/// Bonded cells as nodes, bonds as edges.
fn bond_graph(population: &Population) -> UnGraph<CellId, ()> {
    let mut graph = UnGraph::new_undirected();
    let mut nodes: HashMap<CellId, NodeIndex> = HashMap::new();

    for (id, cell) in population.iter() {
        if !cell.bonds().is_empty() {
            nodes.insert(id, graph.add_node(id));
        }
    }
    for (id, cell) in population.iter() {
        for partner in cell.bonds() {
            // each bond is stored on both ends; add it from one side only
            if id < *partner {
                if let (Some(&a), Some(&b)) = (nodes.get(&id), nodes.get(partner)) {
                    graph.add_edge(a, b, ());
                }
            }
        }
    }
    graph
}

fn component_sizes(graph: &UnGraph<CellId, ()>) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut dfs = Dfs::empty(graph);
    for start in graph.node_indices() {
        if dfs.discovered.is_visited(&start) {
            continue;
        }
        dfs.move_to(start);
        let mut size = 0;
        while dfs.next(graph).is_some() {
            size += 1;
        }
        sizes.push(size);
    }
    sizes
}
