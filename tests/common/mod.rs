#![allow(dead_code)]

pub use tododag_test_utils::builders;
pub use tododag_test_utils::{adjacency, init_tracing, with_timeout};

use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use tododag::types::Adjacency;

/// Independent acyclicity check via petgraph.
pub fn is_cyclic(adjacency: &Adjacency) -> bool {
    let mut graph: DiGraphMap<u64, ()> = DiGraphMap::new();
    for (task, prerequisites) in adjacency {
        graph.add_node(*task);
        for p in prerequisites {
            graph.add_edge(*task, *p, ());
        }
    }
    is_cyclic_directed(&graph)
}
