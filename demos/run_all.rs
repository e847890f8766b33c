//! Run both solvers on an instance file, sanity-check the trees and the approximation
//! bound of the Kou et al. tree against the exact optimum.

use kou_steiner::instance::Instance;
use kou_steiner::{
    build_metric_closure, solve_approximate, solve_exact, GenericResult, SearchLimits,
    SteinerTree,
};
use std::collections::HashSet;
use std::env;

pub fn main() -> GenericResult<()> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.len() != 1 {
        eprintln!("expected a file name");
        std::process::exit(1);
    }
    let filename = &args[0];
    println!("reading graph...");
    let Instance {
        graph,
        terminals,
        optimal_cost,
    } = Instance::from_file(filename)?;

    println!("exhaustive search...");
    let exact = solve_exact(&graph, &terminals, SearchLimits::unbounded())?.into_tree();
    assert_plausible_steiner_tree(&exact, &terminals);
    println!("exact tree edges = {}", sorted_edges(&exact));
    println!("exact tree weight = {}", exact.total_weight());
    if let Some(optimal) = optimal_cost {
        assert_eq!(exact.total_weight(), optimal, "file states a different optimum");
    }
    println!();

    println!("Kou et al. approximation...");
    let closure = build_metric_closure(&graph)?;
    let kou = solve_approximate(&graph, &terminals, Some(&closure))?;
    assert_plausible_steiner_tree(&kou, &terminals);
    assert_leaves_are_terminals(&kou, &terminals);
    println!("Kou et al. approx. tree edges = {}", sorted_edges(&kou));
    println!("Kou et al. approx. tree weight = {}", kou.total_weight());
    println!();

    println!("Checking upper bound...");
    // The guarantee counts the leaves of an optimal tree.
    let bound = exact.approximation_bound().unwrap_or(1.0);
    assert!(kou.total_weight() as f64 <= bound * exact.total_weight() as f64);
    println!(
        "ratio {:.4} <= bound {:.4}",
        kou.approximation_ratio(exact.total_weight()).unwrap_or(1.0),
        bound
    );
    Ok(())
}

fn sorted_edges(tree: &SteinerTree<u32>) -> String {
    let mut edges = tree
        .edges()
        .iter()
        .map(|e| (e.a.min(e.b), e.a.max(e.b), e.weight))
        .collect::<Vec<_>>();
    edges.sort_unstable();
    format!("{:?}", edges)
}

// Perform some sanity checks on the generated tree.
fn assert_plausible_steiner_tree(tree: &SteinerTree<u32>, terminals: &[u32]) {
    let nodes = tree.nodes().iter().collect::<HashSet<_>>();
    assert!(
        terminals.iter().all(|t| nodes.contains(t)),
        "tree {:?} does not contain all terminals ({:?})",
        tree,
        terminals
    );
    assert!(tree.is_tree(), "{:?} is not a tree", tree);
}

// Check that there are no non-terminal leaves.
fn assert_leaves_are_terminals(tree: &SteinerTree<u32>, terminals: &[u32]) {
    for leaf in tree.leaves() {
        assert!(terminals.contains(leaf), "non-terminal leaf {}", leaf);
    }
}
