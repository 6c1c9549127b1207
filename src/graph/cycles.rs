//! Circular-import detection.
//!
//! Depth-first search over the forward map with an explicit recursion stack.
//! When an edge reaches a node currently on the stack, the stack sub-path
//! from that node through the current one (closing with the repeated node) is
//! recorded as one cycle. Vendored-library files are skipped both as roots
//! and as traversal targets.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

type Forward = HashMap<PathBuf, BTreeSet<PathBuf>>;

struct Frame {
    node: PathBuf,
    neighbors: Vec<PathBuf>,
    next: usize,
}

pub fn detect(forward: &Forward, excluded: &[String]) -> Vec<Vec<PathBuf>> {
    let mut cycles = Vec::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();

    let mut roots: Vec<&PathBuf> = forward
        .keys()
        .filter(|path| !is_excluded(path, excluded))
        .collect();
    roots.sort();

    for root in roots {
        if visited.contains(root.as_path()) {
            continue;
        }
        walk(root, forward, excluded, &mut visited, &mut cycles);
    }

    cycles
}

fn walk(
    root: &Path,
    forward: &Forward,
    excluded: &[String],
    visited: &mut HashSet<PathBuf>,
    cycles: &mut Vec<Vec<PathBuf>>,
) {
    let mut frames = vec![frame_for(root, forward)];
    let mut path = vec![root.to_path_buf()];
    let mut on_path: HashMap<PathBuf, usize> = HashMap::new();
    on_path.insert(root.to_path_buf(), 0);

    while !frames.is_empty() {
        let top = frames.len() - 1;
        let next = if frames[top].next < frames[top].neighbors.len() {
            let next = frames[top].neighbors[frames[top].next].clone();
            frames[top].next += 1;
            Some(next)
        } else {
            None
        };

        match next {
            Some(next) => {
                if is_excluded(&next, excluded) {
                    continue;
                }
                if let Some(&pos) = on_path.get(&next) {
                    let mut cycle: Vec<PathBuf> = path[pos..].to_vec();
                    cycle.push(next);
                    cycles.push(cycle);
                } else if !visited.contains(&next) {
                    on_path.insert(next.clone(), path.len());
                    path.push(next.clone());
                    frames.push(frame_for(&next, forward));
                }
            }
            None => {
                if let Some(frame) = frames.pop() {
                    on_path.remove(&frame.node);
                    path.pop();
                    visited.insert(frame.node);
                }
            }
        }
    }
}

fn frame_for(node: &Path, forward: &Forward) -> Frame {
    let neighbors = forward
        .get(node)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();
    Frame {
        node: node.to_path_buf(),
        neighbors,
        next: 0,
    }
}

fn is_excluded(path: &Path, excluded: &[String]) -> bool {
    path.components()
        .any(|c| excluded.iter().any(|e| c.as_os_str() == e.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward(pairs: &[(&str, &[&str])]) -> Forward {
        pairs
            .iter()
            .map(|(file, targets)| {
                (
                    PathBuf::from(file),
                    targets.iter().map(PathBuf::from).collect(),
                )
            })
            .collect()
    }

    fn members(cycle: &[PathBuf]) -> BTreeSet<&Path> {
        cycle.iter().map(PathBuf::as_path).collect()
    }

    #[test]
    fn two_node_cycle() {
        let fwd = forward(&[("a.ts", &["b.ts"]), ("b.ts", &["a.ts"])]);
        let cycles = detect(&fwd, &[]);
        assert_eq!(cycles.len(), 1);
        assert_eq!(
            members(&cycles[0]),
            [Path::new("a.ts"), Path::new("b.ts")].into_iter().collect()
        );
        // The entry node closes the recorded path.
        assert_eq!(cycles[0].first(), cycles[0].last());
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        let fwd = forward(&[("a.ts", &["b.ts"]), ("b.ts", &["c.ts"]), ("c.ts", &[])]);
        assert!(detect(&fwd, &[]).is_empty());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let fwd = forward(&[("a.ts", &["a.ts"])]);
        let cycles = detect(&fwd, &[]);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec![PathBuf::from("a.ts"), PathBuf::from("a.ts")]);
    }

    #[test]
    fn longer_cycle_keeps_the_sub_path() {
        let fwd = forward(&[
            ("a.ts", &["b.ts"]),
            ("b.ts", &["c.ts"]),
            ("c.ts", &["b.ts"]),
        ]);
        let cycles = detect(&fwd, &[]);
        assert_eq!(cycles.len(), 1);
        // Only b and c are on the loop; a is an on-ramp.
        assert_eq!(
            members(&cycles[0]),
            [Path::new("b.ts"), Path::new("c.ts")].into_iter().collect()
        );
    }

    #[test]
    fn disjoint_cycles_are_both_found() {
        let fwd = forward(&[
            ("a.ts", &["b.ts"]),
            ("b.ts", &["a.ts"]),
            ("c.ts", &["d.ts"]),
            ("d.ts", &["c.ts"]),
        ]);
        assert_eq!(detect(&fwd, &[]).len(), 2);
    }

    #[test]
    fn excluded_components_are_skipped() {
        let fwd = forward(&[
            ("node_modules/dep/a.js", &["node_modules/dep/b.js"]),
            ("node_modules/dep/b.js", &["node_modules/dep/a.js"]),
            ("src/ok.ts", &["node_modules/dep/a.js"]),
        ]);
        assert!(detect(&fwd, &["node_modules".to_string()]).is_empty());
    }

    #[test]
    fn empty_graph() {
        assert!(detect(&Forward::new(), &[]).is_empty());
    }
}
