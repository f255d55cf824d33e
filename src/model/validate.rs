use std::collections::{HashMap, VecDeque};

use super::phase::Phase;

/// A `dependsOn` entry naming a phase that is not in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingDependency {
    pub phase_id: String,
    pub missing_id: String,
}

/// Every dependency whose target id is absent, in phase order.
pub fn dangling_dependencies(phases: &[Phase]) -> Vec<DanglingDependency> {
    let index = index_by_id(phases);
    phases
        .iter()
        .flat_map(|phase| {
            phase
                .depends_on
                .iter()
                .filter(|dep| !index.contains_key(dep.id.as_str()))
                .map(|dep| DanglingDependency {
                    phase_id: phase.id.clone(),
                    missing_id: dep.id.clone(),
                })
        })
        .collect()
}

/// One dependency cycle as a list of ids, each a predecessor of the next
/// (and the last a predecessor of the first). `None` when the graph is
/// acyclic. Dangling ids are ignored.
pub fn find_dependency_cycle(phases: &[Phase]) -> Option<Vec<String>> {
    let index = index_by_id(phases);
    let preds: Vec<Vec<usize>> = phases
        .iter()
        .map(|p| {
            p.depends_on
                .iter()
                .filter_map(|dep| index.get(dep.id.as_str()).copied())
                .collect()
        })
        .collect();

    let mut succs = vec![Vec::new(); phases.len()];
    for (i, ps) in preds.iter().enumerate() {
        for &p in ps {
            succs[p].push(i);
        }
    }

    // Kahn's pass: whatever is never released sits on or behind a cycle.
    let mut indegree: Vec<usize> = preds.iter().map(Vec::len).collect();
    let mut released = vec![false; phases.len()];
    let mut queue: VecDeque<usize> = (0..phases.len()).filter(|&i| indegree[i] == 0).collect();
    while let Some(i) = queue.pop_front() {
        released[i] = true;
        for &s in &succs[i] {
            indegree[s] -= 1;
            if indegree[s] == 0 {
                queue.push_back(s);
            }
        }
    }

    // Every unreleased node has an unreleased predecessor, so walking
    // predecessors must revisit a node.
    let mut current = (0..phases.len()).find(|&i| !released[i])?;
    let mut path: Vec<usize> = Vec::new();
    let mut seen_at: HashMap<usize, usize> = HashMap::new();
    loop {
        if let Some(&pos) = seen_at.get(&current) {
            let mut cycle: Vec<String> = path[pos..].iter().map(|&i| phases[i].id.clone()).collect();
            cycle.reverse();
            return Some(cycle);
        }
        seen_at.insert(current, path.len());
        path.push(current);
        current = *preds[current].iter().find(|&&p| !released[p])?;
    }
}

/// First occurrence wins when ids repeat.
pub(crate) fn index_by_id(phases: &[Phase]) -> HashMap<&str, usize> {
    let mut index = HashMap::with_capacity(phases.len());
    for (i, phase) in phases.iter().enumerate() {
        index.entry(phase.id.as_str()).or_insert(i);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_dangling_ids() {
        let phases = vec![
            Phase::new("a", "A", 0, 2),
            Phase::new("b", "B", 2, 2).after("a").after("ghost"),
        ];
        assert_eq!(
            dangling_dependencies(&phases),
            vec![DanglingDependency {
                phase_id: "b".to_string(),
                missing_id: "ghost".to_string(),
            }]
        );
    }

    #[test]
    fn acyclic_chain_has_no_cycle() {
        let phases = vec![
            Phase::new("a", "A", 0, 2),
            Phase::new("b", "B", 2, 2).after("a"),
            Phase::new("c", "C", 4, 2).after("a").after("b").after("missing"),
        ];
        assert_eq!(find_dependency_cycle(&phases), None);
    }

    #[test]
    fn finds_three_cycle_in_dependency_order() {
        let phases = vec![
            Phase::new("a", "A", 0, 2).after("c"),
            Phase::new("b", "B", 2, 2).after("a"),
            Phase::new("c", "C", 4, 2).after("b"),
        ];
        assert_eq!(
            find_dependency_cycle(&phases),
            Some(vec!["b".to_string(), "c".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let phases = vec![Phase::new("a", "A", 0, 2), Phase::new("b", "B", 2, 2).after("b")];
        assert_eq!(find_dependency_cycle(&phases), Some(vec!["b".to_string()]));
    }

    #[test]
    fn cycle_downstream_nodes_are_skipped() {
        // d hangs off the a<->b cycle but is not part of it.
        let phases = vec![
            Phase::new("d", "D", 6, 1).after("b"),
            Phase::new("a", "A", 0, 2).after("b"),
            Phase::new("b", "B", 2, 2).after("a"),
        ];
        let cycle = find_dependency_cycle(&phases).unwrap();
        assert_eq!(cycle.len(), 2);
        assert!(cycle.contains(&"a".to_string()));
        assert!(cycle.contains(&"b".to_string()));
    }

    #[test]
    fn empty_list_is_acyclic() {
        assert_eq!(find_dependency_cycle(&[]), None);
        assert!(dangling_dependencies(&[]).is_empty());
    }
}
