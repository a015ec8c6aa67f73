//! Control devices, control paths and the graph they form.
//!
//! Control paths reference controls and other paths through assignments. The
//! references are ids, not pointers; [`ControlPathGraph`] turns them into an
//! indexed directed graph so cycles can be detected explicitly.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pollution control device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Control {
    pub id: Uuid,
    pub identifier: String,
    pub status_code: Option<String>,
    pub status_year: Option<i16>,
    pub control_measure_code: Option<String>,
    pub percent_control: Option<Decimal>,
    pub percent_capture: Option<Decimal>,
    #[serde(default)]
    pub pollutants: Vec<ControlPollutant>,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: String::new(),
            status_code: Some(crate::status::STATUS_OPERATING.to_string()),
            status_year: None,
            control_measure_code: None,
            percent_control: None,
            percent_capture: None,
            pollutants: Vec::new(),
        }
    }
}

impl Control {
    pub fn new(identifier: impl Into<String>, control_measure_code: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            control_measure_code: Some(control_measure_code.into()),
            ..Self::default()
        }
    }

    pub fn is_operating(&self) -> bool {
        crate::status::is_operating(self.status_code.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlPollutant {
    pub pollutant_code: String,
    pub percent_reduction: Option<Decimal>,
}

/// Ordered arrangement of controls (and nested paths) emissions pass through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlPath {
    pub id: Uuid,
    pub identifier: String,
    pub description: Option<String>,
    pub percent_control: Option<Decimal>,
    #[serde(default)]
    pub assignments: Vec<ControlAssignment>,
    #[serde(default)]
    pub pollutants: Vec<ControlPollutant>,
}

impl Default for ControlPath {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: String::new(),
            description: None,
            percent_control: None,
            assignments: Vec::new(),
            pollutants: Vec::new(),
        }
    }
}

impl ControlPath {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }
}

/// Links a control, or a child path, into a path at a sequence position.
/// Exactly one of `control_id` and `child_path_id` is expected to be set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlAssignment {
    pub sequence_number: i32,
    pub control_id: Option<Uuid>,
    pub child_path_id: Option<Uuid>,
    pub percent_apportionment: Decimal,
}

impl ControlAssignment {
    pub fn control(sequence_number: i32, control_id: Uuid, percent_apportionment: Decimal) -> Self {
        Self {
            sequence_number,
            control_id: Some(control_id),
            child_path_id: None,
            percent_apportionment,
        }
    }

    pub fn child_path(sequence_number: i32, path_id: Uuid, percent_apportionment: Decimal) -> Self {
        Self {
            sequence_number,
            control_id: None,
            child_path_id: Some(path_id),
            percent_apportionment,
        }
    }
}

/// Directed graph over the control paths of one facility.
///
/// Node `i` is `paths[i]`; an edge `i -> j` exists when path `i` assigns path `j`
/// as a child. Assignments to unknown path ids are kept aside in `dangling`.
#[derive(Debug, Clone)]
pub struct ControlPathGraph {
    nodes: Vec<Uuid>,
    identifiers: Vec<String>,
    index: HashMap<Uuid, usize>,
    edges: Vec<Vec<usize>>,
    controls: Vec<Vec<Uuid>>,
    dangling: Vec<(usize, Uuid)>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl ControlPathGraph {
    pub fn build(paths: &[ControlPath]) -> Self {
        let index: HashMap<Uuid, usize> = paths
            .iter()
            .enumerate()
            .map(|(i, path)| (path.id, i))
            .collect();

        let mut edges = vec![Vec::new(); paths.len()];
        let mut controls = vec![Vec::new(); paths.len()];
        let mut dangling = Vec::new();

        for (i, path) in paths.iter().enumerate() {
            let mut assignments: Vec<&ControlAssignment> = path.assignments.iter().collect();
            assignments.sort_by_key(|a| a.sequence_number);

            for assignment in assignments {
                if let Some(control_id) = assignment.control_id {
                    controls[i].push(control_id);
                }
                if let Some(child_id) = assignment.child_path_id {
                    match index.get(&child_id) {
                        Some(&j) => edges[i].push(j),
                        None => dangling.push((i, child_id)),
                    }
                }
            }
        }

        Self {
            nodes: paths.iter().map(|p| p.id).collect(),
            identifiers: paths.iter().map(|p| p.identifier.clone()).collect(),
            index,
            edges,
            controls,
            dangling,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_index(&self, path_id: Uuid) -> Option<usize> {
        self.index.get(&path_id).copied()
    }

    pub fn children(&self, node: usize) -> &[usize] {
        &self.edges[node]
    }

    /// Child path ids that do not resolve to a path in the facility.
    pub fn dangling_children(&self, path_id: Uuid) -> Vec<Uuid> {
        match self.node_index(path_id) {
            Some(node) => self
                .dangling
                .iter()
                .filter(|(from, _)| *from == node)
                .map(|(_, child)| *child)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every distinct cycle, each as the path identifiers along it.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut marks = vec![Mark::Unvisited; self.len()];
        let mut stack = Vec::new();
        let mut cycles = Vec::new();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();

        for start in 0..self.len() {
            if marks[start] == Mark::Unvisited {
                self.visit(start, &mut marks, &mut stack, &mut cycles, &mut seen);
            }
        }

        cycles
            .into_iter()
            .map(|cycle: Vec<usize>| cycle.into_iter().map(|i| self.identifiers[i].clone()).collect())
            .collect()
    }

    pub fn is_acyclic(&self) -> bool {
        self.find_cycles().is_empty()
    }

    fn visit(
        &self,
        node: usize,
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
        cycles: &mut Vec<Vec<usize>>,
        seen: &mut HashSet<Vec<usize>>,
    ) {
        marks[node] = Mark::InProgress;
        stack.push(node);

        for &child in &self.edges[node] {
            match marks[child] {
                Mark::Unvisited => self.visit(child, marks, stack, cycles, seen),
                Mark::InProgress => {
                    if let Some(pos) = stack.iter().position(|&n| n == child) {
                        let cycle = stack[pos..].to_vec();
                        // rotate so the same cycle found from another entry point compares equal
                        let mut key = cycle.clone();
                        if let Some(min_pos) = key.iter().enumerate().min_by_key(|(_, n)| **n).map(|(i, _)| i) {
                            key.rotate_left(min_pos);
                        }
                        if seen.insert(key) {
                            cycles.push(cycle);
                        }
                    }
                }
                Mark::Done => {}
            }
        }

        stack.pop();
        marks[node] = Mark::Done;
    }

    /// Controls reachable from `path_id`, directly or through child paths, in
    /// first-seen order. Terminates on cyclic input.
    pub fn descendant_controls(&self, path_id: Uuid) -> Vec<Uuid> {
        let Some(start) = self.node_index(path_id) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.len()];
        let mut pending = vec![start];
        let mut found = Vec::new();
        let mut found_set = HashSet::new();

        while let Some(node) = pending.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;

            for control in &self.controls[node] {
                if found_set.insert(*control) {
                    found.push(*control);
                }
            }
            for &child in self.edges[node].iter().rev() {
                if !visited[child] {
                    pending.push(child);
                }
            }
        }

        found
    }
}
