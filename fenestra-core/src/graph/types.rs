//! Neighbour ordering semantics and the frozen adjacency structure.
//!
//! Distances are finite `f32` values; ties are always broken by the smaller
//! id so builds and searches stay deterministic.

use std::cmp::Ordering;

/// A point discovered during a search, with its distance from the query.
///
/// Ordering is by ascending distance, then ascending id; that tie rule is
/// what makes repeated runs return identical results.
///
/// # Examples
/// ```
/// use fenestra_core::Neighbour;
///
/// let mut found = vec![
///     Neighbour { id: 7, distance: 0.5 },
///     Neighbour { id: 3, distance: 0.5 },
///     Neighbour { id: 1, distance: 0.25 },
/// ];
/// found.sort_unstable();
/// assert_eq!(found[0].id, 1);
/// assert_eq!(found[1].id, 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    /// Point identifier. Local to a bucket inside the core; original corpus
    /// id in search results returned to callers.
    pub id: usize,
    /// Squared Euclidean distance between the query and [`Neighbour::id`].
    pub distance: f32,
}

impl Eq for Neighbour {}

impl Ord for Neighbour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Wrapper reversing [`Neighbour`] ordering so a `BinaryHeap` pops the
/// closest candidate first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ReverseNeighbour {
    pub(crate) inner: Neighbour,
}

impl ReverseNeighbour {
    pub(crate) fn new(id: usize, distance: f32) -> Self {
        Self {
            inner: Neighbour { id, distance },
        }
    }
}

impl Eq for ReverseNeighbour {}

impl Ord for ReverseNeighbour {
    fn cmp(&self, other: &Self) -> Ordering {
        other.inner.cmp(&self.inner)
    }
}

impl PartialOrd for ReverseNeighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Directed adjacency lists over a bucket's local ids, frozen once the
/// builder finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProximityGraph {
    neighbours: Vec<Vec<u32>>,
    entry: Option<u32>,
}

impl ProximityGraph {
    pub(crate) fn empty() -> Self {
        Self {
            neighbours: Vec::new(),
            entry: None,
        }
    }

    pub(crate) fn with_nodes(nodes: usize, entry: u32) -> Self {
        debug_assert!((entry as usize) < nodes);
        Self {
            neighbours: vec![Vec::new(); nodes],
            entry: Some(entry),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.neighbours.len()
    }

    pub(crate) fn entry(&self) -> Option<u32> {
        self.entry
    }

    #[inline]
    pub(crate) fn neighbours(&self, node: usize) -> &[u32] {
        &self.neighbours[node]
    }

    pub(crate) fn set_neighbours(&mut self, node: usize, list: Vec<u32>) {
        self.neighbours[node] = list;
    }

    /// Appends `target` to `node`'s list unless already present; returns the
    /// resulting out-degree.
    pub(crate) fn add_neighbour(&mut self, node: usize, target: u32) -> usize {
        let list = &mut self.neighbours[node];
        if !list.contains(&target) {
            list.push(target);
        }
        list.len()
    }

    pub(crate) fn max_out_degree(&self) -> usize {
        self.neighbours
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }
}
