//! Beam search over a frozen proximity graph.
//!
//! One routine serves both construction (which needs the full visited set to
//! feed pruning) and queries (which only need the beam). The frontier is a
//! bounded best-heap; a separate candidate queue pops the closest unexpanded
//! node first.

use std::collections::{BinaryHeap, HashSet};

use crate::points::PointRange;

use super::types::{Neighbour, ProximityGraph, ReverseNeighbour};

/// Resolved beam-search knobs, free of the public builder surface.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BeamSpec {
    pub(crate) beam: usize,
    pub(crate) cut: f32,
    pub(crate) visit_limit: usize,
    pub(crate) degree_limit: usize,
}

/// What a traversal produced: the beam's final contents sorted ascending, and
/// every node expanded along the way in expansion order.
#[derive(Clone, Debug, Default)]
pub(crate) struct BeamOutcome {
    pub(crate) nearest: Vec<Neighbour>,
    pub(crate) visited: Vec<Neighbour>,
}

struct BeamState {
    candidates: BinaryHeap<ReverseNeighbour>,
    best: BinaryHeap<Neighbour>,
    discovered: HashSet<usize>,
    visited: Vec<Neighbour>,
}

impl BeamState {
    fn new(entry: usize, distance: f32, beam: usize) -> Self {
        let mut candidates = BinaryHeap::with_capacity(beam);
        candidates.push(ReverseNeighbour::new(entry, distance));

        let mut best = BinaryHeap::with_capacity(beam + 1);
        best.push(Neighbour {
            id: entry,
            distance,
        });

        let mut discovered = HashSet::with_capacity(beam.saturating_mul(4));
        discovered.insert(entry);

        Self {
            candidates,
            best,
            discovered,
            visited: Vec::new(),
        }
    }

    fn should_terminate(&self, beam: usize, candidate_distance: f32) -> bool {
        self.best.len() >= beam
            && self
                .best
                .peek()
                .is_some_and(|furthest| candidate_distance > furthest.distance)
    }

    fn discover(&mut self, candidate: usize) -> bool {
        self.discovered.insert(candidate)
    }

    /// Admits a fresh candidate. Entries better than the furthest beam member
    /// join the beam; entries within `cut` of it are still queued for
    /// expansion.
    fn try_enqueue(&mut self, candidate: usize, distance: f32, spec: &BeamSpec) {
        if self.best.len() < spec.beam {
            self.candidates.push(ReverseNeighbour::new(candidate, distance));
            self.best.push(Neighbour {
                id: candidate,
                distance,
            });
            return;
        }
        let furthest = self
            .best
            .peek()
            .map(|neighbour| neighbour.distance)
            .unwrap_or(f32::INFINITY);
        if distance < furthest {
            self.candidates.push(ReverseNeighbour::new(candidate, distance));
            self.best.push(Neighbour {
                id: candidate,
                distance,
            });
            self.best.pop();
        } else if distance <= spec.cut * furthest {
            self.candidates.push(ReverseNeighbour::new(candidate, distance));
        }
    }

    fn finalise(self) -> BeamOutcome {
        let mut nearest = self.best.into_vec();
        nearest.sort_unstable();
        BeamOutcome {
            nearest,
            visited: self.visited,
        }
    }
}

/// Runs beam search for `query` over `graph`, whose nodes index into
/// `points`. Empty graphs yield an empty outcome.
pub(crate) fn beam_search(
    points: &PointRange<'_>,
    graph: &ProximityGraph,
    query: &[f32],
    spec: &BeamSpec,
) -> BeamOutcome {
    let Some(entry) = graph.entry() else {
        return BeamOutcome::default();
    };
    let entry = entry as usize;
    let mut state = BeamState::new(entry, points.distance_to(entry, query), spec.beam);

    while let Some(ReverseNeighbour { inner }) = state.candidates.pop() {
        if state.should_terminate(spec.beam, inner.distance) {
            break;
        }
        state.visited.push(inner);
        if state.visited.len() >= spec.visit_limit {
            break;
        }

        for &target in graph.neighbours(inner.id).iter().take(spec.degree_limit) {
            let target = target as usize;
            if !state.discover(target) {
                continue;
            }
            let distance = points.distance_to(target, query);
            state.try_enqueue(target, distance, spec);
        }
    }

    state.finalise()
}
