//! Vamana-style graph construction for a single bucket.
//!
//! Nodes are wired over several passes of a seeded random permutation. Each
//! node is located with a beam search from the entry point, its candidate set
//! (everything the search expanded, plus its current neighbours) is pruned
//! with slack `alpha`, and reverse edges are inserted with a re-prune when a
//! neighbour's list overflows. Earlier passes prune with slack `1.0`; the
//! final pass applies the configured `alpha`.

use std::collections::HashSet;

use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

use crate::points::PointRange;

use super::{
    params::GraphParams,
    search::{beam_search, BeamSpec},
    types::{Neighbour, ProximityGraph},
};

/// Peer-sample bound when locating the medoid entry point.
const MEDOID_SAMPLE: usize = 1_000;

/// Builds the proximity graph for the bucket viewed by `points`.
///
/// The same `seed` always produces the same graph, regardless of how many
/// worker threads are building sibling buckets.
pub(crate) fn build_graph(
    points: &PointRange<'_>,
    params: &GraphParams,
    seed: u64,
) -> ProximityGraph {
    let nodes = points.len();
    if nodes == 0 {
        return ProximityGraph::empty();
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let entry = medoid(points, &mut rng);
    let mut graph = ProximityGraph::with_nodes(nodes, entry as u32);
    if nodes == 1 {
        return graph;
    }

    let spec = BeamSpec {
        beam: params.build_beam(),
        cut: 1.35,
        visit_limit: usize::MAX,
        degree_limit: usize::MAX,
    };

    let mut order: Vec<usize> = (0..nodes).collect();
    for pass in 0..params.passes() {
        let slack = if pass + 1 == params.passes() {
            params.alpha()
        } else {
            1.0
        };
        order.shuffle(&mut rng);

        for &node in &order {
            let outcome = beam_search(points, &graph, points.point(node), &spec);

            let mut seen: HashSet<usize> = outcome.visited.iter().map(|n| n.id).collect();
            let mut candidates = outcome.visited;
            for &current in graph.neighbours(node) {
                let current = current as usize;
                if seen.insert(current) {
                    candidates.push(Neighbour {
                        id: current,
                        distance: points.distance_between(node, current),
                    });
                }
            }

            let chosen = robust_prune(points, node, candidates, slack, params.degree());
            graph.set_neighbours(node, chosen.clone());

            for &neighbour in &chosen {
                let neighbour = neighbour as usize;
                let degree_now = graph.add_neighbour(neighbour, node as u32);
                if degree_now > params.degree() {
                    let overfull: Vec<Neighbour> = graph
                        .neighbours(neighbour)
                        .iter()
                        .map(|&other| Neighbour {
                            id: other as usize,
                            distance: points.distance_between(neighbour, other as usize),
                        })
                        .collect();
                    let trimmed =
                        robust_prune(points, neighbour, overfull, slack, params.degree());
                    graph.set_neighbours(neighbour, trimmed);
                }
            }
        }
    }

    graph
}

/// Picks the entry point: the sampled node minimising the summed distance to
/// a random peer sample, ties to the smaller id.
fn medoid(points: &PointRange<'_>, rng: &mut SmallRng) -> usize {
    let nodes = points.len();
    if nodes <= 2 {
        return 0;
    }
    let sample: Vec<usize> = if nodes <= MEDOID_SAMPLE {
        (0..nodes).collect()
    } else {
        rand::seq::index::sample(rng, nodes, MEDOID_SAMPLE).into_vec()
    };

    let mut best = sample[0];
    let mut best_total = f32::INFINITY;
    for &candidate in &sample {
        let total: f32 = sample
            .iter()
            .map(|&peer| points.distance_between(candidate, peer))
            .sum();
        if total < best_total || (total == best_total && candidate < best) {
            best = candidate;
            best_total = total;
        }
    }
    best
}

/// Selects up to `degree` diverse neighbours for `node` from `candidates`.
///
/// Repeatedly takes the closest remaining candidate and discards every other
/// candidate it dominates under slack `alpha`. Candidates carry their
/// distance to `node`; ties break on the smaller local id.
fn robust_prune(
    points: &PointRange<'_>,
    node: usize,
    mut candidates: Vec<Neighbour>,
    alpha: f32,
    degree: usize,
) -> Vec<u32> {
    candidates.retain(|candidate| candidate.id != node);
    candidates.sort_unstable();
    candidates.dedup();

    let mut selected: Vec<u32> = Vec::with_capacity(degree);
    let mut alive = vec![true; candidates.len()];
    for index in 0..candidates.len() {
        if !alive[index] {
            continue;
        }
        let chosen = candidates[index];
        selected.push(chosen.id as u32);
        if selected.len() == degree {
            break;
        }
        for (other_index, other) in candidates.iter().enumerate().skip(index + 1) {
            if !alive[other_index] {
                continue;
            }
            let spacing = points.distance_between(chosen.id, other.id);
            if alpha * spacing <= other.distance {
                alive[other_index] = false;
            }
        }
    }
    selected
}
