use tracing::{Level, debug, instrument};

use crate::{
    problem::{
        meters::Meters,
        routing_problem::{NodeIdx, RoutingProblem},
    },
    solver::{
        construction::infeasibility::{UnscheduledStop, classify_unscheduled},
        solution::route::Route,
    },
};

#[derive(Debug, Clone, Copy)]
struct Insertion {
    /// Index into the unscheduled list
    index: usize,
    node: NodeIdx,
    position: usize,
    delta: Meters,
}

pub struct ConstructionResult {
    pub route: Route,
    pub unscheduled: Vec<UnscheduledStop>,
}

impl ConstructionResult {
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }
}

/// Marginal distance of putting `node` right before `position`.
#[inline]
fn insertion_delta(problem: &RoutingProblem, route: &Route, node: NodeIdx, position: usize) -> Meters {
    let previous = route.node(position - 1);
    let next = route.node(position);

    problem.travel_distance(previous, node) + problem.travel_distance(node, next)
        - problem.travel_distance(previous, next)
}

/// Grows a route from the empty tour, one stop at a time.
///
/// Every round the cheapest feasible `(stop, position)` pair is inserted. Ties go to the lowest
/// stop index, then the lowest position, so the result only depends on the input order. Stops
/// left over when nothing fits anymore are classified.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn cheapest_insertion(problem: &RoutingProblem) -> ConstructionResult {
    let mut route = Route::empty(problem);
    let mut unscheduled: Vec<NodeIdx> = problem.stop_nodes().collect();

    loop {
        let mut best: Option<Insertion> = None;

        for (index, &node) in unscheduled.iter().enumerate() {
            for position in 1..=route.last_position() {
                let delta = insertion_delta(problem, &route, node, position);

                if best.is_some_and(|best| delta >= best.delta) {
                    continue;
                }

                if route
                    .is_valid_change(problem, std::iter::once(node), position, position)
                    .is_ok()
                {
                    best = Some(Insertion {
                        index,
                        node,
                        position,
                        delta,
                    });
                }
            }
        }

        let Some(insertion) = best else {
            break;
        };

        route.insert(problem, insertion.node, insertion.position);
        unscheduled.remove(insertion.index);
    }

    let unscheduled: Vec<UnscheduledStop> = unscheduled
        .into_iter()
        .map(|node| UnscheduledStop {
            stop_id: problem.node(node).external_id().to_owned(),
            node,
            reason: classify_unscheduled(problem, &route, node),
        })
        .collect();

    debug!(
        "Construction: {} stops scheduled, {} unscheduled, distance {}",
        route.num_stops(),
        unscheduled.len(),
        route.distance()
    );

    ConstructionResult { route, unscheduled }
}
