use fxhash::FxHashSet;
use jiff::SignedDuration;

use crate::{
    define_index_newtype,
    problem::{
        error::ProblemError,
        location::Location,
        meters::Meters,
        shift::{RouteLimits, Shift},
        stop::Stop,
        travel_cost_matrix::TravelCostMatrix,
    },
};

define_index_newtype!(NodeIdx, Stop);

impl NodeIdx {
    pub const DEPOT: NodeIdx = NodeIdx::new(0);

    pub fn is_depot(&self) -> bool {
        *self == NodeIdx::DEPOT
    }
}

/// A single-vehicle routing problem. Node 0 is the depot, nodes `1..=num_stops` are the stops
/// in input order.
#[derive(Debug)]
pub struct RoutingProblem {
    nodes: Vec<Stop>,
    matrix: TravelCostMatrix,
    shift: Shift,
    limits: RouteLimits,
    is_matrix_degraded: bool,
}

impl RoutingProblem {
    pub fn depot(&self) -> &Stop {
        &self.nodes[NodeIdx::DEPOT]
    }

    pub fn node(&self, node: NodeIdx) -> &Stop {
        &self.nodes[node]
    }

    pub fn nodes(&self) -> &[Stop] {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_stops(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn stop_nodes(&self) -> impl Iterator<Item = NodeIdx> + use<> {
        (1..self.nodes.len()).map(NodeIdx::new)
    }

    pub fn node_by_external_id(&self, external_id: &str) -> Option<NodeIdx> {
        self.nodes
            .iter()
            .position(|stop| stop.external_id() == external_id)
            .map(NodeIdx::new)
    }

    pub fn matrix(&self) -> &TravelCostMatrix {
        &self.matrix
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: NodeIdx, to: NodeIdx) -> Meters {
        self.matrix.travel_distance(from, to)
    }

    #[inline(always)]
    pub fn travel_time(&self, from: NodeIdx, to: NodeIdx) -> SignedDuration {
        self.matrix.travel_time(from, to)
    }

    pub fn is_symmetric(&self) -> bool {
        self.matrix.is_symmetric()
    }

    pub fn shift(&self) -> &Shift {
        &self.shift
    }

    pub fn limits(&self) -> &RouteLimits {
        &self.limits
    }

    pub fn max_distance(&self) -> Meters {
        self.limits.max_distance
    }

    /// Latest return to the depot, the tighter of the time cap and the shift length.
    pub fn time_horizon(&self) -> SignedDuration {
        self.limits.max_time.min(self.shift.length())
    }

    pub fn max_waiting_duration(&self) -> Option<SignedDuration> {
        self.limits.max_waiting_duration
    }

    /// Whether the matrix comes from great-circle estimates after the routing service failed.
    pub fn is_matrix_degraded(&self) -> bool {
        self.is_matrix_degraded
    }
}

#[derive(Default)]
pub struct RoutingProblemBuilder {
    depot: Option<(String, Location)>,
    stops: Vec<Stop>,
    matrix: Option<TravelCostMatrix>,
    shift: Option<Shift>,
    limits: Option<RouteLimits>,
    is_matrix_degraded: bool,
}

impl RoutingProblemBuilder {
    pub fn set_depot(
        &mut self,
        external_id: impl Into<String>,
        location: Location,
    ) -> &mut RoutingProblemBuilder {
        self.depot = Some((external_id.into(), location));
        self
    }

    pub fn set_stops(&mut self, stops: Vec<Stop>) -> &mut RoutingProblemBuilder {
        self.stops = stops;
        self
    }

    pub fn add_stop(&mut self, stop: Stop) -> &mut RoutingProblemBuilder {
        self.stops.push(stop);
        self
    }

    pub fn set_matrix(&mut self, matrix: TravelCostMatrix) -> &mut RoutingProblemBuilder {
        self.matrix = Some(matrix);
        self
    }

    pub fn set_shift(&mut self, shift: Shift) -> &mut RoutingProblemBuilder {
        self.shift = Some(shift);
        self
    }

    pub fn set_limits(&mut self, limits: RouteLimits) -> &mut RoutingProblemBuilder {
        self.limits = Some(limits);
        self
    }

    pub fn set_matrix_degraded(&mut self, is_matrix_degraded: bool) -> &mut RoutingProblemBuilder {
        self.is_matrix_degraded = is_matrix_degraded;
        self
    }

    /// Checks everything but the matrix, so bad input is caught before fetching one.
    pub fn validate(&self) -> Result<(), ProblemError> {
        let (depot_id, depot_location) = self.depot.as_ref().ok_or(ProblemError::MissingDepot)?;
        let shift = self.shift.ok_or(ProblemError::MissingShift)?;
        let limits = self.limits.ok_or(ProblemError::MissingLimits)?;

        limits.validate()?;
        Stop::depot(depot_id.clone(), *depot_location, shift.length()).validate()?;

        let mut ids = FxHashSet::default();
        ids.insert(depot_id.as_str());
        for stop in &self.stops {
            stop.validate()?;
            if !ids.insert(stop.external_id()) {
                return Err(ProblemError::DuplicateStopId(stop.external_id().to_owned()));
            }
        }

        Ok(())
    }

    pub fn build(self) -> Result<RoutingProblem, ProblemError> {
        self.validate()?;

        let (depot_id, depot_location) = self.depot.ok_or(ProblemError::MissingDepot)?;
        let shift = self.shift.ok_or(ProblemError::MissingShift)?;
        let limits = self.limits.ok_or(ProblemError::MissingLimits)?;
        let matrix = self.matrix.ok_or(ProblemError::MissingMatrix)?;

        let mut nodes = Vec::with_capacity(self.stops.len() + 1);
        nodes.push(Stop::depot(depot_id, depot_location, shift.length()));
        nodes.extend(self.stops);

        if matrix.num_nodes() != nodes.len() {
            return Err(ProblemError::MatrixSizeMismatch {
                expected: nodes.len(),
                actual: matrix.num_nodes(),
            });
        }

        Ok(RoutingProblem {
            nodes,
            matrix,
            shift,
            limits,
            is_matrix_degraded: self.is_matrix_degraded,
        })
    }
}
