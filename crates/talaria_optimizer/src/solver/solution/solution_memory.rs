use crate::{problem::travel_cost_matrix::Cost, solver::accepted_solution::AcceptedSolution};

/// Bounded pool of the solutions kept across iterations, sorted by increasing cost.
pub struct SolutionMemory {
    capacity: usize,
    solutions: Vec<AcceptedSolution>,
}

impl SolutionMemory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        SolutionMemory {
            capacity,
            solutions: Vec::with_capacity(capacity + 1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.solutions.len() >= self.capacity
    }

    pub fn solutions(&self) -> &[AcceptedSolution] {
        &self.solutions
    }

    pub fn best(&self) -> Option<&AcceptedSolution> {
        self.solutions.first()
    }

    pub fn worst(&self) -> Option<&AcceptedSolution> {
        self.solutions.last()
    }

    pub fn worst_cost(&self) -> Option<Cost> {
        self.worst().map(|accepted| accepted.cost)
    }

    pub fn contains(&self, candidate: &AcceptedSolution) -> bool {
        self.solutions.iter().any(|accepted| {
            accepted.cost == candidate.cost && accepted.solution.is_identical(&candidate.solution)
        })
    }

    /// Stores the solution, evicting the worst one when the memory is full. Returns the evicted
    /// solution, or gives the candidate back when an identical solution is already stored.
    pub fn insert(
        &mut self,
        candidate: AcceptedSolution,
    ) -> Result<Option<AcceptedSolution>, AcceptedSolution> {
        if self.contains(&candidate) {
            return Err(candidate);
        }

        let evicted = if self.is_full() {
            self.solutions.pop()
        } else {
            None
        };

        // Equal costs keep their insertion order
        let position = self
            .solutions
            .partition_point(|accepted| accepted.cost <= candidate.cost);
        self.solutions.insert(position, candidate);

        Ok(evicted)
    }

    pub fn into_solutions(self) -> Vec<AcceptedSolution> {
        self.solutions
    }
}
