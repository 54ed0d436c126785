use board::MoveMask;

/// Statistics for one expanded position.
#[derive(Debug)]
pub struct MCTSNode {
    visits: usize,
    policy: Vec<f32>,
    moves: MoveMask,
    edges: Vec<MCTSEdge>,
}

/// Statistics for one move out of a position.
#[derive(Debug, Default, Clone, Copy)]
pub struct MCTSEdge {
    visits: usize,
    value: f32,
}

impl MCTSNode {
    pub fn new(policy: Vec<f32>, moves: MoveMask) -> Self {
        let edges = vec![MCTSEdge::default(); moves.len()];

        Self {
            visits: 0,
            policy,
            moves,
            edges,
        }
    }

    pub fn visits(&self) -> usize {
        self.visits
    }

    pub fn policy(&self) -> &[f32] {
        &self.policy
    }

    pub fn moves(&self) -> &MoveMask {
        &self.moves
    }

    pub fn edges(&self) -> &[MCTSEdge] {
        &self.edges
    }

    pub fn edge(&self, action: usize) -> Option<&MCTSEdge> {
        self.edges.get(action)
    }

    /// Records one more pass through `action` that returned `value`.
    pub fn backup(&mut self, action: usize, value: f32) {
        self.visits += 1;

        let edge = &mut self.edges[action];
        edge.value = (edge.value * edge.visits as f32 + value) / (edge.visits + 1) as f32;
        edge.visits += 1;
    }
}

impl MCTSEdge {
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Running average of the values backed up through this edge. Zero until visited.
    pub fn value(&self) -> f32 {
        self.value
    }
}
