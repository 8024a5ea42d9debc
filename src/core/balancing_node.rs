use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::core::node::{Node, NodeRef};
use crate::core::validation::ValidationResult;

/// Sends each call to exactly one of its child nodes.
///
/// When one weight per node is configured, the child is drawn at random with
/// probability proportional to its weight. Otherwise (and when the weights do
/// not sum to a positive number) children are picked round-robin from a counter
/// shared by every caller of this instance.
///
/// The random source is owned by the node. Use [`BalancingNode::seed`] for
/// reproducible selection.
pub struct BalancingNode {
    nodes: Vec<NodeRef>,
    weights: Vec<i64>,
    rr_counter: AtomicU64,
    rng: Mutex<StdRng>,
}

/// How a child was chosen. Mostly useful in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
    Weighted(usize),
    RoundRobin(usize),
}

impl Selection {
    pub fn index(self) -> usize {
        match self {
            Selection::Weighted(i) | Selection::RoundRobin(i) => i,
        }
    }
}

impl BalancingNode {
    pub fn new(nodes: Vec<NodeRef>) -> Self {
        BalancingNode {
            nodes,
            weights: Vec::new(),
            rr_counter: AtomicU64::new(0),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Sets one weight per node. Any other count leaves the node in round-robin mode.
    pub fn weights(mut self, weights: Vec<i64>) -> Self {
        self.weights = weights;
        self
    }

    /// Replaces the random source with one seeded from `seed`.
    pub fn seed(self, seed: u64) -> Self {
        self.rng(StdRng::seed_from_u64(seed))
    }

    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    fn is_weighted(&self) -> bool {
        !self.nodes.is_empty() && self.weights.len() == self.nodes.len()
    }

    fn next_round_robin(&self) -> usize {
        let ticket = self.rr_counter.fetch_add(1, Ordering::Relaxed);
        (ticket % self.nodes.len() as u64) as usize
    }

    /// Sum of the weights, widened so that any `i64` weights add up exactly.
    fn total_weight(&self) -> i128 {
        self.weights.iter().map(|&w| i128::from(w)).sum()
    }

    /// Chooses the child for the next call. The caller must ensure there is at least one node.
    pub(crate) fn select(&self) -> Selection {
        if !self.is_weighted() {
            return Selection::RoundRobin(self.next_round_robin());
        }

        let total = self.total_weight();
        if total <= 0 {
            log::warn!(
                "BalancingNode: total weight {} is non-positive; falling back to round-robin",
                total
            );
            return Selection::RoundRobin(self.next_round_robin());
        }

        let mut remaining = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .gen_range(0..total);
        for (index, &weight) in self.weights.iter().enumerate() {
            let weight = i128::from(weight);
            if remaining < weight {
                return Selection::Weighted(index);
            }
            remaining -= weight;
        }
        Selection::Weighted(self.nodes.len() - 1)
    }
}

#[async_trait]
impl Node for BalancingNode {
    async fn execute(&self, ctx: &Context, input: &str) -> Result<String, FlowError> {
        if self.nodes.is_empty() {
            return Err(FlowError::Configuration("balancing node"));
        }

        let selection = self.select();
        log::debug!("BalancingNode selected {:?}", selection);
        self.nodes[selection.index()].execute(ctx, input).await
    }

    fn name(&self) -> &str {
        "BalancingNode"
    }

    fn validate(&self, result: &mut ValidationResult) {
        if self.nodes.is_empty() {
            result.add_error("BalancingNode has no child nodes and will always fail.");
        } else if !self.weights.is_empty() && self.weights.len() != self.nodes.len() {
            result.add_warning(format!(
                "BalancingNode has {} weights for {} nodes; weights are ignored and round-robin is used.",
                self.weights.len(),
                self.nodes.len()
            ));
        } else if self.is_weighted() && self.total_weight() <= 0 {
            result.add_warning(
                "BalancingNode weights sum to a non-positive total; round-robin is used.",
            );
        }
        for node in &self.nodes {
            node.validate(result);
        }
    }
}
