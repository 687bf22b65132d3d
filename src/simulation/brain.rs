//! Feed-forward neural networks for vehicle autopilots.
//!
//! Networks have a fixed architecture, tanh activation, and evolve through
//! the mutation and merge operators; there is no gradient training. Both
//! operators produce new instances, they never touch their inputs.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

/// A single fully-connected layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a layer with weights and biases uniform in [-1, 1].
    pub fn new_random(input_size: usize, output_size: usize) -> Self {
        Self {
            weights: Array2::random((output_size, input_size), Uniform::new(-1.0, 1.0)),
            biases: Array1::random(output_size, Uniform::new(-1.0, 1.0)),
        }
    }

    /// Forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f32::tanh);
        output
    }

    /// Returns a copy with every parameter replaced by the rate-weighted
    /// average of its current value and a fresh uniform draw in [-1, 1].
    fn mutated(&self, rate: f32) -> Self {
        Self {
            weights: &self.weights * (1.0 - rate)
                + &(Array2::random(self.weights.dim(), Uniform::new(-1.0, 1.0)) * rate),
            biases: &self.biases * (1.0 - rate)
                + &(Array1::random(self.biases.len(), Uniform::new(-1.0, 1.0)) * rate),
        }
    }

    /// Blends two layers element-wise: `a*(1-ratio) + b*ratio`.
    fn merged(a: &Mlp, b: &Mlp, ratio: f32) -> Self {
        Self {
            weights: &a.weights * (1.0 - ratio) + &b.weights * ratio,
            biases: &a.biases * (1.0 - ratio) + &b.biases * ratio,
        }
    }
}

/// Error returned when two brains with different architectures are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureMismatch {
    /// Architecture of the first brain.
    pub a: Vec<usize>,
    /// Architecture of the second brain.
    pub b: Vec<usize>,
}

impl std::fmt::Display for ArchitectureMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot merge brains with architectures {:?} and {:?}",
            self.a, self.b
        )
    }
}

impl std::error::Error for ArchitectureMismatch {}

/// A feed-forward network with fitness bookkeeping that survives across
/// generations for the lineage this instance represents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brain {
    /// Lineage identity, preserved through mutation, merge and snapshots.
    pub id: u32,
    /// Neuron counts per layer, fixed for the brain's lifetime.
    pub architecture: Vec<usize>,
    /// Ordered layers chaining output to input.
    pub layers: Vec<Mlp>,
    /// Rounds this lineage has won.
    pub survived_rounds: u32,
    /// Highest score this lineage has reached.
    pub best_score: f32,
}

impl Brain {
    /// Creates a brain with random weights.
    ///
    /// Panics on fewer than two layer sizes or any empty layer; a degenerate
    /// network must never be constructed silently.
    pub fn new(architecture: &[usize]) -> Self {
        assert!(
            architecture.len() >= 2,
            "brain needs at least input and output layers, got {architecture:?}"
        );
        assert!(
            architecture.iter().all(|&n| n > 0),
            "brain layers must be non-empty, got {architecture:?}"
        );

        let layers = (0..architecture.len() - 1)
            .map(|i| Mlp::new_random(architecture[i], architecture[i + 1]))
            .collect();

        Self {
            id: rand::random::<u32>(),
            architecture: architecture.to_vec(),
            layers,
            survived_rounds: 0,
            best_score: 0.0,
        }
    }

    /// Runs a forward pass. Panics on an input length mismatch rather than
    /// silently truncating.
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        assert_eq!(
            inputs.len(),
            self.architecture[0],
            "brain expects {} inputs, got {}",
            self.architecture[0],
            inputs.len()
        );

        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Produces a new brain with the same architecture and identity whose
    /// every parameter is `old*(1-rate) + uniform(-1,1)*rate`.
    ///
    /// `rate = 0` is an exact copy, `rate = 1` a fully random brain. The seed
    /// is never modified.
    pub fn mutate(&self, rate: f32) -> Brain {
        Brain {
            id: self.id,
            architecture: self.architecture.clone(),
            layers: self.layers.iter().map(|l| l.mutated(rate)).collect(),
            survived_rounds: self.survived_rounds,
            best_score: self.best_score,
        }
    }

    /// Blends two brains of identical architecture: `a*(1-ratio) + b*ratio`
    /// per weight and bias. Identity and fitness bookkeeping come from the
    /// parent with the higher best score.
    pub fn merge(a: &Brain, b: &Brain, ratio: f32) -> Result<Brain, ArchitectureMismatch> {
        if a.architecture != b.architecture {
            return Err(ArchitectureMismatch {
                a: a.architecture.clone(),
                b: b.architecture.clone(),
            });
        }

        let stronger = if b.best_score > a.best_score { b } else { a };

        Ok(Brain {
            id: stronger.id,
            architecture: a.architecture.clone(),
            layers: a
                .layers
                .iter()
                .zip(&b.layers)
                .map(|(la, lb)| Mlp::merged(la, lb, ratio))
                .collect(),
            survived_rounds: stronger.survived_rounds,
            best_score: stronger.best_score,
        })
    }

    /// Records a finished round for this lineage.
    pub fn record_round(&mut self, score: f32) {
        self.survived_rounds += 1;
        if score > self.best_score {
            self.best_score = score;
        }
    }
}

/// Persisted form of a brain, stamped with the time it was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainSnapshot {
    /// RFC 3339 timestamp of the save.
    pub saved_at: String,
    /// The serialized brain.
    pub brain: Brain,
}

impl BrainSnapshot {
    /// Wraps a brain with the current wall-clock time.
    pub fn now(brain: Brain) -> Self {
        Self {
            saved_at: chrono::Utc::now().to_rfc3339(),
            brain,
        }
    }
}
