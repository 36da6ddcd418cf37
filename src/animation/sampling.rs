use std::collections::BTreeSet;

use rand::{Rng as _, SeedableRng as _};

use crate::network::topology::NetworkTopology;

/// Edge between node `source` of layer `layer - 1` and node `target` of `layer`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct EdgeId {
    /// Index of the layer the edge points into (always `>= 1`).
    pub layer: usize,
    /// Node index in `layer`.
    pub target: u32,
    /// Node index in `layer - 1`.
    pub source: u32,
}

impl EdgeId {
    /// Convenience constructor in `(layer, target, source)` order.
    pub const fn new(layer: usize, target: u32, source: u32) -> Self {
        Self {
            layer,
            target,
            source,
        }
    }
}

/// Edges picked for emphasis during one animation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSet {
    edges: BTreeSet<EdgeId>,
}

impl HighlightSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge; duplicates collapse.
    pub fn insert(&mut self, edge: EdgeId) -> bool {
        self.edges.insert(edge)
    }

    /// Membership test.
    pub fn contains(&self, edge: &EdgeId) -> bool {
        self.edges.contains(edge)
    }

    /// Number of distinct edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// `true` when no edge is highlighted.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges in `(layer, target, source)` order.
    pub fn iter(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.iter()
    }

    /// Edges into `layer`.
    pub fn in_layer(&self, layer: usize) -> impl Iterator<Item = &EdgeId> {
        self.edges.iter().filter(move |e| e.layer == layer)
    }
}

impl FromIterator<EdgeId> for HighlightSet {
    fn from_iter<I: IntoIterator<Item = EdgeId>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..n` as `floor(u * n)`. `n` must be non-zero.
    fn next_index(&mut self, n: u32) -> u32 {
        let i = (self.next_unit() * f64::from(n)).floor() as u32;
        i.min(n.saturating_sub(1))
    }
}

/// Seeded SplitMix64 generator; the same seed always yields the same highlight sets.
#[derive(Clone, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl RandomSource for Rng64 {
    fn next_unit(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

/// OS-seeded generator for interactive runs.
#[derive(Debug)]
pub struct EntropySource(rand::rngs::StdRng);

impl EntropySource {
    /// Seed from the operating system.
    pub fn new() -> Self {
        Self(rand::rngs::StdRng::from_entropy())
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn next_unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

/// Draw `per_layer` random edges into every hidden layer.
///
/// For each layer that is neither input nor output, the source index is drawn uniformly from
/// the previous layer's displayed range, then the target index from the current layer's
/// displayed range. Layers are independent and there is no coverage or connectivity
/// guarantee. Edges into the output layer are never sampled.
pub fn sample_edges(
    topology: &NetworkTopology,
    per_layer: usize,
    rng: &mut dyn RandomSource,
) -> HighlightSet {
    let mut set = HighlightSet::new();
    for layer in (1..topology.len()).filter(|&l| topology.is_hidden(l)) {
        let prev = topology.displayed_nodes(layer - 1);
        let curr = topology.displayed_nodes(layer);
        for _ in 0..per_layer {
            let source = rng.next_index(prev);
            let target = rng.next_index(curr);
            set.insert(EdgeId::new(layer, target, source));
        }
    }
    set
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sampling.rs"]
mod tests;
