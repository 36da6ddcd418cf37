use crate::foundation::error::{ScopeError, ScopeResult};

/// Default per-layer node cap for drawing.
pub const DEFAULT_DISPLAY_CAP: u32 = 28;

/// One layer of the schematic diagram.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayerSpec {
    /// Label used in logs and SVG ids.
    pub name: String,
    /// Node count of the layer.
    pub nodes: u32,
}

/// Ordered, static layer sequence of the illustrative network.
///
/// Layer 0 is the input layer, the last layer is the output layer (one node per class), and
/// everything in between is hidden. Only the first `display_cap` nodes of a layer are drawn;
/// highlight sampling draws indices from that displayed range as well.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkTopology {
    layers: Vec<LayerSpec>,
    display_cap: u32,
}

impl NetworkTopology {
    /// Validate and build a topology.
    pub fn new(layers: Vec<LayerSpec>, display_cap: u32) -> ScopeResult<Self> {
        if layers.len() < 2 {
            return Err(ScopeError::validation(
                "topology needs at least an input and an output layer",
            ));
        }
        if display_cap == 0 {
            return Err(ScopeError::validation("display cap must be > 0"));
        }
        if let Some(empty) = layers.iter().find(|l| l.nodes == 0) {
            return Err(ScopeError::validation(format!(
                "layer '{}' has no nodes",
                empty.name
            )));
        }
        let output = &layers[layers.len() - 1];
        if output.nodes > display_cap {
            return Err(ScopeError::validation(format!(
                "output layer has {} nodes but only {display_cap} can be displayed",
                output.nodes
            )));
        }
        Ok(Self {
            layers,
            display_cap,
        })
    }

    /// Build from bare node counts, naming layers `input`, `hidden N`, `output`.
    pub fn from_sizes(sizes: &[u32], display_cap: u32) -> ScopeResult<Self> {
        let last = sizes.len().saturating_sub(1);
        let layers = sizes
            .iter()
            .enumerate()
            .map(|(i, &nodes)| LayerSpec {
                name: match i {
                    0 => "input".to_owned(),
                    i if i == last => "output".to_owned(),
                    i => format!("hidden {i}"),
                },
                nodes,
            })
            .collect();
        Self::new(layers, display_cap)
    }

    /// The demo network: 25 input, two hidden layers of 20, 10 digit classes.
    pub fn mnist_demo() -> Self {
        let layer = |name: &str, nodes| LayerSpec {
            name: name.to_owned(),
            nodes,
        };
        Self {
            layers: vec![
                layer("input", 25),
                layer("hidden 1", 20),
                layer("hidden 2", 20),
                layer("output", 10),
            ],
            display_cap: DEFAULT_DISPLAY_CAP,
        }
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`; a valid topology has at least two layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All layers in order.
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Display cap shared by every layer.
    pub fn display_cap(&self) -> u32 {
        self.display_cap
    }

    /// Index of the output layer.
    pub fn output_layer(&self) -> usize {
        self.layers.len() - 1
    }

    /// Number of output classes.
    pub fn class_count(&self) -> u32 {
        self.layers[self.output_layer()].nodes
    }

    /// `true` for layers that are neither input nor output.
    pub fn is_hidden(&self, layer: usize) -> bool {
        layer > 0 && layer < self.output_layer()
    }

    /// Drawn node count of `layer` (`min(nodes, display_cap)`), `0` for unknown layers.
    pub fn displayed_nodes(&self, layer: usize) -> u32 {
        self.layers
            .get(layer)
            .map_or(0, |l| l.nodes.min(self.display_cap))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/network/topology.rs"]
mod tests;
