use std::time::Duration;

use crate::animation::clock::AnimationClock;
use crate::animation::ease::{Ease, Transition};
use crate::animation::engine::AnimationEngine;
use crate::animation::sampling::{EdgeId, HighlightSet};
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::network::layout::DiagramLayout;
use crate::network::topology::NetworkTopology;
use crate::prediction::Label;

/// Visual weight of a rendered edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// Part of the highlighted signal path.
    Emphasized,
    /// Background connectivity.
    Dim,
}

/// Discrete node size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeScale {
    /// Layer not yet revealed.
    Small,
    /// Layer revealed.
    Large,
}

/// Node paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeFill {
    /// Regular node.
    Normal,
    /// The output node of the predicted class.
    Predicted,
}

/// Colours, sizes and transition curves of the diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagramStyle {
    /// Canvas background.
    pub background: Rgba8,
    /// Edges of layers that are not revealed yet.
    pub edge_pending: Rgba8,
    /// Revealed, non-highlighted edges.
    pub edge_dim: Rgba8,
    /// Highlighted edges and the output path.
    pub edge_emphasized: Rgba8,
    /// Regular node fill.
    pub node: Rgba8,
    /// Predicted output node fill.
    pub node_predicted: Rgba8,
    /// Caption text colour.
    pub caption: Rgba8,
    /// Scale factor of unrevealed nodes.
    pub small_scale: f64,
    /// Scale factor of revealed nodes.
    pub large_scale: f64,
    /// Edge colour change after a reveal.
    pub edge_transition: Transition,
    /// Node growth after a reveal.
    pub node_transition: Transition,
    /// Caption fade/scale-in after completion.
    pub caption_transition: Transition,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::from_rgb_hex(0x12141c),
            edge_pending: Rgba8::from_rgb_hex(0x444444),
            edge_dim: Rgba8::from_rgb_hex(0x333333),
            edge_emphasized: Rgba8::from_rgb_hex(0x4ade80),
            node: Rgba8::from_rgb_hex(0x3b82f6),
            node_predicted: Rgba8::from_rgb_hex(0x22c55e),
            caption: Rgba8::from_rgb_hex(0x4ade80),
            small_scale: 0.8,
            large_scale: 1.2,
            edge_transition: Transition::millis(300, Ease::InOutQuad),
            node_transition: Transition::millis(400, Ease::InOutQuad),
            caption_transition: Transition::millis(200, Ease::OutCubic),
        }
    }
}

/// One drawn edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeView {
    /// Edge identity.
    pub id: EdgeId,
    /// Source node centre.
    pub from: Point,
    /// Target node centre.
    pub to: Point,
    /// Discrete emphasis.
    pub emphasis: Emphasis,
    /// `true` once the target layer is revealed.
    pub revealed: bool,
    /// Stroke colour at this instant, transition applied.
    pub color: Rgba8,
}

/// One drawn node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeView {
    /// Layer index.
    pub layer: usize,
    /// Node index within the layer.
    pub index: u32,
    /// Centre.
    pub center: Point,
    /// Discrete size.
    pub scale: NodeScale,
    /// Continuous scale factor at this instant.
    pub scale_factor: f64,
    /// Discrete paint.
    pub fill: NodeFill,
    /// Fill colour.
    pub color: Rgba8,
}

/// Final "Predicted: k" caption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionView {
    /// Predicted class.
    pub label: Label,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Scale factor (0.7 while appearing, 1.0 settled).
    pub scale: f64,
}

/// Everything a renderer needs to draw one instant of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagramView {
    /// Diagram extent.
    pub bounds: Rect,
    /// Unscaled node radius.
    pub node_radius: f64,
    /// Edges in draw order (below nodes).
    pub edges: Vec<EdgeView>,
    /// Nodes in draw order.
    pub nodes: Vec<NodeView>,
    /// Caption, present only when the run completed with a label.
    pub caption: Option<CaptionView>,
}

/// Classify edge `id` for the current run, `None` meaning "not rendered at all".
///
/// Edges into the output layer are drawn only towards the predicted node and are emphasized
/// regardless of stage; without a label they are drawn dim. Hidden-layer edges are emphasized
/// when they are highlighted and their layer is revealed.
pub fn classify_edge(
    topology: &NetworkTopology,
    clock: &AnimationClock,
    highlights: &HighlightSet,
    label: Option<Label>,
    id: &EdgeId,
) -> Option<Emphasis> {
    if id.layer == topology.output_layer() {
        return match label {
            Some(k) if id.target == k.get() => Some(Emphasis::Emphasized),
            Some(_) => None,
            None => Some(Emphasis::Dim),
        };
    }
    if highlights.contains(id) && clock.is_revealed(id.layer) {
        Some(Emphasis::Emphasized)
    } else {
        Some(Emphasis::Dim)
    }
}

impl DiagramView {
    /// Derive the view of `engine` at `now`.
    pub fn build(
        engine: &AnimationEngine,
        layout: &DiagramLayout,
        style: &DiagramStyle,
        now: Duration,
    ) -> Self {
        let topology = engine.topology();
        let clock = engine.clock();
        let highlights = engine.highlights();
        let label = engine.prediction().map(|p| p.label);
        let output = topology.output_layer();

        let mut edges = Vec::new();
        for layer in 1..topology.len() {
            let revealed = clock.is_revealed(layer);
            let progress = style
                .edge_transition
                .progress_since(engine.revealed_at(layer), now);
            for (target, &to) in layout.column(layer).iter().enumerate() {
                for (source, &from) in layout.column(layer - 1).iter().enumerate() {
                    let id = EdgeId::new(layer, target as u32, source as u32);
                    let Some(emphasis) = classify_edge(topology, &clock, highlights, label, &id)
                    else {
                        continue;
                    };
                    let color = match emphasis {
                        Emphasis::Emphasized if layer == output => style.edge_emphasized,
                        Emphasis::Emphasized => {
                            style.edge_pending.lerp(style.edge_emphasized, progress)
                        }
                        Emphasis::Dim if revealed => {
                            style.edge_pending.lerp(style.edge_dim, progress)
                        }
                        Emphasis::Dim => style.edge_pending,
                    };
                    edges.push(EdgeView {
                        id,
                        from,
                        to,
                        emphasis,
                        revealed,
                        color,
                    });
                }
            }
        }

        let mut nodes = Vec::new();
        for layer in 0..topology.len() {
            let revealed = clock.is_revealed(layer);
            let progress = style
                .node_transition
                .progress_since(engine.revealed_at(layer), now);
            let scale_factor =
                style.small_scale + (style.large_scale - style.small_scale) * progress;
            for (index, &center) in layout.column(layer).iter().enumerate() {
                let index = index as u32;
                let predicted = layer == output && label.is_some_and(|k| k.get() == index);
                nodes.push(NodeView {
                    layer,
                    index,
                    center,
                    scale: if revealed {
                        NodeScale::Large
                    } else {
                        NodeScale::Small
                    },
                    scale_factor,
                    fill: if predicted {
                        NodeFill::Predicted
                    } else {
                        NodeFill::Normal
                    },
                    color: if predicted {
                        style.node_predicted
                    } else {
                        style.node
                    },
                });
            }
        }

        let caption = match label {
            Some(label) if clock.caption_visible() => {
                let t = style
                    .caption_transition
                    .progress_since(engine.completed_at(), now);
                Some(CaptionView {
                    label,
                    opacity: t,
                    scale: 0.7 + 0.3 * t,
                })
            }
            _ => None,
        };

        Self {
            bounds: layout.bounds(),
            node_radius: layout.opts().node_diameter / 2.0,
            edges,
            nodes,
            caption,
        }
    }

    /// Edges of `layer` that are rendered.
    pub fn edges_into(&self, layer: usize) -> impl Iterator<Item = &EdgeView> {
        self.edges.iter().filter(move |e| e.id.layer == layer)
    }

    /// Node `index` of `layer`.
    pub fn node(&self, layer: usize, index: u32) -> Option<&NodeView> {
        self.nodes
            .iter()
            .find(|n| n.layer == layer && n.index == index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/view.rs"]
mod tests;
