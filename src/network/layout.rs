use crate::foundation::core::{Point, Rect};
use crate::network::topology::NetworkTopology;

/// Geometry of the schematic diagram, in SVG user units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutOpts {
    /// Horizontal distance between layer columns.
    pub horizontal_gap: f64,
    /// Vertical distance between nodes of one layer.
    pub vertical_gap: f64,
    /// Node diameter before scaling.
    pub node_diameter: f64,
    /// x of the first column.
    pub left_margin: f64,
    /// y every column is centred on.
    pub center_y: f64,
    /// Extra width after the last column.
    pub right_padding: f64,
    /// Total diagram height.
    pub height: f64,
}

impl Default for LayoutOpts {
    fn default() -> Self {
        Self {
            horizontal_gap: 130.0,
            vertical_gap: 16.0,
            node_diameter: 10.0,
            left_margin: 40.0,
            center_y: 250.0,
            right_padding: 100.0,
            height: 450.0,
        }
    }
}

/// Node positions for every displayed node of a topology.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagramLayout {
    opts: LayoutOpts,
    columns: Vec<Vec<Point>>,
    bounds: Rect,
}

impl DiagramLayout {
    /// Lay out `topology`: one column per layer, displayed nodes centred vertically.
    pub fn new(topology: &NetworkTopology, opts: LayoutOpts) -> Self {
        let columns = (0..topology.len())
            .map(|layer| {
                let n = topology.displayed_nodes(layer);
                let x = opts.left_margin + layer as f64 * opts.horizontal_gap;
                (0..n)
                    .map(|i| {
                        let offset = f64::from(i) * opts.vertical_gap
                            - f64::from(n.saturating_sub(1)) * opts.vertical_gap / 2.0;
                        Point::new(x, opts.center_y + offset)
                    })
                    .collect()
            })
            .collect();
        let width = topology.len() as f64 * opts.horizontal_gap + opts.right_padding;
        Self {
            opts,
            columns,
            bounds: Rect::new(0.0, 0.0, width, opts.height),
        }
    }

    /// Geometry options.
    pub fn opts(&self) -> LayoutOpts {
        self.opts
    }

    /// Diagram extent.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Centre of node `index` in `layer`.
    pub fn node(&self, layer: usize, index: u32) -> Option<Point> {
        self.columns.get(layer)?.get(index as usize).copied()
    }

    /// All node centres of `layer`.
    pub fn column(&self, layer: usize) -> &[Point] {
        self.columns.get(layer).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/network/layout.rs"]
mod tests;
