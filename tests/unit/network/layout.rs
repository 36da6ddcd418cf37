use super::*;

#[test]
fn columns_are_centred_on_the_midline() {
    let topo = NetworkTopology::mnist_demo();
    let layout = DiagramLayout::new(&topo, LayoutOpts::default());

    let out = layout.column(3);
    assert_eq!(out.len(), 10);
    assert_eq!(out[0], Point::new(430.0, 250.0 - 72.0));
    assert_eq!(out[9], Point::new(430.0, 250.0 + 72.0));

    let input = layout.column(0);
    assert_eq!(input.len(), 25);
    assert_eq!(input[12], Point::new(40.0, 250.0));
}

#[test]
fn bounds_match_column_count() {
    let topo = NetworkTopology::mnist_demo();
    let layout = DiagramLayout::new(&topo, LayoutOpts::default());
    assert_eq!(layout.bounds(), Rect::new(0.0, 0.0, 620.0, 450.0));
}

#[test]
fn unknown_nodes_are_none() {
    let topo = NetworkTopology::mnist_demo();
    let layout = DiagramLayout::new(&topo, LayoutOpts::default());
    assert_eq!(layout.node(3, 10), None);
    assert_eq!(layout.node(7, 0), None);
    assert!(layout.column(7).is_empty());
}
