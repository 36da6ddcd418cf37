use super::*;

#[test]
fn demo_topology_shape() {
    let t = NetworkTopology::mnist_demo();
    assert_eq!(t.len(), 4);
    assert_eq!(t.output_layer(), 3);
    assert_eq!(t.class_count(), 10);
    assert!(!t.is_hidden(0));
    assert!(t.is_hidden(1));
    assert!(t.is_hidden(2));
    assert!(!t.is_hidden(3));
    assert_eq!(t.layers()[0].name, "input");
    assert_eq!(t.layers()[2].name, "hidden 2");
    assert_eq!(t.layers()[3].name, "output");
}

#[test]
fn displayed_nodes_respect_cap() {
    let t = NetworkTopology::from_sizes(&[784, 16, 16, 10], 28).unwrap();
    assert_eq!(t.displayed_nodes(0), 28);
    assert_eq!(t.displayed_nodes(1), 16);
    assert_eq!(t.displayed_nodes(3), 10);
    assert_eq!(t.displayed_nodes(9), 0);
}

#[test]
fn rejects_invalid_topologies() {
    assert!(NetworkTopology::from_sizes(&[10], 28).is_err());
    assert!(NetworkTopology::from_sizes(&[10, 0, 10], 28).is_err());
    assert!(NetworkTopology::from_sizes(&[10, 10], 0).is_err());
    // The predicted output node must always be drawable.
    assert!(NetworkTopology::from_sizes(&[10, 40], 28).is_err());
}

#[test]
fn demo_topology_matches_validated_construction() {
    let built = NetworkTopology::from_sizes(&[25, 20, 20, 10], DEFAULT_DISPLAY_CAP).unwrap();
    assert_eq!(NetworkTopology::mnist_demo(), built);
}
