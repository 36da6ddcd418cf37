use super::*;
use crate::animation::engine::EngineOpts;
use crate::animation::sampling::Rng64;
use crate::network::layout::LayoutOpts;
use crate::prediction::PredictionResult;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn setup(label: Option<i64>) -> (AnimationEngine, DiagramLayout) {
    let topology = NetworkTopology::mnist_demo();
    let layout = DiagramLayout::new(&topology, LayoutOpts::default());
    let mut engine = AnimationEngine::new(topology, EngineOpts::default());
    let prediction = label.map(|k| PredictionResult::new(Label::new(k, 10).unwrap()));
    engine.trigger(prediction, ms(0), &mut Rng64::new(5));
    (engine, layout)
}

#[test]
fn output_edges_only_reach_the_predicted_node_and_are_always_emphasized() {
    let (engine, layout) = setup(Some(7));
    let view = DiagramView::build(&engine, &layout, &DiagramStyle::default(), ms(0));
    let out: Vec<&EdgeView> = view.edges_into(3).collect();
    assert_eq!(out.len(), 20);
    assert!(out.iter().all(|e| e.id.target == 7));
    assert!(out.iter().all(|e| e.emphasis == Emphasis::Emphasized));
    assert!(out.iter().all(|e| !e.revealed));
}

#[test]
fn output_edges_are_dim_without_a_label() {
    let (mut engine, layout) = setup(None);
    engine.advance(ms(10_000));
    let view = DiagramView::build(&engine, &layout, &DiagramStyle::default(), ms(10_000));
    assert_eq!(view.edges_into(3).count(), 20 * 10);
    assert!(view.edges_into(3).all(|e| e.emphasis == Emphasis::Dim));
    assert_eq!(view.caption, None);
    assert!(view.nodes.iter().all(|n| n.fill == NodeFill::Normal));
}

#[test]
fn hidden_edges_emphasized_only_when_highlighted_and_revealed() {
    let (mut engine, layout) = setup(Some(1));
    let style = DiagramStyle::default();

    let before = DiagramView::build(&engine, &layout, &style, ms(0));
    assert!(
        before
            .edges
            .iter()
            .filter(|e| e.id.layer < 3)
            .all(|e| e.emphasis == Emphasis::Dim && e.color == style.edge_pending)
    );

    engine.advance(ms(700));
    let view = DiagramView::build(&engine, &layout, &style, ms(700));
    for e in view.edges_into(1) {
        let expected = if engine.highlights().contains(&e.id) {
            Emphasis::Emphasized
        } else {
            Emphasis::Dim
        };
        assert_eq!(e.emphasis, expected);
        assert!(e.revealed);
    }
    assert!(view.edges_into(2).all(|e| e.emphasis == Emphasis::Dim));
    assert_eq!(
        view.edges_into(1)
            .filter(|e| e.emphasis == Emphasis::Emphasized)
            .count(),
        engine.highlights().in_layer(1).count()
    );
}

#[test]
fn edge_colour_transitions_after_reveal() {
    let (mut engine, layout) = setup(Some(1));
    let style = DiagramStyle::default();
    engine.advance(ms(700));

    let start = DiagramView::build(&engine, &layout, &style, ms(700));
    let settled = DiagramView::build(&engine, &layout, &style, ms(1_000));
    let first = |v: &DiagramView| {
        v.edges_into(1)
            .find(|e| e.emphasis == Emphasis::Emphasized)
            .map(|e| e.color)
    };
    assert_eq!(first(&start), Some(style.edge_pending));
    assert_eq!(first(&settled), Some(style.edge_emphasized));
    assert!(
        settled
            .edges_into(1)
            .filter(|e| e.emphasis == Emphasis::Dim)
            .all(|e| e.color == style.edge_dim)
    );
}

#[test]
fn nodes_grow_when_their_layer_is_revealed() {
    let (mut engine, layout) = setup(Some(2));
    let style = DiagramStyle::default();
    engine.advance(ms(0));

    let view = DiagramView::build(&engine, &layout, &style, ms(400));
    let input = view.node(0, 0).unwrap();
    assert_eq!(input.scale, NodeScale::Large);
    assert!((input.scale_factor - 1.2).abs() < 1e-9);
    let hidden = view.node(1, 0).unwrap();
    assert_eq!(hidden.scale, NodeScale::Small);
    assert!((hidden.scale_factor - 0.8).abs() < 1e-9);
}

#[test]
fn predicted_node_and_caption_after_completion() {
    let (mut engine, layout) = setup(Some(4));
    let style = DiagramStyle::default();

    engine.advance(ms(3_299));
    let pending = DiagramView::build(&engine, &layout, &style, ms(3_299));
    assert_eq!(pending.caption, None);
    assert_eq!(pending.node(3, 4).unwrap().fill, NodeFill::Predicted);
    assert_eq!(pending.node(3, 5).unwrap().fill, NodeFill::Normal);

    engine.advance(ms(3_300));
    let appearing = DiagramView::build(&engine, &layout, &style, ms(3_300));
    let caption = appearing.caption.unwrap();
    assert_eq!(caption.label.get(), 4);
    assert_eq!(caption.opacity, 0.0);

    let shown = DiagramView::build(&engine, &layout, &style, ms(3_600));
    let caption = shown.caption.unwrap();
    assert_eq!(caption.opacity, 1.0);
    assert!((caption.scale - 1.0).abs() < 1e-9);
}

#[test]
fn classify_edge_is_pure_over_its_inputs() {
    let topology = NetworkTopology::mnist_demo();
    let mut clock = AnimationClock::new();
    let mut highlights = HighlightSet::new();
    let edge = EdgeId::new(2, 3, 4);
    highlights.insert(edge);

    assert_eq!(
        classify_edge(&topology, &clock, &highlights, None, &edge),
        Some(Emphasis::Dim)
    );
    clock.reveal(2);
    assert_eq!(
        classify_edge(&topology, &clock, &highlights, None, &edge),
        Some(Emphasis::Emphasized)
    );
    let label = Label::new(9, 10).ok();
    assert_eq!(
        classify_edge(&topology, &clock, &highlights, label, &EdgeId::new(3, 8, 0)),
        None
    );
    assert_eq!(
        classify_edge(&topology, &clock, &highlights, label, &EdgeId::new(3, 9, 0)),
        Some(Emphasis::Emphasized)
    );
}
