//! Word-of-mouth diffusion tests

use pheme_core::{
    Character, DiffusionConfig, EmotionVector, EvolutionManager, InteractionKind,
    InteractionsEngine, PersonalityVector, RelationshipLabel, Scope, Simulation, TransformConfig,
    TriadVector,
};
use pheme_events::{DropReason, SimEvent};

fn world(names: &[&str], edges: &[(&str, &str, u32)], engine: InteractionsEngine) -> Simulation {
    let mut sim = Simulation::with_parts(11, EvolutionManager::default(), engine);
    for (i, name) in names.iter().enumerate() {
        let emotions = EmotionVector::new(0.1 * i as f64, 0.2, 0.3, 0.1, 0.0, 0.4);
        let personality = PersonalityVector::new(0.3, -0.2, 0.5, 0.1, -0.4);
        sim.add_character(Character::new(*name, personality, emotions))
            .unwrap();
    }
    for (source, target, distance) in edges {
        sim.add_relationship(source, target, TriadVector::neutral(), *distance)
            .unwrap();
    }
    sim.drain_events();
    sim
}

fn deliveries_to(events: &[SimEvent], name: &str) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SimEvent::InteractionDelivered { character, .. } if character == name))
        .count()
}

#[test]
fn test_delivery_waits_for_distance() {
    let mut sim = world(
        &["A", "B", "C"],
        &[("B", "C", 3)],
        InteractionsEngine::default(),
    );
    let id = sim
        .trigger_kind("A", "B", InteractionKind::Insulted, Scope::Private)
        .unwrap();

    sim.run(2);
    assert!(!sim.character("C").unwrap().knows(id));
    assert!(sim
        .pending_diffusions()
        .iter()
        .any(|p| p.target == "C" && p.arrival_tick == 3));

    let report = sim.step().unwrap();
    assert_eq!(report.tick, 3);
    assert_eq!(report.delivery.delivered, 1);
    assert!(sim.character("C").unwrap().knows(id));
}

#[test]
fn test_overlapping_paths_deliver_once() {
    let mut sim = world(
        &["A", "B", "C"],
        &[("A", "C", 1), ("B", "C", 2)],
        InteractionsEngine::default(),
    );
    sim.trigger_kind("A", "B", InteractionKind::Praised, Scope::Private)
        .unwrap();
    sim.run(3);

    let events = sim.drain_events();
    assert_eq!(deliveries_to(&events, "C"), 1);
    let already_known = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                SimEvent::InteractionDropped { character, reason: DropReason::AlreadyKnown, .. }
                    if character == "C"
            )
        })
        .count();
    assert_eq!(already_known, 1);
    assert!(sim.pending_diffusions().is_empty());
}

#[test]
fn test_secret_never_spreads() {
    let mut sim = world(
        &["A", "B", "C"],
        &[("A", "C", 1), ("B", "C", 1)],
        InteractionsEngine::default(),
    );
    let id = sim
        .trigger_kind("A", "B", InteractionKind::Kissed, Scope::Secret)
        .unwrap();
    assert!(sim.pending_diffusions().is_empty());

    sim.run(5);
    assert!(!sim.character("C").unwrap().knows(id));
    assert!(sim.character("A").unwrap().knows(id));
    assert!(sim.character("B").unwrap().knows(id));
}

#[test]
fn test_public_reaches_everyone_immediately() {
    let mut sim = world(&["A", "B", "C", "D"], &[], InteractionsEngine::default());
    let id = sim
        .trigger_kind("A", "B", InteractionKind::Threatened, Scope::Public)
        .unwrap();

    for name in ["A", "B", "C", "D"] {
        assert!(sim.character(name).unwrap().knows(id), "{name} should know");
    }
    let events = sim.drain_events();
    assert_eq!(deliveries_to(&events, "C"), 1);
    assert_eq!(deliveries_to(&events, "D"), 1);
    assert_eq!(deliveries_to(&events, "A"), 0);
    assert!(sim.pending_diffusions().is_empty());
}

#[test]
fn test_rediffusion_carries_news_along_a_chain() {
    let edges = [("B", "C", 1), ("C", "D", 1)];
    let names = ["A", "B", "C", "D"];

    let mut quiet = world(&names, &edges, InteractionsEngine::default());
    let id = quiet
        .trigger_kind("A", "B", InteractionKind::Helped, Scope::Private)
        .unwrap();
    quiet.run(4);
    assert!(quiet.character("C").unwrap().knows(id));
    assert!(!quiet.character("D").unwrap().knows(id));

    let engine = InteractionsEngine::new(
        TransformConfig::default(),
        DiffusionConfig {
            rediffuse_on_delivery: true,
        },
    );
    let mut chatty = world(&names, &edges, engine);
    let id = chatty
        .trigger_kind("A", "B", InteractionKind::Helped, Scope::Private)
        .unwrap();
    chatty.run(4);
    assert!(chatty.character("D").unwrap().knows(id));
}

#[test]
fn test_zero_emotion_matrix_keeps_emotions() {
    let engine = InteractionsEngine::new(
        TransformConfig {
            emotion_matrix: [[0.0; 5]; 6],
            ..TransformConfig::default()
        },
        DiffusionConfig::default(),
    );
    let mut sim = world(&["A", "B", "C"], &[("C", "A", 1)], engine);
    let before: Vec<EmotionVector> = sim.graph().characters().iter().map(|c| c.emotions).collect();

    sim.trigger_kind("A", "B", InteractionKind::Helped, Scope::Public)
        .unwrap();

    let after: Vec<EmotionVector> = sim.graph().characters().iter().map(|c| c.emotions).collect();
    assert_eq!(before, after);
    // Relationships still move
    assert!(sim.relationship("B", "A").unwrap().triad.average() > 0.0);
}

#[test]
fn test_relationship_labels() {
    assert_eq!(TriadVector::new(0.8, 0.8, 0.8).label(), RelationshipLabel::Love);
    assert_eq!(TriadVector::neutral().label(), RelationshipLabel::Neutral);
    assert_eq!(
        TriadVector::new(-0.8, -0.8, -0.8).label(),
        RelationshipLabel::Hatred
    );
}
