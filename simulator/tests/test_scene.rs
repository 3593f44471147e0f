mod aux;

use aux::{attack, enemy, hand_id, player, rng, start_combat, strike};
use rstest::rstest;
use simulator::{CombatScene, EnemyId, EntityKind, RunConfig};

fn scene() -> CombatScene {
    let config = RunConfig::default();
    let mut scene = CombatScene::new(config.screen, config.leak_grace_seconds);
    scene.enter_room("crypt.png");
    scene
}

#[rstest]
fn test_drawn_cards_get_entities_in_hand_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rng();
    let mut combat = start_combat(
        player(100, 3),
        vec![enemy(0, 30, vec![attack(1)])],
        vec![strike(); 7],
        &mut rng,
    );
    let mut scene = scene();
    scene.load_combat(&mut combat);

    let hand: Vec<_> = combat.deck.hand.iter().map(|c| c.id).collect();
    assert_eq!(scene.hand_order(), hand.as_slice());
    for card in &hand {
        assert!(scene.card_entity(*card).is_some());
    }
    // Background, one enemy, five cards.
    assert_eq!(scene.registry.len(), 7);

    let frame = scene.update(1.0);
    let entity = scene.card_entity(hand[0]).ok_or("card has an entity")?;
    let card = frame
        .iter()
        .find(|item| item.id == entity)
        .ok_or("card is drawn")?;
    assert_eq!(card.visual.alpha, 1.0);
    assert_eq!(card.visual.scale, 1.0);
    assert_eq!(card.visual.position.y, RunConfig::default().screen.hand_y);
    Ok(())
}

#[rstest]
fn test_played_card_animates_out_then_disappears() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rng();
    let mut combat = start_combat(
        player(100, 3),
        vec![enemy(0, 30, vec![attack(1)])],
        vec![strike(); 7],
        &mut rng,
    );
    let mut scene = scene();
    scene.load_combat(&mut combat);
    scene.update(1.0);

    let played = hand_id(&combat, "Strike");
    let entity = scene.card_entity(played).ok_or("card has an entity")?;
    assert!(combat.play_card(played, &mut rng));
    scene.apply(combat.drain_events(), &combat);

    assert!(scene.card_entity(played).is_none());
    assert_eq!(scene.hand_order().len(), 4);
    assert!(scene.registry.contains(entity));

    scene.update(1.0);
    scene.sweep();
    assert!(!scene.registry.contains(entity));

    let Some(EntityKind::Enemy { health, .. }) = scene
        .enemy_entity(EnemyId(0))
        .and_then(|id| scene.registry.get(id))
        .map(|e| e.kind.clone())
    else {
        panic!("enemy entity missing");
    };
    assert_eq!(health.current(), 24);
    Ok(())
}

#[rstest]
fn test_entering_a_room_clears_the_previous_one() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rng();
    let mut combat = start_combat(
        player(100, 3),
        vec![enemy(0, 30, vec![attack(1)])],
        vec![strike(); 7],
        &mut rng,
    );
    let mut scene = scene();
    scene.load_combat(&mut combat);
    scene.enter_room("next.png");
    assert!(scene.hand_order().is_empty());
    assert!(scene.enemy_entity(EnemyId(0)).is_none());
    scene.update(0.1);
    scene.sweep();
    assert_eq!(scene.registry.len(), 1);
    Ok(())
}
