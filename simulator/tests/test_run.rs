mod aux;

use std::sync::{Arc, mpsc};

use aux::{catalog_builder, defend, small_catalog, special_room, strike};
use gamedata::Catalog;
use models::v1::{Rarity, RarityWeights, SpecialRoomAction};
use rstest::rstest;
use simulator::{
    Autopilot, DispatchableEvent, DungeonRun, RunAction, RunConfig, RunOutcome, RunStage,
    SaveStore, new_save,
};

fn fast_config() -> RunConfig {
    RunConfig {
        frame_delta: 0.1,
        pause_seconds: 0.2,
        ..Default::default()
    }
}

fn new_run(catalog: Arc<Catalog>, config: RunConfig, name: &str) -> DungeonRun {
    let save = new_save(name, &catalog, &config);
    DungeonRun::new(catalog, config, save)
}

#[rstest]
fn test_autopilot_clears_the_dungeon() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = SaveStore::new(dir.path());
    let catalog = Arc::new(small_catalog());
    let mut run = new_run(Arc::clone(&catalog), fast_config(), "autopilot").with_store(store.clone());

    let outcome = Autopilot.play_to_end(&mut run, 200_000)?;
    let RunOutcome::Victory(summary) = &outcome else {
        panic!("expected a victory, got {outcome}");
    };
    assert_eq!(summary.rooms_cleared, catalog.boss_room_index() + 1);
    assert_eq!(summary.rooms_visited.len(), 6);
    assert_eq!(summary.rooms_visited[0], "Room 1");
    assert_eq!(summary.rooms_visited[5], "Throne");
    assert_eq!(summary.deck_size, 5 + 5);
    assert!(run.is_finished());
    assert!(matches!(run.stage(), RunStage::Finished));
    assert!(!store.exists("autopilot")?);

    run.tick(0.1, None)?;
    assert_eq!(run.outcome(), Some(&outcome));
    Ok(())
}

#[rstest]
fn test_same_save_name_replays_the_same_run() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(small_catalog());
    let mut first = new_run(Arc::clone(&catalog), fast_config(), "replay");
    let mut second = new_run(Arc::clone(&catalog), fast_config(), "replay");
    let a = Autopilot.play_to_end(&mut first, 200_000)?;
    let b = Autopilot.play_to_end(&mut second, 200_000)?;
    assert_eq!(a, b);
    Ok(())
}

#[rstest]
fn test_start_persists_and_builds_the_first_combat() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = SaveStore::new(dir.path());
    let catalog = Arc::new(small_catalog());
    let (tx, rx) = mpsc::channel();
    let mut run = new_run(Arc::clone(&catalog), fast_config(), "fresh")
        .with_store(store.clone())
        .with_channel(tx);
    run.start()?;

    assert_eq!(store.load("fresh")?, *run.save());
    let combat = run.combat().ok_or("first room is a combat")?;
    assert_eq!(combat.deck.len(), run.save().cards.len());
    assert_eq!(combat.deck.hand.len(), 5);
    assert_eq!(combat.mana, 3);
    assert_eq!(run.scene().hand_order().len(), 5);
    assert!(run.scene().enemy_entity(simulator::EnemyId(0)).is_some());

    match rx.try_recv()? {
        DispatchableEvent::RoomEntered(0, name) => assert_eq!(name, "Room 1"),
        other => panic!("unexpected event {other:?}"),
    }

    run.tick(0.1, None)?;
    assert!(!run.frame().is_empty());
    Ok(())
}

#[rstest]
fn test_abandon_deletes_the_save() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = SaveStore::new(dir.path());
    let mut run = new_run(Arc::new(small_catalog()), fast_config(), "quitter")
        .with_store(store.clone());
    run.start()?;
    assert!(store.exists("quitter")?);

    let outcome = run.abandon()?;
    assert!(matches!(outcome, RunOutcome::Abandoned(_)));
    assert_eq!(outcome.inner_ref().rooms_cleared, 0);
    assert!(!store.exists("quitter")?);
    assert_eq!(run.abandon()?, outcome);
    Ok(())
}

#[rstest]
fn test_resumed_save_starts_at_its_room() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(small_catalog());
    let config = fast_config();
    let mut save = new_save("veteran", &catalog, &config);
    save.room_index = catalog.boss_room_index();
    save.player_health = 55;
    let mut run = DungeonRun::new(catalog, config, save);
    run.start()?;
    assert!(run.is_boss_room());
    assert_eq!(run.rooms_visited(), ["Throne".to_string()]);
    let combat = run.combat().ok_or("boss room is a combat")?;
    assert_eq!(combat.player.vitals.health.current(), 55);
    Ok(())
}

#[rstest]
fn test_special_room_removal_then_reward() -> Result<(), Box<dyn std::error::Error>> {
    let bargain = SpecialRoomAction {
        name: "Bargain".to_string(),
        change_health: -10,
        remove_card_count: 1,
        reward_card_count: 1,
        change_mana_permanent: 1,
        ..Default::default()
    };
    let catalog = Arc::new(
        catalog_builder(vec![strike(), defend()])
            .special_room(special_room("Market", Rarity::Common, vec![bargain]))
            .build()?,
    );
    let config = RunConfig {
        special_room_chance: 1.0,
        rarity_weights: RarityWeights {
            common: 1,
            uncommon: 0,
            rare: 0,
        },
        reward_card_count: 1,
        ..fast_config()
    };
    let mut save = new_save("trader", &catalog, &config);
    save.room_index = 2;
    let (tx, rx) = mpsc::channel();
    let mut run = DungeonRun::new(Arc::clone(&catalog), config, save).with_channel(tx);
    run.start()?;
    assert!(matches!(run.stage(), RunStage::Special(room) if room.name == "Market"));

    run.tick(0.1, Some(RunAction::ChooseAction(3)))?;
    assert!(matches!(run.stage(), RunStage::Special(_)));

    run.tick(0.1, Some(RunAction::ChooseAction(0)))?;
    assert_eq!(run.save().player_health, 90);
    assert_eq!(run.save().player_base_mana, 4);
    let RunStage::RemovingCards { removal, .. } = run.stage() else {
        panic!("expected card removal, got {}", run.stage());
    };
    assert_eq!(removal.choices.len(), 5);
    assert_eq!(run.scene().choice_entities().len(), 5);

    run.tick(0.1, Some(RunAction::RemoveCard(Some(0))))?;
    assert_eq!(run.save().cards.len(), 4);
    let RunStage::ChoosingReward(cards) = run.stage() else {
        panic!("expected a reward, got {}", run.stage());
    };
    assert_eq!(cards.len(), 1);

    run.tick(0.1, Some(RunAction::ChooseReward(Some(0))))?;
    assert_eq!(run.save().cards.len(), 5);
    assert_eq!(run.save().room_index, 3);

    let events: Vec<DispatchableEvent> = rx.try_iter().collect();
    assert!(events.iter().any(|e| matches!(e, DispatchableEvent::Warning(_))));
    assert!(events.iter().any(|e| matches!(e, DispatchableEvent::CardRemoved(_))));
    assert!(events.iter().any(|e| matches!(e, DispatchableEvent::RewardChosen(Some(_)))));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, DispatchableEvent::RoomEntered(3, _)))
    );
    Ok(())
}

#[rstest]
fn test_special_room_never_kills() -> Result<(), Box<dyn std::error::Error>> {
    let ritual = SpecialRoomAction {
        name: "Ritual".to_string(),
        change_health: -500,
        ..Default::default()
    };
    let catalog = Arc::new(
        catalog_builder(vec![strike(), defend()])
            .special_room(special_room("Altar", Rarity::Common, vec![ritual]))
            .build()?,
    );
    let config = RunConfig {
        special_room_chance: 1.0,
        rarity_weights: RarityWeights {
            common: 1,
            uncommon: 0,
            rare: 0,
        },
        ..fast_config()
    };
    let mut save = new_save("pilgrim", &catalog, &config);
    save.room_index = 2;
    let mut run = DungeonRun::new(catalog, config, save);
    run.start()?;
    run.tick(0.1, Some(RunAction::ChooseAction(0)))?;
    assert_eq!(run.save().player_health, 1);
    assert_eq!(run.save().room_index, 3);
    Ok(())
}

#[rstest]
fn test_failed_reward_roll_keeps_the_won_room() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(small_catalog());
    let config = RunConfig {
        reward_card_count: 1000,
        ..fast_config()
    };
    let (tx, rx) = mpsc::channel();
    let mut run = new_run(Arc::clone(&catalog), config, "autopilot").with_channel(tx);
    let starting_deck = run.save().cards.len();

    let error = Autopilot
        .play_to_end(&mut run, 200_000)
        .err()
        .ok_or("the reward roll should fail")?;
    assert!(format!("{error:#}").contains("only 4 exist"));
    assert_eq!(run.save().room_index, 0);
    assert_eq!(run.save().cards.len(), starting_deck);
    assert!(matches!(run.stage(), RunStage::Combat(combat) if combat.is_finished()));
    assert!(
        rx.try_iter()
            .any(|e| matches!(e, DispatchableEvent::Error(msg) if msg.contains("only 4 exist")))
    );

    assert!(run.tick(0.1, None).is_err());
    assert_eq!(run.rooms_visited().len(), 1);
    assert_eq!(run.save().room_index, 0);
    assert!(matches!(run.stage(), RunStage::Combat(combat) if combat.is_finished()));
    Ok(())
}

#[rstest]
fn test_failed_reward_roll_leaves_special_room_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let hoard = SpecialRoomAction {
        name: "Hoard".to_string(),
        change_health: -10,
        reward_card_count: 1000,
        change_mana_permanent: 1,
        ..Default::default()
    };
    let catalog = Arc::new(
        catalog_builder(vec![strike(), defend()])
            .special_room(special_room("Vault", Rarity::Common, vec![hoard]))
            .build()?,
    );
    let config = RunConfig {
        special_room_chance: 1.0,
        rarity_weights: RarityWeights {
            common: 1,
            uncommon: 0,
            rare: 0,
        },
        ..fast_config()
    };
    let mut save = new_save("hoarder", &catalog, &config);
    save.room_index = 2;
    let mut run = DungeonRun::new(catalog, config, save);
    run.start()?;

    for _ in 0..2 {
        assert!(run.tick(0.1, Some(RunAction::ChooseAction(0))).is_err());
        assert_eq!(run.save().player_health, 100);
        assert_eq!(run.save().player_base_mana, 3);
        assert_eq!(run.save().room_index, 2);
        assert!(matches!(run.stage(), RunStage::Special(room) if room.name == "Vault"));
    }
    Ok(())
}
