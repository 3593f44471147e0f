mod aux;

use rstest::rstest;
use simulator::{
    Animation, Entity, EntityFactory, EntityId, EntityKind, EntityRegistry, Tween,
};

fn effect(text: &str) -> Entity {
    Entity::new(
        EntityKind::Effect {
            text: text.to_string(),
        },
        "effect.png",
    )
}

#[derive(Default)]
struct CountingFactory {
    created: u32,
    initialized: u32,
    seen_registered: bool,
}

impl EntityFactory for CountingFactory {
    fn create(&mut self) -> Entity {
        self.created += 1;
        effect("counted")
    }

    fn on_initialized(&mut self, entity: &mut Entity) {
        self.initialized += 1;
        self.seen_registered = entity.is_registered();
        entity.draw_priority = 7;
    }
}

#[rstest]
fn test_initialization_hook_runs_once_after_registration() -> Result<(), Box<dyn std::error::Error>>
{
    let mut registry = EntityRegistry::default();
    let mut factory = CountingFactory::default();
    let id = registry.instantiate(&mut factory);
    assert_eq!(factory.created, 1);
    assert_eq!(factory.initialized, 1);
    assert!(factory.seen_registered);
    assert_eq!(registry.get(id).map(|e| e.draw_priority), Some(7));

    registry.update(0.1);
    registry.update(0.1);
    assert_eq!(factory.initialized, 1);
    Ok(())
}

#[rstest]
#[should_panic(expected = "updated before it was registered")]
fn test_updating_unregistered_entity_panics() {
    let mut entity = effect("loose");
    entity.update(0.1);
}

#[rstest]
#[should_panic(expected = "registered twice")]
fn test_double_registration_panics() {
    let mut registry = EntityRegistry::default();
    let id = registry.register(effect("first"));
    registry.register(Entity::with_id(id, EntityKind::Background, "again.png"));
}

#[rstest]
#[should_panic(expected = "is not registered")]
fn test_updating_unknown_id_panics() {
    let mut registry = EntityRegistry::default();
    registry.update_entity(EntityId::new(), 0.1);
}

#[rstest]
fn test_unknown_animation_target_is_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = EntityRegistry::default();
    let displaced = registry.play_animation(
        EntityId::new(),
        0,
        Animation::new().alpha(Tween::new(0.0, 1.0, 1.0)),
    );
    assert!(displaced.is_none());
    assert!(registry.is_empty());
    Ok(())
}

#[rstest]
fn test_destruction_is_deferred_to_sweep() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = EntityRegistry::default();
    let doomed = registry.register(effect("doomed"));
    let kept = registry.register(effect("kept"));

    assert!(registry.destroy(doomed));
    assert!(registry.contains(doomed));
    let frame = registry.update(0.1);
    assert_eq!(frame.len(), 2);

    assert_eq!(registry.sweep(), vec![doomed]);
    assert!(!registry.contains(doomed));
    assert!(registry.contains(kept));
    assert!(!registry.destroy(doomed));
    Ok(())
}

#[rstest]
fn test_lingering_entity_is_reported_once() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = EntityRegistry::new(3.0);
    let id = registry.register(effect("stuck"));
    registry.destroy(id);

    for _ in 0..3 {
        registry.update(1.0);
    }
    assert!(registry.leaks().is_empty());

    registry.update(1.0);
    assert_eq!(registry.leaks().len(), 1);
    assert_eq!(registry.leaks()[0].id, id);
    assert_eq!(registry.leaks()[0].detected_at.seconds(), 4.0);

    registry.update(1.0);
    assert_eq!(registry.leaks().len(), 1);
    Ok(())
}

#[rstest]
fn test_taken_leaks_are_not_reported_again() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = EntityRegistry::new(1.0);
    let first = registry.register(effect("first"));
    registry.destroy(first);
    registry.update(2.0);

    let taken = registry.take_leaks();
    assert_eq!(taken.len(), 1);
    assert_eq!(taken[0].id, first);
    assert!(registry.leaks().is_empty());

    let second = registry.register(effect("second"));
    registry.destroy(second);
    registry.update(2.0);
    assert_eq!(registry.leaks().len(), 1);
    assert_eq!(registry.leaks()[0].id, second);
    Ok(())
}

#[rstest]
fn test_frame_is_ordered_by_draw_priority() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = EntityRegistry::default();
    let high = registry.register(effect("high").with_draw_priority(5));
    let low = registry.register(effect("low").with_draw_priority(-1));
    let mid = registry.register(effect("mid").with_draw_priority(3));
    let mut hidden = effect("hidden");
    hidden.active = false;
    registry.register(hidden);

    let frame = registry.update(0.1);
    let order: Vec<EntityId> = frame.iter().map(|item| item.id).collect();
    assert_eq!(order, vec![low, mid, high]);
    Ok(())
}

#[rstest]
fn test_finished_animation_destroys_owner() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = EntityRegistry::default();
    let id = registry.register(effect("fading"));
    registry.play_animation(
        id,
        0,
        Animation::new().alpha(Tween::new(1.0, 0.0, 0.5)).then_destroy(),
    );
    registry.update(0.25);
    registry.sweep();
    assert!(registry.contains(id));

    registry.update(0.25);
    let snapshot = registry.snapshot(id).ok_or("entity vanished early")?;
    assert!(snapshot.awaiting_destruction);
    assert_eq!(snapshot.visual.alpha, 0.0);
    registry.sweep();
    assert!(!registry.contains(id));
    assert!(registry.leaks().is_empty());
    Ok(())
}
