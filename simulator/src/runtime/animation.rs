use std::collections::BTreeMap;

use super::{ChannelSet, ChannelTween, Tween, Vec2, Visual};

pub type FinishedCallback = Box<dyn FnOnce()>;

/// A composite of tweens over independent channels. It is finished once every
/// tween is, and its callback fires exactly once at that moment.
#[derive(Default)]
pub struct Animation {
    tweens: Vec<ChannelTween>,
    on_finished: Option<FinishedCallback>,
    destroy_on_finish: bool,
    finished: bool,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tween: ChannelTween) -> Self {
        self.tweens.push(tween);
        self
    }

    pub fn position(self, tween: Tween<Vec2>) -> Self {
        self.with(ChannelTween::Position(tween))
    }

    pub fn alpha(self, tween: Tween<f32>) -> Self {
        self.with(ChannelTween::Alpha(tween))
    }

    pub fn scale(self, tween: Tween<f32>) -> Self {
        self.with(ChannelTween::Scale(tween))
    }

    pub fn on_finished(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_finished = Some(Box::new(callback));
        self
    }

    /// Requests destruction of the owning entity when this animation ends.
    pub fn then_destroy(mut self) -> Self {
        self.destroy_on_finish = true;
        self
    }

    pub fn destroys_owner(&self) -> bool {
        self.destroy_on_finish
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tweens(&self) -> &[ChannelTween] {
        &self.tweens
    }

    pub fn channels(&self) -> ChannelSet {
        let mut set = ChannelSet::default();
        for tween in &self.tweens {
            set.insert(tween.channel());
        }
        set
    }

    /// Advances every tween whose channel is not in `claimed`. Returns `true`
    /// on the tick the composite completes.
    pub fn advance(&mut self, dt: f64, visual: &mut Visual, claimed: ChannelSet) -> bool {
        if self.finished {
            return false;
        }
        for tween in self.tweens.iter_mut() {
            if tween.is_finished() || claimed.contains(tween.channel()) {
                continue;
            }
            tween.step(dt, visual);
        }
        if self.tweens.iter().all(ChannelTween::is_finished) {
            self.finished = true;
            if let Some(callback) = self.on_finished.take() {
                callback();
            }
            return true;
        }
        false
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("tweens", &self.tweens)
            .field("has_callback", &self.on_finished.is_some())
            .field("destroy_on_finish", &self.destroy_on_finish)
            .field("finished", &self.finished)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationUpdate {
    pub finished: usize,
    pub destroy_requested: bool,
}

/// Priority keyed animations of one entity. A slot holds one animation; a
/// higher slot claims its channels and suspends lower slots on them until it
/// finishes. Channels nobody above claims keep running.
#[derive(Debug, Default)]
pub struct AnimationMap {
    slots: BTreeMap<i32, Animation>,
}

impl AnimationMap {
    /// Starts `animation` at `priority`, returning whatever it displaced.
    pub fn play(&mut self, priority: i32, animation: Animation) -> Option<Animation> {
        self.slots.insert(priority, animation)
    }

    pub fn get(&self, priority: i32) -> Option<&Animation> {
        self.slots.get(&priority)
    }

    pub fn is_playing(&self, priority: i32) -> bool {
        self.slots.contains_key(&priority)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn priorities(&self) -> impl Iterator<Item = i32> + '_ {
        self.slots.keys().copied()
    }

    pub fn update(&mut self, dt: f64, visual: &mut Visual) -> AnimationUpdate {
        let mut claimed = ChannelSet::default();
        let mut done: Vec<i32> = Vec::new();
        for (priority, animation) in self.slots.iter_mut().rev() {
            if animation.advance(dt, visual, claimed) {
                done.push(*priority);
            }
            for tween in animation.tweens() {
                claimed.insert(tween.channel());
            }
        }

        let mut update = AnimationUpdate::default();
        for priority in done {
            if let Some(animation) = self.slots.remove(&priority) {
                update.finished += 1;
                update.destroy_requested |= animation.destroys_owner();
            }
        }
        update
    }
}
