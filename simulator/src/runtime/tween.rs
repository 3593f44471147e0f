use super::{Lerp, Vec2, Visual};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Position,
    Alpha,
    Scale,
}

impl Channel {
    fn bit(self) -> u8 {
        match self {
            Channel::Position => 0b001,
            Channel::Alpha => 0b010,
            Channel::Scale => 0b100,
        }
    }
}

/// Set of visual channels, used to track which ones a higher priority slot has
/// already claimed this tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub fn insert(&mut self, channel: Channel) {
        self.0 |= channel.bit();
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.0 & channel.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TweenStart<T> {
    Fixed(T),
    /// Re-read from the live value every tick until the tween completes.
    Current,
}

/// Single channel interpolation. Linear in elapsed fraction, clamped at 1 and
/// snapped to `end` once the duration has passed.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    pub start: TweenStart<T>,
    pub end: T,
    pub duration: f64,
    elapsed: f64,
}

impl<T: Lerp> Tween<T> {
    pub fn new(start: T, end: T, duration: f64) -> Self {
        Self {
            start: TweenStart::Fixed(start),
            end,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn from_current(end: T, duration: f64) -> Self {
        Self {
            start: TweenStart::Current,
            end,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Value at the current progress. `current` is the accessor read for a
    /// [`TweenStart::Current`] start.
    pub fn sample(&self, current: T) -> T {
        if self.is_finished() {
            return self.end;
        }
        let start = match self.start {
            TweenStart::Fixed(start) => start,
            TweenStart::Current => current,
        };
        T::lerp(start, self.end, self.progress())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChannelTween {
    Position(Tween<Vec2>),
    Alpha(Tween<f32>),
    Scale(Tween<f32>),
}

impl ChannelTween {
    pub fn channel(&self) -> Channel {
        match self {
            ChannelTween::Position(_) => Channel::Position,
            ChannelTween::Alpha(_) => Channel::Alpha,
            ChannelTween::Scale(_) => Channel::Scale,
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            ChannelTween::Position(t) => t.is_finished(),
            ChannelTween::Alpha(t) | ChannelTween::Scale(t) => t.is_finished(),
        }
    }

    /// Advances by `dt` and writes the new value into its channel of `visual`.
    pub fn step(&mut self, dt: f64, visual: &mut Visual) {
        match self {
            ChannelTween::Position(t) => {
                t.advance(dt);
                visual.position = t.sample(visual.position);
            }
            ChannelTween::Alpha(t) => {
                t.advance(dt);
                visual.alpha = t.sample(visual.alpha);
            }
            ChannelTween::Scale(t) => {
                t.advance(dt);
                visual.scale = t.sample(visual.scale);
            }
        }
    }
}
