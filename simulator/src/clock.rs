use std::time::Duration;

/// Seconds of simulated time. Every timer in the core (pause windows, tween
/// progress, leak detection) accumulates these instead of reading a wall clock.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct GameTime(pub f64);

impl GameTime {
    pub const ZERO: GameTime = GameTime(0.0);

    pub fn seconds(&self) -> f64 {
        self.0
    }

    pub fn is_elapsed(&self) -> bool {
        self.0 <= 0.0
    }
}

impl From<Duration> for GameTime {
    fn from(value: Duration) -> Self {
        Self(value.as_secs_f64())
    }
}

impl From<f64> for GameTime {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for GameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

impl std::ops::Add for GameTime {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        GameTime(self.0 + other.0)
    }
}

impl std::ops::Sub for GameTime {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        GameTime(self.0 - other.0)
    }
}

impl std::ops::AddAssign for GameTime {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl std::ops::SubAssign for GameTime {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl std::ops::Add<f64> for GameTime {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        GameTime(self.0 + rhs)
    }
}

impl std::ops::Sub<f64> for GameTime {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        GameTime(self.0 - rhs)
    }
}

impl std::ops::AddAssign<f64> for GameTime {
    fn add_assign(&mut self, rhs: f64) {
        self.0 += rhs;
    }
}

impl std::ops::SubAssign<f64> for GameTime {
    fn sub_assign(&mut self, rhs: f64) {
        self.0 -= rhs;
    }
}
