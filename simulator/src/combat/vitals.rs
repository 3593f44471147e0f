#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Health(pub u32, pub u32);

impl Health {
    pub fn full(max: u32) -> Self {
        Self(max, max)
    }

    pub fn max(&self) -> u32 {
        self.1
    }

    pub fn current(&self) -> u32 {
        self.0
    }

    pub fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    pub fn fraction(&self) -> f32 {
        if self.1 == 0 {
            return 0.0;
        }
        (self.0 as f64 / self.1 as f64) as f32
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Health ({}/{})", self.current(), self.max())
    }
}

impl std::ops::Add<u32> for Health {
    type Output = Self;

    fn add(self, other: u32) -> Self::Output {
        Self(self.0.saturating_add(other).min(self.1), self.1)
    }
}

impl std::ops::Sub<u32> for Health {
    type Output = Self;

    fn sub(self, other: u32) -> Self::Output {
        Self(self.0.saturating_sub(other), self.1)
    }
}

impl std::ops::AddAssign<u32> for Health {
    fn add_assign(&mut self, other: u32) {
        *self = *self + other;
    }
}

impl std::ops::SubAssign<u32> for Health {
    fn sub_assign(&mut self, other: u32) {
        *self = *self - other;
    }
}

/// What a hit actually did after block soaked its share.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DamageReport {
    pub absorbed: u32,
    pub dealt: u32,
}

/// Health plus block. Player and enemies share the same damage law.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Vitals {
    pub health: Health,
    pub block: u32,
}

impl Vitals {
    pub fn new(health: Health) -> Self {
        Self { health, block: 0 }
    }

    /// Block soaks first, the remainder comes off health.
    pub fn take_damage(&mut self, amount: u32) -> DamageReport {
        let absorbed = self.block.min(amount);
        self.block -= absorbed;
        let dealt = amount - absorbed;
        if dealt > 0 {
            self.health -= dealt;
        }
        DamageReport { absorbed, dealt }
    }

    /// Health loss that skips block.
    pub fn lose_health(&mut self, amount: u32) {
        self.health -= amount;
    }

    pub fn heal(&mut self, amount: u32) {
        self.health += amount;
    }

    pub fn gain_block(&mut self, amount: u32) {
        self.block = self.block.saturating_add(amount);
    }

    pub fn lose_block(&mut self, amount: u32) {
        self.block = self.block.saturating_sub(amount);
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_depleted()
    }
}

impl std::fmt::Display for Vitals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} 🛡️:{}", self.health, self.block)
    }
}
