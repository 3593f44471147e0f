lazy_static::lazy_static! {
    pub static ref MIN_DRAW_LIMIT: i32 = 3;
    pub static ref MAX_DRAW_LIMIT: i32 = 8;
    pub static ref ROOM_SEED_OFFSET: u64 = 7229;
    pub static ref DEFAULT_ANIMATION_PRIORITY: i32 = 0;
    pub static ref HIT_FLASH_PRIORITY: i32 = 200;
    pub static ref CARD_DRAW_PRIORITY: i32 = 500;
    pub static ref CARD_DISCARD_PRIORITY: i32 = 1000;
    pub static ref CARD_DRAW_DURATION: f64 = 0.35;
    pub static ref CARD_DISCARD_DURATION: f64 = 0.3;
    pub static ref HAND_REPOSITION_DURATION: f64 = 0.2;
    pub static ref DAMAGE_NUMBER_DURATION: f64 = 0.8;
    pub static ref HAND_DRAW_LAYER: i32 = 100;
    pub static ref EFFECT_DRAW_LAYER: i32 = 200;
}

pub fn clamp_draw_limit(value: i32) -> i32 {
    value.clamp(*MIN_DRAW_LIMIT, *MAX_DRAW_LIMIT)
}
