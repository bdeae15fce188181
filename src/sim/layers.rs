//! Collision categories and the collides-with matrix
//!
//! Each entity kind owns one bit. A pair generates contacts only when each
//! side's category is in the other side's mask.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    WorldBound,
    Player,
    PlayerProjectile,
    Enemy,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::WorldBound,
        Category::Player,
        Category::PlayerProjectile,
        Category::Enemy,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Category::WorldBound => 0,
            Category::Player => 1,
            Category::PlayerProjectile => 2,
            Category::Enemy => 3,
        }
    }

    /// Disjoint category bit
    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self.index()
    }

    /// Categories this kind is allowed to touch
    pub const fn mask(self) -> CollisionMask {
        CollisionMask(MASKS[self.index()])
    }
}

const WB: u32 = Category::WorldBound.bit();
const PL: u32 = Category::Player.bit();
const PP: u32 = Category::PlayerProjectile.bit();
const EN: u32 = Category::Enemy.bit();

/// Indexed by `Category::index`
const MASKS: [u32; 4] = [
    // WorldBound keeps the player and enemies inside
    PL | EN,
    // Player
    EN | WB,
    // PlayerProjectile
    EN,
    // Enemy
    EN | PL | PP | WB,
];

/// Set of categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionMask(u32);

impl CollisionMask {
    pub const NONE: CollisionMask = CollisionMask(0);

    pub fn of(categories: &[Category]) -> Self {
        Self(categories.iter().fold(0, |bits, c| bits | c.bit()))
    }

    #[inline]
    pub fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }
}

/// Category plus mask, as registered with the physics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category: Category,
    pub mask: CollisionMask,
}

impl CollisionFilter {
    pub fn for_category(category: Category) -> Self {
        Self {
            category,
            mask: category.mask(),
        }
    }

    /// Engine filtering rule: both sides must accept each other
    #[inline]
    pub fn can_collide(&self, other: &CollisionFilter) -> bool {
        self.mask.contains(other.category) && other.mask.contains(self.category)
    }
}

/// Symmetric predicate over two entity kinds using the default masks
#[inline]
pub fn collides(a: Category, b: Category) -> bool {
    CollisionFilter::for_category(a).can_collide(&CollisionFilter::for_category(b))
}
