//! Per-kind placement rules.
//!
//! Brand entries, featured ("popular") brands and PiP videos share one record shape.
//! A [`Placement`] says which parts of that shape a kind uses and how its ranks are
//! disambiguated.

use std::ops::RangeInclusive;

use crate::entities::placed_entry::EntryKind;

pub const TILE_RANGE: RangeInclusive<i32> = 1..=28;
pub const AUTOPLAY_SPEED_RANGE: RangeInclusive<i32> = 1000..=30000;
pub const DEFAULT_AUTOPLAY_SPEED: i32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleRule {
    /// The kind has no active window.
    None,
    /// A window may be given; if it is, both ends are needed.
    Optional,
    /// Every entry carries a window.
    Required,
}

/// Which other entries a priority rank must not collide with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankScope {
    /// Duplicate ranks are allowed; rank only drives sort order.
    Unscoped,
    /// Unique among priority entries sharing a tile.
    PerTile,
    /// Unique across every entry of the kind.
    Global,
}

#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub label: &'static str,
    /// Carries brand name, description, category, priority and autoplay speed.
    pub branded: bool,
    pub category_required: bool,
    pub tiled: bool,
    pub schedule: ScheduleRule,
    pub has_status: bool,
    pub rank_scope: RankScope,
}

impl EntryKind {
    pub fn placement(self) -> Placement {
        match self {
            EntryKind::Content => Placement {
                label: "Premium Brand",
                branded: true,
                category_required: true,
                tiled: false,
                schedule: ScheduleRule::Optional,
                has_status: true,
                rank_scope: RankScope::Unscoped,
            },
            EntryKind::PopularBrand => Placement {
                label: "Popular Brand",
                branded: true,
                category_required: false,
                tiled: true,
                schedule: ScheduleRule::Required,
                has_status: true,
                rank_scope: RankScope::PerTile,
            },
            EntryKind::PipVideo => Placement {
                label: "PiP Video",
                branded: false,
                category_required: false,
                tiled: false,
                schedule: ScheduleRule::None,
                has_status: false,
                rank_scope: RankScope::Global,
            },
        }
    }
}
