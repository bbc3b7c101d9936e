//! Creature species known to the kill-drop tables.

use serde::{Deserialize, Serialize};

use crate::god::GodType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureType {
    EnderDragon,
    Wither,
    ElderGuardian,
    Warden,
    Evoker,
    WitherSkeleton,
    Shulker,
    Blaze,
    Ghast,
    Enderman,
    Guardian,
    PiglinBrute,
    Skeleton,
    Zombie,
    Phantom,
    ZombifiedPiglin,
    MagmaCube,
    Hoglin,
    Drowned,
    Squid,
    GlowSquid,
    Vindicator,
    Witch,
    Creeper,
    Spider,
    CaveSpider,
    Vex,
    Endermite,
    Silverfish,
    /// Anything the tables do not name.
    Other,
}

impl CreatureType {
    /// Species that always clear the extra rarity roll and whose drops are
    /// announced server-wide.
    pub const fn is_boss(self) -> bool {
        matches!(
            self,
            CreatureType::EnderDragon
                | CreatureType::Wither
                | CreatureType::ElderGuardian
                | CreatureType::Warden
        )
    }

    /// Gods whose fragments this species can carry.
    pub const fn associated_gods(self) -> &'static [GodType] {
        use CreatureType::*;
        use GodType::*;
        match self {
            Wither => &[Fallen, Banishment],
            WitherSkeleton | Skeleton | Zombie | ZombifiedPiglin => &[Fallen],
            Phantom => &[Fallen, Tempest],
            Blaze | Ghast => &[Banishment, Tempest],
            MagmaCube | Hoglin | PiglinBrute => &[Banishment],
            ElderGuardian | Guardian | Drowned | Squid | GlowSquid | Warden => &[Abyssal],
            Evoker => &[Sylvan, Tempest],
            Vindicator | Witch | Creeper | Spider | CaveSpider => &[Sylvan],
            Vex => &[Tempest],
            EnderDragon | Enderman | Endermite | Shulker | Silverfish => &[Veil],
            Other => &[],
        }
    }

    /// The god a kill of this species is credited to, if it has one.
    /// Ties resolve by [`GodType::ALL`] order.
    pub fn primary_god(self) -> Option<GodType> {
        self.associated_gods().first().copied()
    }

    pub fn display_name(self) -> String {
        let debug = format!("{self:?}");
        let mut out = String::with_capacity(debug.len() + 4);
        for (i, ch) in debug.chars().enumerate() {
            if ch.is_ascii_uppercase() && i > 0 {
                out.push(' ');
            }
            out.push(ch.to_ascii_lowercase());
        }
        out
    }
}
