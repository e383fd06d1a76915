//! Disk conservation invariant: every disk exists exactly once.

use super::super::{HanoiEngine, TowerId};
use super::Invariant;

/// Invariant: the towers together hold disks `1..=disk_count`, each once.
pub struct DiskConservationInvariant;

impl Invariant<HanoiEngine> for DiskConservationInvariant {
    fn holds(game: &HanoiEngine) -> bool {
        let mut sizes: Vec<u8> = TowerId::ALL
            .iter()
            .flat_map(|&id| game.towers().tower(id).iter().map(|d| d.size()))
            .collect();
        sizes.sort_unstable();

        let expected: Vec<u8> = (1..=*game.level().disk_count()).collect();
        sizes == expected
    }

    fn description() -> &'static str {
        "Towers hold each disk of the level exactly once"
    }
}
