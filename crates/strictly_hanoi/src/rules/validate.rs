//! Move legality.

use super::super::{Disk, RejectReason, TowerId, Towers};
use tracing::instrument;

/// Checks a proposed move, returning why it is illegal.
///
/// Only the top disk of a tower may move, and it may only land on an empty
/// tower or on a larger disk.
#[instrument(skip(towers))]
pub fn check_move(
    disk: Disk,
    from: TowerId,
    to: TowerId,
    towers: &Towers,
) -> Result<(), RejectReason> {
    if from == to {
        return Err(RejectReason::SameTower);
    }

    match towers.top_disk(from) {
        None => return Err(RejectReason::EmptySource(from)),
        Some(top) if top != disk => return Err(RejectReason::NotTopDisk(disk)),
        Some(_) => {}
    }

    match towers.top_disk(to) {
        None => Ok(()),
        Some(target_top) if disk < target_top => Ok(()),
        Some(target_top) => Err(RejectReason::LargerOnSmaller { disk, target_top }),
    }
}

/// Returns true if moving `disk` from `from` to `to` is legal.
pub fn is_valid_move(disk: Disk, from: TowerId, to: TowerId, towers: &Towers) -> bool {
    check_move(disk, from, to, towers).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_tower_rejected() {
        let towers = Towers::stacked(3);
        assert_eq!(
            check_move(Disk::new(1), TowerId::Left, TowerId::Left, &towers),
            Err(RejectReason::SameTower)
        );
    }

    #[test]
    fn test_empty_source_rejected() {
        let towers = Towers::stacked(3);
        assert_eq!(
            check_move(Disk::new(1), TowerId::Middle, TowerId::Right, &towers),
            Err(RejectReason::EmptySource(TowerId::Middle))
        );
    }

    #[test]
    fn test_buried_disk_rejected() {
        let towers = Towers::stacked(3);
        assert_eq!(
            check_move(Disk::new(2), TowerId::Left, TowerId::Right, &towers),
            Err(RejectReason::NotTopDisk(Disk::new(2)))
        );
    }

    #[test]
    fn test_move_to_empty_tower_allowed() {
        let towers = Towers::stacked(3);
        assert!(is_valid_move(
            Disk::new(1),
            TowerId::Left,
            TowerId::Right,
            &towers
        ));
    }

    #[test]
    fn test_larger_on_smaller_rejected() {
        let mut towers = Towers::stacked(3);
        let small = towers.pop(TowerId::Left).unwrap();
        towers.push(TowerId::Right, small);

        assert_eq!(
            check_move(Disk::new(2), TowerId::Left, TowerId::Right, &towers),
            Err(RejectReason::LargerOnSmaller {
                disk: Disk::new(2),
                target_top: Disk::new(1),
            })
        );
    }

    #[test]
    fn test_smaller_on_larger_allowed() {
        let mut towers = Towers::stacked(3);
        let small = towers.pop(TowerId::Left).unwrap();
        towers.push(TowerId::Right, small);
        let medium = towers.pop(TowerId::Left).unwrap();
        towers.push(TowerId::Middle, medium);

        assert!(is_valid_move(
            Disk::new(1),
            TowerId::Right,
            TowerId::Middle,
            &towers
        ));
    }
}
