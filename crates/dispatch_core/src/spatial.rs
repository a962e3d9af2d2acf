//! Spatial operations on the dispatch grid.
//!
//! The city is an unbounded integer grid. Travel cost between two points is the
//! Manhattan distance: one grid unit per tick, x-axis first, then y-axis.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: i64,
    pub y: i64,
}

impl Location {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for Location {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

/// Manhattan distance between two grid points, saturating at `u64::MAX`.
pub fn manhattan_distance(a: Location, b: Location) -> u64 {
    a.x.abs_diff(b.x).saturating_add(a.y.abs_diff(b.y))
}

fn step_axis(position: &mut i64, target: i64) -> bool {
    match (*position).cmp(&target) {
        Ordering::Less => *position += 1,
        Ordering::Greater => *position -= 1,
        Ordering::Equal => return false,
    }
    true
}

/// Moves `position` exactly one unit towards `target`, resolving x before y.
///
/// Returns `true` if `position` equals `target` after the move. A position
/// already on the target stays put and reports arrival.
pub fn step_towards(position: &mut Location, target: Location) -> bool {
    if !step_axis(&mut position.x, target.x) {
        step_axis(&mut position.y, target.y);
    }
    *position == target
}

/// Grid extent reported to callers that seed entity positions.
///
/// Movement itself is not clamped to these bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridInfo {
    pub width: u32,
    pub height: u32,
}

impl Default for GridInfo {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
        }
    }
}

impl GridInfo {
    pub fn contains(&self, location: Location) -> bool {
        (0..self.width as i64).contains(&location.x)
            && (0..self.height as i64).contains(&location.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_is_symmetric_and_zero_only_on_same_point() {
        let points = [
            Location::new(0, 0),
            Location::new(3, 2),
            Location::new(-4, 7),
            Location::new(10, -10),
        ];
        for a in points {
            for b in points {
                assert_eq!(manhattan_distance(a, b), manhattan_distance(b, a));
                assert_eq!(manhattan_distance(a, b) == 0, a == b);
            }
        }
        assert_eq!(manhattan_distance(Location::new(-4, 7), Location::new(10, -10)), 31);
    }

    #[test]
    fn step_towards_resolves_x_before_y() {
        let mut position = Location::new(0, 0);
        let target = Location::new(2, -2);
        let mut path = Vec::new();
        while !step_towards(&mut position, target) {
            path.push(position);
        }
        path.push(position);

        assert_eq!(
            path,
            vec![
                Location::new(1, 0),
                Location::new(2, 0),
                Location::new(2, -1),
                Location::new(2, -2),
            ]
        );
    }

    #[test]
    fn step_towards_on_target_reports_arrival_without_moving() {
        let mut position = Location::new(5, 5);
        assert!(step_towards(&mut position, Location::new(5, 5)));
        assert_eq!(position, Location::new(5, 5));
    }

    #[test]
    fn trip_of_distance_d_takes_d_steps() {
        let start = Location::new(-3, 4);
        let target = Location::new(6, -1);
        let mut position = start;
        let mut steps = 0;
        loop {
            steps += 1;
            if step_towards(&mut position, target) {
                break;
            }
        }
        assert_eq!(steps, manhattan_distance(start, target));
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let low = Location::new(i64::MIN, i64::MIN);
        let high = Location::new(i64::MAX, i64::MAX);
        assert_eq!(manhattan_distance(low, high), u64::MAX);
        assert_eq!(manhattan_distance(high, low), u64::MAX);
        assert_eq!(
            manhattan_distance(Location::new(i64::MIN, 0), Location::new(i64::MAX, 0)),
            u64::MAX
        );

        let mut position = Location::new(i64::MIN, 0);
        assert!(!step_towards(&mut position, Location::new(i64::MAX, 0)));
        assert_eq!(position, Location::new(i64::MIN + 1, 0));

        let mut position = Location::new(0, i64::MAX);
        assert!(!step_towards(&mut position, Location::new(0, i64::MIN)));
        assert_eq!(position, Location::new(0, i64::MAX - 1));

        let mut position = Location::new(i64::MAX - 1, i64::MIN);
        assert!(!step_towards(&mut position, high));
        assert!(step_towards(&mut position, Location::new(i64::MAX, i64::MIN)));
    }

    #[test]
    fn grid_info_contains_checks_bounds() {
        let grid = GridInfo::default();
        assert!(grid.contains(Location::new(0, 0)));
        assert!(grid.contains(Location::new(99, 99)));
        assert!(!grid.contains(Location::new(100, 5)));
        assert!(!grid.contains(Location::new(-1, 5)));
    }
}
