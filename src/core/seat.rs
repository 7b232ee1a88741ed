//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! A duel always has exactly two seats. `Seat::First` opens the match.
//!
//! ## SeatMap
//!
//! Per-seat storage backed by a fixed two-element array.
//! Supports indexing by `Seat`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two fixed player slots in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    /// Both seats, in turn order.
    pub const ALL: [Seat; 2] = [Seat::First, Seat::Second];

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    /// The other seat.
    ///
    /// ```
    /// use duel_engine::core::Seat;
    ///
    /// assert_eq!(Seat::First.opponent(), Seat::Second);
    /// assert_eq!(Seat::Second.opponent(), Seat::First);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Short lowercase label, used for RNG stream names and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Seat::First => "first",
            Seat::Second => "second",
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use duel_engine::core::{Seat, SeatMap};
///
/// let mut hp: SeatMap<i32> = SeatMap::new(|_| 4000);
/// hp[Seat::Second] -= 500;
///
/// assert_eq!(hp[Seat::First], 4000);
/// assert_eq!(hp[Seat::Second], 3500);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; 2],
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(mut factory: impl FnMut(Seat) -> T) -> Self {
        Self {
            data: [factory(Seat::First), factory(Seat::Second)],
        }
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Mutable access to both values, in seat order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_basics() {
        assert_eq!(Seat::First.index(), 0);
        assert_eq!(Seat::Second.index(), 1);
        assert_eq!(format!("{}", Seat::Second), "second");
    }

    #[test]
    fn test_opponent_is_involution() {
        for seat in Seat::ALL {
            assert_ne!(seat, seat.opponent());
            assert_eq!(seat, seat.opponent().opponent());
        }
    }

    #[test]
    fn test_seat_map_new() {
        let map: SeatMap<usize> = SeatMap::new(|s| s.index() * 10);

        assert_eq!(map[Seat::First], 0);
        assert_eq!(map[Seat::Second], 10);
    }

    #[test]
    fn test_seat_map_values_mut() {
        let mut map: SeatMap<String> = SeatMap::new(|s| s.label().to_string());
        for value in map.values_mut() {
            value.push('!');
        }

        assert_eq!(map[Seat::First], "first!");
        assert_eq!(map[Seat::Second], "second!");
    }

    #[test]
    fn test_seat_serialization() {
        let json = serde_json::to_string(&Seat::Second).unwrap();
        let deserialized: Seat = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Seat::Second);
    }
}
