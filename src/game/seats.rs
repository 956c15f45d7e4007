//! Table geometry relative to the local seat. Display grouping only.

pub type Seat = usize;

pub const SEAT_COUNT: usize = 4;

/// Seats are partnered across the table, so parity decides the team.
pub fn team_of(seat: Seat) -> usize {
    seat % 2
}

/// Where each other seat sits as seen from `own`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLayout {
    pub own: Seat,
    pub opposite: Seat,
    pub left: Seat,
    pub right: Seat,
}

impl SeatLayout {
    pub fn from_seat(own: Seat) -> Self {
        Self {
            own,
            opposite: (own + 2) % SEAT_COUNT,
            left: (own + 1) % SEAT_COUNT,
            right: (own + 3) % SEAT_COUNT,
        }
    }

    pub fn partner(&self) -> Seat {
        self.opposite
    }
}
