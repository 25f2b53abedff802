//! Per-position attribute weights
//!
//! Weights are whole percentages and sum to 100 for every position.
//! Goalkeepers are rated on the six goalkeeping attributes, everybody else
//! on the outfield ones.

use crate::types::{Attribute, Position};

/// Share of one attribute in a position's overall, in percent
pub type Weight = (Attribute, u32);

const GOALKEEPER: &[Weight] = &[
    (Attribute::Reflexes, 22),
    (Attribute::Diving, 22),
    (Attribute::Positioning, 20),
    (Attribute::Handling, 18),
    (Attribute::Kicking, 10),
    (Attribute::Speed, 8),
];

const STRIKER: &[Weight] = &[
    (Attribute::Shooting, 45),
    (Attribute::Dribbling, 20),
    (Attribute::Pace, 15),
    (Attribute::Physical, 15),
    (Attribute::Passing, 5),
];

const WINGER: &[Weight] = &[
    (Attribute::Pace, 35),
    (Attribute::Dribbling, 25),
    (Attribute::Passing, 20),
    (Attribute::Shooting, 15),
    (Attribute::Physical, 5),
];

const ATTACKING_MIDFIELDER: &[Weight] = &[
    (Attribute::Passing, 35),
    (Attribute::Dribbling, 30),
    (Attribute::Shooting, 20),
    (Attribute::Pace, 10),
    (Attribute::Physical, 5),
];

const CENTRAL_MIDFIELDER: &[Weight] = &[
    (Attribute::Passing, 30),
    (Attribute::Dribbling, 20),
    (Attribute::Physical, 15),
    (Attribute::Shooting, 15),
    (Attribute::Pace, 10),
    (Attribute::Defense, 10),
];

const DEFENSIVE_MIDFIELDER: &[Weight] = &[
    (Attribute::Defense, 30),
    (Attribute::Physical, 25),
    (Attribute::Passing, 20),
    (Attribute::Pace, 10),
    (Attribute::Dribbling, 10),
    (Attribute::Shooting, 5),
];

const FULL_BACK: &[Weight] = &[
    (Attribute::Pace, 30),
    (Attribute::Defense, 30),
    (Attribute::Passing, 15),
    (Attribute::Dribbling, 15),
    (Attribute::Physical, 10),
];

const CENTRE_BACK: &[Weight] = &[
    (Attribute::Defense, 45),
    (Attribute::Physical, 30),
    (Attribute::Pace, 15),
    (Attribute::Passing, 5),
    (Attribute::Dribbling, 5),
];

/// Weight table for a position
pub fn weights_for(position: Position) -> &'static [Weight] {
    match position {
        Position::Goalkeeper => GOALKEEPER,
        Position::Striker => STRIKER,
        Position::LeftWinger | Position::RightWinger => WINGER,
        Position::AttackingMidfielder => ATTACKING_MIDFIELDER,
        Position::CentralMidfielder => CENTRAL_MIDFIELDER,
        Position::DefensiveMidfielder => DEFENSIVE_MIDFIELDER,
        Position::LeftBack | Position::RightBack => FULL_BACK,
        Position::CentreBack => CENTRE_BACK,
    }
}
