//! Archetype attributes for freshly registered players
//!
//! Each archetype lands around 75 overall for its own position. Attributes a
//! position does not use keep the neutral default of 50.

use crate::types::{Attributes, Position};

/// Plausible starting attributes for a new player of `position`
pub fn initialize_attributes(position: Position) -> Attributes {
    let mut a = Attributes::default();
    match position {
        Position::Goalkeeper => {
            a.reflexes = 80;
            a.diving = 80;
            a.positioning = 78;
            a.handling = 76;
            a.kicking = 70;
            a.speed = 45;
        }
        Position::Striker => {
            a.shooting = 78;
            a.pace = 78;
            a.dribbling = 74;
            a.physical = 74;
            a.passing = 60;
            a.defense = 35;
        }
        Position::LeftWinger | Position::RightWinger => {
            a.pace = 82;
            a.dribbling = 78;
            a.passing = 74;
            a.shooting = 70;
            a.physical = 60;
            a.defense = 40;
        }
        Position::CentralMidfielder => {
            a.passing = 80;
            a.dribbling = 77;
            a.physical = 72;
            a.shooting = 72;
            a.pace = 72;
            a.defense = 68;
        }
        Position::AttackingMidfielder => {
            a.passing = 82;
            a.dribbling = 80;
            a.physical = 72;
            a.shooting = 72;
            a.pace = 72;
            a.defense = 50;
        }
        Position::DefensiveMidfielder => {
            a.defense = 78;
            a.physical = 80;
            a.passing = 74;
            a.pace = 65;
            a.dribbling = 68;
            a.shooting = 55;
        }
        Position::LeftBack | Position::RightBack => {
            a.pace = 78;
            a.defense = 76;
            a.physical = 74;
            a.dribbling = 72;
            a.passing = 70;
            a.shooting = 50;
        }
        Position::CentreBack => {
            a.defense = 80;
            a.physical = 78;
            a.pace = 65;
            a.passing = 60;
            a.dribbling = 55;
            a.shooting = 40;
        }
    }
    a
}
