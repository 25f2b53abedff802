//! Registration and profile update inputs

use crate::error::{LeagueError, Result};
use crate::types::{Attribute, Attributes, Position, PreferredFoot, MAX_ATTRIBUTE};
use serde::{Deserialize, Serialize};

pub const MIN_AGE: u8 = 10;
pub const MAX_AGE: u8 = 60;
pub const DEFAULT_AGE: u8 = 20;
pub const MAX_NAME_LEN: usize = 100;

/// Data for a new player profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRegistration {
    pub name: String,
    pub position: Position,
    pub age: Option<u8>,
    pub jersey_number: Option<u8>,
    pub preferred_foot: Option<PreferredFoot>,
    /// Explicit attributes; archetype values are seeded when absent
    pub attributes: Option<Attributes>,
}

impl PlayerRegistration {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
            ..Default::default()
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_jersey_number(mut self, number: u8) -> Self {
        self.jersey_number = Some(number);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        if let Some(number) = self.jersey_number {
            validate_jersey_number(number)?;
        }
        if let Some(attributes) = &self.attributes {
            attributes.validate()?;
        }
        Ok(())
    }
}

/// Partial profile update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u8>,
    /// `Some(None)` clears the jersey number
    pub jersey_number: Option<Option<u8>>,
    pub preferred_foot: Option<PreferredFoot>,
    pub position: Option<Position>,
    pub attribute_changes: Vec<(Attribute, u8)>,
}

impl ProfileUpdate {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn attribute(mut self, attribute: Attribute, value: u8) -> Self {
        self.attribute_changes.push((attribute, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.jersey_number.is_none()
            && self.preferred_foot.is_none()
            && self.position.is_none()
            && self.attribute_changes.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        if let Some(Some(number)) = self.jersey_number {
            validate_jersey_number(number)?;
        }
        for (attribute, value) in &self.attribute_changes {
            if *value > MAX_ATTRIBUTE {
                return Err(LeagueError::validation(format!(
                    "Attribute {:?} must be between 0 and {}, got {}",
                    attribute, MAX_ATTRIBUTE, value
                )));
            }
        }
        Ok(())
    }
}

pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LeagueError::validation("Player name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(LeagueError::validation(format!(
            "Player name cannot exceed {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

pub fn validate_age(age: u8) -> Result<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(LeagueError::validation(format!(
            "Age must be between {} and {}, got {}",
            MIN_AGE, MAX_AGE, age
        )));
    }
    Ok(())
}

pub fn validate_jersey_number(number: u8) -> Result<()> {
    if !(1..=99).contains(&number) {
        return Err(LeagueError::validation(format!(
            "Jersey number must be between 1 and 99, got {}",
            number
        )));
    }
    Ok(())
}
