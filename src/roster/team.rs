//! Team creation and update inputs

use crate::error::{LeagueError, Result};
use serde::{Deserialize, Serialize};

pub const MAX_TEAM_NAME_LEN: usize = 100;
pub const MAX_SHORT_NAME_LEN: usize = 5;

/// Attributes of a team being founded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub short_name: Option<String>,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: None,
        }
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    /// Validate and return the trimmed name and short name
    pub fn normalized(&self) -> Result<(String, Option<String>)> {
        let name = normalize_name(&self.name)?;
        let short_name = normalize_short_name(self.short_name.as_deref())?;
        Ok((name, short_name))
    }
}

/// Captain-editable team fields. Standings counters are not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the short name
    pub short_name: Option<Option<String>>,
}

impl TeamUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            short_name: None,
        }
    }
}

pub fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeagueError::validation("Team name cannot be empty"));
    }
    if name.chars().count() > MAX_TEAM_NAME_LEN {
        return Err(LeagueError::validation(format!(
            "Team name cannot exceed {} characters",
            MAX_TEAM_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

/// Blank short names are stored as absent
pub fn normalize_short_name(short_name: Option<&str>) -> Result<Option<String>> {
    let Some(short_name) = short_name.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if short_name.chars().count() > MAX_SHORT_NAME_LEN {
        return Err(LeagueError::validation(format!(
            "Short name cannot exceed {} characters, got '{}'",
            MAX_SHORT_NAME_LEN, short_name
        )));
    }
    Ok(Some(short_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert_eq!(normalize_name("  Red Lions ").unwrap(), "Red Lions");
        assert!(normalize_name("   ").unwrap_err().is_validation());
        assert!(normalize_name(&"x".repeat(101)).is_err());
        assert!(normalize_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_short_name_rules() {
        assert_eq!(normalize_short_name(None).unwrap(), None);
        assert_eq!(normalize_short_name(Some("  ")).unwrap(), None);
        assert_eq!(normalize_short_name(Some("RDL")).unwrap(), Some("RDL".to_string()));
        assert!(normalize_short_name(Some("TOOLONG")).unwrap_err().is_validation());
    }

    #[test]
    fn test_new_team_normalized() {
        let (name, short) = NewTeam::new(" Blue Sharks ")
            .with_short_name("BLS")
            .normalized()
            .unwrap();
        assert_eq!(name, "Blue Sharks");
        assert_eq!(short.as_deref(), Some("BLS"));
    }
}
