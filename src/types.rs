//! Common types used throughout the league engine

use crate::error::{LeagueError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for player profiles
pub type PlayerId = Uuid;

/// Unique identifier for teams
pub type TeamId = Uuid;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// Unique identifier for transfer requests
pub type RequestId = Uuid;

/// Unique identifier for in-app notifications
pub type NotificationId = Uuid;

/// Opaque identity handed over by the identity provider
pub type ActorId = String;

/// Highest value any player attribute can take
pub const MAX_ATTRIBUTE: u8 = 99;

/// Role carried by an authenticated actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Player,
    Admin,
}

/// Authenticated caller as seen by the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub role: Role,
}

impl Actor {
    pub fn player(id: impl Into<ActorId>) -> Self {
        Self {
            id: id.into(),
            role: Role::Player,
        }
    }

    pub fn admin(id: impl Into<ActorId>) -> Self {
        Self {
            id: id.into(),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with `Forbidden` unless the actor is an administrator
    pub fn require_admin(&self, operation: &str) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(LeagueError::forbidden(format!(
                "{} requires an administrator, '{}' is not one",
                operation, self.id
            )))
        }
    }
}

/// Playing position of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "KL")]
    Goalkeeper,
    #[serde(rename = "SLB")]
    LeftBack,
    #[serde(rename = "SGB")]
    RightBack,
    #[serde(rename = "STP")]
    CentreBack,
    #[serde(rename = "DOS")]
    DefensiveMidfielder,
    #[serde(rename = "MO")]
    CentralMidfielder,
    #[serde(rename = "MOO")]
    AttackingMidfielder,
    #[serde(rename = "SLK")]
    LeftWinger,
    #[serde(rename = "SGK")]
    RightWinger,
    #[default]
    #[serde(rename = "ST")]
    Striker,
}

impl Position {
    pub const ALL: [Position; 10] = [
        Position::Goalkeeper,
        Position::LeftBack,
        Position::RightBack,
        Position::CentreBack,
        Position::DefensiveMidfielder,
        Position::CentralMidfielder,
        Position::AttackingMidfielder,
        Position::LeftWinger,
        Position::RightWinger,
        Position::Striker,
    ];

    /// Short position code used on the wire and in snapshots
    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "KL",
            Position::LeftBack => "SLB",
            Position::RightBack => "SGB",
            Position::CentreBack => "STP",
            Position::DefensiveMidfielder => "DOS",
            Position::CentralMidfielder => "MO",
            Position::AttackingMidfielder => "MOO",
            Position::LeftWinger => "SLK",
            Position::RightWinger => "SGK",
            Position::Striker => "ST",
        }
    }

    pub fn from_code(code: &str) -> Option<Position> {
        Position::ALL
            .iter()
            .copied()
            .find(|p| p.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::Goalkeeper)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Position {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self> {
        Position::from_code(s)
            .ok_or_else(|| LeagueError::validation(format!("Unknown position code: {}", s)))
    }
}

/// Preferred kicking foot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredFoot {
    #[default]
    Right,
    Left,
    Both,
}

/// One of the twelve rated attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Defense,
    Physical,
    Diving,
    Handling,
    Kicking,
    Reflexes,
    Speed,
    Positioning,
}

/// Raw attribute values of a player, each in `0..=99`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    // Outfield
    pub pace: u8,
    pub shooting: u8,
    pub passing: u8,
    pub dribbling: u8,
    pub defense: u8,
    pub physical: u8,
    // Goalkeeping
    pub diving: u8,
    pub handling: u8,
    pub kicking: u8,
    pub reflexes: u8,
    pub speed: u8,
    pub positioning: u8,
}

impl Default for Attributes {
    fn default() -> Self {
        Self::uniform(50)
    }
}

impl Attributes {
    /// Every attribute set to the same value
    pub fn uniform(value: u8) -> Self {
        Self {
            pace: value,
            shooting: value,
            passing: value,
            dribbling: value,
            defense: value,
            physical: value,
            diving: value,
            handling: value,
            kicking: value,
            reflexes: value,
            speed: value,
            positioning: value,
        }
    }

    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Pace => self.pace,
            Attribute::Shooting => self.shooting,
            Attribute::Passing => self.passing,
            Attribute::Dribbling => self.dribbling,
            Attribute::Defense => self.defense,
            Attribute::Physical => self.physical,
            Attribute::Diving => self.diving,
            Attribute::Handling => self.handling,
            Attribute::Kicking => self.kicking,
            Attribute::Reflexes => self.reflexes,
            Attribute::Speed => self.speed,
            Attribute::Positioning => self.positioning,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: u8) {
        let slot = match attribute {
            Attribute::Pace => &mut self.pace,
            Attribute::Shooting => &mut self.shooting,
            Attribute::Passing => &mut self.passing,
            Attribute::Dribbling => &mut self.dribbling,
            Attribute::Defense => &mut self.defense,
            Attribute::Physical => &mut self.physical,
            Attribute::Diving => &mut self.diving,
            Attribute::Handling => &mut self.handling,
            Attribute::Kicking => &mut self.kicking,
            Attribute::Reflexes => &mut self.reflexes,
            Attribute::Speed => &mut self.speed,
            Attribute::Positioning => &mut self.positioning,
        };
        *slot = value;
    }

    /// Reject any attribute above [`MAX_ATTRIBUTE`]
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("pace", self.pace),
            ("shooting", self.shooting),
            ("passing", self.passing),
            ("dribbling", self.dribbling),
            ("defense", self.defense),
            ("physical", self.physical),
            ("diving", self.diving),
            ("handling", self.handling),
            ("kicking", self.kicking),
            ("reflexes", self.reflexes),
            ("speed", self.speed),
            ("positioning", self.positioning),
        ];

        match fields.iter().find(|(_, value)| *value > MAX_ATTRIBUTE) {
            Some((name, value)) => Err(LeagueError::validation(format!(
                "Attribute {} must be between 0 and {}, got {}",
                name, MAX_ATTRIBUTE, value
            ))),
            None => Ok(()),
        }
    }
}

/// Player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub actor_id: ActorId,
    pub name: String,
    pub age: u8,
    pub jersey_number: Option<u8>,
    pub preferred_foot: PreferredFoot,
    pub position: Position,
    pub attributes: Attributes,
    /// Set once archetype seeding has run (or attributes were supplied)
    pub attributes_initialized: bool,
    pub current_team: Option<TeamId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Overall rating, always derived from position and attributes
    pub fn overall(&self) -> u8 {
        crate::rating::compute_overall(self.position, &self.attributes)
    }

    pub fn is_free_agent(&self) -> bool {
        self.current_team.is_none()
    }
}

/// Cumulative standings counters of a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Standings {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub points: u32,
}

impl Standings {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_scored) - i64::from(self.goals_conceded)
    }

    pub fn total_matches(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// Win percentage rounded to one decimal, 0 when nothing was played
    pub fn win_rate(&self) -> f64 {
        let total = self.total_matches();
        if total == 0 {
            return 0.0;
        }
        (f64::from(self.wins) / f64::from(total) * 1000.0).round() / 10.0
    }

    /// `points == 3 * wins + draws`
    pub fn is_consistent(&self) -> bool {
        u64::from(self.points) == 3 * u64::from(self.wins) + u64::from(self.draws)
    }
}

/// A team with its standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub short_name: Option<String>,
    pub standings: Standings,
    /// Must be a member of this team; enforced by the roster manager
    pub captain: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn is_captain(&self, player_id: PlayerId) -> bool {
        self.captain == Some(player_id)
    }

    pub fn goal_difference(&self) -> i64 {
        self.standings.goal_difference()
    }
}

/// A match between two distinct teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub team1: TeamId,
    pub team2: TeamId,
    pub team1_score: u32,
    pub team2_score: u32,
    pub is_finished: bool,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Winning team, `None` while unfinished or on a draw
    pub fn winner(&self) -> Option<TeamId> {
        if !self.is_finished {
            return None;
        }
        match self.team1_score.cmp(&self.team2_score) {
            std::cmp::Ordering::Greater => Some(self.team1),
            std::cmp::Ordering::Less => Some(self.team2),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team1 == team_id || self.team2 == team_id
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.team1_score, self.team2_score)
    }
}

/// Per-player statistics of one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    /// Team the player played for in this match, kept across transfers
    pub team_id: TeamId,
    pub goals: u32,
    pub assists: u32,
    pub played: bool,
}

/// Lifecycle state of a transfer request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "PENDING"),
            RequestStatus::Accepted => write!(f, "ACCEPTED"),
            RequestStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Captain's answer to a transfer request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accept,
    Reject,
}

/// Player-initiated request to join a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub id: RequestId,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    TeamRequest,
    TeamResponse,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TeamRequest => "team_request",
            NotificationKind::TeamResponse => "team_response",
            NotificationKind::System => "system",
        }
    }
}

/// Request to notify an actor, handed to the delivery side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub recipient: ActorId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored in-app notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: ActorId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{current_timestamp, generate_id};

    fn sample_match(s1: u32, s2: u32, finished: bool) -> Match {
        Match {
            id: generate_id(),
            team1: generate_id(),
            team2: generate_id(),
            team1_score: s1,
            team2_score: s2,
            is_finished: finished,
            date: current_timestamp(),
            created_at: current_timestamp(),
        }
    }

    #[test]
    fn test_position_codes_round_trip() {
        for position in Position::ALL {
            assert_eq!(Position::from_code(position.code()), Some(position));
        }
        assert_eq!(Position::from_code("st"), Some(Position::Striker));
        assert_eq!(Position::from_code("XX"), None);
        assert!("XX".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_serializes_as_code() {
        let json = serde_json::to_string(&Position::AttackingMidfielder).unwrap();
        assert_eq!(json, "\"MOO\"");
    }

    #[test]
    fn test_attribute_validation() {
        let mut attrs = Attributes::default();
        assert!(attrs.validate().is_ok());

        attrs.set(Attribute::Reflexes, 100);
        let err = attrs.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("reflexes"));
    }

    #[test]
    fn test_match_winner() {
        let m = sample_match(3, 1, true);
        assert_eq!(m.winner(), Some(m.team1));

        let m = sample_match(0, 2, true);
        assert_eq!(m.winner(), Some(m.team2));

        assert_eq!(sample_match(2, 2, true).winner(), None);
        assert_eq!(sample_match(3, 1, false).winner(), None);
    }

    #[test]
    fn test_standings_derived_values() {
        let standings = Standings {
            wins: 2,
            draws: 1,
            losses: 1,
            goals_scored: 7,
            goals_conceded: 9,
            points: 7,
        };
        assert_eq!(standings.goal_difference(), -2);
        assert_eq!(standings.total_matches(), 4);
        assert_eq!(standings.win_rate(), 50.0);
        assert!(standings.is_consistent());
        assert_eq!(Standings::default().win_rate(), 0.0);
    }

    #[test]
    fn test_actor_require_admin() {
        assert!(Actor::admin("root").require_admin("record match").is_ok());
        let err = Actor::player("p1").require_admin("record match").unwrap_err();
        assert!(err.is_forbidden());
    }
}
