//! Builders for the notification intents the core emits

use crate::types::{ActorId, NotificationIntent, NotificationKind, RequestStatus, TeamId};
use crate::utils::current_timestamp;

pub const DEFAULT_TITLE: &str = "New notification";

/// Link to a team's pending transfer requests
pub fn team_requests_link(team_id: TeamId) -> String {
    format!("/teams/{}/requests", team_id)
}

/// Link to a team page
pub fn team_link(team_id: TeamId) -> String {
    format!("/teams/{}", team_id)
}

/// Tell a captain that a player wants to join their team
pub fn join_request(
    captain: ActorId,
    player_name: &str,
    team_name: &str,
    team_id: TeamId,
) -> NotificationIntent {
    NotificationIntent {
        recipient: captain,
        kind: NotificationKind::TeamRequest,
        title: DEFAULT_TITLE.to_string(),
        message: format!("{} wants to join {}.", player_name, team_name),
        related_link: Some(team_requests_link(team_id)),
        created_at: current_timestamp(),
    }
}

/// Tell a player how their join request was resolved
pub fn join_response(
    player: ActorId,
    team_name: &str,
    team_id: TeamId,
    status: RequestStatus,
) -> NotificationIntent {
    let outcome = match status {
        RequestStatus::Accepted => "accepted",
        _ => "rejected",
    };

    NotificationIntent {
        recipient: player,
        kind: NotificationKind::TeamResponse,
        title: DEFAULT_TITLE.to_string(),
        message: format!("Your request to join {} was {}.", team_name, outcome),
        related_link: Some(team_link(team_id)),
        created_at: current_timestamp(),
    }
}

/// Free-form system notice
pub fn system_notice(
    recipient: impl Into<ActorId>,
    title: impl Into<String>,
    message: impl Into<String>,
) -> NotificationIntent {
    NotificationIntent {
        recipient: recipient.into(),
        kind: NotificationKind::System,
        title: title.into(),
        message: message.into(),
        related_link: None,
        created_at: current_timestamp(),
    }
}
