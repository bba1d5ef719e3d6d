//! Notifications emitted after a workflow changes persisted state.

use serde::{Deserialize, Serialize};

use crate::domain::state::{PlayerId, PlayerState};

/// Changed fields only; absent keys were not touched by the write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consecutive_sixes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_before_streak: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_finished: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_report: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

impl UpdatedFields {
    /// Every game field of `state`, as written by a roll or on creation.
    pub fn full(state: &PlayerState) -> Self {
        Self {
            position: Some(state.position),
            previous_position: Some(state.previous_position),
            consecutive_sixes: Some(state.consecutive_sixes),
            position_before_streak: Some(state.position_before_streak),
            is_finished: Some(state.is_finished),
            needs_report: Some(state.needs_report),
            message: state.message.clone(),
            version: Some(state.version),
        }
    }

    /// The report gate was cleared at `version`.
    pub fn report_cleared(version: i32) -> Self {
        Self {
            needs_report: Some(false),
            version: Some(version),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    #[serde(rename = "player.state.changed", rename_all = "camelCase")]
    PlayerStateChanged {
        player_id: PlayerId,
        updated_fields: UpdatedFields,
    },
}

impl OutboundEvent {
    pub fn state_changed(player_id: PlayerId, updated_fields: UpdatedFields) -> Self {
        Self::PlayerStateChanged {
            player_id,
            updated_fields,
        }
    }

    pub fn player_id(&self) -> &PlayerId {
        match self {
            Self::PlayerStateChanged { player_id, .. } => player_id,
        }
    }

    /// Pub/sub channel for the event's player.
    pub fn channel(&self) -> String {
        format!("player:{}", self.player_id())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn report_cleared_serializes_only_changed_fields() {
        let event = OutboundEvent::state_changed(
            PlayerId::parse("p7").unwrap(),
            UpdatedFields::report_cleared(4),
        );
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "player.state.changed",
                "playerId": "p7",
                "updatedFields": { "needsReport": false, "version": 4 }
            })
        );
        assert_eq!(event.channel(), "player:p7");
    }

    #[test]
    fn full_payload_names_every_game_field() {
        let mut state = PlayerState::awaiting_start(PlayerId::parse("p7").unwrap());
        state.message = Some("Rolled a six.".into());
        let value = serde_json::to_value(UpdatedFields::full(&state)).unwrap();
        for key in [
            "position",
            "previousPosition",
            "consecutiveSixes",
            "positionBeforeStreak",
            "isFinished",
            "needsReport",
            "message",
            "version",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
