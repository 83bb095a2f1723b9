/// Quest progress tracking.
///
/// A quest counts matching (action, target) events and pays out its reward
/// exactly once when the required count is reached.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::player::Player;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestAction {
    Kill,
    Collect,
    Visit,
}

impl fmt::Display for QuestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            QuestAction::Kill => "kill",
            QuestAction::Collect => "collect",
            QuestAction::Visit => "visit",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QuestReward {
    pub gold: u32,
    pub xp: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestState {
    Active { started_at: DateTime<Utc> },
    Completed { completed_at: DateTime<Utc> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quest {
    pub id: String,
    pub description: String,
    pub action: QuestAction,
    pub target: String,
    pub count: u32,
    pub progress: u32,
    pub state: QuestState,
    pub reward: QuestReward,
}

impl Quest {
    pub fn new(
        id: &str,
        description: &str,
        action: QuestAction,
        target: &str,
        count: u32,
        reward: QuestReward,
    ) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            action,
            target: target.to_string(),
            count: count.max(1),
            progress: 0,
            state: QuestState::Active {
                started_at: Utc::now(),
            },
            reward,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, QuestState::Completed { .. })
    }

    /// Attaches the quest to the player's log. Restarting a known quest id
    /// keeps the existing progress.
    pub fn start(self, player: &mut Player) -> String {
        let line = format!("New Quest Started: {}", self.description);
        player.quests.entry(self.id.clone()).or_insert(self);
        line
    }

    /// Counts one matching event. Returns a progress or completion line when
    /// the event applied.
    pub fn advance(&mut self, action: QuestAction, target: &str, player: &mut Player) -> Option<String> {
        if self.is_complete() || self.action != action || !self.target.eq_ignore_ascii_case(target) {
            return None;
        }
        self.progress += 1;
        if self.progress >= self.count {
            self.complete(player)
        } else {
            Some(format!(
                "Quest Progress ({}): {}/{}",
                self.id, self.progress, self.count
            ))
        }
    }

    /// Marks the quest done and grants its reward. A second call does nothing.
    pub fn complete(&mut self, player: &mut Player) -> Option<String> {
        if self.is_complete() {
            return None;
        }
        self.state = QuestState::Completed {
            completed_at: Utc::now(),
        };
        self.progress = self.progress.max(self.count);
        player.gold += self.reward.gold;
        let mut line = format!(
            "Quest '{}' Completed! Rewards: +{} gold +{} XP",
            self.description, self.reward.gold, self.reward.xp
        );
        for msg in player.gain_xp(self.reward.xp) {
            line.push('\n');
            line.push_str(&msg);
        }
        Some(line)
    }

    pub fn show_status(&self) -> String {
        if self.is_complete() {
            format!("[{}] {} - Completed", self.id, self.description)
        } else {
            format!(
                "[{}] {} - In Progress ({}/{})",
                self.id, self.description, self.progress, self.count
            )
        }
    }
}

/// The quests every new adventurer starts with.
pub fn starter_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            "cleanse_grove",
            "Defeat the Forest Guardian",
            QuestAction::Kill,
            "Forest Guardian",
            1,
            QuestReward { gold: 50, xp: 50 },
        ),
        Quest::new(
            "goblin_menace",
            "Slay three Goblins",
            QuestAction::Kill,
            "Goblin",
            3,
            QuestReward { gold: 75, xp: 60 },
        ),
        Quest::new(
            "crystal_seeker",
            "Recover the Crystal Shard",
            QuestAction::Collect,
            "Crystal Shard",
            1,
            QuestReward { gold: 40, xp: 40 },
        ),
        Quest::new(
            "hidden_chamber",
            "Find the Hidden Chamber",
            QuestAction::Visit,
            "Hidden Chamber",
            1,
            QuestReward { gold: 100, xp: 100 },
        ),
        Quest::new(
            "slay_dragon",
            "Slay the Ancient Dragon",
            QuestAction::Kill,
            "Ancient Dragon",
            1,
            QuestReward { gold: 200, xp: 150 },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::CharacterClass;

    fn hero() -> Player {
        Player::new("Ayla", CharacterClass::Knight, "Sacred Grove")
    }

    fn goblin_quest() -> Quest {
        Quest::new(
            "goblins",
            "Slay two Goblins",
            QuestAction::Kill,
            "Goblin",
            2,
            QuestReward { gold: 30, xp: 20 },
        )
    }

    #[test]
    fn advance_ignores_mismatched_events() {
        let mut p = hero();
        let mut q = goblin_quest();
        assert!(q.advance(QuestAction::Collect, "Goblin", &mut p).is_none());
        assert!(q.advance(QuestAction::Kill, "Orc", &mut p).is_none());
        assert_eq!(q.progress, 0);
    }

    #[test]
    fn advance_completes_at_count() {
        let mut p = hero();
        let mut q = goblin_quest();
        let first = q.advance(QuestAction::Kill, "goblin", &mut p).unwrap();
        assert_eq!(first, "Quest Progress (goblins): 1/2");
        let done = q.advance(QuestAction::Kill, "Goblin", &mut p).unwrap();
        assert!(done.contains("Completed"));
        assert!(q.is_complete());
        assert_eq!(p.gold, 80);
        assert_eq!(p.xp, 20);
        assert!(q.advance(QuestAction::Kill, "Goblin", &mut p).is_none());
        assert_eq!(q.progress, 2);
    }

    #[test]
    fn complete_is_idempotent() {
        let mut p = hero();
        let mut q = goblin_quest();
        assert!(q.complete(&mut p).is_some());
        assert!(q.complete(&mut p).is_none());
        assert_eq!(p.gold, 80);
        assert_eq!(p.xp, 20);
    }

    #[test]
    fn start_does_not_reset_existing_progress() {
        let mut p = hero();
        let mut q = goblin_quest();
        q.progress = 1;
        q.start(&mut p);
        goblin_quest().start(&mut p);
        assert_eq!(p.quests["goblins"].progress, 1);
        assert!(p.quests["goblins"].show_status().contains("In Progress (1/2)"));
    }
}
