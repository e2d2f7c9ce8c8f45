//! SQLite implementation of [`Persistence`]

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::db::ProgressDb;
use super::{CompletionRecord, Persistence, StoreError};
use crate::domain::{
    DiaryEntry, PersonalReflection, PlayerProfile, Quest, Rank, Stats,
};
use crate::progression::achievements::merge_with_catalog;
use crate::progression::{AchievementId, AchievementState, Progression};

#[derive(Clone)]
pub struct SqliteStore {
    db: ProgressDb,
}

impl SqliteStore {
    pub fn new(db: ProgressDb) -> Self {
        Self { db }
    }

    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::new(ProgressDb::open_default()?))
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(ProgressDb::open(path)?))
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Ok(Self::new(ProgressDb::open_in_memory()?))
    }

    pub fn db(&self) -> &ProgressDb {
        &self.db
    }
}

impl Persistence for SqliteStore {
    fn load_all(&self, user_id: &str) -> Result<Option<Progression>, StoreError> {
        let conn = self.db.conn();
        let Some(player) = read_profile(&conn, user_id)? else {
            return Ok(None);
        };

        let (mut completed_quests, mut quests): (Vec<Quest>, Vec<Quest>) =
            read_quests(&conn, user_id)?.into_iter().partition(|q| q.completed);
        quests.sort_by_key(|q| q.created_at);
        completed_quests.sort_by_key(|q| q.completed_at.unwrap_or(q.created_at));

        let mut reflections = read_reflections(&conn, user_id)?;
        reflections.sort_by_key(|r| std::cmp::Reverse(r.timestamp));
        let mut diary = read_diary(&conn, user_id)?;
        diary.sort_by_key(|e| std::cmp::Reverse(e.created_at));

        let achievements = merge_with_catalog(read_achievements(&conn, user_id)?);
        debug!(
            "Loaded user {}: {} active, {} completed quests",
            user_id,
            quests.len(),
            completed_quests.len()
        );

        Ok(Some(Progression {
            player,
            quests,
            completed_quests,
            reflections,
            diary,
            achievements,
            analytics: Default::default(),
        }))
    }

    fn save_profile(&self, user_id: &str, profile: &PlayerProfile) -> Result<(), StoreError> {
        write_profile(&self.db.conn(), user_id, profile)
    }

    fn save_quest(&self, user_id: &str, quest: &Quest) -> Result<(), StoreError> {
        write_quest(&self.db.conn(), user_id, quest)
    }

    fn save_quests(&self, user_id: &str, quests: &[Quest]) -> Result<(), StoreError> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        for quest in quests {
            write_quest(&tx, user_id, quest)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_quest(&self, user_id: &str, quest_id: &str) -> Result<(), StoreError> {
        let conn = self.db.conn();
        conn.execute(
            "DELETE FROM quests WHERE id = ?1 AND user_id = ?2",
            params![quest_id, user_id],
        )?;
        Ok(())
    }

    fn save_reflection(
        &self,
        user_id: &str,
        reflection: &PersonalReflection,
    ) -> Result<(), StoreError> {
        write_reflection(&self.db.conn(), user_id, reflection)
    }

    fn save_diary_entry(&self, user_id: &str, entry: &DiaryEntry) -> Result<(), StoreError> {
        write_diary_entry(&self.db.conn(), user_id, entry)
    }

    fn save_achievements(
        &self,
        user_id: &str,
        achievements: &[AchievementState],
    ) -> Result<(), StoreError> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        write_achievements(&tx, user_id, achievements)?;
        tx.commit()?;
        Ok(())
    }

    fn complete_quest_transactionally(
        &self,
        user_id: &str,
        record: CompletionRecord<'_>,
    ) -> Result<(), StoreError> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;

        let already_completed: Option<bool> = tx
            .query_row(
                "SELECT completed FROM quests WHERE id = ?1 AND user_id = ?2",
                params![record.quest.id, user_id],
                |r| r.get(0),
            )
            .optional()?;
        if already_completed == Some(true) {
            // Dropping the transaction rolls it back
            return Err(StoreError::AlreadyCompleted(record.quest.id.clone()));
        }

        write_quest(&tx, user_id, record.quest)?;
        if let Some(next) = record.respawned {
            write_quest(&tx, user_id, next)?;
        }
        write_profile(&tx, user_id, record.profile)?;
        write_achievements(&tx, user_id, record.achievements)?;
        tx.commit()?;

        debug!("Committed completion of quest {}", record.quest.id);
        Ok(())
    }

    fn reset(&self, user_id: &str) -> Result<(), StoreError> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        delete_user_rows(&tx, user_id)?;
        tx.commit()?;
        info!("Deleted all stored progress for {}", user_id);
        Ok(())
    }

    fn replace_all(&self, user_id: &str, state: &Progression) -> Result<(), StoreError> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        delete_user_rows(&tx, user_id)?;

        write_profile(&tx, user_id, &state.player)?;
        for quest in state.quests.iter().chain(state.completed_quests.iter()) {
            write_quest(&tx, user_id, quest)?;
        }
        // Histories are held newest first; insert oldest first
        for reflection in state.reflections.iter().rev() {
            write_reflection(&tx, user_id, reflection)?;
        }
        for entry in state.diary.iter().rev() {
            write_diary_entry(&tx, user_id, entry)?;
        }
        write_achievements(&tx, user_id, &state.achievements)?;

        tx.commit()?;
        info!("Replaced stored progress for {}", user_id);
        Ok(())
    }
}

fn delete_user_rows(conn: &Connection, user_id: &str) -> Result<(), StoreError> {
    for table in ["profiles", "quests", "reflections", "achievements", "diary_entries"] {
        conn.execute(
            &format!("DELETE FROM {} WHERE user_id = ?1", table),
            params![user_id],
        )?;
    }
    Ok(())
}

// ========================================
// WRITERS
// ========================================

fn write_profile(conn: &Connection, user_id: &str, profile: &PlayerProfile) -> Result<(), StoreError> {
    let stats = serde_json::to_string(&profile.stats)?;
    let custom = serde_json::to_string(&profile.custom_attributes)?;
    conn.execute(
        r#"
        INSERT INTO profiles (
            user_id, level, rank, xp, total_xp, next_level_xp, streak,
            skill_points, stats, custom_attributes, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(user_id) DO UPDATE SET
            level = excluded.level,
            rank = excluded.rank,
            xp = excluded.xp,
            total_xp = excluded.total_xp,
            next_level_xp = excluded.next_level_xp,
            streak = excluded.streak,
            skill_points = excluded.skill_points,
            stats = excluded.stats,
            custom_attributes = excluded.custom_attributes,
            updated_at = excluded.updated_at
        "#,
        params![
            user_id,
            profile.level,
            profile.rank.as_str(),
            to_sql_int(profile.xp),
            to_sql_int(profile.total_xp),
            to_sql_int(profile.next_level_xp),
            profile.streak,
            profile.skill_points,
            stats,
            custom,
            Utc::now().timestamp_millis(),
        ],
    )?;
    Ok(())
}

fn write_quest(conn: &Connection, user_id: &str, quest: &Quest) -> Result<(), StoreError> {
    let boosts = serde_json::to_string(&quest.stat_boosts)?;
    conn.execute(
        r#"
        INSERT INTO quests (
            id, user_id, title, description, quest_type, difficulty, xp, realm,
            completed, created_at, completed_at, due_date, recurring, stat_boosts, is_overdue
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
        ON CONFLICT(user_id, id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            quest_type = excluded.quest_type,
            difficulty = excluded.difficulty,
            xp = excluded.xp,
            realm = excluded.realm,
            completed = excluded.completed,
            completed_at = excluded.completed_at,
            due_date = excluded.due_date,
            recurring = excluded.recurring,
            stat_boosts = excluded.stat_boosts,
            is_overdue = excluded.is_overdue
        "#,
        params![
            quest.id,
            user_id,
            quest.title,
            quest.description,
            quest.quest_type.as_str(),
            quest.difficulty.as_str(),
            quest.xp,
            quest.realm.as_str(),
            quest.completed,
            format_time(&quest.created_at),
            quest.completed_at.as_ref().map(format_time),
            quest.due_date.as_ref().map(format_time),
            quest.recurring.map(|r| r.as_str()),
            boosts,
            quest.is_overdue,
        ],
    )?;
    Ok(())
}

fn write_reflection(
    conn: &Connection,
    user_id: &str,
    reflection: &PersonalReflection,
) -> Result<(), StoreError> {
    conn.execute(
        r#"
        INSERT INTO reflections (
            user_id, mood, emotional_state, current_challenges,
            motivation_level, notes, timestamp
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            user_id,
            reflection.mood,
            reflection.emotional_state,
            reflection.current_challenges,
            reflection.motivation_level,
            reflection.notes,
            format_time(&reflection.timestamp),
        ],
    )?;
    Ok(())
}

fn write_diary_entry(conn: &Connection, user_id: &str, entry: &DiaryEntry) -> Result<(), StoreError> {
    conn.execute(
        r#"
        INSERT INTO diary_entries (id, user_id, content, mood, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(user_id, id) DO UPDATE SET
            content = excluded.content,
            mood = excluded.mood,
            created_at = excluded.created_at
        "#,
        params![
            entry.id,
            user_id,
            entry.content,
            entry.mood,
            format_time(&entry.created_at),
        ],
    )?;
    Ok(())
}

fn write_achievements(
    conn: &Connection,
    user_id: &str,
    achievements: &[AchievementState],
) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO achievements (user_id, id, unlocked, unlocked_at) \
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for state in achievements {
        stmt.execute(params![
            user_id,
            state.id.as_str(),
            state.unlocked,
            state.unlocked_at.as_ref().map(format_time),
        ])?;
    }
    Ok(())
}

// ========================================
// READERS
// ========================================

fn read_profile(conn: &Connection, user_id: &str) -> Result<Option<PlayerProfile>, StoreError> {
    let row = conn
        .query_row(
            r#"
            SELECT level, rank, xp, total_xp, next_level_xp, streak,
                   skill_points, stats, custom_attributes
            FROM profiles WHERE user_id = ?1
            "#,
            params![user_id],
            |r| {
                Ok((
                    r.get::<_, u32>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, i64>(2)?,
                    r.get::<_, i64>(3)?,
                    r.get::<_, i64>(4)?,
                    r.get::<_, u32>(5)?,
                    r.get::<_, u32>(6)?,
                    r.get::<_, String>(7)?,
                    r.get::<_, String>(8)?,
                ))
            },
        )
        .optional()?;

    let Some((level, rank, xp, total_xp, next_level_xp, streak, skill_points, stats, custom)) =
        row
    else {
        return Ok(None);
    };

    let rank = Rank::from_str(&rank).ok_or_else(|| StoreError::Corrupt(format!("rank '{}'", rank)))?;
    let stats: Stats = serde_json::from_str(&stats)?;
    let custom_attributes: BTreeMap<String, u32> = serde_json::from_str(&custom)?;

    Ok(Some(PlayerProfile {
        level,
        rank,
        xp: from_sql_int(xp),
        total_xp: from_sql_int(total_xp),
        stats,
        custom_attributes,
        next_level_xp: from_sql_int(next_level_xp),
        streak,
        skill_points,
    }))
}

/// Raw quest columns before enum and timestamp parsing
struct QuestRow {
    id: String,
    title: String,
    description: String,
    quest_type: String,
    difficulty: String,
    xp: u32,
    realm: String,
    completed: bool,
    created_at: String,
    completed_at: Option<String>,
    due_date: Option<String>,
    recurring: Option<String>,
    stat_boosts: String,
    is_overdue: bool,
}

impl TryFrom<QuestRow> for Quest {
    type Error = StoreError;

    fn try_from(row: QuestRow) -> Result<Self, Self::Error> {
        Ok(Quest {
            quest_type: row.quest_type.parse().map_err(StoreError::Corrupt)?,
            difficulty: row.difficulty.parse().map_err(StoreError::Corrupt)?,
            realm: row.realm.parse().map_err(StoreError::Corrupt)?,
            recurring: row
                .recurring
                .map(|r| r.parse())
                .transpose()
                .map_err(StoreError::Corrupt)?,
            created_at: parse_time(&row.created_at)?,
            completed_at: row.completed_at.as_deref().map(parse_time).transpose()?,
            due_date: row.due_date.as_deref().map(parse_time).transpose()?,
            stat_boosts: serde_json::from_str(&row.stat_boosts)?,
            id: row.id,
            title: row.title,
            description: row.description,
            xp: row.xp,
            completed: row.completed,
            is_overdue: row.is_overdue,
        })
    }
}

fn read_quests(conn: &Connection, user_id: &str) -> Result<Vec<Quest>, StoreError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, title, description, quest_type, difficulty, xp, realm, completed,
               created_at, completed_at, due_date, recurring, stat_boosts, is_overdue
        FROM quests WHERE user_id = ?1 ORDER BY rowid
        "#,
    )?;
    let rows = stmt
        .query_map(params![user_id], |r| {
            Ok(QuestRow {
                id: r.get(0)?,
                title: r.get(1)?,
                description: r.get(2)?,
                quest_type: r.get(3)?,
                difficulty: r.get(4)?,
                xp: r.get(5)?,
                realm: r.get(6)?,
                completed: r.get(7)?,
                created_at: r.get(8)?,
                completed_at: r.get(9)?,
                due_date: r.get(10)?,
                recurring: r.get(11)?,
                stat_boosts: r.get(12)?,
                is_overdue: r.get(13)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(Quest::try_from).collect()
}

fn read_reflections(conn: &Connection, user_id: &str) -> Result<Vec<PersonalReflection>, StoreError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT mood, emotional_state, current_challenges, motivation_level, notes, timestamp
        FROM reflections WHERE user_id = ?1 ORDER BY id DESC
        "#,
    )?;
    let rows = stmt
        .query_map(params![user_id], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, u8>(3)?,
                r.get::<_, Option<String>>(4)?,
                r.get::<_, String>(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(
            |(mood, emotional_state, current_challenges, motivation_level, notes, timestamp)| {
                Ok(PersonalReflection {
                    mood,
                    emotional_state,
                    current_challenges,
                    motivation_level,
                    notes,
                    timestamp: parse_time(&timestamp)?,
                })
            },
        )
        .collect()
}

fn read_diary(conn: &Connection, user_id: &str) -> Result<Vec<DiaryEntry>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, content, mood, created_at FROM diary_entries \
         WHERE user_id = ?1 ORDER BY rowid DESC",
    )?;
    let rows = stmt
        .query_map(params![user_id], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, Option<String>>(2)?,
                r.get::<_, String>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, content, mood, created_at)| {
            Ok(DiaryEntry {
                id,
                content,
                mood,
                created_at: parse_time(&created_at)?,
            })
        })
        .collect()
}

fn read_achievements(conn: &Connection, user_id: &str) -> Result<Vec<AchievementState>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, unlocked, unlocked_at FROM achievements WHERE user_id = ?1")?;
    let rows = stmt
        .query_map(params![user_id], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, bool>(1)?,
                r.get::<_, Option<String>>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut states = Vec::with_capacity(rows.len());
    for (id, unlocked, unlocked_at) in rows {
        let Some(id) = AchievementId::from_str(&id) else {
            debug!("Skipping unknown achievement row '{}'", id);
            continue;
        };
        states.push(AchievementState {
            id,
            unlocked,
            unlocked_at: unlocked_at.as_deref().map(parse_time).transpose()?,
        });
    }
    Ok(states)
}

// ========================================
// CONVERSIONS
// ========================================

fn format_time(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("timestamp '{}': {}", raw, e)))
}

/// SQLite integers are signed; XP totals beyond `i64::MAX` are clamped
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, QuestDraft, QuestType, Realm, Recurrence, StatKind};
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    const USER: &str = "hunter";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 3, 7, 30, 0).unwrap() + Duration::nanoseconds(123_456_789)
    }

    fn populated() -> Progression {
        let mut state = Progression::new();
        let ids = state.add_quests(
            vec![
                QuestDraft::new("Read", QuestType::Daily, Difficulty::Medium, Realm::MindSkill)
                    .with_boost(StatKind::Iq, 2),
                QuestDraft::new("Run", QuestType::Daily, Difficulty::Easy, Realm::BodyDiscipline)
                    .with_recurrence(Recurrence::Daily)
                    .with_due_date(now() + Duration::hours(3)),
            ],
            now(),
        );
        state.complete_quest(&ids[1], now(), &mut StdRng::seed_from_u64(1));
        state.set_reflection(
            PersonalReflection {
                mood: "focused".into(),
                emotional_state: "calm".into(),
                current_challenges: "sleep".into(),
                motivation_level: 7,
                notes: Some("good day".into()),
                timestamp: now(),
            },
            now(),
        );
        state.add_diary_entry("Ran 5k", Some("proud".into()), now());
        state.rehydrate(now());
        state
    }

    #[test]
    fn test_unknown_user_loads_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.load_all("nobody").unwrap().is_none());
    }

    #[test]
    fn test_replace_all_then_load() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("progress.db")).unwrap();
        let state = populated();

        store.replace_all(USER, &state).unwrap();
        let mut loaded = store.load_all(USER).unwrap().unwrap();
        loaded.rehydrate(now());

        assert_eq!(loaded, state);
    }

    #[test]
    fn test_users_are_isolated() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.replace_all(USER, &populated()).unwrap();
        store.save_profile("other", &PlayerProfile::new()).unwrap();

        let other = store.load_all("other").unwrap().unwrap();
        assert!(other.quests.is_empty());
        assert!(other.reflections.is_empty());

        store.reset(USER).unwrap();
        assert!(store.load_all(USER).unwrap().is_none());
        assert!(store.load_all("other").unwrap().is_some());
    }

    #[test]
    fn test_same_snapshot_under_two_users() {
        let store = SqliteStore::open_in_memory().unwrap();
        let state = populated();
        store.replace_all(USER, &state).unwrap();
        store.replace_all("copy", &state).unwrap();

        let mut original = store.load_all(USER).unwrap().unwrap();
        original.rehydrate(now());
        let mut copy = store.load_all("copy").unwrap().unwrap();
        copy.rehydrate(now());
        assert_eq!(original, state);
        assert_eq!(copy, state);

        // Deleting one user's quest leaves the other's row with the same id
        store.delete_quest("copy", &state.quests[0].id).unwrap();
        assert_eq!(store.load_all(USER).unwrap().unwrap().quests.len(), 2);
        assert_eq!(store.load_all("copy").unwrap().unwrap().quests.len(), 1);
    }

    #[test]
    fn test_completion_commits_every_row() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut state = Progression::new();
        let id = state.add_quests(
            vec![QuestDraft::new("Ship", QuestType::Main, Difficulty::LifeAchievement, Realm::CreationMission)],
            now(),
        )[0]
        .clone();
        store.replace_all(USER, &state).unwrap();

        let outcome = state.complete_quest(&id, now(), &mut StdRng::seed_from_u64(3)).unwrap();
        store
            .complete_quest_transactionally(
                USER,
                CompletionRecord {
                    quest: &outcome.quest,
                    respawned: outcome.respawned.as_ref(),
                    profile: &state.player,
                    achievements: &state.achievements,
                },
            )
            .unwrap();

        let loaded = store.load_all(USER).unwrap().unwrap();
        assert_eq!(loaded.player.total_xp, 100);
        assert_eq!(loaded.completed_quests.len(), 1);
        assert!(loaded.quests.is_empty());
        assert!(loaded.achievements.iter().any(|a| a.id == AchievementId::FirstQuest && a.unlocked));
    }

    #[test]
    fn test_second_completion_is_rejected_and_rolled_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut state = Progression::new();
        let id = state.add_quests(
            vec![QuestDraft::new("Call", QuestType::Normal, Difficulty::Easy, Realm::HeartLoyalty)],
            now(),
        )[0]
        .clone();
        let outcome = state.complete_quest(&id, now(), &mut StdRng::seed_from_u64(4)).unwrap();
        let record = CompletionRecord {
            quest: &outcome.quest,
            respawned: None,
            profile: &state.player,
            achievements: &state.achievements,
        };
        store.complete_quest_transactionally(USER, record).unwrap();

        let mut stale_profile = state.player.clone();
        stale_profile.total_xp = 9_999;
        let err = store
            .complete_quest_transactionally(
                USER,
                CompletionRecord {
                    profile: &stale_profile,
                    ..record
                },
            )
            .unwrap_err();

        assert!(matches!(err, StoreError::AlreadyCompleted(ref q) if *q == id));
        let loaded = store.load_all(USER).unwrap().unwrap();
        assert_eq!(loaded.player.total_xp, 10);
    }

    #[test]
    fn test_quest_upsert_and_delete() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.save_profile(USER, &PlayerProfile::new()).unwrap();
        let mut quest = Quest::from_draft(
            QuestDraft::new("Draft", QuestType::Weekly, Difficulty::Hard, Realm::EmotionalSpiritual),
            "q-1".into(),
            now(),
        );
        store.save_quest(USER, &quest).unwrap();
        quest.title = "Final".into();
        store.save_quest(USER, &quest).unwrap();

        let loaded = store.load_all(USER).unwrap().unwrap();
        assert_eq!(loaded.quests.len(), 1);
        assert_eq!(loaded.quests[0].title, "Final");

        store.delete_quest(USER, "q-1").unwrap();
        assert!(store.load_all(USER).unwrap().unwrap().quests.is_empty());
    }

    #[test]
    fn test_corrupt_enum_is_reported() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.save_profile(USER, &PlayerProfile::new()).unwrap();
        store
            .db()
            .conn()
            .execute(
                "INSERT INTO quests (id, user_id, title, quest_type, difficulty, xp, realm, created_at) \
                 VALUES ('bad', ?1, 't', 'Daily', 'Impossible', 10, 'Mind & Skill', '2026-01-01T00:00:00Z')",
                params![USER],
            )
            .unwrap();

        let err = store.load_all(USER).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
