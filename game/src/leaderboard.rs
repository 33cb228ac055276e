use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Entries returned by the ranking endpoints.
pub const TOP_SCORES_LIMIT: usize = 10;
/// Entries kept after each insert; lower scores are discarded.
pub const RETENTION_CAP: usize = 100;

pub const INVALID_INPUT_MESSAGE: &str = "Invalid data. nickname and score (number) are required.";
pub const NOT_FOUND_MESSAGE: &str = "Score not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: u64,
    pub nickname: String,
    pub score: u64,
    /// UTC calendar date, `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaderboardError {
    #[error("{}", INVALID_INPUT_MESSAGE)]
    InvalidInput,
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,
}

/// A validated submission: trimmed, non-blank nickname and a floored score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScore {
    pub nickname: String,
    pub score: u64,
}

impl NewScore {
    pub fn from_json(body: &Value) -> Result<Self, LeaderboardError> {
        let nickname = body
            .get("nickname")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(LeaderboardError::InvalidInput)?;

        let score = body
            .get("score")
            .and_then(Value::as_f64)
            .filter(|score| score.is_finite() && *score >= 0.0)
            .ok_or(LeaderboardError::InvalidInput)?;

        Ok(Self {
            nickname: nickname.to_string(),
            score: score.floor() as u64,
        })
    }
}

/// Storage behind the HTTP API. Kept in score order, highest first.
pub trait ScoreRepository: Send {
    fn top(&self, limit: usize) -> Vec<ScoreRecord>;

    /// Stores the score under a fresh id and returns the stored record.
    fn insert(&mut self, score: NewScore, date: String) -> ScoreRecord;

    /// Returns false when no record has `id`.
    fn remove(&mut self, id: u64) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryScoreRepository {
    records: Vec<ScoreRecord>,
    next_id: u64,
}

impl Default for InMemoryScoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// The five demo entries a fresh server starts with.
    pub fn with_seed_scores() -> Self {
        let seed = [
            ("TetrisKing", 5500, "2024-05-20"),
            ("CS_Student", 3200, "2024-05-21"),
            ("BlockMaster", 2800, "2024-05-22"),
            ("LineEraser", 2400, "2024-05-23"),
            ("GridWarrior", 2000, "2024-05-24"),
        ];
        let records: Vec<ScoreRecord> = seed
            .into_iter()
            .zip(1u64..)
            .map(|((nickname, score, date), id)| ScoreRecord {
                id,
                nickname: nickname.to_string(),
                score,
                date: date.to_string(),
            })
            .collect();
        let next_id = records.len() as u64 + 1;
        Self { records, next_id }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }
}

impl ScoreRepository for InMemoryScoreRepository {
    fn top(&self, limit: usize) -> Vec<ScoreRecord> {
        self.records.iter().take(limit).cloned().collect()
    }

    fn insert(&mut self, score: NewScore, date: String) -> ScoreRecord {
        let record = ScoreRecord {
            id: self.next_id,
            nickname: score.nickname,
            score: score.score,
            date,
        };
        self.next_id += 1;
        self.records.push(record.clone());

        // Stable sort: equal scores stay in submission order.
        self.records.sort_by(|a, b| b.score.cmp(&a.score));
        self.records.truncate(RETENTION_CAP);
        record
    }

    fn remove(&mut self, id: u64) -> bool {
        let Some(idx) = self.records.iter().position(|r| r.id == id) else {
            return false;
        };
        self.records.remove(idx);
        true
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Today's date in UTC, formatted for `ScoreRecord::date`.
pub fn today_utc() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Validates and stores a submission, returning the refreshed top scores.
pub fn submit_score(
    repo: &mut dyn ScoreRepository,
    body: &Value,
    date: String,
) -> Result<(ScoreRecord, Vec<ScoreRecord>), LeaderboardError> {
    let score = NewScore::from_json(body)?;
    let record = repo.insert(score, date);
    Ok((record, repo.top(TOP_SCORES_LIMIT)))
}

pub fn delete_score(
    repo: &mut dyn ScoreRepository,
    id: u64,
) -> Result<Vec<ScoreRecord>, LeaderboardError> {
    if !repo.remove(id) {
        return Err(LeaderboardError::NotFound);
    }
    Ok(repo.top(TOP_SCORES_LIMIT))
}
