use serde::Serialize;

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 100;

/// 2-decimal rounding used for averages in responses:
/// `Int(100*x + 0.5) / 100`
pub fn round_off_2_decimals(x: f64) -> f64 {
    ((100.0 * x) + 0.5).floor() / 100.0
}

/// A name is valid when, after trimming, it is non-empty and every
/// character is an ASCII letter. No spaces, digits, or punctuation.
pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_alphabetic())
}

pub fn score_in_range(score: i64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

pub fn validate_scores(scores: &[i64]) -> bool {
    scores.iter().copied().all(score_in_range)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// Not an integer at all ("abc", "12.5", "").
    InvalidFormat,
    /// An integer, but outside the accepted range.
    OutOfRange,
}

/// Classifies raw score text. "-1" parses and is therefore out of range,
/// not malformed.
pub fn parse_score(raw: &str) -> Result<i64, NumberError> {
    let value: i64 = raw.trim().parse().map_err(|_| NumberError::InvalidFormat)?;
    if !score_in_range(value) {
        return Err(NumberError::OutOfRange);
    }
    Ok(value)
}

/// Classifies raw count text. Counts must be at least 1.
pub fn parse_count(raw: &str) -> Result<usize, NumberError> {
    let value: i64 = raw.trim().parse().map_err(|_| NumberError::InvalidFormat)?;
    if value < 1 {
        return Err(NumberError::OutOfRange);
    }
    Ok(value as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStats {
    pub highest: i64,
    pub lowest: i64,
    pub average: f64,
}

/// Highest, lowest, and arithmetic-mean average of a score sequence.
/// Returns `None` for an empty sequence; there is no sentinel value for
/// highest/lowest, so callers must not render stats they did not get.
pub fn score_stats(scores: &[i64]) -> Option<ScoreStats> {
    let first = *scores.first()?;
    let mut highest = first;
    let mut lowest = first;
    let mut sum: i64 = 0;
    for &score in scores {
        highest = highest.max(score);
        lowest = lowest.min(score);
        sum += score;
    }
    Some(ScoreStats {
        highest,
        lowest,
        average: sum as f64 / scores.len() as f64,
    })
}
