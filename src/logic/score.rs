//! Score expressions: parsing into tokens, per-game-type validation, and bundling into per-player deltas.
//!
//! An expression is either a single bare token applied to everyone on the board
//! (`+3`), or `token player` pairs (`win ann loss bob`, `+5 ann -5 bob`).

use crate::models::{GameType, PlayerDelta, Scoreboard, ScoreboardError};
use std::collections::BTreeMap;

/// One parsed score word.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScoreToken {
    /// Signed integer literal (`+N`, `-N`); the sign is required.
    Numeric(i64),
    Win,
    Loss,
    /// Symmetric zero-net outcome between exactly two players.
    Draw,
}

impl ScoreToken {
    /// Parse a single word; synonyms are case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "win" | "won" | "winner" | "w" => Some(ScoreToken::Win),
            "loss" | "lose" | "lost" | "loser" | "l" => Some(ScoreToken::Loss),
            "draw" => Some(ScoreToken::Draw),
            other if other.starts_with(['+', '-']) => other.parse::<i64>().ok().map(ScoreToken::Numeric),
            _ => None,
        }
    }

    /// Numeric value of the token: win = 1, loss = -1, draw = 0.5.
    pub fn value(self) -> f64 {
        match self {
            ScoreToken::Numeric(n) => n as f64,
            ScoreToken::Win => 1.0,
            ScoreToken::Loss => -1.0,
            ScoreToken::Draw => 0.5,
        }
    }

    /// Integer contribution to a tally or to the zero-sum total. Draws net to zero.
    fn integer(self) -> i64 {
        match self {
            ScoreToken::Numeric(n) => n,
            ScoreToken::Win => 1,
            ScoreToken::Loss => -1,
            ScoreToken::Draw => 0,
        }
    }
}

/// Who a token applies to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScoreTarget {
    /// Blanket score: every player currently on the board.
    Everyone,
    Player(String),
}

/// A parsed score expression. Keeps the raw input for error reporting.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreExpression {
    raw: String,
    scores: Vec<(ScoreToken, ScoreTarget)>,
}

/// Two-player outcome of an Elo event: `score` is player A's result (1, 0.5 or 0).
#[derive(Clone, Debug, PartialEq)]
pub struct EloOutcome {
    pub player_a: String,
    pub player_b: String,
    pub score: f64,
}

impl ScoreExpression {
    /// Split `raw` on whitespace into a blanket token or token/player pairs.
    /// A leading `@` on player names is dropped.
    pub fn parse(raw: &str) -> Result<Self, ScoreboardError> {
        let words: Vec<&str> = raw.split_whitespace().collect();
        let invalid = |reason: &str| invalid_expression(raw, reason);

        let scores = match words.as_slice() {
            [] => return Err(invalid("no score given")),
            [token] => {
                let token = ScoreToken::parse(token).ok_or_else(|| invalid("not a score"))?;
                vec![(token, ScoreTarget::Everyone)]
            }
            _ if words.len() % 2 != 0 => {
                return Err(invalid("every score needs exactly one player"));
            }
            _ => {
                let mut scores = Vec::with_capacity(words.len() / 2);
                for pair in words.chunks_exact(2) {
                    let token = ScoreToken::parse(pair[0])
                        .ok_or_else(|| invalid(&format!("{} is not a score", pair[0])))?;
                    let player = pair[1].strip_prefix('@').unwrap_or(pair[1]);
                    if player.is_empty() {
                        return Err(invalid("missing player name"));
                    }
                    scores.push((token, ScoreTarget::Player(player.to_string())));
                }
                scores
            }
        };

        Ok(Self {
            raw: raw.to_string(),
            scores,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scores(&self) -> &[(ScoreToken, ScoreTarget)] {
        &self.scores
    }

    pub fn is_blanket(&self) -> bool {
        matches!(self.scores.as_slice(), [(_, ScoreTarget::Everyone)])
    }

    /// Players named explicitly, in order of first appearance.
    pub fn named_players(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (_, target) in &self.scores {
            if let ScoreTarget::Player(name) = target {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }

    /// Check the expression against the rules of `game_type`.
    pub fn validate(&self, game_type: GameType) -> Result<(), ScoreboardError> {
        let invalid = |reason: &str| Err(invalid_expression(&self.raw, reason));
        let has_draw = self.scores.iter().any(|(t, _)| *t == ScoreToken::Draw);

        if self.is_blanket() {
            if game_type.is_zero_sum() {
                return invalid("a single score cannot balance on a zero-sum board");
            }
            if has_draw {
                return invalid("a draw needs exactly two players");
            }
            return Ok(());
        }

        if has_draw {
            if game_type == GameType::Points {
                return invalid("points boards do not record draws");
            }
            let all_draws = self.scores.iter().all(|(t, _)| *t == ScoreToken::Draw);
            if !all_draws || self.scores.len() != 2 || self.named_players().len() != 2 {
                return invalid("a draw needs exactly two different players");
            }
        }

        if game_type.is_zero_sum() {
            let total = self
                .scores
                .iter()
                .try_fold(0i64, |acc, (t, _)| acc.checked_add(t.integer()));
            if total != Some(0) {
                return invalid("scores must add up to zero");
            }
        }

        if game_type == GameType::Elo {
            if self.scores.len() != 2 || self.named_players().len() != 2 {
                return invalid("an elo result needs exactly two different players");
            }
            if !has_draw && self.scores.iter().any(|(t, _)| t.integer() == 0) {
                return invalid("an elo result needs a winner and a loser");
            }
        }

        Ok(())
    }

    /// Accumulate per-player deltas for `board`. Blanket scores expand to every player on it.
    ///
    /// Every named player must be on the board. Elo rating changes are not included.
    pub fn bundle(&self, board: &Scoreboard) -> Result<BTreeMap<String, PlayerDelta>, ScoreboardError> {
        let mut deltas: BTreeMap<String, PlayerDelta> = BTreeMap::new();
        for (token, target) in &self.scores {
            let delta = self.token_delta(board.game_type, *token)?;
            match target {
                ScoreTarget::Everyone => {
                    for player in board.players.keys() {
                        deltas.entry(player.clone()).or_default().merge(&delta);
                    }
                }
                ScoreTarget::Player(player) => {
                    if !board.has_player(player) {
                        return Err(board.player_not_found(player));
                    }
                    deltas.entry(player.clone()).or_default().merge(&delta);
                }
            }
        }
        Ok(deltas)
    }

    /// The two-player outcome for an Elo event. Call after [`validate`](Self::validate).
    pub fn elo_outcome(&self) -> Result<EloOutcome, ScoreboardError> {
        match self.scores.as_slice() {
            [(a_token, ScoreTarget::Player(a)), (_, ScoreTarget::Player(b))] if a != b => {
                let score = match *a_token {
                    ScoreToken::Draw => 0.5,
                    t if t.integer() > 0 => 1.0,
                    _ => 0.0,
                };
                Ok(EloOutcome {
                    player_a: a.clone(),
                    player_b: b.clone(),
                    score,
                })
            }
            _ => Err(invalid_expression(
                &self.raw,
                "an elo result needs exactly two different players",
            )),
        }
    }

    fn token_delta(&self, game_type: GameType, token: ScoreToken) -> Result<PlayerDelta, ScoreboardError> {
        let mut delta = PlayerDelta::default();
        if game_type == GameType::Points {
            delta.points = token.integer();
            return Ok(delta);
        }
        if token == ScoreToken::Draw {
            delta.draws = 1;
            return Ok(delta);
        }
        let n = token.integer();
        let count = u32::try_from(n.unsigned_abs())
            .map_err(|_| invalid_expression(&self.raw, "score is too large"))?;
        if n >= 0 {
            delta.wins = count;
        } else {
            delta.losses = count;
        }
        Ok(delta)
    }
}

/// Whether `raw` parses and passes validation for `game_type`.
pub fn is_valid_score_string(raw: &str, game_type: GameType) -> bool {
    ScoreExpression::parse(raw)
        .and_then(|e| e.validate(game_type))
        .is_ok()
}

fn invalid_expression(raw: &str, reason: &str) -> ScoreboardError {
    ScoreboardError::InvalidScoreExpression {
        expression: raw.to_string(),
        reason: reason.to_string(),
    }
}
