// ********* Input data structures ***********

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// A single value found in a ballot, as handed over by a loader.
///
/// Loaders do not reject values on their own: anything that is not a whole
/// number is kept so that the validation step can report it.
#[derive(PartialEq, Debug, Clone)]
pub enum VoteValue {
    /// A whole number of votes. It may still be negative.
    Count(i128),
    /// A number with a fractional part.
    Fractional(f64),
    /// Any other content (text, booleans, empty markers).
    Other(String),
}

/// The votes of one player, in the order they were read.
#[derive(PartialEq, Debug, Clone)]
pub struct Ballot {
    pub player: String,
    pub votes: Vec<(String, VoteValue)>,
}

/// A rule violation found while checking the ballots.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Violation {
    NonIntegerVote {
        player: String,
    },
    NegativeVote {
        player: String,
    },
    /// The projects on the ballot are not exactly the contested projects.
    IncompleteBallot {
        player: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    BudgetMismatch {
        player: String,
        actual: i128,
        expected: u32,
    },
}

impl Violation {
    pub fn player(&self) -> &str {
        match self {
            Violation::NonIntegerVote { player }
            | Violation::NegativeVote { player }
            | Violation::IncompleteBallot { player, .. }
            | Violation::BudgetMismatch { player, .. } => player,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::NonIntegerVote { player } => write!(f, "[{}] Non integer vote", player),
            Violation::NegativeVote { player } => write!(f, "[{}] Negative vote", player),
            Violation::IncompleteBallot {
                player,
                missing,
                unexpected,
            } => {
                write!(
                    f,
                    "[{}] Does not have votes equal to the set of contested projects",
                    player
                )?;
                if !missing.is_empty() {
                    write!(f, " (missing: {})", missing.join(", "))?;
                }
                if !unexpected.is_empty() {
                    write!(f, " (unexpected: {})", unexpected.join(", "))?;
                }
                Ok(())
            }
            Violation::BudgetMismatch {
                player,
                actual,
                expected,
            } => write!(
                f,
                "[{}] Has {} votes instead of {}",
                player, actual, expected
            ),
        }
    }
}

// ******** Output data structures *********

/// The trace of the resolution of one project.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ProjectRound {
    pub round: usize,
    pub project: String,
    /// The eligible players and their vote count for this project.
    pub votes: Vec<(String, u64)>,
    /// Cumulative weights, starting at 0. Empty when the project was skipped.
    pub intervals: Vec<u128>,
    pub winning_number: Option<u128>,
    pub winner: Option<String>,
}

impl ProjectRound {
    /// Position of the winner in `votes`.
    pub fn winner_index(&self) -> Option<usize> {
        let winner = self.winner.as_ref()?;
        self.votes.iter().position(|(p, _)| p == winner)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LotteryResult {
    pub rounds: Vec<ProjectRound>,
    /// (player, project), in the order the projects were awarded.
    pub winners: Vec<(String, String)>,
    pub unallocated_players: Vec<String>,
    pub unallocated_projects: Vec<String>,
}

impl LotteryResult {
    pub fn winner_of(&self, player: &str) -> Option<&str> {
        self.winners
            .iter()
            .find(|(p, _)| p == player)
            .map(|(_, project)| project.as_str())
    }
}

/// Errors that prevent the lottery from running.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LotteryErrors {
    ConfigurationError(String),
    DuplicatePlayer(String),
    /// All the violations found in the ballots. No allocation happened.
    Violations(Vec<Violation>),
}

impl Error for LotteryErrors {}

impl Display for LotteryErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LotteryErrors::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            LotteryErrors::DuplicatePlayer(name) => {
                write!(f, "Player {} submitted more than one ballot", name)
            }
            LotteryErrors::Violations(vs) => {
                write!(f, "{} violation(s) detected", vs.len())
            }
        }
    }
}

// ********* Configuration **********

/// How votes translate into lottery tickets.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CountingType {
    Linear,
    Quadratic,
}

impl CountingType {
    pub fn weight(&self, count: u64) -> u128 {
        let c = count as u128;
        match self {
            CountingType::Linear => c,
            CountingType::Quadratic => c * c,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CountingType::Linear => "linear",
            CountingType::Quadratic => "quadratic",
        }
    }
}

impl FromStr for CountingType {
    type Err = LotteryErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(CountingType::Linear),
            "quadratic" => Ok(CountingType::Quadratic),
            x => Err(LotteryErrors::ConfigurationError(format!(
                "unknown counting type {:?} (expected linear or quadratic)",
                x
            ))),
        }
    }
}

impl Display for CountingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LotteryRules {
    pub votes_per_person: u32,
    pub counting_type: CountingType,
    pub contested_projects: Vec<String>,
}

impl LotteryRules {
    pub fn new(
        votes_per_person: u32,
        counting_type: CountingType,
        contested_projects: &[String],
    ) -> Result<LotteryRules, LotteryErrors> {
        if votes_per_person == 0 {
            return Err(LotteryErrors::ConfigurationError(
                "votes_per_person must be positive".to_string(),
            ));
        }
        if contested_projects.is_empty() {
            return Err(LotteryErrors::ConfigurationError(
                "no contested projects".to_string(),
            ));
        }
        let mut seen: HashSet<&String> = HashSet::new();
        for p in contested_projects.iter() {
            if !seen.insert(p) {
                return Err(LotteryErrors::ConfigurationError(format!(
                    "project {:?} is listed more than once",
                    p
                )));
            }
        }
        Ok(LotteryRules {
            votes_per_person,
            counting_type,
            contested_projects: contested_projects.to_vec(),
        })
    }
}
