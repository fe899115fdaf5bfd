pub use crate::config::*;
use crate::lottery::DrawSource;

/// A builder for adding ballots.
///
/// ```
/// pub use project_lottery::builder::Builder;
/// pub use project_lottery::{CountingType, LotteryRules, VoteValue};
/// # use project_lottery::LotteryErrors;
///
/// let rules = LotteryRules::new(4, CountingType::Quadratic, &["A".to_string()])?;
/// let mut builder = Builder::new(&rules);
///
/// builder.add_ballot_counts("Anna", &[("A", 4)])?;
/// builder.add_ballot("Bob", &[("A".to_string(), VoteValue::Fractional(0.5))])?;
///
/// assert!(builder.add_ballot_counts("Anna", &[("A", 4)]).is_err());
/// # Ok::<(), LotteryErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: LotteryRules,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new(rules: &LotteryRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            _ballots: Vec::new(),
        }
    }

    /// Adds a ballot where all the votes are whole numbers.
    pub fn add_ballot_counts(
        &mut self,
        player: &str,
        votes: &[(&str, i64)],
    ) -> Result<(), LotteryErrors> {
        let vs: Vec<(String, VoteValue)> = votes
            .iter()
            .map(|(p, c)| (p.to_string(), VoteValue::Count(i128::from(*c))))
            .collect();
        self.add_ballot(player, &vs)
    }

    /// Adds the ballot of a player.
    ///
    /// The values are only checked when running the lottery. A player may
    /// only submit one ballot.
    pub fn add_ballot(
        &mut self,
        player: &str,
        votes: &[(String, VoteValue)],
    ) -> Result<(), LotteryErrors> {
        if self._ballots.iter().any(|b| b.player == player) {
            return Err(LotteryErrors::DuplicatePlayer(player.to_string()));
        }
        self._ballots.push(Ballot {
            player: player.to_string(),
            votes: votes.to_vec(),
        });
        Ok(())
    }

    pub fn rules(&self) -> &LotteryRules {
        &self._rules
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self._ballots
    }

    pub fn run<D: DrawSource + ?Sized>(&self, draws: &mut D) -> Result<LotteryResult, LotteryErrors> {
        crate::run_lottery(&self._ballots, &self._rules, draws)
    }
}
