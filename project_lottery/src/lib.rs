/*!
Allocation of contested projects among players with a weighted lottery.

Every player spends a fixed budget of votes over all the contested projects.
Projects are then resolved one by one, in decreasing order of total votes:
each project is awarded by a lottery in which every still eligible player
holds a number of tickets equal to their votes (linear counting) or the square
of their votes (quadratic counting). A player who wins a project takes no part
in the following lotteries.

```
use project_lottery::builder::Builder;
use project_lottery::lottery::SeededDraws;
use project_lottery::{CountingType, LotteryRules};

let rules = LotteryRules::new(
    10,
    CountingType::Linear,
    &["A".to_string(), "B".to_string()],
)?;
let mut builder = Builder::new(&rules);
builder.add_ballot_counts("P1", &[("A", 10), ("B", 0)])?;
builder.add_ballot_counts("P2", &[("A", 0), ("B", 10)])?;

let mut draws = SeededDraws::from_input(b"example");
let result = builder.run(&mut draws)?;
assert_eq!(result.winner_of("P1"), Some("A"));
assert_eq!(result.winner_of("P2"), Some("B"));
# Ok::<(), project_lottery::LotteryErrors>(())
```
*/
mod config;

pub mod builder;
pub mod lottery;
pub mod manual;

use log::{debug, info};

use std::{
    cmp::Reverse,
    collections::{HashMap, HashSet},
};

pub use crate::config::*;
use crate::lottery::DrawSource;

/// The largest count a player may put on a single project.
pub const MAX_COUNT: u64 = u32::MAX as u64;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct PlayerId(usize);

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct ProjectId(usize);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u128);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

/// The validated votes.
///
/// Every player has a count for every project, in the order of the projects.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteTable {
    players: Vec<String>,
    projects: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl VoteTable {
    /// Builds a table from trusted counts.
    ///
    /// Each row holds the counts of one player, in the order of `projects`.
    /// Missing counts are read as zero and extra counts are dropped. No budget
    /// check is performed: use [validate] for untrusted input.
    ///
    /// A count cannot exceed [MAX_COUNT], which is the largest possible budget.
    pub fn new(
        projects: &[String],
        rows: &[(String, Vec<u64>)],
    ) -> Result<VoteTable, LotteryErrors> {
        for (player, cs) in rows.iter() {
            if let Some(c) = cs.iter().find(|c| **c > MAX_COUNT) {
                return Err(LotteryErrors::ConfigurationError(format!(
                    "player {:?} has {} votes on a project, at most {} are allowed",
                    player, c, MAX_COUNT
                )));
            }
        }
        Ok(VoteTable::from_rows(projects, rows))
    }

    fn from_rows(projects: &[String], rows: &[(String, Vec<u64>)]) -> VoteTable {
        let counts = rows
            .iter()
            .map(|(_, cs)| {
                (0..projects.len())
                    .map(|idx| cs.get(idx).cloned().unwrap_or(0))
                    .collect()
            })
            .collect();
        VoteTable {
            players: rows.iter().map(|(p, _)| p.clone()).collect(),
            projects: projects.to_vec(),
            counts,
        }
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn count(&self, player: &str, project: &str) -> Option<u64> {
        let pid = self.players.iter().position(|p| p == player)?;
        let prid = self.projects.iter().position(|p| p == project)?;
        Some(self.counts[pid][prid])
    }

    fn vote(&self, pid: PlayerId, prid: ProjectId) -> VoteCount {
        VoteCount(u128::from(self.counts[pid.0][prid.0]))
    }

    fn total(&self, prid: ProjectId) -> VoteCount {
        (0..self.players.len())
            .map(|idx| self.vote(PlayerId(idx), prid))
            .sum()
    }
}

/// Checks that all the ballots follow the rules.
///
/// All the violations are collected. For each player, the checks are run in
/// order: integer values, non-negative values, then the set of projects and
/// the budget. A failure of one of the first two checks skips the rest for
/// that player.
pub fn validate(coll: &[Ballot], rules: &LotteryRules) -> Result<VoteTable, Vec<Violation>> {
    debug!("validate: coll size: {:?}", coll.len());
    let contested: HashSet<&String> = rules.contested_projects.iter().collect();
    let mut violations: Vec<Violation> = Vec::new();
    let mut rows: Vec<(String, Vec<u64>)> = Vec::new();

    for ballot in coll.iter() {
        let player = ballot.player.clone();

        let mut counts: Vec<i128> = Vec::new();
        for (_, v) in ballot.votes.iter() {
            if let VoteValue::Count(c) = v {
                counts.push(*c);
            }
        }
        if counts.len() != ballot.votes.len() {
            debug!("validate: {}: non integer values {:?}", player, ballot.votes);
            violations.push(Violation::NonIntegerVote { player });
            continue;
        }
        if counts.iter().any(|c| *c < 0) {
            violations.push(Violation::NegativeVote { player });
            continue;
        }

        let mut valid = true;
        let voted: Vec<&String> = ballot.votes.iter().map(|(p, _)| p).collect();
        let voted_set: HashSet<&String> = voted.iter().cloned().collect();
        if voted_set != contested || voted.len() != voted_set.len() {
            let missing: Vec<String> = rules
                .contested_projects
                .iter()
                .filter(|p| !voted_set.contains(p))
                .cloned()
                .collect();
            let mut unexpected: Vec<String> = Vec::new();
            for p in voted.iter() {
                let duplicated = voted.iter().filter(|p2| *p2 == p).count() > 1;
                if (!contested.contains(p) || duplicated) && !unexpected.contains(*p) {
                    unexpected.push((*p).clone());
                }
            }
            violations.push(Violation::IncompleteBallot {
                player: player.clone(),
                missing,
                unexpected,
            });
            valid = false;
        }

        let actual: i128 = counts.iter().sum();
        if actual != rules.votes_per_person as i128 {
            violations.push(Violation::BudgetMismatch {
                player: player.clone(),
                actual,
                expected: rules.votes_per_person,
            });
            valid = false;
        }

        if valid {
            // Non-negative and summing to the budget: every count fits.
            let by_project: HashMap<&String, u64> = ballot
                .votes
                .iter()
                .zip(counts.iter())
                .map(|((p, _), c)| (p, u64::try_from(*c).unwrap_or_default()))
                .collect();
            let row = rules
                .contested_projects
                .iter()
                .map(|p| by_project.get(p).cloned().unwrap_or(0))
                .collect();
            rows.push((player, row));
        }
    }

    if violations.is_empty() {
        Ok(VoteTable::from_rows(&rules.contested_projects, &rows))
    } else {
        info!("validate: {} violation(s) detected", violations.len());
        Err(violations)
    }
}

/// Resolves a single project by lottery among the eligible players.
///
/// If the eligible players put no vote on this project, it is not awarded
/// and no number is drawn. Fails if the total weight does not fit in a `u128`.
pub fn resolve_project<D: DrawSource + ?Sized>(
    round: usize,
    project: &str,
    eligible: &[(String, u64)],
    counting_type: CountingType,
    draws: &mut D,
) -> Result<ProjectRound, LotteryErrors> {
    resolve_project_internal(round, project, eligible, counting_type, draws).map(|(r, _)| r)
}

// Also returns the index of the winner in `eligible`.
fn resolve_project_internal<D: DrawSource + ?Sized>(
    round: usize,
    project: &str,
    eligible: &[(String, u64)],
    counting_type: CountingType,
    draws: &mut D,
) -> Result<(ProjectRound, Option<usize>), LotteryErrors> {
    let total: VoteCount = eligible
        .iter()
        .map(|(_, c)| VoteCount(u128::from(*c)))
        .sum();
    let mut res = ProjectRound {
        round,
        project: project.to_string(),
        votes: eligible.to_vec(),
        intervals: Vec::new(),
        winning_number: None,
        winner: None,
    };
    if total == VoteCount::EMPTY {
        info!("Project {}: no eligible votes, skipping", project);
        return Ok((res, None));
    }

    let intervals =
        lottery::cumulative_weights(eligible.iter().map(|(_, c)| counting_type.weight(*c)))
            .ok_or_else(|| {
                LotteryErrors::ConfigurationError(format!(
                    "project {}: the {} weights of the votes overflow",
                    project, counting_type
                ))
            })?;
    debug!("resolve_project: {}: intervals: {:?}", project, intervals);
    let picked = lottery::pick(&intervals, draws);
    if let Some((number, idx)) = picked {
        let winner = eligible[idx].0.clone();
        info!(
            "Project {}: winning number {} -> {} [{}]",
            project, number, winner, idx
        );
        res.winning_number = Some(number);
        res.winner = Some(winner);
    }
    res.intervals = intervals;
    Ok((res, picked.map(|(_, idx)| idx)))
}

/// Allocates the projects, the most voted ones first.
///
/// Projects with the same total keep their configuration order.
pub fn allocate<D: DrawSource + ?Sized>(
    table: &VoteTable,
    counting_type: CountingType,
    draws: &mut D,
) -> Result<LotteryResult, LotteryErrors> {
    let mut order: Vec<(ProjectId, VoteCount)> = (0..table.projects.len())
        .map(|idx| (ProjectId(idx), table.total(ProjectId(idx))))
        .collect();
    // Stable sort: ties keep the configuration order.
    order.sort_by_key(|(_, total)| Reverse(*total));
    info!(
        "Project order: {:?}",
        order
            .iter()
            .map(|(prid, total)| (table.projects[prid.0].as_str(), total.0))
            .collect::<Vec<(&str, u128)>>()
    );

    let mut winners: Vec<(PlayerId, ProjectId)> = Vec::new();
    let mut rounds: Vec<ProjectRound> = Vec::new();
    for (idx, (prid, _)) in order.iter().enumerate() {
        let eligible_ids: Vec<PlayerId> = (0..table.players.len())
            .map(PlayerId)
            .filter(|pid| !winners.iter().any(|(w, _)| w == pid))
            .collect();
        let eligible: Vec<(String, u64)> = eligible_ids
            .iter()
            .map(|pid| (table.players[pid.0].clone(), table.counts[pid.0][prid.0]))
            .collect();
        let (round, winner_idx) = resolve_project_internal(
            idx + 1,
            &table.projects[prid.0],
            &eligible,
            counting_type,
            draws,
        )?;
        if let Some(widx) = winner_idx {
            winners.push((eligible_ids[widx], *prid));
        }
        rounds.push(round);
    }

    let unallocated_players: Vec<String> = (0..table.players.len())
        .filter(|idx| !winners.iter().any(|(pid, _)| pid.0 == *idx))
        .map(|idx| table.players[idx].clone())
        .collect();
    let unallocated_projects: Vec<String> = (0..table.projects.len())
        .filter(|idx| !winners.iter().any(|(_, prid)| prid.0 == *idx))
        .map(|idx| table.projects[idx].clone())
        .collect();

    Ok(LotteryResult {
        rounds,
        winners: winners
            .iter()
            .map(|(pid, prid)| {
                (
                    table.players[pid.0].clone(),
                    table.projects[prid.0].clone(),
                )
            })
            .collect(),
        unallocated_players,
        unallocated_projects,
    })
}

/// Runs the complete lottery: validation, then allocation.
///
/// Nothing is drawn if a ballot violates the rules.
pub fn run_lottery<D: DrawSource + ?Sized>(
    coll: &[Ballot],
    rules: &LotteryRules,
    draws: &mut D,
) -> Result<LotteryResult, LotteryErrors> {
    info!(
        "Processing {:?} ballots, rules: {:?}",
        coll.len(),
        rules
    );
    let table = validate(coll, rules).map_err(LotteryErrors::Violations)?;
    let res = allocate(&table, rules.counting_type, draws)?;
    info!(
        "Allocation done: {} winner(s), unallocated players: {:?}, unallocated projects: {:?}",
        res.winners.len(),
        res.unallocated_players,
        res.unallocated_projects
    );
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::lottery::tests::ScriptedDraws;
    use crate::lottery::SeededDraws;

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn ballot(player: &str, votes: &[(&str, VoteValue)]) -> Ballot {
        Ballot {
            player: player.to_string(),
            votes: votes
                .iter()
                .map(|(p, v)| (p.to_string(), v.clone()))
                .collect(),
        }
    }

    fn rules(vpp: u32, ct: CountingType, projects: &[&str]) -> LotteryRules {
        LotteryRules::new(vpp, ct, &names(projects)).unwrap()
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn valid_ballots() {
        let r = rules(10, CountingType::Linear, &["A", "B"]);
        let coll = vec![
            ballot("P1", &[("A", VoteValue::Count(3)), ("B", VoteValue::Count(7))]),
            // Order of the projects on the ballot does not matter.
            ballot("P2", &[("B", VoteValue::Count(10)), ("A", VoteValue::Count(0))]),
        ];
        let table = validate(&coll, &r).unwrap();
        assert_eq!(table.players(), &names(&["P1", "P2"])[..]);
        assert_eq!(table.count("P2", "A"), Some(0));
        assert_eq!(table.count("P2", "B"), Some(10));
        assert_eq!(table.count("P1", "A"), Some(3));
    }

    #[test]
    fn non_integer_stops_other_checks() {
        let r = rules(10, CountingType::Linear, &["A", "B"]);
        let coll = vec![ballot(
            "P1",
            &[("A", VoteValue::Fractional(2.5)), ("C", VoteValue::Count(-4))],
        )];
        assert_eq!(
            validate(&coll, &r),
            Err(vec![Violation::NonIntegerVote {
                player: "P1".to_string()
            }])
        );
        let coll = vec![ballot("P1", &[("A", VoteValue::Other("ten".to_string()))])];
        assert_eq!(
            validate(&coll, &r),
            Err(vec![Violation::NonIntegerVote {
                player: "P1".to_string()
            }])
        );
    }

    #[test]
    fn negative_stops_other_checks() {
        let r = rules(10, CountingType::Linear, &["A", "B"]);
        let coll = vec![ballot("P1", &[("A", VoteValue::Count(-1))])];
        assert_eq!(
            validate(&coll, &r),
            Err(vec![Violation::NegativeVote {
                player: "P1".to_string()
            }])
        );
    }

    #[test]
    fn set_and_budget_are_both_reported() {
        let r = rules(10, CountingType::Linear, &["A", "B"]);
        let coll = vec![ballot(
            "P1",
            &[("A", VoteValue::Count(4)), ("C", VoteValue::Count(2))],
        )];
        assert_eq!(
            validate(&coll, &r),
            Err(vec![
                Violation::IncompleteBallot {
                    player: "P1".to_string(),
                    missing: names(&["B"]),
                    unexpected: names(&["C"]),
                },
                Violation::BudgetMismatch {
                    player: "P1".to_string(),
                    actual: 6,
                    expected: 10,
                },
            ])
        );
    }

    #[test]
    fn budget_must_be_spent_exactly() {
        let r = rules(10, CountingType::Linear, &["A", "B"]);
        let coll = vec![ballot(
            "P1",
            &[("A", VoteValue::Count(4)), ("B", VoteValue::Count(7))],
        )];
        assert_eq!(
            validate(&coll, &r),
            Err(vec![Violation::BudgetMismatch {
                player: "P1".to_string(),
                actual: 11,
                expected: 10,
            }])
        );
    }

    #[test]
    fn huge_integer_votes_are_budget_errors() {
        let r = rules(10, CountingType::Quadratic, &["A", "B"]);
        let huge = i128::from(u64::MAX);
        let coll = vec![ballot(
            "P1",
            &[("A", VoteValue::Count(huge)), ("B", VoteValue::Count(huge))],
        )];
        let vs = validate(&coll, &r).unwrap_err();
        assert_eq!(
            vs,
            vec![Violation::BudgetMismatch {
                player: "P1".to_string(),
                actual: 2 * huge,
                expected: 10,
            }]
        );
    }

    #[test]
    fn duplicated_project_is_incomplete() {
        let r = rules(10, CountingType::Linear, &["A", "B"]);
        let coll = vec![ballot(
            "P1",
            &[
                ("A", VoteValue::Count(4)),
                ("B", VoteValue::Count(3)),
                ("A", VoteValue::Count(3)),
            ],
        )];
        assert_eq!(
            validate(&coll, &r),
            Err(vec![Violation::IncompleteBallot {
                player: "P1".to_string(),
                missing: vec![],
                unexpected: names(&["A"]),
            }])
        );
    }

    #[test]
    fn all_violations_are_collected() {
        let r = rules(5, CountingType::Quadratic, &["A"]);
        let coll = vec![
            ballot("P1", &[("A", VoteValue::Fractional(5.5))]),
            ballot("P2", &[("A", VoteValue::Count(5))]),
            ballot("P3", &[("A", VoteValue::Count(-5))]),
            ballot("P4", &[("A", VoteValue::Count(4))]),
        ];
        let vs = validate(&coll, &r).unwrap_err();
        let players: Vec<&str> = vs.iter().map(|v| v.player()).collect();
        assert_eq!(players, vec!["P1", "P3", "P4"]);
    }

    #[test]
    fn violations_prevent_any_draw() {
        let r = rules(10, CountingType::Linear, &["A"]);
        let coll = vec![ballot("P1", &[("A", VoteValue::Count(9))])];
        let mut draws = ScriptedDraws::new(&[]);
        let res = run_lottery(&coll, &r, &mut draws);
        assert!(matches!(res, Err(LotteryErrors::Violations(vs)) if vs.len() == 1));
        assert!(draws.requested.is_empty());
    }

    #[test]
    fn resolve_linear() {
        let votes = vec![
            ("P1".to_string(), 3),
            ("P2".to_string(), 0),
            ("P3".to_string(), 2),
        ];
        let mut draws = ScriptedDraws::new(&[4]);
        let r = resolve_project(1, "A", &votes, CountingType::Linear, &mut draws).unwrap();
        assert_eq!(r.intervals, vec![0, 3, 3, 5]);
        assert_eq!(r.winning_number, Some(4));
        assert_eq!(r.winner, Some("P3".to_string()));
        assert_eq!(r.winner_index(), Some(2));
        assert_eq!(draws.requested, vec![5]);
    }

    #[test]
    fn resolve_quadratic() {
        let votes = vec![("P1".to_string(), 3), ("P2".to_string(), 2)];
        let mut draws = ScriptedDraws::new(&[10]);
        let r = resolve_project(1, "A", &votes, CountingType::Quadratic, &mut draws).unwrap();
        assert_eq!(r.intervals, vec![0, 9, 13]);
        assert_eq!(r.winner, Some("P2".to_string()));
        assert_eq!(draws.requested, vec![13]);
    }

    #[test]
    fn resolve_without_support() {
        let votes = vec![("P1".to_string(), 0), ("P2".to_string(), 0)];
        let mut draws = ScriptedDraws::new(&[]);
        let r = resolve_project(1, "A", &votes, CountingType::Quadratic, &mut draws).unwrap();
        assert_eq!(r.winner, None);
        assert_eq!(r.winning_number, None);
        assert!(r.intervals.is_empty());
        let r = resolve_project(1, "A", &[], CountingType::Linear, &mut draws).unwrap();
        assert_eq!(r.winner, None);
        assert!(draws.requested.is_empty());
    }

    #[test]
    fn largest_counts_do_not_overflow() {
        // Linear totals of u64 counts always fit.
        let votes = vec![("P1".to_string(), u64::MAX), ("P2".to_string(), 1)];
        let mut draws = ScriptedDraws::new(&[u128::from(u64::MAX) + 1]);
        let r = resolve_project(1, "A", &votes, CountingType::Linear, &mut draws).unwrap();
        assert_eq!(r.winner, Some("P2".to_string()));
        assert_eq!(draws.requested, vec![u128::from(u64::MAX) + 1]);

        // Two squares of u64::MAX do not.
        let votes = vec![("P1".to_string(), u64::MAX), ("P2".to_string(), u64::MAX)];
        let mut draws = ScriptedDraws::new(&[]);
        let r = resolve_project(1, "A", &votes, CountingType::Quadratic, &mut draws);
        assert!(matches!(r, Err(LotteryErrors::ConfigurationError(_))));
        assert!(draws.requested.is_empty());
    }

    #[test]
    fn table_counts_are_bounded() {
        let projects = names(&["A"]);
        let res = VoteTable::new(
            &projects,
            &[("P1".to_string(), vec![u64::MAX]), ("P2".to_string(), vec![1])],
        );
        assert!(matches!(res, Err(LotteryErrors::ConfigurationError(_))));

        let table = VoteTable::new(
            &projects,
            &[
                ("P1".to_string(), vec![MAX_COUNT]),
                ("P2".to_string(), vec![MAX_COUNT]),
            ],
        )
        .unwrap();
        let mut draws = SeededDraws::from_input(b"max");
        let res = allocate(&table, CountingType::Quadratic, &mut draws).unwrap();
        assert_eq!(res.winners.len(), 1);
        let square = u128::from(MAX_COUNT).pow(2);
        assert_eq!(res.rounds[0].intervals, vec![0, square, 2 * square]);
    }

    #[test]
    fn zero_vote_players_never_win() {
        let votes = vec![
            ("P1".to_string(), 0),
            ("P2".to_string(), 1),
            ("P3".to_string(), 0),
        ];
        let mut draws = SeededDraws::from_input(b"zero");
        for _ in 0..50 {
            let r = resolve_project(1, "A", &votes, CountingType::Quadratic, &mut draws).unwrap();
            assert_eq!(r.winner, Some("P2".to_string()));
        }
    }

    #[test]
    fn example_two_players_two_projects() {
        init_logger();
        let r = rules(10, CountingType::Linear, &["A", "B"]);
        let mut b = Builder::new(&r);
        b.add_ballot_counts("P1", &[("A", 10), ("B", 0)]).unwrap();
        b.add_ballot_counts("P2", &[("A", 0), ("B", 10)]).unwrap();
        for seed in ["x", "y", "z"] {
            let mut draws = SeededDraws::from_input(seed.as_bytes());
            let res = b.run(&mut draws).unwrap();
            assert_eq!(
                res.winners,
                vec![
                    ("P1".to_string(), "A".to_string()),
                    ("P2".to_string(), "B".to_string())
                ]
            );
            assert!(res.unallocated_players.is_empty());
            assert!(res.unallocated_projects.is_empty());
            let order: Vec<&str> = res.rounds.iter().map(|r| r.project.as_str()).collect();
            assert_eq!(order, vec!["A", "B"]);
            assert_eq!(res.rounds[1].votes, vec![("P2".to_string(), 10)]);
        }
    }

    #[test]
    fn example_no_support() {
        let projects = names(&["A"]);
        let table = VoteTable::new(
            &projects,
            &[("P1".to_string(), vec![0]), ("P2".to_string(), vec![0])],
        )
        .unwrap();
        let mut draws = ScriptedDraws::new(&[]);
        let res = allocate(&table, CountingType::Quadratic, &mut draws).unwrap();
        assert!(res.winners.is_empty());
        assert_eq!(res.unallocated_projects, names(&["A"]));
        assert_eq!(res.unallocated_players, names(&["P1", "P2"]));
        assert_eq!(res.rounds.len(), 1);
    }

    #[test]
    fn projects_in_descending_totals() {
        let projects = names(&["A", "B", "C", "D"]);
        let table = VoteTable::new(
            &projects,
            &[
                ("P1".to_string(), vec![1, 5, 1, 3]),
                ("P2".to_string(), vec![1, 0, 1, 8]),
            ],
        )
        .unwrap();
        // Totals: A=2, B=5, C=2, D=11. A and C tie and keep their order.
        let mut draws = ScriptedDraws::new(&[1, 1, 1]);
        let res = allocate(&table, CountingType::Linear, &mut draws).unwrap();
        let order: Vec<&str> = res.rounds.iter().map(|r| r.project.as_str()).collect();
        assert_eq!(order, vec!["D", "B", "A", "C"]);
        let rounds: Vec<usize> = res.rounds.iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![1, 2, 3, 4]);
    }

    #[test]
    fn winners_leave_the_pool() {
        let projects = names(&["A", "B", "C"]);
        let table = VoteTable::new(
            &projects,
            &[
                ("P1".to_string(), vec![6, 4, 0]),
                ("P2".to_string(), vec![5, 5, 0]),
            ],
        )
        .unwrap();
        // A (11) first: draw 1 -> P1. B (9): only P2 left, weight 5.
        // C (0) is skipped.
        let mut draws = ScriptedDraws::new(&[1, 5]);
        let res = allocate(&table, CountingType::Linear, &mut draws).unwrap();
        assert_eq!(draws.requested, vec![11, 5]);
        assert_eq!(res.winner_of("P1"), Some("A"));
        assert_eq!(res.winner_of("P2"), Some("B"));
        assert_eq!(res.unallocated_projects, names(&["C"]));
        assert!(res.unallocated_players.is_empty());
        assert_eq!(res.rounds[2].votes, Vec::<(String, u64)>::new());
    }

    #[test]
    fn more_projects_than_players() {
        let projects = names(&["A", "B", "C"]);
        let table = VoteTable::new(
            &projects,
            &[("P1".to_string(), vec![2, 2, 1])],
        )
        .unwrap();
        // A and B tie: A goes first. Nobody is left for B and C.
        let mut draws = ScriptedDraws::new(&[2]);
        let res = allocate(&table, CountingType::Linear, &mut draws).unwrap();
        assert_eq!(draws.requested, vec![2]);
        assert_eq!(res.winners.len(), 1);
        assert_eq!(res.winner_of("P1"), Some("A"));
        assert_eq!(res.unallocated_projects, names(&["B", "C"]));
    }

    #[test]
    fn allocation_invariants() {
        let projects = names(&["A", "B", "C", "D"]);
        let rows: Vec<(String, Vec<u64>)> = (0..6)
            .map(|i| {
                let a = (i * 3) % 7;
                let b = (i * 5) % 4;
                let c = (i * 2) % 3;
                (format!("P{}", i), vec![a, b, c, 20 - a - b - c])
            })
            .collect();
        let table = VoteTable::new(&projects, &rows).unwrap();
        for seed in 0..20u8 {
            let mut draws = SeededDraws::from_input(&[seed]);
            let res = allocate(&table, CountingType::Quadratic, &mut draws).unwrap();
            assert!(res.winners.len() <= 4);
            let players: HashSet<&String> = res.winners.iter().map(|(p, _)| p).collect();
            let won: HashSet<&String> = res.winners.iter().map(|(_, p)| p).collect();
            assert_eq!(players.len(), res.winners.len());
            assert_eq!(won.len(), res.winners.len());
            assert!(res.unallocated_players.iter().all(|p| !players.contains(p)));
            assert!(res.unallocated_projects.iter().all(|p| !won.contains(p)));
            assert_eq!(res.unallocated_players.len() + res.winners.len(), 6);
            assert_eq!(res.unallocated_projects.len() + res.winners.len(), 4);
        }
    }

    #[test]
    fn same_seed_same_outcome() {
        let projects = names(&["A", "B"]);
        let table = VoteTable::new(
            &projects,
            &[
                ("P1".to_string(), vec![5, 5]),
                ("P2".to_string(), vec![5, 5]),
                ("P3".to_string(), vec![5, 5]),
            ],
        )
        .unwrap();
        let mut d1 = SeededDraws::from_input(b"votes");
        let mut d2 = SeededDraws::from_input(b"votes");
        let r1 = allocate(&table, CountingType::Linear, &mut d1).unwrap();
        let r2 = allocate(&table, CountingType::Linear, &mut d2).unwrap();
        assert_eq!(r1, r2);
    }

    fn frequencies(counts: &[u64], ct: CountingType, trials: u32) -> Vec<f64> {
        let votes: Vec<(String, u64)> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| (format!("P{}", i), *c))
            .collect();
        let mut wins = vec![0u32; counts.len()];
        for t in 0..trials {
            let mut draws = SeededDraws::from_input(&t.to_le_bytes());
            let r = resolve_project(1, "A", &votes, ct, &mut draws).unwrap();
            wins[r.winner_index().unwrap()] += 1;
        }
        wins.iter().map(|w| *w as f64 / trials as f64).collect()
    }

    #[test]
    fn linear_frequencies() {
        let f = frequencies(&[1, 3], CountingType::Linear, 4000);
        assert!((f[0] - 0.25).abs() < 0.04, "{:?}", f);
        assert!((f[1] - 0.75).abs() < 0.04, "{:?}", f);
    }

    #[test]
    fn quadratic_frequencies() {
        // Weights 1 and 9.
        let f = frequencies(&[1, 3], CountingType::Quadratic, 4000);
        assert!((f[0] - 0.1).abs() < 0.03, "{:?}", f);
        assert!((f[1] - 0.9).abs() < 0.03, "{:?}", f);
    }
}
