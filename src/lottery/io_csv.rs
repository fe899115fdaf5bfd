// Primitives for reading CSV files.
//
// The first row holds the names of the projects, after a first column with the
// names of the players.

use crate::lottery::{io_common::parse_vote_text, *};

pub fn parse_csv_votes(raw: &[u8], path: &str) -> LResult<Vec<Ballot>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw);
    let header: Vec<String> = rdr
        .headers()
        .context(CsvOpenSnafu { path })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("parse_csv_votes: header: {:?}", header);
    let projects = &header[header.len().min(1)..];

    let mut res: Vec<Ballot> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        if line.iter().all(|s| s.is_empty()) {
            continue;
        }
        let player = line
            .get(0)
            .filter(|s| !s.is_empty())
            .context(MissingPlayerSnafu { lineno })?
            .to_string();
        if line.len() > header.len() {
            whatever!(
                "Line {}: {} cells for {} columns",
                lineno,
                line.len(),
                header.len()
            )
        }
        let mut votes: Vec<(String, VoteValue)> = Vec::new();
        for (project, cell) in projects.iter().zip(line.iter().skip(1)) {
            if let Some(v) = parse_vote_text(cell) {
                votes.push((project.clone(), v));
            }
        }
        debug!("parse_csv_votes: lineno: {:?} {}: {:?}", lineno, player, votes);
        res.push(Ballot { player, votes });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows() {
        let raw = b"player,A,B\nP1,3,7\nP2, 10 ,\n\nP3,2.5,x\n";
        let ballots = parse_csv_votes(raw, "votes.csv").unwrap();
        assert_eq!(ballots.len(), 3);
        assert_eq!(
            ballots[0].votes,
            vec![
                ("A".to_string(), VoteValue::Count(3)),
                ("B".to_string(), VoteValue::Count(7))
            ]
        );
        // The empty cell is a missing vote.
        assert_eq!(
            ballots[1].votes,
            vec![("A".to_string(), VoteValue::Count(10))]
        );
        assert_eq!(ballots[2].votes[0].1, VoteValue::Fractional(2.5));
        assert_eq!(ballots[2].votes[1].1, VoteValue::Other("x".to_string()));
    }

    #[test]
    fn missing_player_name() {
        let raw = b"player,A\n,3\n";
        assert!(matches!(
            parse_csv_votes(raw, "votes.csv"),
            Err(LotteryCliError::MissingPlayer { lineno: 2 })
        ));
    }

    #[test]
    fn too_many_cells() {
        let raw = b"player,A\nP1,3,4\n";
        assert!(parse_csv_votes(raw, "votes.csv").is_err());
    }
}
