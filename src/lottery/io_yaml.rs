// Reader for the YAML vote files.

use serde_yaml::Value as YValue;

use crate::lottery::*;

pub fn parse_yaml_votes(raw: &[u8], path: &str) -> LResult<(Option<FileConfigs>, Vec<Ballot>)> {
    let doc: YValue = serde_yaml::from_slice(raw).context(ParsingYamlSnafu { path })?;

    let configs: Option<FileConfigs> = match doc.get("Configs") {
        Some(c) => Some(serde_yaml::from_value(c.clone()).context(ParsingYamlSnafu { path })?),
        None => None,
    };

    let mut res: Vec<Ballot> = Vec::new();
    match doc.get("Players") {
        Some(YValue::Mapping(players)) => {
            for (k, v) in players.iter() {
                let player = yaml_key(k)?;
                let votes_m = match v {
                    YValue::Mapping(m) => m,
                    YValue::Null => {
                        // A player without any vote.
                        res.push(Ballot {
                            player,
                            votes: Vec::new(),
                        });
                        continue;
                    }
                    x => whatever!("Votes of player {} are not a mapping: {:?}", player, x),
                };
                let mut votes: Vec<(String, VoteValue)> = Vec::new();
                for (pk, pv) in votes_m.iter() {
                    votes.push((yaml_key(pk)?, yaml_vote(pv)));
                }
                debug!("parse_yaml_votes: {}: {:?}", player, votes);
                res.push(Ballot { player, votes });
            }
        }
        Some(YValue::Null) | None => {
            warn!("parse_yaml_votes: no players found in {}", path);
        }
        Some(x) => whatever!("Players section is not a mapping: {:?}", x),
    }
    Ok((configs, res))
}

fn yaml_key(v: &YValue) -> LResult<String> {
    match v {
        YValue::String(s) => Ok(s.clone()),
        YValue::Number(n) => Ok(n.to_string()),
        YValue::Bool(b) => Ok(b.to_string()),
        x => whatever!("Unsupported name: {:?}", x),
    }
}

fn yaml_vote(v: &YValue) -> VoteValue {
    match v {
        YValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                VoteValue::Count(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                VoteValue::Count(i128::from(u))
            } else if n.is_f64() {
                VoteValue::Fractional(n.as_f64().unwrap_or(f64::NAN))
            } else {
                VoteValue::Other(n.to_string())
            }
        }
        YValue::String(s) => VoteValue::Other(s.clone()),
        YValue::Bool(b) => VoteValue::Other(b.to_string()),
        YValue::Null => VoteValue::Other("null".to_string()),
        x => VoteValue::Other(format!("{:?}", x)),
    }
}
