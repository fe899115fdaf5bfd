// Reader for the JSON vote files. They follow the structure of the YAML files.

use crate::lottery::*;

pub fn parse_json_votes(raw: &[u8], path: &str) -> LResult<(Option<FileConfigs>, Vec<Ballot>)> {
    let doc: JSValue = serde_json::from_slice(raw).context(ParsingJsonSnafu { path })?;

    let configs: Option<FileConfigs> = match doc.get("Configs") {
        Some(c) => Some(serde_json::from_value(c.clone()).context(ParsingJsonSnafu { path })?),
        None => None,
    };

    let mut res: Vec<Ballot> = Vec::new();
    match doc.get("Players") {
        Some(JSValue::Object(players)) => {
            for (player, v) in players.iter() {
                let votes_m = match v {
                    JSValue::Object(m) => m,
                    x => whatever!("Votes of player {} are not an object: {:?}", player, x),
                };
                let votes: Vec<(String, VoteValue)> = votes_m
                    .iter()
                    .map(|(project, pv)| (project.clone(), json_vote(pv)))
                    .collect();
                debug!("parse_json_votes: {}: {:?}", player, votes);
                res.push(Ballot {
                    player: player.clone(),
                    votes,
                });
            }
        }
        Some(JSValue::Null) | None => {
            warn!("parse_json_votes: no players found in {}", path);
        }
        Some(x) => whatever!("Players section is not an object: {:?}", x),
    }
    Ok((configs, res))
}

fn json_vote(v: &JSValue) -> VoteValue {
    match v {
        JSValue::Number(n) => {
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
        JSValue::String(s) => VoteValue::Other(s.clone()),
        x => VoteValue::Other(x.to_string()),
    }
}
