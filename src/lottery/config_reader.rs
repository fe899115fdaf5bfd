use crate::lottery::*;

use serde::{Deserialize, Serialize};

/// The `Configs` section of a vote file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileConfigs {
    pub votes_per_person: i64,
    pub counting_type: String,
    #[serde(alias = "contended_projects")]
    pub contested_projects: Vec<String>,
}

impl FileConfigs {
    pub fn rules(&self) -> LResult<LotteryRules> {
        let counting_type: CountingType = self.counting_type.parse().context(LotterySnafu {})?;
        let votes_per_person: u32 = match u32::try_from(self.votes_per_person) {
            Ok(x) => x,
            Err(_) => {
                return Err(LotteryCliError::Lottery {
                    source: LotteryErrors::ConfigurationError(format!(
                        "votes_per_person must be a positive integer, got {}",
                        self.votes_per_person
                    )),
                })
            }
        };
        LotteryRules::new(votes_per_person, counting_type, &self.contested_projects)
            .context(LotterySnafu {})
    }
}

/// A standalone configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "Configs")]
    pub configs: FileConfigs,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "votesPerPerson")]
    pub votes_per_person: u32,
    #[serde(rename = "countingType")]
    pub counting_type: String,
    #[serde(rename = "contestedProjects")]
    pub contested_projects: Vec<String>,
    pub seed: String,
}

/// Reads a YAML or JSON file with a `Configs` section.
pub fn read_config_file(path: &str) -> LResult<FileConfigs> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let is_json = Path::new(path)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let cf: ConfigFile = if is_json {
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?
    } else {
        serde_yaml::from_str(&contents).context(ParsingYamlSnafu { path })?
    };
    debug!("read_config_file: {:?}", cf);
    Ok(cf.configs)
}

pub fn read_summary(path: &str) -> LResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}
