// Reader for Excel workbooks. The layout is the same as for the CSV files.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::lottery::{
    io_common::{parse_vote_text, vote_from_float},
    *,
};

pub fn read_xlsx_votes(path: &str, worksheet_name: Option<&str>) -> LResult<Vec<Ballot>> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    debug!("read_xlsx_votes: header: {:?}", header);
    let mut projects: Vec<String> = Vec::new();
    for cell in header.iter().skip(1) {
        match cell {
            DataType::String(s) => projects.push(s.trim().to_string()),
            DataType::Int(i) => projects.push(i.to_string()),
            DataType::Float(f) => projects.push(f.to_string()),
            x => whatever!("read_xlsx_votes: unsupported project name {:?}", x),
        }
    }

    let mut res: Vec<Ballot> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            continue;
        }
        let player = match row.first() {
            Some(DataType::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(DataType::Int(i)) => i.to_string(),
            Some(DataType::Float(f)) => f.to_string(),
            _ => return MissingPlayerSnafu { lineno }.fail(),
        };
        let mut votes: Vec<(String, VoteValue)> = Vec::new();
        for (project, cell) in projects.iter().zip(row.iter().skip(1)) {
            let v = match cell {
                DataType::Empty => None,
                DataType::Int(i) => Some(VoteValue::Count(i128::from(*i))),
                DataType::Float(f) => Some(vote_from_float(*f)),
                DataType::String(s) => parse_vote_text(s),
                DataType::Bool(b) => Some(VoteValue::Other(b.to_string())),
                x => Some(VoteValue::Other(format!("{:?}", x))),
            };
            if let Some(v) = v {
                votes.push((project.clone(), v));
            }
        }
        debug!("read_xlsx_votes: lineno: {:?} {}: {:?}", lineno, player, votes);
        res.push(Ballot { player, votes });
    }
    Ok(res)
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> LResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: using worksheet {:?}", worksheet_name);
                Ok(wrange.clone())
            }
            _ => {
                let names: Vec<&String> = all_worksheets.iter().map(|p| &p.0).collect();
                whatever!(
                    "The workbook {} has several worksheets {:?}, use --excel-worksheet-name",
                    path,
                    names
                )
            }
        }
    }
}
