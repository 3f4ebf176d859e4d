use super::Session;
use crate::{
    config,
    error::{Error, Result},
    types::ProblemInfo,
};
use log::debug;
use regex::Regex;
use tokio::time::sleep;

/// Verdict row of the judge's "My Submissions" table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeVerdict {
    pub verdict: String,
    pub run_time: String,
}

impl JudgeVerdict {
    pub fn is_accepted(&self) -> bool {
        self.verdict == "Accepted"
    }
    fn is_pending(&self) -> bool {
        self.verdict == "In judge queue"
    }
}

pub struct Submission<'a> {
    session: &'a Session,
    pub id: String,
}

/// Upload a solution. The save endpoint answers with a redirect whose
/// location carries the submission id, so redirects stay disabled here.
pub async fn send<'a>(
    session: &'a Session,
    problem: &ProblemInfo,
    language_code: &str,
    source: &str,
) -> Result<Submission<'a>> {
    let form = [
        ("problemid", problem.true_id.to_string()),
        ("category", (problem.id / 100).to_string()),
        ("language", language_code.to_string()),
        ("code", source.to_string()),
    ];
    let response = session
        .no_redirect_client()?
        .post(format!(
            "{}/index.php?option=com_onlinejudge&Itemid=8&page=save_submission",
            session.judge_url()
        ))
        .form(&form)
        .send()
        .await?;
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Judge("submission got no redirect".to_string()))?;
    let id = parse_submit_id(location)
        .ok_or_else(|| Error::Judge(format!("submission not acknowledged: {}", location)))?;
    debug!("submission received with id {}", id);
    Ok(Submission { session, id })
}

impl<'a> Submission<'a> {
    pub async fn poll(&self) -> Result<JudgeVerdict> {
        let body = self
            .session
            .get_text(&format!(
                "{}/index.php?option=com_onlinejudge&Itemid=9",
                self.session.judge_url()
            ))
            .await?;
        parse_status_row(&body, &self.id)
            .ok_or_else(|| Error::Judge(format!("submission {} not in status table", self.id)))
    }

    /// Poll until the judge leaves the queue state.
    pub async fn wait(&self) -> Result<JudgeVerdict> {
        loop {
            let verdict = self.poll().await?;
            if !verdict.is_pending() {
                return Ok(verdict);
            }
            sleep(config::submission::POLL_DELAY).await;
        }
    }
}

fn parse_submit_id(location: &str) -> Option<String> {
    Regex::new(r"Submission\+received\+with\+ID\+(\d+)")
        .unwrap()
        .captures(location)
        .map(|c| c[1].to_string())
}

/// Find the status row for `id` and pull out its verdict and run time
/// cells. Rows hold the submission id first, the verdict two cells
/// later and the run time two cells after that.
fn parse_status_row(html: &str, id: &str) -> Option<JudgeVerdict> {
    let row = Regex::new(r"(?s)<tr[^>]*>\s*<td[^>]*>\s*(\d+)\s*</td>(.*?)</tr>").unwrap();
    let cell = Regex::new(r"(?s)<td[^>]*>(.*?)</td>").unwrap();
    let tags = Regex::new(r"<[^>]+>").unwrap();
    for captures in row.captures_iter(html) {
        if &captures[1] != id {
            continue;
        }
        let cells: Vec<String> = cell
            .captures_iter(&captures[2])
            .map(|c| tags.replace_all(&c[1], "").trim().to_string())
            .collect();
        if cells.len() < 5 {
            return None;
        }
        return Some(JudgeVerdict {
            verdict: cells[2].clone(),
            run_time: cells[4].clone(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_id_from_redirect_location() {
        let location = "index.php?option=com_onlinejudge&Itemid=8\
            &mosmsg=Submission+received+with+ID+29123456";
        assert_eq!(parse_submit_id(location), Some("29123456".to_string()));
        assert_eq!(parse_submit_id("index.php?mosmsg=Wrong"), None);
    }

    #[test]
    fn status_row_for_submission() {
        let html = r#"
        <table>
          <tr class="sectiontableheader"><th>#</th></tr>
          <tr class="sectiontableentry1">
            <td>29123456</td>
            <td><a href="...">100 - The 3n + 1 problem</a></td>
            <td>ANSI C</td>
            <td><b>Accepted</b></td>
            <td></td>
            <td>0.120</td>
          </tr>
        </table>"#;
        let verdict = parse_status_row(html, "29123456").unwrap();
        assert_eq!(verdict.verdict, "Accepted");
        assert_eq!(verdict.run_time, "0.120");
        assert!(verdict.is_accepted());
        assert!(parse_status_row(html, "999").is_none());
    }
}
