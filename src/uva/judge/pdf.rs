use super::Session;
use crate::{
    error::{Error, Result},
    storage,
    types::ProblemInfo,
};
use log::debug;
use regex::Regex;
use std::{fs, io, path::Path};
use tokio::process::Command;

/// Sections of a problem statement, split out of the PDF's text layer.
pub struct ProblemText {
    pub description: String,
    pub input: String,
    pub output: String,
    pub sample_input: String,
    pub sample_output: String,
}

pub async fn problem_text(session: &Session, problem: &ProblemInfo) -> Result<ProblemText> {
    let path = storage::pdf_file(problem.id, &problem.title);
    if !path.exists() {
        let url = format!(
            "{}/external/{}/p{}.pdf",
            session.judge_url(),
            problem.id / 100,
            problem.id
        );
        debug!("downloading {}", url);
        let bytes = session.get_bytes(&url).await?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, bytes)?;
    }
    split_sections(&extract_text(&path).await?)
}

async fn extract_text(path: &Path) -> Result<String> {
    let output = Command::new("pdftotext")
        .arg(path)
        .arg("-")
        .output()
        .await?;
    if !output.status.success() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::Other,
            format!("pdftotext failed on {}", path.display()),
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn split_sections(text: &str) -> Result<ProblemText> {
    let sections = Regex::new(
        "(?s)(.+)\nInput\n(.+)\nOutput\n(.+)\nSample Input\n(.+)\nSample Output\n(.+)",
    )
    .unwrap();
    let captures = sections
        .captures(text)
        .ok_or(Error::Malformed("problem pdf sections"))?;
    let section = |i: usize| captures[i].trim_matches('\n').to_string();
    Ok(ProblemText {
        description: section(1),
        input: section(2),
        output: section(3),
        sample_input: section(4),
        sample_output: section(5),
    })
}
