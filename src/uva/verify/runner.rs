use super::{language_for, Language};
use crate::{
    diff::{diff, Comparison},
    error::Result,
};
use log::debug;
use std::{
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    time::{Duration, Instant},
};
use tokio::{io::AsyncWriteExt, process::Command};

pub enum CompileOutcome {
    /// Script-like languages skip straight to running.
    Skipped,
    Success { warnings: Option<String> },
    Failed { log: String },
}

pub struct RunOutcome {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    /// Wall time around the candidate process only; compiling is not
    /// included.
    pub time: Duration,
}

#[derive(Debug)]
pub enum Verdict {
    Accepted {
        time: Duration,
    },
    WrongAnswer {
        comparison: Comparison,
        time: Duration,
    },
    RuntimeError {
        status: ExitStatus,
        /// Whatever the candidate printed before dying is still shown.
        stdout: String,
        stderr: String,
    },
    CompileError {
        log: String,
    },
    /// Input was supplied without an answer: raw output, no claim.
    NoAnswer {
        stdout: String,
        time: Duration,
    },
}

pub struct Verification {
    pub compile_warnings: Option<String>,
    pub verdict: Verdict,
}

pub struct Candidate {
    language: &'static Language,
    source: PathBuf,
    binary: PathBuf,
}

impl Candidate {
    pub fn new(source: &Path) -> Result<Self> {
        Ok(Candidate {
            language: language_for(source)?,
            source: source.to_path_buf(),
            binary: source.with_extension(""),
        })
    }

    pub fn language(&self) -> &'static Language {
        self.language
    }

    fn expand(&self, template: &[&str]) -> Vec<String> {
        template
            .iter()
            .map(|arg| {
                arg.replace("{source}", &self.source.to_string_lossy())
                    .replace("{binary}", &invocation_path(&self.binary))
            })
            .collect()
    }

    pub async fn compile(&self) -> Result<CompileOutcome> {
        let template = match self.language.compile {
            Some(t) => t,
            None => return Ok(CompileOutcome::Skipped),
        };
        let args = self.expand(template);
        debug!("compiling: {:?}", args);
        let output = Command::new(&args[0]).args(&args[1..]).output().await?;
        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));
        if !output.status.success() {
            return Ok(CompileOutcome::Failed { log });
        }
        Ok(CompileOutcome::Success {
            warnings: if log.trim().is_empty() { None } else { Some(log) },
        })
    }

    pub async fn run(&self, input: &str) -> Result<RunOutcome> {
        let args = self.expand(self.language.run);
        debug!("running: {:?}", args);
        let start = Instant::now();
        let mut child = Command::new(&args[0])
            .args(&args[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            let input = input.as_bytes().to_vec();
            tokio::spawn(async move {
                let _ = stdin.write_all(&input).await;
            });
        }
        let output = child.wait_with_output().await?;
        let time = start.elapsed();
        Ok(RunOutcome {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            time,
        })
    }

    pub async fn verify(&self, input: &str, expected: Option<&str>) -> Result<Verification> {
        let compile_warnings = match self.compile().await? {
            CompileOutcome::Failed { log } => {
                return Ok(Verification {
                    compile_warnings: None,
                    verdict: Verdict::CompileError { log },
                })
            }
            CompileOutcome::Success { warnings } => warnings,
            CompileOutcome::Skipped => None,
        };
        let run = self.run(input).await?;
        Ok(Verification {
            compile_warnings,
            verdict: judge(run, expected),
        })
    }
}

/// Bare relative binary names would hit PATH lookup instead of the
/// freshly built file.
fn invocation_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if path.is_relative() && !text.contains(std::path::MAIN_SEPARATOR) {
        format!("./{}", text)
    } else {
        text.into_owned()
    }
}

/// Turn one finished run into a verdict, comparing against `expected`
/// when one is available. A failed run is terminal; no comparison
/// happens after it.
pub fn judge(run: RunOutcome, expected: Option<&str>) -> Verdict {
    if !run.status.success() {
        return Verdict::RuntimeError {
            status: run.status,
            stdout: run.stdout,
            stderr: run.stderr,
        };
    }
    match expected {
        Some(answer) => {
            let comparison = diff(answer, &run.stdout, "expected", "yours");
            if comparison.is_equal() {
                Verdict::Accepted { time: run.time }
            } else {
                Verdict::WrongAnswer {
                    comparison,
                    time: run.time,
                }
            }
        }
        None => Verdict::NoAnswer {
            stdout: run.stdout,
            time: run.time,
        },
    }
}

/// Compile, run against `input`, judge the outcome. A compile failure
/// is terminal.
pub async fn verify(source: &Path, input: &str, expected: Option<&str>) -> Result<Verification> {
    Candidate::new(source)?.verify(input, expected).await
}
