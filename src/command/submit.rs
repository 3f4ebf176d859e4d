use super::test::parse_source_name;
use crate::spinner::spin;
use clap::ArgMatches;
use std::{fs, io::Write, path::Path};
use termcolor::{Color, StandardStream};
use uva_cli::{
    cache,
    error::{Error, Result},
    judge::{submit, Session},
    verify::language_for,
};

#[allow(unused_must_use)]
pub async fn submit(stdout: &mut StandardStream, matches: &ArgMatches) -> Result<()> {
    let file = matches.value_of("file").unwrap();
    let id = match matches.value_of("id") {
        Some(id) => id
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("{}: not a problem id", id)))?,
        None => parse_source_name(file)?,
    };
    let language = language_for(Path::new(file))?;
    let source = fs::read_to_string(file)?;

    let session = Session::restore()?;
    let spinner = spin("Fetching problem info");
    let info = cache::problem_info(&session, id).await;
    spinner.finish().await;
    let info = info?;
    write_info!(
        stdout,
        "Submit",
        "{} - {} ({})",
        info.id,
        info.title,
        language.name
    );

    let spinner = spin("Sending code to the judge");
    let submission = submit::send(&session, &info, language.judge_code, &source).await;
    spinner.finish().await;
    let submission = submission?;
    write_info!(stdout, "Submit", "submission {} received", submission.id);

    let spinner = spin("Waiting for the verdict");
    let verdict = submission.wait().await;
    spinner.finish().await;
    let verdict = verdict?;

    if verdict.is_accepted() {
        crate::color::set_fg(stdout, Color::Cyan);
        writeln!(stdout, "✔ {} ({}s)", verdict.verdict, verdict.run_time)?;
    } else {
        crate::color::set_fg(stdout, Color::Red);
        writeln!(stdout, "✘ {} ({}s)", verdict.verdict, verdict.run_time)?;
    }
    crate::color::reset_fg(stdout);
    Ok(())
}
