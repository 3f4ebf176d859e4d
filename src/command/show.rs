use crate::spinner::spin;
use clap::ArgMatches;
use std::io::Write;
use termcolor::{Color, StandardStream};
use uva_cli::{
    cache,
    error::{Error, Result},
    judge::{pdf, Session},
};

const WIDTH: usize = 72;
const INDENT: &str = "       ";

fn indented(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", INDENT, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section(stdout: &mut StandardStream, title: &str, body: &str) -> Result<()> {
    crate::color::set_fg(stdout, Color::White);
    writeln!(stdout, "{}", title)?;
    crate::color::reset_fg(stdout);
    writeln!(stdout, "{}\n", indented(body.trim()))?;
    Ok(())
}

#[allow(unused_must_use)]
pub async fn show(stdout: &mut StandardStream, matches: &ArgMatches) -> Result<()> {
    let id: u32 = matches
        .value_of("problem")
        .unwrap()
        .parse()
        .map_err(|_| Error::InvalidArgument("problem id must be a number".to_string()))?;
    let session = Session::restore().or_else(|e| match e {
        Error::NotLoggedIn => Session::anonymous(),
        other => Err(other),
    })?;

    let spinner = spin("Fetching problem info");
    let info = cache::problem_info(&session, id).await;
    spinner.finish().await;
    let info = info?;

    let spinner = spin("Fetching problem statement");
    let text = pdf::problem_text(&session, &info).await;
    spinner.finish().await;
    let text = text?;

    let title = format!("{} - {}", info.id, info.title);
    crate::color::set_fg(stdout, Color::White);
    writeln!(
        stdout,
        "{:>pad$}\n",
        title,
        pad = (WIDTH + title.chars().count()) / 2
    )?;
    crate::color::reset_fg(stdout);

    let accepted = (info.total_submissions as f64 * info.percentage as f64 / 100.0).round();
    write_info!(stdout, "Rate", "{:.2}%", info.percentage);
    write_info!(stdout, "Accept", "{}", accepted as u64);
    write_info!(stdout, "Total", "{}", info.total_submissions);
    writeln!(stdout)?;

    section(stdout, "Description", &text.description)?;
    if matches.is_present("full") {
        section(stdout, "Input", &text.input)?;
        section(stdout, "Output", &text.output)?;
        section(stdout, "Sample Input", &text.sample_input)?;
        section(stdout, "Sample Output", &text.sample_output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::indented;

    #[test]
    fn body_lines_are_indented() {
        assert_eq!(indented("a\n\nb"), "       a\n\n       b");
    }
}
