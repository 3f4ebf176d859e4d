#[macro_use]
mod color;
mod command {
    pub mod show;
    pub mod submit;
    pub mod test;
    pub mod user;
}
mod read;
mod spinner;

use clap::{Arg, Command};
use std::{io::Write, process::exit};
use termcolor::{Color, ColorChoice, StandardStream, WriteColor};

#[allow(unused_must_use)]
#[tokio::main]
async fn main() {
    pretty_env_logger::init_timed();
    let matches = Command::new("uva-cli")
        .about("A command line helper for the UVa online judge")
        .version(get_version!("version"))
        .long_version(get_version!("long_version"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("user")
                .about("Show, create or drop the judge session")
                .arg(Arg::new("login").short('l').help("Log in to the judge"))
                .arg(
                    Arg::new("logout")
                        .short('L')
                        .conflicts_with("login")
                        .help("Forget the stored session"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show a problem statement")
                .arg(Arg::new("problem").required(true).help("Problem id"))
                .arg(
                    Arg::new("full")
                        .short('p')
                        .help("Also show input/output specs and samples"),
                ),
        )
        .subcommand(
            Command::new("submit")
                .about("Submit a solution to the judge")
                .arg(Arg::new("file").required(true).help("Source file"))
                .arg(
                    Arg::new("id")
                        .short('i')
                        .takes_value(true)
                        .help("Problem id, when the file name does not carry one"),
                ),
        )
        .subcommand(
            Command::new("test")
                .about("Run a solution against the expected output")
                .arg(Arg::new("file").required(true).help("Source file"))
                .arg(
                    Arg::new("input")
                        .short('i')
                        .takes_value(true)
                        .help("Use this input file instead of the crawled test case"),
                )
                .arg(
                    Arg::new("answer")
                        .short('a')
                        .takes_value(true)
                        .requires("input")
                        .help("Answer file for the custom input"),
                ),
        )
        .get_matches();

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let result = match matches.subcommand() {
        Some(("user", m)) => command::user::user(&mut stdout, m).await,
        Some(("show", m)) => command::show::show(&mut stdout, m).await,
        Some(("submit", m)) => command::submit::submit(&mut stdout, m).await,
        Some(("test", m)) => command::test::test(&mut stdout, m).await,
        _ => unreachable!(),
    };
    if let Err(e) = result {
        write_error!(&mut stdout, "Error", "{}", e);
        stdout.reset().unwrap_or(());
        exit(1);
    }
    stdout.reset().unwrap_or(());
}
