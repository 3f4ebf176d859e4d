use crate::read::read_line;
use clap::ArgMatches;
use std::io::Write;
use termcolor::{Color, StandardStream};
use uva_cli::{
    error::{Error, Result},
    judge::Session,
};

#[allow(unused_must_use)]
pub async fn user(stdout: &mut StandardStream, matches: &ArgMatches) -> Result<()> {
    if matches.is_present("logout") {
        Session::logout()?;
        write_ok!(stdout, "Logout", "See you next time");
    } else if matches.is_present("login") {
        let username = read_line(stdout, b"Username: ");
        let password = read_line(stdout, b"Password: ");
        let session = Session::login(&username, &password).await?;
        write_ok!(
            stdout,
            "Login",
            "Welcome, {}",
            session.username().unwrap_or(&username)
        );
    } else {
        match Session::restore() {
            Ok(session) => {
                write_info!(
                    stdout,
                    "User",
                    "{}",
                    session.username().unwrap_or("(unknown)")
                );
            }
            Err(Error::NotLoggedIn) => {
                write_info!(stdout, "User", "not logged in");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
