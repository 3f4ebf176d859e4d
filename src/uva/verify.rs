use crate::error::{Error, Result};
use std::path::Path;

pub mod runner;

pub use runner::{judge, verify, Candidate, CompileOutcome, RunOutcome, Verdict, Verification};

/// Toolchain entry for one source language: an optional compile command
/// and a run command, both templates over `{source}` and `{binary}`.
pub struct Language {
    pub name: &'static str,
    pub compile: Option<&'static [&'static str]>,
    pub run: &'static [&'static str],
    /// Code the judge's submit form expects for this language.
    pub judge_code: &'static str,
}

const LANGUAGES: &[(&[&str], Language)] = &[
    (
        &["c"],
        Language {
            name: "ANSI C",
            compile: Some(&["gcc", "-Wall", "-fdiagnostics-color=always", "-o", "{binary}", "{source}"]),
            run: &["{binary}"],
            judge_code: "1",
        },
    ),
    (
        &["cc", "cpp"],
        Language {
            name: "C++11",
            compile: Some(&["g++", "-Wall", "-fdiagnostics-color=always", "-o", "{binary}", "{source}"]),
            run: &["{binary}"],
            judge_code: "5",
        },
    ),
    (
        &["java"],
        Language {
            name: "Java",
            compile: Some(&["javac", "{source}"]),
            run: &["java", "{binary}"],
            judge_code: "2",
        },
    ),
    (
        &["pas"],
        Language {
            name: "Pascal",
            compile: Some(&["fpc", "-o{binary}", "{source}"]),
            run: &["{binary}"],
            judge_code: "4",
        },
    ),
    (
        &["py"],
        Language {
            name: "Python 3",
            compile: None,
            run: &["python3", "{source}"],
            judge_code: "6",
        },
    ),
];

pub fn language_for(source: &Path) -> Result<&'static Language> {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    LANGUAGES
        .iter()
        .find(|(exts, _)| exts.contains(&ext))
        .map(|(_, lang)| lang)
        .ok_or_else(|| Error::UnsupportedLanguage(ext.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn languages_by_extension() {
        assert_eq!(language_for(Path::new("100.3n1.cpp")).unwrap().name, "C++11");
        assert_eq!(language_for(Path::new("100.3n1.cc")).unwrap().name, "C++11");
        assert_eq!(language_for(Path::new("a.py")).unwrap().name, "Python 3");
        assert!(matches!(
            language_for(Path::new("a.rs")),
            Err(Error::UnsupportedLanguage(_))
        ));
        // Only languages the judge accepts are listed; shell scripts
        // have no submission code.
        assert!(language_for(Path::new("a.sh")).is_err());
    }
}
