use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    env,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

pub fn data_dir() -> PathBuf {
    if let Some(dir) = env::var_os("UVA_CLI_HOME") {
        return PathBuf::from(dir);
    }
    let home = env::var_os("HOME").unwrap_or_else(|| ".".into());
    Path::new(&home).join(".local/share/uva-cli")
}

pub fn problem_list_file() -> PathBuf {
    data_dir().join("problems.bin")
}
pub fn test_data_file(id: u32) -> PathBuf {
    data_dir().join("test-data").join(format!("{}.bin", id))
}
pub fn login_file() -> PathBuf {
    data_dir().join("login.bin")
}
pub fn pdf_file(id: u32, title: &str) -> PathBuf {
    data_dir()
        .join("pdf")
        .join(format!("{}.{}.pdf", id, title.replace(' ', "-")))
}

/// `Ok(None)` when the file does not exist. A file that exists but does
/// not decode is `Error::Corrupt`; proceeding with half-read data would
/// silently poison every later run.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e)),
    };
    bincode::deserialize_from(BufReader::new(file))
        .map(Some)
        .map_err(|e| Error::Corrupt {
            path: path.to_owned(),
            source: e,
        })
}

pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    // Flush before returning; an error swallowed by the writer's drop
    // would leave a truncated file behind an `Ok`.
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, value).map_err(|e| match *e {
        bincode::ErrorKind::Io(io) => Error::Io(io),
        kind => Error::Corrupt {
            path: path.to_owned(),
            source: Box::new(kind),
        },
    })?;
    writer.flush().map_err(Error::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TestData;
    use std::io::Write;

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test-data").join("100.bin");
        let data = TestData {
            input: "1 2\n".to_string(),
            output: "3\n".to_string(),
        };
        save(&path, &data).unwrap();
        let loaded: Option<TestData> = load(&path).unwrap();
        assert_eq!(loaded, Some(data));
    }

    #[test]
    fn absent_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<TestData> = load(&dir.path().join("missing.bin")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn write_failure_is_not_swallowed() {
        // /dev/full accepts the open but fails the buffered write on
        // flush; save must report that instead of returning Ok.
        let data = TestData {
            input: "1 2\n".to_string(),
            output: "3\n".to_string(),
        };
        assert!(matches!(
            save(Path::new("/dev/full"), &data),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn truncated_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        let data = TestData {
            input: "x".repeat(100),
            output: String::new(),
        };
        save(&path, &data).unwrap();
        let bytes = fs::read(&path).unwrap();
        File::create(&path)
            .unwrap()
            .write_all(&bytes[..bytes.len() / 2])
            .unwrap();
        match load::<TestData>(&path) {
            Err(Error::Corrupt { .. }) => {}
            other => panic!("expected Corrupt, got {:?}", other.map(|_| ())),
        }
    }
}
