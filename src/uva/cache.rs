use crate::{
    crawler,
    error::{Error, Result},
    judge::Session,
    storage,
    types::{ProblemInfo, ProblemSet, TestData},
};
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use std::{future::Future, path::Path};

/// Cache-aside lookup: serve from the store, else run the crawl and
/// persist its result before handing it back, so the next call for the
/// same key is a guaranteed hit. A failed crawl caches nothing.
async fn fetch_or_crawl<T, F>(path: &Path, crawl: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: Future<Output = Result<T>>,
{
    if let Some(value) = storage::load(path)? {
        debug!("cache hit: {}", path.display());
        return Ok(value);
    }
    debug!("cache miss: {}", path.display());
    let value = crawl.await?;
    storage::save(path, &value)?;
    Ok(value)
}

pub async fn problem_list(session: &Session) -> Result<ProblemSet> {
    fetch_or_crawl(
        &storage::problem_list_file(),
        crawler::meta::crawl_problem_list(session),
    )
    .await
}

pub async fn problem_info(session: &Session, id: u32) -> Result<ProblemInfo> {
    problem_list(session)
        .await?
        .remove(&id)
        .ok_or(Error::ProblemNotFound(id))
}

pub async fn test_data(session: &Session, id: u32) -> Result<TestData> {
    fetch_or_crawl(
        &storage::test_data_file(id),
        crawler::testdata::crawl_test_data(session, id),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, io};

    #[tokio::test]
    async fn second_get_needs_no_crawl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value.bin");
        let crawls = Cell::new(0u32);
        let crawl = || async {
            crawls.set(crawls.get() + 1);
            Ok(vec![100u32, 101])
        };
        assert_eq!(fetch_or_crawl(&path, crawl()).await.unwrap(), [100, 101]);
        assert_eq!(fetch_or_crawl(&path, crawl()).await.unwrap(), [100, 101]);
        assert_eq!(crawls.get(), 1);
    }

    #[tokio::test]
    async fn failed_crawl_caches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value.bin");
        let failed: Result<u32> =
            fetch_or_crawl(&path, async {
                Err(Error::Io(io::Error::new(io::ErrorKind::Other, "down")))
            })
            .await;
        assert!(failed.is_err());
        assert!(!path.exists());
        // The next call retries the crawl instead of trusting a
        // poisoned entry.
        let value = fetch_or_crawl(&path, async { Ok(7u32) }).await.unwrap();
        assert_eq!(value, 7);
    }
}
