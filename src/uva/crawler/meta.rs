use super::{unescape, volume_to_category};
use crate::{
    config::crawl,
    error::{Error, Result},
    judge::Session,
    types::{ProblemInfo, ProblemSet},
};
use log::{debug, info};
use regex::Regex;
use std::sync::Arc;
use tokio::sync::{
    mpsc::{channel, Receiver, Sender},
    Mutex,
};

struct ListingRegex {
    /// One listing row: display id and title joined by `&nbsp;-&nbsp;`
    /// inside the anchor whose href carries the true `problem=` id,
    /// then the submission count cell and the acceptance percentage.
    row: Regex,
    /// A volume link on a root category page.
    volume: Regex,
}

impl ListingRegex {
    fn new() -> Self {
        ListingRegex {
            row: Regex::new(
                r#"(?s)<a href="[^"]*problem=(\d+)[^"]*">(\d+)&nbsp;-&nbsp;(.*?)</a></td>\s*<td[^>]*>(\d+)</td>.*?([0-9]+(?:\.[0-9]+)?)%"#,
            )
            .unwrap(),
            volume: Regex::new(r#"<a href="([^"]*category=\d+[^"]*)">\s*Volume"#).unwrap(),
        }
    }
}

/// Crawl every volume of the judge and key the records by display id.
///
/// Two discovery workers feed listing-page URLs to a fixed pool of
/// extraction workers over a channel; records fan back in over a second
/// channel. The first error any worker hits aborts the whole crawl:
/// returning early drops the record receiver, every pending `send`
/// then fails, and the remaining workers wind down on their own.
pub async fn crawl_problem_list(session: &Session) -> Result<ProblemSet> {
    let (volume_tx, volume_rx) = channel::<String>(32);
    let (record_tx, mut record_rx) = channel::<Result<ProblemInfo>>(64);
    info!("crawling problem list from {}", session.judge_url());

    {
        let tx = volume_tx.clone();
        let judge_url = session.judge_url().to_string();
        tokio::spawn(async move { discover_problem_set_volumes(&judge_url, &tx).await });
    }
    {
        let session = session.clone();
        let errors = record_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = discover_contest_volumes(&session, &volume_tx).await {
                let _ = errors.send(Err(e)).await;
            }
        });
    }

    let volume_rx = Arc::new(Mutex::new(volume_rx));
    for _ in 0..crawl::WORKERS {
        let session = session.clone();
        let rx = volume_rx.clone();
        let tx = record_tx.clone();
        tokio::spawn(async move { extract_records(&session, rx, tx).await });
    }
    // The collector's receiver closes once every worker, stage 1 and
    // stage 2 alike, has dropped its sender.
    drop(record_tx);

    let mut problems = ProblemSet::new();
    while let Some(record) = record_rx.recv().await {
        let problem = record?;
        problems.insert(problem.id, problem);
    }
    info!("crawled {} problems", problems.len());
    Ok(problems)
}

/// Problem Set Volumes have a fixed numbering; their category ids come
/// from the static mapping, no page fetch needed.
async fn discover_problem_set_volumes(judge_url: &str, volumes: &Sender<String>) {
    for volume in crawl::FIRST_VOLUME..=crawl::LAST_VOLUME {
        let category = match volume_to_category(volume) {
            Some(c) => c,
            None => continue,
        };
        let url = format!(
            "{}/index.php?option=com_onlinejudge&Itemid=8&category={}",
            judge_url, category
        );
        if volumes.send(url).await.is_err() {
            return;
        }
    }
}

/// Contest Volumes are open-ended, so their listing URLs are scraped
/// off the root category page.
async fn discover_contest_volumes(session: &Session, volumes: &Sender<String>) -> Result<()> {
    let url = format!(
        "{}/index.php?option=com_onlinejudge&Itemid=8&category={}",
        session.judge_url(),
        crawl::CONTEST_CATEGORY
    );
    let body = session.get_text(&url).await?;
    let regex = ListingRegex::new();
    let mut found = 0usize;
    for captures in regex.volume.captures_iter(&body) {
        found += 1;
        let href = unescape(&captures[1]);
        if volumes
            .send(format!("{}/{}", session.judge_url(), href))
            .await
            .is_err()
        {
            return Ok(());
        }
    }
    if found == 0 {
        return Err(Error::Malformed("contest volume links"));
    }
    debug!("discovered {} contest volumes", found);
    Ok(())
}

async fn extract_records(
    session: &Session,
    volumes: Arc<Mutex<Receiver<String>>>,
    records: Sender<Result<ProblemInfo>>,
) {
    let regex = ListingRegex::new();
    loop {
        let url = { volumes.lock().await.recv().await };
        let url = match url {
            Some(u) => u,
            None => return, // stage 1 finished and the queue drained
        };
        match session.get_text(&url).await.and_then(|body| {
            let rows = parse_listing_page(&regex, &body);
            debug!("{}: {:?} records", url, rows.as_ref().map(Vec::len));
            rows
        }) {
            Ok(rows) => {
                for problem in rows {
                    if records.send(Ok(problem)).await.is_err() {
                        return; // collector is gone, crawl was aborted
                    }
                }
            }
            Err(e) => {
                let _ = records.send(Err(e)).await;
                return;
            }
        }
    }
}

/// Every `show_problem` anchor on the page must parse into a record;
/// a row the regex cannot account for means the markup changed and the
/// whole crawl is untrustworthy.
fn parse_listing_page(regex: &ListingRegex, body: &str) -> Result<Vec<ProblemInfo>> {
    let expected = body.matches("page=show_problem").count();
    let mut rows = Vec::with_capacity(expected);
    for captures in regex.row.captures_iter(body) {
        rows.push(ProblemInfo {
            true_id: captures[1].parse().map_err(|_| Error::Malformed("true id"))?,
            id: captures[2].parse().map_err(|_| Error::Malformed("display id"))?,
            title: unescape(captures[3].trim()),
            total_submissions: captures[4]
                .parse()
                .map_err(|_| Error::Malformed("submission count"))?,
            percentage: captures[5]
                .parse()
                .map_err(|_| Error::Malformed("acceptance percentage"))?,
        });
    }
    if rows.len() != expected {
        return Err(Error::Malformed("volume listing row"));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubServer;
    use std::collections::HashSet;

    fn listing_row(true_id: u32, id: u32, title: &str, subs: u64, pct: &str) -> String {
        format!(
            r#"<tr class="sectiontableentry1"><td>x</td><td></td>
            <td><a href="index.php?option=com_onlinejudge&amp;Itemid=8&amp;category=3&amp;page=show_problem&amp;problem={}">{}&nbsp;-&nbsp;{}</a></td>
            <td>{}</td><td><div><div></div><div>{}%</div></div></td></tr>"#,
            true_id, id, title, subs, pct
        )
    }

    fn listing_page(rows: &[String]) -> String {
        format!("<html><table>{}</table></html>", rows.concat())
    }

    #[test]
    fn listing_rows_parse() {
        let regex = ListingRegex::new();
        let page = listing_page(&[
            listing_row(36, 100, "The 3n + 1 problem", 1234567, "43.1"),
            listing_row(37, 101, "The Blocks &amp; Problem", 9, "100"),
        ]);
        let rows = parse_listing_page(&regex, &page).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 100);
        assert_eq!(rows[0].true_id, 36);
        assert_eq!(rows[0].title, "The 3n + 1 problem");
        assert_eq!(rows[0].total_submissions, 1234567);
        assert!((rows[0].percentage - 43.1).abs() < 1e-6);
        assert_eq!(rows[1].title, "The Blocks & Problem");
    }

    #[test]
    fn unparsable_row_is_malformed() {
        let regex = ListingRegex::new();
        // Separator between id and title is missing.
        let page = listing_page(&[
            r#"<td><a href="index.php?page=show_problem&amp;problem=36">100 The 3n + 1 problem</a></td><td>5</td><td>50%</td>"#.to_string(),
        ]);
        assert!(matches!(
            parse_listing_page(&regex, &page),
            Err(Error::Malformed("volume listing row"))
        ));
    }

    #[tokio::test]
    async fn crawl_merges_all_feeds() {
        let server = StubServer::serve(vec![
            (
                "category=2".to_string(),
                r#"<a href="index.php?option=com_onlinejudge&amp;Itemid=8&amp;category=900">Volume CA</a>
                   <a href="index.php?option=com_onlinejudge&amp;Itemid=8&amp;category=901">Volume CB</a>"#
                    .to_string(),
            ),
            (
                "category=900".to_string(),
                listing_page(&[
                    listing_row(1100, 100, "A", 10, "50"),
                    listing_row(1101, 101, "B", 20, "25.5"),
                ]),
            ),
            (
                "category=901".to_string(),
                listing_page(&[listing_row(1102, 102, "C", 30, "75")]),
            ),
        ]);
        let session = Session::with_endpoints(server.url(), server.url()).unwrap();
        let problems = crawl_problem_list(&session).await.unwrap();
        let ids: HashSet<u32> = problems.keys().copied().collect();
        assert_eq!(ids, HashSet::from([100, 101, 102]));
        assert_eq!(problems[&102].true_id, 1102);
    }

    #[tokio::test]
    async fn malformed_listing_aborts_crawl() {
        let server = StubServer::serve(vec![
            (
                "category=2".to_string(),
                r#"<a href="index.php?option=com_onlinejudge&amp;Itemid=8&amp;category=900">Volume CA</a>"#
                    .to_string(),
            ),
            (
                "category=900".to_string(),
                // A show_problem anchor the row regex cannot match.
                r#"<a href="index.php?page=show_problem&amp;problem=36">broken row</a>"#
                    .to_string(),
            ),
        ]);
        let session = Session::with_endpoints(server.url(), server.url()).unwrap();
        assert!(matches!(
            crawl_problem_list(&session).await,
            Err(Error::Malformed("volume listing row"))
        ));
    }
}
