mod common;

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{fixture, search_record, FakeGitHub, SharedSource};
use trend_digest::acquisition::UNKNOWN_LANGUAGE;
use trend_digest::{
    AcquisitionError, AcquisitionPipeline, AcquisitionSettings, RetryPolicy, SourceTag,
    TrendingQuery, TrendingRange,
};

fn pipeline(source: FakeGitHub, settings: AcquisitionSettings) -> AcquisitionPipeline<FakeGitHub> {
    AcquisitionPipeline::new(source, settings)
        .with_retry_policy(RetryPolicy::immediate(3), RetryPolicy::immediate(2))
}

fn shared_pipeline(
    source: &Arc<FakeGitHub>,
    settings: AcquisitionSettings,
) -> AcquisitionPipeline<SharedSource> {
    AcquisitionPipeline::new(SharedSource(Arc::clone(source)), settings)
        .with_retry_policy(RetryPolicy::immediate(3), RetryPolicy::immediate(2))
}

fn without_readme() -> AcquisitionSettings {
    AcquisitionSettings {
        fetch_readme: false,
        ..AcquisitionSettings::default()
    }
}

#[tokio::test]
async fn scrapes_trending_fixture() {
    let source = FakeGitHub::trending();

    let result = pipeline(source, without_readme()).acquire().await.unwrap();

    assert_eq!(result.source_tag, SourceTag::PrimaryScrape);
    let names: Vec<_> = result.repositories.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["sxyazi/yazi", "astral-sh/uv", "torvalds/linux"]);

    let yazi = &result.repositories[0];
    assert_eq!(yazi.url(), "https://github.com/sxyazi/yazi");
    assert_eq!(yazi.stars(), 27_391);
    assert_eq!(yazi.stars_today(), 1_204);
    assert_eq!(yazi.language(), "Rust");
    assert!(yazi.description().starts_with("💥 Blazing fast terminal file manager"));

    let linux = &result.repositories[2];
    assert_eq!(linux.language(), UNKNOWN_LANGUAGE);
    assert_eq!(linux.description(), "");
    assert_eq!(linux.stars_today(), 96);
}

#[tokio::test]
async fn caps_scraped_list() {
    let source = FakeGitHub::trending();
    let settings = AcquisitionSettings {
        max_repos: 2,
        ..without_readme()
    };

    let result = pipeline(source, settings).acquire().await.unwrap();

    assert_eq!(result.repositories.len(), 2);
}

#[tokio::test]
async fn falls_back_to_search_after_retries() {
    let source = FakeGitHub {
        search_results: Some(vec![
            search_record("new/tool", 900),
            search_record("other/lib", 400),
        ]),
        ..FakeGitHub::default()
    };
    let settings = AcquisitionSettings {
        query: TrendingQuery {
            language: Some("rust".to_string()),
            since: TrendingRange::Weekly,
        },
        ..without_readme()
    };
    let pipeline = pipeline(source, settings);

    let result = pipeline.acquire().await.unwrap();

    assert_eq!(result.source_tag, SourceTag::SecondaryApi);
    assert_eq!(result.repositories.len(), 2);
    assert!(result.repositories.iter().all(|r| r.stars_today() == 0));
}

#[tokio::test]
async fn search_query_filters_recent_and_language() {
    let source = Arc::new(FakeGitHub {
        search_results: Some(vec![search_record("new/tool", 900)]),
        ..FakeGitHub::default()
    });
    let settings = AcquisitionSettings {
        query: TrendingQuery {
            language: Some("rust".to_string()),
            since: TrendingRange::Daily,
        },
        ..without_readme()
    };

    shared_pipeline(&source, settings).acquire().await.unwrap();

    // transient scrape failures are retried before falling back
    assert_eq!(source.trending_calls.load(Ordering::SeqCst), 3);
    let queries = source.search_queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].starts_with("created:>"));
    assert!(queries[0].ends_with(" language:rust"));
}

#[tokio::test]
async fn empty_search_after_failed_scrape_is_exhausted() {
    let source = FakeGitHub {
        search_results: Some(Vec::new()),
        ..FakeGitHub::default()
    };

    let error = pipeline(source, without_readme()).acquire().await.unwrap_err();

    match error {
        AcquisitionError::Exhausted { secondary, .. } => {
            assert!(matches!(*secondary, AcquisitionError::EmptyListing));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn both_paths_failing_is_exhausted() {
    let error = pipeline(FakeGitHub::default(), without_readme())
        .acquire()
        .await
        .unwrap_err();

    assert!(matches!(error, AcquisitionError::Exhausted { .. }));
    assert!(error.to_string().starts_with("All acquisition methods exhausted"));
}

#[tokio::test]
async fn unparsable_page_falls_back_without_retrying() {
    let source = Arc::new(FakeGitHub {
        trending_html: Some("<html><body>Rate limited</body></html>".to_string()),
        search_results: Some(vec![search_record("new/tool", 900)]),
        ..FakeGitHub::default()
    });
    let pipeline = shared_pipeline(&source, without_readme());

    let result = pipeline.acquire().await.unwrap();

    assert_eq!(result.source_tag, SourceTag::SecondaryApi);
    assert_eq!(source.trending_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn readme_tries_raw_files_in_order() {
    let source = Arc::new(FakeGitHub {
        trending_html: Some(fixture("trending.html")),
        structured_readmes: HashMap::from([(
            "sxyazi/yazi".to_string(),
            "# Yazi\nFast.".to_string(),
        )]),
        raw_files: HashMap::from([(
            "astral-sh/uv/readme.md".to_string(),
            "# uv\nPackages.".to_string(),
        )]),
        ..FakeGitHub::default()
    });
    let settings = AcquisitionSettings {
        max_repos: 2,
        ..AcquisitionSettings::default()
    };
    let pipeline = shared_pipeline(&source, settings);

    let result = pipeline.acquire().await.unwrap();

    assert_eq!(result.repositories[0].readme_excerpt(), "# Yazi\nFast.");
    assert_eq!(result.repositories[1].readme_excerpt(), "# uv\nPackages.");
    // yazi was served by the content endpoint, so only uv was requested raw
    let requests = source.raw_requests.lock().unwrap().clone();
    assert_eq!(requests, vec!["README.md", "readme.md"]);
}

#[tokio::test]
async fn missing_readme_leaves_excerpt_empty() {
    let source = Arc::new(FakeGitHub::trending());
    let settings = AcquisitionSettings {
        max_repos: 1,
        ..AcquisitionSettings::default()
    };
    let pipeline = shared_pipeline(&source, settings);

    let result = pipeline.acquire().await.unwrap();

    assert_eq!(result.repositories[0].readme_excerpt(), "");
    let requests = source.raw_requests.lock().unwrap().clone();
    assert_eq!(requests, vec!["README.md", "readme.md", "README", "readme.rst"]);
}

#[tokio::test]
async fn failed_content_endpoint_falls_back_to_raw_files() {
    let mut raw_files = HashMap::new();
    raw_files.insert("sxyazi/yazi/readme.md".to_string(), "# Yazi\nRaw.".to_string());
    let source = Arc::new(FakeGitHub {
        trending_html: Some(fixture("trending.html")),
        readme_failure: Some(403),
        raw_files,
        ..FakeGitHub::default()
    });
    let settings = AcquisitionSettings {
        max_repos: 1,
        ..AcquisitionSettings::default()
    };

    let result = shared_pipeline(&source, settings).acquire().await.unwrap();

    assert_eq!(result.repositories[0].readme_excerpt(), "# Yazi\nRaw.");
    // 403 is not worth retrying
    assert_eq!(source.readme_calls.load(Ordering::SeqCst), 1);
    let requests = source.raw_requests.lock().unwrap().clone();
    assert_eq!(requests, vec!["README.md", "readme.md"]);
}

#[tokio::test]
async fn readme_errors_never_fail_acquisition() {
    let source = Arc::new(FakeGitHub {
        trending_html: Some(fixture("trending.html")),
        readme_failure: Some(503),
        raw_failure: Some(503),
        ..FakeGitHub::default()
    });
    let settings = AcquisitionSettings {
        max_repos: 2,
        ..AcquisitionSettings::default()
    };

    let result = shared_pipeline(&source, settings).acquire().await.unwrap();

    assert_eq!(result.source_tag, SourceTag::PrimaryScrape);
    assert_eq!(result.repositories.len(), 2);
    assert!(result.repositories.iter().all(|r| r.readme_excerpt().is_empty()));
    // every candidate is requested once per repository
    assert_eq!(source.raw_requests.lock().unwrap().len(), 8);
}

#[tokio::test]
async fn transient_readme_error_is_retried_to_the_limit() {
    let source = Arc::new(FakeGitHub {
        trending_html: Some(fixture("trending.html")),
        readme_failure: Some(503),
        ..FakeGitHub::default()
    });
    let settings = AcquisitionSettings {
        max_repos: 1,
        ..AcquisitionSettings::default()
    };
    let readme_retry = RetryPolicy::immediate(3);
    let pipeline = AcquisitionPipeline::new(SharedSource(Arc::clone(&source)), settings)
        .with_retry_policy(RetryPolicy::immediate(3), readme_retry);

    let result = pipeline.acquire().await.unwrap();

    assert_eq!(result.repositories[0].readme_excerpt(), "");
    assert_eq!(
        source.readme_calls.load(Ordering::SeqCst),
        readme_retry.max_attempts() as usize
    );
}
