mod common;

use common::{projects_page, FakeGitlab, BASE};
use gitlab_tally_core::config::GitlabConfig;
use gitlab_tally_core::error::{FetchError, HttpError};
use gitlab_tally_core::http::MockHttpClient;
use gitlab_tally_core::projects::list_projects;
use serde_json::json;

fn gitlab() -> GitlabConfig {
    GitlabConfig::new(BASE, "test-token")
}

fn eq(actual: &str, expected: &str) -> bool {
    actual == expected
}

fn page_of(range: std::ops::Range<u64>) -> Vec<u8> {
    let projects: Vec<_> = range
        .map(|id| json!({"id": id, "name": format!("svc-{id}"), "path_with_namespace": format!("team/svc-{id}")}))
        .collect();
    json!(projects).to_string().into_bytes()
}

#[tokio::test]
async fn stops_at_first_empty_page_and_never_requests_beyond_it() {
    let mut client = MockHttpClient::new();
    client
        .expect_request()
        .withf(|method, url, headers| {
            eq(method, "GET")
                && eq(url, &projects_page(1))
                && headers
                    .iter()
                    .any(|(k, v)| k == "Authorization" && v == "Bearer test-token")
        })
        .times(1)
        .returning(|_, _, _| Ok(page_of(1..101)));
    client
        .expect_request()
        .withf(|_, url, _| eq(url, &projects_page(2)))
        .times(1)
        .returning(|_, _, _| Ok(page_of(101..131)));
    client
        .expect_request()
        .withf(|_, url, _| eq(url, &projects_page(3)))
        .times(1)
        .returning(|_, _, _| Ok(b"[]".to_vec()));
    client
        .expect_request()
        .withf(|_, url, _| eq(url, &projects_page(4)))
        .never();

    let projects = list_projects(&client, &gitlab(), "")
        .await
        .expect("enumeration should succeed");

    assert_eq!(projects.len(), 130);
    let ids: Vec<u64> = projects.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..131).collect::<Vec<_>>(), "listing order is preserved");
}

#[tokio::test]
async fn keeps_only_projects_whose_name_and_path_match() {
    let mut fake = FakeGitlab::new();
    fake.projects(&[
        (1, "billing-api", "payments/billing-api"),
        (2, "frontend", "web/frontend"),
        (3, "ledger", "payments/ledger"),
    ]);

    let projects = list_projects(&fake, &gitlab(), "payments/")
        .await
        .expect("enumeration should succeed");

    let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["billing-api", "ledger"]);
}

#[tokio::test]
async fn invalid_pattern_yields_empty_set_without_aborting() {
    let mut fake = FakeGitlab::new();
    fake.projects(&[(1, "api", "team/api"), (2, "web", "team/web")]);

    let projects = list_projects(&fake, &gitlab(), "([unterminated")
        .await
        .expect("an invalid pattern must not abort enumeration");

    assert!(projects.is_empty());
    assert_eq!(
        fake.requests(),
        vec![projects_page(1), projects_page(2)],
        "every page is still walked"
    );
}

#[tokio::test]
async fn page_failure_aborts_with_no_partial_result() {
    let mut fake = FakeGitlab::new();
    fake.route(projects_page(1), String::from_utf8(page_of(1..101)).unwrap());
    fake.fail(projects_page(2), 500);

    let err = list_projects(&fake, &gitlab(), "")
        .await
        .expect_err("a failed page must abort enumeration");

    match err {
        FetchError::PageFetch { page, source, .. } => {
            assert_eq!(page, 2);
            assert!(matches!(source, HttpError::UnexpectedStatus { status: 500, .. }));
        }
        other => panic!("expected PageFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_page_is_a_parse_error() {
    let mut fake = FakeGitlab::new();
    fake.route(projects_page(1), "<html>Sign in</html>");

    let err = list_projects(&fake, &gitlab(), "").await.unwrap_err();
    assert!(matches!(err, FetchError::Parse { what: "projects", .. }), "got {err:?}");
}
