//! Store comparison E2E tests

mod helper;

use std::collections::HashMap;
use std::sync::Arc;

use mockito::Server;

use cap_version::project::Platform;
use cap_version::store::providers::{
    AppStoreLookupProvider, Credentials, DefaultPolicy, DefaultPolicyProvider, GooglePlayProvider,
    ManualOverrideProvider,
};
use cap_version::store::{
    ComparisonEvent, ComparisonResult, ProviderChain, ProviderTier, StoreComparator, StoreVersion,
    TracingObserver,
};

use helper::{RecordingObserver, StubProvider, StubResponse, TestProject, chain};

fn comparator(project: &TestProject, chains: Vec<(Platform, ProviderChain)>) -> StoreComparator {
    StoreComparator::build(
        project.project(),
        chains.into_iter().collect(),
        Arc::new(TracingObserver),
    )
}

#[tokio::test]
async fn manual_override_wins_over_authenticated_api() {
    let project = TestProject::new("3.1.0")
        .with_android("es.example.tutor", None)
        .with_store_versions(
            r#"{"storeVersions": {"android": {"version": "3.0.9", "build": 100}}}"#,
        );
    let api = StubProvider::new(
        ProviderTier::Authenticated,
        "api",
        StubResponse::Version(StoreVersion::new("9.9.9", "9009090")),
    );

    let comparator = comparator(
        &project,
        vec![(
            Platform::Android,
            chain(vec![
                Arc::new(ManualOverrideProvider::new(project.path())),
                api.clone(),
            ]),
        )],
    );
    let result = comparator.compare_with_stores().await.unwrap();
    let android = result.android.as_ref().unwrap();

    assert_eq!(api.calls(), 0);
    assert!(android.is_newer);
    assert_eq!(android.source, Some(ProviderTier::Manual));
    assert_eq!(android.store_version.as_deref(), Some("3.0.9"));
    assert_eq!(android.store_build.as_deref(), Some("100"));
    assert!(result.can_publish);
}

#[tokio::test]
async fn authenticated_failure_falls_through_to_public_tier() {
    let mut server = Server::new_async().await;
    let edits = server
        .mock(
            "POST",
            "/androidpublisher/v3/applications/es.example.tutor/edits",
        )
        .with_status(401)
        .create_async()
        .await;

    let project = TestProject::new("1.0.0").with_android("es.example.tutor", None);
    let comparator = comparator(
        &project,
        vec![(
            Platform::Android,
            chain(vec![
                Arc::new(GooglePlayProvider::new(
                    &server.url(),
                    Credentials::Present {
                        access_token: "expired".to_string(),
                    },
                )),
                StubProvider::new(
                    ProviderTier::Public,
                    "public",
                    StubResponse::Version(StoreVersion::unpublished()),
                ),
            ]),
        )],
    );

    let result = comparator.compare_with_stores().await.unwrap();
    let android = result.android.as_ref().unwrap();

    edits.assert_async().await;
    assert!(android.is_newer);
    assert_eq!(android.source, Some(ProviderTier::Public));
    assert!(result.can_publish);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Android Google Play API failed"));
}

#[tokio::test]
async fn ios_lookup_blocks_publish_when_store_is_ahead() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/lookup?bundleId=es.example.tutor")
        .with_status(200)
        .with_body(r#"{"resultCount": 1, "results": [{"version": "1.1.0"}]}"#)
        .create_async()
        .await;

    let project = TestProject::new("1.0.0").with_ios("es.example.tutor", None);
    let comparator = comparator(
        &project,
        vec![(
            Platform::Ios,
            chain(vec![Arc::new(AppStoreLookupProvider::new(&server.url(), None))]),
        )],
    );

    let result = comparator.compare_with_stores().await.unwrap();
    let ios = result.ios.as_ref().unwrap();

    assert!(!ios.is_newer);
    assert_eq!(ios.store_version.as_deref(), Some("1.1.0"));
    assert!(!result.can_publish);
    assert_eq!(
        result.errors,
        vec!["iOS version 1.0.0 (1000000) is not newer than store version 1.1.0 (1.1.0)".to_string()]
    );
}

#[tokio::test]
async fn compares_both_platforms_independently() {
    let project = TestProject::new("2.0.0")
        .with_android("es.example.tutor", Some(2_000_000))
        .with_ios("es.example.tutor", Some(2_000_000));
    let comparator = comparator(
        &project,
        vec![
            (
                Platform::Android,
                chain(vec![StubProvider::new(
                    ProviderTier::Authenticated,
                    "api",
                    StubResponse::Version(StoreVersion::new("2.0.0", "2000000")),
                )]),
            ),
            (
                Platform::Ios,
                chain(vec![StubProvider::new(
                    ProviderTier::Public,
                    "lookup",
                    StubResponse::Version(StoreVersion::new("1.9.0", "1.9.0")),
                )]),
            ),
        ],
    );

    let result = comparator.compare_with_stores().await.unwrap();

    assert!(!result.platform(Platform::Android).unwrap().is_newer);
    assert!(result.platform(Platform::Ios).unwrap().is_newer);
    assert!(!result.can_publish);
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn repeated_comparisons_agree_except_for_timestamp() {
    let project = TestProject::new("1.2.0")
        .with_android("es.example.tutor", None)
        .with_store_versions(
            r#"{"storeVersions": {"android": {"version": "1.1.9", "build": "1001099"}}}"#,
        );
    let comparator = comparator(
        &project,
        vec![(
            Platform::Android,
            chain(vec![Arc::new(ManualOverrideProvider::new(project.path()))]),
        )],
    );

    let first = comparator.compare_with_stores().await.unwrap();
    let second = comparator.compare_with_stores().await.unwrap();

    let strip = |result: ComparisonResult| ComparisonResult {
        checked_at: chrono::DateTime::<chrono::Utc>::default(),
        ..result
    };
    assert_eq!(strip(first), strip(second));
}

#[tokio::test]
async fn project_without_native_platforms_can_publish() {
    let project = TestProject::new("1.0.0");
    let observer = Arc::new(RecordingObserver::default());
    let comparator = StoreComparator::build(project.project(), HashMap::new(), observer.clone());

    let result = comparator.compare_with_stores().await.unwrap();

    assert!(result.can_publish);
    assert!(result.android.is_none());
    assert!(result.ios.is_none());
    assert!(result.warnings.is_empty());
    assert!(result.errors.is_empty());

    let mut skipped: Vec<Platform> = observer
        .events()
        .into_iter()
        .filter_map(|event| match event {
            ComparisonEvent::PlatformSkipped { platform } => Some(platform),
            _ => None,
        })
        .collect();
    skipped.sort_by_key(|platform| platform.as_str());
    assert_eq!(skipped, vec![Platform::Android, Platform::Ios]);
}

#[tokio::test]
async fn strict_policy_blocks_when_no_source_answers() {
    let project = TestProject::new("1.0.0").with_android("es.example.tutor", None);
    let comparator = comparator(
        &project,
        vec![(
            Platform::Android,
            chain(vec![
                Arc::new(ManualOverrideProvider::new(project.path())),
                Arc::new(GooglePlayProvider::new(
                    "http://127.0.0.1:9",
                    Credentials::Absent,
                )),
                Arc::new(DefaultPolicyProvider::new(DefaultPolicy::Refuse)),
            ]),
        )],
    );

    let result = comparator.compare_with_stores().await.unwrap();
    let android = result.android.as_ref().unwrap();

    assert!(!result.can_publish);
    assert!(!android.is_newer);
    assert_eq!(android.source, None);
    let error = android.error.as_deref().unwrap();
    assert!(error.starts_with("No store version source succeeded"));
    assert_eq!(
        result.warnings,
        vec![format!("Could not fetch Android store version: {}", error)]
    );
}

#[tokio::test]
async fn lenient_policy_assumes_unpublished_app() {
    let project = TestProject::new("0.0.1").with_ios("es.example.tutor", None);
    let comparator = comparator(
        &project,
        vec![(
            Platform::Ios,
            chain(vec![
                StubProvider::new(
                    ProviderTier::Public,
                    "lookup",
                    StubResponse::Fail("connection reset".to_string()),
                ),
                Arc::new(DefaultPolicyProvider::new(DefaultPolicy::default())),
            ]),
        )],
    );

    let result = comparator.compare_with_stores().await.unwrap();
    let ios = result.ios.as_ref().unwrap();

    assert!(ios.is_newer);
    assert_eq!(ios.source, Some(ProviderTier::Default));
    assert_eq!(ios.store_version.as_deref(), Some("0.0.0"));
    assert_eq!(result.warnings.len(), 1);
    assert!(result.can_publish);
}

#[tokio::test]
async fn result_serializes_with_camel_case_fields() {
    let project = TestProject::new("1.0.0").with_android("es.example.tutor", None);
    let comparator = comparator(
        &project,
        vec![(
            Platform::Android,
            chain(vec![StubProvider::new(
                ProviderTier::Manual,
                "manual",
                StubResponse::Version(StoreVersion::new("0.9.0", "900000")),
            )]),
        )],
    );

    let result = comparator.compare_with_stores().await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["canPublish"], true);
    assert_eq!(json["localBuild"], "1000000");
    assert_eq!(json["android"]["storeVersion"], "0.9.0");
    assert_eq!(json["android"]["source"], "manual");
    assert!(json.get("ios").is_none());
    assert!(json["checkedAt"].is_string());
}
