//! Version update E2E tests

mod helper;

use std::path::PathBuf;

use cap_version::project::Platform;
use cap_version::update::{
    self, PlatformSelection, RegexSubstitution, UpdateOptions, UpdateReport, VersionUpdate,
};
use cap_version::version::{BuildCode, BumpKind, VersionError};

use helper::TestProject;

fn write(project: &TestProject, update: VersionUpdate, options: UpdateOptions) -> UpdateReport {
    let plan = update::plan(&project.project(), update, &options);
    update::apply(project.path(), &plan, &RegexSubstitution).unwrap()
}

fn both_platforms(version: &str, build: u64) -> TestProject {
    TestProject::new(version)
        .with_android("es.example.tutor", Some(build))
        .with_ios("es.example.tutor", Some(build))
}

#[test]
fn explicit_update_rewrites_every_file() {
    let project = both_platforms("1.0.0", 1_000_000);

    let report = write(
        &project,
        VersionUpdate::explicit("1.4.2", None, None).unwrap(),
        UpdateOptions::default(),
    );

    assert_eq!(
        report.files_changed,
        vec![
            PathBuf::from("android/app/build.gradle"),
            PathBuf::from("ios/App/App.xcodeproj/project.pbxproj"),
            PathBuf::from("package.json"),
        ]
    );
    let app = project.project();
    assert_eq!(app.read_local_version().unwrap(), "1.4.2");
    assert_eq!(app.native_build(Platform::Android), Some(BuildCode(1_004_020)));
    assert_eq!(app.native_build(Platform::Ios), Some(BuildCode(1_004_020)));
    assert!(project.read("android/app/build.gradle").contains("versionName \"1.4.2\""));
    assert!(project
        .read("ios/App/App.xcodeproj/project.pbxproj")
        .contains("MARKETING_VERSION = 1.4.2;"));
}

#[test]
fn hotfix_above_nine_becomes_patch_update() {
    let project = both_platforms("1.2.3", 1_002_030);

    let report = write(
        &project,
        VersionUpdate::explicit("1.2.3", None, Some(23)).unwrap(),
        UpdateOptions::default(),
    );

    assert_eq!(report.version, "1.2.5");
    assert_eq!(report.build, BuildCode(1_002_053));
    assert_eq!(project.project().read_local_version().unwrap(), "1.2.5");
}

#[test]
fn platform_selection_leaves_other_platform_alone() {
    let project = both_platforms("1.0.0", 1_000_000);
    let pbxproj_before = project.read("ios/App/App.xcodeproj/project.pbxproj");

    let report = write(
        &project,
        VersionUpdate::bump("1.0.0", BumpKind::Patch).unwrap(),
        UpdateOptions {
            platform: PlatformSelection::Android,
            update_package: false,
        },
    );

    assert_eq!(
        report.files_changed,
        vec![PathBuf::from("android/app/build.gradle")]
    );
    assert_eq!(
        project.read("ios/App/App.xcodeproj/project.pbxproj"),
        pbxproj_before
    );
    assert_eq!(project.project().read_local_version().unwrap(), "1.0.0");
    assert_eq!(
        project.project().native_build(Platform::Android),
        Some(BuildCode(1_000_010))
    );
}

#[test]
fn successive_hotfixes_advance_from_native_build() {
    let project = both_platforms("2.0.0", 2_000_008);

    for expected in [2_000_009, 2_000_010] {
        let app = project.project();
        let current = app.read_local_version().unwrap();
        let current_build = app.current_build(&current).unwrap();
        let (update, _) = VersionUpdate::hotfix(&current, current_build).unwrap();

        write(&project, update, UpdateOptions::default());

        assert_eq!(
            project.project().native_build(Platform::Android),
            Some(BuildCode(expected))
        );
    }
    assert_eq!(project.project().read_local_version().unwrap(), "2.0.1");
}

#[test]
fn hotfix_after_explicit_build_past_nine_moves_to_next_patch() {
    let project = both_platforms("1.0.0", 1_000_000);
    write(
        &project,
        VersionUpdate::explicit("2.0.0", Some(2_000_015), None).unwrap(),
        UpdateOptions::default(),
    );

    let app = project.project();
    let current = app.read_local_version().unwrap();
    let current_build = app.current_build(&current).unwrap();
    let (update, step) = VersionUpdate::hotfix(&current, current_build).unwrap();
    let report = write(&project, update, UpdateOptions::default());

    assert!(step.version_changed);
    assert_eq!(report.version, "2.0.1");
    assert_eq!(report.build, BuildCode(2_000_010));
    assert_eq!(
        project.project().native_build(Platform::Ios),
        Some(BuildCode(2_000_010))
    );
}

#[test]
fn hotfix_rejects_build_from_another_version() {
    let project = both_platforms("2.0.0", 1_000_003);
    let app = project.project();
    let current_build = app.current_build("2.0.0").unwrap();

    let result = VersionUpdate::hotfix("2.0.0", current_build);

    assert!(matches!(
        result,
        Err(VersionError::BuildCodeMismatch { build: 1_000_003, .. })
    ));
}

#[test]
fn update_without_native_projects_only_touches_package_json() {
    let project = TestProject::new("0.3.0");

    let report = write(&project, VersionUpdate::reset().unwrap(), UpdateOptions::default());

    assert_eq!(report.files_changed, vec![PathBuf::from("package.json")]);
    assert_eq!(report.files_skipped.len(), 2);
    assert!(project.read("package.json").contains("\"version\": \"0.0.1\""));
    assert!(project.read("package.json").contains("\"name\": \"test-app\""));
}
