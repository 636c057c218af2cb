//! On-disk Capacitor project fixtures

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use cap_version::project::Project;

/// Temporary Capacitor project, removed on drop
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// A project whose package.json carries `version` and no native platforms
    pub fn new(version: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let project = Self { dir };
        project.write(
            "package.json",
            &format!(
                "{{\n  \"name\": \"test-app\",\n  \"version\": \"{}\"\n}}\n",
                version
            ),
        );
        project
    }

    pub fn with_android(self, application_id: &str, version_code: Option<u64>) -> Self {
        let mut gradle = format!(
            "android {{\n    defaultConfig {{\n        applicationId \"{}\"\n",
            application_id
        );
        if let Some(code) = version_code {
            gradle.push_str(&format!("        versionCode {}\n", code));
        }
        gradle.push_str("        versionName \"1.0\"\n    }\n}\n");
        self.write("android/app/build.gradle", &gradle);
        self
    }

    pub fn with_ios(self, bundle_id: &str, project_version: Option<u64>) -> Self {
        let pbxproj = match project_version {
            Some(version) => format!(
                "CURRENT_PROJECT_VERSION = {};\nMARKETING_VERSION = 1.0;\n",
                version
            ),
            None => "MARKETING_VERSION = 1.0;\n".to_string(),
        };
        self.write("ios/App/App.xcodeproj/project.pbxproj", &pbxproj);
        self.write(
            "capacitor.config.json",
            &format!("{{\"appId\": \"{}\", \"appName\": \"Test\"}}", bundle_id),
        );
        self
    }

    pub fn with_store_versions(self, json: &str) -> Self {
        self.write(".store-versions.json", json);
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn project(&self) -> Project {
        Project::new(self.dir.path())
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).unwrap()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}
