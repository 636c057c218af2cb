//! Native project readers
//!
//! Pulls identifiers and build numbers out of the files Capacitor generates:
//! - `android/app/build.gradle`: `applicationId` / `namespace`, `versionCode`
//! - `ios/App/App.xcodeproj/project.pbxproj`: `CURRENT_PROJECT_VERSION`
//! - `capacitor.config.ts` / `capacitor.config.json`: `appId`
//!
//! Both Groovy (`applicationId "x"`) and Kotlin DSL (`applicationId = "x"`)
//! assignment styles are accepted.

use regex::Regex;

/// Reader for native project metadata
pub struct NativeReader {
    /// `applicationId "id"` or `applicationId = "id"`
    application_id_re: Regex,
    /// `namespace "id"` or `namespace = "id"`
    namespace_re: Regex,
    /// `versionCode 1002030` or `versionCode = 1002030`
    version_code_re: Regex,
    /// `CURRENT_PROJECT_VERSION = 1002030;`
    project_version_re: Regex,
    /// `appId: 'id'` inside capacitor.config.ts
    capacitor_app_id_re: Regex,
}

impl NativeReader {
    pub fn new() -> Self {
        Self {
            application_id_re: Regex::new(r#"applicationId\s*=?\s*["']([^"']+)["']"#).unwrap(),
            namespace_re: Regex::new(r#"namespace\s*=?\s*["']([^"']+)["']"#).unwrap(),
            version_code_re: Regex::new(r"versionCode\s*=?\s*(\d+)").unwrap(),
            project_version_re: Regex::new(r"CURRENT_PROJECT_VERSION\s*=\s*(\d+)\s*;").unwrap(),
            capacitor_app_id_re: Regex::new(r#"appId\s*:\s*['"]([^'"]+)['"]"#).unwrap(),
        }
    }

    /// Android application id; `applicationId` wins over `namespace`
    pub fn application_id(&self, build_gradle: &str) -> Option<String> {
        [&self.application_id_re, &self.namespace_re]
            .into_iter()
            .find_map(|re| re.captures(build_gradle))
            .map(|caps| caps[1].to_string())
    }

    pub fn version_code(&self, build_gradle: &str) -> Option<u64> {
        self.version_code_re
            .captures(build_gradle)
            .and_then(|caps| caps[1].parse().ok())
    }

    pub fn project_version(&self, pbxproj: &str) -> Option<u64> {
        self.project_version_re
            .captures(pbxproj)
            .and_then(|caps| caps[1].parse().ok())
    }

    pub fn capacitor_ts_app_id(&self, config: &str) -> Option<String> {
        self.capacitor_app_id_re
            .captures(config)
            .map(|caps| caps[1].to_string())
    }

    pub fn capacitor_json_app_id(&self, config: &str) -> Option<String> {
        serde_json::from_str::<serde_json::Value>(config)
            .ok()?
            .get("appId")?
            .as_str()
            .map(str::to_string)
    }
}

impl Default for NativeReader {
    fn default() -> Self {
        Self::new()
    }
}
