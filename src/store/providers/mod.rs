//! Store version providers, one per fallback tier

pub mod app_store;
pub mod fallback;
pub mod google_play;
pub mod manual;

pub use app_store::AppStoreLookupProvider;
pub use fallback::{DefaultPolicy, DefaultPolicyProvider};
pub use google_play::{Credentials, GooglePlayProvider};
pub use manual::{ManualOverrideProvider, read_store_versions_file};
