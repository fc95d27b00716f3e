use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_target() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_handoff_dir() -> PathBuf {
    PathBuf::from("handoffs")
}

pub fn default_outgoing_dir() -> PathBuf {
    PathBuf::from("handoffs/outgoing")
}

pub fn default_plans_dir() -> PathBuf {
    PathBuf::from("plans")
}

pub fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

pub fn default_state_file() -> PathBuf {
    PathBuf::from(".handoff-state.json")
}

pub fn default_include() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

pub fn default_timeout_sec() -> u64 {
    300
}
