//! Keyword-based requirement categorization.
//!
//! Six fixed categories, each owning a static keyword list. A
//! description is scored per category by counting how many of that
//! category's keywords occur as case-insensitive substrings (each
//! keyword counted at most once). The strictly highest score wins;
//! ties, including the all-zero case, resolve to the earliest category
//! in the fixed order, which makes `api_client` the default.

/// Requirement category, in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    ApiClient,
    Schema,
    Ui,
    Logging,
    Testing,
    Deployment,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::ApiClient,
        Category::Schema,
        Category::Ui,
        Category::Logging,
        Category::Testing,
        Category::Deployment,
    ];

    /// Static priority: lower number = processed first.
    pub fn priority(self) -> u8 {
        match self {
            Category::ApiClient => 1,
            Category::Schema => 2,
            Category::Ui => 3,
            Category::Logging => 4,
            Category::Testing => 5,
            Category::Deployment => 6,
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::ApiClient => &[
                "api", "endpoint", "client", "request", "response", "route", "http", "rest",
            ],
            Category::Schema => &[
                "schema",
                "model",
                "field",
                "migration",
                "column",
                "database",
                "table",
                "serialize",
            ],
            Category::Ui => &[
                "ui",
                "component",
                "render",
                "page",
                "view",
                "button",
                "form",
                "display",
            ],
            Category::Logging => &["log", "logging", "trace", "debug", "audit", "metric"],
            Category::Testing => &[
                "test", "coverage", "assert", "fixture", "regression", "integration",
            ],
            Category::Deployment => &[
                "deploy",
                "release",
                "rollout",
                "pipeline",
                "docker",
                "infrastructure",
                "publish",
            ],
        }
    }

    /// Inferred test descriptions; a fixed lookup per category, not
    /// derived from the requirement text.
    pub fn inferred_tests(self) -> &'static [&'static str] {
        match self {
            Category::ApiClient => &[
                "Exercise the client path against a stubbed server",
                "Cover error handling for failed requests",
            ],
            Category::Schema => &[
                "Validate the changed schema against existing fixtures",
                "Run the migration forward and backward",
            ],
            Category::Ui => &[
                "Render the affected views and assert visible state",
                "Exercise form interactions end to end",
            ],
            Category::Logging => &["Assert events are emitted at the expected level"],
            Category::Testing => &[
                "Extend the affected suites",
                "Check coverage on the changed paths",
            ],
            Category::Deployment => &["Run the release pipeline in dry-run mode"],
        }
    }

    /// Impacted-file hints; same fixed lookup.
    pub fn inferred_files(self) -> &'static [&'static str] {
        match self {
            Category::ApiClient => &["src/api/", "src/client/"],
            Category::Schema => &["src/models/", "migrations/"],
            Category::Ui => &["src/ui/", "src/components/"],
            Category::Logging => &["src/logging/"],
            Category::Testing => &["tests/"],
            Category::Deployment => &["deploy/", ".github/workflows/"],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::ApiClient => write!(f, "api_client"),
            Category::Schema => write!(f, "schema"),
            Category::Ui => write!(f, "ui"),
            Category::Logging => write!(f, "logging"),
            Category::Testing => write!(f, "testing"),
            Category::Deployment => write!(f, "deployment"),
        }
    }
}

/// Pick the category whose keyword list best matches the description.
pub fn categorize(description: &str) -> Category {
    let haystack = description.to_lowercase();
    let mut best = Category::ApiClient;
    let mut best_score = 0usize;

    for category in Category::ALL {
        let score = category
            .keywords()
            .iter()
            .filter(|keyword| haystack.contains(**keyword))
            .count();
        if score > best_score {
            best = category;
            best_score = score;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keywords_defaults_to_api_client() {
        assert_eq!(categorize("improve onboarding docs"), Category::ApiClient);
        assert_eq!(categorize(""), Category::ApiClient);
    }

    #[test]
    fn test_single_keyword_wins() {
        assert_eq!(categorize("add a new route"), Category::ApiClient);
        assert_eq!(categorize("add a migration for the users table"), Category::Schema);
        assert_eq!(categorize("emit an audit event"), Category::Logging);
        assert_eq!(categorize("publish a new release"), Category::Deployment);
    }

    #[test]
    fn test_strictly_highest_score_wins() {
        // Two schema keywords beat one api keyword.
        assert_eq!(
            categorize("change the request field in the users table"),
            Category::Schema
        );
    }

    #[test]
    fn test_tie_resolves_to_earliest_category() {
        // "display" scores ui, "log" scores logging; ui comes first.
        assert_eq!(categorize("display the log"), Category::Ui);
    }

    #[test]
    fn test_keyword_counted_once_per_category() {
        // "api api api" is still a single-keyword score; one schema
        // keyword plus one more schema keyword outranks it.
        assert_eq!(
            categorize("api api api schema model"),
            Category::Schema
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(categorize("ADD A NEW ROUTE"), Category::ApiClient);
    }

    #[test]
    fn test_priority_mapping_is_static() {
        let expected = [1u8, 2, 3, 4, 5, 6];
        for (category, want) in Category::ALL.iter().zip(expected) {
            assert_eq!(category.priority(), want);
        }
    }
}
