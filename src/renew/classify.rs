//! Outcome classification
//!
//! Pure decision logic for what a click actually did. The hub shows an error
//! toast for repeat attempts, so the repeat-attempt phrases are checked before
//! the success phrases; click completion alone never counts as success.

use crate::core::RenewStatus;

/// Phrases shown when the server was already renewed in the current window,
/// across the hub's supported languages
pub const ALREADY_RENEWED_PATTERNS: &[&str] = &[
    "already renewed",
    "can't renew",
    "only once",
    "이미",
    "한번",
    "불가능",
];

/// Phrases shown when time was actually added
pub const SUCCESS_PATTERNS: &[&str] = &["success", "성공", "added", "추가됨"];

/// Everything observed around a single click attempt
#[derive(Debug, Clone)]
pub struct ClickObservation {
    /// The control reported itself interactable before the click
    pub enabled: bool,
    /// Click or content capture raised
    pub click_failed: bool,
    /// Full page content before the click
    pub before: String,
    /// Full page content after the settle delay
    pub after: String,
}

/// Classify one click attempt into a definite status.
///
/// Priority order: disabled control, failed interaction, repeat-attempt
/// phrase, success phrase, bare content delta, no change.
pub fn classify(obs: &ClickObservation) -> RenewStatus {
    if !obs.enabled {
        return RenewStatus::ButtonDisabled;
    }

    if obs.click_failed {
        return RenewStatus::ClickError;
    }

    let after = obs.after.to_lowercase();

    if contains_any(&after, ALREADY_RENEWED_PATTERNS) {
        return RenewStatus::AlreadyRenewed;
    }

    if contains_any(&after, SUCCESS_PATTERNS) {
        return RenewStatus::Success;
    }

    if obs.before != obs.after {
        RenewStatus::UnknownChanged
    } else {
        RenewStatus::NoChange
    }
}

fn contains_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| haystack.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(before: &str, after: &str) -> ClickObservation {
        ClickObservation {
            enabled: true,
            click_failed: false,
            before: before.to_string(),
            after: after.to_string(),
        }
    }

    #[test]
    fn test_disabled_control() {
        let mut observation = obs("page", "page");
        observation.enabled = false;
        assert_eq!(classify(&observation), RenewStatus::ButtonDisabled);
    }

    #[test]
    fn test_click_failure() {
        let mut observation = obs("page", "page");
        observation.click_failed = true;
        assert_eq!(classify(&observation), RenewStatus::ClickError);
    }

    #[test]
    fn test_already_renewed_phrases() {
        assert_eq!(
            classify(&obs("page", "<div>Already renewed today</div>")),
            RenewStatus::AlreadyRenewed
        );
        assert_eq!(
            classify(&obs("page", "<div>이미 추가되었습니다</div>")),
            RenewStatus::AlreadyRenewed
        );
        assert_eq!(
            classify(&obs("page", "<div>불가능</div>")),
            RenewStatus::AlreadyRenewed
        );
    }

    #[test]
    fn test_success_phrases() {
        assert_eq!(
            classify(&obs("page", "<div>시간이 추가됨</div>")),
            RenewStatus::Success
        );
        assert_eq!(
            classify(&obs("page", "<div>Success!</div>")),
            RenewStatus::Success
        );
    }

    #[test]
    fn test_error_phrase_takes_priority_over_success() {
        // A page carrying both phrases is a repeat attempt, never a success
        let observation = obs("page", "<div>추가됨</div><div>이미 사용했습니다</div>");
        assert_eq!(classify(&observation), RenewStatus::AlreadyRenewed);
    }

    #[test]
    fn test_case_insensitive_matching() {
        assert_eq!(
            classify(&obs("page", "<div>ALREADY RENEWED</div>")),
            RenewStatus::AlreadyRenewed
        );
        assert_eq!(
            classify(&obs("page", "<div>Added 6 hours</div>")),
            RenewStatus::Success
        );
    }

    #[test]
    fn test_content_delta_without_phrases() {
        assert_eq!(
            classify(&obs("<p>before</p>", "<p>after</p>")),
            RenewStatus::UnknownChanged
        );
    }

    #[test]
    fn test_no_change() {
        assert_eq!(classify(&obs("<p>same</p>", "<p>same</p>")), RenewStatus::NoChange);
    }

    #[test]
    fn test_repeat_classification_is_stable() {
        // Rerunning against an already-renewed page must stay already_renewed
        let observation = obs("page", "<div>이미 사용했습니다</div>");
        assert_eq!(classify(&observation), RenewStatus::AlreadyRenewed);
        assert_eq!(classify(&observation), RenewStatus::AlreadyRenewed);
    }
}
