//! Status report
//!
//! Regenerates the status markdown in full on every run: a run timestamp in
//! UTC+8 and one localized line per outcome. Also home of the exit-code
//! predicate, which reads the same outcome list.

use std::fs;
use std::path::Path;

use chrono::{FixedOffset, Utc};
use tracing::info;

use crate::core::{FatalKind, Outcome, RenewStatus, Result};

/// Localized phrase for a per-server status
fn status_phrase(status: RenewStatus) -> &'static str {
    match status {
        RenewStatus::Success => "✅ 续期成功",
        RenewStatus::AlreadyRenewed => "⚠️ 已经续期过了",
        RenewStatus::NoButtonFound => "❌ 未找到续期按钮",
        RenewStatus::ButtonDisabled => "❌ 续期按钮不可点击",
        RenewStatus::LoginFailed => "❌ 登录失败",
        RenewStatus::ClickError => "💥 点击按钮出错",
        RenewStatus::UnknownChanged => "⚠️ 页面变化但结果未知",
        RenewStatus::NoChange => "⚠️ 页面无变化",
        RenewStatus::Error => "💥 运行出错",
    }
}

/// Localized phrase for a run-level sentinel
fn fatal_phrase(kind: FatalKind) -> &'static str {
    match kind {
        FatalKind::NoAuth => "❌ 无认证信息",
        FatalKind::NoServers => "❌ 无服务器配置",
        FatalKind::Timeout => "⏰ 操作超时",
        FatalKind::Runtime => "💥 运行时错误",
    }
}

/// Render the full report document
pub fn render(outcomes: &[Outcome]) -> String {
    let beijing = FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset");
    let timestamp = Utc::now().with_timezone(&beijing).format("%Y-%m-%d %H:%M:%S");

    let mut doc = format!(
        "# Weirdhost 自动续期\n\n**最后运行时间**: `{}` (北京时间)\n\n## 运行结果\n\n",
        timestamp
    );

    for outcome in outcomes {
        match outcome {
            Outcome::Server { id, status } => {
                doc.push_str(&format!("- 服务器 `{}`: {}\n", id, status_phrase(*status)));
            }
            Outcome::LoginFailed => {
                doc.push_str(&format!("- {}\n", status_phrase(RenewStatus::LoginFailed)));
            }
            Outcome::Fatal(kind) => {
                doc.push_str(&format!("- {}\n", fatal_phrase(*kind)));
            }
        }
    }

    doc
}

/// Write the report, replacing any previous run's file
pub fn write(path: &Path, outcomes: &[Outcome]) -> Result<()> {
    fs::write(path, render(outcomes))?;
    info!(path = %path.display(), "status report written");
    Ok(())
}

/// Exit-code predicate: the run failed if any outcome is a login failure or
/// an `error:` sentinel
pub fn run_failed(outcomes: &[Outcome]) -> bool {
    outcomes.iter().any(Outcome::is_failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_per_server_lines() {
        let outcomes = vec![
            Outcome::server("abc12345", RenewStatus::Success),
            Outcome::server("def67890", RenewStatus::AlreadyRenewed),
        ];

        let doc = render(&outcomes);
        assert!(doc.contains("- 服务器 `abc12345`: ✅ 续期成功"));
        assert!(doc.contains("- 服务器 `def67890`: ⚠️ 已经续期过了"));
        assert!(doc.contains("最后运行时间"));
    }

    #[test]
    fn test_render_sentinels_without_server_prefix() {
        let doc = render(&[Outcome::Fatal(FatalKind::NoServers)]);
        assert!(doc.contains("- ❌ 无服务器配置"));
        assert!(!doc.contains("服务器 `"));

        let doc = render(&[Outcome::LoginFailed, Outcome::LoginFailed]);
        assert_eq!(doc.matches("- ❌ 登录失败").count(), 2);
    }

    #[test]
    fn test_write_replaces_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");

        write(&path, &[Outcome::server("a", RenewStatus::Success)]).unwrap();
        write(&path, &[Outcome::server("b", RenewStatus::NoChange)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("`b`"));
        assert!(!content.contains("`a`"));
    }

    #[test]
    fn test_run_failed_predicate() {
        assert!(!run_failed(&[Outcome::server("a", RenewStatus::Success)]));
        assert!(!run_failed(&[Outcome::server("a", RenewStatus::NoButtonFound)]));
        assert!(run_failed(&[
            Outcome::server("a", RenewStatus::Success),
            Outcome::LoginFailed,
        ]));
        assert!(run_failed(&[Outcome::Fatal(FatalKind::Timeout)]));
    }
}
