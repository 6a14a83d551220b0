//! Renders batch summaries.
//!
//! Each stack renders as a tip followed by indented members using
//! box-drawing connectors:
//!
//! ```text
//! <tip>
//!     ├─ <child-1>
//!     …
//!     └─ <child-k>
//! ```
//!
//! Members are ordered by ascending distance from the tip, an order
//! already applied by the engine before a `LoggedStack` is built.

use crate::engine::executor::{LoggedStack, ResultLog};
use crate::ui::output;

/// Render a `LoggedStack` (tip + flat, distance-ordered member list) as a
/// tip followed by its members.
fn render_logged_stack(stack: &LoggedStack) -> String {
    let mut lines = vec![stack.tip.as_str().to_string()];
    let count = stack.members.len();
    for (i, member) in stack.members.iter().enumerate() {
        let connector = if i + 1 == count { "└─" } else { "├─" };
        lines.push(format!("    {connector} {}", member));
    }
    lines.join("\n")
}

/// Print a full batch summary: one section per non-empty `ResultLog` bucket.
pub fn render_result_log(log: &ResultLog) {
    if !log.updated.is_empty() {
        output::success_bold("Updated");
        for stack in &log.updated {
            println!("{}", render_logged_stack(stack));
        }
        output::blank();
    }

    if !log.skipped.is_empty() {
        output::info("Skipped (already merged)");
        for stack in &log.skipped {
            println!("{}", render_logged_stack(stack));
        }
        output::blank();
    }

    if !log.failed.is_empty() {
        output::error("Manual intervention required");
        for stack in &log.failed {
            println!("{}", render_logged_stack(stack));
        }
        output::blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::types::BranchName;

    #[test]
    fn test_render_single_member_uses_corner_connector() {
        let stack = LoggedStack {
            tip: BranchName::new("f/a"),
            members: vec![BranchName::new("f/b")],
        };
        assert_eq!(render_logged_stack(&stack), "f/a\n    └─ f/b");
    }

    #[test]
    fn test_render_multiple_members_uses_tee_then_corner() {
        let stack = LoggedStack {
            tip: BranchName::new("f/a"),
            members: vec![BranchName::new("f/b"), BranchName::new("f/c")],
        };
        assert_eq!(render_logged_stack(&stack), "f/a\n    ├─ f/b\n    └─ f/c");
    }

    #[test]
    fn test_render_no_members_is_just_the_tip() {
        let stack = LoggedStack {
            tip: BranchName::new("f/a"),
            members: vec![],
        };
        assert_eq!(render_logged_stack(&stack), "f/a");
    }
}
