//! The fixed set of backend operations the client can issue.

use std::fmt;

use crate::consts::api_path;
use crate::transport::Method;

/// A named network action with a fixed method and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Humanize,
    Detect,
    GrammarCheck,
    PlagiarismCheck,
    Translate,
    ChatRespond,
    LoyaltySummary,
    Login,
    Register,
    VerifyEmail,
    ForgotPassword,
    ResetPassword,
    TwoFactor,
    MagicLink,
    History,
    Feedback,
}

impl Operation {
    pub const ALL: [Operation; 16] = [
        Operation::Humanize,
        Operation::Detect,
        Operation::GrammarCheck,
        Operation::PlagiarismCheck,
        Operation::Translate,
        Operation::ChatRespond,
        Operation::LoyaltySummary,
        Operation::Login,
        Operation::Register,
        Operation::VerifyEmail,
        Operation::ForgotPassword,
        Operation::ResetPassword,
        Operation::TwoFactor,
        Operation::MagicLink,
        Operation::History,
        Operation::Feedback,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Humanize => "humanize",
            Operation::Detect => "detect",
            Operation::GrammarCheck => "grammar-check",
            Operation::PlagiarismCheck => "plagiarism-check",
            Operation::Translate => "translate",
            Operation::ChatRespond => "chat-respond",
            Operation::LoyaltySummary => "loyalty-summary",
            Operation::Login => "login",
            Operation::Register => "register",
            Operation::VerifyEmail => "verify-email",
            Operation::ForgotPassword => "forgot-password",
            Operation::ResetPassword => "reset-password",
            Operation::TwoFactor => "two-factor",
            Operation::MagicLink => "magic-link",
            Operation::History => "history",
            Operation::Feedback => "feedback-submit",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::LoyaltySummary | Operation::History => Method::Get,
            _ => Method::Post,
        }
    }

    /// Path relative to [`API_BASE`](crate::consts::API_BASE).
    pub fn path(self) -> &'static str {
        match self {
            Operation::Humanize => "/humanize",
            Operation::Detect => "/detect",
            Operation::GrammarCheck => "/grammar/check",
            Operation::PlagiarismCheck => "/plagiarism/check",
            Operation::Translate => "/translate",
            Operation::ChatRespond => "/chat/respond",
            Operation::LoyaltySummary => "/loyalty/summary",
            Operation::Login => "/auth/login",
            Operation::Register => "/auth/register",
            Operation::VerifyEmail => "/auth/verify-email",
            Operation::ForgotPassword => "/auth/forgot-password",
            Operation::ResetPassword => "/auth/reset-password",
            Operation::TwoFactor => "/auth/2fa",
            Operation::MagicLink => "/auth/magic-link",
            Operation::History => "/history",
            Operation::Feedback => "/feedback",
        }
    }

    /// Full request path, prefix included.
    pub fn full_path(self) -> String {
        api_path(self.path())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn paths_are_unique() {
        let paths: HashSet<_> = Operation::ALL.iter().map(|op| op.path()).collect();
        assert_eq!(paths.len(), Operation::ALL.len());
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn only_reads_use_get() {
        let gets: Vec<_> = Operation::ALL
            .iter()
            .filter(|op| op.method() == Method::Get)
            .collect();
        assert_eq!(gets, vec![&Operation::LoyaltySummary, &Operation::History]);
    }

    #[test]
    fn full_path_carries_prefix() {
        assert_eq!(Operation::GrammarCheck.full_path(), "/api/v1/grammar/check");
        assert_eq!(Operation::TwoFactor.full_path(), "/api/v1/auth/2fa");
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Operation::Feedback.to_string(), "feedback-submit");
    }
}
