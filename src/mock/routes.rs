//! The intercepted routes and what each one answers with.

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde_json::{Value, json};
use std::collections::HashMap;

use super::fixtures::{self, FixtureSource};
use crate::error::FixtureError;
use crate::operation::Operation;
use crate::transport::Method;

pub type HandlerFuture<'a> = BoxFuture<'a, Result<Value, FixtureError>>;

/// Produces the JSON body for one route.
pub type Handler = for<'a> fn(&'a dyn FixtureSource) -> HandlerFuture<'a>;

/// Every operation the responder answers. Operations absent here bypass.
const ROUTES: &[(Operation, Handler)] = &[
    (Operation::Humanize, humanize),
    (Operation::Detect, detect),
    (Operation::GrammarCheck, grammar),
    (Operation::PlagiarismCheck, plagiarism),
    (Operation::Translate, translate),
    (Operation::ChatRespond, chat),
    (Operation::LoyaltySummary, loyalty_summary),
    (Operation::Login, login),
    (Operation::Register, register),
    (Operation::VerifyEmail, verify_email),
    (Operation::ForgotPassword, forgot_password),
    (Operation::ResetPassword, reset_password),
    (Operation::TwoFactor, two_factor),
    (Operation::MagicLink, magic_link),
    (Operation::History, history),
];

/// Lookup from (method, full path) to handler.
pub struct RouteTable {
    routes: HashMap<(Method, String), Handler>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    pub fn new() -> Self {
        let routes = ROUTES
            .iter()
            .map(|(op, handler)| ((op.method(), op.full_path()), *handler))
            .collect();
        Self { routes }
    }

    pub fn lookup(&self, method: Method, path: &str) -> Option<Handler> {
        self.routes.get(&(method, path.to_string())).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn literal(value: Value) -> HandlerFuture<'static> {
    future::ready(Ok(value)).boxed()
}

fn message(text: &str) -> HandlerFuture<'static> {
    literal(json!({ "message": text }))
}

fn humanize(source: &dyn FixtureSource) -> HandlerFuture<'_> {
    source.load(fixtures::HUMANIZE)
}

fn detect(source: &dyn FixtureSource) -> HandlerFuture<'_> {
    source.load(fixtures::AI_CHECKER)
}

fn grammar(source: &dyn FixtureSource) -> HandlerFuture<'_> {
    source.load(fixtures::GRAMMAR)
}

fn plagiarism(source: &dyn FixtureSource) -> HandlerFuture<'_> {
    source.load(fixtures::PLAGIARISM)
}

fn translate(source: &dyn FixtureSource) -> HandlerFuture<'_> {
    source.load(fixtures::TRANSLATION)
}

fn chat(source: &dyn FixtureSource) -> HandlerFuture<'_> {
    async move {
        let messages = source.load(fixtures::CHAT).await?;
        Ok(json!({ "messages": messages }))
    }
    .boxed()
}

fn loyalty_summary(_: &dyn FixtureSource) -> HandlerFuture<'_> {
    literal(json!({
        "currentPoints": 3420,
        "nextTier": "Elite",
        "threshold": 5000,
        "referrals": 6,
        "bonus": 320,
    }))
}

fn login(_: &dyn FixtureSource) -> HandlerFuture<'_> {
    literal(json!({ "message": "Login successful", "token": "mock-token" }))
}

fn register(_: &dyn FixtureSource) -> HandlerFuture<'_> {
    message("Registration successful")
}

fn verify_email(_: &dyn FixtureSource) -> HandlerFuture<'_> {
    message("Email verified")
}

fn forgot_password(_: &dyn FixtureSource) -> HandlerFuture<'_> {
    message("Password reset link sent")
}

fn reset_password(_: &dyn FixtureSource) -> HandlerFuture<'_> {
    message("Password reset successful")
}

fn two_factor(_: &dyn FixtureSource) -> HandlerFuture<'_> {
    message("2FA enabled")
}

fn magic_link(_: &dyn FixtureSource) -> HandlerFuture<'_> {
    message("Magic link sent")
}

fn history(_: &dyn FixtureSource) -> HandlerFuture<'_> {
    literal(json!([
        { "id": "1", "tool": "Humanize", "date": "2023-01-10", "status": "completed" },
        { "id": "2", "tool": "Detect Text", "date": "2023-01-09", "status": "completed" },
        { "id": "3", "tool": "Grammar", "date": "2023-01-08", "status": "completed" },
        { "id": "4", "tool": "Translator", "date": "2023-01-07", "status": "completed" },
    ]))
}
