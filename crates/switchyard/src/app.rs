// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query dispatch shared by `ask` and `shell`.

use std::sync::Arc;

use switchyard_config::model::SwitchyardConfig;
use switchyard_core::{RouteTarget, SessionId, StaticToken, SwitchyardError, TokenSource};
use switchyard_genie::{GenieClient, GenieReply};
use switchyard_router::RoutingPolicy;
use switchyard_security::SecretRegistry;
use tracing::{debug, info};

/// What became of one routed query.
#[derive(Debug)]
pub enum Answer {
    /// Answered (or failed) by the Genie Space.
    Genie(GenieReply),
    /// Belongs to the general model, which is outside this process.
    Model { reason: String },
    /// Routed to Genie, but no Genie Space is configured.
    Unavailable { reason: String },
}

pub struct App {
    policy: RoutingPolicy,
    genie: Option<GenieClient>,
}

impl App {
    pub fn new(policy: RoutingPolicy, genie: Option<GenieClient>) -> Self {
        Self { policy, genie }
    }

    /// Builds the router and, when `genie.host` and `genie.space_id` are both
    /// set, the Genie client. A configured space without a token is an error.
    pub fn from_config(
        config: &SwitchyardConfig,
        secrets: SecretRegistry,
    ) -> Result<Self, SwitchyardError> {
        let policy = RoutingPolicy::new(config.routing.clone());
        let genie = match (&config.genie.host, &config.genie.space_id) {
            (Some(_), Some(_)) => {
                let tokens: Arc<dyn TokenSource> =
                    Arc::new(StaticToken::resolve(config.genie.token.as_deref())?);
                Some(GenieClient::from_config(&config.genie, tokens, secrets)?)
            }
            _ => {
                info!("genie.host or genie.space_id unset, Genie Space disabled");
                None
            }
        };
        Ok(Self::new(policy, genie))
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    pub fn genie(&self) -> Option<&GenieClient> {
        self.genie.as_ref()
    }

    /// Route `input` and, for Genie-bound queries, run it in `session`.
    pub async fn handle(&self, session: &SessionId, input: &str) -> Answer {
        let decision = self.policy.route(input);
        debug!(session = %session, target = %decision.target, reason = %decision.reason, "routed");
        match decision.target {
            RouteTarget::Model => Answer::Model {
                reason: decision.reason,
            },
            RouteTarget::Genie => match &self.genie {
                Some(client) => Answer::Genie(client.query_session(decision.query, session).await),
                None => Answer::Unavailable {
                    reason: "Genie Space is not configured: set genie.host and genie.space_id"
                        .to_string(),
                },
            },
        }
    }

    /// Forget the session's Genie conversation, if any.
    pub fn clear(&self, session: &SessionId) -> bool {
        self.genie
            .as_ref()
            .and_then(|client| client.clear_conversation(session))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use switchyard_genie::{HttpTransport, PollSettings};
    use switchyard_test_utils::{genie_status, genie_text, GenieMock};

    fn app_with(mock: &GenieMock) -> App {
        let transport = HttpTransport::new(
            mock.uri(),
            Arc::new(StaticToken::new("dapi-test")),
            Duration::from_secs(5),
            SecretRegistry::new(),
        )
        .unwrap();
        let settings = PollSettings {
            interval: Duration::from_millis(1),
            ..PollSettings::default()
        };
        let client = GenieClient::new(Arc::new(transport), mock.space_id(), settings);
        App::new(RoutingPolicy::default(), Some(client))
    }

    #[tokio::test]
    async fn data_query_goes_to_genie() {
        let mock = GenieMock::start("s1").await;
        mock.then_query_json(genie_text("There are 42 clients with a housing risk flag."))
            .await;

        let answer = app_with(&mock)
            .handle(&SessionId::from("s"), "how many clients have a housing risk flag")
            .await;
        match answer {
            Answer::Genie(reply) => {
                assert_eq!(reply.text, "There are 42 clients with a housing risk flag.")
            }
            other => panic!("expected Genie answer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn general_query_never_reaches_genie() {
        let mock = GenieMock::start("s1").await;
        let answer = app_with(&mock)
            .handle(&SessionId::from("s"), "explain how neural networks work")
            .await;
        assert!(matches!(answer, Answer::Model { .. }));
        assert!(mock.received_bodies().await.is_empty());
    }

    #[tokio::test]
    async fn override_prefix_is_stripped_before_sending() {
        let mock = GenieMock::start("s1").await;
        mock.then_query_json(genie_text("once upon a time")).await;

        let answer = app_with(&mock)
            .handle(&SessionId::from("s"), "/genie tell me a story")
            .await;
        assert!(matches!(answer, Answer::Genie(_)));
        let bodies = mock.received_bodies().await;
        assert_eq!(bodies[0]["params"]["arguments"]["query"], "tell me a story");
    }

    #[tokio::test]
    async fn clear_resets_tracked_conversation() {
        let mock = GenieMock::start("s1").await;
        mock.then_query_json(genie_status("COMPLETED", Some("conv-1"), None, Some(json!("ok"))))
            .await;
        let app = app_with(&mock);
        let session = SessionId::from("s");

        app.handle(&session, "how many clients").await;
        assert!(app.clear(&session));
        assert!(!app.clear(&session));
    }

    #[tokio::test]
    async fn unconfigured_genie_reports_unavailable() {
        let app = App::from_config(&SwitchyardConfig::default(), SecretRegistry::new()).unwrap();
        assert!(app.genie().is_none());
        let answer = app.handle(&SessionId::from("s"), "how many clients").await;
        assert!(matches!(answer, Answer::Unavailable { .. }));
    }

    #[test]
    fn configured_space_builds_client() {
        let mut config = SwitchyardConfig::default();
        config.genie.host = Some("adb-1.azuredatabricks.net".into());
        config.genie.space_id = Some("01ef".into());
        config.genie.token = Some("dapi-config".into());
        let app = App::from_config(&config, SecretRegistry::new()).unwrap();
        assert!(app.genie().is_some());
    }
}
