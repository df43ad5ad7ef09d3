//! Templated operations built on top of [`ModelClient::send`].

use crate::config::{get_task_prompt, TaskKind};

use super::client::{GenerationRequest, ModelClient, Outcome};

impl ModelClient {
    /// Build the request for a task from the configured language and limits.
    pub fn build_task_request(&self, kind: TaskKind, input: &str) -> GenerationRequest {
        let prompt = get_task_prompt(kind, &self.config().lang);
        GenerationRequest::new(prompt.render(input), self.config().max_tokens)
            .with_system(prompt.system)
            .with_temperature(kind.temperature())
    }

    /// Run a templated task.
    pub async fn run_task(&self, kind: TaskKind, input: &str) -> Outcome {
        tracing::info!(task = kind.as_str(), "Running model task");
        let request = self.build_task_request(kind, input);
        self.send(&request).await
    }

    /// Analyze collected trend data.
    pub async fn analyze_trends(&self, raw_data: &str) -> Outcome {
        self.run_task(TaskKind::TrendAnalysis, raw_data).await
    }

    /// Rewrite a user's text into several variants.
    pub async fn rewrite_copy(&self, text: &str) -> Outcome {
        self.run_task(TaskKind::CopyRewrite, text).await
    }

    /// Analyze a competitor profile summary.
    pub async fn analyze_competitor(&self, profile: &str) -> Outcome {
        self.run_task(TaskKind::CompetitorAnalysis, profile).await
    }

    /// Generate the daily newsletter.
    pub async fn generate_daily_content(&self) -> Outcome {
        self.run_task(TaskKind::DailyContent, "").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelConfig, RetryPolicy};
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_model() -> (MockServer, ModelClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"content": [{"text": "ok"}]})),
            )
            .mount(&server)
            .await;
        let config = ModelConfig::default()
            .with_api_url(server.uri())
            .with_lang("en")
            .with_retry(RetryPolicy::default().with_backoff_unit(Duration::from_millis(1)));
        (server, ModelClient::new(config))
    }

    async fn sent_bodies(server: &MockServer) -> Vec<serde_json::Value> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    #[test]
    fn test_build_task_request() {
        let client = ModelClient::new(ModelConfig::default().with_lang("en").with_max_tokens(900));
        let request = client.build_task_request(TaskKind::CopyRewrite, "Fresh render of a cabin");

        assert!(request.prompt().contains("Fresh render of a cabin"));
        assert_eq!(
            request.system(),
            Some(get_task_prompt(TaskKind::CopyRewrite, "en").system)
        );
        assert_eq!(request.temperature(), 0.7);
        assert_eq!(request.max_tokens(), 900);
    }

    #[test]
    fn test_daily_content_temperature() {
        let client = ModelClient::new(ModelConfig::default());
        let request = client.build_task_request(TaskKind::DailyContent, "");
        assert_eq!(request.temperature(), 0.8);
    }

    #[tokio::test]
    async fn test_copy_rewrite_never_sends_other_directives() {
        let (server, client) = mock_model().await;
        let outcome = client.rewrite_copy("Check out my new sci-fi corridor").await;
        assert_eq!(outcome, Ok("ok".to_string()));

        let bodies = sent_bodies(&server).await;
        assert_eq!(bodies.len(), 1);
        let system = bodies[0]["system"].as_str().unwrap();
        assert_eq!(system, get_task_prompt(TaskKind::CopyRewrite, "en").system);
        for other in [
            TaskKind::TrendAnalysis,
            TaskKind::CompetitorAnalysis,
            TaskKind::DailyContent,
        ] {
            assert_ne!(system, get_task_prompt(other, "en").system);
        }
    }

    #[tokio::test]
    async fn test_each_task_sends_its_own_directive() {
        let (server, client) = mock_model().await;
        client.analyze_trends("1. Blender 4.2").await.unwrap();
        client.rewrite_copy("some text to polish").await.unwrap();
        client.analyze_competitor("profile blob").await.unwrap();
        client.generate_daily_content().await.unwrap();

        let bodies = sent_bodies(&server).await;
        assert_eq!(bodies.len(), 4);
        for (body, kind) in bodies.iter().zip(TaskKind::ALL) {
            let prompt = get_task_prompt(kind, "en");
            assert_eq!(body["system"], prompt.system);
            assert_eq!(body["messages"][0]["role"], "user");
        }
        let temp = bodies[3]["temperature"].as_f64().unwrap();
        assert!((temp - 0.8).abs() < 1e-6);
    }
}
