//! model_pull tool implementation.
//!
//! Starts downloading the configured local model in the background. The
//! download can take minutes, so the tool answers as soon as it is started.

use crumbwise_client::{Availability, LocalModel};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::Serialize;

use crate::tools::json_result;

/// Output from the model_pull tool.
#[derive(Debug, Clone, Serialize)]
pub struct ModelPullOutput {
    /// Configured model name.
    pub model: String,
    /// Availability observed before any download was started.
    pub availability: Availability,
    /// Whether this call started a download.
    pub started: bool,
}

/// Implementation of the model_pull tool.
pub async fn pull_impl(model: &LocalModel) -> Result<CallToolResult, McpError> {
    let availability = model.availability().await;
    let started = availability == Availability::Downloadable;

    if started {
        let model = model.clone();
        tokio::spawn(async move {
            if let Err(e) = model.pull().await {
                tracing::error!(model = model.model(), error = %e, "model pull failed");
            }
        });
    }

    json_result(&ModelPullOutput { model: model.model().to_string(), availability, started })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbwise_client::ModelConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::tools::result_json;

    fn model(base_url: String) -> LocalModel {
        LocalModel::new(ModelConfig { base_url, model: "gemma3:1b".into(), user_agent: "crumbwise-test".into() })
            .unwrap()
    }

    /// Answers a single request with `body`.
    async fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let reply = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_pull_unreachable_server() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let json = result_json(&pull_impl(&model(format!("http://{addr}"))).await.unwrap());
        assert_eq!(json["availability"], "unavailable");
        assert_eq!(json["started"], false);
    }

    #[tokio::test]
    async fn test_pull_skipped_when_available() {
        let base = serve_once(r#"{"models":[{"name":"gemma3:1b"}]}"#).await;

        let json = result_json(&pull_impl(&model(base)).await.unwrap());
        assert_eq!(json["model"], "gemma3:1b");
        assert_eq!(json["availability"], "available");
        assert_eq!(json["started"], false);
    }
}
