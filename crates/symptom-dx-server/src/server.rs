//! Server lifecycle: bind, spawn the axum task, hand back a shutdown handle.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

/// Handle to a running server.
pub struct DiagnosisServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl DiagnosisServer {
    /// Stop accepting connections; in-flight requests are allowed to finish.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Shutdown signal sent");
        }
    }

    /// Wait for the server task to exit.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {e}");
        }
    }
}

/// Bind `addr` and serve the API in a background task.
///
/// Port 0 picks an ephemeral port; the bound address is in the handle.
pub async fn start_server(ctx: ApiContext, addr: SocketAddr) -> std::io::Result<DiagnosisServer> {
    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = api_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        tracing::info!(%addr, "Listening");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(DiagnosisServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use symptom_dx_core::{
        DiagnosisService, OverrideRules, PredictionError, ReferenceTables,
        SymptomClassifier, SymptomSet,
    };
    use symptom_dx_extract::KeywordExtractor;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use super::*;

    struct Constant;

    impl SymptomClassifier for Constant {
        fn predict(&self, _symptoms: &SymptomSet) -> Result<String, PredictionError> {
            Ok("Migraine".into())
        }
    }

    fn test_ctx() -> ApiContext {
        let service = DiagnosisService::new(
            Arc::new(Constant),
            ReferenceTables::default(),
            OverrideRules::none(),
        );
        ApiContext::new(Arc::new(service), KeywordExtractor::default())
    }

    async fn raw_request(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_and_shuts_down() {
        let mut server = start_server(test_ctx(), "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        assert_ne!(server.addr.port(), 0);

        let body = r#"{"symptoms": ["anything"]}"#;
        let response = raw_request(
            server.addr,
            &format!(
                "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            ),
        )
        .await;

        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.contains(r#""disease":"Migraine""#));
        assert!(response.contains(r#""precautions":"Not available""#));

        let addr = server.addr;
        server.shutdown();
        server.wait().await;
        assert!(TcpStream::connect(addr).await.is_err());
    }
}
