//! Request/response messages between a host and the translator.
//!
//! Messages are JSON objects tagged by `type`. [`serve_lines`] speaks them as
//! newline-delimited JSON, one response line per request line.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::ExportOptions;
use crate::error::{Result, TokvarError};
use crate::export::{collections_info, export_all, CollectionsInfo, ExportResult};
use crate::import::{import_document, ImportReport};
use crate::store::VariableStore;

/// A request from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    /// Import a token document as a new collection. `body` is the document
    /// text, or the document itself.
    #[serde(rename_all = "camelCase")]
    Import { file_name: String, body: Value },

    Export {
        #[serde(default)]
        options: ExportOptions,
    },

    GetCollectionsInfo,
}

/// A reply to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    ImportResult(ImportReport),
    ExportResult(ExportResult),
    #[serde(rename_all = "camelCase")]
    CollectionsInfo { collections_info: CollectionsInfo },
    Error { message: String },
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<TokvarError> for Response {
    fn from(err: TokvarError) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }
}

/// Handles requests against a store, one at a time.
pub struct MessageHandler<S> {
    store: S,
}

impl<S: VariableStore> MessageHandler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Process one request. Failures become [`Response::Error`].
    pub async fn handle(&mut self, request: Request) -> Response {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "request failed");
                err.into()
            }
        }
    }

    async fn dispatch(&mut self, request: Request) -> Result<Response> {
        match request {
            Request::Import { file_name, body } => {
                let source = match body {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                let report = import_document(&self.store, &file_name, &source).await?;
                Ok(Response::ImportResult(report))
            }
            Request::Export { options } => Ok(Response::ExportResult(export_all(&self.store, &options).await?)),
            Request::GetCollectionsInfo => Ok(Response::CollectionsInfo {
                collections_info: collections_info(&self.store).await?,
            }),
        }
    }

    /// Decode one JSON line and process it.
    pub async fn handle_line(&mut self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => Response::Error {
                message: format!("Invalid request: {}", e),
            },
        }
    }
}

/// Read newline-delimited requests until EOF, writing one response line per
/// non-blank request line. Returns the number of requests handled.
pub async fn serve_lines<S, R, W>(handler: &mut MessageHandler<S>, reader: R, mut writer: W) -> Result<usize>
where
    S: VariableStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handler.handle_line(&line).await;
        let mut encoded = serde_json::to_string(&response).map_err(|e| TokvarError::parse(e.to_string()))?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request: Request = serde_json::from_value(json!({
            "type": "IMPORT",
            "fileName": "core",
            "body": "{}"
        }))
        .unwrap();
        assert_eq!(
            request,
            Request::Import {
                file_name: "core".into(),
                body: json!("{}")
            }
        );

        let request: Request = serde_json::from_value(json!({ "type": "EXPORT" })).unwrap();
        assert_eq!(
            request,
            Request::Export {
                options: ExportOptions::default()
            }
        );

        let request: Request = serde_json::from_value(json!({ "type": "GET_COLLECTIONS_INFO" })).unwrap();
        assert_eq!(request, Request::GetCollectionsInfo);
    }

    #[tokio::test]
    async fn test_import_then_export() {
        let mut handler = MessageHandler::new(MemoryStore::new());

        let response = handler
            .handle(Request::Import {
                file_name: "core".into(),
                body: json!({ "$type": "color", "red": { "$value": "#f00" } }),
            })
            .await;
        let Response::ImportResult(report) = response else {
            panic!("unexpected response: {:?}", response);
        };
        assert_eq!(report.created, 1);

        let response = handler
            .handle(Request::Export {
                options: ExportOptions::default(),
            })
            .await;
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["type"], "EXPORT_RESULT");
        assert_eq!(wire["files"][0]["body"], json!({ "red": "#ff0000" }));
        assert_eq!(wire["collectionsInfo"]["core"]["isPrimitive"], false);
    }

    #[tokio::test]
    async fn test_failure_becomes_error_response() {
        let mut handler = MessageHandler::new(MemoryStore::new());
        let response = handler
            .handle(Request::Import {
                file_name: "bad".into(),
                body: json!("not json"),
            })
            .await;
        assert!(response.is_error());

        let response = handler.handle_line("{\"type\":\"NOPE\"}").await;
        assert!(response.is_error());
    }

    #[tokio::test]
    async fn test_serve_lines() {
        let mut handler = MessageHandler::new(MemoryStore::new());
        let input = concat!(
            "{\"type\":\"IMPORT\",\"fileName\":\"space\",\"body\":\"{\\\"$type\\\":\\\"number\\\",\\\"md\\\":{\\\"$value\\\":8}}\"}\n",
            "\n",
            "{\"type\":\"GET_COLLECTIONS_INFO\"}\n",
        );
        let mut output = Vec::new();

        let handled = serve_lines(&mut handler, input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(handled, 2);

        let text = String::from_utf8(output).unwrap();
        let responses: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(responses[0]["type"], "IMPORT_RESULT");
        assert_eq!(responses[0]["created"], 1);
        assert_eq!(responses[1]["type"], "COLLECTIONS_INFO");
        assert!(responses[1]["collectionsInfo"]["space"].is_object());
    }
}
