use anyhow::Context;
use lsp_types::{
    ClientCapabilities, InitializeParams, TextDocumentClientCapabilities,
    WorkspaceClientCapabilities, WorkspaceFolder,
};
use serde::Serialize;

use crate::lsp::types::{Notification, Request};

pub struct MessageFactory {
    id: i32,
}

impl MessageFactory {
    pub fn new() -> Self {
        MessageFactory { id: 0 }
    }

    pub fn get_id(&mut self) -> i32 {
        self.id += 1;
        self.id
    }

    pub fn create_request<T: Serialize>(
        &mut self,
        method: &str,
        params: T,
    ) -> anyhow::Result<Request> {
        Ok(Request::new(
            self.get_id(),
            method.to_string(),
            serde_json::to_value(params)?,
        ))
    }

    pub fn create_notification<T: Serialize>(
        &mut self,
        method: &str,
        params: T,
    ) -> anyhow::Result<Notification> {
        Ok(Notification::new(
            method.to_string(),
            serde_json::to_value(params)?,
        ))
    }
}

impl Default for MessageFactory {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MessageCreator {
    message_factory: MessageFactory,
}

impl MessageCreator {
    pub fn new() -> MessageCreator {
        MessageCreator {
            message_factory: MessageFactory::new(),
        }
    }

    pub fn initialize(&mut self, workspace: &str) -> anyhow::Result<Request> {
        let uri = workspace_uri(workspace)?;
        let name = uri
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("workspace")
            .to_string();

        let initialize_params = InitializeParams {
            process_id: Some(std::process::id()),
            workspace_folders: Some(vec![WorkspaceFolder { uri, name }]),
            capabilities: ClientCapabilities {
                workspace: Some(WorkspaceClientCapabilities {
                    workspace_folders: Some(true),
                    ..Default::default()
                }),
                text_document: Some(TextDocumentClientCapabilities {
                    publish_diagnostics: Some(Default::default()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        self.message_factory
            .create_request("initialize", initialize_params)
    }

    pub fn initialized_notification(&mut self) -> anyhow::Result<Notification> {
        self.message_factory
            .create_notification("initialized", serde_json::json!({}))
    }

    pub fn shutdown(&mut self) -> anyhow::Result<Request> {
        self.message_factory
            .create_request("shutdown", serde_json::Value::Null)
    }

    pub fn exit_notification(&mut self) -> anyhow::Result<Notification> {
        self.message_factory
            .create_notification("exit", serde_json::Value::Null)
    }
}

impl Default for MessageCreator {
    fn default() -> Self {
        Self::new()
    }
}

fn workspace_uri(workspace: &str) -> anyhow::Result<lsp_types::Url> {
    match lsp_types::Url::from_file_path(workspace) {
        Ok(uri) => Ok(uri),
        Err(()) => lsp_types::Url::parse(workspace)
            .with_context(|| format!("workspace {workspace:?} is neither an absolute path nor a url")),
    }
}
