use serde::{Deserialize, Serialize};

use crate::contract::{CommittedDto, EngineSnapshot, HostCommand, HostResponse, ResultDto};
use crate::engine::SearchEngine;
use crate::navigation::UrlResolver;
use crate::selection::SelectionEvent;

pub const MAX_QUERY_CHARS: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: HostResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request(
    engine: &mut SearchEngine,
    resolver: &UrlResolver,
    request: HostCommand,
) -> TransportResponse {
    match dispatch(engine, resolver, request) {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => TransportResponse::Err { error },
    }
}

pub fn handle_json(engine: &mut SearchEngine, resolver: &UrlResolver, payload: &str) -> String {
    let response = match serde_json::from_str::<HostCommand>(payload) {
        Ok(request) => handle_request(engine, resolver, request),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|error| {
        format!(
            r#"{{"status":"err","error":{{"code":"invalid_request","message":"encode failed: {}"}}}}"#,
            error.to_string().replace('"', "'")
        )
    })
}

fn dispatch(
    engine: &mut SearchEngine,
    resolver: &UrlResolver,
    request: HostCommand,
) -> Result<HostResponse, ErrorResponse> {
    match request {
        HostCommand::UpdateQuery(update) => {
            if update.text.chars().count() > MAX_QUERY_CHARS {
                return Err(ErrorResponse {
                    code: ErrorCode::InvalidRequest,
                    message: format!("query longer than {MAX_QUERY_CHARS} characters"),
                });
            }
            engine.update_query(&update.text);
        }
        HostCommand::ClearSearch => engine.clear_search(),
        HostCommand::NavigateUp => {
            engine.navigate_up();
        }
        HostCommand::NavigateDown => {
            engine.navigate_down();
        }
        HostCommand::Commit => {
            let locale = engine.locale();
            if let Some(committed) = engine.commit() {
                return Ok(HostResponse::Committed(CommittedDto {
                    result: ResultDto::from_result(&committed, resolver, locale),
                    snapshot: EngineSnapshot::capture(engine, resolver),
                }));
            }
        }
        HostCommand::Cancel => {
            if engine.cancel() == SelectionEvent::Closed {
                return Ok(HostResponse::Closed(EngineSnapshot::capture(engine, resolver)));
            }
        }
        HostCommand::Submit => {
            engine.submit();
        }
        HostCommand::Tick => {
            engine.tick();
        }
        HostCommand::SetLocale(request) => engine.set_locale(request.locale),
        HostCommand::RemoveRecent(request) => {
            if request.query.trim().is_empty() {
                return Err(ErrorResponse {
                    code: ErrorCode::InvalidRequest,
                    message: "query is required".to_string(),
                });
            }
            engine.remove_recent(&request.query);
        }
        HostCommand::Snapshot => {}
    }

    Ok(HostResponse::Snapshot(EngineSnapshot::capture(engine, resolver)))
}
