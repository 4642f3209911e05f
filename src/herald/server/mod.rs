// SPDX-License-Identifier: MIT

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::base::error::{HeraldError, TaskError};
use crate::herald::condition::{evaluate_document, ConditionValue, Document};
use crate::herald::config::Settings;
use crate::herald::messengers::MessengerRegistry;
use crate::herald::scheduler::Scheduler;
use crate::herald::tasks::{
    run_command, AddTaskCommand, ModifyTaskCommand, RemoveTaskCommand, TaskSpec,
};
use crate::herald::weather::WeatherClient;

/// Shared handles every request works against
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Scheduler,
    pub messengers: MessengerRegistry,
    pub weather: WeatherClient,
}

impl AppState {
    pub async fn from_settings(settings: &Settings) -> Result<Self, HeraldError> {
        Ok(Self {
            scheduler: Scheduler::new(),
            messengers: MessengerRegistry::from_settings(settings).await,
            weather: WeatherClient::new(settings)?,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/add-task", post(add_task))
        .route("/modify-task/{task_id}", put(modify_task))
        .route("/remove-task/{task_id}", delete(remove_task))
        .with_state(state)
}

pub async fn serve(settings: Settings) -> Result<(), HeraldError> {
    let state = AppState::from_settings(&settings).await?;
    let messengers = state.messengers.names().await;
    if messengers.is_empty() {
        log::warn!("No messenger tokens configured, every add-task request will be rejected");
    } else {
        log::info!("Messengers available: {}", messengers.join(", "));
    }
    let scheduler = state.scheduler.clone();

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], settings.port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    log::info!("Shutting down scheduler");
    scheduler.shutdown().await;
    Ok(())
}

/// Error body: `{"success": false, "error": {"type": ..., "message": ...}}`
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl From<HeraldError> for ApiError {
    fn from(err: HeraldError) -> Self {
        let status = match &err {
            HeraldError::Condition(_) => StatusCode::BAD_REQUEST,
            HeraldError::Task(TaskError::NotFound(_)) => StatusCode::NOT_FOUND,
            HeraldError::Task(TaskError::Conflict(_)) => StatusCode::CONFLICT,
            HeraldError::Task(_) => StatusCode::BAD_REQUEST,
            HeraldError::Api { .. } | HeraldError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        HeraldError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "InvalidJsonError",
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": {
                "type": self.kind,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "This is application for managing tasks"
    }))
}

#[derive(Debug, Deserialize)]
struct AddTaskRequest {
    receiver: Option<Value>,
    city: Option<Value>,
    messenger: Option<Value>,
    units: Option<Value>,
    interval: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    condition: Option<ConditionValue>,
}

/// `None` only when the field is absent; an explicit `null` decodes to a scalar
fn present<'de, D>(deserializer: D) -> Result<Option<ConditionValue>, D::Error>
where
    D: Deserializer<'de>,
{
    ConditionValue::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct ModifyTaskRequest {
    interval: Option<Value>,
}

async fn add_task(
    State(state): State<AppState>,
    payload: Result<Json<AddTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = payload?;
    let (spec, condition) = validate_add_task(request)?;

    if let Some(document) = condition {
        if !evaluate_document(&document).map_err(HeraldError::from)? {
            log::info!("Condition not met, task for {} not added", spec.city);
            return Ok((
                StatusCode::OK,
                Json(json!({"success": true, "message": "Task not added"})),
            ));
        }
    }

    let command = AddTaskCommand::new(state.scheduler, state.messengers, state.weather, spec);
    let task_id = run_command(&command).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "task_id": task_id})),
    ))
}

async fn modify_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    payload: Result<Json<ModifyTaskRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let interval = positive_interval(request.interval)?;

    run_command(&ModifyTaskCommand::new(state.scheduler, task_id, interval)).await?;
    Ok(Json(json!({"success": true})))
}

async fn remove_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    run_command(&RemoveTaskCommand::new(state.scheduler, task_id)).await?;
    Ok(Json(json!({"success": true})))
}

fn validate_add_task(request: AddTaskRequest) -> Result<(TaskSpec, Option<Document>), TaskError> {
    let receiver = match required("receiver", request.receiver)? {
        Value::String(s) => s,
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        _ => return Err(TaskError::invalid("receiver", "must be string or integer")),
    };
    let city = required_string("city", request.city)?;
    let messenger = required_string("messenger", request.messenger)?;
    let units = required_string("units", request.units)?;
    let interval = positive_interval(request.interval)?;

    let condition = match request.condition {
        None => None,
        Some(ConditionValue::Map(document)) => {
            if document.len() != 1 {
                return Err(TaskError::invalid(
                    "condition",
                    "must contain only one root operator",
                ));
            }
            Some(document)
        }
        Some(_) => return Err(TaskError::invalid("condition", "must be dictionary")),
    };

    let spec = TaskSpec {
        receiver,
        city,
        messenger,
        units,
        interval,
    };
    Ok((spec, condition))
}

fn required(field: &'static str, value: Option<Value>) -> Result<Value, TaskError> {
    value.ok_or(TaskError::MissingField(field))
}

fn required_string(field: &'static str, value: Option<Value>) -> Result<String, TaskError> {
    match required(field, value)? {
        Value::String(s) => Ok(s),
        _ => Err(TaskError::invalid(field, "must be string")),
    }
}

fn positive_interval(value: Option<Value>) -> Result<u64, TaskError> {
    let interval = required("interval", value)?;
    let number = match &interval {
        Value::Number(n) if n.is_i64() || n.is_u64() => n,
        _ => return Err(TaskError::invalid("interval", "must be integer")),
    };
    match number.as_u64() {
        Some(secs) if secs > 0 => Ok(secs),
        _ => Err(TaskError::invalid("interval", "must be positive integer")),
    }
}
