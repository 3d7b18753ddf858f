use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{ApiResult, AppState};
use crate::analysis::{self, AnalysisSummary};
use crate::export::{self, ExportFormat};
use crate::models::{
    Board, BoardKpi, BoardSummary, GlobalKpi, NewSolution, Solution, SurveyUpdate,
};
use crate::storage::Repository;

#[derive(Deserialize)]
pub struct CreateBoardRequest {
    name: String,
}

#[derive(Deserialize)]
pub struct CreateSolutionRequest {
    name: String,
    description: String,
    user_role: Option<String>,
}

#[derive(Deserialize)]
pub struct SurveyRequest {
    risk_level: String,
    details: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    message: String,
    #[serde(flatten)]
    summary: AnalysisSummary,
}

fn message(text: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": text }))
}

pub async fn list_boards(State(state): State<AppState>) -> ApiResult<Json<Vec<BoardSummary>>> {
    Ok(Json(state.storage.list_boards()?))
}

pub async fn create_board(
    State(state): State<AppState>,
    payload: Result<Json<CreateBoardRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    let Json(request) = payload?;
    let board = state.storage.create_board(&request.name)?;
    tracing::info!("Created board {} '{}'", board.id, board.name);
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.storage.delete_board(board_id)?;
    Ok(message("Board deleted"))
}

pub async fn list_solutions(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> ApiResult<Json<Vec<Solution>>> {
    state.storage.require_board(board_id)?;
    Ok(Json(state.storage.list_solutions(board_id)?))
}

pub async fn create_solution(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
    payload: Result<Json<CreateSolutionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Solution>)> {
    let Json(request) = payload?;
    let new_solution = NewSolution::new(
        &request.name,
        &request.description,
        request.user_role.as_deref(),
    )?;
    let solution = state.storage.create_solution(board_id, &new_solution)?;
    Ok((StatusCode::CREATED, Json(solution)))
}

pub async fn delete_solution(
    State(state): State<AppState>,
    Path(solution_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.storage.delete_solution(solution_id)?;
    Ok(message("Solution deleted"))
}

pub async fn update_survey(
    State(state): State<AppState>,
    Path(solution_id): Path<i64>,
    payload: Result<Json<SurveyRequest>, JsonRejection>,
) -> ApiResult<Json<Solution>> {
    let Json(request) = payload?;
    let update = SurveyUpdate::new(&request.risk_level, request.details)?;
    Ok(Json(state.storage.update_survey(solution_id, &update)?))
}

pub async fn analyze_board(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let summary = state.analyzer.analyze(board_id).await?;
    Ok(Json(AnalyzeResponse {
        message: summary.message(),
        summary,
    }))
}

pub async fn global_kpi(State(state): State<AppState>) -> ApiResult<Json<GlobalKpi>> {
    Ok(Json(analysis::global_kpi(&state.storage)?))
}

pub async fn board_kpi(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> ApiResult<Json<BoardKpi>> {
    Ok(Json(analysis::board_kpi(state.storage.as_ref(), board_id)?))
}

pub async fn export_board(
    State(state): State<AppState>,
    Path((board_id, format)): Path<(i64, String)>,
) -> ApiResult<Response> {
    let format: ExportFormat = format.parse()?;
    let board = state.storage.require_board(board_id)?;
    let solutions = state.storage.list_solutions(board_id)?;
    let body = export::render(format, &board, &solutions)?;

    let response = match format {
        ExportFormat::Csv => (
            [
                (header::CONTENT_TYPE, format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename={}",
                        export::export_filename(&board.name, format)
                    ),
                ),
            ],
            body,
        )
            .into_response(),
        ExportFormat::Json => (
            [(header::CONTENT_TYPE, format.content_type().to_string())],
            body,
        )
            .into_response(),
    };

    Ok(response)
}
