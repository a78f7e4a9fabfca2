//! Axum route handlers for the matching API.

use std::collections::BTreeSet;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extract::extract_resume_text;
use crate::history::store::NewRun;
use crate::matching::analysis::{run_analysis, AnalysisReport};
use crate::matching::ats::{ats_check, AtsResult};
use crate::matching::experience::{detect_experience, ExperienceResult};
use crate::matching::similarity::MatchResult;
use crate::matching::skills::suggest_skills;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_description: String,
    #[serde(default)]
    pub role_hint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestSkillsRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub role_hint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestSkillsResponse {
    pub suggested_skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeTextRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub role_hint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
///
/// Role names known to the job-description dataset or the skill catalog.
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    let roles: BTreeSet<&str> = state
        .dataset
        .roles()
        .into_iter()
        .chain(state.catalog.roles())
        .collect();
    Json(RolesResponse {
        roles: roles.into_iter().map(str::to_string).collect(),
    })
}

/// POST /api/v1/match
///
/// Scores one resume against one job description.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    require_resume(&request.resume_text)?;
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let scorer = state.match_scorer.clone();
    let role_hint = non_blank(request.role_hint);
    let result = blocking(move || {
        scorer.score(
            &request.resume_text,
            &request.job_description,
            role_hint.as_deref(),
        )
    })
    .await?;

    info!(match_percent = result.match_percent, "match scored");
    Ok(Json(result))
}

/// POST /api/v1/skills/suggest
pub async fn handle_suggest_skills(
    State(state): State<AppState>,
    Json(request): Json<SuggestSkillsRequest>,
) -> Result<Json<SuggestSkillsResponse>, AppError> {
    require_resume(&request.resume_text)?;

    let lexicon = state.lexicon.clone();
    let catalog = state.catalog.clone();
    let role_hint = non_blank(request.role_hint);
    let suggested_skills = blocking(move || {
        suggest_skills(
            &lexicon,
            &catalog,
            &request.resume_text,
            &request.job_description,
            role_hint.as_deref(),
        )
    })
    .await?;

    Ok(Json(SuggestSkillsResponse { suggested_skills }))
}

/// POST /api/v1/ats
pub async fn handle_ats(
    Json(request): Json<ResumeTextRequest>,
) -> Result<Json<AtsResult>, AppError> {
    require_resume(&request.resume_text)?;
    Ok(Json(ats_check(&request.resume_text)))
}

/// POST /api/v1/experience
pub async fn handle_experience(
    Json(request): Json<ResumeTextRequest>,
) -> Result<Json<ExperienceResult>, AppError> {
    require_resume(&request.resume_text)?;
    Ok(Json(detect_experience(&request.resume_text)))
}

/// POST /api/v1/analyze
///
/// Full report: averaged match over every job description for the request,
/// plus skill suggestions, ATS checks and experience level.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = analyze(
        &state,
        request.resume_text,
        request.job_description,
        request.role_hint,
        None,
    )
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/analyze/upload
///
/// Multipart form: a `resume` file part (.pdf, .docx or .txt) plus optional
/// `job_description` and `role_hint` text parts.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut upload = None;
    let mut job_description = None;
    let mut role_hint = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().map(str::to_string).ok_or_else(|| {
                    AppError::Validation("resume part has no file name".to_string())
                })?;
                let data = field.bytes().await?;
                upload = Some((file_name, data));
            }
            Some("job_description") => job_description = Some(field.text().await?),
            Some("role_hint") => role_hint = Some(field.text().await?),
            _ => {}
        }
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    info!(file_name = %file_name, bytes = data.len(), "resume uploaded");

    let source_name = file_name.clone();
    let resume_text = blocking(move || extract_resume_text(&source_name, &data)).await??;

    let report = analyze(
        &state,
        resume_text,
        job_description,
        role_hint,
        Some(file_name),
    )
    .await?;
    Ok(Json(report))
}

// ────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full analysis and records its summary in the run history.
async fn analyze(
    state: &AppState,
    resume_text: String,
    job_description: Option<String>,
    role_hint: Option<String>,
    file_name: Option<String>,
) -> Result<AnalysisReport, AppError> {
    require_resume(&resume_text)?;
    let role_hint = non_blank(role_hint);
    let descriptions = resolve_descriptions(state, non_blank(job_description), role_hint.as_deref())?;

    let scorer = state.match_scorer.clone();
    let lexicon = state.lexicon.clone();
    let catalog = state.catalog.clone();
    let report = blocking(move || {
        run_analysis(
            scorer.as_ref(),
            &lexicon,
            &catalog,
            &resume_text,
            &descriptions,
            role_hint.as_deref(),
        )
    })
    .await?;

    let run = state
        .history
        .save(NewRun::from_report(&report, file_name.as_deref()));
    info!(
        run_id = run.id,
        analysis_id = %report.analysis_id,
        jd_count = report.jd_count,
        match_percent = report.match_percent,
        ats_score = report.ats.score,
        "analysis complete"
    );
    Ok(report)
}

/// An explicit job description wins; otherwise every dataset description for the role.
fn resolve_descriptions(
    state: &AppState,
    job_description: Option<String>,
    role_hint: Option<&str>,
) -> Result<Vec<String>, AppError> {
    if let Some(description) = job_description {
        return Ok(vec![description]);
    }

    let role = role_hint.ok_or_else(|| {
        AppError::Validation("Provide job_description or role_hint".to_string())
    })?;

    let descriptions = state.dataset.descriptions_for(role);
    if descriptions.is_empty() {
        return Err(AppError::NotFound(format!(
            "No job descriptions found for role '{role}'"
        )));
    }
    Ok(descriptions)
}

fn require_resume(resume_text: &str) -> Result<(), AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Scoring is CPU-bound; keep it off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in scoring: {e}")))
}
