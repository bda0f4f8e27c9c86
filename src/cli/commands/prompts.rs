use std::path::Path;

use serde::Deserialize;

use crate::cli::api_client::ApiClient;
use crate::cli::error::{CliError, CliResult};
use crate::db::{EntityCounts, PrebuiltPrompt, SyncSummary};

#[derive(Debug, Deserialize)]
struct PromptsResponse {
    prompts: Vec<PrebuiltPrompt>,
}

/// Download the whole catalogue.
///
/// Writes a pretty-printed JSON array to `output` when given, otherwise
/// returns it for printing.
pub async fn pull(api_client: &ApiClient, output: Option<&Path>) -> CliResult<String> {
    let response = api_client.get("/v1/prompts/bulk").send().await?;
    let body: PromptsResponse = ApiClient::handle_response(response).await?;
    let json = serde_json::to_string_pretty(&body.prompts)?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n")).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(format!(
                "✓ Wrote {} prompts to {}",
                body.prompts.len(),
                path.display()
            ))
        }
        None => Ok(json),
    }
}

/// Read prompt rows from a file.
pub(crate) fn read_prompt_file(path: &Path) -> CliResult<Vec<PrebuiltPrompt>> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|e| CliError::InvalidFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn format_counts(label: &str, counts: &EntityCounts) -> String {
    format!(
        "{label}: {} created, {} revived, {} updated, {} deleted",
        counts.created, counts.revived, counts.updated, counts.deleted
    )
}

/// Replace the catalogue with the rows in `file`.
pub async fn push(api_client: &ApiClient, file: &Path) -> CliResult<String> {
    let prompts = read_prompt_file(file)?;

    let response = api_client
        .post("/v1/prompts/bulk")
        .json(&prompts)
        .send()
        .await?;
    let summary: SyncSummary = ApiClient::handle_response(response).await?;

    Ok(format!(
        "✓ Uploaded {} prompts\n{}\n{}",
        prompts.len(),
        format_counts("Themes", &summary.themes),
        format_counts("Use cases", &summary.use_cases)
    ))
}
