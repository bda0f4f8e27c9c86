use serde::Deserialize;
use tabled::{Table, Tabled};

use crate::cli::api_client::ApiClient;
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_position, truncate_with_ellipsis};
use crate::db::UseCase;

#[derive(Debug, Deserialize)]
struct UseCasesResponse {
    title: String,
    use_cases: Vec<UseCase>,
}

#[derive(Tabled)]
pub(crate) struct UseCaseDisplay {
    #[tabled(rename = "UUID")]
    pub(crate) uuid: String,
    #[tabled(rename = "Pos")]
    pub(crate) position: String,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[tabled(rename = "Instruction")]
    pub(crate) instruction: String,
}

impl From<&UseCase> for UseCaseDisplay {
    fn from(use_case: &UseCase) -> Self {
        Self {
            uuid: use_case.uuid.clone(),
            position: format_position(use_case.position),
            title: truncate_with_ellipsis(&use_case.title, 30),
            // Instructions are often multi-line
            instruction: truncate_with_ellipsis(&use_case.instruction.replace('\n', " "), 50),
        }
    }
}

/// List the use cases of one theme in display order
pub async fn list_use_cases(
    api_client: &ApiClient,
    theme_uuid: &str,
    format: &str,
) -> CliResult<String> {
    let response = api_client
        .get(&format!("/v1/prompts/themes/{}/use-cases", theme_uuid))
        .send()
        .await?;
    let body: UseCasesResponse = ApiClient::handle_response(response).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&body.use_cases)?),
        _ => Ok(format_table(&body.title, &body.use_cases)),
    }
}

pub(crate) fn format_table(theme_title: &str, use_cases: &[UseCase]) -> String {
    if use_cases.is_empty() {
        return format!("No use cases found in theme '{}'.", theme_title);
    }

    let rows: Vec<UseCaseDisplay> = use_cases.iter().map(|u| u.into()).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    format!("{}\n{}", theme_title, table)
}
