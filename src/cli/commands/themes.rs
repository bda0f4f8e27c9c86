use serde::Deserialize;
use tabled::{Table, Tabled};

use crate::cli::api_client::ApiClient;
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_position, truncate_with_ellipsis};
use crate::db::Theme;

#[derive(Debug, Deserialize)]
struct ThemesResponse {
    themes: Vec<Theme>,
}

#[derive(Tabled)]
pub(crate) struct ThemeDisplay {
    #[tabled(rename = "UUID")]
    pub(crate) uuid: String,
    #[tabled(rename = "Pos")]
    pub(crate) position: String,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[tabled(rename = "Subtitle")]
    pub(crate) subtitle: String,
}

impl From<&Theme> for ThemeDisplay {
    fn from(theme: &Theme) -> Self {
        Self {
            uuid: theme.uuid.clone(),
            position: format_position(theme.position),
            title: truncate_with_ellipsis(&theme.title, 40),
            subtitle: truncate_with_ellipsis(&theme.subtitle, 40),
        }
    }
}

/// List themes in display order
pub async fn list_themes(api_client: &ApiClient, format: &str) -> CliResult<String> {
    let response = api_client.get("/v1/prompts/themes").send().await?;
    let body: ThemesResponse = ApiClient::handle_response(response).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&body.themes)?),
        _ => Ok(format_table(&body.themes)),
    }
}

pub(crate) fn format_table(themes: &[Theme]) -> String {
    if themes.is_empty() {
        return "No themes found.".to_string();
    }

    let rows: Vec<ThemeDisplay> = themes.iter().map(|t| t.into()).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    table.to_string()
}
