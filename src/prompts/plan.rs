//! Validation and grouping of a bulk submission into a [`SyncPlan`].

use std::collections::HashMap;

use tracing::warn;

use super::config::DuplicatePolicy;
use super::error::{SyncError, SyncResult};
use crate::db::{PlannedTheme, PlannedUseCase, PrebuiltPrompt, SyncPlan, ThemeKey, UseCaseKey};

fn validate_row(index: usize, row: &PrebuiltPrompt) -> SyncResult<()> {
    let required = [
        ("theme_title", &row.theme_title),
        ("theme_subtitle", &row.theme_subtitle),
        ("use_case_title", &row.use_case_title),
        ("use_case_instruction", &row.use_case_instruction),
    ];
    match required.iter().find(|(_, value)| value.trim().is_empty()) {
        Some(&(field, _)) => Err(SyncError::Validation { index, field }),
        None => Ok(()),
    }
}

/// Resolve a repeated identity whose position disagrees with an earlier row.
fn resolve_duplicate(
    policy: DuplicatePolicy,
    what: &str,
    earlier: Option<i64>,
    later: Option<i64>,
) -> SyncResult<Option<i64>> {
    match policy {
        DuplicatePolicy::LastWins => {
            warn!(
                duplicate = what,
                ?earlier,
                ?later,
                "Duplicate identity in submission, keeping last position"
            );
            Ok(later)
        }
        DuplicatePolicy::Reject => Err(SyncError::Conflict {
            message: format!("{what} has positions {earlier:?} and {later:?}"),
        }),
    }
}

/// Validate every row, then group rows into themes.
///
/// Themes keep their first-occurrence order and use-cases keep row order
/// within their theme. A repeated identity keeps its first slot; its
/// position follows `policy` when the occurrences disagree. Rows that repeat
/// an identity with the same position are merged silently.
pub fn build_plan(rows: &[PrebuiltPrompt], policy: DuplicatePolicy) -> SyncResult<SyncPlan> {
    for (index, row) in rows.iter().enumerate() {
        validate_row(index, row)?;
    }

    let mut themes: Vec<PlannedTheme> = Vec::new();
    let mut theme_slots: HashMap<ThemeKey, usize> = HashMap::new();
    let mut use_case_slots: Vec<HashMap<UseCaseKey, usize>> = Vec::new();

    for row in rows {
        let theme_key = row.theme_key();
        let slot = match theme_slots.get(&theme_key) {
            Some(&slot) => {
                let theme = &mut themes[slot];
                if theme.position != row.theme_position {
                    theme.position = resolve_duplicate(
                        policy,
                        &format!("theme {theme_key}"),
                        theme.position,
                        row.theme_position,
                    )?;
                }
                slot
            }
            None => {
                let slot = themes.len();
                themes.push(PlannedTheme {
                    key: theme_key.clone(),
                    position: row.theme_position,
                    sequence: slot as i64,
                    use_cases: Vec::new(),
                });
                theme_slots.insert(theme_key, slot);
                use_case_slots.push(HashMap::new());
                slot
            }
        };

        let theme = &mut themes[slot];
        let use_case_key = row.use_case_key();
        match use_case_slots[slot].get(&use_case_key) {
            Some(&index) => {
                let use_case = &mut theme.use_cases[index];
                if use_case.position != row.use_case_position {
                    use_case.position = resolve_duplicate(
                        policy,
                        &format!("use case {use_case_key} in theme {}", theme.key),
                        use_case.position,
                        row.use_case_position,
                    )?;
                }
            }
            None => {
                let index = theme.use_cases.len();
                theme.use_cases.push(PlannedUseCase {
                    key: use_case_key.clone(),
                    position: row.use_case_position,
                    sequence: index as i64,
                });
                use_case_slots[slot].insert(use_case_key, index);
            }
        }
    }

    Ok(SyncPlan { themes })
}
