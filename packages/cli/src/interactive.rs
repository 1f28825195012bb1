//! Interactive menu shown when no subcommand is given.
//!
//! The school browser fetches once and then refines the same collection,
//! so changing filters never triggers another request.

use cps_dashboard_analytics_models::{DEFAULT_PREVIEW_LEN, FilterCriteria, RatingFilter, TypeFilter};
use cps_dashboard_school_models::SafetyRating;
use cps_dashboard_view::ListView;
use dialoguer::{Input, Select};

use crate::{CliError, Context, commands};

/// Top-level menu entries.
enum Action {
    Dashboard,
    Browse,
    LookUp,
    Server,
}

impl Action {
    const ALL: &[Self] = &[Self::Dashboard, Self::Browse, Self::LookUp, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Show dashboard summary",
            Self::Browse => "Browse schools",
            Self::LookUp => "Look up a school by ID",
            Self::Server => "Start API server (live data)",
        }
    }
}

/// Refinement steps offered after each list render.
enum BrowseStep {
    Type,
    Rating,
    Search,
    Clear,
    Done,
}

impl BrowseStep {
    const ALL: &[Self] = &[
        Self::Type,
        Self::Rating,
        Self::Search,
        Self::Clear,
        Self::Done,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Type => "Change school type",
            Self::Rating => "Change safety rating",
            Self::Search => "Change search text",
            Self::Clear => "Clear filters",
            Self::Done => "Done",
        }
    }
}

/// Runs the menu once.
///
/// # Errors
///
/// Returns [`CliError`] if a prompt fails or the chosen view cannot load.
pub async fn run(ctx: &Context) -> Result<(), CliError> {
    println!("CPS Dashboard");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Dashboard => {
            let preview: usize = Input::new()
                .with_prompt("How many top schools by safety (max 10)")
                .default(DEFAULT_PREVIEW_LEN)
                .interact_text()?;
            commands::summary(ctx, preview).await
        }
        Action::Browse => browse(ctx).await,
        Action::LookUp => {
            let id: String = Input::new().with_prompt("School ID").interact_text()?;
            commands::show(ctx, id.trim()).await
        }
        Action::Server => {
            // The server uses actix-web's runtime, so run it in a blocking
            // task to avoid nesting tokio runtimes.
            let api_url = ctx.config.api_url.clone();
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new()
                    .block_on(cps_dashboard_server::interactive::run(&api_url))
            })
            .await??;
            Ok(())
        }
    }
}

async fn browse(ctx: &Context) -> Result<(), CliError> {
    let mut list = commands::fetch_list(ctx).await?;

    loop {
        commands::print_list(ctx, &list)?;
        println!();

        let labels: Vec<&str> = BrowseStep::ALL.iter().map(BrowseStep::label).collect();
        let idx = Select::new()
            .with_prompt("Refine")
            .items(&labels)
            .default(BrowseStep::ALL.len() - 1)
            .interact()?;

        list = match BrowseStep::ALL[idx] {
            BrowseStep::Type => list.with_type(pick(
                "School type",
                TypeFilter::CHOICES,
                list.criteria().type_filter,
            )?),
            BrowseStep::Rating => list.with_rating(pick(
                "Safety rating",
                &rating_choices(),
                list.criteria().rating_filter,
            )?),
            BrowseStep::Search => list.with_search(prompt_search(&list)?),
            BrowseStep::Clear => list.with_criteria(FilterCriteria::default()),
            BrowseStep::Done => return Ok(()),
        };
    }
}

fn rating_choices() -> Vec<RatingFilter> {
    std::iter::once(RatingFilter::All)
        .chain(SafetyRating::all().iter().map(|r| RatingFilter::Only(*r)))
        .collect()
}

fn pick<T: Copy + PartialEq + ToString>(
    prompt: &str,
    choices: &[T],
    current: T,
) -> Result<T, CliError> {
    let labels: Vec<String> = choices.iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(choices.iter().position(|c| *c == current).unwrap_or(0))
        .interact()?;
    Ok(choices[idx])
}

fn prompt_search(list: &ListView) -> Result<String, CliError> {
    Ok(Input::new()
        .with_prompt("Search (blank to clear)")
        .with_initial_text(list.criteria().search_text.clone())
        .allow_empty(true)
        .interact_text()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_choices_start_with_all() {
        let choices = rating_choices();
        assert_eq!(choices[0], RatingFilter::All);
        assert_eq!(choices.len(), 6);
        assert_eq!(choices[5].to_string(), "Very Strong");
    }

    #[test]
    fn menus_have_labels() {
        assert!(Action::ALL.iter().all(|a| !a.label().is_empty()));
        assert_eq!(BrowseStep::ALL.last().map(BrowseStep::label), Some("Done"));
    }
}
