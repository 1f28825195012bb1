//! One function per view, shared by the subcommands and the interactive
//! menu.

use std::future::Future;

use cps_dashboard_analytics_models::FilterCriteria;
use cps_dashboard_cli_utils::{FetchSpinner, MultiProgress};
use cps_dashboard_server::AppState;
use cps_dashboard_server_models::{ApiSchool, ApiSchoolList, ApiSummary};
use cps_dashboard_view::{ListView, ViewState, load_dashboard, load_detail, load_list};

use crate::render::{DetailReport, ListReport, SummaryReport};
use crate::{CliError, Context};

/// Runs `load` behind a spinner.
///
/// A ready value leaves `done(value)` on screen; any other outcome clears
/// the spinner.
pub async fn with_spinner<T, F>(
    multi: &MultiProgress,
    message: &str,
    load: F,
    done: impl FnOnce(&T) -> String,
) -> ViewState<T>
where
    F: Future<Output = ViewState<T>>,
{
    let spinner = FetchSpinner::start(multi, message);
    let state = load.await;
    match state.ready() {
        Some(value) => spinner.finish(done(value)),
        None => spinner.finish_and_clear(),
    }
    state
}

fn fetched(count: usize) -> String {
    format!("Fetched {count} schools")
}

/// Turns a terminal view state into a value or a [`CliError`].
pub fn into_ready<T>(state: ViewState<T>, what: &str) -> Result<T, CliError> {
    match state {
        ViewState::Ready(value) => Ok(value),
        ViewState::NotFound => Err(CliError::NotFound(what.to_string())),
        ViewState::Unavailable { reason } => Err(CliError::Unavailable(reason)),
        ViewState::Loading => Err(CliError::Unavailable(format!("{what} did not load"))),
    }
}

pub async fn summary(ctx: &Context, preview: usize) -> Result<(), CliError> {
    let limit = ctx.config.summary_limit;
    let state = with_spinner(
        &ctx.multi,
        &format!("Fetching up to {limit} schools..."),
        load_dashboard(ctx.source.as_ref(), limit),
        |dashboard| fetched(dashboard.summary.total_count),
    )
    .await;
    let dashboard = into_ready(state, "summary")?.with_preview_len(preview);

    if ctx.json {
        let body = ApiSummary::from_summary(&dashboard.summary, dashboard.preview_len);
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", SummaryReport(&dashboard));
    }
    Ok(())
}

/// Fetches the list view with no criteria applied.
pub async fn fetch_list(ctx: &Context) -> Result<ListView, CliError> {
    let limit = ctx.config.list_limit;
    let state = with_spinner(
        &ctx.multi,
        &format!("Fetching up to {limit} schools..."),
        load_list(ctx.source.as_ref(), limit),
        |list| fetched(list.records().len()),
    )
    .await;
    into_ready(state, "school list")
}

pub fn print_list(ctx: &Context, list: &ListView) -> Result<(), CliError> {
    if ctx.json {
        let body = ApiSchoolList {
            criteria: list.criteria().clone(),
            fetched_count: list.records().len(),
            schools: list.visible().into_iter().map(ApiSchool::from).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", ListReport(list));
    }
    Ok(())
}

pub async fn list(ctx: &Context, criteria: FilterCriteria) -> Result<(), CliError> {
    let list = fetch_list(ctx).await?.with_criteria(criteria);
    print_list(ctx, &list)
}

pub async fn show(ctx: &Context, id: &str) -> Result<(), CliError> {
    let state = with_spinner(
        &ctx.multi,
        &format!("Looking up school {id}..."),
        load_detail(ctx.source.as_ref(), id),
        |detail| format!("Loaded {}", detail.name),
    )
    .await;
    let detail = into_ready(state, &format!("school {id}"))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print!("{}", DetailReport(&detail));
    }
    Ok(())
}

/// Serves the API over the same source the CLI was started with.
pub async fn serve(ctx: Context, bind: Option<String>, port: Option<u16>) -> Result<(), CliError> {
    let (env_bind, env_port) = cps_dashboard_server::bind_from_env();
    let bind = bind.unwrap_or(env_bind);
    let port = port.unwrap_or(env_port);
    let state = AppState::new(ctx.source, ctx.config);

    // The server uses actix-web's runtime, so run it in a blocking task to
    // avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(cps_dashboard_server::serve(state, &bind, port))
    })
    .await??;

    Ok(())
}
