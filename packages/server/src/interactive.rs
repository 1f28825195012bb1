//! Interactive mode for the server.
//!
//! Prompts for the dataset endpoint, bind address and port before starting
//! the server.

use dialoguer::{Confirm, Input};

use crate::{DEFAULT_BIND_ADDR, DEFAULT_PORT};

/// Runs the server in interactive mode, prompting for configuration.
///
/// `api_url` is offered as the default endpoint. Once confirmed, sets
/// `CPS_API_URL`, `BIND_ADDR` and `PORT` from the answers and delegates to
/// [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(api_url: &str) -> std::io::Result<()> {
    println!("CPS Dashboard Server");
    println!();

    let api_url: String = Input::new()
        .with_prompt("Dataset endpoint")
        .default(api_url.to_string())
        .interact_text()
        .unwrap_or_else(|_| api_url.to_string());

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(DEFAULT_BIND_ADDR.to_string())
        .interact_text()
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(DEFAULT_PORT)
        .interact_text()
        .unwrap_or(DEFAULT_PORT);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    // SAFETY: the server has not started yet and these variables are only
    // read once during its initialisation.
    unsafe {
        std::env::set_var("CPS_API_URL", &api_url);
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", port.to_string());
    }

    super::run_server().await
}
