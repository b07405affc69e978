use log::{error, info};
use std::{future::Future, pin::Pin};
use tokio::{
    fs,
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    select,
};
use tokio_util::sync::CancellationToken;

use crate::checker::Checker;
use crate::error::Error;
use crate::probe::Probe;
use crate::sites::SiteList;
use crate::workspace::Workspace;

const MENU: &str = "\t Type 1 - to check the sites\n\
                    \t Type 2 - to show the input file\n\
                    \t Type 3 - to show the response file\n";

/// The actions offered by the menu. Each returns the text to display.
pub trait MenuHandler {
    fn check_sites(&mut self) -> impl Future<Output = Result<String, Error>>;
    fn show_input_file(&mut self) -> impl Future<Output = Result<String, Error>>;
    fn show_response_file(&mut self) -> impl Future<Output = Result<String, Error>>;
}

/// Reads one choice per line and dispatches it until EOF or cancellation.
///
/// A failing action is reported on `output` and the loop carries on.
/// Cancelling `token` also abandons an action that is still running.
///
/// # Errors
///
/// Returns an error only if reading `input` or writing `output` fails.
pub async fn run_menu<R, W, H>(
    input: R,
    output: &mut W,
    handler: &mut H,
    token: CancellationToken,
) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    H: MenuHandler,
{
    let mut lines = input.lines();

    output
        .write_all(b"Enter a choice (press Ctrl+D to end):\n")
        .await?;
    output.write_all(MENU.as_bytes()).await?;
    output.write_all(b"\nYour choice: ").await?;
    output.flush().await?;

    loop {
        let line = select! {
            line = lines.next_line() => line?,
            () = token.cancelled() => {
                info!("Shutdown requested, leaving menu");
                break;
            }
        };
        let Some(line) = line else { break };

        output.write_all(b"\n").await?;
        let action: Pin<Box<dyn Future<Output = Result<String, Error>> + '_>> =
            match line.trim() {
                "1" => {
                    output.write_all(b"-> Checking sites <-\n").await?;
                    Box::pin(handler.check_sites())
                }
                "2" => {
                    output.write_all(b"-> Input file <-\n").await?;
                    Box::pin(handler.show_input_file())
                }
                "3" => {
                    output.write_all(b"-> Response file <-\n").await?;
                    Box::pin(handler.show_response_file())
                }
                _ => {
                    output.write_all(b"No such option\n").await?;
                    output.write_all(MENU.as_bytes()).await?;
                    output.write_all(b"\nYour new choice: ").await?;
                    output.flush().await?;
                    continue;
                }
            };
        output.flush().await?;

        let outcome = select! {
            outcome = action => outcome,
            () = token.cancelled() => {
                info!("Shutdown requested, abandoning the running action");
                break;
            }
        };

        match outcome {
            Ok(text) => {
                output.write_all(text.as_bytes()).await?;
                if !text.ends_with('\n') {
                    output.write_all(b"\n").await?;
                }
            }
            Err(e) => {
                error!("Menu action failed: {e}");
                output.write_all(format!("Error: {e}\n").as_bytes()).await?;
            }
        }

        output.write_all(b"\nYour new choice: ").await?;
        output.flush().await?;
    }

    Ok(())
}

/// Menu handler backed by a workspace and a checker.
pub struct App<P> {
    workspace: Workspace,
    checker: Checker<P>,
}

impl<P: Probe> App<P> {
    pub fn new(workspace: Workspace, checker: Checker<P>) -> Self {
        Self { workspace, checker }
    }
}

impl<P: Probe> MenuHandler for App<P> {
    /// Checks the sites in `data.json` and overwrites `response.json` with the outcome.
    async fn check_sites(&mut self) -> Result<String, Error> {
        let sites = SiteList::parse(&fs::read_to_string(self.workspace.data_path()).await?)?;
        info!("Checking {} site(s)...", sites.len());

        let result = self.checker.check_all(&sites).await;
        fs::write(
            self.workspace.response_path(),
            serde_json::to_string_pretty(&result)?,
        )
        .await?;

        if result.is_empty() {
            return Ok("No sites configured".to_string());
        }

        Ok(result
            .iter()
            .map(|(name, up)| format!("{name}: {}\n", if *up { "UP" } else { "DOWN" }))
            .collect())
    }

    async fn show_input_file(&mut self) -> Result<String, Error> {
        Ok(fs::read_to_string(self.workspace.data_path()).await?)
    }

    async fn show_response_file(&mut self) -> Result<String, Error> {
        Ok(fs::read_to_string(self.workspace.response_path()).await?)
    }
}
