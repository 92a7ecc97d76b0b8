use std::sync::Arc;

use super::flow::RequestFlow;
use super::prompt::{FlowView, Prompter};
use super::subscription::Subscription;
use super::RequestKind;
use crate::error::{DeskError, Result};
use crate::rpc::PasswordResponse;

/// Drive a request screen until the backend closes the channel.
///
/// Screens that need no answer are shown once and then wait for the next
/// event. Prompts are answered on a blocking thread; if newer events arrive
/// meanwhile, the newest one replaces the request and the answer is dropped.
/// A failed submission is shown to the user and the same request is asked
/// again.
pub async fn run<K: RequestKind>(
    flow: &mut RequestFlow<K>,
    events: &mut Subscription<K::Request>,
    prompter: Arc<dyn Prompter>,
) -> Result<()> {
    loop {
        let prompt = match flow.view() {
            FlowView::Prompt(prompt) => prompt,
            view => {
                prompter.status(&view)?;
                match events.next().await {
                    Some(event) => {
                        flow.apply_event(event);
                        continue;
                    }
                    None => {
                        tracing::debug!(channel = K::EVENT, "request channel closed");
                        return Ok(());
                    }
                }
            }
        };

        let generation = flow.generation();
        let asker = Arc::clone(&prompter);
        let answer = tokio::task::spawn_blocking(move || asker.ask(&prompt))
            .await
            .map_err(|e| DeskError::Other(format!("prompt task failed: {}", e)))?;

        if let Some(event) = events.latest_queued() {
            flow.apply_event(event);
        }
        if flow.generation() != generation {
            tracing::info!(channel = K::EVENT, "request replaced while prompting; answer dropped");
            continue;
        }

        let response = match answer {
            Ok(response) => response,
            Err(DeskError::Cancelled) => PasswordResponse::Cancelled,
            Err(e) => return Err(e),
        };

        if let Err(e) = flow.submit(response).await {
            prompter.show_error(&format!("Error submitting response: {}", e))?;
        }
    }
}
