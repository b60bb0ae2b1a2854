//! Backoff around Aptos view and resource lookups.
//!
//! A lookup is resent only when `reqwest` never got a response back (refused
//! connection, reset, client timeout). An HTTP error status is a response, so
//! it reaches the caller on the first try. Submissions are not wrapped here;
//! the node may already hold a transaction whose reply was lost.

use std::time::Duration;

/// Resends allowed on top of the first request.
const MAX_RETRIES: u32 = 3;

/// First pause; each later pause is twice the previous one.
const BASE_DELAY_MS: u64 = 200;

/// Pause before resend number `attempt + 1`.
fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BASE_DELAY_MS << attempt)
}

/// Run `f` until it yields a response or the resend allowance is spent.
///
/// `operation` names the lookup in the warning emitted before each pause.
pub(crate) async fn retry_read<F, Fut>(
    operation: &str,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < MAX_RETRIES => {
                let delay = backoff(attempt);
                attempt += 1;
                tracing::warn!(
                    operation,
                    attempt,
                    max_retries = MAX_RETRIES,
                    ?delay,
                    error = %e,
                    "no response from aptos node"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
