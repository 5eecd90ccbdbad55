//! Wi-Fi association before streaming starts.
//!
//! Association is retried with exponential backoff up to a fixed attempt
//! budget. When the budget runs out the caller gets `NetworkUnavailable`
//! instead of a silent hang.

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::NetworkConfig;
use crate::error::{MotionRemoteError, Result};

/// Station-mode network interface
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkLink: Send {
    /// Whether the interface is already associated with `ssid`
    async fn is_associated(&mut self, ssid: &str) -> Result<bool>;

    /// Make one association attempt
    async fn associate(&mut self, ssid: &str, password: &str) -> Result<()>;
}

/// NetworkManager-backed link driven through the `nmcli` command
#[derive(Debug, Default, Clone)]
pub struct NmcliLink;

impl NmcliLink {
    pub fn new() -> Self {
        Self
    }

    async fn run(args: &[&str]) -> Result<String> {
        let output = Command::new("nmcli")
            .args(args)
            .output()
            .await
            .map_err(|e| MotionRemoteError::Association(format!("Failed to run nmcli: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MotionRemoteError::Association(format!(
                "nmcli exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Whether `nmcli -t -f active,ssid` output lists `ssid` as active
fn active_ssid_listed(listing: &str, ssid: &str) -> bool {
    listing
        .lines()
        .filter_map(|line| line.split_once(':'))
        .any(|(active, name)| active == "yes" && name == ssid)
}

#[async_trait]
impl NetworkLink for NmcliLink {
    async fn is_associated(&mut self, ssid: &str) -> Result<bool> {
        let listing = Self::run(&["-t", "-f", "active,ssid", "dev", "wifi"]).await?;
        Ok(active_ssid_listed(&listing, ssid))
    }

    async fn associate(&mut self, ssid: &str, password: &str) -> Result<()> {
        let mut args = vec!["dev", "wifi", "connect", ssid];
        if !password.is_empty() {
            args.extend(["password", password]);
        }
        Self::run(&args).await.map(|_| ())
    }
}

/// Delay before retry number `attempt` (1-based), doubling up to `max_ms`
#[must_use]
pub fn backoff_delay(attempt: u32, initial_ms: u64, max_ms: u64) -> Duration {
    let shift = attempt.saturating_sub(1).min(32);
    let delay = initial_ms.saturating_mul(1u64 << shift);
    Duration::from_millis(delay.min(max_ms))
}

/// Associate with the configured network, retrying with backoff.
///
/// Returns the number of attempts made (0 if no SSID is configured or the
/// link was already associated).
///
/// # Errors
///
/// Returns `NetworkUnavailable` once `max_attempts` attempts have failed.
pub async fn associate_with_retry<L>(link: &mut L, config: &NetworkConfig) -> Result<u32>
where
    L: NetworkLink + ?Sized,
{
    if config.ssid.is_empty() {
        info!("No SSID configured, skipping network association");
        return Ok(0);
    }

    match link.is_associated(&config.ssid).await {
        Ok(true) => {
            info!("Already associated with '{}'", config.ssid);
            return Ok(0);
        }
        Ok(false) => {}
        Err(e) => debug!("Could not query association state: {}", e),
    }

    info!("Associating with '{}'", config.ssid);

    for attempt in 1..=config.max_attempts {
        match link.associate(&config.ssid, &config.password).await {
            Ok(()) => {
                info!("Associated with '{}' after {} attempt(s)", config.ssid, attempt);
                return Ok(attempt);
            }
            Err(e) => {
                warn!(
                    "Association attempt {}/{} failed: {}",
                    attempt, config.max_attempts, e
                );
            }
        }

        if attempt < config.max_attempts {
            let delay = backoff_delay(attempt, config.initial_backoff_ms, config.max_backoff_ms);
            debug!("Retrying association in {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    Err(MotionRemoteError::NetworkUnavailable {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use tokio::time::Instant;

    fn config(max_attempts: u32) -> NetworkConfig {
        NetworkConfig {
            ssid: "field-net".to_string(),
            password: "hunter22".to_string(),
            max_attempts,
            initial_backoff_ms: 500,
            max_backoff_ms: 2000,
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(1, 500, 8000), Duration::from_millis(500));
        assert_eq!(backoff_delay(2, 500, 8000), Duration::from_millis(1000));
        assert_eq!(backoff_delay(4, 500, 8000), Duration::from_millis(4000));
        assert_eq!(backoff_delay(5, 500, 8000), Duration::from_millis(8000));
        assert_eq!(backoff_delay(6, 500, 8000), Duration::from_millis(8000));
        assert_eq!(backoff_delay(100, 500, 8000), Duration::from_millis(8000));
    }

    #[test]
    fn test_active_ssid_listed() {
        let listing = "no:other-net\nyes:field-net\nno:\n";
        assert!(active_ssid_listed(listing, "field-net"));
        assert!(!active_ssid_listed(listing, "other-net"));
        assert!(!active_ssid_listed("", "field-net"));
    }

    #[tokio::test]
    async fn test_empty_ssid_skips_association() {
        let mut link = MockNetworkLink::new();
        link.expect_is_associated().never();
        link.expect_associate().never();

        let attempts = associate_with_retry(&mut link, &NetworkConfig::default())
            .await
            .unwrap();
        assert_eq!(attempts, 0);
    }

    #[tokio::test]
    async fn test_already_associated() {
        let mut link = MockNetworkLink::new();
        link.expect_is_associated().times(1).returning(|_| Ok(true));
        link.expect_associate().never();

        assert_eq!(associate_with_retry(&mut link, &config(3)).await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_retries() {
        let mut link = MockNetworkLink::new();
        let mut seq = Sequence::new();
        link.expect_is_associated().returning(|_| Ok(false));
        link.expect_associate()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(MotionRemoteError::Association("timeout".into())));
        link.expect_associate()
            .withf(|ssid, password| ssid == "field-net" && password == "hunter22")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let start = Instant::now();
        let attempts = associate_with_retry(&mut link, &config(5)).await.unwrap();

        assert_eq!(attempts, 3);
        // 500 ms + 1000 ms of backoff
        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert!(start.elapsed() < Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhausted_reports_unavailable() {
        let mut link = MockNetworkLink::new();
        link.expect_is_associated()
            .returning(|_| Err(MotionRemoteError::Association("no nmcli".into())));
        link.expect_associate()
            .times(4)
            .returning(|_, _| Err(MotionRemoteError::Association("auth failed".into())));

        let start = Instant::now();
        let result = associate_with_retry(&mut link, &config(4)).await;

        match result {
            Err(MotionRemoteError::NetworkUnavailable { attempts }) => assert_eq!(attempts, 4),
            other => panic!("Expected NetworkUnavailable, got: {:?}", other),
        }
        // 500 + 1000 + 2000 (capped), no sleep after the last attempt
        assert!(start.elapsed() >= Duration::from_millis(3500));
        assert!(start.elapsed() < Duration::from_millis(4000));
    }
}
