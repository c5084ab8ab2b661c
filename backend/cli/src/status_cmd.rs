//! CLI Status Command
//!
//! Asks a running gateway for its health report.

use anyhow::Result;
use forestclaim_config::ForestClaimConfig;

use crate::terminal_output::{note_error, note_success};

pub async fn run(config: &ForestClaimConfig) -> Result<()> {
    let url = health_url(config);
    let client = reqwest::Client::new();
    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            note_success(&format!("Gateway is up at {url}"));
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => note_error(&format!("Gateway answered {} at {url}", resp.status())),
        Err(_) => note_error(&format!("Gateway is not running (tried {url})")),
    }
    Ok(())
}

/// A wildcard bind address is reached through loopback.
fn health_url(config: &ForestClaimConfig) -> String {
    let host = match config.bind() {
        "0.0.0.0" | "::" => "127.0.0.1",
        other => other,
    };
    format!("http://{host}:{}/api/health", config.port())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forestclaim_config::GatewayConfig;

    #[test]
    fn wildcard_bind_uses_loopback() {
        let config = ForestClaimConfig {
            gateway: Some(GatewayConfig {
                bind: Some("0.0.0.0".into()),
                port: Some(9000),
            }),
            ..Default::default()
        };
        assert_eq!(health_url(&config), "http://127.0.0.1:9000/api/health");
        assert_eq!(
            health_url(&ForestClaimConfig::default()),
            "http://127.0.0.1:8787/api/health"
        );
    }
}
