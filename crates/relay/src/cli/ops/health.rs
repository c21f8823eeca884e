use clap::Args;

use filedrop_relay::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health check failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        // 1. Check config directory
        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                let ok = |exists: bool| if exists { "OK" } else { "MISSING" };
                lines.push(format!("  directory:    {}", state.filedrop_dir.display()));
                lines.push("  config.toml:  OK".to_string());
                lines.push(format!("  keys/:        {}", ok(state.keys_path.is_dir())));
                lines.push(format!("  received/:    {}", ok(state.received_path.is_dir())));
                lines.push(format!(
                    "  identity:     {}",
                    state.config.identity.as_deref().unwrap_or("(none)")
                ));
                lines.push(format!("  relay_url:    {}", state.config.relay_url));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        // 2. Check relay liveness and readiness
        let base = ctx.client.base_url();
        let client = ctx.client.http_client();

        lines.push(String::new());
        lines.push(format!("Relay ({}):", base));

        for check in ["livez", "readyz"] {
            let url = format!("{}/_status/{}", base.as_str().trim_end_matches('/'), check);
            let status = match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => "OK".to_string(),
                Ok(resp) => format!("UNHEALTHY ({})", resp.status()),
                Err(_) => "NOT REACHABLE".to_string(),
            };
            lines.push(format!("  {:<7} {}", format!("{}:", check), status));
        }

        Ok(lines.join("\n"))
    }
}
