//! `rca-reviewer health` command.

use crate::adapters::live::HttpAnalysisService;
use crate::config::Config;

/// Execute the `health` command.
///
/// # Errors
///
/// Returns an error string if the service is unreachable or unhealthy.
pub fn run(config: &Config) -> Result<(), String> {
    let service = HttpAnalysisService::new(&config.api_url, config.request_timeout)
        .map_err(|e| e.to_string())?;
    let status = super::block_on(service.health())?.map_err(|e| e.to_string())?;

    if status.status != "ok" {
        return Err(format!(
            "{} reports status {:?}",
            config.api_url, status.status
        ));
    }
    if status.service.is_empty() {
        println!("{}: ok", config.api_url);
    } else {
        println!("{}: ok ({})", config.api_url, status.service);
    }
    Ok(())
}
