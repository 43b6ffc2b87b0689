//! Operator resolution for Waybill commands.
//!
//! Every waypoint records who created it. Rather than requiring `--as` on
//! every invocation, the operator is resolved through a chain:
//!
//! 1. `--as <operator>`: explicit per-command override
//! 2. `WAYBILL_OPERATOR` env var: set once per terminal or shift
//! 3. `default-operator` in `~/.waybill/config.toml`

use std::env;

use crate::config::Config;

/// Error message shown when no operator can be resolved.
pub const OPERATOR_REQUIRED: &str = "operator required: pass --as <operator>, \
    set WAYBILL_OPERATOR, or add `default-operator = \"...\"` to ~/.waybill/config.toml";

/// Resolve the acting operator from the tiered resolution chain.
pub fn resolve_operator(explicit: Option<&str>, config: &Config) -> Result<String, String> {
    resolve_from(explicit, env::var("WAYBILL_OPERATOR").ok(), config)
}

fn resolve_from(
    explicit: Option<&str>,
    from_env: Option<String>,
    config: &Config,
) -> Result<String, String> {
    if let Some(op) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(op.to_string());
    }

    if let Some(op) = from_env.filter(|s| !s.trim().is_empty()) {
        return Ok(op.trim().to_string());
    }

    config
        .default_operator
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| OPERATOR_REQUIRED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(operator: Option<&str>) -> Config {
        Config {
            default_operator: operator.map(String::from),
            ..Config::default()
        }
    }

    #[test]
    fn explicit_wins() {
        let config = config_with(Some("cfg"));
        let result = resolve_from(Some("dispatch"), Some("env-op".into()), &config);
        assert_eq!(result.unwrap(), "dispatch");
    }

    #[test]
    fn env_beats_config() {
        let result = resolve_from(None, Some("env-op".into()), &config_with(Some("cfg")));
        assert_eq!(result.unwrap(), "env-op");
    }

    #[test]
    fn config_is_the_last_resort() {
        let result = resolve_from(None, Some("  ".into()), &config_with(Some("cfg")));
        assert_eq!(result.unwrap(), "cfg");
    }

    #[test]
    fn nothing_configured_is_an_error() {
        let result = resolve_from(None, None, &config_with(Some("")));
        assert_eq!(result.unwrap_err(), OPERATOR_REQUIRED);
    }
}
