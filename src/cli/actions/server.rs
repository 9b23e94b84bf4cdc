use crate::cli::actions::Action;
use crate::plume;
use crate::plume::locale::Locale;
use crate::plume::state::AppConfig;
use anyhow::{anyhow, Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, dsn, locale } => {
            // Validate the DSN shape up front; credentials stay out of logs.
            let parsed = Url::parse(&dsn).context("Invalid database DSN")?;
            let host = parsed
                .host_str()
                .ok_or_else(|| anyhow!("Database DSN must include a host"))?;
            tracing::info!("Using database host {host}");

            let locale = Locale::parse(&locale)
                .ok_or_else(|| anyhow!("Unsupported locale: {locale}"))?;
            let config = AppConfig::default().with_locale(locale);

            plume::new(port, dsn, config).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn handle_rejects_malformed_dsn() {
        let action = Action::Server {
            port: 8080,
            dsn: "not a dsn".to_string(),
            locale: "zh_CN".to_string(),
        };
        assert!(handle(action).await.is_err());
    }

    #[tokio::test]
    async fn handle_rejects_unknown_locale() {
        let action = Action::Server {
            port: 8080,
            dsn: "postgres://localhost:5432/plume".to_string(),
            locale: "fr_FR".to_string(),
        };
        assert!(handle(action).await.is_err());
    }
}
