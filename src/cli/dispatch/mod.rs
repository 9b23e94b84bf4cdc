use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        locale: matches
            .get_one("locale")
            .map_or_else(|| "zh_CN".to_string(), |s: &String| s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn handler_builds_server_action() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "plume",
            "--port",
            "9000",
            "--dsn",
            "postgres://localhost/plume",
            "--locale",
            "en_US",
        ]);
        let Action::Server { port, dsn, locale } = handler(&matches)?;
        assert_eq!(port, 9000);
        assert_eq!(dsn, "postgres://localhost/plume");
        assert_eq!(locale, "en_US");
        Ok(())
    }
}
