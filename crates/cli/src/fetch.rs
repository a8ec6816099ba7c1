pub(crate) mod client;
pub(crate) mod error;

use std::path::PathBuf;

use chrono::NaiveDate;
use reqwest::Url;
use tracing::info;

use crate::cli::FetchArgs;
use crate::cli::PageArg;
use crate::cli::PathExt;
use crate::error::CliError;
use crate::fetch::client::PageClient;
use crate::fetch::error::FetchError;

const HISTORY_URL: &str = "https://sfbuff.site/fighters/{id}/ranked_history";
const MATCHUP_URL: &str = "https://www.sfbuff.site/fighters/{id}/matchup_chart";

pub(crate) fn fetch(args: FetchArgs) -> Result<(), CliError> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            return Err(CliError::Argument(format!(
                "the first day `{from}` comes after the last day `{to}`"
            )));
        }
    }

    let query = PageQuery::from(&args);
    let url = query.url()?;
    let path = match args.output {
        Some(path) => path,
        None => None::<PathBuf>.or_current_dir()?.join(query.file_name()),
    };

    info!(%url, path = %path.display(), "downloading the page");

    let client = PageClient::new(args.timezone)?;
    let bytes = client.download(url, &path)?;

    println!("mrlens saved {bytes} bytes of `{}` in: `{}`", query.target, path.display());
    Ok(())
}

/// The page to download and its filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageQuery {
    target: String,
    page: PageArg,
    character: Option<u32>,
    input_type: Option<u32>,
    battle_type: u32,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl From<&FetchArgs> for PageQuery {
    fn from(args: &FetchArgs) -> Self {
        Self {
            target: args.player_or_url.trim().to_owned(),
            page: args.page,
            character: args.character,
            input_type: args.input_type,
            battle_type: args.battle_type,
            from: args.from,
            to: args.to,
        }
    }
}

impl PageQuery {
    /// The URL of the page. A target that already is a URL is used as is.
    pub(crate) fn url(&self) -> Result<Url, FetchError> {
        if self.target.starts_with("http") {
            return Url::parse(&self.target).map_err(|e| FetchError::Url(e.to_string()));
        }

        if self.target.is_empty() || !self.target.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FetchError::Url(format!("`{}` is not a fighter id", self.target)));
        }

        let base = match self.page {
            PageArg::History => HISTORY_URL,
            PageArg::Matchup => MATCHUP_URL,
        }
        .replace("{id}", &self.target);

        let params = self.params();
        let url = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params)
        };

        url.map_err(|e| FetchError::Url(e.to_string()))
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(character) = self.character {
            params.push(("home_character_id", character.to_string()));
        }

        if self.page == PageArg::Matchup {
            if let Some(input_type) = self.input_type {
                params.push(("home_input_type_id", input_type.to_string()));
            }
            params.push(("battle_type_id", self.battle_type.to_string()));
        }

        if let Some(from) = self.from {
            params.push(("played_from", from.format("%Y-%m-%d").to_string()));
        }

        if let Some(to) = self.to {
            params.push(("played_to", to.format("%Y-%m-%d").to_string()));
        }

        params
    }

    /// The default file name of the saved page.
    pub(crate) fn file_name(&self) -> &'static str {
        match self.page {
            PageArg::History => "ranked_history.html",
            PageArg::Matchup => "matchup_chart.html",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(target: &str, page: PageArg) -> PageQuery {
        PageQuery {
            target: target.to_owned(),
            page,
            character: None,
            input_type: None,
            battle_type: 1,
            from: None,
            to: None,
        }
    }

    #[test]
    fn ranked_history_url() -> Result<(), FetchError> {
        let query = PageQuery {
            character: Some(1),
            input_type: Some(0),
            from: NaiveDate::from_ymd_opt(2025, 8, 1),
            to: NaiveDate::from_ymd_opt(2025, 8, 31),
            ..query("1234567890", PageArg::History)
        };

        assert_eq!(
            query.url()?.as_str(),
            "https://sfbuff.site/fighters/1234567890/ranked_history?home_character_id=1&played_from=2025-08-01&played_to=2025-08-31"
        );
        assert_eq!(query.file_name(), "ranked_history.html");
        Ok(())
    }

    #[test]
    fn unfiltered_history_has_no_query() -> Result<(), FetchError> {
        assert_eq!(
            query("42", PageArg::History).url()?.as_str(),
            "https://sfbuff.site/fighters/42/ranked_history"
        );
        Ok(())
    }

    #[test]
    fn matchup_chart_url() -> Result<(), FetchError> {
        let query = PageQuery {
            input_type: Some(0),
            ..query("1234567890", PageArg::Matchup)
        };

        assert_eq!(
            query.url()?.as_str(),
            "https://www.sfbuff.site/fighters/1234567890/matchup_chart?home_input_type_id=0&battle_type_id=1"
        );
        assert_eq!(query.file_name(), "matchup_chart.html");
        Ok(())
    }

    #[test]
    fn full_url_is_used_as_is() -> Result<(), FetchError> {
        let query = PageQuery {
            character: Some(3),
            ..query("https://sfbuff.site/fighters/42/ranked_history?x=1", PageArg::History)
        };

        assert_eq!(query.url()?.as_str(), "https://sfbuff.site/fighters/42/ranked_history?x=1");
        Ok(())
    }

    #[test]
    fn malformed_fighter_id_is_rejected() {
        assert!(matches!(query("12/34", PageArg::History).url(), Err(FetchError::Url(_))));
        assert!(matches!(query("", PageArg::History).url(), Err(FetchError::Url(_))));
    }
}
