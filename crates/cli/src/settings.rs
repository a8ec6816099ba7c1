use std::fmt::Write;

use mrlens_series::OverlaySettings;
use mrlens_series::SettingsStore;
use mrlens_series::XAxisMode;
use tracing::info;

use crate::cli::SettingsAction;
use crate::cli::SettingsArgs;
use crate::error::CliError;
use crate::store::FileStore;

pub(crate) fn settings(args: SettingsArgs) -> Result<(), CliError> {
    let store = FileStore::open(args.store)?;
    let path = store.path().to_path_buf();
    let mut settings = SettingsStore::new(store);

    match args.action {
        SettingsAction::Show => {
            print!("{}", describe(&path.display().to_string(), &settings.load()));
        }
        SettingsAction::Reset => {
            settings.save(&OverlaySettings::default())?;
            info!(store = %path.display(), "restored the default settings");
            println!("mrlens restored the default settings in: `{}`", path.display());
        }
    }

    Ok(())
}

fn describe(store: &str, settings: &OverlaySettings) -> String {
    let x_axis = match settings.x_axis_mode {
        XAxisMode::Date => "date",
        XAxisMode::SequenceIndex => "count",
    };

    let mut text = format!("store: {store}\nx axis: {x_axis}\n");
    for (slot, line) in settings.lines.iter().enumerate() {
        let state = if line.enabled { "on" } else { "off" };
        let _ = writeln!(text, "line {}: {state:<3} {}", slot + 1, line.label());
    }

    text
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn describe_default_settings() {
        let text = describe("s.json", &OverlaySettings::default());

        assert_eq!(
            text,
            "store: s.json\nx axis: date\nline 1: on  EMA(300)\nline 2: off EMA(100)\nline 3: off SMA(200)\n"
        );
    }

    #[test]
    fn reset_writes_the_defaults() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"sfbuff_ema_settings":"{\"lines\":[],\"xAxisType\":\"count\"}"}"#)?;

        settings(SettingsArgs {
            action: SettingsAction::Reset,
            store: Some(path.clone()),
        })?;

        let loaded = SettingsStore::new(FileStore::new(&path)).load();
        assert_eq!(loaded, OverlaySettings::default());
        Ok(())
    }

    #[test]
    fn reset_recovers_a_corrupt_store() -> Result<(), CliError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json")?;

        settings(SettingsArgs {
            action: SettingsAction::Reset,
            store: Some(path.clone()),
        })?;

        let loaded = SettingsStore::new(FileStore::new(&path)).load();
        assert_eq!(loaded, OverlaySettings::default());
        Ok(())
    }
}
