use crate::commands::{CmdMessage, CmdResult};
use crate::config::ClozeConfig;
use crate::error::Result;
use crate::store::ConfigStorage;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run<C: ConfigStorage>(
    storage: &mut C,
    backup_path: Option<&Path>,
    action: ConfigAction,
) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = ClozeConfig::load(&*storage);
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = ClozeConfig::load(&*storage);
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = ClozeConfig::load(&*storage);
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e));
                return Ok(res);
            }
            config.save(storage, backup_path)?;
            let display_val = config.get(&key).unwrap_or_else(|| value.clone());
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::MemoryConfigStorage;

    #[test]
    fn show_all_returns_defaults_when_nothing_saved() {
        let mut storage = MemoryConfigStorage::new();
        let result = run(&mut storage, None, ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config, Some(ClozeConfig::default()));
    }

    #[test]
    fn set_then_show_key() {
        let mut storage = MemoryConfigStorage::new();
        let result = run(
            &mut storage,
            None,
            ConfigAction::Set("noteTypes".into(), "Verb, Adj".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "noteTypes set to Verb, Adj");

        let result = run(&mut storage, None, ConfigAction::ShowKey("noteTypes".into())).unwrap();
        assert_eq!(result.messages[0].content, "Verb, Adj");
    }

    #[test]
    fn unknown_key_is_reported_not_saved() {
        let mut storage = MemoryConfigStorage::new();
        let result = run(
            &mut storage,
            None,
            ConfigAction::Set("colour".into(), "red".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.config.is_none());

        let result = run(&mut storage, None, ConfigAction::ShowKey("colour".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
    }
}
