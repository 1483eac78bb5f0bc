use clap::Parser;
use clozemask::api::{ClozeApi, CmdMessage, ConfigAction, MessageLevel};
use clozemask::config::{ADDON_ID, KEYS};
use clozemask::error::{ClozeError, Result};
use clozemask::logging;
use clozemask::model::{Note, NoteType};
use clozemask::store::fs::{FileConfigStorage, FileStore};
use clozemask::store::NoteStore;
use colored::*;
use directories::ProjectDirs;
use std::path::PathBuf;

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "CLOZEMASK_HOME";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: ClozeApi<FileStore, FileConfigStorage>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;
    logging::init(cli.verbose || ctx.api.config().debug);

    match cli.command {
        Some(Commands::Mask {
            sentence,
            word,
            mask,
        }) => handle_mask(&ctx, sentence, word, mask),
        Some(Commands::NoteType { name, fields }) => handle_note_type(&mut ctx, name, fields),
        Some(Commands::Add { note_type, fields }) => handle_add(&mut ctx, note_type, fields),
        Some(Commands::List) => handle_list(&ctx),
        Some(Commands::Fill { ids, all }) => handle_fill(&mut ctx, ids, all),
        Some(Commands::Leave { id, field }) => handle_leave(&mut ctx, id, field),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        Some(Commands::Settings {
            sentence_field,
            word_field,
            destination_field,
            note_types,
            mask,
            lookup_on_add,
            debug,
        }) => {
            let mut form = ctx.api.open_settings();
            if let Some(v) = sentence_field {
                form.sentence_field = v;
            }
            if let Some(v) = word_field {
                form.word_field = v;
            }
            if let Some(v) = destination_field {
                form.destination_field = v;
            }
            if let Some(v) = note_types {
                form.note_types = v;
            }
            if let Some(v) = mask {
                form.mask_string = v;
            }
            if let Some(v) = lookup_on_add {
                form.lookup_on_add = v;
            }
            if let Some(v) = debug {
                form.debug = v;
            }
            let result = ctx.api.save_settings(&form)?;
            print_messages(&result.messages);
            Ok(())
        }
        None => handle_list(&ctx),
    }
}

fn resolve_home(cli: &Cli) -> Result<PathBuf> {
    if let Some(home) = &cli.home {
        return Ok(home.clone());
    }
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let proj_dirs = ProjectDirs::from("net", "clozemask", "clozemask")
        .ok_or_else(|| ClozeError::Api("Could not determine data dir".into()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = resolve_home(cli)?;
    let store = FileStore::new(home.clone());
    let storage = FileConfigStorage::new(home.join("addons"));
    let backup = storage.backup_path(ADDON_ID);
    let api = ClozeApi::new(store, storage).with_backup_path(backup);
    Ok(AppContext { api })
}

fn handle_mask(
    ctx: &AppContext,
    sentence: String,
    word: String,
    mask: Option<String>,
) -> Result<()> {
    let masked = match mask {
        Some(m) => clozemask::mask::generate(&sentence, &word, &m),
        None => ctx.api.generate(&sentence, &word),
    };
    match masked {
        Some(text) => println!("{}", text),
        None => print_messages(&[CmdMessage::warning("Word not found in sentence")]),
    }
    Ok(())
}

fn handle_note_type(ctx: &mut AppContext, name: String, fields: Vec<String>) -> Result<()> {
    let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
    ctx.api
        .store_mut()
        .add_note_type(NoteType::new(name.clone(), &field_refs))?;
    print_messages(&[CmdMessage::success(format!("Note type added: {}", name))]);
    Ok(())
}

fn parse_assignments(fields: &[String]) -> Result<Vec<(String, String)>> {
    fields
        .iter()
        .map(|f| {
            f.split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| ClozeError::Api(format!("Expected Name=Value, got: {}", f)))
        })
        .collect()
}

fn handle_add(ctx: &mut AppContext, note_type: String, fields: Vec<String>) -> Result<()> {
    let values = parse_assignments(&fields)?;
    let note = ctx.api.store_mut().add_note(&note_type, &values)?;
    print_messages(&[CmdMessage::success(format!("Note added: {}", note.id))]);
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let notes = ctx.api.store().list_notes()?;
    if notes.is_empty() {
        println!("No notes found.");
        return Ok(());
    }
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_note(note);
    }
    Ok(())
}

fn handle_fill(ctx: &mut AppContext, ids: Vec<i64>, all: bool) -> Result<()> {
    let ids = if all {
        ctx.api
            .store()
            .list_notes()?
            .iter()
            .map(|n| n.id)
            .collect()
    } else {
        ids
    };

    let result = ctx.api.bulk_generate(&ids);
    println!("{}", ctx.api.bulk_action_label().bold());
    print_messages(&result.messages);
    if let Some(summary) = result.summary {
        if ctx.api.config().debug {
            println!(
                "{}",
                format!("{} processed, {} changed", summary.processed, summary.changed).dimmed()
            );
        }
    }
    Ok(())
}

fn handle_leave(ctx: &mut AppContext, id: i64, field: String) -> Result<()> {
    let result = ctx.api.leave_field(id, &field)?;
    let dest = &ctx.api.config().destination_field;

    for note in &result.affected_notes {
        println!("{}: {}", dest.yellow(), note.get(dest).unwrap_or_default());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(
    ctx: &mut AppContext,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config_action(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            for key in KEYS {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_note(note: &Note) {
    println!(
        "{} {}",
        format!("{}.", note.id).yellow(),
        note.note_type.bold()
    );
    for field in &note.fields {
        println!("    {}: {}", field.name.dimmed(), field.value);
    }
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}
