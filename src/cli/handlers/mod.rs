mod recovery;
pub use recovery::cmd_recovery;

use std::io::{BufRead, Write};
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::controller::{BoardController, ControllerOptions, Outcome};
use crate::dnd::DragTarget;
use crate::io::config_io;
use crate::io::lock::StoreLock;
use crate::io::recovery::RecoveryLog;
use crate::io::share;
use crate::io::store::{self, FileStore};
use crate::model::{BoardConfig, ColorTag, Price};
use crate::ops::edit_ops::StickerForm;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let store_dir = store::resolve_store_dir(cli.store.as_deref())?;

    match cli.command {
        None => crate::tui::run(&store_dir),
        Some(cmd) => match cmd {
            // Read commands
            Commands::Show => cmd_show(&store_dir, json),
            Commands::Total => cmd_total(&store_dir, json),

            // Edits
            Commands::List(args) => cmd_list(args.action, &store_dir),
            Commands::Group(args) => cmd_group(args.action, &store_dir),
            Commands::Sticker(args) => cmd_sticker(args.action, &store_dir),
            Commands::Drag(args) => cmd_drag(args, &store_dir, json),

            // Whole board
            Commands::Export(args) => cmd_export(args, &store_dir),
            Commands::Import(args) => cmd_import(args, &store_dir),
            Commands::Share(args) => cmd_share(args, &store_dir),
            Commands::OpenShare(args) => cmd_open_share(args, &store_dir),
            Commands::Reset(args) => cmd_reset(args, &store_dir),

            // Maintenance
            Commands::Recovery(args) => cmd_recovery(args, &store_dir, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The board opened for one command. The store lock is held until this
/// is dropped, so the whole load-edit-save cycle is exclusive.
struct Session {
    controller: BoardController<FileStore>,
    config: BoardConfig,
    _lock: StoreLock,
}

fn open_board(store_dir: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let store = FileStore::open(store_dir)?;
    let lock = StoreLock::acquire_default(store_dir)?;
    let config = config_io::read_config(store_dir)?;
    let controller = BoardController::open_with(
        store,
        ControllerOptions {
            list_width: Some(config.board.list_width()),
            recovery: Some(RecoveryLog::new(store_dir)),
        },
    );
    Ok(Session {
        controller,
        config,
        _lock: lock,
    })
}

/// Confirmation from stdin, skipped with `--yes`
fn confirmer(yes: bool) -> impl FnMut(&str) -> bool {
    move |prompt: &str| yes || prompt_yes_no(prompt)
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{} [y/n] ", prompt);
    let _ = std::io::stderr().flush();
    let mut input = String::new();
    match std::io::stdin().lock().read_line(&mut input) {
        Ok(_) => matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn report(outcome: Outcome, applied: &str) {
    match outcome {
        Outcome::Applied => println!("{}", applied),
        Outcome::Declined => println!("cancelled"),
        Outcome::Unchanged => println!("no change"),
    }
}

fn parse_color(s: &str) -> Result<ColorTag, String> {
    ColorTag::parse(s).ok_or_else(|| format!("unknown color: {}", s))
}

fn parse_price(s: &str) -> Result<f64, String> {
    Price::from_input(s)
        .map(|p| p.amount())
        .ok_or_else(|| format!("invalid price: {:?}", s))
}

fn parse_target(s: &str) -> Result<DragTarget, Box<dyn std::error::Error>> {
    Ok(s.parse::<DragTarget>()?)
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_show(store_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_board(store_dir)?;
    let board = session.controller.board();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&board_to_json(board, true))?
        );
    } else {
        for line in format_board(board) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_total(store_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_board(store_dir)?;
    let board = session.controller.board();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&board_to_json(board, false))?
        );
    } else {
        for line in format_totals(board) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Edit command handlers
// ---------------------------------------------------------------------------

fn cmd_list(action: ListAction, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_board(store_dir)?;
    let c = &mut session.controller;
    match action {
        ListAction::Add => {
            let id = c.add_list()?;
            println!("{}", id);
        }
        ListAction::Rm(args) => {
            let outcome = c.delete_list(&args.id, &mut confirmer(args.confirm.yes))?;
            report(outcome, &format!("deleted {}", args.id));
        }
        ListAction::Rename(args) => c.rename_list(&args.id, &args.name)?,
        ListAction::Width(args) => {
            let width = c.resize_list(&args.id, args.width)?;
            if width != args.width {
                println!("width clamped to {}", width);
            }
        }
        ListAction::Color(args) => c.recolor_list(&args.id, parse_color(&args.color)?)?,
    }
    Ok(())
}

fn cmd_group(action: GroupAction, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_board(store_dir)?;
    let c = &mut session.controller;
    match action {
        GroupAction::Add(args) => {
            let id = c.add_sub_list(&args.list)?;
            println!("{}", id);
        }
        GroupAction::Rm(args) => {
            let outcome = c.delete_sub_list(&args.id, &mut confirmer(args.confirm.yes))?;
            report(outcome, &format!("deleted {}", args.id));
        }
        GroupAction::Rename(args) => c.rename_sub_list(&args.id, &args.name)?,
        GroupAction::Color(args) => c.recolor_sub_list(&args.id, parse_color(&args.color)?)?,
    }
    Ok(())
}

fn cmd_sticker(action: StickerAction, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_board(store_dir)?;
    let c = &mut session.controller;
    match action {
        StickerAction::Add(args) => {
            // Reject a bad price before anything is created
            if let Some(price) = &args.price {
                parse_price(price)?;
            }
            let id = c.add_sticker(&args.group)?;
            if args.name.is_some() || args.price.is_some() {
                let (_, _, sticker) = c
                    .board()
                    .find_sticker(&id)
                    .ok_or_else(|| format!("sticker not found: {}", id))?;
                let mut form = StickerForm::from_sticker(sticker);
                if let Some(name) = args.name {
                    form.name = name;
                }
                if let Some(price) = args.price {
                    form.price = price;
                }
                c.save_sticker_form(&id, &form)?;
            }
            println!("{}", id);
        }
        StickerAction::Rm(args) => c.delete_sticker(&args.id)?,
        StickerAction::Rename(args) => c.rename_sticker(&args.id, &args.name)?,
        StickerAction::Price(args) => c.reprice_sticker(&args.id, parse_price(&args.price)?)?,
        StickerAction::Color(args) => c.recolor_sticker(&args.id, parse_color(&args.color)?)?,
        StickerAction::Link(args) => c.relink_sticker(&args.id, &args.text)?,
        StickerAction::Desc(args) => c.redescribe_sticker(&args.id, &args.text)?,
    }
    Ok(())
}

/// Replay a drag: pick up `active`, hover each `--over` target in order,
/// then drop on `--drop` (or the last hover target).
fn cmd_drag(args: DragArgs, store_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let active = parse_target(&args.active)?;
    let hovers = args
        .over
        .iter()
        .map(|s| parse_target(s))
        .collect::<Result<Vec<_>, _>>()?;
    let drop = match &args.drop {
        Some(s) => Some(parse_target(s)?),
        None => hovers.last().cloned(),
    };

    let mut session = open_board(store_dir)?;
    let c = &mut session.controller;
    if !c.drag_start(active.clone()) {
        return Err(format!("not on the board: {}", active).into());
    }
    let mut changed = false;
    for over in &hovers {
        changed |= c.drag_over(&active, over)?;
    }
    changed |= c.drag_end(&active, drop.as_ref())?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&board_to_json(c.board(), true))?
        );
    } else if changed {
        println!("moved {}", active);
    } else {
        println!("no change");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Whole-board handlers
// ---------------------------------------------------------------------------

fn cmd_export(args: ExportArgs, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_board(store_dir)?;
    let path = session.controller.export_file(&args.file)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_import(args: ImportArgs, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_board(store_dir)?;
    let loaded = session.controller.import_file(&args.file)?;
    if !loaded.repairs.is_empty() {
        eprintln!("repaired {} ids", loaded.repairs.len());
    }
    println!("imported {} lists", loaded.board.lists.len());
    Ok(())
}

fn cmd_share(args: ShareArgs, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_board(store_dir)?;
    let token = session.controller.share_token()?;
    if args.url {
        println!("{}", share::share_url(&session.config.share.base_url, &token));
    } else {
        println!("{}", token);
    }
    Ok(())
}

fn cmd_open_share(args: OpenShareArgs, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_board(store_dir)?;
    let outcome = session
        .controller
        .load_shared(&args.token, &mut confirmer(args.confirm.yes))?;
    report(outcome, "loaded shared board");
    Ok(())
}

fn cmd_reset(args: ConfirmArgs, store_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_board(store_dir)?;
    let outcome = session.controller.reset_board(&mut confirmer(args.yes))?;
    report(outcome, "board reset");
    Ok(())
}
