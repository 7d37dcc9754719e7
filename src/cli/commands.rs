use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sb", about = concat!("stickerboard v", env!("CARGO_PKG_VERSION"), " - compare options on a sticker board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Store directory (default: $STICKERBOARD_DIR, then $XDG_DATA_HOME/stickerboard)
    #[arg(short = 'C', long = "store", global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the board with ids and totals
    Show,
    /// Print list totals and the board total
    Total,
    /// Add, remove or edit lists
    List(ListCmd),
    /// Add, remove or edit groups (sub-lists)
    Group(GroupCmd),
    /// Add, remove or edit stickers
    Sticker(StickerCmd),
    /// Replay a drag gesture: pick up, hover, drop
    Drag(DragArgs),
    /// Write the board to a JSON file
    Export(ExportArgs),
    /// Replace the board with a JSON file
    Import(ImportArgs),
    /// Print a share token (or link with --url)
    Share(ShareArgs),
    /// Load a board from a share token or link
    OpenShare(OpenShareArgs),
    /// Start over with the default board
    Reset(ConfirmArgs),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Shared args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfirmArgs {
    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct IdArg {
    pub id: String,
}

#[derive(Args)]
pub struct RenameArgs {
    pub id: String,
    pub name: String,
}

#[derive(Args)]
pub struct ColorArgs {
    pub id: String,
    /// Palette color: yellow, pink, blue, green, purple, orange, red, teal
    /// (lists: pale-blue, pale-green), or a class name like bg-teal-200
    pub color: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub id: String,
    #[command(flatten)]
    pub confirm: ConfirmArgs,
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListCmd {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Append a new list
    Add,
    /// Delete a list and everything in it
    Rm(RemoveArgs),
    /// Rename a list
    Rename(RenameArgs),
    /// Set a list's width (280-800)
    Width(WidthArgs),
    /// Set a list's background color
    Color(ColorArgs),
}

#[derive(Args)]
pub struct WidthArgs {
    pub id: String,
    pub width: u32,
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct GroupCmd {
    #[command(subcommand)]
    pub action: GroupAction,
}

#[derive(Subcommand)]
pub enum GroupAction {
    /// Append a new group to a list
    Add(GroupAddArgs),
    /// Delete a group and its stickers
    Rm(RemoveArgs),
    /// Rename a group
    Rename(RenameArgs),
    /// Set a group's color
    Color(ColorArgs),
}

#[derive(Args)]
pub struct GroupAddArgs {
    /// Id of the list to add to
    pub list: String,
}

// ---------------------------------------------------------------------------
// Stickers
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StickerCmd {
    #[command(subcommand)]
    pub action: StickerAction,
}

#[derive(Subcommand)]
pub enum StickerAction {
    /// Append a new sticker to a group
    Add(StickerAddArgs),
    /// Delete a sticker
    Rm(IdArg),
    /// Rename a sticker
    Rename(RenameArgs),
    /// Set a sticker's price
    Price(PriceArgs),
    /// Set a sticker's color
    Color(ColorArgs),
    /// Set a sticker's link (empty to clear)
    Link(TextArgs),
    /// Set a sticker's description (empty to clear)
    Desc(TextArgs),
}

#[derive(Args)]
pub struct StickerAddArgs {
    /// Id of the group to add to
    pub group: String,
    /// Name for the new sticker
    #[arg(long)]
    pub name: Option<String>,
    /// Price for the new sticker
    #[arg(long)]
    pub price: Option<String>,
}

#[derive(Args)]
pub struct PriceArgs {
    pub id: String,
    /// A number, optionally with a leading $
    pub price: String,
}

#[derive(Args)]
pub struct TextArgs {
    pub id: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Drag
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct DragArgs {
    /// Item to pick up: list-<id>, sublist-<id> or sticker-<id>
    pub active: String,
    /// Hover over a target (repeatable, applied in order)
    #[arg(long = "over", action = clap::ArgAction::Append)]
    pub over: Vec<String>,
    /// Drop target (default: the last --over target)
    #[arg(long)]
    pub drop: Option<String>,
}

// ---------------------------------------------------------------------------
// Files and sharing
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (.json is appended when missing)
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ImportArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ShareArgs {
    /// Print a full link using the configured base URL
    #[arg(long)]
    pub url: bool,
}

#[derive(Args)]
pub struct OpenShareArgs {
    /// Share token, or a link carrying one in ?data=
    pub token: String,
    #[command(flatten)]
    pub confirm: ConfirmArgs,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn drag_collects_hovers_in_order() {
        let cli = Cli::try_parse_from([
            "sb",
            "drag",
            "sticker-a",
            "--over",
            "sublist-b",
            "--over",
            "sticker-c",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Drag(args)) => {
                assert_eq!(args.active, "sticker-a");
                assert_eq!(args.over, vec!["sublist-b", "sticker-c"]);
                assert!(args.drop.is_none());
            }
            _ => panic!("expected drag"),
        }
    }

    #[test]
    fn global_store_flag() {
        let cli = Cli::try_parse_from(["sb", "show", "-C", "/tmp/board"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/board")));
        assert!(matches!(cli.command, Some(Commands::Show)));
    }
}
