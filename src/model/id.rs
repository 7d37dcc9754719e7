use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;

use super::board::EntityKind;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Prefix used when minting ids for an entity kind
pub fn id_prefix(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::List => "list",
        EntityKind::SubList => "sub",
        EntityKind::Sticker => "sticker",
    }
}

/// Mint a fresh id: `{prefix}-{unix millis}-{9 random base36 chars}`.
///
/// Uniqueness against an existing board is the caller's job; see
/// `ops::id_repair::fresh_unique_id`.
pub fn generate_id(kind: EntityKind) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}-{}", id_prefix(kind), millis, suffix)
}

fn id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.:-]+$").expect("static id pattern"))
}

/// Whether `id` can be used as-is: non-empty, no whitespace or markup.
pub fn is_well_formed(id: &str) -> bool {
    id_re().is_match(id)
}
