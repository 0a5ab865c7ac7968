//! Opening prolog composition.
//!
//! Every new room gets a three-part scene-setting message: an opening image,
//! a looming threat, and a hook that points the party at the action.

use crate::infrastructure::ports::RandomPort;

const PROLOGS: &[&str] = &[
    "The mists lift to reveal a forgotten vale of basalt spires and emberlit ruins.",
    "A silver storm hangs over the coast, and every wave whispers a name.",
    "Deep beneath the trade roads, a vault of singing stone wakes from its long sleep.",
    "The kingdom's last lighthouse burns green tonight, calling travelers toward the shoals.",
    "A city of brass gears turns for the first time in a century, and the streets hum.",
];

const THREATS: &[&str] = &[
    "A pact-bound warband marches under a broken banner.",
    "Something ancient stirs beneath the catacombs, rattling the saints' bones.",
    "A jealous archmage has sealed the sun in a mirrored sky.",
    "The forest has begun to move, one rooted step at a time.",
    "A masked tribunal searches for a stolen relic that can rewrite fate.",
];

const HOOKS: &[&str] = &[
    "A courier collapses at your feet with a map burned into their palm.",
    "The innkeeper offers you free rooms if you investigate the lights in the marsh.",
    "A child's song names each of you and the road you must walk.",
    "An old rival arrives with a sealed letter from the crown.",
    "A caravan master begs for protection on a cursed crossing.",
];

fn pick<'a>(random: &dyn RandomPort, table: &[&'a str]) -> &'a str {
    let idx = random.gen_range(0, table.len() as i32 - 1).max(0) as usize;
    table[idx % table.len()]
}

/// One prolog fragment from each table, joined with spaces.
pub fn compose(random: &dyn RandomPort) -> String {
    format!(
        "{} {} {}",
        pick(random, PROLOGS),
        pick(random, THREATS),
        pick(random, HOOKS)
    )
}
