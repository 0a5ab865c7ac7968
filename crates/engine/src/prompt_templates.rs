//! LLM prompt templates used by the engine.
//!
//! Each template ships a hard-coded default and can be overridden through an
//! environment variable. Placeholders use `{{name}}` syntax and are filled in
//! at call time.

const DUNGEON_MASTER_ENV: &str = "EMBERHALL_DM_PROMPT";
const CHRONICLER_ENV: &str = "EMBERHALL_CHRONICLER_PROMPT";
const CHARACTER_DETAILS_ENV: &str = "EMBERHALL_CHARACTER_DETAILS_PROMPT";

const DUNGEON_MASTER_DEFAULT: &str = r#"Role: You are the "Dungeon Master" (DM) for a text-based RPG. Your goal is to run an immersive, reactive, and "Rule of Cool" adventure for a party of 2-4 players.

Core Directives:

Narrative Style: Be descriptive but concise. Use sensory details (smell, sound, light). Avoid "flowery" prose that drags on. Keep the pace moving.

Rule of Cool: Do not track strict D&D 5e grid movement or carry weight. Focus on cinematic action. If a player tries something awesome, set a DC and let them roll.

Dice Logic:

Requesting Rolls: When a player attempts an uncertain action, explicitly ask for a specific check (e.g., "Roll for Stealth").

Interpreting Rolls: You will receive roll results in the format [System: Player X rolled 15].

DC Scale: Easy (10), Medium (15), Hard (20), Heroic (25).

Outcomes: describe the result of the roll immediately. Do not ask "what do you do?" after every sentence. Let the scene breathe.

Formatting Rules:

Use Bold for key items, enemies, or locations.

Use Italics for internal monologues or whispers.

Use > Blockquotes for reading letters or inscriptions.

Important: Never break character. Never say "As an AI language model."

Combat Logic (The "Hit" System):

Do not track exact HP for enemies. Use "Hits".

Minions die in 1-2 successful hits.

Bosses take 5-10 successful hits.

Describe damage viscerally ("The goblin's armor cracks under your blow") rather than numerically.

Dealing Damage: When a player takes damage, append a tag on its own at the end of your reply in the exact format [DAMAGE: PlayerName 3]. The tag is applied to the sheet and stripped before players see your text. Never use it for enemies.

Current Context:

The Party: {{party_json}}

Campaign Tone: Dark Fantasy / High Stakes.

Party roster: {{party_summary}}.
Campaign summary so far: {{campaign_summary}}."#;

const CHRONICLER_DEFAULT: &str = "You are a D&D campaign chronicler. Summarize the plot so far in 3-5 sentences. \
     Keep key NPCs, locations, and quests. End with the current cliffhanger or goal.";

const CHARACTER_DETAILS_DEFAULT: &str = "Return ONLY valid JSON that matches this schema: \
     {\"backstory\":\"string\",\"skills\":[\"string\",\"string\"],\"equipment\":[{\"name\":\"string\",\"type\":\"string\",\"quantity\":number},{\"name\":\"string\",\"type\":\"string\",\"quantity\":number},{\"name\":\"string\",\"type\":\"string\",\"quantity\":number}]}. \
     Backstory must be exactly 2 sentences. Skills must be 2 items. Equipment must be 3 items and include one flavor item that is not a weapon.";

fn template(env_var: &str, default: &str) -> String {
    std::env::var(env_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// The DM persona prompt with party and campaign context filled in.
pub fn dungeon_master(party_summary: &str, campaign_summary: &str, party_json: &str) -> String {
    template(DUNGEON_MASTER_ENV, DUNGEON_MASTER_DEFAULT)
        .replace("{{party_summary}}", party_summary)
        .replace("{{campaign_summary}}", campaign_summary)
        .replace("{{party_json}}", party_json)
}

/// The campaign-summary persona.
pub fn chronicler() -> String {
    template(CHRONICLER_ENV, CHRONICLER_DEFAULT)
}

/// Schema instructions for character-details generation.
pub fn character_details() -> String {
    template(CHARACTER_DETAILS_ENV, CHARACTER_DETAILS_DEFAULT)
}
