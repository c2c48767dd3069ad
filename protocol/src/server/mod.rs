pub mod battle;
pub mod battle_init;
pub mod battle_major;
pub mod battle_minor;
pub mod battle_progress;
pub mod request;


use anyhow::Result;
use serde_json::Value;

pub use battle::{
    Effect, GameType, HpStatus, Player, Pokemon, PokemonDetails, Side, Stat, Tags, to_id,
};
pub use request::{ActivePokemon, BattleRequest, MoveSlot, PokemonStats, SideInfo, SidePokemon};

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    // === Battle initialization ===
    BattlePlayer {
        player: Player,
        username: String,
        avatar: String,
        rating: Option<u32>,
    },
    TeamSize {
        player: Player,
        size: u8,
    },
    GameType(GameType),
    Gen(u8),
    Tier(String),
    Rated(Option<String>),
    Rule(String),
    ClearPoke,
    Poke {
        player: Player,
        details: PokemonDetails,
        has_item: bool,
    },
    TeamPreview(Option<u8>),
    BattleStart,

    // === Battle progress ===
    Request(Value),
    Inactive(String),
    InactiveOff(String),
    Upkeep,
    Turn(u32),
    Win(String),
    Tie,
    NoInit {
        reason: String,
        args: Vec<String>,
    },
    /// The next line is the owner's exact copy, the one after it the public copy
    Split(Player),

    // === Major actions ===
    Move {
        pokemon: Pokemon,
        move_name: String,
        target: Option<Pokemon>,
        tags: Tags,
    },
    Switch {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
        tags: Tags,
    },
    Drag {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
        tags: Tags,
    },
    DetailsChange {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    FormeChange {
        pokemon: Pokemon,
        species: String,
        hp_status: Option<HpStatus>,
        tags: Tags,
    },
    Replace {
        pokemon: Pokemon,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    Swap {
        pokemon: Pokemon,
        position: u8,
    },
    Cant {
        pokemon: Pokemon,
        reason: Effect,
        move_name: Option<String>,
    },
    Faint(Pokemon),

    // === Minor actions ===
    Fail {
        pokemon: Pokemon,
        action: Option<String>,
        tags: Tags,
    },
    Block {
        pokemon: Pokemon,
        effect: Effect,
        move_name: Option<String>,
        attacker: Option<Pokemon>,
    },
    NoTarget(Option<Pokemon>),
    Miss {
        source: Pokemon,
        target: Option<Pokemon>,
    },
    Damage {
        pokemon: Pokemon,
        hp_status: Option<HpStatus>,
        tags: Tags,
    },
    Heal {
        pokemon: Pokemon,
        hp_status: Option<HpStatus>,
        tags: Tags,
    },
    SetHp {
        pokemon: Pokemon,
        hp_status: Option<HpStatus>,
    },
    Status {
        pokemon: Pokemon,
        status: String,
        tags: Tags,
    },
    CureStatus {
        pokemon: Pokemon,
        status: String,
        tags: Tags,
    },
    CureTeam(Pokemon),
    Boost {
        pokemon: Pokemon,
        stat: Stat,
        amount: i8,
        tags: Tags,
    },
    Unboost {
        pokemon: Pokemon,
        stat: Stat,
        amount: i8,
        tags: Tags,
    },
    SetBoost {
        pokemon: Pokemon,
        stat: Stat,
        amount: i8,
    },
    SwapBoost {
        source: Pokemon,
        target: Pokemon,
        stats: Vec<Stat>,
    },
    InvertBoost(Pokemon),
    ClearBoost(Pokemon),
    ClearAllBoost,
    ClearPositiveBoost {
        target: Pokemon,
        source: Option<Pokemon>,
        effect: String,
    },
    ClearNegativeBoost(Pokemon),
    CopyBoost {
        source: Pokemon,
        target: Pokemon,
    },
    Weather {
        weather: String,
        upkeep: bool,
        tags: Tags,
    },
    FieldStart {
        condition: Effect,
        tags: Tags,
    },
    FieldEnd {
        condition: Effect,
    },
    SideStart {
        side: Side,
        condition: Effect,
    },
    SideEnd {
        side: Side,
        condition: Effect,
        tags: Tags,
    },
    SwapSideConditions,
    VolatileStart {
        pokemon: Pokemon,
        effect: Effect,
        args: Vec<String>,
        tags: Tags,
    },
    VolatileEnd {
        pokemon: Pokemon,
        effect: Effect,
        tags: Tags,
    },
    Crit(Pokemon),
    SuperEffective(Pokemon),
    Resisted(Pokemon),
    Immune {
        pokemon: Pokemon,
        tags: Tags,
    },
    Item {
        pokemon: Pokemon,
        item: String,
        tags: Tags,
    },
    EndItem {
        pokemon: Pokemon,
        item: String,
        tags: Tags,
    },
    Ability {
        pokemon: Pokemon,
        ability: String,
        args: Vec<String>,
        tags: Tags,
    },
    EndAbility(Pokemon),
    Transform {
        pokemon: Pokemon,
        target: Pokemon,
        tags: Tags,
    },
    Mega {
        pokemon: Pokemon,
        megastone: String,
    },
    Primal(Pokemon),
    Burst {
        pokemon: Pokemon,
        species: String,
        item: String,
    },
    ZPower(Pokemon),
    ZBroken(Pokemon),
    Terastallize {
        pokemon: Pokemon,
        tera_type: String,
    },
    Activate {
        pokemon: Option<Pokemon>,
        effect: Effect,
        args: Vec<String>,
        tags: Tags,
    },
    Hint(String),
    Center,
    Message(String),
    Combine,
    Waiting {
        source: Pokemon,
        target: Pokemon,
    },
    Prepare {
        attacker: Pokemon,
        move_name: String,
        defender: Option<Pokemon>,
    },
    MustRecharge(Pokemon),
    Nothing,
    HitCount {
        pokemon: Pokemon,
        count: u8,
    },
    SingleMove {
        pokemon: Pokemon,
        move_name: Effect,
    },
    SingleTurn {
        pokemon: Pokemon,
        move_name: Effect,
    },

    Raw(String),
}

impl ServerMessage {
    /// The pokemon performing or receiving the event, for per-pokemon scans
    pub fn subject(&self) -> Option<&Pokemon> {
        match self {
            ServerMessage::Move { pokemon, .. }
            | ServerMessage::Switch { pokemon, .. }
            | ServerMessage::Drag { pokemon, .. }
            | ServerMessage::Cant { pokemon, .. }
            | ServerMessage::Faint(pokemon)
            | ServerMessage::Damage { pokemon, .. }
            | ServerMessage::Heal { pokemon, .. }
            | ServerMessage::Status { pokemon, .. }
            | ServerMessage::Item { pokemon, .. }
            | ServerMessage::EndItem { pokemon, .. }
            | ServerMessage::Ability { pokemon, .. }
            | ServerMessage::Immune { pokemon, .. }
            | ServerMessage::VolatileStart { pokemon, .. }
            | ServerMessage::VolatileEnd { pokemon, .. } => Some(pokemon),
            ServerMessage::Activate { pokemon, .. } => pokemon.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerFrame {
    pub room_id: Option<String>,
    pub messages: Vec<ServerMessage>,
}

/// Parse a complete WebSocket frame into structured messages
pub fn parse_server_frame(frame: &str) -> Result<ServerFrame> {
    let (room_id, lines) = split_frame(frame);

    let messages: Vec<ServerMessage> = lines
        .into_iter()
        .map(parse_server_message)
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ServerFrame { room_id, messages })
}

/// Split a frame into its optional `>ROOMID` header and its non-empty lines
pub fn split_frame(frame: &str) -> (Option<String>, Vec<&str>) {
    let mut lines = frame.lines().peekable();
    let mut room_id = None;

    if let Some(room) = lines.peek().and_then(|l| l.strip_prefix('>')) {
        room_id = Some(room.trim().to_string());
        lines.next();
    }

    let lines = lines.filter(|line| !line.trim().is_empty()).collect();
    (room_id, lines)
}

/// Parse a single line from the server into a ServerMessage
pub fn parse_server_message(line: &str) -> Result<ServerMessage> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(ServerMessage::Raw(String::new()));
    }

    if !line.starts_with('|') {
        return Ok(ServerMessage::Raw(line.to_string()));
    }

    let parts: Vec<&str> = line.split('|').collect();

    if parts.len() < 2 {
        return Ok(ServerMessage::Raw(line.to_string()));
    }

    match parts[1] {
        // Battle initialization
        "player" => battle_init::parse_player_line(&parts),
        "teamsize" => battle_init::parse_teamsize(&parts),
        "gametype" => battle_init::parse_gametype(&parts),
        "gen" => battle_init::parse_gen(&parts),
        "tier" => battle_init::parse_tier(&parts),
        "rated" => battle_init::parse_rated(&parts),
        "rule" => battle_init::parse_rule(&parts),
        "clearpoke" => Ok(ServerMessage::ClearPoke),
        "poke" => battle_init::parse_poke(&parts),
        "teampreview" => battle_init::parse_teampreview(&parts),
        "start" => Ok(ServerMessage::BattleStart),

        // Battle progress
        "request" => battle_progress::parse_request(&parts),
        "inactive" => battle_progress::parse_inactive(&parts),
        "inactiveoff" => battle_progress::parse_inactiveoff(&parts),
        "upkeep" => Ok(ServerMessage::Upkeep),
        "turn" => battle_progress::parse_turn(&parts),
        "win" => battle_progress::parse_win(&parts),
        "tie" => Ok(ServerMessage::Tie),
        "noinit" => battle_progress::parse_noinit(&parts),
        "split" => battle_progress::parse_split(&parts),

        // Major actions
        "move" => battle_major::parse_move(&parts),
        "switch" => battle_major::parse_switch(&parts),
        "drag" => battle_major::parse_drag(&parts),
        "detailschange" => battle_major::parse_detailschange(&parts),
        "-formechange" => battle_major::parse_formechange(&parts),
        "replace" => battle_major::parse_replace(&parts),
        "swap" => battle_major::parse_swap(&parts),
        "cant" => battle_major::parse_cant(&parts),
        "faint" => battle_major::parse_faint(&parts),

        // Minor actions
        "-fail" => battle_minor::parse_fail(&parts),
        "-block" => battle_minor::parse_block(&parts),
        "-notarget" => battle_minor::parse_notarget(&parts),
        "-miss" => battle_minor::parse_miss(&parts),
        "-damage" => battle_minor::parse_damage(&parts),
        "-heal" => battle_minor::parse_heal(&parts),
        "-sethp" => battle_minor::parse_sethp(&parts),
        "-status" => battle_minor::parse_status(&parts),
        "-curestatus" => battle_minor::parse_curestatus(&parts),
        "-cureteam" => battle_minor::parse_cureteam(&parts),
        "-boost" => battle_minor::parse_boost(&parts),
        "-unboost" => battle_minor::parse_unboost(&parts),
        "-setboost" => battle_minor::parse_setboost(&parts),
        "-swapboost" => battle_minor::parse_swapboost(&parts),
        "-invertboost" => battle_minor::parse_invertboost(&parts),
        "-clearboost" => battle_minor::parse_clearboost(&parts),
        "-clearallboost" => Ok(ServerMessage::ClearAllBoost),
        "-clearpositiveboost" => battle_minor::parse_clearpositiveboost(&parts),
        "-clearnegativeboost" => battle_minor::parse_clearnegativeboost(&parts),
        "-copyboost" => battle_minor::parse_copyboost(&parts),
        "-weather" => battle_minor::parse_weather(&parts),
        "-fieldstart" => battle_minor::parse_fieldstart(&parts),
        "-fieldend" => battle_minor::parse_fieldend(&parts),
        "-sidestart" => battle_minor::parse_sidestart(&parts),
        "-sideend" => battle_minor::parse_sideend(&parts),
        "-swapsideconditions" => Ok(ServerMessage::SwapSideConditions),
        "-start" => battle_minor::parse_start(&parts),
        "-end" => battle_minor::parse_end(&parts),
        "-crit" => battle_minor::parse_crit(&parts),
        "-supereffective" => battle_minor::parse_supereffective(&parts),
        "-resisted" => battle_minor::parse_resisted(&parts),
        "-immune" => battle_minor::parse_immune(&parts),
        "-item" => battle_minor::parse_item(&parts),
        "-enditem" => battle_minor::parse_enditem(&parts),
        "-ability" => battle_minor::parse_ability(&parts),
        "-endability" => battle_minor::parse_endability(&parts),
        "-transform" => battle_minor::parse_transform(&parts),
        "-mega" => battle_minor::parse_mega(&parts),
        "-primal" => battle_minor::parse_primal(&parts),
        "-burst" => battle_minor::parse_burst(&parts),
        "-zpower" => battle_minor::parse_zpower(&parts),
        "-zbroken" => battle_minor::parse_zbroken(&parts),
        "-terastallize" => battle_minor::parse_terastallize(&parts),
        "-activate" => battle_minor::parse_activate(&parts),
        "-hint" => battle_minor::parse_hint(&parts),
        "-center" => Ok(ServerMessage::Center),
        "-message" => battle_minor::parse_message(&parts),
        "-combine" => Ok(ServerMessage::Combine),
        "-waiting" => battle_minor::parse_waiting(&parts),
        "-prepare" => battle_minor::parse_prepare(&parts),
        "-mustrecharge" => battle_minor::parse_mustrecharge(&parts),
        "-nothing" => Ok(ServerMessage::Nothing),
        "-hitcount" => battle_minor::parse_hitcount(&parts),
        "-singlemove" => battle_minor::parse_singlemove(&parts),
        "-singleturn" => battle_minor::parse_singleturn(&parts),

        _ => Ok(ServerMessage::Raw(line.to_string())),
    }
}
