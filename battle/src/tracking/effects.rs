//! HP, status, boost, volatile, item and ability lines

use std::sync::Arc;

use scry_protocol::server::{Effect, HpStatus, Pokemon, Stat, Tags, to_id};
use tracing::{debug, trace};

use super::battle::TrackedBattle;
use crate::types::{
    Item, PreTransform, SideCondition, SideRole, StatSpread, Status, Type, Volatile,
};

/// Moves that take the target's item and leave it with nothing
const ITEM_REMOVERS: &[&str] = &["knockoff", "thief", "covet", "corrosivegas"];

/// Moves that stop the target from using the move named alongside them
const MOVE_LOCKS: &[&str] = &["disable", "encore"];

/// Transform gives every copied move this much pp
const TRANSFORM_PP: u8 = 5;

impl TrackedBattle {
    /// Reveal a `[from] ability:`/`[from] item:` source on `owner`
    pub(crate) fn reveal_source(&mut self, owner: &Pokemon, tags: &Tags) {
        let Some(from) = &tags.from else {
            return;
        };
        let Some(pokemon) = self.pokemon_mut(owner) else {
            return;
        };
        match from {
            Effect::Ability(name) => pokemon.reveal_ability(&to_id(name)),
            Effect::Item(name) => pokemon.reveal_item(&to_id(name)),
            _ => {}
        }
    }

    // === HP ===

    pub(crate) fn handle_hp_change(
        &mut self,
        ident: &Pokemon,
        hp_status: Option<&HpStatus>,
        tags: &Tags,
        heal: bool,
    ) {
        let role = self.role(ident.player);
        let from = tags.from_id();

        if heal && from.as_deref() == Some("revivalblessing") {
            self.revive(ident);
            return;
        }

        // Damage sources like Rough Skin or Rocky Helmet belong to the `[of]` Pokemon;
        // healing always comes from the healed Pokemon's own ability or item
        let owner = match (heal, &tags.of) {
            (false, Some(of)) => of,
            _ => ident,
        };
        match &tags.from {
            Some(Effect::Ability(name)) => {
                if let Some(pokemon) = self.pokemon_mut(owner) {
                    pokemon.reveal_ability(&to_id(name));
                }
            }
            Some(Effect::Item(name)) => {
                if let Some(pokemon) = self.pokemon_mut(owner)
                    && pokemon.item != Item::Empty
                {
                    pokemon.reveal_item(&to_id(name));
                }
            }
            _ => {}
        }

        let side = self.side_mut(ident.player);
        match from.as_deref() {
            Some("healingwish" | "lunardance") if heal => {
                side.remove_condition(SideCondition::HealingWish);
            }
            Some("psn") if !heal => {
                let badly_poisoned = hp_status.and_then(|hp| hp.status.as_deref()) == Some("tox")
                    || side
                        .active
                        .as_ref()
                        .is_some_and(|p| p.status == Some(Status::BadPoison));
                if badly_poisoned {
                    let count = side.condition(SideCondition::ToxicCount);
                    side.set_condition(SideCondition::ToxicCount, count.saturating_add(1));
                }
            }
            _ => {}
        }

        if let (Some(pokemon), Some(hp)) = (self.pokemon_mut(ident), hp_status) {
            pokemon.apply_hp_status(hp, role == SideRole::User);
        }
    }

    /// Revival Blessing names a fainted benched Pokemon with an active-slot identifier
    fn revive(&mut self, ident: &Pokemon) {
        let side = self.side_mut(ident.player);
        let Some(pokemon) = side
            .reserve
            .iter_mut()
            .find(|p| p.fainted && p.answers_to(&ident.name))
        else {
            debug!(name = %ident.name, "revived Pokemon not found in reserve");
            return;
        };
        pokemon.fainted = false;
        pokemon.status = None;
        pokemon.hp = pokemon.max_hp / 2;
    }

    // === Status ===

    pub(crate) fn handle_status(&mut self, ident: &Pokemon, status: &str, tags: &Tags) {
        let Some(status) = Status::from_protocol(status) else {
            debug!(status, "ignoring unknown status");
            return;
        };

        match &tags.from {
            Some(Effect::Ability(_)) => self.reveal_source(tags.of.as_ref().unwrap_or(ident), tags),
            Some(Effect::Item(_)) => self.reveal_source(ident, tags),
            _ => {}
        }

        let rest = tags.from_id().as_deref() == Some("rest");
        let Some(pokemon) = self.pokemon_mut(ident) else {
            return;
        };
        pokemon.status = Some(status);
        pokemon.exclude_item("lumberry");
        if status == Status::Sleep {
            pokemon.sleep_turns = 0;
            pokemon.rest_turns = if rest { 3 } else { 0 };
        }
    }

    pub(crate) fn handle_cure_status(&mut self, ident: &Pokemon, status: &str, tags: &Tags) {
        if let Some(Effect::Ability(_)) = &tags.from {
            self.reveal_source(ident, tags);
        }

        if let Some(pokemon) = self.pokemon_mut(ident) {
            pokemon.status = None;
            pokemon.sleep_turns = 0;
            pokemon.rest_turns = 0;
        }

        if Status::from_protocol(status) == Some(Status::BadPoison) {
            self.side_mut(ident.player)
                .remove_condition(SideCondition::ToxicCount);
        }
    }

    // === Boosts ===

    pub(crate) fn handle_boost(&mut self, ident: &Pokemon, stat: Stat, amount: i8, tags: &Tags) {
        self.reveal_source(tags.of.as_ref().unwrap_or(ident), tags);

        let Some(pokemon) = self.pokemon_mut(ident) else {
            return;
        };
        let applied = pokemon.boosts.boost(stat, amount);
        if applied != amount {
            trace!(
                species = pokemon.species(),
                stat = stat.as_str(),
                amount,
                applied,
                "boost limit reached"
            );
        }
    }

    // === Volatiles ===

    pub(crate) fn handle_volatile_start(
        &mut self,
        ident: &Pokemon,
        effect: &Effect,
        args: &[String],
        tags: &Tags,
    ) {
        let id = effect.id();
        if matches!(id.as_str(), "futuresight" | "doomdesire") {
            // Announced on the user, hits whoever is across in two turns
            let side = self.side_mut(ident.player);
            let user = side
                .active
                .as_ref()
                .map(|p| p.species().to_string())
                .unwrap_or_else(|| to_id(&ident.name));
            side.future_sight = (3, user);
            return;
        }

        self.reveal_source(tags.of.as_ref().unwrap_or(ident), tags);

        let from = tags.from_id();
        let copied_types = match (from.as_deref(), &tags.of) {
            (Some("reflecttype"), Some(of)) => self.pokemon(of).map(|p| p.types.clone()),
            _ => None,
        };
        let dex = Arc::clone(&self.dex);
        let volatile = Volatile::from_id(&id);

        let Some(pokemon) = self.pokemon_mut(ident) else {
            return;
        };
        if let Effect::Ability(name) = effect {
            pokemon.reveal_ability(&to_id(name));
        }

        match &volatile {
            Volatile::TypeChange => {
                pokemon.types = match copied_types {
                    Some(types) => types,
                    None => args.first().map(|a| Type::parse_list(a)).unwrap_or_default(),
                };
            }
            Volatile::Dynamax if !pokemon.has_volatile(&Volatile::Dynamax) => {
                pokemon.hp *= 2;
                pokemon.max_hp *= 2;
            }
            Volatile::SlowStart => pokemon.set_volatile_duration(Volatile::SlowStart, 6),
            Volatile::Substitute => pokemon.substitute_hit = false,
            Volatile::Confusion => {
                pokemon.exclude_item("lumberry");
                if tags.has_flag("fatigue") {
                    pokemon.remove_volatile(&Volatile::LockedMove);
                }
            }
            _ => {}
        }

        if MOVE_LOCKS.contains(&id.as_str())
            && let Some(name) = args.first()
        {
            let move_id = to_id(name);
            let max_pp = dex.move_data(&move_id).map(|d| d.max_pp()).unwrap_or(0);
            pokemon.add_move(&move_id, max_pp);
        }

        let shed_tail = volatile == Volatile::Substitute && from.as_deref() == Some("shedtail");
        pokemon.add_volatile(volatile);
        if shed_tail {
            self.side_mut(ident.player).shed_tailing = true;
        }
    }

    pub(crate) fn handle_volatile_end(&mut self, ident: &Pokemon, effect: &Effect, _tags: &Tags) {
        let id = effect.id();
        if matches!(id.as_str(), "futuresight" | "doomdesire") {
            return;
        }

        let Some(pokemon) = self.pokemon_mut(ident) else {
            return;
        };

        if matches!(id.as_str(), "protosynthesis" | "quarkdrive") {
            pokemon
                .volatiles
                .retain(|v| !matches!(v, Volatile::ParadoxBoost(_)));
            pokemon
                .volatile_durations
                .retain(|v, _| !matches!(v, Volatile::ParadoxBoost(_)));
            return;
        }

        let volatile = Volatile::from_id(&id);
        match volatile {
            Volatile::Dynamax if pokemon.has_volatile(&Volatile::Dynamax) => {
                pokemon.hp = pokemon.hp.div_ceil(2);
                pokemon.max_hp = pokemon.max_hp.div_ceil(2);
            }
            Volatile::Substitute => pokemon.substitute_hit = false,
            _ => {}
        }
        pokemon.remove_volatile(&volatile);
    }

    /// `-singleturn`: the protect family leaves a counter on the side
    pub(crate) fn handle_single_turn(&mut self, ident: &Pokemon, effect: &Effect) {
        if matches!(
            Volatile::from_id(&effect.id()),
            Volatile::Protect | Volatile::Endure
        ) {
            self.side_mut(ident.player)
                .set_condition(SideCondition::Protect, 2);
        }
    }

    // === Items ===

    pub(crate) fn handle_item(&mut self, ident: &Pokemon, item: &str, tags: &Tags) {
        let id = to_id(item);
        let from = tags.from_id();

        match (from.as_deref(), &tags.from) {
            (Some("trick" | "switcheroo"), _) => {
                let giver = self.role(ident.player).other();
                if let Some(giver) = self.battle.side_mut(giver).active.as_mut()
                    && giver.removed_item.is_none()
                {
                    giver.removed_item = Some(id.clone());
                }
                if let Some(pokemon) = self.pokemon_mut(ident)
                    && pokemon.removed_item.is_none()
                    && let Item::Held(previous) = &pokemon.item
                {
                    pokemon.removed_item = Some(previous.clone());
                }
            }
            // Frisk reveals the item of the Pokemon named, the ability of the one in `[of]`
            (Some("frisk"), _) => {
                if let Some(of) = &tags.of {
                    self.reveal_source(of, tags);
                }
            }
            (_, Some(Effect::Ability(_))) => self.reveal_source(ident, tags),
            _ => {}
        }

        if let Some(pokemon) = self.pokemon_mut(ident) {
            pokemon.reveal_item(&id);
        }
    }

    pub(crate) fn handle_end_item(&mut self, ident: &Pokemon, item: &str, tags: &Tags) {
        let id = to_id(item);
        let from = tags.from_id();

        if let Some(Effect::Ability(_)) = &tags.from {
            self.reveal_source(tags.of.as_ref().unwrap_or(ident), tags);
        }

        let Some(pokemon) = self.pokemon_mut(ident) else {
            return;
        };
        if from.as_deref().is_some_and(|f| ITEM_REMOVERS.contains(&f))
            && pokemon.removed_item.is_none()
        {
            pokemon.removed_item = Some(id.clone());
        }
        pokemon.item = Item::Empty;
        pokemon.item_inferred = false;
        if pokemon.ability.as_deref() == Some("unburden") {
            pokemon.add_volatile(Volatile::Unburden);
        }
        trace!(species = pokemon.species(), item = %id, "item gone");
    }

    // === Abilities ===

    pub(crate) fn handle_ability(&mut self, ident: &Pokemon, ability: &str, tags: &Tags) {
        let id = to_id(ability);

        if tags.from_id().as_deref() == Some("trace") {
            if let Some(of) = &tags.of
                && let Some(source) = self.pokemon_mut(of)
            {
                source.reveal_ability(&id);
            }
            if let Some(pokemon) = self.pokemon_mut(ident) {
                pokemon.reveal_ability(&id);
                pokemon.original_ability = Some("trace".to_string());
            }
            return;
        }

        let Some(pokemon) = self.pokemon_mut(ident) else {
            return;
        };

        // Calyrex riders announce both halves of As One
        let id = match (id.as_str(), pokemon.species()) {
            ("asone", "calyrexshadow") => "asonespectrier".to_string(),
            ("asone", "calyrexice") => "asoneglastrier".to_string(),
            _ => id,
        };
        if id == "unnerve"
            && pokemon
                .ability
                .as_deref()
                .is_some_and(|a| a.starts_with("asone"))
        {
            return;
        }

        // Skill Swap, Entrainment, Receiver and friends replace rather than reveal
        if tags.from.is_none() && pokemon.original_ability.is_none() {
            pokemon.original_ability = Some(id.clone());
        }
        pokemon.reveal_ability(&id);
    }

    pub(crate) fn handle_activate(
        &mut self,
        ident: &Pokemon,
        effect: &Effect,
        args: &[String],
        tags: &Tags,
    ) {
        let id = effect.id();
        match effect {
            Effect::Ability(_) if matches!(id.as_str(), "mummy" | "lingeringaroma") => {
                if let Some(of) = &tags.of
                    && let Some(attacker) = self.pokemon_mut(of)
                {
                    if attacker.original_ability.is_none() {
                        attacker.original_ability = args.first().map(|a| to_id(a));
                    }
                    attacker.ability = Some(id.clone());
                }
                if let Some(pokemon) = self.pokemon_mut(ident) {
                    pokemon.reveal_ability(&id);
                }
            }
            Effect::Ability(_) if id == "wanderingspirit" => {
                let theirs = args.first().map(|a| to_id(a));
                if let Some(of) = &tags.of
                    && let Some(attacker) = self.pokemon_mut(of)
                {
                    if attacker.original_ability.is_none() {
                        attacker.original_ability = theirs.clone();
                    }
                    attacker.ability = Some(id.clone());
                }
                if let Some(pokemon) = self.pokemon_mut(ident) {
                    if pokemon.original_ability.is_none() {
                        pokemon.original_ability = Some(id.clone());
                    }
                    pokemon.ability = theirs;
                }
            }
            Effect::Ability(_) => {
                if let Some(pokemon) = self.pokemon_mut(ident) {
                    pokemon.reveal_ability(&id);
                }
            }
            Effect::Item(_) => {
                if !tags.has_flag("consumed")
                    && let Some(pokemon) = self.pokemon_mut(ident)
                {
                    pokemon.reveal_item(&id);
                }
            }
            _ => {
                let Some(pokemon) = self.pokemon_mut(ident) else {
                    return;
                };
                match id.as_str() {
                    "poltergeist" => {
                        if let Some(item) = args.first() {
                            pokemon.reveal_item(&to_id(item));
                        }
                    }
                    "substitute" => {
                        if tags.has_flag("damage") {
                            pokemon.substitute_hit = true;
                        }
                    }
                    _ => {
                        let volatile = Volatile::from_id(&id);
                        if matches!(volatile, Volatile::PartiallyTrapped | Volatile::Trapped) {
                            pokemon.add_volatile(volatile);
                        }
                    }
                }
            }
        }
    }

    // === Transformations ===

    pub(crate) fn handle_transform(&mut self, ident: &Pokemon, target: &Pokemon, tags: &Tags) {
        let Some((ability, moves, types, boosts, stats)) = self.pokemon(target).map(|t| {
            (
                t.ability.clone(),
                t.moves.clone(),
                t.types.clone(),
                t.boosts.clone(),
                t.stats,
            )
        }) else {
            return;
        };
        let source = tags.from.as_ref().and_then(Effect::ability_id);

        let Some(pokemon) = self.pokemon_mut(ident) else {
            return;
        };
        if pokemon.pre_transform.is_none() {
            pokemon.pre_transform = Some(Box::new(PreTransform {
                moves: pokemon.moves.clone(),
                ability: pokemon.ability.clone(),
                types: pokemon.types.clone(),
                stats: pokemon.stats,
            }));
        }
        if let Some(source) = source {
            pokemon.original_ability = Some(source);
        }

        pokemon.ability = ability;
        pokemon.moves = moves
            .into_iter()
            .map(|mut m| {
                m.pp = TRANSFORM_PP;
                m.max_pp = TRANSFORM_PP;
                m
            })
            .collect();
        pokemon.types = types;
        pokemon.boosts = boosts;
        pokemon.stats.atk = stats.atk;
        pokemon.stats.def = stats.def;
        pokemon.stats.spa = stats.spa;
        pokemon.stats.spd = stats.spd;
        pokemon.stats.spe = stats.spe;
        pokemon.add_volatile(Volatile::Transform);
    }

    /// `-formechange`/`detailschange`: same individual, new species
    pub(crate) fn handle_forme_change(
        &mut self,
        ident: &Pokemon,
        species: &str,
        hp_status: Option<&HpStatus>,
    ) {
        let role = self.role(ident.player);
        let species = to_id(species);
        let dex = Arc::clone(&self.dex);

        let Some(pokemon) = self.pokemon_mut(ident) else {
            return;
        };
        if pokemon.species() != species {
            debug!(from = pokemon.species(), to = %species, "forme change");
            pokemon.identity.species = species.clone();
            if let Some(data) = dex.species(&species) {
                match role {
                    // Exact stats arrive with the next request
                    SideRole::User => pokemon.types = data.types.clone(),
                    SideRole::Opponent => pokemon.apply_species(data, StatSpread::RANDOM_BATTLE),
                }
            }
        }

        if let Some(hp) = hp_status {
            pokemon.apply_hp_status(hp, role == SideRole::User);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PokemonState, StatStages};

    fn battle_with_actives() -> TrackedBattle {
        let mut battle = TrackedBattle::new();
        battle.battle_mut().user.active = Some(PokemonState::new("Weedle", 100));
        battle.battle_mut().opponent.active = Some(PokemonState::new("Caterpie", 100));
        battle
    }

    fn opponent(battle: &TrackedBattle) -> &PokemonState {
        battle.battle().opponent.active.as_ref().unwrap()
    }

    fn opponent_mut(battle: &mut TrackedBattle) -> &mut PokemonState {
        battle.battle_mut().opponent.active.as_mut().unwrap()
    }

    fn user(battle: &TrackedBattle) -> &PokemonState {
        battle.battle().user.active.as_ref().unwrap()
    }

    fn user_mut(battle: &mut TrackedBattle) -> &mut PokemonState {
        battle.battle_mut().user.active.as_mut().unwrap()
    }

    // === HP ===

    #[test]
    fn test_damage_scales_opponent_hp() {
        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).max_hp = 200;
        opponent_mut(&mut battle).hp = 200;
        battle.apply_line("|-damage|p2a: Caterpie|80/100");
        assert_eq!(opponent(&battle).hp, 160);

        battle.apply_line("|-damage|p1a: Weedle|150/250");
        assert_eq!((user(&battle).hp, user(&battle).max_hp), (150, 250));

        battle.apply_line("|-damage|p2a: Caterpie|0 fnt");
        assert_eq!(opponent(&battle).hp, 0);
        assert!(opponent(&battle).fainted);
    }

    #[test]
    fn test_damage_source_ability_belongs_to_of() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-damage|p1a: Weedle|90/100|[from] ability: Iron Barbs|[of] p2a: Caterpie");
        assert_eq!(opponent(&battle).ability.as_deref(), Some("ironbarbs"));
        assert!(user(&battle).ability.is_none());

        battle.apply_line("|-damage|p2a: Caterpie|80/100|[from] ability: Solar Power");
        assert_eq!(opponent(&battle).ability.as_deref(), Some("solarpower"));
    }

    #[test]
    fn test_damage_source_item_ownership() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-damage|p1a: Weedle|90/100|[from] item: Rocky Helmet|[of] p2a: Caterpie");
        assert!(opponent(&battle).item.is("rockyhelmet"));
        assert!(user(&battle).item.is_unknown());

        let mut battle = battle_with_actives();
        battle.apply_line("|-damage|p2a: Caterpie|90/100|[from] item: Life Orb");
        assert!(opponent(&battle).item.is("lifeorb"));

        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).item = Item::Empty;
        battle.apply_line("|-damage|p1a: Weedle|90/100|[from] item: Rocky Helmet|[of] p2a: Caterpie");
        assert_eq!(opponent(&battle).item, Item::Empty);
    }

    #[test]
    fn test_heal_source_belongs_to_healed_pokemon() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-heal|p2a: Caterpie|50/100|[from] ability: Volt Absorb|[of] p1a: Weedle");
        assert_eq!(opponent(&battle).ability.as_deref(), Some("voltabsorb"));
        assert!(user(&battle).ability.is_none());

        battle.apply_line("|-heal|p2a: Caterpie|56/100|[from] item: Leftovers");
        assert!(opponent(&battle).item.is("leftovers"));
    }

    #[test]
    fn test_healing_wish_heal_clears_flag() {
        let mut battle = battle_with_actives();
        battle
            .battle_mut()
            .opponent
            .set_condition(SideCondition::HealingWish, 1);
        battle.apply_line("|-heal|p2a: Caterpie|100/100|[from] move: Healing Wish");
        assert_eq!(battle.battle().opponent.condition(SideCondition::HealingWish), 0);
    }

    #[test]
    fn test_toxic_damage_advances_counter() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-damage|p2a: Caterpie|94/100 tox|[from] psn");
        assert_eq!(battle.battle().opponent.condition(SideCondition::ToxicCount), 1);
        battle.apply_line("|-damage|p2a: Caterpie|82/100 tox|[from] psn");
        assert_eq!(battle.battle().opponent.condition(SideCondition::ToxicCount), 2);

        battle.apply_line("|-damage|p2a: Caterpie|72/100 tox|[from] item: Life Orb");
        assert_eq!(battle.battle().opponent.condition(SideCondition::ToxicCount), 2);

        // Regular poison does not count
        let mut battle = battle_with_actives();
        battle.apply_line("|-damage|p2a: Caterpie|88/100 psn|[from] psn");
        assert_eq!(battle.battle().opponent.condition(SideCondition::ToxicCount), 0);
    }

    #[test]
    fn test_revival_blessing_revives_benched_pokemon() {
        let mut battle = battle_with_actives();
        let mut sus = PokemonState::new("Amoonguss", 100);
        sus.identity.nickname = Some("Sus".to_string());
        sus.max_hp = 220;
        sus.hp = 0;
        sus.fainted = true;
        battle.battle_mut().opponent.reserve.push(sus);

        battle.apply_line("|-heal|p2a: Sus|50/100|[from] move: Revival Blessing");
        let sus = &battle.battle().opponent.reserve[0];
        assert!(!sus.fainted);
        assert_eq!(sus.hp, 110);
        // The active Pokemon is untouched
        assert_eq!(opponent(&battle).hp, 100);
    }

    // === Status ===

    #[test]
    fn test_status_from_contact_ability() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-status|p1a: Weedle|brn|[from] ability: Flame Body|[of] p2a: Caterpie");
        assert_eq!(user(&battle).status, Some(Status::Burn));
        assert_eq!(opponent(&battle).ability.as_deref(), Some("flamebody"));
    }

    #[test]
    fn test_status_from_item_reveals_it() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-status|p2a: Caterpie|brn|[from] item: Flame Orb");
        assert!(opponent(&battle).item.is("flameorb"));
        assert!(opponent(&battle).impossible_items.contains("lumberry"));
    }

    #[test]
    fn test_rest_sets_three_turns() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-status|p2a: Caterpie|slp|[from] move: Rest");
        assert_eq!(opponent(&battle).rest_turns, 3);

        let mut battle = battle_with_actives();
        battle.apply_line("|-status|p2a: Caterpie|slp|[from] move: Spore");
        assert_eq!((opponent(&battle).rest_turns, opponent(&battle).sleep_turns), (0, 0));
    }

    #[test]
    fn test_cure_status() {
        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).status = Some(Status::BadPoison);
        battle
            .battle_mut()
            .opponent
            .set_condition(SideCondition::ToxicCount, 3);
        battle.apply_line("|-curestatus|p2: Caterpie|tox|[msg]");
        assert_eq!(opponent(&battle).status, None);
        assert_eq!(battle.battle().opponent.condition(SideCondition::ToxicCount), 0);
    }

    #[test]
    fn test_cure_status_on_benched_pokemon() {
        let mut battle = battle_with_actives();
        let mut pikachu = PokemonState::new("Pikachu", 100);
        pikachu.status = Some(Status::Sleep);
        pikachu.sleep_turns = 1;
        pikachu.rest_turns = 1;
        battle.battle_mut().opponent.reserve.push(pikachu);

        battle.apply_line("|-curestatus|p2: Pikachu|slp|[msg]");
        let pikachu = &battle.battle().opponent.reserve[0];
        assert_eq!(pikachu.status, None);
        assert_eq!((pikachu.sleep_turns, pikachu.rest_turns), (0, 0));
    }

    // === Boosts ===

    #[test]
    fn test_intimidate_unboost_reveals_on_of() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-unboost|p1a: Weedle|atk|1|[from] ability: Intimidate|[of] p2a: Caterpie");
        assert_eq!(user(&battle).boosts.atk, -1);
        assert_eq!(opponent(&battle).ability.as_deref(), Some("intimidate"));
    }

    // === Volatiles ===

    #[test]
    fn test_volatile_start_basics() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-start|p2a: Caterpie|Encore");
        battle.apply_line("|-start|p2a: Caterpie|Encore");
        battle.apply_line("|-start|p1a: Weedle|move: Taunt");
        assert!(opponent(&battle).has_volatile(&Volatile::Encore));
        assert_eq!(opponent(&battle).volatiles.len(), 1);
        assert!(user(&battle).has_volatile(&Volatile::Taunt));

        battle.apply_line("|-start|p2a: Caterpie|Slow Start");
        assert_eq!(opponent(&battle).volatile_duration(&Volatile::SlowStart), 6);

        battle.apply_line("|-start|p1a: Weedle|ability: Flash Fire");
        assert_eq!(user(&battle).ability.as_deref(), Some("flashfire"));
        assert!(user(&battle).has_volatile(&Volatile::FlashFire));
    }

    #[test]
    fn test_future_sight_is_a_side_counter() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-start|p2a: Caterpie|Future Sight");
        assert_eq!(battle.battle().opponent.future_sight, (3, "caterpie".to_string()));
        assert!(opponent(&battle).volatiles.is_empty());
    }

    #[test]
    fn test_substitute_and_shed_tail() {
        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).substitute_hit = true;
        battle.apply_line("|-start|p2a: Caterpie|Substitute");
        assert!(!opponent(&battle).substitute_hit);
        assert!(!battle.battle().opponent.shed_tailing);

        battle.apply_line("|-start|p1a: Weedle|Substitute|[from] move: Shed Tail");
        assert!(battle.battle().user.shed_tailing);

        battle.apply_line("|-activate|p2a: Caterpie|Substitute|[damage]");
        assert!(opponent(&battle).substitute_hit);
        battle.apply_line("|-end|p2a: Caterpie|Substitute");
        assert!(!opponent(&battle).substitute_hit);
        assert!(!opponent(&battle).has_volatile(&Volatile::Substitute));
    }

    #[test]
    fn test_dynamax_doubles_and_halves_hp() {
        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).hp = 60;
        battle.apply_line("|-start|p2a: Caterpie|Dynamax");
        assert_eq!((opponent(&battle).hp, opponent(&battle).max_hp), (120, 200));

        battle.apply_line("|-end|p2a: Caterpie|Dynamax");
        assert_eq!((opponent(&battle).hp, opponent(&battle).max_hp), (60, 100));
    }

    #[test]
    fn test_type_change() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-start|p2a: Caterpie|typechange|Fighting|[from] ability: Libero");
        assert_eq!(opponent(&battle).types, vec![Type::Fighting]);
        assert_eq!(opponent(&battle).ability.as_deref(), Some("libero"));
        assert!(opponent(&battle).has_volatile(&Volatile::TypeChange));

        battle.apply_line("|-start|p2a: Caterpie|typechange|???/Flying|[from] move: Burn Up");
        assert_eq!(opponent(&battle).types, vec![Type::Flying]);

        user_mut(&mut battle).types = vec![Type::Dragon, Type::Ghost];
        battle.apply_line("|-start|p2a: Caterpie|typechange|[from] move: Reflect Type|[of] p1a: Weedle");
        assert_eq!(opponent(&battle).types, vec![Type::Dragon, Type::Ghost]);
    }

    #[test]
    fn test_confusion() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-start|p2a: Caterpie|confusion");
        assert!(opponent(&battle).impossible_items.contains("lumberry"));

        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).add_volatile(Volatile::LockedMove);
        opponent_mut(&mut battle).set_volatile_duration(Volatile::LockedMove, 1);
        battle.apply_line("|-start|p2a: Caterpie|confusion|[fatigue]");
        assert!(!opponent(&battle).has_volatile(&Volatile::LockedMove));
        assert_eq!(opponent(&battle).volatile_duration(&Volatile::LockedMove), 0);
    }

    #[test]
    fn test_disable_reveals_move() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-start|p2a: Caterpie|Disable|Tackle");
        assert!(opponent(&battle).get_move("tackle").is_some());
    }

    #[test]
    fn test_volatile_end() {
        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).add_volatile(Volatile::PartiallyTrapped);
        battle.apply_line("|-end|p2a: Caterpie|whirlpool|[partiallytrapped]|[silent]");
        assert!(opponent(&battle).volatiles.is_empty());

        opponent_mut(&mut battle).add_volatile(Volatile::Taunt);
        opponent_mut(&mut battle).set_volatile_duration(Volatile::Taunt, 1);
        battle.apply_line("|-end|p2a: Caterpie|Taunt|[silent]");
        assert_eq!(opponent(&battle).volatile_duration(&Volatile::Taunt), 0);

        opponent_mut(&mut battle).add_volatile(Volatile::ParadoxBoost(Stat::Spa));
        battle.apply_line("|-end|p2a: Caterpie|Protosynthesis");
        opponent_mut(&mut battle).add_volatile(Volatile::ParadoxBoost(Stat::Atk));
        battle.apply_line("|-end|p2a: Caterpie|Quark Drive");
        assert!(opponent(&battle).volatiles.is_empty());
    }

    #[test]
    fn test_single_turn_protect() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-singleturn|p2a: Caterpie|Protect");
        assert_eq!(battle.battle().opponent.condition(SideCondition::Protect), 2);

        battle.apply_line("|-singleturn|p1a: Weedle|move: Endure");
        assert_eq!(battle.battle().user.condition(SideCondition::Protect), 2);

        let mut battle = battle_with_actives();
        battle.apply_line("|-singleturn|p2a: Caterpie|move: Focus Punch");
        assert_eq!(battle.battle().opponent.condition(SideCondition::Protect), 0);
    }

    // === Items ===

    #[test]
    fn test_trick_records_removed_items() {
        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).item = Item::held("choicescarf");
        battle.apply_line("|-item|p2a: Caterpie|Leftovers|[from] move: Trick");
        assert!(opponent(&battle).item.is("leftovers"));
        assert_eq!(opponent(&battle).removed_item.as_deref(), Some("choicescarf"));

        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).item = Item::held("leftovers");
        opponent_mut(&mut battle).removed_item = Some("choicescarf".to_string());
        battle.apply_line("|-item|p2a: Caterpie|Choice Scarf|[from] move: Trick");
        assert_eq!(opponent(&battle).removed_item.as_deref(), Some("choicescarf"));

        let mut battle = battle_with_actives();
        battle.apply_line("|-item|p2a: Caterpie|Choice Scarf|[from] move: Trick");
        assert!(opponent(&battle).item.is("choicescarf"));
        assert_eq!(opponent(&battle).removed_item, None);
    }

    #[test]
    fn test_trick_pair_first_swap_wins() {
        let mut battle = battle_with_actives();
        user_mut(&mut battle).item = Item::held("leftovers");
        battle.apply_line("|-item|p2a: Caterpie|Leftovers|[from] move: Trick");
        battle.apply_line("|-item|p1a: Weedle|Choice Specs|[from] move: Trick");
        assert!(opponent(&battle).item.is("leftovers"));
        assert!(user(&battle).item.is("choicespecs"));
        assert_eq!(opponent(&battle).removed_item.as_deref(), Some("choicespecs"));

        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).item = Item::held("leftovers");
        opponent_mut(&mut battle).removed_item = Some("choicespecs".to_string());
        user_mut(&mut battle).item = Item::held("choicespecs");
        battle.apply_line("|-item|p2a: Caterpie|Choice Specs|[from] move: Trick");
        battle.apply_line("|-item|p1a: Weedle|Leftovers|[from] move: Trick");
        assert!(opponent(&battle).item.is("choicespecs"));
        assert!(user(&battle).item.is("leftovers"));
        assert_eq!(opponent(&battle).removed_item.as_deref(), Some("choicespecs"));
    }

    #[test]
    fn test_frisk() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-item|p1a: Weedle|Focus Sash|[from] ability: Frisk|[of] p2a: Caterpie|[identify]");
        assert!(user(&battle).item.is("focussash"));
        assert_eq!(opponent(&battle).ability.as_deref(), Some("frisk"));
        assert!(user(&battle).ability.is_none());
    }

    #[test]
    fn test_end_item() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-enditem|p2a: Caterpie|Sitrus Berry|[eat]");
        assert_eq!(opponent(&battle).item, Item::Empty);
        assert_eq!(opponent(&battle).removed_item, None);

        let mut battle = battle_with_actives();
        opponent_mut(&mut battle).ability = Some("unburden".to_string());
        battle.apply_line("|-enditem|p2a: Caterpie|Leftovers|[from] move: Knock Off|[of] p1a: Weedle");
        assert_eq!(opponent(&battle).item, Item::Empty);
        assert_eq!(opponent(&battle).removed_item.as_deref(), Some("leftovers"));
        assert!(opponent(&battle).has_volatile(&Volatile::Unburden));
    }

    // === Abilities ===

    #[test]
    fn test_ability_reveal_sets_original() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-ability|p2a: Caterpie|Lightning Rod|boost");
        assert_eq!(opponent(&battle).ability.as_deref(), Some("lightningrod"));
        assert_eq!(opponent(&battle).original_ability.as_deref(), Some("lightningrod"));

        battle.apply_line("|-ability|p1a: Weedle|Lightning Rod|boost");
        assert_eq!(user(&battle).ability.as_deref(), Some("lightningrod"));
    }

    #[test]
    fn test_trace_keeps_original_ability() {
        let mut battle = battle_with_actives();
        user_mut(&mut battle).ability = Some("intimidate".to_string());
        battle.apply_line("|-ability|p2a: Caterpie|Intimidate|boost");
        battle.apply_line("|-ability|p2a: Caterpie|Intimidate|[from] ability: Trace|[of] p1a: Weedle");
        assert_eq!(opponent(&battle).ability.as_deref(), Some("intimidate"));
        assert_eq!(opponent(&battle).original_ability.as_deref(), Some("trace"));

        battle.apply_line("|-ability|p2a: Caterpie|Intimidate|boost");
        assert_eq!(opponent(&battle).original_ability.as_deref(), Some("trace"));
    }

    #[test]
    fn test_bot_trace_reveals_opponent_ability() {
        let mut battle = battle_with_actives();
        user_mut(&mut battle).ability = Some("trace".to_string());
        battle.apply_line("|-ability|p1a: Weedle|Intimidate|boost");
        battle.apply_line("|-ability|p1a: Weedle|Intimidate|[from] ability: Trace|[of] p2a: Caterpie");
        assert_eq!(opponent(&battle).ability.as_deref(), Some("intimidate"));
        assert_eq!(user(&battle).original_ability.as_deref(), Some("trace"));
        assert_eq!(user(&battle).ability.as_deref(), Some("intimidate"));
    }

    #[test]
    fn test_as_one() {
        for (species, expected) in [
            ("calyrexshadow", "asonespectrier"),
            ("calyrexice", "asoneglastrier"),
        ] {
            let mut battle = battle_with_actives();
            battle.battle_mut().opponent.active = Some(PokemonState::new(species, 100));
            battle.apply_line("|-ability|p2a: Calyrex|As One");
            battle.apply_line("|-ability|p2a: Calyrex|Unnerve");
            assert_eq!(opponent(&battle).ability.as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_activate_lingering_aroma() {
        let mut battle = battle_with_actives();
        user_mut(&mut battle).ability = Some("intimidate".to_string());
        battle.apply_line("|-activate|p2a: Caterpie|ability: Lingering Aroma|Intimidate|[of] p1a: Weedle");
        assert_eq!(user(&battle).ability.as_deref(), Some("lingeringaroma"));
        assert_eq!(user(&battle).original_ability.as_deref(), Some("intimidate"));
        assert_eq!(opponent(&battle).ability.as_deref(), Some("lingeringaroma"));
    }

    #[test]
    fn test_activate_wandering_spirit_swaps() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-activate|p2a: Caterpie|ability: Wandering Spirit|Intimidate|[of] p1a: Weedle");
        assert_eq!(opponent(&battle).ability.as_deref(), Some("intimidate"));
        assert_eq!(opponent(&battle).original_ability.as_deref(), Some("wanderingspirit"));
        assert_eq!(user(&battle).ability.as_deref(), Some("wanderingspirit"));
        assert_eq!(user(&battle).original_ability.as_deref(), Some("intimidate"));
    }

    #[test]
    fn test_activate_partial_traps() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-activate|p2a: Caterpie|move: Magma Storm|[of] p1a: Weedle");
        assert!(opponent(&battle).has_volatile(&Volatile::PartiallyTrapped));

        let mut battle = battle_with_actives();
        battle.apply_line("|-activate|p2a: Caterpie|move: Tackle|[of] p1a: Weedle");
        assert!(opponent(&battle).volatiles.is_empty());
    }

    #[test]
    fn test_activate_item_reveals() {
        let mut battle = battle_with_actives();
        battle.apply_line("|-activate|p2a: Caterpie|item: Custap Berry|[consumed]");
        assert!(opponent(&battle).item.is_unknown());

        battle.apply_line("|-activate|p2a: Caterpie|Move: Poltergeist|Leftovers");
        assert!(opponent(&battle).item.is("leftovers"));

        battle.apply_line("|-activate|p2a: Caterpie|item: Safety Goggles|Stun Spore");
        assert!(opponent(&battle).item.is("safetygoggles"));

        battle.apply_line("|-activate|p2a: Caterpie|ability: Iron Barbs");
        assert_eq!(opponent(&battle).ability.as_deref(), Some("ironbarbs"));
    }

    // === Transformations ===

    #[test]
    fn test_transform_copies_target() {
        let mut battle = battle_with_actives();
        battle.battle_mut().opponent.active = Some(PokemonState::new("Ditto", 100));
        {
            let weedle = user_mut(&mut battle);
            weedle.ability = Some("levitate".to_string());
            weedle.add_move("dracometeor", 8);
            weedle.add_move("darkpulse", 24);
            weedle.types = vec![Type::Dragon, Type::Steel];
            weedle.boosts.spa = 2;
            weedle.stats.spe = 132;
        }
        opponent_mut(&mut battle).types = vec![Type::Normal];

        battle.apply_line("|-transform|p2a: Ditto|p1a: Weedle|[from] ability: Imposter");
        let ditto = opponent(&battle);
        assert_eq!(ditto.ability.as_deref(), Some("levitate"));
        assert_eq!(ditto.original_ability.as_deref(), Some("imposter"));
        assert_eq!(ditto.types, vec![Type::Dragon, Type::Steel]);
        assert_eq!(ditto.boosts.spa, 2);
        assert_eq!(ditto.stats.spe, 132);
        assert_eq!(ditto.moves.len(), 2);
        assert!(ditto.moves.iter().all(|m| m.pp == 5));
        assert!(ditto.has_volatile(&Volatile::Transform));
        assert_eq!(ditto.pre_transform.as_ref().unwrap().types, vec![Type::Normal]);
    }

    #[test]
    fn test_forme_change_keeps_battle_state() {
        let mut battle = battle_with_actives();
        let mut meloetta = PokemonState::new("Meloetta", 100);
        meloetta.boosts = StatStages {
            atk: 2,
            ..StatStages::new()
        };
        meloetta.status = Some(Status::Burn);
        meloetta.item = Item::held("leftovers");
        battle.battle_mut().opponent.active = Some(meloetta);

        battle.apply_line("|-formechange|p2a: Meloetta|Meloetta - Pirouette|[msg]");
        let pirouette = opponent(&battle);
        assert_eq!(pirouette.species(), "meloettapirouette");
        assert_eq!(pirouette.identity.base_name, "meloetta");
        assert_eq!(pirouette.boosts.atk, 2);
        assert_eq!(pirouette.status, Some(Status::Burn));
        assert!(pirouette.item.is("leftovers"));
        assert_eq!(pirouette.types, vec![Type::Normal, Type::Fighting]);
    }
}
