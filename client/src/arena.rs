use anyhow::{Context, Result};
use pokearena_battle::{Ability, BattleState, Battler, OpponentSpecies, SessionView, prepare_battle};
use pokearena_protocol::{BackpackEntry, DeleteItemForm, StartBattleForm, UseItemForm};
use rand::Rng;

use crate::sessions::{SessionId, SessionStore};
use crate::source::{AbilityCatalog, OpponentSource, TrainerStore, UserId};

/// What the lobby page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lobby {
    pub opponent: OpponentSpecies,

    /// The user's Pokemon to choose from
    pub gallery: Vec<Battler>,
}

/// What the battle page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattlePage {
    Battle(BattleState),
    RedirectToStart,
}

/// Orchestrates battle setup over the outside collaborators.
///
/// Collaborator failures are propagated as they are; the arena never retries.
pub struct Arena<O, C, T> {
    opponents: O,
    catalog: C,
    trainers: T,
    sessions: SessionStore,
}

impl<O, C, T> Arena<O, C, T>
where
    O: OpponentSource,
    C: AbilityCatalog,
    T: TrainerStore,
{
    pub fn new(opponents: O, catalog: C, trainers: T) -> Self {
        Self {
            opponents,
            catalog,
            trainers,
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn trainers(&self) -> &T {
        &self.trainers
    }

    /// Build a battle without touching any session
    pub async fn initiate_battle<R: Rng + ?Sized>(
        &self,
        owner: UserId,
        user_pokemon_id: u64,
        opponent_name: &str,
        rng: &mut R,
    ) -> Result<BattleState> {
        let (user, opponent, catalog) = self.gather(owner, user_pokemon_id, opponent_name).await?;
        let state = prepare_battle(user, &opponent, &catalog, rng)?;
        log_started(owner, &state);
        Ok(state)
    }

    /// Offer a random opponent and list the user's Pokemon
    pub async fn open_lobby(&self, session: &SessionId) -> Result<Lobby> {
        let owner = self.sessions.require_user(session)?;

        let opponent = self
            .opponents
            .fetch_random()
            .await
            .context("Failed to fetch a random opponent")?;
        let gallery = self.trainers.list_pokemon(owner).await?;

        self.sessions
            .with_battle(session, |battle| battle.begin(opponent.clone()))?;

        tracing::debug!(user = owner, opponent = %opponent.name, "Lobby opened");
        Ok(Lobby { opponent, gallery })
    }

    /// Start the battle the lobby offered, with the Pokemon the user picked
    pub async fn start_battle<R: Rng + ?Sized>(
        &self,
        session: &SessionId,
        form: &StartBattleForm,
        rng: &mut R,
    ) -> Result<BattleState> {
        let owner = self.sessions.require_user(session)?;
        let (user, opponent, catalog) = self
            .gather(owner, form.pokemon_id, form.opponent_pokemon.name())
            .await?;

        let state = self
            .sessions
            .with_battle(session, |battle| {
                battle.start(user, &opponent, &catalog, rng).cloned()
            })??;

        log_started(owner, &state);
        Ok(state)
    }

    /// The running battle, or a redirect back to the lobby
    pub fn current_battle(&self, session: &SessionId) -> Result<BattlePage> {
        self.sessions.with_battle(session, |battle| match battle.view() {
            SessionView::Battle(state) => BattlePage::Battle(state.clone()),
            SessionView::RedirectToStart => BattlePage::RedirectToStart,
        })
    }

    /// End the running battle
    pub fn conclude_battle(&self, session: &SessionId) -> Result<BattleState> {
        let state = self.sessions.with_battle(session, |battle| battle.conclude())??;
        tracing::info!(opponent = %state.opponent.name, "Battle concluded");
        Ok(state)
    }

    /// The user's backpack listing
    pub async fn backpack(&self, session: &SessionId) -> Result<Vec<BackpackEntry>> {
        let owner = self.sessions.require_user(session)?;
        Ok(self.trainers.backpack(owner).await?.to_entries())
    }

    /// Use one item on one of the user's Pokemon. Returns the updated Pokemon.
    pub async fn use_item(&self, session: &SessionId, form: &UseItemForm) -> Result<Battler> {
        let owner = self.sessions.require_user(session)?;

        let mut backpack = self.trainers.backpack(owner).await?;
        let mut pokemon = self.trainers.get_pokemon(owner, form.id).await?;

        let change = backpack.use_item(form.item_id, &mut pokemon)?;

        // The item is spent before the effect is stored
        self.trainers.save_backpack(owner, backpack).await?;
        self.trainers.save_pokemon(owner, pokemon.clone()).await?;

        tracing::debug!(
            user = owner,
            item = form.item_id,
            pokemon = %pokemon.name,
            change = change,
            "Item used"
        );
        Ok(pokemon)
    }

    /// Throw away some units of an item. Returns how many remain.
    pub async fn discard_item(
        &self,
        session: &SessionId,
        item_id: u64,
        form: &DeleteItemForm,
    ) -> Result<u32> {
        let owner = self.sessions.require_user(session)?;

        let mut backpack = self.trainers.backpack(owner).await?;
        let remaining = backpack.discard(item_id, form.quantity)?;
        self.trainers.save_backpack(owner, backpack).await?;

        Ok(remaining)
    }

    async fn gather(
        &self,
        owner: UserId,
        pokemon_id: u64,
        opponent_name: &str,
    ) -> Result<(Battler, OpponentSpecies, Vec<Ability>)> {
        let user = self.trainers.get_pokemon(owner, pokemon_id).await?;
        let opponent = self
            .opponents
            .fetch_by_name(opponent_name)
            .await
            .with_context(|| format!("Failed to fetch opponent '{}'", opponent_name))?;
        let catalog = self.catalog.list_all().await?;
        Ok((user, opponent, catalog))
    }
}

fn log_started(owner: UserId, state: &BattleState) {
    tracing::info!(
        user = owner,
        pokemon = %state.user.name,
        opponent = %state.opponent.name,
        level = state.opponent.level,
        ability = state.opponent.abilities.first().map(|a| a.name.as_str()).unwrap_or(""),
        user_goes_first = state.user_goes_first(),
        "Battle started"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryCatalog, MemoryOpponents, MemoryTrainerStore};
    use async_trait::async_trait;
    use pokearena_battle::{Backpack, BattleError, BattlePhase, Effect, EffectType, Item, Stat, Stats};
    use pokearena_protocol::{OpponentRef, parse_form};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const OWNER: UserId = 7;

    fn pidgey() -> OpponentSpecies {
        OpponentSpecies {
            id: 16,
            name: "pidgey".to_string(),
            base_stats: Stats::new(40, 45, 40, 35, 35, 40),
            sprite: None,
            types: vec!["normal".to_string(), "flying".to_string()],
        }
    }

    fn charmander() -> Battler {
        Battler::new("Charmander", 10, Stats::new(31, 17, 15, 18, 16, 60))
            .unwrap()
            .with_id(1)
    }

    fn catalog() -> Vec<Ability> {
        vec![
            Ability::new(1, "Blaze", Effect::new(EffectType::Boost(Stat::Attack), 5)),
            Ability::new(2, "Swift", Effect::new(EffectType::Boost(Stat::Speed), 5)),
        ]
    }

    fn arena_with(
        catalog: Vec<Ability>,
    ) -> Arena<MemoryOpponents, MemoryCatalog, MemoryTrainerStore> {
        let trainers = MemoryTrainerStore::new();
        trainers.insert_pokemon(OWNER, charmander()).unwrap();
        trainers
            .insert_pokemon(99, Battler::new("Mewtwo", 70, Stats::default()).unwrap().with_id(2))
            .unwrap();

        let mut backpack = Backpack::new();
        backpack.add(Item {
            id: 5,
            name: "Potion".to_string(),
            image: None,
            count: 2,
            effect: Effect::new(EffectType::Heal, 20),
        })
        .unwrap();
        trainers.set_backpack(OWNER, backpack).unwrap();

        Arena::new(
            MemoryOpponents::new(vec![pidgey()]),
            MemoryCatalog::new(catalog),
            trainers,
        )
    }

    fn arena() -> Arena<MemoryOpponents, MemoryCatalog, MemoryTrainerStore> {
        arena_with(catalog())
    }

    fn logged_in<O, C, T>(arena: &Arena<O, C, T>) -> SessionId
    where
        O: OpponentSource,
        C: AbilityCatalog,
        T: TrainerStore,
    {
        let session = SessionId::new("session-1");
        arena.sessions().login(&session, OWNER).unwrap();
        session
    }

    fn form(pokemon_id: u64, opponent: &str) -> StartBattleForm {
        StartBattleForm {
            pokemon_id,
            opponent_pokemon: OpponentRef::Named {
                name: opponent.to_string(),
            },
        }
    }

    fn kind(err: &anyhow::Error) -> Option<&BattleError> {
        err.downcast_ref::<BattleError>()
    }

    struct BrokenSource;

    #[async_trait]
    impl OpponentSource for BrokenSource {
        async fn fetch_by_name(&self, _name: &str) -> Result<OpponentSpecies> {
            anyhow::bail!("connection reset")
        }

        async fn fetch_random(&self) -> Result<OpponentSpecies> {
            anyhow::bail!("connection reset")
        }
    }

    #[tokio::test]
    async fn test_initiate_battle_end_to_end() {
        let arena = arena();
        let mut rng = StdRng::seed_from_u64(1);

        let state = arena
            .initiate_battle(OWNER, 1, "Pidgey", &mut rng)
            .await
            .unwrap();

        assert_eq!(state.opponent.level, 10);
        assert_eq!(state.opponent.speed(), 13);
        assert!(state.user_goes_first());
        assert_eq!(state.opponent.abilities.len(), 1);
        // Stateless: no session was created
        assert!(arena.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_initiate_battle_checks_ownership() {
        let arena = arena();
        let mut rng = StdRng::seed_from_u64(1);

        let err = arena
            .initiate_battle(OWNER, 2, "pidgey", &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(kind(&err), Some(BattleError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_initiate_battle_unknown_opponent() {
        let arena = arena();
        let mut rng = StdRng::seed_from_u64(1);

        let err = arena
            .initiate_battle(OWNER, 1, "missingno", &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(kind(&err), Some(BattleError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_initiate_battle_empty_catalog() {
        let arena = arena_with(Vec::new());
        let mut rng = StdRng::seed_from_u64(1);

        let err = arena
            .initiate_battle(OWNER, 1, "pidgey", &mut rng)
            .await
            .unwrap_err();
        assert_eq!(kind(&err), Some(&BattleError::EmptyCatalog));
    }

    #[tokio::test]
    async fn test_source_failure_is_surfaced() {
        let trainers = MemoryTrainerStore::new();
        trainers.insert_pokemon(OWNER, charmander()).unwrap();
        let arena = Arena::new(BrokenSource, MemoryCatalog::new(catalog()), trainers);
        let mut rng = StdRng::seed_from_u64(1);

        let err = arena
            .initiate_battle(OWNER, 1, "pidgey", &mut rng)
            .await
            .unwrap_err();
        assert!(kind(&err).is_none());
        assert!(format!("{:#}", err).contains("connection reset"));

        let session = logged_in(&arena);
        assert!(arena.open_lobby(&session).await.is_err());
        assert_eq!(
            arena.current_battle(&session).unwrap(),
            BattlePage::RedirectToStart
        );
    }

    #[tokio::test]
    async fn test_session_flow() {
        let arena = arena();
        let session = logged_in(&arena);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(
            arena.current_battle(&session).unwrap(),
            BattlePage::RedirectToStart
        );

        let lobby = arena.open_lobby(&session).await.unwrap();
        assert_eq!(lobby.opponent, pidgey());
        assert_eq!(lobby.gallery, vec![charmander()]);
        assert_eq!(
            arena.current_battle(&session).unwrap(),
            BattlePage::RedirectToStart
        );

        let body = r#"{"pokemon_id": 1, "opponent_pokemon": {"name": "pidgey"}}"#;
        let form: StartBattleForm = parse_form(body).unwrap();
        let state = arena.start_battle(&session, &form, &mut rng).await.unwrap();

        assert_eq!(
            arena.current_battle(&session).unwrap(),
            BattlePage::Battle(state.clone())
        );

        let json = arena.sessions().export_battle(&session).unwrap().unwrap();
        let restored: BattleState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);

        let finished = arena.conclude_battle(&session).unwrap();
        assert_eq!(finished, state);
        assert_eq!(
            arena.current_battle(&session).unwrap(),
            BattlePage::RedirectToStart
        );
    }

    #[tokio::test]
    async fn test_start_without_lobby_is_rejected() {
        let arena = arena();
        let session = logged_in(&arena);
        let mut rng = StdRng::seed_from_u64(3);

        let err = arena
            .start_battle(&session, &form(1, "pidgey"), &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(
            kind(&err),
            Some(BattleError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_start_keeps_lobby() {
        let arena = arena_with(Vec::new());
        let session = logged_in(&arena);
        let mut rng = StdRng::seed_from_u64(3);

        arena.open_lobby(&session).await.unwrap();
        assert!(
            arena
                .start_battle(&session, &form(1, "pidgey"), &mut rng)
                .await
                .is_err()
        );

        let phase = arena
            .sessions()
            .with_battle(&session, |battle| battle.phase().clone())
            .unwrap();
        assert_eq!(phase, BattlePhase::AwaitingSelection { opponent: pidgey() });
        assert_eq!(arena.sessions().export_battle(&session).unwrap(), None);
    }

    #[tokio::test]
    async fn test_requires_login() {
        let arena = arena();
        let anonymous = SessionId::new("anon");
        let mut rng = StdRng::seed_from_u64(3);

        let err = arena.open_lobby(&anonymous).await.unwrap_err();
        assert_eq!(kind(&err), Some(&BattleError::Unauthenticated));

        let err = arena
            .start_battle(&anonymous, &form(1, "pidgey"), &mut rng)
            .await
            .unwrap_err();
        assert_eq!(kind(&err), Some(&BattleError::Unauthenticated));

        assert!(arena.current_battle(&anonymous).is_err());
        assert!(arena.backpack(&anonymous).await.is_err());
    }

    #[tokio::test]
    async fn test_use_item() {
        let arena = arena();
        let session = logged_in(&arena);

        let mut hurt = charmander();
        hurt.current_hp = 5;
        arena.trainers().insert_pokemon(OWNER, hurt).unwrap();

        let form = UseItemForm {
            item_id: 5,
            id: 1,
            effect_type: Some("heal".to_string()),
            effect_amount: Some(20),
        };
        let healed = arena.use_item(&session, &form).await.unwrap();
        assert_eq!(healed.current_hp, 25);
        assert_eq!(arena.trainers().get_pokemon(OWNER, 1).await.unwrap().current_hp, 25);

        let listing = arena.backpack(&session).await.unwrap();
        assert_eq!(listing[0].count, 1);
    }

    /// Trainer store whose Pokemon writes always fail
    struct StalePokemonStore(MemoryTrainerStore);

    #[async_trait]
    impl TrainerStore for StalePokemonStore {
        async fn get_pokemon(&self, owner: UserId, id: u64) -> Result<Battler> {
            self.0.get_pokemon(owner, id).await
        }

        async fn list_pokemon(&self, owner: UserId) -> Result<Vec<Battler>> {
            self.0.list_pokemon(owner).await
        }

        async fn save_pokemon(&self, _owner: UserId, _pokemon: Battler) -> Result<()> {
            anyhow::bail!("disk full")
        }

        async fn backpack(&self, owner: UserId) -> Result<Backpack> {
            self.0.backpack(owner).await
        }

        async fn save_backpack(&self, owner: UserId, backpack: Backpack) -> Result<()> {
            self.0.save_backpack(owner, backpack).await
        }
    }

    #[tokio::test]
    async fn test_use_item_spends_item_when_pokemon_write_fails() {
        let trainers = MemoryTrainerStore::new();
        let mut hurt = charmander();
        hurt.current_hp = 5;
        trainers.insert_pokemon(OWNER, hurt).unwrap();
        trainers
            .set_backpack(
                OWNER,
                Backpack::from_entries(&[BackpackEntry {
                    id: 5,
                    name: "Potion".to_string(),
                    image: None,
                    count: 2,
                    effect_type: "heal".to_string(),
                    effect_amount: 20,
                }])
                .unwrap(),
            )
            .unwrap();
        let arena = Arena::new(
            MemoryOpponents::new(vec![pidgey()]),
            MemoryCatalog::new(catalog()),
            StalePokemonStore(trainers),
        );
        let session = logged_in(&arena);

        let form = UseItemForm {
            item_id: 5,
            id: 1,
            effect_type: None,
            effect_amount: None,
        };
        let err = arena.use_item(&session, &form).await.unwrap_err();
        assert!(format!("{:#}", err).contains("disk full"));

        assert_eq!(arena.backpack(&session).await.unwrap()[0].count, 1);
        assert_eq!(arena.trainers().get_pokemon(OWNER, 1).await.unwrap().current_hp, 5);
    }

    #[tokio::test]
    async fn test_use_item_on_foreign_pokemon() {
        let arena = arena();
        let session = logged_in(&arena);

        let form = UseItemForm {
            item_id: 5,
            id: 2,
            effect_type: None,
            effect_amount: None,
        };
        let err = arena.use_item(&session, &form).await.unwrap_err();
        assert!(matches!(kind(&err), Some(BattleError::NotFound(_))));

        // Nothing was consumed
        assert_eq!(arena.backpack(&session).await.unwrap()[0].count, 2);
    }

    #[tokio::test]
    async fn test_discard_item() {
        let arena = arena();
        let session = logged_in(&arena);

        let err = arena
            .discard_item(&session, 5, &DeleteItemForm { quantity: 3 })
            .await
            .unwrap_err();
        assert!(matches!(kind(&err), Some(BattleError::InvalidInput(_))));

        let remaining = arena
            .discard_item(&session, 5, &DeleteItemForm { quantity: 2 })
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert!(arena.backpack(&session).await.unwrap().is_empty());
    }
}
