//! Simulation state, the per-tick driver and the game-over state machine.
//!
//! A [`Simulation`] owns the table, both action queues, the clocks and every
//! runtime toggle. The host calls [`Simulation::tick`] once per frame; the
//! round controller operations (betting, dealing, resolution) live in the
//! sibling modules as further `impl` blocks on the same type.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    constants::{
        DECK_SIZE, DEFAULT_CARDS_PER_PLAYER, DEFAULT_COINS_PER_PLAYER, DEFAULT_GAME_SPEED,
        DEFAULT_PLAYERS, DEFAULT_TOTAL_ROUNDS, LABEL_ANGLE, LABEL_RADIUS, MAX_PLAYERS,
        MENU_HIDDEN, MENU_SHOWN, MENU_SLIDE_DURATION, MENU_WIGGLE_DEGREES, MIN_PLAYERS, OFF_TABLE,
        RESIZE_COIN_DELAY, RESIZE_COIN_DIVISOR, RESIZE_COIN_DURATION, RESIZE_FADE_DELAY,
        RESIZE_FADE_DURATION, polar,
    },
    entities::{PlayStyle, Player, Table},
    errors::SettingsError,
    pause::{MenuOption, PauseMenu},
};
use crate::{
    action::{Clocks, Easing, QueueKind, Scheduler, Timing},
    diagnostics::{CATEGORY_ACTION, CATEGORY_TABLE, Diagnostics},
    scene::{EntityId, EntityKind, Scene, Transform},
    telemetry::{TelemetrySink, pause_metrics_row},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Phase {
    /// Dealing and betting.
    Playing,
    /// A pot was just awarded; eliminations are checked next.
    RoundEnd,
    /// Terminal. Both clocks are frozen.
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Playing => "playing",
            Self::RoundEnd => "round end",
            Self::GameOver => "game over",
        };
        write!(f, "{repr}")
    }
}

/// Simulation configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub players: usize,
    pub coins_per_player: usize,
    pub cards_per_player: usize,
    pub total_rounds: u32,
    /// Clock multiplier while auto mode is on.
    pub game_speed: f32,
    /// Fixed seed for a reproducible run; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub auto_mode: bool,
    pub diagnostics: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            coins_per_player: DEFAULT_COINS_PER_PLAYER,
            cards_per_player: DEFAULT_CARDS_PER_PLAYER,
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            game_speed: DEFAULT_GAME_SPEED,
            seed: None,
            auto_mode: false,
            diagnostics: false,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(SettingsError::PlayerCount(self.players));
        }
        if self.cards_per_player == 0 {
            return Err(SettingsError::NoCards);
        }
        // Resizing may seat up to the maximum, so size against that.
        if MAX_PLAYERS * self.cards_per_player > DECK_SIZE {
            return Err(SettingsError::DeckTooSmall {
                players: MAX_PLAYERS,
                cards: self.cards_per_player,
                deck: DECK_SIZE,
            });
        }
        if self.coins_per_player == 0 {
            return Err(SettingsError::NoCoins);
        }
        if self.total_rounds == 0 {
            return Err(SettingsError::NoRounds);
        }
        if !(self.game_speed.is_finite() && self.game_speed > 0.0) {
            return Err(SettingsError::GameSpeed(self.game_speed));
        }
        Ok(())
    }
}

/// Final result recorded on entry to [`Phase::GameOver`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Standing {
    /// Player number with the largest stake.
    pub winner: Option<usize>,
    pub rounds_played: u32,
    /// `(player number, stake)` in table order.
    pub stakes: Vec<(usize, usize)>,
}

pub struct Simulation<S, T> {
    pub table: Table,
    pub scheduler: Scheduler,
    pub clocks: Clocks,
    pub pause_menu: PauseMenu,
    pub diagnostics: Diagnostics,
    pub(crate) scene: S,
    pub(crate) telemetry: T,
    pub(crate) rng: StdRng,
    pub(crate) settings: SimulationSettings,
    pub(crate) phase: Phase,
    pub(crate) auto_mode: bool,
    pub(crate) bet_pressed: bool,
    pub(crate) fold_pressed: bool,
    /// Allows exactly one deal until re-armed.
    pub(crate) deal_armed: bool,
    pub(crate) requested_players: Option<usize>,
    pub(crate) standing: Option<Standing>,
}

impl<S: Scene, T: TelemetrySink> Simulation<S, T> {
    /// Set up the deck, the seats and the pause panel.
    pub fn new(
        settings: SimulationSettings,
        mut scene: S,
        telemetry: T,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut rng = settings
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        let mut table = Table::new(
            settings.total_rounds,
            settings.cards_per_player,
            settings.coins_per_player,
        );
        table.build_deck(&mut scene, &mut rng);
        table.seat_players(&mut scene, settings.players);

        let panel = scene.create(EntityKind::Panel, Transform::at(MENU_HIDDEN));
        scene.set_opacity(panel, 0.0);

        log::info!(
            "Seated {} players with {} coins each for {} rounds",
            settings.players,
            settings.coins_per_player,
            settings.total_rounds
        );

        Ok(Self {
            table,
            scheduler: Scheduler::new(),
            clocks: Clocks::new(),
            pause_menu: PauseMenu::new(panel),
            diagnostics: Diagnostics::new(settings.diagnostics),
            scene,
            telemetry,
            rng,
            auto_mode: settings.auto_mode,
            settings,
            phase: Phase::Playing,
            bet_pressed: false,
            fold_pressed: false,
            deal_armed: true,
            requested_players: None,
            standing: None,
        })
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    #[must_use]
    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut T {
        &mut self.telemetry
    }

    #[must_use]
    pub fn standing(&self) -> Option<&Standing> {
        self.standing.as_ref()
    }

    #[must_use]
    pub fn is_auto_mode(&self) -> bool {
        self.auto_mode
    }

    #[must_use]
    pub fn is_deal_armed(&self) -> bool {
        self.deal_armed
    }

    // === Host commands ===

    /// The human seat's bet button.
    pub fn press_bet(&mut self) {
        self.bet_pressed = true;
    }

    /// The human seat's fold button.
    pub fn press_fold(&mut self) {
        self.fold_pressed = true;
    }

    pub fn toggle_auto_mode(&mut self) -> bool {
        self.auto_mode = !self.auto_mode;
        log::info!("Auto mode {}", if self.auto_mode { "on" } else { "off" });
        self.auto_mode
    }

    pub fn toggle_diagnostics(&mut self) -> bool {
        self.diagnostics.toggle()
    }

    /// Ask for a table of `count` seats. Applied once the main queue drains.
    pub fn request_players(&mut self, count: usize) {
        self.requested_players = Some(count);
    }

    /// Open or close the pause menu. Returns whether it is now open.
    pub fn toggle_pause(&mut self) -> bool {
        if self.phase == Phase::GameOver {
            return self.pause_menu.is_open();
        }
        if self.pause_menu.is_open() {
            self.close_menu();
        } else {
            self.open_menu();
        }
        self.pause_menu.is_open()
    }

    pub fn select_menu_option(&mut self, option: MenuOption) -> bool {
        if !self.pause_menu.select(option) {
            return false;
        }
        self.scheduler.create_rotate(
            &self.diagnostics,
            self.pause_menu.panel,
            MENU_WIGGLE_DEGREES,
            Timing::new(0.0, MENU_SLIDE_DURATION),
            QueueKind::Paused,
        );
        true
    }

    fn open_menu(&mut self) {
        if !self.pause_menu.open() {
            return;
        }
        let panel = self.pause_menu.panel;
        let slide = Timing::new(0.0, MENU_SLIDE_DURATION);
        self.scheduler
            .create_pause_move(panel, MENU_HIDDEN, MENU_SHOWN, slide);
        self.scheduler.create_pause_scale(panel, 0.5, 1.0, slide);
        self.scheduler
            .create_pause_fade(&self.diagnostics, panel, 1.0, Easing::EaseOut, slide);
    }

    fn close_menu(&mut self) {
        if !self.pause_menu.resume() {
            return;
        }
        let panel = self.pause_menu.panel;
        let slide = Timing::new(0.0, MENU_SLIDE_DURATION);
        self.scheduler
            .create_pause_move(panel, MENU_SHOWN, MENU_HIDDEN, slide);
        self.scheduler
            .create_pause_fade(&self.diagnostics, panel, 0.0, Easing::EaseIn, slide);
    }

    // === Tick ===

    /// Advance one frame of `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        if self.phase == Phase::GameOver {
            self.scheduler
                .advance(&self.clocks, &mut self.scene, &self.diagnostics);
            return;
        }
        if self.is_game_over() {
            self.enter_game_over();
            return;
        }

        if !self.scheduler.is_empty() {
            self.diagnostics.emit(
                CATEGORY_ACTION,
                format_args!("Action Count: {}", self.scheduler.main.len()),
            );
        }

        let speed = self.auto_mode.then_some(self.settings.game_speed);
        self.clocks.update(delta, self.pause_menu.is_open(), speed);
        if self.auto_mode && !self.pause_menu.is_open() && self.scheduler.is_empty() {
            self.auto_play();
        }

        self.scheduler
            .advance(&self.clocks, &mut self.scene, &self.diagnostics);
        self.collect_retired();

        if self.pause_menu.is_open() {
            return;
        }

        self.apply_requested_players();
        self.assign_play_styles();
        self.rearm_after_misdeal();
        self.deal_new_round();
        self.sweep_triggers();
        self.reset_button_flags();

        if self.phase == Phase::Playing && self.scheduler.is_empty() && !self.table.pot.is_empty()
        {
            self.find_winner();
        }

        if self.phase == Phase::RoundEnd {
            self.remove_loser();
            if self.phase == Phase::RoundEnd {
                self.phase = Phase::Playing;
            }
        }
    }

    /// Round limit passed or a single seat left at the table.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
            || self.table.round > self.table.total_rounds
            || self.table.players.len() <= 1
    }

    /// Hard reset into the terminal phase. Entry side effects run once.
    pub fn enter_game_over(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.phase = Phase::GameOver;
        self.scheduler.main.clear();

        let winner = overall_winner(&self.table.players).map(|player| player.id);
        if let Some(id) = winner {
            self.scene.create(
                EntityKind::Label(format!("Player {id} WINS!")),
                Transform::at(polar(LABEL_ANGLE, LABEL_RADIUS)),
            );
        }

        self.telemetry
            .write_pause_metrics(&pause_metrics_row(&self.pause_menu.counters));
        self.telemetry.flush();
        self.pause_menu.open();
        self.clocks.freeze();

        let standing = Standing {
            winner,
            rounds_played: self.table.round.saturating_sub(1),
            stakes: self
                .table
                .players
                .iter()
                .map(|player| (player.id, player.coins.len()))
                .collect(),
        };
        match winner {
            Some(id) => log::info!(
                "Game over after {} rounds, player {id} wins",
                standing.rounds_played
            ),
            None => log::info!("Game over with an empty table"),
        }
        self.standing = Some(standing);
    }

    fn auto_play(&mut self) {
        self.open_menu();
        let option = MenuOption::ALL[self.rng.random_range(0..MenuOption::ALL.len())];
        self.select_menu_option(option);
        self.close_menu();
        self.deal_armed = true;
        self.bet_pressed = true;
    }

    /// Styles follow the current roster index, so a compacted roster
    /// hands each seat the style of its new position.
    fn assign_play_styles(&mut self) {
        for (seat, player) in self.table.players.iter_mut().enumerate() {
            player.style = PlayStyle::for_seat(seat);
            player.apply_style(&mut self.rng);
        }
    }

    /// Everyone folded before anything reached the pot: deal again.
    fn rearm_after_misdeal(&mut self) {
        if self.scheduler.is_empty()
            && self.table.pot.is_empty()
            && self.table.players.iter().all(|player| player.cards.is_empty())
        {
            self.deal_armed = true;
        }
    }

    fn reset_button_flags(&mut self) {
        self.bet_pressed = false;
        self.fold_pressed = false;
        self.deal_armed = false;
    }

    /// Destroy retired handles once nothing in the main queue can still
    /// be animating them.
    fn collect_retired(&mut self) {
        let faded = self.scheduler.main.drain_retired();
        self.table.retired.extend(faded);
        if self.scheduler.is_empty() {
            for id in self.table.retired.drain(..) {
                self.scene.destroy(id);
            }
        }
    }

    fn apply_requested_players(&mut self) {
        if !self.scheduler.is_empty() {
            return;
        }
        if let Some(count) = self.requested_players.take() {
            self.change_players(count);
        }
    }

    /// Tear down the current seats and seat `count` fresh players.
    ///
    /// Cards go back to the deck; the old coins and markers leave the
    /// table and are retired. The new table starts again at round 1.
    pub fn change_players(&mut self, count: usize) -> bool {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) || count == self.table.players.len() {
            return false;
        }

        for seat in 0..self.table.players.len() {
            if let Err(e) = self.fold(seat, -(seat as f32)) {
                log::warn!("Seat {seat} could not fold while resizing: {e}");
            }
            let player = &mut self.table.players[seat];
            let coins = std::mem::take(&mut player.coins);
            let marker = player.marker;
            self.send_off_table(&coins);
            self.table.retired.extend(coins);
            self.scheduler.create_fade(
                &self.diagnostics,
                marker,
                0.0,
                Easing::EaseOut,
                Timing::new(RESIZE_FADE_DELAY, RESIZE_FADE_DURATION),
            );
        }
        let pot = std::mem::take(&mut self.table.pot);
        self.send_off_table(&pot);
        self.table.retired.extend(pot);

        self.table.seat_players(&mut self.scene, count);
        self.table.round = 1;
        self.deal_armed = true;
        self.diagnostics.emit(
            CATEGORY_TABLE,
            format_args!("Table resized to {count} players"),
        );
        log::info!("Table resized to {count} players");
        true
    }

    fn send_off_table(&mut self, coins: &[EntityId]) {
        for (j, &coin) in coins.iter().enumerate() {
            let start = self
                .scene
                .transform(coin)
                .map_or(OFF_TABLE, |transform| transform.position);
            self.scheduler.create_move(
                &self.diagnostics,
                coin,
                start,
                OFF_TABLE,
                Timing::new(
                    RESIZE_COIN_DELAY + j as f32 / RESIZE_COIN_DIVISOR,
                    RESIZE_COIN_DURATION,
                ),
            );
        }
    }
}

/// Player with the largest stake; the first in table order wins a tie.
#[must_use]
pub fn overall_winner(players: &[Player]) -> Option<&Player> {
    let mut best: Option<&Player> = None;
    for player in players {
        if best.is_none_or(|top| player.coins.len() > top.coins.len()) {
            best = Some(player);
        }
    }
    best
}
