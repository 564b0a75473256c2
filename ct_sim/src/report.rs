//! End-of-run summary.

use card_table::{Phase, Simulation, game::overall_winner, scene::Scene, telemetry::TelemetrySink};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub ticks: u64,
    pub finished: bool,
    pub rounds_played: u32,
    /// Player number with the largest stake
    pub winner: Option<usize>,
    /// `(player number, stake)` in table order
    pub stakes: Vec<(usize, usize)>,
    pub pause_resumes: u32,
}

impl Summary {
    /// Take the final standing if the game is over, otherwise the table as
    /// it stands.
    pub fn from_simulation<S: Scene, T: TelemetrySink>(sim: &Simulation<S, T>, ticks: u64) -> Self {
        let finished = sim.phase() == Phase::GameOver;
        let (rounds_played, winner, stakes) = match sim.standing() {
            Some(standing) => (
                standing.rounds_played,
                standing.winner,
                standing.stakes.clone(),
            ),
            None => (
                sim.table.round.saturating_sub(1),
                overall_winner(&sim.table.players).map(|player| player.id),
                sim.table
                    .players
                    .iter()
                    .map(|player| (player.id, player.coins.len()))
                    .collect(),
            ),
        };

        Self {
            ticks,
            finished,
            rounds_played,
            winner,
            stakes,
            pause_resumes: sim.pause_menu.counters.resume,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.finished { "game over" } else { "stopped" };
        writeln!(
            f,
            "{status} after {} ticks, {} rounds played",
            self.ticks, self.rounds_played
        )?;
        match self.winner {
            Some(winner) => writeln!(f, "winner: Player {winner}")?,
            None => writeln!(f, "winner: none")?,
        }
        for (id, stake) in &self.stakes {
            writeln!(f, "  Player {id}: {stake} coins")?;
        }
        Ok(())
    }
}
