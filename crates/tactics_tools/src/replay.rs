//! Turn log files.

use std::path::Path;

use tactics_core::turn_log::{MemoryTurnLog, TurnEvent};

use crate::error::{Result, ToolError};

/// Write a turn log to disk.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn save_log(log: &MemoryTurnLog, path: &Path) -> Result<()> {
    let bytes = log.to_bytes()?;
    std::fs::write(path, bytes).map_err(|e| ToolError::io(path, e))
}

/// Read a turn log from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_log(path: &Path) -> Result<MemoryTurnLog> {
    let bytes = std::fs::read(path).map_err(|e| ToolError::io(path, e))?;
    Ok(MemoryTurnLog::from_bytes(&bytes)?)
}

/// One-line human description of an event.
#[must_use]
pub fn describe(event: &TurnEvent) -> String {
    match event {
        TurnEvent::CombatResolved {
            attacker,
            defender,
            options,
            draw,
            result,
        } => format!(
            "{attacker} attacks {defender} on {} ({}, {}): {} damage{} (draw {draw}), +{} xp",
            options.terrain,
            options.weather,
            options.formation,
            result.damage,
            if result.is_critical { " critical" } else { "" },
            result.experience_gained
        ),
        TurnEvent::UnitDefeated { unit } => format!("{unit} is defeated"),
        TurnEvent::UnitLeveledUp { unit, level } => format!("{unit} reaches level {level}"),
        TurnEvent::ResearchStarted { player, tech } => format!("{player} starts researching {tech}"),
        TurnEvent::ResearchCompleted { player, tech } => format!("{player} completes {tech}"),
        TurnEvent::EraAdvanced { player, era } => format!("{player} enters the {era} era"),
    }
}
