//! Supervisor desk: crew roster, task log and resource inventory

use super::seed_time;
use crate::types::{Result, SafetyError, Timestamp};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrewStatus {
    Active,
    Offline,
    Emergency,
}

impl fmt::Display for CrewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrewStatus::Active => write!(f, "active"),
            CrewStatus::Offline => write!(f, "offline"),
            CrewStatus::Emergency => write!(f, "emergency"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewMember {
    pub id: u32,
    pub name: String,
    pub status: CrewStatus,
    pub location: String,
    pub present: bool,
    /// Minutes since the last check-in signal
    pub last_seen_mins: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Pending,
    Completed,
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogStatus::Pending => write!(f, "pending"),
            LogStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A task a worker reported, awaiting supervisor validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskLogEntry {
    pub id: u32,
    pub worker_id: u32,
    pub worker_name: String,
    pub title: String,
    pub status: LogStatus,
    pub logged_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Critical,
    Low,
    Adequate,
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockLevel::Critical => write!(f, "critical"),
            StockLevel::Low => write!(f, "low"),
            StockLevel::Adequate => write!(f, "adequate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub id: u32,
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub status: StockLevel,
    pub team: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupervisorDesk {
    pub crew: Vec<CrewMember>,
    pub task_log: Vec<TaskLogEntry>,
    pub resources: Vec<Resource>,
}

impl SupervisorDesk {
    pub fn seeded() -> Self {
        let member = |id, name: &str, status, location: &str, present, last_seen_mins| CrewMember {
            id,
            name: name.to_string(),
            status,
            location: location.to_string(),
            present,
            last_seen_mins,
        };

        let crew = vec![
            member(1, "John Smith", CrewStatus::Active, "Tunnel A-5", true, 5),
            member(2, "Maria Garcia", CrewStatus::Active, "Shaft B-2", true, 2),
            member(3, "David Chen", CrewStatus::Offline, "Surface", false, 45),
            member(4, "Sarah Johnson", CrewStatus::Active, "Tunnel C-1", true, 1),
            member(5, "Mike Wilson", CrewStatus::Active, "Tunnel B-7", true, 0),
        ];

        let entry = |id, worker_id, worker_name: &str, title: &str, status, logged_at| TaskLogEntry {
            id,
            worker_id,
            worker_name: worker_name.to_string(),
            title: title.to_string(),
            status,
            logged_at,
        };

        let task_log = vec![
            entry(1, 1, "John Smith", "Complete daily safety check", LogStatus::Completed, seed_time(2024, 1, 15, 9, 30)),
            entry(2, 2, "Maria Garcia", "Inspect ventilation system", LogStatus::Pending, seed_time(2024, 1, 15, 10, 15)),
            entry(3, 4, "Sarah Johnson", "Equipment maintenance check", LogStatus::Pending, seed_time(2024, 1, 15, 8, 45)),
        ];

        let resource = |id, name: &str, quantity, unit: &str, status, team: &str| Resource {
            id,
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            status,
            team: team.to_string(),
        };

        let resources = vec![
            resource(1, "Safety Helmets", 25, "units", StockLevel::Adequate, "Team A"),
            resource(2, "Gas Detectors", 3, "units", StockLevel::Low, "Team B"),
            resource(3, "Emergency Oxygen", 1, "tanks", StockLevel::Critical, "Team C"),
            resource(4, "Communication Radios", 15, "units", StockLevel::Adequate, "All Teams"),
        ];

        Self {
            crew,
            task_log,
            resources,
        }
    }

    /// Flip a crew member between present and absent
    pub fn toggle_attendance(&mut self, worker_id: u32) -> Result<bool> {
        let member = self
            .crew
            .iter_mut()
            .find(|m| m.id == worker_id)
            .ok_or(SafetyError::WorkerNotFound(worker_id))?;
        member.present = !member.present;
        Ok(member.present)
    }

    /// Accept a logged task as completed
    pub fn validate_task(&mut self, task_id: u32) -> Result<()> {
        let entry = self
            .task_log
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(SafetyError::TaskNotFound(task_id))?;
        entry.status = LogStatus::Completed;
        log::debug!("Task log entry {} validated", task_id);
        Ok(())
    }

    /// Drop a logged task from the log
    pub fn reject_task(&mut self, task_id: u32) -> Result<TaskLogEntry> {
        let index = self
            .task_log
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(SafetyError::TaskNotFound(task_id))?;
        log::debug!("Task log entry {} rejected", task_id);
        Ok(self.task_log.remove(index))
    }

    /// Mark a crew member as in an emergency at `location`
    ///
    /// Returns false when the id is not on the roster.
    pub fn flag_emergency(&mut self, worker_id: u32, location: &str) -> bool {
        match self.crew.iter_mut().find(|m| m.id == worker_id) {
            Some(member) => {
                member.status = CrewStatus::Emergency;
                member.location = location.to_string();
                member.last_seen_mins = 0;
                true
            }
            None => false,
        }
    }

    /// Return a crew member from emergency to active
    pub fn clear_emergency(&mut self, worker_id: u32) {
        if let Some(member) = self
            .crew
            .iter_mut()
            .find(|m| m.id == worker_id && m.status == CrewStatus::Emergency)
        {
            member.status = CrewStatus::Active;
        }
    }

    /// Resources that are low or critical, most urgent first
    pub fn resources_needing_attention(&self) -> Vec<&Resource> {
        let mut flagged: Vec<&Resource> = self
            .resources
            .iter()
            .filter(|r| r.status != StockLevel::Adequate)
            .collect();
        flagged.sort_by_key(|r| r.status);
        flagged
    }

    pub fn present_count(&self) -> usize {
        self.crew.iter().filter(|m| m.present).count()
    }
}
