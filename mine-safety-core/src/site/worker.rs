//! Worker desk: personal tasks, hazard reports, check-in and equipment

use super::seed_time;
use crate::types::{require_text, Result, SafetyError, Timestamp, WorkerRef};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// A task assigned to the worker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerTask {
    pub id: u32,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
}

/// Review status of a hazard report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Done,
    Rejected,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Done => write!(f, "done"),
            ReportStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardReport {
    pub id: u32,
    pub description: String,
    pub location: String,
    pub status: ReportStatus,
    pub submitted_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentState {
    Ok,
    Check,
}

impl fmt::Display for EquipmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentState::Ok => write!(f, "OK"),
            EquipmentState::Check => write!(f, "Check"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentCheck {
    pub name: String,
    pub state: EquipmentState,
}

/// Everything shown on one worker's dashboard
#[derive(Debug, Clone, Serialize)]
pub struct WorkerDesk {
    pub worker: WorkerRef,
    pub tasks: Vec<WorkerTask>,
    /// Newest first
    pub hazard_reports: Vec<HazardReport>,
    pub attendance_marked: bool,
    pub equipment: Vec<EquipmentCheck>,
    #[serde(skip)]
    next_report_id: u32,
}

impl WorkerDesk {
    /// Desk with the standard shift tasks and sample reports
    pub fn seeded(worker: WorkerRef) -> Self {
        let task = |id, title: &str, status, priority| WorkerTask {
            id,
            title: title.to_string(),
            status,
            priority,
        };

        let tasks = vec![
            task(1, "Complete daily safety check", TaskStatus::Pending, Priority::High),
            task(2, "Inspect tunnel ventilation system", TaskStatus::Pending, Priority::Medium),
            task(3, "Report equipment maintenance needs", TaskStatus::Done, Priority::Low),
            task(4, "Attend safety briefing", TaskStatus::Pending, Priority::High),
        ];

        let hazard_reports = vec![
            HazardReport {
                id: 1,
                description: "Loose rocks in tunnel B-7".to_string(),
                location: "Tunnel B-7, Section 3".to_string(),
                status: ReportStatus::Done,
                submitted_at: seed_time(2024, 1, 15, 9, 30),
            },
            HazardReport {
                id: 2,
                description: "Gas leak detected".to_string(),
                location: "Shaft A-2".to_string(),
                status: ReportStatus::Pending,
                submitted_at: seed_time(2024, 1, 14, 14, 20),
            },
        ];

        let equipment = vec![
            EquipmentCheck { name: "Safety Helmet".to_string(), state: EquipmentState::Ok },
            EquipmentCheck { name: "Gas Detector".to_string(), state: EquipmentState::Ok },
            EquipmentCheck { name: "Communication Radio".to_string(), state: EquipmentState::Check },
        ];

        Self {
            worker,
            tasks,
            hazard_reports,
            attendance_marked: false,
            equipment,
            next_report_id: 3,
        }
    }

    /// Flip a task between pending and done, returning the new status
    pub fn toggle_task(&mut self, task_id: u32) -> Result<TaskStatus> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(SafetyError::TaskNotFound(task_id))?;

        task.status = match task.status {
            TaskStatus::Pending => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Pending,
        };
        log::debug!("Task {} is now {}", task_id, task.status);
        Ok(task.status)
    }

    /// File a new hazard report; both fields are required
    pub fn submit_hazard(
        &mut self,
        description: &str,
        location: &str,
        submitted_at: Timestamp,
    ) -> Result<&HazardReport> {
        let description = require_text("description", description)?;
        let location = require_text("location", location)?;

        let report = HazardReport {
            id: self.next_report_id,
            description,
            location,
            status: ReportStatus::Pending,
            submitted_at,
        };
        self.next_report_id += 1;

        log::info!("Hazard report {} filed at {}", report.id, report.location);
        self.hazard_reports.insert(0, report);
        Ok(&self.hazard_reports[0])
    }

    /// Check in for the day; returns false if already checked in
    pub fn mark_attendance(&mut self) -> bool {
        if self.attendance_marked {
            return false;
        }
        self.attendance_marked = true;
        true
    }

    pub fn pending_tasks(&self) -> impl Iterator<Item = &WorkerTask> {
        self.tasks.iter().filter(|t| t.status == TaskStatus::Pending)
    }

    /// Equipment flagged for inspection
    pub fn equipment_needing_check(&self) -> impl Iterator<Item = &EquipmentCheck> {
        self.equipment.iter().filter(|e| e.state == EquipmentState::Check)
    }
}
