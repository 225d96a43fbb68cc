//! Regulator (DGMS) desk: read-only analytics, compliance and incidents

use super::seed_date;
use crate::types::{Result, SafetyError, Severity};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub trend: Trend,
    /// Change from the previous period, e.g. "+2.1%"
    pub change: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportReadiness {
    Ready,
    Pending,
}

impl fmt::Display for ReportReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportReadiness::Ready => write!(f, "Ready"),
            ReportReadiness::Pending => write!(f, "Pending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub id: u32,
    pub title: String,
    pub kind: String,
    pub date: NaiveDate,
    pub status: ReportReadiness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Resolved,
    Investigating,
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncidentStatus::Resolved => write!(f, "Resolved"),
            IncidentStatus::Investigating => write!(f, "Investigating"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentSummary {
    pub id: u32,
    pub kind: String,
    pub location: String,
    pub severity: Severity,
    pub status: IncidentStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegulatorDesk {
    pub safety_metrics: Vec<Metric>,
    pub productivity_metrics: Vec<Metric>,
    pub compliance_reports: Vec<ComplianceReport>,
    pub incidents: Vec<IncidentSummary>,
}

fn metric(label: &str, value: &str, trend: Trend, change: &str) -> Metric {
    Metric {
        label: label.to_string(),
        value: value.to_string(),
        trend,
        change: change.to_string(),
    }
}

impl RegulatorDesk {
    pub fn seeded() -> Self {
        let safety_metrics = vec![
            metric("Safety Score", "94.2%", Trend::Up, "+2.1%"),
            metric("Incidents This Month", "3", Trend::Down, "-40%"),
            metric("Compliance Rate", "98.7%", Trend::Up, "+0.5%"),
            metric("Training Completion", "96.3%", Trend::Up, "+1.2%"),
        ];

        let productivity_metrics = vec![
            metric("Daily Output", "847 tons", Trend::Up, "+5.2%"),
            metric("Equipment Efficiency", "89.4%", Trend::Down, "-1.8%"),
            metric("Worker Productivity", "92.1%", Trend::Up, "+3.4%"),
            metric("Downtime Hours", "2.3h", Trend::Down, "-15%"),
        ];

        let report = |id, title: &str, kind: &str, date, status| ComplianceReport {
            id,
            title: title.to_string(),
            kind: kind.to_string(),
            date,
            status,
        };

        let compliance_reports = vec![
            report(1, "Monthly Safety Audit Report", "Safety", seed_date(2024, 1, 15), ReportReadiness::Ready),
            report(2, "Environmental Compliance Report", "Environmental", seed_date(2024, 1, 10), ReportReadiness::Ready),
            report(3, "Worker Training Records", "Training", seed_date(2024, 1, 8), ReportReadiness::Ready),
            report(4, "Equipment Maintenance Log", "Maintenance", seed_date(2024, 1, 5), ReportReadiness::Pending),
        ];

        let incident = |id, kind: &str, location: &str, severity, status| IncidentSummary {
            id,
            kind: kind.to_string(),
            location: location.to_string(),
            severity,
            status,
        };

        let incidents = vec![
            incident(1, "Minor Injury", "Tunnel B-7", Severity::Low, IncidentStatus::Resolved),
            incident(2, "Equipment Failure", "Shaft A-2", Severity::Medium, IncidentStatus::Investigating),
            incident(3, "Gas Detection", "Tunnel C-1", Severity::High, IncidentStatus::Resolved),
        ];

        Self {
            safety_metrics,
            productivity_metrics,
            compliance_reports,
            incidents,
        }
    }

    /// Serialize a ready compliance report for download
    pub fn export_report(&self, id: u32) -> Result<String> {
        let report = self
            .compliance_reports
            .iter()
            .find(|r| r.id == id)
            .ok_or(SafetyError::ReportNotFound(id))?;

        if report.status != ReportReadiness::Ready {
            return Err(SafetyError::ReportNotReady(id));
        }

        Ok(serde_json::to_string_pretty(report)?)
    }

    pub fn open_incidents(&self) -> impl Iterator<Item = &IncidentSummary> {
        self.incidents
            .iter()
            .filter(|i| i.status == IncidentStatus::Investigating)
    }
}
