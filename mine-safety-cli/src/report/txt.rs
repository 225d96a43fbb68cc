//! Plain-text dashboard views

use mine_safety_core::site::leave::LeaveRequest;
use mine_safety_core::site::regulator::{Metric, Trend};
use mine_safety_core::{AlertLog, DetailsPanel, MineSite, Role};
use std::fmt;

const RULE: &str = "═══════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────";

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", THIN_RULE)
}

fn last_seen(mins: u32) -> String {
    match mins {
        0 => "Just now".to_string(),
        m => format!("{} min ago", m),
    }
}

/// Alert list, newest first
pub struct AlertTable<'a>(pub &'a AlertLog);

impl fmt::Display for AlertTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let log = self.0;
        if log.is_empty() {
            return writeln!(f, "  No emergency alerts");
        }

        for alert in log.iter() {
            write!(
                f,
                "  #{:<4} {:<11} {:<16} {:<12} raised {}",
                alert.id,
                alert.status(),
                alert.worker.name,
                alert.location,
                alert.raised_at.format("%Y-%m-%d %H:%M:%S")
            )?;
            if let Some(responded_at) = alert.responded_at() {
                write!(f, ", responded {}", responded_at.format("%H:%M:%S"))?;
            }
            if let Some(resolved_at) = alert.resolved_at() {
                write!(f, ", resolved {}", resolved_at.format("%H:%M:%S"))?;
            }
            writeln!(f)?;
        }

        let counts = log.counts();
        writeln!(
            f,
            "  ({} active, {} responding, {} resolved; keeping last {})",
            counts.active,
            counts.responding,
            counts.resolved,
            log.capacity()
        )
    }
}

/// Marker details panel
pub struct DetailsView<'a>(pub &'a DetailsPanel);

impl fmt::Display for DetailsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            DetailsPanel::Placeholder => writeln!(f, "Click a marker on the map to see details"),
            DetailsPanel::Selected(marker) => {
                writeln!(f, "Marker #{}: {}", marker.id, marker.label)?;
                writeln!(f, "  Category: {}", marker.category)?;
                writeln!(f, "  Severity: {}", marker.severity)?;
                writeln!(f, "  Position: {}", marker.position)?;
                if let Some(details) = &marker.details {
                    writeln!(f, "  Details:  {}", details)?;
                }
                Ok(())
            }
        }
    }
}

/// Full dashboard for a role
pub struct Dashboard<'a> {
    pub role: Role,
    pub site: &'a MineSite,
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "  {}", self.role.dashboard_title())?;
        writeln!(f, "{}", RULE)?;

        match self.role {
            Role::Worker => self.worker(f)?,
            Role::Supervisor => self.supervisor(f)?,
            Role::Regulator => self.regulator(f)?,
        }

        section(f, "Emergency Alerts")?;
        write!(f, "{}", AlertTable(&self.site.alerts))
    }
}

impl Dashboard<'_> {
    fn worker(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desk = &self.site.worker;

        section(f, &format!("My Tasks ({})", desk.worker.name))?;
        for task in &desk.tasks {
            let check = if task.status == mine_safety_core::site::worker::TaskStatus::Done {
                "[x]"
            } else {
                "[ ]"
            };
            writeln!(f, "  {} {:<2} {:<40} {}", check, task.id, task.title, task.priority)?;
        }

        section(f, "Daily Check-in")?;
        writeln!(
            f,
            "  Attendance: {}",
            if desk.attendance_marked { "marked ✓" } else { "not marked" }
        )?;
        for item in &desk.equipment {
            writeln!(f, "  {:<24} {}", item.name, item.state)?;
        }

        section(f, "My Reports Status")?;
        for report in &desk.hazard_reports {
            writeln!(
                f,
                "  #{:<3} {:<9} {} ({}, {})",
                report.id,
                report.status,
                report.description,
                report.location,
                report.submitted_at.format("%Y-%m-%d %H:%M")
            )?;
        }

        section(f, "My Leave Requests")?;
        let mut any = false;
        for request in self.site.leave.for_worker(desk.worker.id) {
            any = true;
            leave_line(f, request)?;
        }
        if !any {
            writeln!(f, "  None")?;
        }
        Ok(())
    }

    fn supervisor(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desk = &self.site.supervisor;

        section(
            f,
            &format!(
                "Worker Attendance & Status ({}/{} present)",
                desk.present_count(),
                desk.crew.len()
            ),
        )?;
        for member in &desk.crew {
            writeln!(
                f,
                "  {:<2} {:<15} {:<10} {:<12} {:<12} {}",
                member.id,
                member.name,
                member.status,
                member.location,
                last_seen(member.last_seen_mins),
                if member.present { "Present" } else { "Absent" }
            )?;
        }

        section(f, "Digital Task Log")?;
        for entry in &desk.task_log {
            writeln!(
                f,
                "  #{:<3} {:<10} {:<15} {} ({})",
                entry.id,
                entry.status,
                entry.worker_name,
                entry.title,
                entry.logged_at.format("%Y-%m-%d %H:%M")
            )?;
        }

        section(f, "Resource Management")?;
        for resource in &desk.resources {
            writeln!(
                f,
                "  {:<22} {:>4} {:<6} {:<9} {}",
                resource.name, resource.quantity, resource.unit, resource.status, resource.team
            )?;
        }

        section(f, "Pending Leave Requests")?;
        let mut any = false;
        for request in self.site.leave.pending() {
            any = true;
            leave_line(f, request)?;
        }
        if !any {
            writeln!(f, "  None")?;
        }

        self.map(f)
    }

    fn regulator(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desk = &self.site.regulator;

        section(f, "Safety Analytics")?;
        for metric in &desk.safety_metrics {
            metric_line(f, metric)?;
        }

        section(f, "Productivity Trends")?;
        for metric in &desk.productivity_metrics {
            metric_line(f, metric)?;
        }

        section(f, "Recent Incidents")?;
        for incident in &desk.incidents {
            writeln!(
                f,
                "  {:<18} {:<12} {:<7} {}",
                incident.kind, incident.location, incident.severity, incident.status
            )?;
        }

        section(f, "Compliance Reports")?;
        for report in &desk.compliance_reports {
            writeln!(
                f,
                "  #{:<2} {:<34} {:<14} {} {}",
                report.id, report.title, report.kind, report.date, report.status
            )?;
        }

        self.map(f)
    }

    fn map(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let markers = self.site.map.markers();
        let stats = markers.stats();

        section(
            f,
            &format!(
                "Mine Map ({} hazards, {} emergencies, {} maintenance, {} completed)",
                stats.hazards, stats.emergencies, stats.maintenance, stats.completed
            ),
        )?;
        for marker in markers.iter() {
            writeln!(
                f,
                "  #{:<2} {:<12} {:<7} {:<14} {}",
                marker.id,
                marker.category,
                marker.severity,
                marker.position.to_string(),
                marker.label
            )?;
        }
        Ok(())
    }
}

fn metric_line(f: &mut fmt::Formatter<'_>, metric: &Metric) -> fmt::Result {
    let arrow = match metric.trend {
        Trend::Up => "▲",
        Trend::Down => "▼",
    };
    writeln!(
        f,
        "  {:<22} {:>9} {} {} from last period",
        metric.label, metric.value, arrow, metric.change
    )
}

fn leave_line(f: &mut fmt::Formatter<'_>, request: &LeaveRequest) -> fmt::Result {
    writeln!(
        f,
        "  #{:<3} {:<9} {} {} → {} ({} days): {}",
        request.id,
        request.status,
        request.worker.name,
        request.from,
        request.to,
        request.days(),
        request.reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mine_safety_core::{Notification, Position, SiteConfig, WorkerRef};

    fn site() -> MineSite {
        MineSite::seeded(SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_worker_dashboard_sections() {
        let site = site();
        let text = Dashboard { role: Role::Worker, site: &site }.to_string();
        assert!(text.contains("Worker Dashboard"));
        assert!(text.contains("Complete daily safety check"));
        assert!(text.contains("Communication Radio"));
        assert!(text.contains("No emergency alerts"));
    }

    #[test]
    fn test_supervisor_dashboard_sections() {
        let site = site();
        let text = Dashboard { role: Role::Supervisor, site: &site }.to_string();
        assert!(text.contains("Supervisor Control Center"));
        assert!(text.contains("4/5 present"));
        assert!(text.contains("Emergency Oxygen"));
        assert!(text.contains("Mine Map"));
    }

    #[test]
    fn test_regulator_dashboard_sections() {
        let site = site();
        let text = Dashboard { role: Role::Regulator, site: &site }.to_string();
        assert!(text.contains("DGMS Analytics Hub"));
        assert!(text.contains("Safety Score"));
        assert!(text.contains("Equipment Maintenance Log"));
    }

    #[test]
    fn test_alert_table_lists_states() {
        let mut site = site();
        let mut notes: Vec<Notification> = Vec::new();
        let alert = site
            .raise_for(WorkerRef::new(5, "Mike Wilson"), "Tunnel B-7", &mut notes)
            .unwrap();
        site.respond(alert.id, &mut notes);

        let text = AlertTable(&site.alerts).to_string();
        assert!(text.contains("responding"));
        assert!(text.contains("Mike Wilson"));
        assert!(text.contains("0 active, 1 responding, 0 resolved"));
    }

    #[test]
    fn test_details_view() {
        let mut site = site();
        let text = DetailsView(site.click(Position::new(300.0, 150.0))).to_string();
        assert!(text.contains("Marker #2"));
        assert!(text.contains("emergency"));
        assert!(text.contains("Details:  Dhanbad"));

        let text = DetailsView(site.click(Position::new(0.0, 0.0))).to_string();
        assert!(text.contains("Click a marker"));
    }
}
