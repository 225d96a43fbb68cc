//! JSON dashboard export

use anyhow::{Context, Result};
use mine_safety_core::{Alert, MineSite, Role};
use serde_json::{json, Value};

/// Dashboard data for `role` as pretty-printed JSON
pub fn dashboard_json(role: Role, site: &MineSite) -> Result<String> {
    let alerts: Vec<&Alert> = site.alerts.iter().collect();
    let markers = site.map.markers().as_slice();

    let desk = match role {
        Role::Worker => {
            let leave: Vec<_> = site.leave.for_worker(site.worker.worker.id).collect();
            json!({
                "desk": &site.worker,
                "leave_requests": leave,
            })
        }
        Role::Supervisor => {
            let pending: Vec<_> = site.leave.pending().collect();
            json!({
                "desk": &site.supervisor,
                "pending_leave": pending,
                "markers": markers,
            })
        }
        Role::Regulator => json!({
            "desk": &site.regulator,
            "markers": markers,
        }),
    };

    let mut document = json!({
        "role": role,
        "title": role.dashboard_title(),
        "alerts": alerts,
    });
    if let (Value::Object(doc), Value::Object(extra)) = (&mut document, desk) {
        doc.extend(extra);
    }

    serde_json::to_string_pretty(&document).context("Failed to serialize dashboard")
}
