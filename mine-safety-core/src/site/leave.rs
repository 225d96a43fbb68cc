//! Leave requests filed by workers and reviewed by the supervisor

use crate::types::{require_text, Result, SafetyError, Timestamp, WorkerRef};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveRequest {
    pub id: u32,
    pub worker: WorkerRef,
    pub from: NaiveDate,
    /// Last day of leave (inclusive)
    pub to: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub requested_at: Timestamp,
}

impl LeaveRequest {
    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// All leave requests for the site, newest first
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeaveBook {
    requests: Vec<LeaveRequest>,
    #[serde(skip)]
    next_id: u32,
}

impl LeaveBook {
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            next_id: 1,
        }
    }

    /// File a request; the reason is required and the range must not be reversed
    pub fn request(
        &mut self,
        worker: WorkerRef,
        from: NaiveDate,
        to: NaiveDate,
        reason: &str,
        requested_at: Timestamp,
    ) -> Result<&LeaveRequest> {
        let reason = require_text("reason", reason)?;
        if from > to {
            return Err(SafetyError::Validation(format!(
                "leave cannot end ({}) before it starts ({})",
                to, from
            )));
        }

        let request = LeaveRequest {
            id: self.next_id.max(1),
            worker,
            from,
            to,
            reason,
            status: LeaveStatus::Pending,
            requested_at,
        };
        self.next_id = request.id + 1;

        log::info!("Leave request {} filed by {}", request.id, request.worker);
        self.requests.insert(0, request);
        Ok(&self.requests[0])
    }

    pub fn approve(&mut self, id: u32) -> Result<LeaveStatus> {
        self.decide(id, LeaveStatus::Approved)
    }

    pub fn reject(&mut self, id: u32) -> Result<LeaveStatus> {
        self.decide(id, LeaveStatus::Rejected)
    }

    /// Only pending requests can be decided; decided ones keep their status
    fn decide(&mut self, id: u32, decision: LeaveStatus) -> Result<LeaveStatus> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(SafetyError::LeaveNotFound(id))?;

        if request.status == LeaveStatus::Pending {
            request.status = decision;
            log::debug!("Leave request {} {}", id, decision);
        }
        Ok(request.status)
    }

    pub fn pending(&self) -> impl Iterator<Item = &LeaveRequest> {
        self.requests.iter().filter(|r| r.status == LeaveStatus::Pending)
    }

    pub fn for_worker(&self, worker_id: u32) -> impl Iterator<Item = &LeaveRequest> {
        self.requests.iter().filter(move |r| r.worker.id == worker_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeaveRequest> {
        self.requests.iter()
    }
}
