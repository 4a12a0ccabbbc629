use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::store::StoreError;

/// Lifecycle stage of a task. The chain is linear: pending → processing → done.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Processing,
    Done,
}

impl Status {
    /// Every status, in chain order. Also the column order of the board.
    pub const ALL: [Status; 3] = [Status::Pending, Status::Processing, Status::Done];

    /// The next stage, or `None` when already done
    pub fn next(self) -> Option<Status> {
        match self {
            Status::Pending => Some(Status::Processing),
            Status::Processing => Some(Status::Done),
            Status::Done => None,
        }
    }

    /// The previous stage, or `None` when still pending
    pub fn previous(self) -> Option<Status> {
        match self {
            Status::Pending => None,
            Status::Processing => Some(Status::Pending),
            Status::Done => Some(Status::Processing),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Processing => "processing",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "processing" => Ok(Status::Processing),
            "done" => Ok(Status::Done),
            _ => Err(StoreError::InvalidStatus(s.to_string())),
        }
    }
}
