use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{Company, CompanyId};

/// Store-assigned identifier of an approval record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApprovalId(pub u64);

impl fmt::Display for ApprovalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    New,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(format!("unknown approval status: {other}")),
        }
    }
}

/// Kinds of data that can be staged for approval. Each kind must have exactly
/// one registered processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Company,
}

impl DataType {
    pub const ALL: [Self; 1] = [Self::Company];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "COMPANY",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("No processor registered for approval type: {value}"))
    }
}

/// A staged change and its decision trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub id: ApprovalId,
    pub data_type: String,
    pub operation_type: OperationType,
    pub data_id: Option<CompanyId>,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub new_data: String,
    pub old_data: Option<String>,
    pub change_summary: Option<String>,
    pub remarks: Option<String>,
}

impl Approval {
    /// Snapshot that approving this record would commit.
    pub fn staged_company(&self) -> Result<Company, SnapshotError> {
        decode_snapshot(&self.new_data)
    }

    pub fn approved(self, approver: &str, at: DateTime<Utc>) -> Self {
        Self {
            approval_status: ApprovalStatus::Approved,
            approved_by: Some(approver.to_string()),
            approved_at: Some(at),
            ..self
        }
    }

    pub fn rejected(self, approver: &str, at: DateTime<Utc>, reason: &str) -> Self {
        Self {
            approval_status: ApprovalStatus::Rejected,
            approved_by: Some(approver.to_string()),
            approved_at: Some(at),
            remarks: Some(reason.to_string()),
            ..self
        }
    }

    pub fn with_data_id(self, data_id: CompanyId) -> Self {
        Self {
            data_id: Some(data_id),
            ..self
        }
    }
}

/// Submission-time fields of an approval. Stores assign the identity and
/// always start the record as `PENDING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApproval {
    pub data_type: DataType,
    pub operation_type: OperationType,
    pub data_id: Option<CompanyId>,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
    pub new_data: String,
    pub old_data: Option<String>,
    pub change_summary: Option<String>,
}

impl NewApproval {
    pub fn into_approval(self, id: ApprovalId) -> Approval {
        Approval {
            id,
            data_type: self.data_type.as_str().to_string(),
            operation_type: self.operation_type,
            data_id: self.data_id,
            submitted_by: self.submitted_by,
            submitted_at: self.submitted_at,
            approval_status: ApprovalStatus::Pending,
            approved_by: None,
            approved_at: None,
            new_data: self.new_data,
            old_data: self.old_data,
            change_summary: self.change_summary,
            remarks: None,
        }
    }
}

/// Criteria for listing approvals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalFilter {
    pub data_type: String,
    pub status: Option<ApprovalStatus>,
}

impl ApprovalFilter {
    pub fn matches(&self, approval: &Approval) -> bool {
        approval.data_type == self.data_type
            && self
                .status
                .map_or(true, |status| approval.approval_status == status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to serialize company snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to parse company snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

pub fn encode_snapshot(company: &Company) -> Result<String, SnapshotError> {
    serde_json::to_string(company).map_err(SnapshotError::Encode)
}

pub fn decode_snapshot(raw: &str) -> Result<Company, SnapshotError> {
    serde_json::from_str(raw).map_err(SnapshotError::Decode)
}

/// Comma separated names of the top-level fields that differ between two
/// snapshots. Without a previous snapshot every populated field counts.
pub fn change_summary(previous: Option<&Company>, next: &Company) -> Result<String, SnapshotError> {
    let next = serde_json::to_value(next).map_err(SnapshotError::Encode)?;
    let previous = previous
        .map(serde_json::to_value)
        .transpose()
        .map_err(SnapshotError::Encode)?;

    let Value::Object(fields) = next else {
        return Ok(String::new());
    };

    let changed: Vec<&str> = fields
        .iter()
        .filter(|(key, value)| match &previous {
            Some(previous) => previous.get(key.as_str()) != Some(*value),
            None => !value.is_null(),
        })
        .map(|(key, _)| key.as_str())
        .collect();

    Ok(changed.join(", "))
}
