//! Reservation Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reservation lifecycle: `pending -> {confirmed, cancelled}`,
/// `confirmed -> {completed, cancelled}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
    ];

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Active reservations block their table for the day
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Completed)
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}

/// Reservation entity. `table_number` is a snapshot that survives table deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub customer_id: i64,
    pub table_id: Option<i64>,
    pub table_number: i32,
    pub guest_count: i32,
    pub reserve_date: DateTime<Utc>,
    pub status: ReservationStatus,
    pub special_notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub table_id: i64,
    pub guest_count: i32,
    pub reserve_date: DateTime<Utc>,
    pub special_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub table_id: Option<i64>,
    pub guest_count: Option<i32>,
    pub reserve_date: Option<DateTime<Utc>>,
    pub status: Option<ReservationStatus>,
    pub special_notes: Option<String>,
}

/// Insert payload handed to the store
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub customer_id: i64,
    pub table_id: i64,
    pub table_number: i32,
    pub guest_count: i32,
    pub reserve_date: DateTime<Utc>,
    pub special_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_transition_table() {
        let allowed = [
            (Pending, Confirmed),
            (Pending, Cancelled),
            (Confirmed, Completed),
            (Confirmed, Cancelled),
        ];
        for from in ReservationStatus::ALL {
            for to in ReservationStatus::ALL {
                assert_eq!(from.can_transition_to(to), allowed.contains(&(from, to)));
            }
        }
    }

    #[test]
    fn test_active() {
        assert!(Pending.is_active());
        assert!(Confirmed.is_active());
        assert!(!Cancelled.is_active());
        assert!(!Completed.is_active());
    }
}
