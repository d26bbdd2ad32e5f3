use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    ReducePercent,
    AbsoluteTarget,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReducePercent => "reduce_percent",
            Self::AbsoluteTarget => "absolute_target",
        }
    }
}

impl FromStr for GoalType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reduce_percent" => Ok(Self::ReducePercent),
            "absolute_target" => Ok(Self::AbsoluteTarget),
            _ => Err(format!("unknown goal type: {value}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: GoalType,
    /// Goal-type-specific parameters, e.g. {"percent": 10} or
    /// {"target_kgco2": 25.0}.
    pub params: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_type_round_trips_as_str() {
        for t in [GoalType::ReducePercent, GoalType::AbsoluteTarget] {
            assert_eq!(t.as_str().parse::<GoalType>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_goal_type_is_rejected() {
        assert!("double_it".parse::<GoalType>().is_err());
    }
}
