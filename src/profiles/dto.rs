use serde::Deserialize;
use uuid::Uuid;

use super::repo::Profile;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub daily_calorie_goal: Option<i32>,
    pub daily_protein_goal: Option<i32>,
    pub daily_carbs_goal: Option<i32>,
    pub daily_fat_goal: Option<i32>,
}

impl UpdateProfileRequest {
    /// Missing goals fall back to the defaults; negative goals are rejected.
    pub fn into_profile(self, user_id: Uuid) -> Result<Profile, String> {
        let defaults = Profile::defaults(user_id);
        let goal = |name: &str, v: Option<i32>, default: i32| match v {
            Some(n) if n < 0 => Err(format!("{name} must not be negative")),
            Some(n) => Ok(n),
            None => Ok(default),
        };
        Ok(Profile {
            user_id,
            username: self
                .username
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            daily_calorie_goal: goal(
                "daily_calorie_goal",
                self.daily_calorie_goal,
                defaults.daily_calorie_goal,
            )?,
            daily_protein_goal: goal(
                "daily_protein_goal",
                self.daily_protein_goal,
                defaults.daily_protein_goal,
            )?,
            daily_carbs_goal: goal(
                "daily_carbs_goal",
                self.daily_carbs_goal,
                defaults.daily_carbs_goal,
            )?,
            daily_fat_goal: goal("daily_fat_goal", self.daily_fat_goal, defaults.daily_fat_goal)?,
            updated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::repo::{DEFAULT_CARBS_GOAL, DEFAULT_FAT_GOAL};

    #[test]
    fn missing_goals_use_defaults() {
        let user = Uuid::new_v4();
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"username":"  sam ","daily_calorie_goal":1800}"#).unwrap();
        let p = req.into_profile(user).unwrap();
        assert_eq!(p.username.as_deref(), Some("sam"));
        assert_eq!(p.daily_calorie_goal, 1800);
        assert_eq!(p.daily_carbs_goal, DEFAULT_CARBS_GOAL);
        assert_eq!(p.daily_fat_goal, DEFAULT_FAT_GOAL);
    }

    #[test]
    fn negative_goal_rejected() {
        let req = UpdateProfileRequest {
            daily_fat_goal: Some(-1),
            ..Default::default()
        };
        let err = req.into_profile(Uuid::new_v4()).unwrap_err();
        assert!(err.contains("daily_fat_goal"));
    }

    #[test]
    fn blank_username_is_none() {
        let req = UpdateProfileRequest {
            username: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(req.into_profile(Uuid::new_v4()).unwrap().username, None);
    }

    #[test]
    fn defaults_serialize_without_timestamp() {
        let json = serde_json::to_value(Profile::defaults(Uuid::nil())).unwrap();
        assert_eq!(json["daily_calorie_goal"], 2000);
        assert_eq!(json["daily_protein_goal"], 120);
        assert!(json["updated_at"].is_null());
    }
}
